use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use nextstack_lib::config::Overrides;
use nextstack_lib::consts::DEFAULT_CONFIG_FILE;

mod cmd;
mod output;

use cmd::GlobalArgs;

/// nextstack - deploy OpenNext builds behind a CloudFront distribution
#[derive(Parser)]
#[command(name = "nextstack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the config file
  #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// Deployment stage (overrides NEXTSTACK_STAGE and the config file)
  #[arg(long, global = true)]
  stage: Option<String>,

  /// Cloud region (overrides NEXTSTACK_REGION and the config file)
  #[arg(long, global = true)]
  region: Option<String>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate function definitions and the stack description
  #[command(name = "addFunctions", alias = "add-functions")]
  AddFunctions,

  /// Run the site build, then package the functions
  Build,

  /// Package the built functions into zip archives
  #[command(name = "build.package", alias = "package")]
  Package,

  /// Upload static assets to the site bucket
  Upload,

  /// Invalidate every cached path on the distribution
  Invalidate,

  /// Run the stages bound to a host lifecycle event
  Hook {
    /// Lifecycle event name, e.g. `after:deploy:deploy`
    event: String,
  },

  /// Show the deployed stack's outputs
  Info {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let args = GlobalArgs {
    config: cli.config,
    overrides: Overrides {
      stage: cli.stage,
      region: cli.region,
    },
  };

  match cli.command {
    Commands::AddFunctions => cmd::cmd_add_functions(&args),
    Commands::Build => cmd::cmd_build(&args),
    Commands::Package => cmd::cmd_package(&args),
    Commands::Upload => cmd::cmd_upload(&args),
    Commands::Invalidate => cmd::cmd_invalidate(&args),
    Commands::Hook { event } => cmd::cmd_hook(&args, &event),
    Commands::Info { json } => cmd::cmd_info(&args, json),
  }
}
