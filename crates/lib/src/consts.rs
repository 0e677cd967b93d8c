//! Fixed names shared across the crate.

pub const APP_NAME: &str = "nextstack";

/// Default directory the site build writes its output to.
pub const DEFAULT_OUTPUT_DIR: &str = ".open-next";

/// Default config file name, read from the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "serverless.yml";

/// Directory (inside the output root) holding static assets.
pub const ASSETS_DIR: &str = "assets";

/// Object-storage key prefix for uploaded assets. The static origin reads from it.
pub const ASSET_KEY_PREFIX: &str = "_assets";

/// File the stack description is written to, inside the output root.
pub const STACK_FILE: &str = "stack.json";

/// Build output directory of the server compute unit.
pub const SERVER_FUNCTION_DIR: &str = "server-function";

/// Build output directory of the image-processing compute unit.
pub const IMAGE_FUNCTION_DIR: &str = "image-optimization-function";

/// Cache-control for fingerprinted build assets under `_next/`.
pub const CACHE_CONTROL_IMMUTABLE: &str = "public,max-age=31536000,immutable";

/// Cache-control for every other asset: one day at the edge, then served stale while revalidating.
pub const CACHE_CONTROL_REVALIDATE: &str = "public,max-age=0,s-maxage=86400,stale-while-revalidate=86400";
