//! Packaging compute units into zip archives.
//!
//! Each compute unit's build output directory is flattened into
//! `<output-root>/<name>.zip`, paths relative to the directory. Hidden
//! entries such as `.next/` and `.open-next/` are included.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::consts::{IMAGE_FUNCTION_DIR, SERVER_FUNCTION_DIR};
use crate::layout::OutputLayout;

#[derive(Debug, Error)]
pub enum PackageError {
  #[error("function directory not found: {}", path.display())]
  MissingSource { path: PathBuf },

  #[error("failed to walk {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("io error writing {}: {source}", path.display())]
  Io { path: PathBuf, source: io::Error },

  #[error("zip error writing {}: {source}", path.display())]
  Zip {
    path: PathBuf,
    source: zip::result::ZipError,
  },

  #[error("archive entry name is not valid UTF-8: {}", path.display())]
  NonUtf8Name { path: PathBuf },

  #[error("packaging task panicked: {0}")]
  Join(#[from] tokio::task::JoinError),
}

/// Zip `<output-root>/<name>` into `<output-root>/<name>.zip`.
///
/// Returns the archive path. A failure leaves any partially written archive
/// in place.
pub fn package_function(layout: &OutputLayout, name: &str) -> Result<PathBuf, PackageError> {
  let source = layout.function_dir(name);
  let dest = layout.artifact(name);

  if !source.is_dir() {
    return Err(PackageError::MissingSource { path: source });
  }

  info!(function = %name, dest = %dest.display(), "packaging function");
  let count = write_zip(&source, &dest)?;
  info!(function = %name, files = count, "function packaged");

  Ok(dest)
}

fn write_zip(source: &Path, dest: &Path) -> Result<usize, PackageError> {
  let io_err = |source| PackageError::Io {
    path: dest.to_path_buf(),
    source,
  };
  let zip_err = |source| PackageError::Zip {
    path: dest.to_path_buf(),
    source,
  };

  let file = File::create(dest).map_err(io_err)?;
  let mut zip = ZipWriter::new(BufWriter::new(file));
  let base_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
  let mut count = 0;

  for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|e| PackageError::Walk {
      path: source.to_path_buf(),
      source: e,
    })?;

    let Some(name) = archive_name(source, entry.path())? else {
      continue;
    };

    let options = with_mode(base_options, entry.path());

    if entry.file_type().is_dir() {
      zip.add_directory(format!("{}/", name), options).map_err(zip_err)?;
      continue;
    }

    debug!(entry = %name, "adding file");
    zip.start_file(name, options).map_err(zip_err)?;
    let mut reader = File::open(entry.path()).map_err(|e| PackageError::Io {
      path: entry.path().to_path_buf(),
      source: e,
    })?;
    io::copy(&mut reader, &mut zip).map_err(io_err)?;
    count += 1;
  }

  zip.finish().map_err(zip_err)?;
  Ok(count)
}

/// Archive entry name: path relative to `base` with `/` separators. `None` for the base itself.
fn archive_name(base: &Path, path: &Path) -> Result<Option<String>, PackageError> {
  let Ok(relative) = path.strip_prefix(base) else {
    return Ok(None);
  };
  if relative.as_os_str().is_empty() {
    return Ok(None);
  }
  let parts = relative
    .components()
    .map(|c| c.as_os_str().to_str())
    .collect::<Option<Vec<&str>>>()
    .ok_or_else(|| PackageError::NonUtf8Name {
      path: path.to_path_buf(),
    })?;
  Ok(Some(parts.join("/")))
}

#[cfg(unix)]
fn with_mode(options: SimpleFileOptions, path: &Path) -> SimpleFileOptions {
  use std::os::unix::fs::PermissionsExt;
  match fs::metadata(path) {
    Ok(metadata) => options.unix_permissions(metadata.permissions().mode()),
    Err(_) => options,
  }
}

#[cfg(not(unix))]
fn with_mode(options: SimpleFileOptions, _path: &Path) -> SimpleFileOptions {
  options
}

/// Package the server and image functions concurrently.
///
/// Both archives are written on blocking threads; the step fails if either
/// fails. Archives already written are not removed.
pub async fn package_functions(layout: &OutputLayout) -> Result<Vec<PathBuf>, PackageError> {
  let server_layout = layout.clone();
  let image_layout = layout.clone();

  let server = tokio::task::spawn_blocking(move || package_function(&server_layout, SERVER_FUNCTION_DIR));
  let image = tokio::task::spawn_blocking(move || package_function(&image_layout, IMAGE_FUNCTION_DIR));

  let (server, image) = tokio::try_join!(server, image)?;
  Ok(vec![server?, image?])
}
