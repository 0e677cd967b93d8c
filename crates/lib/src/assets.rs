//! Static asset collection.
//!
//! Every file under `<output-root>/assets` is uploaded under the `_assets/`
//! key prefix, which the static origin reads from. Keys are computed from
//! the path relative to the asset directory.
//!
//! Fingerprinted build output under `_next/` never changes for a given URL and
//! is cached for a year; everything else may change between deploys and is
//! revalidated.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::consts::{ASSET_KEY_PREFIX, CACHE_CONTROL_IMMUTABLE, CACHE_CONTROL_REVALIDATE};
use crate::util::mime;

#[derive(Debug, Error)]
pub enum AssetError {
  #[error("failed to walk asset directory {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("asset path is not valid UTF-8: {}", path.display())]
  NonUtf8Path { path: PathBuf },
}

/// A file to upload and the headers to upload it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
  pub source: PathBuf,
  /// Path relative to the asset directory, `/`-separated.
  pub relative: String,
  pub key: String,
  pub cache_control: &'static str,
  pub content_type: &'static str,
}

/// Cache-control header for an asset at `relative` (`/`-separated).
pub fn cache_control_for(relative: &str) -> &'static str {
  if relative.starts_with("_next/") {
    CACHE_CONTROL_IMMUTABLE
  } else {
    CACHE_CONTROL_REVALIDATE
  }
}

/// Object key for an asset at `relative`.
pub fn object_key(relative: &str) -> String {
  format!("{}/{}", ASSET_KEY_PREFIX, relative)
}

/// Relative path of `path` under `base`, joined with `/`.
///
/// `Ok(None)` for `base` itself. Object keys must match the file on disk, so
/// non-UTF-8 components are an error.
fn relative_path(base: &Path, path: &Path) -> Result<Option<String>, AssetError> {
  let Ok(relative) = path.strip_prefix(base) else {
    return Ok(None);
  };
  let parts = relative
    .components()
    .map(|c| c.as_os_str().to_str())
    .collect::<Option<Vec<&str>>>()
    .ok_or_else(|| AssetError::NonUtf8Path {
      path: path.to_path_buf(),
    })?;
  if parts.is_empty() {
    return Ok(None);
  }
  Ok(Some(parts.join("/")))
}

/// Every file under `assets_dir`, sorted by relative path.
pub fn collect_assets(assets_dir: &Path) -> Result<Vec<AssetFile>, AssetError> {
  let mut files = Vec::new();

  for entry in WalkDir::new(assets_dir).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|source| AssetError::Walk {
      path: assets_dir.to_path_buf(),
      source,
    })?;

    if !entry.file_type().is_file() {
      continue;
    }

    let Some(relative) = relative_path(assets_dir, entry.path())? else {
      continue;
    };

    files.push(AssetFile {
      source: entry.path().to_path_buf(),
      key: object_key(&relative),
      cache_control: cache_control_for(&relative),
      content_type: mime::from_path(entry.path()),
      relative,
    });
  }

  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::write_file;
  use tempfile::TempDir;

  #[test]
  fn next_assets_are_immutable() {
    assert_eq!(cache_control_for("_next/static/chunk.js"), CACHE_CONTROL_IMMUTABLE);
  }

  #[test]
  fn other_assets_revalidate() {
    assert_eq!(cache_control_for("favicon.ico"), CACHE_CONTROL_REVALIDATE);
    assert_eq!(cache_control_for("images/_next/logo.png"), CACHE_CONTROL_REVALIDATE);
    assert_eq!(cache_control_for("_nextish.txt"), CACHE_CONTROL_REVALIDATE);
  }

  #[test]
  fn keys_use_asset_prefix() {
    assert_eq!(object_key("_next/static/chunk.js"), "_assets/_next/static/chunk.js");
  }

  #[test]
  fn collect_walks_recursively() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "favicon.ico", "ico");
    write_file(temp_dir.path(), "_next/static/chunks/main.js", "js");
    write_file(temp_dir.path(), "images/logo.png", "png");

    let files = collect_assets(temp_dir.path()).unwrap();

    let keys: Vec<&str> = files.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(
      keys,
      vec![
        "_assets/_next/static/chunks/main.js",
        "_assets/favicon.ico",
        "_assets/images/logo.png"
      ]
    );
    assert_eq!(files[0].cache_control, CACHE_CONTROL_IMMUTABLE);
    assert_eq!(files[0].content_type, mime::types::JAVASCRIPT);
    assert_eq!(files[1].cache_control, CACHE_CONTROL_REVALIDATE);
    assert_eq!(files[1].relative, "favicon.ico");
  }

  #[cfg(target_os = "linux")]
  #[test]
  fn collect_rejects_non_utf8_paths() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "favicon.ico", "ico");
    let dir = temp_dir.path().join("images");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(OsStr::from_bytes(b"logo\xff.png")), "png").unwrap();

    let err = collect_assets(temp_dir.path()).unwrap_err();
    assert!(matches!(err, AssetError::NonUtf8Path { .. }));
  }

  #[test]
  fn collect_of_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let err = collect_assets(&temp_dir.path().join("assets")).unwrap_err();
    assert!(matches!(err, AssetError::Walk { .. }));
  }
}
