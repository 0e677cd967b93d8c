//! Top-level listing of the static asset directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DistributionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
  File,
  Directory,
}

/// One top-level entry of the static asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
  pub name: String,
  pub kind: AssetKind,
}

impl AssetEntry {
  pub fn file(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: AssetKind::File,
    }
  }

  pub fn directory(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: AssetKind::Directory,
    }
  }

  /// CDN path pattern matching this entry: `name` for files, `name/*` for directories.
  pub fn path_pattern(&self) -> String {
    match self.kind {
      AssetKind::File => self.name.clone(),
      AssetKind::Directory => format!("{}/*", self.name),
    }
  }
}

/// List the top level of `dir`.
///
/// Entries are sorted by name so repeated scans of the same directory yield
/// the same manifest. Symlinks are classified by their target.
pub fn scan_asset_manifest(dir: &Path) -> Result<Vec<AssetEntry>, DistributionError> {
  let scan_err = |source| DistributionError::ScanAssets {
    path: PathBuf::from(dir),
    source,
  };

  let mut entries = Vec::new();
  for entry in fs::read_dir(dir).map_err(scan_err)? {
    let entry = entry.map_err(scan_err)?;
    // Path patterns must match the name on disk byte for byte.
    let name = entry
      .file_name()
      .into_string()
      .map_err(|_| DistributionError::NonUtf8Name { path: entry.path() })?;
    let kind = if entry.path().is_dir() {
      AssetKind::Directory
    } else {
      AssetKind::File
    };
    entries.push(AssetEntry { name, kind });
  }

  entries.sort_by(|a, b| a.name.cmp(&b.name));
  debug!(dir = %dir.display(), count = entries.len(), "scanned asset manifest");

  Ok(entries)
}
