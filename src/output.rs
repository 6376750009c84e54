//! Filesystem helpers for output files and directories

use crate::error::{Result, SitemapError};
use std::fs::{self, File};
use std::path::Path;

/// Create `dir` and any missing parents, applying `mode` to every directory
/// that did not exist before
pub(crate) fn ensure_dir(dir: &Path, mode: Option<u32>) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    let missing: Vec<&Path> = dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .collect();

    fs::create_dir_all(dir).map_err(|source| SitemapError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %dir.display(), created = missing.len(), "Created output directory");

    if let Some(mode) = mode {
        // innermost first: a restrictive mode on a parent must not block its children
        for created in &missing {
            set_mode(created, mode)?;
        }
    }
    Ok(())
}

/// Create (truncating) a file, creating its parent directory first
pub(crate) fn create_file(path: &Path, dir_mode: Option<u32>) -> Result<File> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent, dir_mode)?;
    }
    File::create(path).map_err(|source| SitemapError::CreateFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
pub(crate) fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
        SitemapError::Permissions {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
pub(crate) fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
