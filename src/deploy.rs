//! Moving a finished download into its deployment directory.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A download staged at `<temp dir>/giteafetch-XXXX/<asset name>`.
///
/// The staging directory is private to this guard and removed with
/// everything in it when the guard is dropped, so files that already sat
/// in `temp_dir` are never touched. [`TempDownload::deploy`] moves the file
/// out first on success.
#[derive(Debug)]
pub struct TempDownload {
    dir: TempDir,
    path: PathBuf,
}

impl TempDownload {
    /// Create a fresh staging directory for `asset_name` inside `temp_dir`.
    pub fn new(temp_dir: &Path, asset_name: &str) -> Result<Self> {
        check_file_name(asset_name)?;
        let dir = tempfile::Builder::new()
            .prefix("giteafetch-")
            .tempdir_in(temp_dir)
            .map_err(|e| Error::fs("error creating staging directory in", temp_dir, e))?;
        let path = dir.path().join(asset_name);
        debug!(path = %path.display(), "staging download");
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Relocate the staged file to `destination_dir/asset_name`.
    pub fn deploy(self, destination_dir: &Path, asset_name: &str) -> Result<PathBuf> {
        let final_path = deploy(&self.path, destination_dir, asset_name)?;
        self.close();
        Ok(final_path)
    }

    fn close(self) {
        let dir = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!(path = %dir.display(), error = %e, "could not remove staging directory");
        }
    }
}

/// Reject asset names that would resolve outside the directory they are
/// joined onto, such as `../x`, `/etc/x` or `a/b`.
pub fn check_file_name(asset_name: &str) -> Result<()> {
    if Path::new(asset_name).file_name() == Some(OsStr::new(asset_name)) {
        Ok(())
    } else {
        Err(Error::InvalidAssetName {
            asset: asset_name.to_owned(),
        })
    }
}

/// Create `destination_dir` if needed and move `source` to
/// `destination_dir/asset_name`.
///
/// A rename across filesystems falls back to copy then remove.
pub fn deploy(source: &Path, destination_dir: &Path, asset_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(destination_dir)
        .map_err(|e| Error::fs("error creating deploy directory", destination_dir, e))?;

    let final_path = destination_dir.join(asset_name);
    match std::fs::rename(source, &final_path) {
        Ok(()) => {
            debug!(from = %source.display(), to = %final_path.display(), "renamed");
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(from = %source.display(), to = %final_path.display(), "cross-device, copying");
            copy_then_remove(source, &final_path)?;
        }
        Err(e) => return Err(Error::fs("error deploying file to", &final_path, e)),
    }
    Ok(final_path)
}

fn copy_then_remove(source: &Path, dest: &Path) -> Result<()> {
    if let Err(e) = std::fs::copy(source, dest) {
        let _ = std::fs::remove_file(dest);
        return Err(Error::fs("error copying file to", dest, e));
    }
    std::fs::remove_file(source).map_err(|e| Error::fs("error removing", source, e))
}
