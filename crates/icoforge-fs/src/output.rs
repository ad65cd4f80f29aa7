//! Icon output

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{FsError, FsResult};

/// What [`write_icon`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Final path of the icon
    pub path: PathBuf,
    /// Bytes written
    pub bytes: usize,
    /// The extension was something other than `.ico`
    pub non_ico_extension: bool,
}

/// Write encoded icon bytes to `path`
///
/// Missing parent directories are created. Bytes go to a sibling temporary
/// file first and are renamed into place, so a failed write never leaves a
/// truncated icon behind.
///
/// # Errors
/// - [`FsError::MissingExtension`] if `path` has no extension
/// - [`FsError::Io`] if a directory, the temporary file or the rename fails
pub fn write_icon(path: impl AsRef<Path>, data: &[u8]) -> FsResult<WriteOutcome> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| FsError::MissingExtension(path.to_path_buf()))?;

    let non_ico_extension = !extension.eq_ignore_ascii_case("ico");
    if non_ico_extension {
        warn!(
            "output file extension is .{extension}, it should be .ico: {}",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!("creating directory: {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e))?;
        }
    }

    let temp = path.with_extension(format!("{extension}.tmp"));
    if let Err(err) = fs::write(&temp, data) {
        let _ = fs::remove_file(&temp);
        return Err(FsError::io(&temp, err));
    }
    if let Err(err) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(FsError::io(path, err));
    }

    info!("written: {} ({} bytes)", path.display(), data.len());

    Ok(WriteOutcome {
        path: path.to_path_buf(),
        bytes: data.len(),
        non_ico_extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.ico");

        let outcome = write_icon(&path, &[1, 2, 3]).unwrap();
        assert_eq!(
            outcome,
            WriteOutcome {
                path: path.clone(),
                bytes: 3,
                non_ico_extension: false,
            }
        );
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);
        assert!(!path.with_extension("ico.tmp").exists());
    }

    #[test]
    fn extension_check_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = write_icon(dir.path().join("APP.ICO"), &[0]).unwrap();
        assert!(!outcome.non_ico_extension);
    }

    #[test]
    fn other_extension_still_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.png");
        let outcome = write_icon(&path, &[9]).unwrap();
        assert!(outcome.non_ico_extension);
        assert_eq!(fs::read(&path).unwrap(), vec![9]);
    }

    #[test]
    fn missing_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app");
        assert!(matches!(
            write_icon(&path, &[0]),
            Err(FsError::MissingExtension(p)) if p == path
        ));
        assert!(!path.exists());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build").join("icons").join("app.ico");
        write_icon(&path, &[0, 0, 1, 0]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![0, 0, 1, 0]);
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.ico");
        fs::write(&path, b"old contents").unwrap();
        write_icon(&path, &[7, 7]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![7, 7]);
    }
}
