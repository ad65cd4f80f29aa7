//! Directory enumeration
//!
//! Lists the embeddable images of a directory. Membership is decided by file
//! content, so `logo.dat` holding PNG bytes is picked up and `notes.png`
//! holding text is not.

use std::path::{Path, PathBuf};

use icoforge_core::SourceError;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{FsError, FsResult};
use crate::file_source::FileSource;
use crate::probe::is_embeddable;

/// Scanner configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanConfig {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Follow symbolic links while walking
    pub follow_links: bool,
}

impl ScanConfig {
    /// Create default configuration (top level only, links not followed)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With recursion on or off
    #[inline]
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// With symlink following on or off
    #[inline]
    #[must_use]
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}

/// Finds embeddable images in a directory
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    config: ScanConfig,
}

impl DirectoryScanner {
    /// Create scanner with config
    #[inline]
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Get config
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Paths of embeddable images under `dir`, sorted
    ///
    /// Entries that cannot be read while walking are skipped with a debug
    /// message.
    ///
    /// # Errors
    /// Returns [`FsError::NotADirectory`] if `dir` is not a directory
    pub fn scan(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(FsError::NotADirectory(dir.to_path_buf()));
        }

        let mut walker = WalkDir::new(dir)
            .follow_links(self.config.follow_links)
            .sort_by_file_name();
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        let mut paths: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!("skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(is_file_or_link_to_file)
            .map(walkdir::DirEntry::into_path)
            .filter(|path| is_embeddable(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            warn!("directory does not contain any image: {}", dir.display());
        } else {
            debug!("found {} image(s) in {}", paths.len(), dir.display());
        }
        Ok(paths)
    }

    /// Open every image found by [`scan`](Self::scan)
    ///
    /// Files are opened lazily as the iterator is consumed, so a stopped
    /// batch does not leave handles open.
    ///
    /// # Errors
    /// Same as [`scan`](Self::scan)
    pub fn open_all(
        &self,
        dir: &Path,
    ) -> FsResult<impl Iterator<Item = Result<FileSource, SourceError>>> {
        Ok(self.scan(dir)?.into_iter().map(FileSource::open))
    }
}

/// Regular files, and symlinks whose target is a regular file
///
/// Without `follow_links` walkdir reports a link's own type, so the target is
/// checked here. Links to directories are still not descended into.
fn is_file_or_link_to_file(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use icoforge_test_utils::write_png;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_png(dir.path(), "icon.png", 16, 16);
        let scanner = DirectoryScanner::default();
        assert!(matches!(
            scanner.scan(&file),
            Err(FsError::NotADirectory(path)) if path == file
        ));
    }

    #[test]
    fn picks_images_by_content() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png", 32, 32);
        write_png(dir.path(), "a.dat", 16, 16);
        std::fs::write(dir.path().join("notes.png"), b"not an image").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"hello").unwrap();

        let paths = DirectoryScanner::default().scan(dir.path()).unwrap();
        assert_eq!(
            paths,
            vec![dir.path().join("a.dat"), dir.path().join("b.png")]
        );
    }

    #[test]
    fn top_level_only_by_default() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "top.png", 16, 16);
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        write_png(&nested, "deep.png", 32, 32);

        let flat = DirectoryScanner::default().scan(dir.path()).unwrap();
        assert_eq!(flat, vec![dir.path().join("top.png")]);

        let scanner = DirectoryScanner::new(ScanConfig::new().with_recursive(true));
        let deep = scanner.scan(dir.path()).unwrap();
        assert_eq!(deep.len(), 2);
        assert!(deep.contains(&nested.join("deep.png")));
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DirectoryScanner::default().scan(dir.path()).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn open_all_yields_sources() {
        use icoforge_core::ImageSource;

        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "16.png", 16, 16);
        write_png(dir.path(), "48.png", 48, 48);

        let sources: Vec<FileSource> = DirectoryScanner::default()
            .open_all(dir.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let edges: Vec<u32> = sources.iter().map(|s| s.dimension().width).collect();
        assert_eq!(edges, vec![16, 48]);
    }
}
