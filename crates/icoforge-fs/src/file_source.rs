//! File-backed image source

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use icoforge_core::{Dimension, ImageSource, SourceError};
use image::{ImageFormat, ImageReader};
use tracing::trace;

use crate::probe::is_embeddable_format;

/// A PNG file whose bytes are embedded verbatim
///
/// The file stays open from [`open`](FileSource::open) until
/// [`release`](ImageSource::release), so the payload read at encode time is
/// the one that was validated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    identifier: String,
    dimension: Dimension,
    byte_length: u64,
    file: Option<File>,
}

impl FileSource {
    /// Open `path`, sniff its format and read its pixel size
    ///
    /// # Errors
    /// - [`SourceError::Io`] if the file cannot be opened or inspected
    /// - [`SourceError::UnsupportedFormat`] if the content is not PNG
    /// - [`SourceError::Decode`] if the PNG header is malformed
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let identifier = path.display().to_string();

        let mut file = File::open(path).map_err(|e| SourceError::io(&identifier, e))?;
        let metadata = file.metadata().map_err(|e| SourceError::io(&identifier, e))?;
        if !metadata.is_file() {
            return Err(SourceError::io(
                &identifier,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let reader = ImageReader::new(BufReader::new(&mut file))
            .with_guessed_format()
            .map_err(|e| SourceError::io(&identifier, e))?;

        match reader.format() {
            Some(format) if is_embeddable_format(format) => {}
            other => {
                return Err(SourceError::UnsupportedFormat {
                    identifier,
                    format: other.map_or_else(|| "unknown".to_string(), format_name),
                });
            }
        }

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| SourceError::Decode {
                identifier: identifier.clone(),
                message: e.to_string(),
            })?;

        trace!("opened file: \"{identifier}\" ({width}x{height})");

        Ok(Self {
            path: path.to_path_buf(),
            identifier,
            dimension: Dimension::new(width, height),
            byte_length: metadata.len(),
            file: Some(file),
        })
    }

    /// Path the source was opened from
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map_or_else(|| format!("{format:?}"), |ext| ext.to_uppercase())
}

impl ImageSource for FileSource {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn byte_length(&self) -> u64 {
        self.byte_length
    }

    fn read_payload(&mut self) -> Result<Vec<u8>, SourceError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| SourceError::released(&self.identifier))?;

        file.seek(SeekFrom::Start(0))
            .map_err(|e| SourceError::io(&self.identifier, e))?;

        let mut data = Vec::with_capacity(usize::try_from(self.byte_length).unwrap_or(0));
        file.read_to_end(&mut data)
            .map_err(|e| SourceError::io(&self.identifier, e))?;
        Ok(data)
    }

    fn release(&mut self) {
        if self.file.take().is_some() {
            trace!("closing file: \"{}\"", self.identifier);
        }
    }

    fn is_released(&self) -> bool {
        self.file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icoforge_test_utils::{png_bytes, write_png};

    #[test]
    fn open_reads_dimension_and_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "icon_32.png", 32, 32);

        let mut source = FileSource::open(&path).unwrap();
        assert_eq!(source.dimension(), Dimension::square(32));
        assert_eq!(source.byte_length(), png_bytes(32, 32).len() as u64);
        assert_eq!(source.path(), path.as_path());
        assert_eq!(source.read_payload().unwrap(), std::fs::read(&path).unwrap());
    }

    #[test]
    fn read_payload_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "icon.png", 16, 16);
        let mut source = FileSource::open(&path).unwrap();
        let first = source.read_payload().unwrap();
        let second = source.read_payload().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn released_source_fails_to_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "icon.png", 16, 16);
        let mut source = FileSource::open(&path).unwrap();

        source.release();
        assert!(source.is_released());
        assert!(matches!(
            source.read_payload(),
            Err(SourceError::Released { .. })
        ));

        // Releasing again is harmless
        source.release();
        assert!(source.is_released());
    }

    #[test]
    fn rejects_non_png_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"plain text, not pixels").unwrap();
        assert!(matches!(
            FileSource::open(&path),
            Err(SourceError::UnsupportedFormat { format, .. }) if format == "unknown"
        ));
    }

    #[test]
    fn rejects_other_image_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.gif");
        std::fs::write(&path, b"GIF89a\x10\x00\x10\x00\x00\x00\x00").unwrap();
        assert!(matches!(
            FileSource::open(&path),
            Err(SourceError::UnsupportedFormat { format, .. }) if format == "GIF"
        ));
    }

    #[test]
    fn rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileSource::open(dir.path().join("absent.png")),
            Err(SourceError::Io { .. })
        ));
    }

    #[test]
    fn rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileSource::open(dir.path()),
            Err(SourceError::Io { .. })
        ));
    }
}
