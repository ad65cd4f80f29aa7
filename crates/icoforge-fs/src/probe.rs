//! Content sniffing
//!
//! Decides whether a file can be embedded by looking at its first bytes, not
//! at its extension.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use image::ImageFormat;

/// Bytes read from the start of a file for sniffing
const SNIFF_LEN: usize = 32;

/// Guess the image format of the file at `path`
///
/// Returns `Ok(None)` if the content matches no known format.
///
/// # Errors
/// Returns error if the file cannot be opened or read
pub fn sniff_format(path: &Path) -> io::Result<Option<ImageFormat>> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(image::guess_format(&head).ok())
}

/// Check if payloads of `format` can be embedded verbatim
#[inline]
#[must_use]
pub fn is_embeddable_format(format: ImageFormat) -> bool {
    format == ImageFormat::Png
}

/// Check if the file at `path` can be embedded verbatim
///
/// Unreadable files count as not embeddable.
#[must_use]
pub fn is_embeddable(path: &Path) -> bool {
    matches!(sniff_format(path), Ok(Some(format)) if is_embeddable_format(format))
}
