//! ICO reader
//!
//! Parses the header and directory of an `.ico` byte stream and slices out
//! payloads. Payload bytes are returned as-is; nothing is decoded.

use serde::Serialize;

use crate::dimension::Dimension;
use crate::format::{payload_start, DirectoryEntry, IconHeader, HEADER_SIZE, ICON_TYPE};

/// Errors parsing an ICO byte stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// Input ends before the header or directory does
    #[error("truncated icon: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    /// Reserved header field is not zero
    #[error("reserved header field must be 0, got {0}")]
    InvalidReserved(u16),

    /// Image type is not "icon"
    #[error("not an icon file: image type {image_type}")]
    NotAnIcon { image_type: u16 },

    /// Directory points outside the input
    #[error("payload {index} at offset {offset} with length {length} is out of bounds")]
    PayloadOutOfBounds { index: usize, offset: u32, length: u32 },
}

/// A parsed icon, borrowing the input bytes
#[derive(Debug, Clone)]
pub struct IcoReader<'a> {
    data: &'a [u8],
    header: IconHeader,
    entries: Vec<DirectoryEntry>,
}

impl<'a> IcoReader<'a> {
    /// Parse header and directory, checking every payload lies inside `data`
    ///
    /// # Errors
    /// Returns error if the header is malformed, the directory is truncated,
    /// or a payload range falls outside the input
    pub fn parse(data: &'a [u8]) -> Result<Self, ReadError> {
        if data.len() < HEADER_SIZE {
            return Err(ReadError::Truncated {
                needed: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let header = IconHeader::read_from(data).map_err(|_| ReadError::Truncated {
            needed: HEADER_SIZE,
            actual: data.len(),
        })?;
        if header.reserved != 0 {
            return Err(ReadError::InvalidReserved(header.reserved));
        }
        if header.image_type != ICON_TYPE {
            return Err(ReadError::NotAnIcon {
                image_type: header.image_type,
            });
        }

        let count = usize::from(header.count);
        let directory_end = payload_start(count);
        if data.len() < directory_end {
            return Err(ReadError::Truncated {
                needed: directory_end,
                actual: data.len(),
            });
        }

        let mut entries = Vec::with_capacity(count);
        let mut cursor = &data[HEADER_SIZE..directory_end];
        for index in 0..count {
            let entry = DirectoryEntry::read_from(&mut cursor).map_err(|_| ReadError::Truncated {
                needed: directory_end,
                actual: data.len(),
            })?;
            if entry.end() > data.len() as u64 {
                return Err(ReadError::PayloadOutOfBounds {
                    index,
                    offset: entry.offset,
                    length: entry.length,
                });
            }
            entries.push(entry);
        }

        Ok(Self {
            data,
            header,
            entries,
        })
    }

    /// Get the header
    #[inline]
    #[must_use]
    pub fn header(&self) -> &IconHeader {
        &self.header
    }

    /// Number of images declared by the header
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Directory records in file order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Payload bytes of entry `index`
    #[must_use]
    pub fn payload(&self, index: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(index)?;
        let start = entry.offset as usize;
        self.data.get(start..start + entry.length as usize)
    }

    /// Dimensions in file order
    pub fn dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.entries.iter().map(DirectoryEntry::dimension)
    }

    /// Summary suitable for display or JSON output
    #[must_use]
    pub fn summary(&self) -> IconSummary {
        IconSummary {
            count: self.count(),
            total_bytes: self.data.len(),
            images: self
                .entries
                .iter()
                .map(|entry| ImageSummary {
                    dimension: entry.dimension(),
                    bits_per_pixel: entry.bits_per_pixel,
                    length: entry.length,
                    offset: entry.offset,
                })
                .collect(),
        }
    }
}

/// Description of one parsed icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconSummary {
    /// Number of images
    pub count: usize,
    /// Size of the whole file
    pub total_bytes: usize,
    /// Images in file order
    pub images: Vec<ImageSummary>,
}

/// Description of one image in a parsed icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    /// Pixel size
    pub dimension: Dimension,
    /// Bits per pixel
    pub bits_per_pixel: u16,
    /// Payload length
    pub length: u32,
    /// Absolute payload offset
    pub offset: u32,
}
