//! ICO encoder
//!
//! Turns an ordered sequence of image sources into the exact byte stream of
//! an `.ico` file. The encoder does not sort: callers hand it entries in the
//! order they must appear, which [`IconSet`](crate::IconSet) guarantees is
//! ascending by dimension.

use std::io::Write;

use tracing::debug;

use crate::error::{IcoError, IcoResult};
use crate::format::{payload_start, DirectoryEntry, IconHeader};
use crate::source::ImageSource;

/// Stateless ICO serializer
#[derive(Debug, Default, Clone, Copy)]
pub struct IcoEncoder;

impl IcoEncoder {
    /// Compute the directory records for `sources`, in the given order
    ///
    /// Payloads are not read; offsets come from each source's
    /// [`byte_length`](ImageSource::byte_length).
    ///
    /// # Errors
    /// - [`IcoError::EmptyIconSet`] if there are no sources
    /// - [`IcoError::TooManyImages`] if the count does not fit 16 bits
    /// - [`IcoError::InvalidSize`] if an edge is outside 1..=256
    /// - [`IcoError::PayloadTooLarge`] if a length or offset does not fit 32 bits
    pub fn layout<'a, S, I>(sources: I) -> IcoResult<Vec<DirectoryEntry>>
    where
        S: ImageSource + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let sources: Vec<&S> = sources.into_iter().collect();
        if sources.is_empty() {
            return Err(IcoError::EmptyIconSet);
        }
        if u16::try_from(sources.len()).is_err() {
            return Err(IcoError::TooManyImages {
                count: sources.len(),
            });
        }

        let mut offset = payload_start(sources.len()) as u64;
        let mut directory = Vec::with_capacity(sources.len());

        for source in sources {
            let byte_length = source.byte_length();
            let length = u32::try_from(byte_length).map_err(|_| IcoError::PayloadTooLarge {
                identifier: source.identifier().to_string(),
                size: byte_length,
            })?;
            let start = u32::try_from(offset).map_err(|_| IcoError::PayloadTooLarge {
                identifier: source.identifier().to_string(),
                size: offset,
            })?;
            let entry = DirectoryEntry::full_color(source.dimension(), length, start).ok_or_else(
                || IcoError::InvalidSize {
                    dimension: source.dimension(),
                    identifier: source.identifier().to_string(),
                },
            )?;

            directory.push(entry);
            offset += byte_length;
        }

        Ok(directory)
    }

    /// Encode `sources` into a new buffer
    ///
    /// Every payload is read before anything is assembled, so a failure never
    /// yields a partial icon.
    ///
    /// # Errors
    /// Any error of [`layout`](Self::layout), plus
    /// [`IcoError::SourceUnavailable`] and [`IcoError::PayloadLengthMismatch`]
    /// when a payload read fails or disagrees with its admitted length.
    pub fn encode<'a, S, I>(sources: I) -> IcoResult<Vec<u8>>
    where
        S: ImageSource + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut S>,
    {
        let mut sources: Vec<&'a mut S> = sources.into_iter().collect();
        let directory = Self::layout(sources.iter().map(|s| &**s))?;

        let mut payloads = Vec::with_capacity(sources.len());
        for source in &mut sources {
            let data = source.read_payload()?;
            let expected = source.byte_length();
            if data.len() as u64 != expected {
                return Err(IcoError::PayloadLengthMismatch {
                    identifier: source.identifier().to_string(),
                    expected,
                    actual: data.len() as u64,
                });
            }
            payloads.push(data);
        }

        // layout() already checked the count fits
        let count = u16::try_from(directory.len()).map_err(|_| IcoError::TooManyImages {
            count: directory.len(),
        })?;

        let total = payload_start(directory.len()) + payloads.iter().map(Vec::len).sum::<usize>();
        let mut buffer = Vec::with_capacity(total);
        IconHeader::icon(count).write_to(&mut buffer)?;
        for entry in &directory {
            entry.write_to(&mut buffer)?;
        }
        for payload in &payloads {
            buffer.extend_from_slice(payload);
        }

        debug!(images = directory.len(), bytes = buffer.len(), "encoded icon");
        Ok(buffer)
    }

    /// Encode `sources` into `writer`
    ///
    /// The icon is assembled in memory first and handed to `writer` in a
    /// single `write_all`, so an encoding failure writes nothing. A writer
    /// that fails part way through `write_all` may still hold a prefix.
    /// Returns the number of bytes written.
    ///
    /// # Errors
    /// Same as [`encode`](Self::encode), plus [`IcoError::Write`] if the
    /// writer fails.
    pub fn encode_to<'a, S, I, W>(sources: I, mut writer: W) -> IcoResult<usize>
    where
        S: ImageSource + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut S>,
        W: Write,
    {
        let bytes = Self::encode(sources)?;
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }
}
