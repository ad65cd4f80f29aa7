//! Payload sources
//!
//! The core never opens files or decodes images. Everything it needs to know
//! about an image comes through [`ImageSource`]: a name for diagnostics, the
//! pixel size, the exact number of bytes to embed, and a way to read them.

use crate::dimension::Dimension;
use crate::error::SourceError;

/// Provider of one embeddable image payload
///
/// Implementations that hold an external handle (an open file, a socket)
/// give it up in [`release`](ImageSource::release). The icon set that owns a
/// source calls `release` exactly once, so implementations only need to
/// make it safe to call on an already-released source.
pub trait ImageSource {
    /// Identifier used in diagnostics and error messages (usually a path)
    fn identifier(&self) -> &str;

    /// Pixel size of the image
    fn dimension(&self) -> Dimension;

    /// Number of bytes [`read_payload`](ImageSource::read_payload) yields
    fn byte_length(&self) -> u64;

    /// Read the full payload, exactly as it will be embedded
    ///
    /// # Errors
    /// Returns error if the payload cannot be read or the source was released
    fn read_payload(&mut self) -> Result<Vec<u8>, SourceError>;

    /// Give up any held handle
    fn release(&mut self) {}

    /// Check if [`release`](ImageSource::release) has been called
    fn is_released(&self) -> bool {
        false
    }
}

impl<S: ImageSource + ?Sized> ImageSource for Box<S> {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }

    fn dimension(&self) -> Dimension {
        (**self).dimension()
    }

    fn byte_length(&self) -> u64 {
        (**self).byte_length()
    }

    fn read_payload(&mut self) -> Result<Vec<u8>, SourceError> {
        (**self).read_payload()
    }

    fn release(&mut self) {
        (**self).release();
    }

    fn is_released(&self) -> bool {
        (**self).is_released()
    }
}

/// Payload already held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    identifier: String,
    dimension: Dimension,
    data: Vec<u8>,
    released: bool,
}

impl MemorySource {
    /// Create from bytes
    #[must_use]
    pub fn new(identifier: impl Into<String>, dimension: Dimension, data: Vec<u8>) -> Self {
        Self {
            identifier: identifier.into(),
            dimension,
            data,
            released: false,
        }
    }

    /// Get reference to the payload bytes
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl ImageSource for MemorySource {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn byte_length(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_payload(&mut self) -> Result<Vec<u8>, SourceError> {
        if self.released {
            return Err(SourceError::released(&self.identifier));
        }
        Ok(self.data.clone())
    }

    fn release(&mut self) {
        self.released = true;
    }

    fn is_released(&self) -> bool {
        self.released
    }
}
