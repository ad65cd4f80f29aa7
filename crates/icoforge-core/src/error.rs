//! Error types for icon assembly
//!
//! Provides error handling for:
//! - Admission (size validation, duplicate sizes)
//! - Encoding (empty sets, 16/32-bit field limits, payload reads)
//! - Payload sources (IO, released handles, unsupported content)

use crate::dimension::Dimension;

/// Errors from a payload source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// IO error reading the payload
    #[error("io error reading {identifier}: {source}")]
    Io {
        identifier: String,
        #[source]
        source: std::io::Error,
    },

    /// Handle was already released
    #[error("source already released: {identifier}")]
    Released { identifier: String },

    /// Content is not an embeddable image
    #[error("unsupported image format in {identifier}: {format}")]
    UnsupportedFormat { identifier: String, format: String },

    /// Image header could not be decoded
    #[error("cannot decode image header of {identifier}: {message}")]
    Decode { identifier: String, message: String },
}

impl SourceError {
    /// Create IO error for a source
    pub fn io(identifier: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            identifier: identifier.into(),
            source,
        }
    }

    /// Create released error for a source
    pub fn released(identifier: impl Into<String>) -> Self {
        Self::Released {
            identifier: identifier.into(),
        }
    }

    /// Identifier of the source that failed
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Io { identifier, .. }
            | Self::Released { identifier }
            | Self::UnsupportedFormat { identifier, .. }
            | Self::Decode { identifier, .. } => identifier,
        }
    }
}

/// Main icon error type
#[derive(Debug, thiserror::Error)]
pub enum IcoError {
    /// Dimension outside the allowed size enumeration
    #[error("invalid icon size {dimension}: {identifier}")]
    InvalidSize {
        dimension: Dimension,
        identifier: String,
    },

    /// Dimension already occupied by another entry
    #[error("size {dimension} is already taken by {existing}")]
    DuplicateSize {
        dimension: Dimension,
        existing: String,
    },

    /// Encode attempted with zero entries
    #[error("an icon must contain at least one image")]
    EmptyIconSet,

    /// Count does not fit the 16-bit header field
    #[error("too many images for one icon: {count} (max {max})", max = u16::MAX)]
    TooManyImages { count: usize },

    /// Payload could not be read at encode time
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// Payload length or offset does not fit the 32-bit directory field
    #[error("payload too large for icon directory: {identifier} ({size} bytes)")]
    PayloadTooLarge { identifier: String, size: u64 },

    /// Payload changed size since admission
    #[error("payload of {identifier} is {actual} bytes, expected {expected}")]
    PayloadLengthMismatch {
        identifier: String,
        expected: u64,
        actual: u64,
    },

    /// Output writer failed
    #[error("failed to write icon: {0}")]
    Write(#[from] std::io::Error),
}

impl IcoError {
    /// Check if the error was raised while admitting an image
    #[inline]
    #[must_use]
    pub fn is_admission_error(&self) -> bool {
        matches!(self, Self::InvalidSize { .. } | Self::DuplicateSize { .. })
    }
}

/// Result type alias for icon operations
pub type IcoResult<T> = Result<T, IcoError>;
