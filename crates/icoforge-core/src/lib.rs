//! icoforge core
//!
//! In-memory icon model and byte-exact ICO serializer.
//!
//! # Core Concepts
//!
//! - [`IconSet`]: images keyed by [`Dimension`], validated on admission and
//!   always ordered ascending
//! - [`ImageSource`]: where a payload comes from (file, memory, ...)
//! - [`IcoEncoder`]: header + directory + payload block, offsets included
//! - [`IcoReader`]: parses an encoded icon back into its directory
//!
//! # Example
//!
//! ```rust
//! use icoforge_core::{Dimension, IconSet, MemorySource};
//!
//! let mut icon = IconSet::new();
//! icon.add(MemorySource::new("16.png", Dimension::square(16), vec![0; 100]))?;
//! icon.add(MemorySource::new("32.png", Dimension::square(32), vec![0; 200]))?;
//!
//! let bytes = icon.finish()?;
//! assert_eq!(bytes.len(), 6 + 2 * 16 + 100 + 200);
//! # Ok::<(), icoforge_core::IcoError>(())
//! ```

#![warn(unreachable_pub)]

// Core modules
mod dimension;
mod encoder;
mod error;
mod icon_set;
mod reader;
mod source;

/// Wire format constants and records
pub mod format;

// Re-exports
pub use dimension::{Dimension, DimensionError, MAX_EDGE, STANDARD_SIZES};
pub use encoder::IcoEncoder;
pub use error::{IcoError, IcoResult, SourceError};
pub use format::{DirectoryEntry, IconHeader};
pub use icon_set::{BatchPolicy, BatchReport, IconSet, IconSetConfig, ImageEntry};
pub use reader::{IconSummary, IcoReader, ImageSummary, ReadError};
pub use source::{ImageSource, MemorySource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
