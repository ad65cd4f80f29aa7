//! icoforge filesystem collaborators
//!
//! Everything that touches disk: PNG files as [`ImageSource`]s, directory
//! enumeration by content, and writing the encoded icon.
//!
//! [`ImageSource`]: icoforge_core::ImageSource

#![warn(unreachable_pub)]

mod error;
mod file_source;
mod output;
mod scanner;

/// Content sniffing
pub mod probe;

pub use error::{FsError, FsResult};
pub use file_source::FileSource;
pub use output::{write_icon, WriteOutcome};
pub use scanner::{DirectoryScanner, ScanConfig};
