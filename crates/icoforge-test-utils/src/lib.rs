//! Testing utilities for icoforge workspace
//!
//! Shared test helpers, fixtures, and sources.

#![allow(missing_docs)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use icoforge_core::{Dimension, ImageSource, MemorySource, SourceError};
use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};

/// Encode a solid-color PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img: RgbaImage = ImageBuffer::from_pixel(width, height, Rgba([0x20, 0x80, 0xF0, 0xFF]));

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .expect("Failed to write PNG to memory");
    png
}

/// Write a PNG fixture into `dir` and return its path
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height)).expect("Failed to write PNG fixture");
    path
}

/// In-memory `edge x edge` source whose payload is `len` copies of `edge as u8`
pub fn memory_image(edge: u32, len: usize) -> MemorySource {
    MemorySource::new(
        format!("memory_{edge}x{edge}"),
        Dimension::square(edge),
        vec![edge as u8; len],
    )
}

/// Source that counts how often it is released
#[derive(Debug)]
pub struct TrackedSource {
    inner: MemorySource,
    releases: Arc<AtomicUsize>,
}

impl TrackedSource {
    pub fn new(edge: u32, len: usize, releases: &Arc<AtomicUsize>) -> Self {
        Self {
            inner: memory_image(edge, len),
            releases: Arc::clone(releases),
        }
    }

    pub fn named(identifier: &str, edge: u32, releases: &Arc<AtomicUsize>) -> Self {
        Self {
            inner: MemorySource::new(identifier, Dimension::square(edge), vec![0; 8]),
            releases: Arc::clone(releases),
        }
    }
}

impl ImageSource for TrackedSource {
    fn identifier(&self) -> &str {
        self.inner.identifier()
    }

    fn dimension(&self) -> Dimension {
        self.inner.dimension()
    }

    fn byte_length(&self) -> u64 {
        self.inner.byte_length()
    }

    fn read_payload(&mut self) -> Result<Vec<u8>, SourceError> {
        self.inner.read_payload()
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.inner.release();
    }

    fn is_released(&self) -> bool {
        self.inner.is_released()
    }
}

/// Fresh release counter
pub fn release_counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

/// Current value of a release counter
pub fn releases(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
