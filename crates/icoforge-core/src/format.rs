//! ICO wire format
//!
//! ```text
//! offset   size   field
//! 0        2      reserved (0)
//! 2        2      image type (1 = icon)
//! 4        2      image count
//! 6        16*N   directory entries
//! 6+16N    ...    payloads, in directory order
//! ```
//!
//! All multi-byte fields are little-endian.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::dimension::{Dimension, MAX_EDGE};

/// Size of the file header in bytes
pub const HEADER_SIZE: usize = 6;

/// Size of one directory entry in bytes
pub const DIRECTORY_ENTRY_SIZE: usize = 16;

/// Image type field value for icons (cursors use 2)
pub const ICON_TYPE: u16 = 1;

/// Color planes written for every entry
pub const COLOR_PLANES: u16 = 1;

/// Bits per pixel written for every entry
pub const BITS_PER_PIXEL: u16 = 32;

/// Offset of the first payload for `count` images
#[inline]
#[must_use]
pub const fn payload_start(count: usize) -> usize {
    HEADER_SIZE + count * DIRECTORY_ENTRY_SIZE
}

/// Encode one edge into its directory byte. 256 is stored as 0.
#[inline]
#[must_use]
pub fn edge_to_byte(edge: u32) -> Option<u8> {
    if edge == MAX_EDGE {
        Some(0)
    } else {
        u8::try_from(edge).ok().filter(|b| *b != 0)
    }
}

/// Decode one directory byte into an edge. 0 means 256.
#[inline]
#[must_use]
pub fn byte_to_edge(byte: u8) -> u32 {
    if byte == 0 {
        MAX_EDGE
    } else {
        u32::from(byte)
    }
}

/// The 6-byte file header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconHeader {
    /// Must be 0
    pub reserved: u16,
    /// 1 for icons
    pub image_type: u16,
    /// Number of directory entries
    pub count: u16,
}

impl IconHeader {
    /// Header for an icon with `count` images
    #[inline]
    #[must_use]
    pub const fn icon(count: u16) -> Self {
        Self {
            reserved: 0,
            image_type: ICON_TYPE,
            count,
        }
    }

    /// Write the header
    ///
    /// # Errors
    /// Returns error if the writer fails
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(self.reserved)?;
        writer.write_u16::<LittleEndian>(self.image_type)?;
        writer.write_u16::<LittleEndian>(self.count)
    }

    /// Read a header
    ///
    /// # Errors
    /// Returns error if fewer than 6 bytes are available
    pub fn read_from<R: Read>(mut reader: R) -> io::Result<Self> {
        Ok(Self {
            reserved: reader.read_u16::<LittleEndian>()?,
            image_type: reader.read_u16::<LittleEndian>()?,
            count: reader.read_u16::<LittleEndian>()?,
        })
    }
}

/// One 16-byte directory record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    /// Width byte (0 means 256)
    pub width: u8,
    /// Height byte (0 means 256)
    pub height: u8,
    /// Palette color count, 0 without palette
    pub palette_colors: u8,
    /// Must be 0
    pub reserved: u8,
    /// Color planes
    pub color_planes: u16,
    /// Bits per pixel
    pub bits_per_pixel: u16,
    /// Payload length in bytes
    pub length: u32,
    /// Absolute payload offset from the start of the file
    pub offset: u32,
}

impl DirectoryEntry {
    /// Full-color entry for an image of `dimension`
    ///
    /// Returns `None` if an edge is outside 1..=256.
    #[must_use]
    pub fn full_color(dimension: Dimension, length: u32, offset: u32) -> Option<Self> {
        Some(Self {
            width: edge_to_byte(dimension.width)?,
            height: edge_to_byte(dimension.height)?,
            palette_colors: 0,
            reserved: 0,
            color_planes: COLOR_PLANES,
            bits_per_pixel: BITS_PER_PIXEL,
            length,
            offset,
        })
    }

    /// Pixel size described by the width and height bytes
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        Dimension::new(byte_to_edge(self.width), byte_to_edge(self.height))
    }

    /// Offset one past the payload's last byte
    #[inline]
    #[must_use]
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }

    /// Write the 16-byte record
    ///
    /// # Errors
    /// Returns error if the writer fails
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u8(self.width)?;
        writer.write_u8(self.height)?;
        writer.write_u8(self.palette_colors)?;
        writer.write_u8(self.reserved)?;
        writer.write_u16::<LittleEndian>(self.color_planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.length)?;
        writer.write_u32::<LittleEndian>(self.offset)
    }

    /// Read a 16-byte record
    ///
    /// # Errors
    /// Returns error if fewer than 16 bytes are available
    pub fn read_from<R: Read>(mut reader: R) -> io::Result<Self> {
        Ok(Self {
            width: reader.read_u8()?,
            height: reader.read_u8()?,
            palette_colors: reader.read_u8()?,
            reserved: reader.read_u8()?,
            color_planes: reader.read_u16::<LittleEndian>()?,
            bits_per_pixel: reader.read_u16::<LittleEndian>()?,
            length: reader.read_u32::<LittleEndian>()?,
            offset: reader.read_u32::<LittleEndian>()?,
        })
    }
}
