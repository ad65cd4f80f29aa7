//! Icon dimensions
//!
//! Provides [`Dimension`], the `(width, height)` key of an icon set, and the
//! standard size enumeration Windows expects to find in an `.ico` file.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pixel size of one icon image
///
/// Ordered lexicographically by `(width, height)`, which is the order
/// entries appear in an encoded file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Dimension {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Sizes Windows looks for when picking an icon image.
///
/// The container itself accepts anything from 1x1 to 256x256.
pub const STANDARD_SIZES: [Dimension; 10] = [
    Dimension::square(16),
    Dimension::square(20),
    Dimension::square(24),
    Dimension::square(32),
    Dimension::square(40),
    Dimension::square(48),
    Dimension::square(64),
    Dimension::square(96),
    Dimension::square(128),
    Dimension::square(256),
];

/// Largest edge an ICO directory entry can describe
pub const MAX_EDGE: u32 = 256;

impl Dimension {
    /// Create a dimension
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Create an `n x n` dimension
    #[inline]
    #[must_use]
    pub const fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    /// Check if width equals height
    #[inline]
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Check if this is one of [`STANDARD_SIZES`]
    #[must_use]
    pub fn is_standard(&self) -> bool {
        STANDARD_SIZES.contains(self)
    }

    /// Check if both edges fit an ICO directory entry (1..=256)
    #[inline]
    #[must_use]
    pub const fn fits_ico(&self) -> bool {
        self.width >= 1 && self.width <= MAX_EDGE && self.height >= 1 && self.height <= MAX_EDGE
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimension {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Parses `WxH` (also `WXH`), or a bare `N` meaning `NxN`.
impl FromStr for Dimension {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DimensionError::Empty);
        }

        let parse_edge = |part: &str| -> Result<u32, DimensionError> {
            let edge: u32 = part
                .trim()
                .parse()
                .map_err(|_| DimensionError::InvalidNumber(part.trim().to_string()))?;
            if edge == 0 {
                return Err(DimensionError::Zero);
            }
            Ok(edge)
        };

        match s.split_once(['x', 'X']) {
            Some((w, h)) => Ok(Self::new(parse_edge(w)?, parse_edge(h)?)),
            None => Ok(Self::square(parse_edge(s)?)),
        }
    }
}

/// Errors parsing a [`Dimension`] from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    /// Empty input
    #[error("dimension cannot be empty")]
    Empty,

    /// A side is not a number
    #[error("invalid number in dimension: '{0}'")]
    InvalidNumber(String),

    /// A side is zero
    #[error("dimension sides must be positive")]
    Zero,
}
