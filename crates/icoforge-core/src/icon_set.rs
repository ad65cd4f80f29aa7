//! Icon set
//!
//! Provides [`IconSet`], the collection of images that becomes one `.ico`
//! file. At most one image per [`Dimension`], only allowed dimensions, and
//! always iterated in ascending order: the ordered map keeps that invariant
//! on every insert, so encoded output is reproducible.
//!
//! An icon set owns the [`ImageSource`]s it admits. Each one is released
//! exactly once: when it is removed, when the set is closed or finished, or
//! (as a backstop) when an un-closed set is dropped.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::dimension::{Dimension, STANDARD_SIZES};
use crate::encoder::IcoEncoder;
use crate::error::{IcoError, IcoResult, SourceError};
use crate::format::DirectoryEntry;
use crate::source::ImageSource;

/// Log at info when verbose, debug otherwise
macro_rules! notice {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Icon set configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSetConfig {
    /// Dimensions an image may have
    pub allowed_sizes: BTreeSet<Dimension>,
    /// Report admissions and removals at info level
    pub verbose: bool,
}

impl IconSetConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a custom size enumeration
    ///
    /// Sizes an ICO directory cannot describe (edges outside 1..=256) are
    /// dropped.
    #[must_use]
    pub fn with_allowed_sizes(mut self, sizes: impl IntoIterator<Item = Dimension>) -> Self {
        self.allowed_sizes = sizes
            .into_iter()
            .filter(|size| {
                let fits = size.fits_ico();
                if !fits {
                    warn!(%size, "ignoring size outside the ICO range");
                }
                fits
            })
            .collect();
        self
    }

    /// With verbose diagnostics
    #[inline]
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check if a dimension may be admitted
    #[inline]
    #[must_use]
    pub fn is_allowed(&self, dimension: &Dimension) -> bool {
        self.allowed_sizes.contains(dimension)
    }
}

impl Default for IconSetConfig {
    fn default() -> Self {
        Self {
            allowed_sizes: STANDARD_SIZES.into_iter().collect(),
            verbose: false,
        }
    }
}

/// What to do when one item of a batch fails
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// Return the first error; earlier admissions stay in the set
    #[default]
    #[serde(alias = "stop")]
    StopOnFirstError,
    /// Admit everything admissible and report every failure
    #[serde(alias = "continue")]
    ContinueOnError,
}

/// Outcome of [`IconSet::add_from_directory`]
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Dimensions admitted, in listing order
    pub added: Vec<Dimension>,
    /// Failures, in listing order (only with [`BatchPolicy::ContinueOnError`])
    pub failures: Vec<IcoError>,
}

impl BatchReport {
    /// Check if every item was admitted
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One admitted image
#[derive(Debug)]
pub struct ImageEntry<S> {
    dimension: Dimension,
    source: S,
}

impl<S: ImageSource> ImageEntry<S> {
    /// Pixel size (the entry's key)
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Identifier of the payload source
    #[inline]
    #[must_use]
    pub fn source_identifier(&self) -> &str {
        self.source.identifier()
    }

    /// Payload size as it will be embedded
    #[inline]
    #[must_use]
    pub fn byte_length(&self) -> u64 {
        self.source.byte_length()
    }

    /// Get reference to the source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Images of one icon, keyed and ordered by dimension
pub struct IconSet<S: ImageSource> {
    entries: BTreeMap<Dimension, ImageEntry<S>>,
    config: IconSetConfig,
}

impl<S: ImageSource> IconSet<S> {
    /// Create an empty set with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(IconSetConfig::default())
    }

    /// Create an empty set
    #[inline]
    #[must_use]
    pub fn with_config(config: IconSetConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            config,
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &IconSetConfig {
        &self.config
    }

    /// Admit an image
    ///
    /// A rejected source is released before the error is returned.
    ///
    /// # Errors
    /// - [`IcoError::InvalidSize`] if the dimension is not allowed
    /// - [`IcoError::DuplicateSize`] if the dimension is already taken
    pub fn add(&mut self, mut source: S) -> IcoResult<&ImageEntry<S>> {
        let dimension = source.dimension();

        if !self.config.is_allowed(&dimension) {
            let identifier = source.identifier().to_string();
            source.release();
            return Err(IcoError::InvalidSize {
                dimension,
                identifier,
            });
        }

        match self.entries.entry(dimension) {
            Entry::Occupied(occupied) => {
                let existing = occupied.get().source_identifier().to_string();
                source.release();
                Err(IcoError::DuplicateSize {
                    dimension,
                    existing,
                })
            }
            Entry::Vacant(vacant) => {
                notice!(
                    self.config.verbose,
                    "added {:<10}: \"{}\"",
                    dimension.to_string(),
                    source.identifier()
                );
                Ok(vacant.insert(ImageEntry { dimension, source }))
            }
        }
    }

    /// Admit every source of a listing
    ///
    /// `listing` is usually produced by a directory scan; items that failed
    /// to open arrive as errors and count as failures.
    ///
    /// # Errors
    /// With [`BatchPolicy::StopOnFirstError`], the first failure. Entries
    /// admitted before it stay in the set.
    pub fn add_from_directory<I>(
        &mut self,
        listing: I,
        policy: BatchPolicy,
    ) -> IcoResult<BatchReport>
    where
        I: IntoIterator<Item = Result<S, SourceError>>,
    {
        let mut report = BatchReport::default();
        let mut seen = 0usize;

        for candidate in listing {
            seen += 1;
            let result = candidate
                .map_err(IcoError::from)
                .and_then(|source| self.add(source).map(ImageEntry::dimension));

            match (result, policy) {
                (Ok(dimension), _) => report.added.push(dimension),
                (Err(err), BatchPolicy::StopOnFirstError) => return Err(err),
                (Err(err), BatchPolicy::ContinueOnError) => {
                    warn!("skipping image: {err}");
                    report.failures.push(err);
                }
            }
        }

        if seen == 0 {
            warn!("listing does not contain any image");
        }
        Ok(report)
    }

    /// Remove and release the image at `dimension`
    ///
    /// Returns `false` (and changes nothing) if no image has that size.
    pub fn remove_by_size(&mut self, dimension: Dimension) -> bool {
        match self.entries.remove(&dimension) {
            Some(mut entry) => {
                entry.source.release();
                notice!(self.config.verbose, "removed size: {dimension}");
                true
            }
            None => {
                notice!(
                    self.config.verbose,
                    "size {dimension} not present: cannot remove"
                );
                false
            }
        }
    }

    /// Remove and release the first image whose source matches `identifier`
    ///
    /// Returns `false` (and changes nothing) if no source matches.
    pub fn remove_by_source(&mut self, identifier: &str) -> bool {
        let key = self
            .entries
            .values()
            .find(|entry| entry.source_identifier() == identifier)
            .map(ImageEntry::dimension);

        match key.and_then(|dimension| self.entries.remove(&dimension)) {
            Some(mut entry) => {
                entry.source.release();
                notice!(self.config.verbose, "removed: \"{identifier}\"");
                true
            }
            None => {
                notice!(self.config.verbose, "source not present: {identifier}");
                false
            }
        }
    }

    /// Get entry at `dimension`
    #[inline]
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> Option<&ImageEntry<S>> {
        self.entries.get(&dimension)
    }

    /// Identifier of the source at `dimension`
    #[inline]
    #[must_use]
    pub fn source_for_size(&self, dimension: Dimension) -> Option<&str> {
        self.get(dimension).map(ImageEntry::source_identifier)
    }

    /// Check if an image has `dimension`
    #[inline]
    #[must_use]
    pub fn contains(&self, dimension: Dimension) -> bool {
        self.entries.contains_key(&dimension)
    }

    /// Number of images
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set has no image
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Allowed sizes that have no image yet
    ///
    /// Informational: an icon does not need every size.
    #[must_use]
    pub fn missing_sizes(&self) -> BTreeSet<Dimension> {
        self.config
            .allowed_sizes
            .iter()
            .filter(|size| !self.entries.contains_key(size))
            .copied()
            .collect()
    }

    /// Entries in ascending dimension order
    pub fn entries_sorted(&self) -> impl ExactSizeIterator<Item = &ImageEntry<S>> + '_ {
        self.entries.values()
    }

    /// Dimensions in ascending order
    pub fn dimensions(&self) -> impl ExactSizeIterator<Item = Dimension> + '_ {
        self.entries.keys().copied()
    }

    /// Directory records the encoder would emit, without reading payloads
    ///
    /// # Errors
    /// Same as [`IcoEncoder::layout`]
    pub fn layout(&self) -> IcoResult<Vec<DirectoryEntry>> {
        IcoEncoder::layout(self.entries.values().map(ImageEntry::source))
    }

    /// Encode the set into `.ico` bytes
    ///
    /// Sources stay open, so encoding again yields identical bytes.
    ///
    /// # Errors
    /// Same as [`IcoEncoder::encode`]
    pub fn encode(&mut self) -> IcoResult<Vec<u8>> {
        IcoEncoder::encode(self.entries.values_mut().map(|entry| &mut entry.source))
    }

    /// Encode the set into `writer`, returning the number of bytes written
    ///
    /// # Errors
    /// Same as [`IcoEncoder::encode_to`]
    pub fn encode_to<W: Write>(&mut self, writer: W) -> IcoResult<usize> {
        IcoEncoder::encode_to(
            self.entries.values_mut().map(|entry| &mut entry.source),
            writer,
        )
    }

    /// Encode, then close the set
    ///
    /// Sources are released whether or not encoding succeeds.
    ///
    /// # Errors
    /// Same as [`encode`](Self::encode)
    pub fn finish(mut self) -> IcoResult<Vec<u8>> {
        let result = self.encode();
        self.release_all();
        result
    }

    /// Release every source and tear the set down
    ///
    /// Returns the number of sources released.
    pub fn close(mut self) -> usize {
        self.release_all()
    }

    fn release_all(&mut self) -> usize {
        let entries = std::mem::take(&mut self.entries);
        let count = entries.len();
        for (_, mut entry) in entries {
            if self.config.verbose {
                trace!("closing source: \"{}\"", entry.source_identifier());
            }
            entry.source.release();
        }
        count
    }
}

impl<S: ImageSource> Default for IconSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ImageSource> Drop for IconSet<S> {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            let released = self.release_all();
            debug!(released, "icon set dropped without close");
        }
    }
}

impl<S: ImageSource> fmt::Debug for IconSet<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconSet")
            .field("sizes", &self.entries.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

impl<S: ImageSource> Display for IconSet<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for entry in self.entries.values() {
            writeln!(
                f,
                "  {}: \"{}\"",
                entry.dimension(),
                entry.source_identifier()
            )?;
        }
        write!(f, "}}")
    }
}
