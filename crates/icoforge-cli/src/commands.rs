//! Subcommand implementations
//!
//! Each command returns what it produced instead of printing, so `main` owns
//! stdout and the tests can look at the result.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use icoforge_core::{
    BatchPolicy, Dimension, IcoError, IcoReader, IconSet, IconSetConfig, IconSummary,
    STANDARD_SIZES,
};
use icoforge_fs::{write_icon, DirectoryScanner, FileSource, ScanConfig};
use tracing::{info, warn};

/// Inputs of `icoforge build`
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// One directory, or any number of image files
    pub inputs: Vec<PathBuf>,
    /// Icon path
    pub output: PathBuf,
    /// Scan the directory recursively
    pub recursive: bool,
    /// Failure handling for the batch
    pub policy: BatchPolicy,
    /// Standard sizes to leave out of the allowed set
    pub skip_sizes: Vec<Dimension>,
    /// Report admissions at info level
    pub verbose: bool,
}

/// What `icoforge build` produced
#[derive(Debug)]
pub struct BuildSummary {
    /// Icon path
    pub output: PathBuf,
    /// Encoded size
    pub bytes: usize,
    /// Dimensions embedded, ascending
    pub images: Vec<Dimension>,
    /// Allowed dimensions with no image
    pub missing: BTreeSet<Dimension>,
    /// Images skipped under [`BatchPolicy::ContinueOnError`]
    pub failures: Vec<IcoError>,
}

impl BuildSummary {
    /// One-line report for the terminal
    #[must_use]
    pub fn describe(&self) -> String {
        let mut line = format!(
            "wrote {} ({} image(s), {} bytes)",
            self.output.display(),
            self.images.len(),
            self.bytes
        );
        if !self.failures.is_empty() {
            let _ = write!(line, ", {} skipped", self.failures.len());
        }
        line
    }
}

/// Allowed sizes: the standard enumeration minus `skip`
fn allowed_sizes(skip: &[Dimension]) -> impl Iterator<Item = Dimension> + '_ {
    STANDARD_SIZES
        .into_iter()
        .filter(move |dimension| !skip.contains(dimension))
}

/// Assemble an icon from images and write it
///
/// A single directory input is scanned for images, otherwise every input is
/// opened as an image file. With no input the working directory is scanned.
///
/// # Errors
/// Returns error if an input cannot be used (under
/// [`BatchPolicy::StopOnFirstError`]), if no image was admitted, or if the
/// icon cannot be written
pub fn run_build(options: &BuildOptions) -> Result<BuildSummary> {
    let config = IconSetConfig::new()
        .with_allowed_sizes(allowed_sizes(&options.skip_sizes))
        .with_verbose(options.verbose);
    let mut icon: IconSet<FileSource> = IconSet::with_config(config);

    let inputs: Vec<PathBuf> = if options.inputs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        options.inputs.clone()
    };

    let report = match inputs.as_slice() {
        [dir] if dir.is_dir() => {
            let scanner =
                DirectoryScanner::new(ScanConfig::new().with_recursive(options.recursive));
            let listing = scanner
                .open_all(dir)
                .with_context(|| format!("scanning {}", dir.display()))?;
            icon.add_from_directory(listing, options.policy)
        }
        files => icon.add_from_directory(files.iter().map(FileSource::open), options.policy),
    }
    .context("adding images")?;

    let images: Vec<Dimension> = icon.dimensions().collect();
    let missing = icon.missing_sizes();

    let bytes = icon.finish().context("encoding icon")?;
    let outcome = write_icon(&options.output, &bytes)
        .with_context(|| format!("writing {}", options.output.display()))?;

    if !missing.is_empty() {
        let list: Vec<String> = missing.iter().map(ToString::to_string).collect();
        info!("missing sizes: {}", list.join(", "));
    }
    for failure in &report.failures {
        warn!("skipped: {failure}");
    }

    Ok(BuildSummary {
        output: outcome.path,
        bytes: outcome.bytes,
        images,
        missing,
        failures: report.failures,
    })
}

/// Describe the directory of an ICO file
///
/// # Errors
/// Returns error if the file cannot be read or is not a valid icon
pub fn run_inspect(path: &Path, json: bool) -> Result<String> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let reader =
        IcoReader::parse(&data).with_context(|| format!("parsing {}", path.display()))?;
    let summary = reader.summary();

    if json {
        Ok(serde_json::to_string_pretty(&summary)?)
    } else {
        Ok(render_summary(path, &summary))
    }
}

fn render_summary(path: &Path, summary: &IconSummary) -> String {
    let mut out = format!(
        "{}: {} image(s), {} bytes\n",
        path.display(),
        summary.count,
        summary.total_bytes
    );
    for image in &summary.images {
        let _ = writeln!(
            out,
            "  {:<10} {:>2} bpp  {:>8} bytes at offset {}",
            image.dimension.to_string(),
            image.bits_per_pixel,
            image.length,
            image.offset
        );
    }
    out
}

/// The standard size enumeration, one `WxH` per line
#[must_use]
pub fn sizes() -> String {
    STANDARD_SIZES
        .iter()
        .map(|dimension| format!("{dimension}\n"))
        .collect()
}
