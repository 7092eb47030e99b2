//! Configuration module for pdfbuilder.
//!
//! This module holds the validated, normalized configuration that drives a
//! single operation (join, split, rotate, overlay). It handles:
//! - Validation of argument combinations
//! - Parsing of rotation, compression and overlay options
//! - Parsing of `path[:pages]` join inputs

use anyhow::{Result, bail};

use crate::PdfBuilderError;
use crate::selection::{self, PageWindow};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - preserves exact quality and structure.
    None,
    /// Compress streams (default).
    #[default]
    Standard,
    /// Compress streams and drop unreachable objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfBuilderError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfBuilderError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Page rotation, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Leave pages as they are.
    #[default]
    None,
    /// Rotate 90 degrees clockwise ("right").
    Clockwise90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise ("left").
    Clockwise270,
}

impl Rotation {
    /// Parse rotation from degrees: 0, 90, 180 or 270.
    ///
    /// # Errors
    ///
    /// Returns an error for any other value.
    pub fn from_degrees(degrees: u16) -> crate::Result<Self> {
        match degrees {
            0 => Ok(Self::None),
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Clockwise270),
            _ => Err(PdfBuilderError::invalid_config(format!(
                "Invalid rotation: {degrees}. Must be 0, 90, 180, or 270"
            ))),
        }
    }

    /// Get rotation as degrees.
    pub fn as_degrees(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }
}

impl FromStr for Rotation {
    type Err = PdfBuilderError;

    /// Accepts degrees or the names `left`, `right` and `half`.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Clockwise270),
            "right" => Ok(Self::Clockwise90),
            "half" => Ok(Self::Rotate180),
            other => {
                let degrees: u16 = other.parse().map_err(|_| {
                    PdfBuilderError::invalid_config(format!(
                        "Invalid rotation: {s}. Use 0, 90, 180, 270, left or right"
                    ))
                })?;
                Self::from_degrees(degrees)
            }
        }
    }
}

/// Where overlay content is drawn relative to the page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPlacement {
    /// Drawn over the page (stamp, watermark on top).
    #[default]
    Stamp,
    /// Drawn under the page (letterhead, background).
    Background,
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// One input of a join: a file and its raw page selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinInput {
    /// Source PDF.
    pub path: PathBuf,
    /// Page selection as typed; empty means every page.
    pub pages: String,
}

impl JoinInput {
    /// Input with an explicit selection.
    pub fn new(path: impl Into<PathBuf>, pages: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pages: pages.into(),
        }
    }
}

impl FromStr for JoinInput {
    type Err = PdfBuilderError;

    /// Parse `path` or `path:pages`.
    ///
    /// The suffix after the last `:` is taken as a selection when it holds no
    /// path separator and either looks like one (digits, commas, dashes,
    /// spaces) or follows a `.pdf` name or an existing file. Windows drive
    /// prefixes and colon-bearing names stay intact, while `a.pdf:3-x` keeps
    /// `3-x` so the selection check can report it.
    fn from_str(s: &str) -> crate::Result<Self> {
        if s.trim().is_empty() {
            return Err(PdfBuilderError::invalid_config("Empty input path"));
        }

        if let Some((path, pages)) = s.rsplit_once(':')
            && !path.is_empty()
            && !pages.trim().is_empty()
            && !pages.contains(['/', '\\'])
            && (looks_like_selection(pages) || names_a_pdf(path))
        {
            return Ok(Self::new(path, pages.trim()));
        }

        Ok(Self::new(s, ""))
    }
}

fn looks_like_selection(pages: &str) -> bool {
    pages
        .chars()
        .all(|c| c.is_ascii_digit() || c == ',' || c == '-' || c.is_whitespace())
}

fn names_a_pdf(path: &str) -> bool {
    let path = Path::new(path);
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) || path.is_file()
}

/// The operation to perform, with its own inputs and outputs.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Join several inputs, each with its own page selection.
    Join {
        /// Inputs in output order.
        inputs: Vec<JoinInput>,
        /// Output PDF.
        output: PathBuf,
    },
    /// Write one single-page PDF per page of `input`.
    Split {
        /// Source PDF.
        input: PathBuf,
        /// Directory receiving the pages.
        output_dir: PathBuf,
    },
    /// Rotate a window of pages, optionally dropping the rest.
    Rotate {
        /// Source PDF.
        input: PathBuf,
        /// Output PDF.
        output: PathBuf,
        /// Pages to transform; `None` means the whole document.
        window: Option<PageWindow>,
        /// Rotation applied inside the window.
        rotation: Rotation,
        /// Drop pages outside the window instead of copying them.
        drop_outside: bool,
    },
    /// Draw the pages of `overlay` onto the pages of `input`.
    Overlay {
        /// Source PDF.
        input: PathBuf,
        /// Background or stamp PDF.
        overlay: PathBuf,
        /// Output PDF.
        output: PathBuf,
        /// Under or over the page content.
        placement: OverlayPlacement,
    },
}

impl Operation {
    /// Short name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Split { .. } => "split",
            Self::Rotate { .. } => "rotate",
            Self::Overlay { .. } => "overlay",
        }
    }

    /// Every input file the operation reads.
    pub fn inputs(&self) -> Vec<PathBuf> {
        match self {
            Self::Join { inputs, .. } => inputs.iter().map(|i| i.path.clone()).collect(),
            Self::Split { input, .. } | Self::Rotate { input, .. } => vec![input.clone()],
            Self::Overlay { input, overlay, .. } => vec![input.clone(), overlay.clone()],
        }
    }

    /// The single output file, if the operation has one.
    pub fn output(&self) -> Option<&PathBuf> {
        match self {
            Self::Join { output, .. }
            | Self::Rotate { output, .. }
            | Self::Overlay { output, .. } => Some(output),
            Self::Split { .. } => None,
        }
    }
}

/// Complete configuration for one operation.
#[derive(Debug, Clone)]
pub struct Config {
    /// What to do.
    pub operation: Operation,

    /// Dry run mode - validate without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,
}

impl Config {
    /// Configuration with default output settings.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A join has no inputs
    /// - Verbose and quiet modes are both enabled
    /// - The output path is also an input
    /// - A join input carries a malformed page selection
    /// - A rotate window selects no pages
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Operation::Join { inputs, .. } = &self.operation {
            if inputs.is_empty() {
                bail!("No input files specified");
            }

            for input in inputs {
                selection::parse(&input.pages)?;
            }
        }

        if let Operation::Rotate {
            window: Some(window),
            ..
        } = &self.operation
            && window.as_range().is_empty()
        {
            bail!("The page range to rotate is empty");
        }

        if let Some(output) = self.operation.output() {
            for input in self.operation.inputs() {
                if &input == output {
                    bail!(
                        "Output file cannot be the same as an input file: {}",
                        output.display()
                    );
                }
            }
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
