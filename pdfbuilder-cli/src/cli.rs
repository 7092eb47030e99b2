//! CLI argument parsing for pdfbuilder.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, input expansion and conversion into a
//! validated [`Config`].

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pdfbuilder::config::{
    CompressionLevel, Config, JoinInput, Operation, OverlayPlacement, OverwriteMode, Rotation,
};
use pdfbuilder::error::{PdfBuilderError, Result};
use pdfbuilder::selection::{self, PageWindow};
use pdfbuilder::settings::{CONFIG_DIR_ENV, Session};
use pdfbuilder::utils::collect_paths_for_pattern;

/// Join, split, rotate and overlay PDF files.
///
/// Page selections use 1-based page numbers and ranges separated by
/// commas, e.g. "1-3,5,7-9". Ranges may be written in either order and
/// pages may repeat.
#[derive(Parser, Debug)]
#[command(name = "pdfbuilder")]
#[command(version)]
#[command(about = "Join, split, rotate and overlay PDF files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Dry run - validate inputs and show what would be written
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Verbose output - show per-file details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Overwrite existing output files without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output files
    #[arg(long, global = true, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for output PDFs
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and drop unused objects
    #[arg(short, long, global = true, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Directory holding settings.json and userdata.json
    #[arg(long, global = true, value_name = "DIR", env = CONFIG_DIR_ENV)]
    pub config_dir: Option<PathBuf>,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join PDF files, each with an optional page selection
    ///
    /// Examples:
    ///   pdfbuilder join cover.pdf:1 body.pdf appendix.pdf:3-5 -o book.pdf
    ///   pdfbuilder join "chapter*.pdf" -o book.pdf
    Join {
        /// Input files in output order, as PATH or PATH:PAGES
        #[arg(value_name = "FILE[:PAGES]")]
        inputs: Vec<String>,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Read more inputs from a file (one PATH[:PAGES] per line, '#' comments)
        #[arg(long, value_name = "FILE")]
        input_list: Option<PathBuf>,
    },

    /// Write every page of a PDF to its own file
    Split {
        /// Input PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory receiving NAME_0001.pdf, NAME_0002.pdf, ...
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: PathBuf,
    },

    /// Rotate a range of pages, optionally keeping only that range
    ///
    /// Examples:
    ///   pdfbuilder rotate scan.pdf --pages 2-4 --degrees left -o fixed.pdf
    ///   pdfbuilder rotate report.pdf --pages 5-9 --drop-others -o excerpt.pdf
    Rotate {
        /// Input PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Single page or range to transform (default: all pages)
        #[arg(long, value_name = "RANGE")]
        pages: Option<String>,

        /// Clockwise rotation: 0, 90, 180, 270, left or right
        #[arg(long, value_name = "DEGREES", default_value = "right")]
        degrees: String,

        /// Drop the pages outside the range instead of copying them
        #[arg(long)]
        drop_others: bool,
    },

    /// Draw a stamp or background PDF onto every page
    Overlay {
        /// Input PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// PDF to draw; its pages are used in turn
        #[arg(long = "with", value_name = "FILE")]
        overlay: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Draw under the page content instead of over it
        #[arg(long)]
        background: bool,
    },

    /// Print the stored settings and user data as JSON
    Settings,
}

impl Cli {
    /// Directory of the settings session.
    pub fn session_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(Session::default_dir)
    }

    /// Overwrite behavior selected by `--force` / `--no-clobber`.
    pub fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }

    /// Convert CLI arguments into a validated Config.
    ///
    /// Input paths are expanded (globs, `--input-list`) and resolved
    /// against the session's last-used directory. Returns `None` for
    /// `settings`, which needs no configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level or rotation is invalid
    /// - A page selection is malformed
    /// - The input list can't be read
    /// - Configuration validation fails
    pub async fn to_config(&self, session: &Session) -> Result<Option<Config>> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let operation = match &self.command {
            Command::Join {
                inputs,
                output,
                input_list,
            } => Operation::Join {
                inputs: self.join_inputs(inputs, input_list.as_deref(), session).await?,
                output: output.clone(),
            },
            Command::Split { input, output_dir } => Operation::Split {
                input: session.resolve_input(input).await,
                output_dir: output_dir.clone(),
            },
            Command::Rotate {
                input,
                output,
                pages,
                degrees,
                drop_others,
            } => Operation::Rotate {
                input: session.resolve_input(input).await,
                output: output.clone(),
                window: parse_window(pages.as_deref())?,
                rotation: degrees.parse::<Rotation>()?,
                drop_outside: *drop_others,
            },
            Command::Overlay {
                input,
                overlay,
                output,
                background,
            } => Operation::Overlay {
                input: session.resolve_input(input).await,
                overlay: session.resolve_input(overlay).await,
                output: output.clone(),
                placement: if *background {
                    OverlayPlacement::Background
                } else {
                    OverlayPlacement::Stamp
                },
            },
            Command::Settings => return Ok(None),
        };

        let config = Config {
            operation,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode: self.overwrite_mode(),
            compression,
        };

        config.validate().map_err(|e| match e.downcast::<PdfBuilderError>() {
            Ok(err) => err,
            Err(e) => {
                PdfBuilderError::invalid_config(format!("Configuration validation failed: {e}"))
            }
        })?;

        Ok(Some(config))
    }

    /// Collect join inputs from the command line, then from the input list.
    async fn join_inputs(
        &self,
        inputs: &[String],
        input_list: Option<&Path>,
        session: &Session,
    ) -> Result<Vec<JoinInput>> {
        let mut parsed = inputs
            .iter()
            .map(|s| JoinInput::from_str(s))
            .collect::<Result<Vec<_>>>()?;

        if let Some(list) = input_list {
            parsed.extend(read_input_list(list).await?);
        }

        for input in &parsed {
            selection::parse(&input.pages)?;
        }

        let mut expanded = Vec::with_capacity(parsed.len());
        for input in parsed {
            let matches = collect_paths_for_pattern(input.path.to_string_lossy())?;
            if matches.is_empty() {
                return Err(PdfBuilderError::file_not_found(input.path));
            }
            for path in matches {
                expanded.push(JoinInput::new(
                    session.resolve_input(&path).await,
                    input.pages.clone(),
                ));
            }
        }

        if expanded.is_empty() {
            return Err(PdfBuilderError::NoFilesToMerge);
        }

        Ok(expanded)
    }
}

/// `None` means the whole document.
fn parse_window(pages: Option<&str>) -> Result<Option<PageWindow>> {
    let Some(pages) = pages else {
        return Ok(None);
    };

    let parsed = selection::parse(pages)?;
    if parsed.is_all_pages() {
        return Ok(None);
    }
    PageWindow::try_from(&parsed).map(Some)
}

/// Read join inputs from a file.
///
/// One `PATH[:PAGES]` per line. Lines starting with '#' are comments and
/// empty lines are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not a valid
/// input.
async fn read_input_list(path: &Path) -> Result<Vec<JoinInput>> {
    use tokio::fs::File;
    use tokio::io::{AsyncBufReadExt, BufReader};

    let read_error = |source| PdfBuilderError::FailedToReadInputList {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).await.map_err(read_error)?;

    let mut lines = BufReader::new(file).lines();
    let mut inputs = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await.map_err(read_error)? {
        line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let input = JoinInput::from_str(line).map_err(|e| PdfBuilderError::InvalidInputList {
            path: path.to_path_buf(),
            line_number,
            details: e.to_string(),
        })?;
        selection::parse(&input.pages).map_err(|e| PdfBuilderError::InvalidInputList {
            path: path.to_path_buf(),
            line_number,
            details: e.to_string(),
        })?;

        inputs.push(input);
    }

    Ok(inputs)
}
