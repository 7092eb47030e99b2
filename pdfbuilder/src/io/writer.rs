//! PDF writing and saving operations.
//!
//! This module provides safe PDF writing with:
//! - Atomic writes (write to a temp file next to the target, then rename)
//! - Compression support
//! - Write statistics
//!
//! A failed write never leaves a partial output file behind: the temp file
//! is removed and the target path is untouched.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbuilder::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(&doc, Path::new("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::CompressionLevel;
use crate::error::{PdfBuilderError, Result};

/// Options for writing PDF files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Renumber objects densely before writing.
    pub optimize: bool,

    /// Drop objects no longer reachable from the trailer.
    pub prune: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: true,
            prune: false,
        }
    }
}

impl From<CompressionLevel> for WriteOptions {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::None => Self {
                compress: false,
                ..Default::default()
            },
            CompressionLevel::Standard => Self::default(),
            CompressionLevel::Maximum => Self {
                prune: true,
                ..Default::default()
            },
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Serialize a document into memory, applying the writer's options.
    ///
    /// # Errors
    ///
    /// Returns an error if `lopdf` fails to serialize the document.
    pub fn to_bytes(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut doc = doc.clone();

        if self.options.prune {
            doc.prune_objects();
        }

        if self.options.compress {
            doc.compress();
        }

        if self.options.optimize {
            doc.renumber_objects();
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfBuilderError::merge_failed(format!("Failed to serialize PDF: {e}")))?;

        Ok(buffer)
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Disk full
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).await.map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfbuilder::io::writer::PdfWriter;
    /// # use lopdf::Document;
    /// # use std::path::Path;
    /// # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
    /// let writer = PdfWriter::new();
    /// let stats = writer.save_with_stats(&doc, Path::new("output.pdf")).await?;
    /// println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn save_with_stats(&self, doc: &Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let bytes = self.to_bytes(doc)?;
        self.write_bytes(&bytes, path).await?;

        let write_time = start.elapsed();
        log::info!(
            "wrote {} ({} bytes) in {:?}",
            path.display(),
            bytes.len(),
            write_time
        );

        Ok(WriteStatistics {
            write_time,
            file_size: bytes.len() as u64,
            output_path: path.to_path_buf(),
            compressed: self.options.compress,
        })
    }

    /// Write already serialized PDF bytes to `path`.
    pub async fn write_bytes(&self, bytes: &[u8], path: &Path) -> Result<()> {
        if !self.options.atomic {
            return tokio::fs::write(path, bytes)
                .await
                .map_err(|e| write_error(path, e));
        }

        let temp_path = temp_path_for(path);

        if let Err(e) = tokio::fs::write(&temp_path, bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(write_error(&temp_path, e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(PdfBuilderError::FailedToWrite {
                path: path.to_path_buf(),
                source: e,
            });
        }

        Ok(())
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBuilderError::FailedToCreateOutput`] if the parent
    /// directory is missing or read-only, as the write itself would.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = tokio::fs::metadata(parent).await.map_err(|e| write_error(path, e))?;

        if !metadata.is_dir() {
            return Err(write_error(path, std::io::ErrorKind::NotFound.into()));
        }
        if metadata.permissions().readonly() {
            return Err(write_error(path, std::io::ErrorKind::PermissionDenied.into()));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

/// Hidden sibling of `path` used for atomic writes.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| "output.pdf".as_ref()));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_error(path: &Path, source: std::io::Error) -> PdfBuilderError {
    if source.kind() == std::io::ErrorKind::NotFound
        || source.kind() == std::io::ErrorKind::PermissionDenied
    {
        PdfBuilderError::FailedToCreateOutput {
            path: path.to_path_buf(),
            source,
        }
    } else {
        PdfBuilderError::FailedToWrite {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Format file size as human-readable string.
pub(crate) fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
