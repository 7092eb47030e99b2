//! PDF reading and loading operations.
//!
//! The reader checks the path up front so missing files and directories get
//! their own errors, then parses the bytes with `lopdf`. Anything that fails
//! to parse is reported as [`PdfBuilderError::UnreadableDocument`], except
//! encrypted inputs which get a dedicated hint.

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PdfBuilderError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Reject documents without pages.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts documents with an empty page tree.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is not a regular file
    /// - File cannot be read
    /// - File is not a valid PDF, or is encrypted
    /// - PDF has no pages (unless verification is disabled)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfbuilder::io::reader::PdfReader;
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = PdfReader::new();
    /// let loaded = reader.load(Path::new("document.pdf")).await?;
    /// println!("Loaded {} pages in {:?}", loaded.page_count, loaded.load_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let path_buf = path.to_path_buf();
        let start = Instant::now();

        let metadata = match tokio::fs::metadata(&path_buf).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PdfBuilderError::file_not_found(path_buf));
            }
            Err(e) => return Err(PdfBuilderError::unreadable(path_buf, e.to_string())),
        };

        if !metadata.is_file() {
            return Err(PdfBuilderError::not_a_file(path_buf));
        }

        let bytes = tokio::fs::read(&path_buf)
            .await
            .map_err(|e| PdfBuilderError::unreadable(path_buf.clone(), e.to_string()))?;

        let document = parse_document(&bytes, &path_buf)?;
        let page_count = document.get_pages().len();

        if self.verify && page_count == 0 {
            return Err(PdfBuilderError::unreadable(path_buf, "PDF has no pages"));
        }

        let load_time = start.elapsed();
        log::debug!(
            "loaded {} ({} pages, {} bytes) in {:?}",
            path_buf.display(),
            page_count,
            metadata.len(),
            load_time
        );

        Ok(LoadedPdf {
            document,
            path: path_buf,
            page_count,
            load_time,
            file_size: metadata.len(),
        })
    }

    /// Read only the page count of a PDF.
    ///
    /// The document is dropped as soon as the count is known.
    pub async fn page_count(&self, path: &Path) -> Result<usize> {
        self.load(path).await.map(|loaded| loaded.page_count)
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_document(bytes: &[u8], path: &Path) -> Result<Document> {
    Document::load_mem(bytes).map_err(|e| {
        let err_msg = e.to_string();
        if err_msg.contains("encrypt") || err_msg.contains("password") {
            PdfBuilderError::encrypted_pdf(path.to_path_buf())
        } else {
            PdfBuilderError::unreadable(path.to_path_buf(), err_msg)
        }
    })
}
