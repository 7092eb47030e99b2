//! Error types for pdfbuilder.
//!
//! Every fallible operation in the library returns [`PdfBuilderError`].
//! Errors are scoped to a single user-initiated operation (add a file,
//! save a join, split, rotate, overlay): none of them is meant to bring the
//! process down, and none is retried automatically.
//!
//! # Error Categories
//!
//! - **Selection Errors**: malformed page expressions, out-of-bounds pages
//! - **Document Errors**: unreadable, corrupted or encrypted inputs
//! - **Output Errors**: existing outputs, failed writes
//! - **Session Errors**: settings files that cannot be written

use std::io;
use std::path::PathBuf;

use crate::filelist::EntryId;

/// Result type alias for pdfbuilder operations.
pub type Result<T> = std::result::Result<T, PdfBuilderError>;

/// Main error type for pdfbuilder operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfBuilderError {
    /// A page-selection token is not a page number or a `a-b` range.
    #[error(
        "Invalid page expression: '{token}'\n  \
         Use page numbers and ranges separated by commas, e.g. \"1-3,5,7-9\""
    )]
    InvalidPageExpression {
        /// The offending token, as typed (whitespace removed).
        token: String,
    },

    /// A resolved page index falls outside the source document.
    #[error(
        "Page {} is out of range for: {}\n  PDF has {page_count} page(s)",
        .index + 1,
        .path.display()
    )]
    PageIndexOutOfBounds {
        /// Source document.
        path: PathBuf,
        /// Zero-based index that was requested.
        index: i64,
        /// Number of pages in the source document.
        page_count: usize,
    },

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file cannot be opened or parsed as a PDF.
    #[error("Unreadable PDF: {}\n  Reason: {reason}", .path.display())]
    UnreadableDocument {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        .path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// An entry id does not belong to the file list.
    #[error("No such entry in the file list: {id}")]
    UnknownEntry {
        /// The unknown id.
        id: EntryId,
    },

    /// No files were provided for joining.
    #[error("No input files specified for joining")]
    NoFilesToMerge,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input list file contains an invalid line.
    #[error(
        "Invalid entry in input list file: {} at line {line_number}\n  Details: {details}",
        .path.display()
    )]
    InvalidInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// Details about what's invalid.
        details: String,
    },

    /// Settings or user data could not be persisted.
    #[error("Failed to save settings: {}\n  Reason: {reason}", .path.display())]
    Settings {
        /// Settings file being written.
        path: PathBuf,
        /// Details about the failure.
        reason: String,
    },

    /// Page tree manipulation failed.
    #[error("PDF operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfBuilderError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl From<anyhow::Error> for PdfBuilderError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfBuilderError {
    /// Create an InvalidPageExpression error.
    pub fn invalid_page_expression(token: impl Into<String>) -> Self {
        Self::InvalidPageExpression {
            token: token.into(),
        }
    }

    /// Create a PageIndexOutOfBounds error.
    pub fn page_out_of_bounds(path: PathBuf, index: i64, page_count: usize) -> Self {
        Self::PageIndexOutOfBounds {
            path,
            index,
            page_count,
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an UnreadableDocument error.
    pub fn unreadable(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::UnreadableDocument {
            path,
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors leave the session intact: the user can fix the
    /// selection or pick another file and try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidPageExpression { .. }
                | Self::PageIndexOutOfBounds { .. }
                | Self::UnreadableDocument { .. }
                | Self::EncryptedPdf { .. }
                | Self::UnknownEntry { .. }
                | Self::FileNotFound { .. }
                | Self::NotAFile { .. }
        )
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoFilesToMerge
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::Cancelled
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::UnreadableDocument { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Settings { .. } => 5,
            Self::Io { .. } => 5,
            Self::MergeFailed { .. } => 6,
            Self::InvalidPageExpression { .. } => 1,
            Self::PageIndexOutOfBounds { .. } => 1,
            Self::UnknownEntry { .. } => 1,
            Self::NoFilesToMerge => 1,
            Self::InvalidInputList { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}
