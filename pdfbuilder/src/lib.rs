//! pdfbuilder - Join, split, rotate and overlay PDF files.
//!
//! This library provides the core of a PDF workbench:
//!
//! - Page-selection expressions such as `"1-3,5,7-9"` ([`selection`])
//! - A reorderable list of input files with per-file selections
//!   ([`filelist`])
//! - Joining that list into one document ([`assemble::DocumentAssembler`])
//! - Splitting, rotating/extracting and overlaying single documents
//! - A persistent settings session ([`settings`])
//!
//! # Examples
//!
//! ## Join with page selections
//!
//! ```no_run
//! use pdfbuilder::assemble::DocumentAssembler;
//! use pdfbuilder::filelist::OrderedFileList;
//! use pdfbuilder::io::PdfWriter;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut list = OrderedFileList::new();
//! let cover = list.add(Path::new("cover.pdf")).await?.id;
//! list.set_page_selection(cover, "1")?;
//! list.add(Path::new("body.pdf")).await?;
//!
//! let joined = DocumentAssembler::new().assemble(&list.snapshot()).await?;
//! PdfWriter::new().save(&joined, Path::new("book.pdf")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Extract and rotate a page range
//!
//! ```no_run
//! use pdfbuilder::assemble::transform_pages;
//! use pdfbuilder::config::Rotation;
//! use pdfbuilder::io::{load_pdf, save_pdf};
//! use pdfbuilder::selection::PageWindow;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let input = Path::new("scan.pdf");
//! let mut doc = load_pdf(input).await?;
//! transform_pages(&mut doc, input, PageWindow::from_pages(3, 5)?, Rotation::Clockwise90, true)?;
//! save_pdf(&doc, Path::new("pages-3-5.pdf")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod config;
pub mod error;
pub mod filelist;
pub mod io;
pub mod output;
pub mod selection;
pub mod settings;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use assemble::DocumentAssembler;
pub use config::Config;
pub use error::{PdfBuilderError, Result};
pub use filelist::{EntryId, FileEntry, OrderedFileList};
pub use selection::{PageRange, ParsedSelection};
pub use settings::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
