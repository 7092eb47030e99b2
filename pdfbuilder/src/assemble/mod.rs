//! Document assembly.
//!
//! This module turns loaded documents into new ones:
//! - [`DocumentAssembler`] joins an ordered file list, page selections
//!   included
//! - [`transform_pages`] rotates a page window and optionally extracts it
//! - [`split_pages`] writes one document per page
//! - [`overlay_pages`] draws a background or stamp onto every page
//!
//! None of these write files; the caller saves the result with
//! [`PdfWriter`](crate::io::PdfWriter) once the whole operation succeeded.

pub mod join;
pub mod overlay;
pub mod pages;

pub use join::DocumentAssembler;
pub use overlay::overlay_pages;
pub use pages::{split_output_paths, split_pages, transform_pages};
