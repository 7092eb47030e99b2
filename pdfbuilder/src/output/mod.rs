//! Output formatting and display for pdfbuilder.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Error and warning display
//! - File list and write summaries
//! - Quiet and verbose modes
//!
//! Diagnostics meant for developers go through the `log` facade instead.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbuilder::output::OutputFormatter;
//! use pdfbuilder::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting join");
//! formatter.success("Join completed");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::filelist::FileEntry;
use crate::io::WriteStatistics;

/// Display the entries about to be joined, with their selections.
pub fn display_file_list(formatter: &OutputFormatter, entries: &[FileEntry]) {
    for entry in entries {
        let selection = if entry.page_selection.is_empty() {
            "all pages"
        } else {
            entry.page_selection.as_str()
        };
        formatter.list_item(
            entry.position + 1,
            &format!(
                "{} ({} pages): {selection}",
                entry.display_name, entry.page_count
            ),
        );
    }
}

/// Display the result of one write.
pub fn display_write_statistics(
    formatter: &OutputFormatter,
    pages: usize,
    stats: &WriteStatistics,
) {
    formatter.success(&format!(
        "Wrote {} ({} page(s), {})",
        stats.output_path.display(),
        pages,
        stats.format_file_size()
    ));
    formatter.detail(
        "Write time",
        &format!("{:.2}s", stats.write_time.as_secs_f64()),
    );
    formatter.detail("Compression", if stats.compressed { "Yes" } else { "No" });
}
