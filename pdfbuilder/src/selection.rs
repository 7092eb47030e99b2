//! Page-selection expressions.
//!
//! A selection is typed by the user as a comma separated list of 1-based
//! page numbers and ranges, e.g. `"1-3,5,7-9"`. Parsing turns it into an
//! ordered list of [`PageRange`]s, one per token, without sorting, merging or
//! deduplicating anything: `"3,1,1"` selects page 3, then page 1 twice.
//!
//! [`PageRange`] is zero-based and inclusive at both ends. Consumers that
//! work with half-open windows (rotate/extract) convert explicitly through
//! [`PageWindow`].
//!
//! # Examples
//!
//! ```
//! use pdfbuilder::selection::{self, PageRange, ParsedSelection};
//!
//! let parsed = selection::parse("1, 3-4 ,2").unwrap();
//! assert_eq!(
//!     parsed,
//!     ParsedSelection::Ranges(vec![
//!         PageRange::new(0, 0),
//!         PageRange::new(2, 3),
//!         PageRange::new(1, 1),
//!     ])
//! );
//! assert_eq!(selection::parse("  ").unwrap(), ParsedSelection::AllPages);
//! ```

use std::fmt;
use std::ops::Range;
use std::path::Path;

use crate::error::{PdfBuilderError, Result};

/// A contiguous run of pages, zero-based, inclusive at both ends.
///
/// Bounds are signed: the parser accepts `"0"`, which maps to index `-1`,
/// and leaves rejecting it to [`ParsedSelection::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    start: i64,
    end: i64,
}

impl PageRange {
    /// Create a range; the bounds are sorted so `start <= end` always holds.
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A range covering exactly one page.
    pub fn single(index: i64) -> Self {
        Self::new(index, index)
    }

    /// First page index (inclusive).
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last page index (inclusive).
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of pages covered.
    ///
    /// Saturates at `usize::MAX` for ranges wider than the address space.
    pub fn len(&self) -> usize {
        usize::try_from(self.end.abs_diff(self.start))
            .map_or(usize::MAX, |span| span.saturating_add(1))
    }

    /// Always false; a range covers at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Page indices covered, in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = i64> {
        self.start..=self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start + 1)
        } else {
            write!(f, "{}-{}", self.start + 1, self.end + 1)
        }
    }
}

/// Result of parsing a page-selection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSelection {
    /// Empty input: every page of the document, in order.
    AllPages,
    /// Explicit ranges, in the order they were typed.
    Ranges(Vec<PageRange>),
}

impl ParsedSelection {
    /// Expand the selection into zero-based page indices for a document of
    /// `page_count` pages.
    ///
    /// `path` is only used to label the error.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBuilderError::PageIndexOutOfBounds`] for the first index
    /// outside `[0, page_count)`.
    pub fn resolve(&self, page_count: usize, path: &Path) -> Result<Vec<usize>> {
        match self {
            Self::AllPages => Ok((0..page_count).collect()),
            Self::Ranges(ranges) => {
                let mut pages = Vec::new();
                for range in ranges {
                    for index in range.indices() {
                        if index < 0 || index as usize >= page_count {
                            return Err(PdfBuilderError::page_out_of_bounds(
                                path.to_path_buf(),
                                index,
                                page_count,
                            ));
                        }
                        pages.push(index as usize);
                    }
                }
                Ok(pages)
            }
        }
    }

    /// Whether this is the "all pages" sentinel.
    pub fn is_all_pages(&self) -> bool {
        matches!(self, Self::AllPages)
    }
}

/// Parse a user-typed page selection.
///
/// Whitespace anywhere in the input is ignored. Each comma separated token is
/// either a 1-based page `p`, giving `(p-1, p-1)`, or a range `a-b` in either
/// order, giving `(min-1, max-1)`.
///
/// # Errors
///
/// Returns [`PdfBuilderError::InvalidPageExpression`] naming the first token
/// that is not a page number or a two-sided range. Page numbers are not
/// checked against any document here.
pub fn parse(input: &str) -> Result<ParsedSelection> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() {
        return Ok(ParsedSelection::AllPages);
    }

    compact
        .split(',')
        .map(parse_token)
        .collect::<Result<Vec<_>>>()
        .map(ParsedSelection::Ranges)
}

fn parse_token(token: &str) -> Result<PageRange> {
    match token.split_once('-') {
        Some((first, last)) => {
            let (Some(first), Some(last)) = (page_number(first), page_number(last)) else {
                return Err(PdfBuilderError::invalid_page_expression(token));
            };
            Ok(PageRange::new(first - 1, last - 1))
        }
        None => page_number(token)
            .map(|page| PageRange::single(page - 1))
            .ok_or_else(|| PdfBuilderError::invalid_page_expression(token)),
    }
}

/// A 1-based page number: ASCII digits only, so signs and stray dashes fail.
fn page_number(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Half-open zero-based window `[start, end)` used by rotate/extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    start: usize,
    end: usize,
}

impl PageWindow {
    /// Build a window from 1-based inclusive bounds (`from..=to`), given in
    /// either order.
    ///
    /// # Errors
    ///
    /// Page 0 is rejected with [`PdfBuilderError::InvalidConfig`].
    pub fn from_pages(from: u32, to: u32) -> Result<Self> {
        let (from, to) = (from.min(to), from.max(to));
        if from == 0 {
            return Err(PdfBuilderError::invalid_config(
                "Page numbers must be positive (1-indexed)",
            ));
        }
        Ok(Self {
            start: from as usize - 1,
            end: to as usize,
        })
    }

    /// Window covering a whole document.
    pub fn all(page_count: usize) -> Self {
        Self {
            start: 0,
            end: page_count,
        }
    }

    /// The window as an index range.
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether zero-based `index` falls inside the window.
    pub fn contains(&self, index: usize) -> bool {
        self.as_range().contains(&index)
    }

    /// Check that the window lies within a document of `page_count` pages.
    pub fn check_bounds(&self, page_count: usize, path: &Path) -> Result<()> {
        if self.end > page_count {
            return Err(PdfBuilderError::page_out_of_bounds(
                path.to_path_buf(),
                self.end as i64 - 1,
                page_count,
            ));
        }
        Ok(())
    }
}

impl TryFrom<PageRange> for PageWindow {
    type Error = PdfBuilderError;

    /// Inclusive `(start, end)` becomes half-open `[start, end + 1)`.
    fn try_from(range: PageRange) -> Result<Self> {
        if range.start < 0 {
            return Err(PdfBuilderError::invalid_config(
                "Page numbers must be positive (1-indexed)",
            ));
        }
        Ok(Self {
            start: range.start as usize,
            end: range.end as usize + 1,
        })
    }
}

impl TryFrom<&ParsedSelection> for PageWindow {
    type Error = PdfBuilderError;

    /// Only a selection made of exactly one range describes a window.
    fn try_from(selection: &ParsedSelection) -> Result<Self> {
        match selection {
            ParsedSelection::Ranges(ranges) if ranges.len() == 1 => Self::try_from(ranges[0]),
            _ => Err(PdfBuilderError::invalid_config(
                "Expected a single page or a single range such as \"3-7\"",
            )),
        }
    }
}
