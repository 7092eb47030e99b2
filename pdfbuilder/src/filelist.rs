//! The user-reorderable list of join inputs.
//!
//! Entries keep the order the user gave them and a page selection each.
//! Moves and removals act on the current selection, so a GUI or a scripted
//! front end can drive the list the same way: select, then move or remove.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PdfBuilderError, Result};
use crate::io::PdfReader;

/// Identity of an entry within one [`OrderedFileList`].
///
/// Ids are handed out by a counter and never reused, so an id still held
/// after its entry was removed can't alias a newer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One input document of a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Identity within the owning list.
    pub id: EntryId,
    /// Absolute path to the source PDF.
    pub path: PathBuf,
    /// Basename of `path`, for display.
    pub display_name: String,
    /// Page count read when the entry was added.
    pub page_count: usize,
    /// Page-selection expression; empty selects every page.
    pub page_selection: String,
    /// Zero-based rank in the list.
    pub position: usize,
}

/// Ordered, selectable collection of [`FileEntry`].
#[derive(Debug, Default)]
pub struct OrderedFileList {
    entries: Vec<FileEntry>,
    selected: HashSet<EntryId>,
    next_id: u64,
    reader: PdfReader,
}

impl OrderedFileList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path`, read its page count and append it to the list.
    ///
    /// # Errors
    ///
    /// Fails with [`PdfBuilderError::FileNotFound`],
    /// [`PdfBuilderError::NotAFile`] or
    /// [`PdfBuilderError::UnreadableDocument`] when the file can't be used.
    /// The list is unchanged on failure.
    pub async fn add(&mut self, path: &Path) -> Result<&FileEntry> {
        let page_count = self.reader.page_count(path).await?;
        let path = tokio::fs::canonicalize(path)
            .await
            .unwrap_or_else(|_| path.to_path_buf());

        log::debug!("adding {} ({page_count} pages)", path.display());
        Ok(self.push_entry(path, page_count))
    }

    /// Append an entry whose page count is already known.
    pub fn push_entry(&mut self, path: impl Into<PathBuf>, page_count: usize) -> &FileEntry {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let id = EntryId(self.next_id);
        self.next_id += 1;

        let position = self.entries.len();
        self.entries.push(FileEntry {
            id,
            path,
            display_name,
            page_count,
            page_selection: String::new(),
            position,
        });
        &self.entries[position]
    }

    /// Replace the current selection.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBuilderError::UnknownEntry`] for the first id not in the
    /// list; the previous selection is kept.
    pub fn select<I>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = EntryId>,
    {
        let mut selected = HashSet::new();
        for id in ids {
            if self.index_of(id).is_none() {
                return Err(PdfBuilderError::UnknownEntry { id });
            }
            selected.insert(id);
        }
        self.selected = selected;
        Ok(())
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected ids, in list order.
    pub fn selection(&self) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|e| self.selected.contains(&e.id))
            .map(|e| e.id)
            .collect()
    }

    /// Move every selected entry one step toward the head.
    ///
    /// Selected entries move as a block and keep their relative order.
    /// Nothing moves if the first selected entry is already at the head.
    pub fn move_up(&mut self) {
        let Some(first) = self.entries.first() else {
            return;
        };
        if self.selected.is_empty() || self.selected.contains(&first.id) {
            return;
        }

        for i in 1..self.entries.len() {
            if self.is_selected(i) && !self.is_selected(i - 1) {
                self.entries.swap(i - 1, i);
            }
        }
        self.renumber();
    }

    /// Move every selected entry one step toward the tail.
    ///
    /// Mirror of [`move_up`](Self::move_up).
    pub fn move_down(&mut self) {
        let Some(last) = self.entries.last() else {
            return;
        };
        if self.selected.is_empty() || self.selected.contains(&last.id) {
            return;
        }

        for i in (0..self.entries.len() - 1).rev() {
            if self.is_selected(i) && !self.is_selected(i + 1) {
                self.entries.swap(i, i + 1);
            }
        }
        self.renumber();
    }

    /// Remove the selected entries and clear the selection.
    pub fn remove(&mut self) {
        if self.selected.is_empty() {
            return;
        }

        let selected = std::mem::take(&mut self.selected);
        self.entries.retain(|e| !selected.contains(&e.id));
        self.renumber();
    }

    /// Change the page-selection expression of one entry.
    ///
    /// The expression is stored as typed; it is parsed when the list is
    /// assembled.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBuilderError::UnknownEntry`] if `id` is not in the list.
    pub fn set_page_selection(&mut self, id: EntryId, expression: impl Into<String>) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or(PdfBuilderError::UnknownEntry { id })?;
        self.entries[index].page_selection = expression.into();
        Ok(())
    }

    /// Copy of the entries in position order.
    pub fn snapshot(&self) -> Vec<FileEntry> {
        self.entries.clone()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: EntryId) -> Option<&FileEntry> {
        self.index_of(id).map(|i| &self.entries[i])
    }

    /// Iterate entries in position order.
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&self.entries[index].id)
    }

    fn renumber(&mut self) {
        for (position, entry) in self.entries.iter_mut().enumerate() {
            entry.position = position;
        }
    }
}
