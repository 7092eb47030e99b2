//! Joining an ordered file list into one document.
//!
//! The assembler works in three phases so that nothing is produced unless
//! every entry is valid:
//!
//! 1. **plan**: parse each entry's page selection and resolve it against the
//!    cached page count, without touching the filesystem;
//! 2. **collect**: load each source, re-check the selection against the live
//!    page count and import the selected pages;
//! 3. **build**: give the imported pages a fresh page tree, in order.

use lopdf::{Document, Object, ObjectId};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use super::pages::{materialize_inherited, page_ids, rebuild_page_tree};
use crate::error::{PdfBuilderError, Result};
use crate::filelist::FileEntry;
use crate::io::{PdfReader, PdfWriter};
use crate::selection::{self, ParsedSelection};

/// An entry whose selection parsed and fits its cached page count.
struct PlannedEntry<'a> {
    entry: &'a FileEntry,
    selection: ParsedSelection,
}

/// Pages imported so far, and the next free object number.
struct Collected {
    objects: BTreeMap<ObjectId, Object>,
    page_ids: Vec<ObjectId>,
    next_id: u32,
    version: String,
}

/// Builds one PDF out of an ordered list of [`FileEntry`].
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    reader: PdfReader,
    writer: PdfWriter,
}

impl DocumentAssembler {
    /// Create an assembler with default reader and writer settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Join `entries` in order.
    ///
    /// An empty `page_selection` takes every page. Otherwise pages follow the
    /// selection exactly, repeats included: `"3,1,1"` yields page 3 then
    /// page 1 twice.
    ///
    /// # Errors
    ///
    /// - [`PdfBuilderError::NoFilesToMerge`] if `entries` is empty
    /// - [`PdfBuilderError::InvalidPageExpression`] for a malformed selection
    /// - [`PdfBuilderError::PageIndexOutOfBounds`] if a page is outside its
    ///   document, by the cached or the live page count
    /// - any load error for an entry's source
    ///
    /// The first two selection errors are reported before any file is
    /// opened.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfbuilder::assemble::DocumentAssembler;
    /// # use pdfbuilder::filelist::OrderedFileList;
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut list = OrderedFileList::new();
    /// let id = list.add(Path::new("a.pdf")).await?.id;
    /// list.set_page_selection(id, "1-2")?;
    /// list.add(Path::new("b.pdf")).await?;
    ///
    /// let joined = DocumentAssembler::new().assemble(&list.snapshot()).await?;
    /// println!("{} pages", joined.get_pages().len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn assemble(&self, entries: &[FileEntry]) -> Result<Document> {
        let start = Instant::now();
        let plan = plan(entries)?;

        let mut collected = Collected {
            objects: BTreeMap::new(),
            page_ids: Vec::new(),
            next_id: 1,
            version: String::from("1.4"),
        };
        for planned in &plan {
            self.collect(planned, &mut collected).await?;
        }

        let mut document = Document::with_version(collected.version);
        document.objects = collected.objects;
        document.max_id = collected.next_id - 1;
        rebuild_page_tree(&mut document, &collected.page_ids)?;

        log::info!(
            "assembled {} page(s) from {} file(s) in {:?}",
            collected.page_ids.len(),
            entries.len(),
            start.elapsed()
        );

        Ok(document)
    }

    /// Join `entries` and serialize the result.
    ///
    /// # Errors
    ///
    /// Same as [`assemble`](Self::assemble), plus serialization failures.
    pub async fn assemble_bytes(&self, entries: &[FileEntry]) -> Result<Vec<u8>> {
        let document = self.assemble(entries).await?;
        self.writer.to_bytes(&document)
    }

    async fn collect(&self, planned: &PlannedEntry<'_>, collected: &mut Collected) -> Result<()> {
        let entry = planned.entry;
        let loaded = self.reader.load(&entry.path).await?;

        // The file may have changed since it was added.
        let pages = planned.selection.resolve(loaded.page_count, &entry.path)?;

        let mut source = loaded.document;
        materialize_inherited(&mut source)?;
        if source.version > collected.version {
            collected.version = source.version.clone();
        }

        // A page used k times is imported from k separate copies of the
        // source, so every occurrence is its own page object.
        let rounds = repetition_rounds(&pages);
        let round_count = rounds.iter().max().map_or(0, |r| r + 1);

        let mut round_pages = Vec::with_capacity(round_count);
        for _ in 0..round_count {
            let mut copy = source.clone();
            copy.renumber_objects_with(collected.next_id);
            collected.next_id = copy.max_id + 1;
            round_pages.push(page_ids(&copy));
            collected.objects.extend(copy.objects);
        }

        for (&page, &round) in pages.iter().zip(&rounds) {
            collected.page_ids.push(round_pages[round][page]);
        }

        log::debug!(
            "took {} page(s) from {} ({} copy round(s))",
            pages.len(),
            entry.display_name,
            round_count
        );
        Ok(())
    }
}

/// Parse and check every selection against the cached page counts.
fn plan(entries: &[FileEntry]) -> Result<Vec<PlannedEntry<'_>>> {
    if entries.is_empty() {
        return Err(PdfBuilderError::NoFilesToMerge);
    }

    entries
        .iter()
        .map(|entry| {
            let selection = selection::parse(&entry.page_selection)?;
            selection.resolve(entry.page_count, &entry.path)?;
            Ok(PlannedEntry { entry, selection })
        })
        .collect()
}

/// For each position in `pages`, how many times that page appeared before.
fn repetition_rounds(pages: &[usize]) -> Vec<usize> {
    let mut seen: HashMap<usize, usize> = HashMap::new();
    pages
        .iter()
        .map(|&page| {
            let count = seen.entry(page).or_insert(0);
            let round = *count;
            *count += 1;
            round
        })
        .collect()
}
