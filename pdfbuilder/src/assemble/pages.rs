//! Page-level operations on a single document.
//!
//! This module handles:
//! - Copying inherited page attributes onto the pages themselves
//! - Rebuilding a flat page tree from a list of pages
//! - Rotating a window of pages, optionally dropping the rest
//! - Splitting a document into single-page documents

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Rotation;
use crate::error::{PdfBuilderError, Result};
use crate::selection::PageWindow;

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&str; 4] = ["Resources", "MediaBox", "CropBox", "Rotate"];

/// Upper bound on page-tree depth; guards against `Parent` cycles.
const MAX_TREE_DEPTH: usize = 64;

/// Page ids in page-tree order.
pub(crate) fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

pub(crate) fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    match doc.get_object_mut(page_id)? {
        Object::Dictionary(dict) => Ok(dict),
        _ => Err(PdfBuilderError::merge_failed(
            "Page object is not a dictionary",
        )),
    }
}

/// Copy inherited attributes down to every page.
///
/// Once this has run, a page can be moved under another `Pages` node
/// without changing how it renders.
pub(crate) fn materialize_inherited(doc: &mut Document) -> Result<()> {
    for page_id in page_ids(doc) {
        let inherited = inherited_attributes(doc, page_id)?;
        if inherited.is_empty() {
            continue;
        }

        let page = page_dict_mut(doc, page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }
    Ok(())
}

fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Result<Vec<(&'static str, Object)>> {
    let page = doc.get_dictionary(page_id)?;
    let mut missing: Vec<&'static str> = INHERITABLE
        .into_iter()
        .filter(|key| !page.has(key.as_bytes()))
        .collect();

    let mut found = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(parent_id) = parent else { break };
        if missing.is_empty() {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };

        missing.retain(|key| match node.get(key.as_bytes()) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    Ok(found)
}

/// Replace the page tree with a single `Pages` node holding `page_ids`, in
/// order, then drop every object no longer reachable.
///
/// The document gets a fresh catalog, so outlines and named destinations of
/// the old one go away. Pages of the old tree that are not in `page_ids` are
/// deleted even when something else still refers to them. Pages must already
/// carry their inherited attributes (see [`materialize_inherited`]).
pub(crate) fn rebuild_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let keep: HashSet<ObjectId> = page_ids.iter().copied().collect();
    for old in self::page_ids(doc) {
        if !keep.contains(&old) {
            doc.objects.remove(&old);
        }
    }

    let pages_id = doc.new_object_id();
    for &page_id in page_ids {
        page_dict_mut(doc, page_id)?.set("Parent", pages_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.prune_objects();
    Ok(())
}

/// Rotate the pages inside `window` and keep or drop the others.
///
/// Pages are visited in order `0..page_count`. Inside the window the page's
/// `Rotate` grows by the requested angle, modulo 360. Outside it the page is
/// copied unchanged, or removed when `drop_outside` is set. `path` labels
/// errors only.
///
/// Returns the number of pages left in the document.
///
/// # Errors
///
/// Returns [`PdfBuilderError::PageIndexOutOfBounds`] if the window reaches
/// past the last page.
///
/// # Examples
///
/// ```no_run
/// # use pdfbuilder::assemble::transform_pages;
/// # use pdfbuilder::config::Rotation;
/// # use pdfbuilder::selection::PageWindow;
/// # use lopdf::Document;
/// # use std::path::Path;
/// # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
/// // Keep pages 2-4 only, turned a quarter clockwise.
/// let window = PageWindow::from_pages(2, 4)?;
/// transform_pages(&mut doc, Path::new("in.pdf"), window, Rotation::Clockwise90, true)?;
/// # Ok(())
/// # }
/// ```
pub fn transform_pages(
    doc: &mut Document,
    path: &Path,
    window: PageWindow,
    rotation: Rotation,
    drop_outside: bool,
) -> Result<usize> {
    let ids = page_ids(doc);
    window.check_bounds(ids.len(), path)?;
    materialize_inherited(doc)?;

    let degrees = rotation.as_degrees();
    let mut kept = Vec::with_capacity(ids.len());

    for (index, &page_id) in ids.iter().enumerate() {
        if window.contains(index) {
            if degrees != 0 {
                rotate_page(doc, page_id, degrees)?;
            }
            kept.push(page_id);
        } else if !drop_outside {
            kept.push(page_id);
        }
    }

    if kept.len() != ids.len() {
        rebuild_page_tree(doc, &kept)?;
    }

    log::debug!(
        "transformed pages {:?} of {} by {degrees} degrees, {} page(s) left",
        window.as_range(),
        path.display(),
        kept.len()
    );

    Ok(kept.len())
}

fn rotate_page(doc: &mut Document, page_id: ObjectId, degrees: i64) -> Result<()> {
    let page = page_dict_mut(doc, page_id)?;
    let current = page.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0);
    page.set("Rotate", (current + degrees).rem_euclid(360));
    Ok(())
}

/// Split a document into one single-page document per page, in order.
///
/// # Errors
///
/// Returns an error if the page tree can't be rebuilt for a page.
pub fn split_pages(doc: &Document) -> Result<Vec<Document>> {
    let mut source = doc.clone();
    materialize_inherited(&mut source)?;

    page_ids(&source)
        .into_iter()
        .map(|page_id| {
            let mut single = source.clone();
            rebuild_page_tree(&mut single, &[page_id])?;
            Ok(single)
        })
        .collect()
}

/// Output paths for [`split_pages`]: `{stem}_{n:04}.pdf` in `output_dir`,
/// with 1-based `n`.
pub fn split_output_paths(input: &Path, output_dir: &Path, page_count: usize) -> Vec<PathBuf> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());

    (1..=page_count)
        .map(|n| output_dir.join(format!("{stem}_{n:04}.pdf")))
        .collect()
}
