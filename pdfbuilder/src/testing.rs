//! Generated PDF fixtures for unit tests.
//!
//! Page `n` (1-based) of a sample document is `100 + n` points wide and
//! `500 + tag` points tall, so tests can tell pages and source documents
//! apart after any reordering. Resources live on the `Pages` node and are
//! inherited by every page.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) fn sample_document(pages: usize, tag: i64) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = format!("BT /F1 12 Tf 10 10 Td (Doc {tag} page {n}) Tj ET");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (100 + n as i64).into(), (500 + tag).into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

pub(crate) fn write_sample(dir: &TempDir, name: &str, pages: usize, tag: i64) -> PathBuf {
    let path = dir.path().join(name);
    let mut doc = sample_document(pages, tag);
    doc.save(&path).unwrap();
    path
}

pub(crate) fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

fn media_box_dimension(doc: &Document, page_id: ObjectId, slot: usize) -> i64 {
    let page = doc.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    media_box[slot].as_float().unwrap().round() as i64
}

/// `100 + n` for each page, in page-tree order.
pub(crate) fn page_widths(doc: &Document) -> Vec<i64> {
    page_ids(doc)
        .into_iter()
        .map(|id| media_box_dimension(doc, id, 2))
        .collect()
}

/// `500 + tag` for each page, in page-tree order.
pub(crate) fn page_heights(doc: &Document) -> Vec<i64> {
    page_ids(doc)
        .into_iter()
        .map(|id| media_box_dimension(doc, id, 3))
        .collect()
}

pub(crate) fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    doc.get_dictionary(page_id)
        .unwrap()
        .get(b"Rotate")
        .and_then(|r| r.as_i64())
        .unwrap_or(0)
}
