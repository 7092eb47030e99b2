//! Shared fixtures for the integration tests.
//!
//! PDFs are generated on the fly: page `n` (1-based) of a fixture is
//! `100 + n` points wide and `500 + tag` points tall, so a test can tell
//! which page of which source ended up where.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build a fixture document in memory.
pub fn fixture_document(pages: usize, tag: i64, version: &str) -> Document {
    let mut doc = Document::with_version(version);
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = format!("BT /F1 10 Tf 20 20 Td (fixture {tag}, page {n}) Tj ET");
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

/// Write a PDF 1.5 fixture into `dir`.
pub fn write_fixture(dir: &TempDir, name: &str, pages: usize, tag: i64) -> PathBuf {
    write_fixture_version(dir, name, pages, tag, "1.5")
}

/// Write a fixture with an explicit header version.
pub fn write_fixture_version(
    dir: &TempDir,
    name: &str,
    pages: usize,
    tag: i64,
    version: &str,
) -> PathBuf {
    let path = dir.path().join(name);
    let mut doc = fixture_document(pages, tag, version);
    doc.save(&path).expect("Failed to write fixture");
    path
}

/// Reload a written PDF.
pub fn reload(path: &Path) -> Document {
    Document::load(path).expect("Failed to reload output")
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

fn media_box(doc: &Document, page_id: ObjectId) -> Vec<i64> {
    let page = doc.get_dictionary(page_id).unwrap();
    page.get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_float().unwrap().round() as i64)
        .collect()
}

/// Page widths in page-tree order: `100 + n` identifies the source page.
pub fn page_widths(doc: &Document) -> Vec<i64> {
    page_ids(doc).into_iter().map(|id| media_box(doc, id)[2]).collect()
}

/// Page heights in page-tree order: `500 + tag` identifies the source file.
pub fn page_heights(doc: &Document) -> Vec<i64> {
    page_ids(doc).into_iter().map(|id| media_box(doc, id)[3]).collect()
}

/// `/Rotate` of each page, 0 when absent.
pub fn page_rotations(doc: &Document) -> Vec<i64> {
    page_ids(doc)
        .into_iter()
        .map(|id| {
            doc.get_dictionary(id)
                .unwrap()
                .get(b"Rotate")
                .and_then(|r| r.as_i64())
                .unwrap_or(0)
        })
        .collect()
}

/// Create a temporary output path for test results.
pub fn temp_output_path() -> tempfile::TempPath {
    tempfile::NamedTempFile::new()
        .expect("Failed to create temp file")
        .into_temp_path()
}
