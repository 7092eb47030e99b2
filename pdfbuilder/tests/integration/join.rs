//! Integration tests for joining files with page selections.

use pdfbuilder::assemble::DocumentAssembler;
use pdfbuilder::config::CompressionLevel;
use pdfbuilder::filelist::OrderedFileList;
use pdfbuilder::io::{PdfWriter, WriteOptions};
use pdfbuilder::utils::collect_paths_for_pattern;
use tempfile::TempDir;

use crate::common::{
    page_heights, page_widths, reload, temp_output_path, write_fixture, write_fixture_version,
};

#[tokio::test]
async fn test_join_writes_and_reloads() {
    let temp_dir = TempDir::new().unwrap();
    let cover = write_fixture(&temp_dir, "cover.pdf", 3, 1);
    let body = write_fixture(&temp_dir, "body.pdf", 4, 2);
    let output = temp_output_path();

    let mut list = OrderedFileList::new();
    let id = list.add(&cover).await.unwrap().id;
    list.set_page_selection(id, "1").unwrap();
    let id = list.add(&body).await.unwrap().id;
    list.set_page_selection(id, "2-3, 4").unwrap();

    let joined = DocumentAssembler::new()
        .assemble(&list.snapshot())
        .await
        .unwrap();
    PdfWriter::new().save(&joined, &output).await.unwrap();

    let doc = reload(&output);
    assert_eq!(page_widths(&doc), vec![101, 102, 103, 104]);
    assert_eq!(page_heights(&doc), vec![501, 502, 502, 502]);
}

#[tokio::test]
async fn test_join_follows_reordered_list() {
    let temp_dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..3)
        .map(|tag| write_fixture(&temp_dir, &format!("f{tag}.pdf"), 1, tag))
        .collect();

    let mut list = OrderedFileList::new();
    let mut ids = Vec::new();
    for path in &paths {
        ids.push(list.add(path).await.unwrap().id);
    }

    // Move the last file to the front.
    list.select([ids[2]]).unwrap();
    list.move_up();
    list.move_up();

    let doc = DocumentAssembler::new()
        .assemble(&list.snapshot())
        .await
        .unwrap();
    assert_eq!(page_heights(&doc), vec![502, 500, 501]);
}

#[tokio::test]
async fn test_same_file_twice_with_different_selections() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "doc.pdf", 4, 0);

    let mut list = OrderedFileList::new();
    let first = list.add(&path).await.unwrap().id;
    let second = list.add(&path).await.unwrap().id;
    list.set_page_selection(first, "4-3").unwrap();
    list.set_page_selection(second, "1,1").unwrap();

    let bytes = DocumentAssembler::new()
        .assemble_bytes(&list.snapshot())
        .await
        .unwrap();

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(page_widths(&doc), vec![103, 104, 101, 101]);
}

#[tokio::test]
async fn test_join_keeps_highest_version() {
    let temp_dir = TempDir::new().unwrap();
    let old = write_fixture_version(&temp_dir, "old.pdf", 1, 0, "1.3");
    let new = write_fixture_version(&temp_dir, "new.pdf", 1, 1, "1.7");

    let mut list = OrderedFileList::new();
    list.add(&old).await.unwrap();
    list.add(&new).await.unwrap();

    let doc = DocumentAssembler::new()
        .assemble(&list.snapshot())
        .await
        .unwrap();
    assert_eq!(doc.version, "1.7");
}

#[tokio::test]
async fn test_join_uncompressed_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "doc.pdf", 2, 0);
    let output = temp_output_path();

    let mut list = OrderedFileList::new();
    list.add(&path).await.unwrap();

    let joined = DocumentAssembler::new()
        .assemble(&list.snapshot())
        .await
        .unwrap();
    let writer = PdfWriter::with_options(WriteOptions::from(CompressionLevel::None));
    let stats = writer.save_with_stats(&joined, &output).await.unwrap();

    assert!(!stats.compressed);
    let raw = std::fs::read(&output).unwrap();
    let needle = b"fixture 0, page 2";
    assert!(raw.windows(needle.len()).any(|w| w == needle));
}

#[tokio::test]
async fn test_join_glob_inputs_in_sorted_order() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture(&temp_dir, "part-b.pdf", 1, 2);
    write_fixture(&temp_dir, "part-a.pdf", 1, 1);

    let pattern = format!("{}/part-*.pdf", temp_dir.path().display());
    let mut list = OrderedFileList::new();
    for path in collect_paths_for_pattern(&pattern).unwrap() {
        list.add(&path).await.unwrap();
    }

    let doc = DocumentAssembler::new()
        .assemble(&list.snapshot())
        .await
        .unwrap();
    assert_eq!(page_heights(&doc), vec![501, 502]);
}
