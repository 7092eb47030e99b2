//! Integration tests for error handling and edge cases.

use pdfbuilder::assemble::DocumentAssembler;
use pdfbuilder::error::PdfBuilderError;
use pdfbuilder::filelist::OrderedFileList;
use pdfbuilder::io::PdfWriter;
use std::path::Path;
use tempfile::TempDir;

use crate::common::{fixture_document, write_fixture};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let mut list = OrderedFileList::new();
    let result = list.add(Path::new("/nonexistent/file.pdf")).await;

    let err = result.unwrap_err();
    assert!(matches!(err, PdfBuilderError::FileNotFound { .. }));
    assert!(err.is_recoverable());
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_error_corrupted_input_leaves_list_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_fixture(&temp_dir, "good.pdf", 1, 0);
    let bad = temp_dir.path().join("bad.pdf");
    std::fs::write(&bad, b"this is not a pdf either").unwrap();

    let mut list = OrderedFileList::new();
    list.add(&good).await.unwrap();
    let result = list.add(&bad).await;

    assert!(matches!(
        result,
        Err(PdfBuilderError::UnreadableDocument { .. })
    ));
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_error_directory_as_input() {
    let temp_dir = TempDir::new().unwrap();
    let mut list = OrderedFileList::new();

    let result = list.add(temp_dir.path()).await;
    assert!(matches!(result, Err(PdfBuilderError::NotAFile { .. })));
}

#[tokio::test]
async fn test_error_selection_out_of_bounds_names_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "short.pdf", 2, 0);

    let mut list = OrderedFileList::new();
    let id = list.add(&path).await.unwrap().id;
    list.set_page_selection(id, "1-3").unwrap();

    let err = DocumentAssembler::new()
        .assemble(&list.snapshot())
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("Page 3"), "{msg}");
    assert!(msg.contains("short.pdf"), "{msg}");
    assert!(msg.contains("2 page(s)"), "{msg}");
}

#[tokio::test]
async fn test_error_invalid_expression() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "doc.pdf", 2, 0);

    let mut list = OrderedFileList::new();
    let id = list.add(&path).await.unwrap().id;
    list.set_page_selection(id, "1,two").unwrap();

    let result = DocumentAssembler::new().assemble(&list.snapshot()).await;
    assert!(matches!(
        result,
        Err(PdfBuilderError::InvalidPageExpression { .. })
    ));
}

#[tokio::test]
async fn test_error_empty_join() {
    let result = DocumentAssembler::new().assemble(&[]).await;
    assert!(matches!(result, Err(PdfBuilderError::NoFilesToMerge)));
}

#[tokio::test]
async fn test_failed_write_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("missing-dir").join("out.pdf");

    let doc = fixture_document(1, 0, "1.5");
    let result = PdfWriter::new().save(&doc, &output).await;

    let err = result.unwrap_err();
    assert!(matches!(err, PdfBuilderError::FailedToCreateOutput { .. }));
    assert!(err.is_fatal());
    assert!(!output.exists());
}
