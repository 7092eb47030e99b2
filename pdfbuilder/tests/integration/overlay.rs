//! Integration tests for stamps and backgrounds.

use pdfbuilder::assemble::overlay_pages;
use pdfbuilder::config::OverlayPlacement;
use pdfbuilder::io::{PdfWriter, load_pdf};
use tempfile::TempDir;

use crate::common::{page_ids, page_widths, reload, temp_output_path, write_fixture};

fn page_text(doc: &lopdf::Document, page: lopdf::ObjectId) -> String {
    String::from_utf8_lossy(&doc.get_page_content(page).unwrap()).into_owned()
}

#[tokio::test]
async fn test_stamp_survives_save() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_fixture(&temp_dir, "body.pdf", 3, 0);
    let stamp = write_fixture(&temp_dir, "stamp.pdf", 1, 9);
    let output = temp_output_path();

    let mut doc = load_pdf(&input).await.unwrap();
    let stamp = load_pdf(&stamp).await.unwrap();
    let drawn = overlay_pages(&mut doc, &stamp, OverlayPlacement::Stamp).unwrap();
    assert_eq!(drawn, 3);

    PdfWriter::new().save(&doc, &output).await.unwrap();

    let doc = reload(&output);
    assert_eq!(page_widths(&doc), vec![101, 102, 103]);
    for page in page_ids(&doc) {
        let text = page_text(&doc, page);
        let body = text.find("fixture 0").unwrap();
        let draw = text.rfind(" Do").unwrap();
        assert!(body < draw, "stamp must be drawn after the page: {text}");
    }
}

#[tokio::test]
async fn test_background_is_drawn_first() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_fixture(&temp_dir, "letter.pdf", 2, 0);
    let background = write_fixture(&temp_dir, "letterhead.pdf", 1, 5);

    let mut doc = load_pdf(&input).await.unwrap();
    let background = load_pdf(&background).await.unwrap();
    overlay_pages(&mut doc, &background, OverlayPlacement::Background).unwrap();

    for page in page_ids(&doc) {
        let text = page_text(&doc, page);
        let draw = text.find(" Do").unwrap();
        let body = text.find("fixture 0").unwrap();
        assert!(draw < body, "background must be drawn before the page: {text}");
    }
}
