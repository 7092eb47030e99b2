//! Integration tests for split and rotate/extract.

use pdfbuilder::assemble::{split_output_paths, split_pages, transform_pages};
use pdfbuilder::config::Rotation;
use pdfbuilder::io::{PdfWriter, load_pdf};
use pdfbuilder::selection::{self, PageWindow};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{page_rotations, page_widths, reload, temp_output_path, write_fixture};

#[tokio::test]
async fn test_split_writes_one_file_per_page() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_fixture(&temp_dir, "report.pdf", 3, 0);
    let out_dir = temp_dir.path().join("pages");
    std::fs::create_dir_all(&out_dir).unwrap();

    let doc = load_pdf(&input).await.unwrap();
    let pages = split_pages(&doc).unwrap();
    let paths = split_output_paths(&input, &out_dir, pages.len());

    let writer = PdfWriter::new();
    for (page, path) in pages.iter().zip(&paths) {
        writer.save(page, path).await.unwrap();
    }

    assert_eq!(
        paths,
        vec![
            out_dir.join("report_0001.pdf"),
            out_dir.join("report_0002.pdf"),
            out_dir.join("report_0003.pdf"),
        ]
    );
    for (n, path) in paths.iter().enumerate() {
        let single = reload(path);
        assert_eq!(page_widths(&single), vec![101 + n as i64]);
    }
}

#[rstest]
#[case("2-4", Rotation::Clockwise90, false, vec![101, 102, 103, 104, 105], vec![0, 90, 90, 90, 0])]
#[case("4-2", Rotation::Clockwise270, true, vec![102, 103, 104], vec![270, 270, 270])]
#[case("5", Rotation::None, true, vec![105], vec![0])]
#[tokio::test]
async fn test_rotate_window(
    #[case] pages: &str,
    #[case] rotation: Rotation,
    #[case] drop_outside: bool,
    #[case] widths: Vec<i64>,
    #[case] rotations: Vec<i64>,
) {
    let temp_dir = TempDir::new().unwrap();
    let input = write_fixture(&temp_dir, "scan.pdf", 5, 0);
    let output = temp_output_path();

    let window = PageWindow::try_from(&selection::parse(pages).unwrap()).unwrap();
    let mut doc = load_pdf(&input).await.unwrap();
    transform_pages(&mut doc, &input, window, rotation, drop_outside).unwrap();
    PdfWriter::new().save(&doc, &output).await.unwrap();

    let doc = reload(&output);
    assert_eq!(page_widths(&doc), widths);
    assert_eq!(page_rotations(&doc), rotations);
}

#[tokio::test]
async fn test_rotation_accumulates() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_fixture(&temp_dir, "scan.pdf", 1, 0);

    let mut doc = load_pdf(&input).await.unwrap();
    let window = PageWindow::all(1);
    transform_pages(&mut doc, &input, window, Rotation::Rotate180, false).unwrap();
    transform_pages(&mut doc, &input, window, Rotation::Clockwise270, false).unwrap();

    assert_eq!(page_rotations(&doc), vec![90]);
}

#[tokio::test]
async fn test_rotate_window_past_end_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_fixture(&temp_dir, "scan.pdf", 3, 0);

    let mut doc = load_pdf(&input).await.unwrap();
    let window = PageWindow::from_pages(2, 9).unwrap();
    let result = transform_pages(&mut doc, &input, window, Rotation::Clockwise90, true);

    assert!(result.is_err());
    assert_eq!(page_rotations(&doc), vec![0, 0, 0]);
}
