//! Integration tests for the persisted settings session.

use pdfbuilder::settings::{SETTINGS_FILE, Session, USER_DATA_FILE};
use std::path::Path;
use tempfile::TempDir;

#[tokio::test]
async fn test_session_round_trip_through_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("pdfbuilder");

    let mut session = Session::load(&dir).await;
    session.record_export(&temp_dir.path().join("exports").join("book.pdf"), 2);
    session.save().await.unwrap();

    assert!(dir.join(SETTINGS_FILE).exists());
    assert!(dir.join(USER_DATA_FILE).exists());

    let reloaded = Session::load(&dir).await;
    assert_eq!(reloaded.user_data.number_of_processed_files, 2);
    assert_eq!(
        reloaded.user_data.filedialog_path,
        temp_dir.path().join("exports")
    );
}

#[tokio::test]
async fn test_last_directory_resolves_bare_names() {
    let temp_dir = TempDir::new().unwrap();
    let exports = temp_dir.path().join("exports");
    std::fs::create_dir_all(&exports).unwrap();
    std::fs::write(exports.join("book.pdf"), b"%PDF-1.5").unwrap();

    let mut session = Session::load(temp_dir.path().join("cfg")).await;
    session.record_export(&exports.join("book.pdf"), 1);

    assert_eq!(
        session.resolve_input(Path::new("book.pdf")).await,
        exports.join("book.pdf")
    );
}

#[tokio::test]
async fn test_unknown_keys_are_dropped_on_save() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(SETTINGS_FILE),
        r#"{"use_poppler_tools": true, "theme": "dark"}"#,
    )
    .unwrap();

    let session = Session::load(temp_dir.path()).await;
    assert!(session.settings.use_poppler_tools);
    session.save().await.unwrap();

    let raw = std::fs::read_to_string(temp_dir.path().join(SETTINGS_FILE)).unwrap();
    assert!(!raw.contains("theme"));
    assert!(raw.contains("use_poppler_tools"));
}
