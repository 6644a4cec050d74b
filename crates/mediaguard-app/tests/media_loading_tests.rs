//! Integration tests for local media file loading.

use std::path::PathBuf;

use mediaguard_app::{AppError, load_media_file};
use mediaguard_core::MediaKind;

fn scratch_file(name: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mediaguard-media-loading-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("scratch file should be writable");
    path
}

#[test]
fn media_loading_tests_declares_type_from_extension() {
    let path = scratch_file("clip.mp4", &[0_u8; 16]);
    let blob = load_media_file(&path).expect("file should load");

    assert_eq!(blob.file_name, "clip.mp4");
    assert_eq!(blob.media_type, "video/mp4");
    assert_eq!(blob.kind(), MediaKind::Video);
    assert_eq!(blob.size_bytes(), 16);
}

#[test]
fn media_loading_tests_image_extension_is_image() {
    let path = scratch_file("photo.png", b"\x89PNG");
    let blob = load_media_file(&path).expect("file should load");
    assert_eq!(blob.media_type, "image/png");
    assert_eq!(blob.kind(), MediaKind::Image);
}

#[test]
fn media_loading_tests_unknown_extension_falls_back_to_image() {
    let path = scratch_file("capture.unknownext", b"raw");
    let blob = load_media_file(&path).expect("file should load");
    assert_eq!(blob.media_type, "application/octet-stream");
    assert_eq!(blob.kind(), MediaKind::Image);
}

#[test]
fn media_loading_tests_missing_file_reports_path() {
    let path = std::env::temp_dir().join("mediaguard-definitely-missing.mp4");
    let error = load_media_file(&path).expect_err("missing file should fail");
    assert!(matches!(error, AppError::ReadMedia { .. }));
    assert!(error.to_string().contains("mediaguard-definitely-missing.mp4"));
}
