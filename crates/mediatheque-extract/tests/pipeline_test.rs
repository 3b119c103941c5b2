//! End-to-end pipeline tests: validate → store → extract.

use mediatheque_core::constants::MAX_UPLOAD_SIZE_BYTES;
use mediatheque_extract::{Orchestrator, UploadValidator, ValidationError};
use mediatheque_storage::{ContentStore, HashedLocalStore};
use serde_json::json;
use tempfile::tempdir;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn png_upload_flows_through_validate_store_extract() {
    let dir = tempdir().unwrap();
    let media_root = dir.path().join("media");
    let bytes = png_bytes(120, 80);

    let validator = UploadValidator::new(MAX_UPLOAD_SIZE_BYTES);
    validator
        .validate("affiche.png", "image/png", bytes.len())
        .unwrap();

    let store = HashedLocalStore::new(&media_root).await.unwrap();
    let key = store.store("affiche.png", bytes.clone()).await.unwrap();
    let again = store.store("copie.png", bytes).await.unwrap();
    assert_eq!(key, again, "identical content dedups to one stored path");

    let orchestrator = Orchestrator::new(&media_root, None, None);
    let metadata = orchestrator
        .extract(&store.absolute_path(&key).unwrap())
        .await;

    assert_eq!(metadata["format"], json!("Png"));
    assert_eq!(metadata["taille"], json!(["120", "80"]));

    let thumb_key = metadata["miniature"].as_str().unwrap();
    assert!(media_root.join(thumb_key).exists());
}

#[tokio::test]
async fn rerunning_extraction_overwrites_the_thumbnail() {
    let dir = tempdir().unwrap();
    let media_root = dir.path().join("media");
    let bytes = png_bytes(64, 64);

    let store = HashedLocalStore::new(&media_root).await.unwrap();
    let key = store.store("logo.png", bytes).await.unwrap();
    let source = store.absolute_path(&key).unwrap();

    let orchestrator = Orchestrator::new(&media_root, None, None);
    let first = orchestrator.extract(&source).await;
    let second = orchestrator.extract(&source).await;

    assert_eq!(first["miniature"], second["miniature"]);
    assert!(media_root
        .join(second["miniature"].as_str().unwrap())
        .exists());
}

#[tokio::test]
async fn mislabeled_archive_passes_validation_but_extracts_empty() {
    // Declared-type validation and sniffed-type dispatch deliberately
    // disagree: a zip renamed .pdf with a PDF declared type gets past the
    // validator, then extraction routes on real content and yields nothing.
    let dir = tempdir().unwrap();
    let media_root = dir.path().join("media");
    let bytes = b"PK\x03\x04not really a pdf".to_vec();

    let validator = UploadValidator::new(MAX_UPLOAD_SIZE_BYTES);
    validator
        .validate("archive.pdf", "application/pdf", bytes.len())
        .unwrap();

    let store = HashedLocalStore::new(&media_root).await.unwrap();
    let key = store.store("archive.pdf", bytes).await.unwrap();

    let orchestrator = Orchestrator::new(&media_root, None, None);
    let metadata = orchestrator
        .extract(&store.absolute_path(&key).unwrap())
        .await;

    assert!(metadata.is_empty());
}

#[tokio::test]
async fn oversized_upload_never_reaches_the_store() {
    let validator = UploadValidator::new(MAX_UPLOAD_SIZE_BYTES);
    let result = validator.validate("gros.pdf", "application/pdf", 60 * 1024 * 1024);
    assert!(matches!(result, Err(ValidationError::FileTooLarge { .. })));
}
