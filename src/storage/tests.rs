use crate::storage::error::StorageError;
use crate::storage::fake::FakeObjectStore;
use crate::storage::gateway::{StorageGateway, UploadFile, MAX_UPLOAD_BYTES};
use crate::storage::image::{preprocess, scaled_height, PreprocessOptions};
use bytes::Bytes;
use std::io::Cursor;
use uuid::Uuid;

fn png_file(width: u32, height: u32) -> UploadFile {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 80, 40]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    UploadFile {
        filename: "photo.png".to_string(),
        content_type: "image/png".to_string(),
        data: Bytes::from(buf),
    }
}

#[test]
fn preprocess_clamps_width_and_scales_height() {
    let file = png_file(400, 300);
    let options = PreprocessOptions {
        max_width: 100,
        quality: 80,
    };

    let processed = preprocess(&file.data, &file.filename, options).unwrap();
    assert_eq!(processed.width, 100);
    assert_eq!(processed.height, 75);
    assert_eq!(processed.content_type, "image/jpeg");
    assert_eq!(processed.filename, "photo.png");
    assert!(processed.modified_at <= chrono::Utc::now());

    // Output must decode as a JPEG of the clamped dimensions
    let round_trip = image::load_from_memory(&processed.data).unwrap();
    assert_eq!(round_trip.width(), 100);
    assert_eq!(round_trip.height(), 75);
}

#[test]
fn preprocess_never_upscales() {
    let file = png_file(50, 40);
    let options = PreprocessOptions {
        max_width: 100,
        quality: 80,
    };

    let processed = preprocess(&file.data, &file.filename, options).unwrap();
    assert_eq!(processed.width, 50);
    assert_eq!(processed.height, 40);
}

#[test]
fn preprocess_rejects_undecodable_input() {
    let result = preprocess(b"definitely not an image", "x.png", PreprocessOptions::default());
    assert!(matches!(result, Err(StorageError::Decode(_))));
}

#[test]
fn scaled_height_rounds_to_nearest() {
    assert_eq!(scaled_height(400, 300, 100), 75);
    assert_eq!(scaled_height(3, 2, 2), 1);
    // A degenerate 1-pixel-tall panorama still keeps a visible height
    assert_eq!(scaled_height(1000, 1, 100), 1);
}

#[test]
fn validate_accepts_the_allow_list() {
    for content_type in [
        "image/jpeg",
        "image/jpg",
        "image/png",
        "image/webp",
        "image/gif",
    ] {
        let file = UploadFile {
            filename: "a".to_string(),
            content_type: content_type.to_string(),
            data: Bytes::from_static(b"tiny"),
        };
        assert!(StorageGateway::<FakeObjectStore>::validate(&file).is_ok());
    }
}

#[test]
fn validate_rejects_type_and_size() {
    let pdf = UploadFile {
        filename: "cv.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        data: Bytes::from_static(b"%PDF"),
    };
    assert!(matches!(
        StorageGateway::<FakeObjectStore>::validate(&pdf),
        Err(StorageError::InvalidFileType(_))
    ));

    let huge = UploadFile {
        filename: "big.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        data: Bytes::from(vec![0u8; MAX_UPLOAD_BYTES as usize + 1]),
    };
    assert!(matches!(
        StorageGateway::<FakeObjectStore>::validate(&huge),
        Err(StorageError::FileTooLarge { .. })
    ));
}

#[tokio::test]
async fn upload_image_namespaces_key_by_owner() {
    let store = FakeObjectStore::new();
    let gateway = StorageGateway::new(store.clone());
    let owner = Uuid::new_v4();

    let uploaded = gateway.upload_image(png_file(40, 30), owner).await.unwrap();

    assert!(uploaded.path.starts_with(&format!("{}/", owner)));
    assert!(uploaded.path.ends_with(".jpg"));
    assert_eq!(
        uploaded.url,
        format!("https://fake.storage.test/{}", uploaded.path)
    );
    assert!(store.fake_has_object(&uploaded.path));
    assert_eq!(
        store.fake_content_type(&uploaded.path).as_deref(),
        Some("image/jpeg")
    );
}

#[tokio::test]
async fn moment_keys_live_at_bucket_root() {
    let store = FakeObjectStore::new();
    let gateway = StorageGateway::new(store.clone());

    let uploaded = gateway.upload_moment_image(png_file(40, 30)).await.unwrap();
    assert!(!uploaded.path.contains('/'));
    assert!(uploaded.path.ends_with(".jpg"));
}

#[tokio::test]
async fn invalid_file_never_reaches_the_store() {
    let store = FakeObjectStore::new();
    let gateway = StorageGateway::new(store.clone());

    let bad = UploadFile {
        filename: "notes.txt".to_string(),
        content_type: "text/plain".to_string(),
        data: Bytes::from_static(b"hello"),
    };
    let result = gateway.upload_image(bad, Uuid::new_v4()).await;

    assert!(matches!(result, Err(StorageError::InvalidFileType(_))));
    assert_eq!(store.fake_object_count(), 0);
}

#[tokio::test]
async fn upload_failure_surfaces_to_the_caller() {
    let store = FakeObjectStore::new();
    store.fake_fail_puts(true);
    let gateway = StorageGateway::new(store);

    let result = gateway.upload_image(png_file(40, 30), Uuid::new_v4()).await;
    assert!(matches!(result, Err(StorageError::Write(_, _))));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let store = FakeObjectStore::new();
    let gateway = StorageGateway::new(store.clone());

    let uploaded = gateway
        .upload_image(png_file(40, 30), Uuid::new_v4())
        .await
        .unwrap();

    gateway.delete_image(&uploaded.path).await.unwrap();
    // Second delete of the same path must not error
    gateway.delete_image(&uploaded.path).await.unwrap();
    assert!(!store.fake_has_object(&uploaded.path));
}

#[tokio::test]
async fn empty_path_delete_is_a_no_op() {
    let gateway = StorageGateway::new(FakeObjectStore::new());
    gateway.delete_image("").await.unwrap();
}

#[tokio::test]
async fn non_missing_delete_failures_propagate() {
    let store = FakeObjectStore::new();
    let gateway = StorageGateway::new(store.clone());
    let uploaded = gateway
        .upload_image(png_file(40, 30), Uuid::new_v4())
        .await
        .unwrap();

    store.fake_fail_deletes(true);
    let result = gateway.delete_image(&uploaded.path).await;
    assert!(matches!(result, Err(StorageError::Delete(_, _))));
}
