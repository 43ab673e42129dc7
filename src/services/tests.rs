use crate::auth::AuthSession;
use crate::db::fake::FakeDatabase;
use crate::db::models::{NewArtwork, NewTimelineEvent, TimelineEventPatch, ORDER_INDEX_LAST};
use crate::db::store::{ArtworkStore, ExhibitStore, SettingsStore};
use crate::services::artworks::ArtworkService;
use crate::services::delete_flow::DeleteAllFlow;
use crate::services::error::ServiceError;
use crate::services::exhibits::ExhibitService;
use crate::services::settings::{SettingsService, DEFAULT_EXHIBITION_DATE};
use crate::services::timeline::{valid_event_time, TimelineService};
use crate::storage::fake::FakeObjectStore;
use crate::storage::gateway::{StorageGateway, UploadFile};
use bytes::Bytes;
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

fn png_file(width: u32, height: u32) -> UploadFile {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
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

fn new_artwork(title: &str) -> NewArtwork {
    NewArtwork {
        title: title.to_string(),
        artist: "Tester".to_string(),
        ..Default::default()
    }
}

fn artwork_service(
    db: &FakeDatabase,
    store: &FakeObjectStore,
    session: Option<AuthSession>,
) -> ArtworkService<FakeDatabase, FakeObjectStore> {
    ArtworkService::new(
        db.clone(),
        Arc::new(StorageGateway::new(store.clone())),
        session,
    )
}

// --- artworks ---

#[tokio::test]
async fn create_requires_a_session() {
    let service = artwork_service(&FakeDatabase::new(), &FakeObjectStore::new(), None);
    let result = service.create(new_artwork("Dawn")).await;
    assert!(matches!(result, Err(ServiceError::Auth)));
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let session = AuthSession::new(Uuid::new_v4());
    let service = artwork_service(&FakeDatabase::new(), &FakeObjectStore::new(), Some(session));
    let result = service.create(new_artwork("   ")).await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn create_owner_comes_from_the_session() {
    let db = FakeDatabase::new();
    let session = AuthSession::new(Uuid::new_v4());
    let service = artwork_service(&db, &FakeObjectStore::new(), Some(session));

    let id = service.create(new_artwork("Dawn")).await.unwrap();
    let stored = ArtworkStore::get(&db, id).await.unwrap();
    assert_eq!(stored.user_id, session.user_id);
}

#[tokio::test]
async fn create_with_image_uploads_then_references() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let session = AuthSession::new(Uuid::new_v4());
    let service = artwork_service(&db, &objects, Some(session));

    let id = service
        .create_with_image(png_file(40, 30), new_artwork("Dawn"))
        .await
        .unwrap();

    let stored = ArtworkStore::get(&db, id).await.unwrap();
    let path = stored.image_path.unwrap();
    assert!(objects.fake_has_object(&path));
    assert_eq!(
        stored.image_url.unwrap(),
        format!("https://fake.storage.test/{}", path)
    );
}

#[tokio::test]
async fn replace_image_swaps_object_after_row_update() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let session = AuthSession::new(Uuid::new_v4());
    let service = artwork_service(&db, &objects, Some(session));

    let id = service
        .create_with_image(png_file(40, 30), new_artwork("Dawn"))
        .await
        .unwrap();
    let old_path = ArtworkStore::get(&db, id).await.unwrap().image_path.unwrap();

    service.replace_image(id, png_file(60, 40)).await.unwrap();

    let new_path = ArtworkStore::get(&db, id).await.unwrap().image_path.unwrap();
    assert_ne!(new_path, old_path);
    assert!(objects.fake_has_object(&new_path));
    assert!(!objects.fake_has_object(&old_path));
}

#[tokio::test]
async fn replace_image_survives_old_object_cleanup_failure() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let session = AuthSession::new(Uuid::new_v4());
    let service = artwork_service(&db, &objects, Some(session));

    let id = service
        .create_with_image(png_file(40, 30), new_artwork("Dawn"))
        .await
        .unwrap();

    // New upload succeeds, only the old-object delete fails
    objects.fake_fail_deletes(true);
    service.replace_image(id, png_file(60, 40)).await.unwrap();

    let stored = ArtworkStore::get(&db, id).await.unwrap();
    assert!(objects.fake_has_object(&stored.image_path.unwrap()));
}

#[tokio::test]
async fn delete_frees_the_image_and_the_row() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let session = AuthSession::new(Uuid::new_v4());
    let service = artwork_service(&db, &objects, Some(session));

    let id = service
        .create_with_image(png_file(40, 30), new_artwork("Dawn"))
        .await
        .unwrap();
    let path = ArtworkStore::get(&db, id).await.unwrap().image_path.unwrap();

    service.delete(id).await.unwrap();
    assert!(!objects.fake_has_object(&path));
    assert_eq!(db.fake_artwork_count(), 0);
}

#[tokio::test]
async fn delete_proceeds_when_image_cleanup_fails() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let session = AuthSession::new(Uuid::new_v4());
    let service = artwork_service(&db, &objects, Some(session));

    let id = service
        .create_with_image(png_file(40, 30), new_artwork("Dawn"))
        .await
        .unwrap();

    objects.fake_fail_deletes(true);
    service.delete(id).await.unwrap();
    assert_eq!(db.fake_artwork_count(), 0);
}

// --- delete-all flow ---

#[test]
fn token_requires_both_confirmations() {
    let flow = DeleteAllFlow::new();
    assert!(flow.arm().is_none());

    let flow = flow.confirm();
    assert!(flow.arm().is_none());

    let flow = flow.confirm();
    assert!(flow.arm().is_some());
}

#[test]
fn cancel_returns_to_idle_at_any_step() {
    let flow = DeleteAllFlow::new().confirm().cancel();
    assert!(flow.arm().is_none());

    let flow = DeleteAllFlow::new().confirm().confirm().cancel();
    assert!(flow.arm().is_none());
}

#[tokio::test]
async fn delete_all_only_touches_the_session_owner() {
    let db = FakeDatabase::new();
    let mine = AuthSession::new(Uuid::new_v4());
    let theirs = AuthSession::new(Uuid::new_v4());
    let objects = FakeObjectStore::new();

    artwork_service(&db, &objects, Some(mine))
        .create(new_artwork("Mine"))
        .await
        .unwrap();
    artwork_service(&db, &objects, Some(theirs))
        .create(new_artwork("Theirs"))
        .await
        .unwrap();

    let token = DeleteAllFlow::new().confirm().confirm().arm().unwrap();
    artwork_service(&db, &objects, Some(mine))
        .delete_all(token)
        .await
        .unwrap();

    assert_eq!(db.fake_artwork_count(), 1);
    let remaining = ArtworkStore::list(&db).await.unwrap();
    assert_eq!(remaining[0].title, "Theirs");
}

// --- exhibits ---

#[tokio::test]
async fn new_moments_are_placed_last() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let service = ExhibitService::new(db.clone(), Arc::new(StorageGateway::new(objects.clone())));

    let id = service.add(png_file(40, 30)).await.unwrap();
    let exhibit = ExhibitStore::get(&db, id).await.unwrap();
    assert_eq!(exhibit.order_index, ORDER_INDEX_LAST);
    assert!(objects.fake_has_object(&exhibit.image_path));
}

#[tokio::test]
async fn moment_replace_image_drops_the_old_object() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let service = ExhibitService::new(db.clone(), Arc::new(StorageGateway::new(objects.clone())));

    let id = service.add(png_file(40, 30)).await.unwrap();
    let old_path = ExhibitStore::get(&db, id).await.unwrap().image_path;

    service.replace_image(id, png_file(60, 40)).await.unwrap();

    let new_path = ExhibitStore::get(&db, id).await.unwrap().image_path;
    assert_ne!(new_path, old_path);
    assert!(objects.fake_has_object(&new_path));
    assert!(!objects.fake_has_object(&old_path));
}

#[tokio::test]
async fn moment_delete_removes_object_and_row() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let service = ExhibitService::new(db.clone(), Arc::new(StorageGateway::new(objects.clone())));

    let id = service.add(png_file(40, 30)).await.unwrap();
    let path = ExhibitStore::get(&db, id).await.unwrap().image_path;

    service.delete(id).await.unwrap();
    assert!(!objects.fake_has_object(&path));
    assert!(ExhibitStore::get(&db, id).await.is_err());
}

// --- timeline ---

#[test]
fn event_time_validation() {
    for accepted in ["09:05", "9:05", "14:00", "23:59", "0:00"] {
        assert!(valid_event_time(accepted), "{} should be valid", accepted);
    }
    for rejected in ["9:5", "25:00", "14:60", "14", "14:00:00", "ab:cd", ""] {
        assert!(!valid_event_time(rejected), "{} should be invalid", rejected);
    }
}

#[tokio::test]
async fn timeline_create_rejects_bad_time() {
    let service = TimelineService::new(FakeDatabase::new());
    let result = service
        .create(NewTimelineEvent {
            time: "25:00".to_string(),
            title: "Opening".to_string(),
            description: "Doors open".to_string(),
            order: 1,
        })
        .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn timeline_patch_validates_present_fields_only() {
    let service = TimelineService::new(FakeDatabase::new());
    let id = service
        .create(NewTimelineEvent {
            time: "14:00".to_string(),
            title: "Opening".to_string(),
            description: "Doors open".to_string(),
            order: 1,
        })
        .await
        .unwrap();

    // Absent time is fine, present-but-empty title is not
    let ok = service
        .update(
            id,
            TimelineEventPatch {
                description: Some("Updated".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(ok.is_ok());

    let bad = service
        .update(
            id,
            TimelineEventPatch {
                title: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(bad, Err(ServiceError::Validation(_))));
}

// --- settings ---

fn settings_service(
    db: &FakeDatabase,
    store: &FakeObjectStore,
    session: Option<AuthSession>,
) -> SettingsService<FakeDatabase, FakeObjectStore> {
    SettingsService::new(
        db.clone(),
        Arc::new(StorageGateway::new(store.clone())),
        session,
    )
}

#[tokio::test]
async fn exhibition_date_defaults_until_set() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let session = AuthSession::new(Uuid::new_v4());
    let service = settings_service(&db, &objects, Some(session));

    assert_eq!(service.exhibition_date().await.unwrap(), DEFAULT_EXHIBITION_DATE);

    service.set_exhibition_date("12 March 2027").await.unwrap();
    assert_eq!(service.exhibition_date().await.unwrap(), "12 March 2027");
}

#[tokio::test]
async fn set_cv_requires_a_session() {
    let service = settings_service(&FakeDatabase::new(), &FakeObjectStore::new(), None);
    let result = service.set_cv(png_file(40, 30)).await;
    assert!(matches!(result, Err(ServiceError::Auth)));
}

#[tokio::test]
async fn set_cv_replaces_the_previous_image() {
    let db = FakeDatabase::new();
    let objects = FakeObjectStore::new();
    let session = AuthSession::new(Uuid::new_v4());
    let service = settings_service(&db, &objects, Some(session));

    service.set_cv(png_file(40, 30)).await.unwrap();
    let first = service.cv().await.unwrap().unwrap().image_path.unwrap();

    service.set_cv(png_file(60, 40)).await.unwrap();
    let second = service.cv().await.unwrap().unwrap().image_path.unwrap();

    assert_ne!(first, second);
    assert!(objects.fake_has_object(&second));
    assert!(!objects.fake_has_object(&first));
    assert_eq!(objects.fake_object_count(), 1);
}

#[tokio::test]
async fn cv_is_absent_until_uploaded() {
    let db = FakeDatabase::new();
    let service = settings_service(&db, &FakeObjectStore::new(), None);
    assert!(service.cv().await.unwrap().is_none());
    assert!(SettingsStore::get(&db, "cv").await.unwrap().is_none());
}
