use crate::local::snapshot::{MEDIA_KEY, SPEAKERS_KEY, SURVEY_KEY};
use crate::local::state::ADMIN_AUTH_KEY;
use crate::local::{AppState, FakeLocalStore, LegacySnapshot, LocalStore, SqliteLocalStore};
use crate::models::MediaType;
use crate::test_utils::{sample_legacy_media_item, sample_speaker, sample_survey_response};
use std::sync::Arc;

type LocalStoreFactory = Box<dyn Fn() -> futures::future::BoxFuture<'static, Arc<dyn LocalStore>>>;

/// Every store implementation; SQLite runs in memory so it is always included
fn get_test_stores() -> Vec<LocalStoreFactory> {
    vec![
        Box::new(|| Box::pin(async { Arc::new(FakeLocalStore::new()) as Arc<dyn LocalStore> })),
        Box::new(|| {
            Box::pin(async {
                let store = SqliteLocalStore::new(":memory:")
                    .expect("Failed to create in-memory SQLite store");
                Arc::new(store) as Arc<dyn LocalStore>
            })
        }),
    ]
}

#[tokio::test]
async fn set_get_and_remove_round_trip() {
    for factory in get_test_stores() {
        let store = factory().await;

        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("greeting", "hello").await.unwrap();
        store.set("greeting", "hi").await.unwrap();
        assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("hi"));

        store.remove("greeting").await.unwrap();
        assert_eq!(store.get("greeting").await.unwrap(), None);

        // Removing twice is fine
        store.remove("greeting").await.unwrap();
    }
}

#[tokio::test]
async fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("local.db");
    let path = path.to_str().unwrap();

    {
        let store = SqliteLocalStore::new(path).unwrap();
        store.set(ADMIN_AUTH_KEY, "true").await.unwrap();
    }

    let reopened = SqliteLocalStore::new(path).unwrap();
    assert_eq!(
        reopened.get(ADMIN_AUTH_KEY).await.unwrap().as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn snapshot_merges_legacy_keys_and_dedupes_by_id() {
    let store = FakeLocalStore::new();
    let photo = sample_legacy_media_item("1700000000000-0", "hall.jpg", MediaType::Photo);
    let video = sample_legacy_media_item("1700000000001-0", "talk.mp4", MediaType::Video);

    store.fake_put(MEDIA_KEY, &serde_json::to_string(&vec![&photo]).unwrap());
    // The per-type key repeats the photo and adds a video
    store.fake_put(
        "photos",
        &serde_json::to_string(&vec![&photo]).unwrap(),
    );
    store.fake_put("videos", &serde_json::to_string(&vec![&video]).unwrap());

    let survey = sample_survey_response("Anna Smirnova");
    store.fake_put(
        "surveyResponses",
        &serde_json::to_string(&vec![&survey]).unwrap(),
    );

    let snapshot = LegacySnapshot::load(&store).await.unwrap();
    assert_eq!(snapshot.media.len(), 2);
    assert_eq!(snapshot.media[0].id, photo.id);
    assert_eq!(snapshot.media[1].id, video.id);
    assert_eq!(snapshot.survey_responses, vec![survey]);
    assert!(snapshot.speakers.is_empty());
}

#[tokio::test]
async fn snapshot_keeps_every_record_without_an_id() {
    let store = FakeLocalStore::new();
    store.fake_put(
        SPEAKERS_KEY,
        &serde_json::json!([
            { "name": "Draft One", "role": "Keynote" },
            { "id": "", "name": "Draft Two" },
            { "name": "Draft Three" },
        ])
        .to_string(),
    );

    let snapshot = LegacySnapshot::load(&store).await.unwrap();
    let names: Vec<&str> = snapshot.speakers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Draft One", "Draft Two", "Draft Three"]);
}

#[tokio::test]
async fn snapshot_skips_corrupt_entries() {
    let store = FakeLocalStore::new();
    let speaker = sample_speaker("Maria Ivanova");

    store.fake_put(MEDIA_KEY, "{not json");
    let mut entries = vec![serde_json::to_value(&speaker).unwrap()];
    entries.push(serde_json::json!({ "unexpected": true }));
    store.fake_put(SPEAKERS_KEY, &serde_json::to_string(&entries).unwrap());

    let snapshot = LegacySnapshot::load(&store).await.unwrap();
    assert!(snapshot.media.is_empty());
    assert_eq!(snapshot.speakers, vec![speaker]);
}

#[tokio::test]
async fn persist_writes_canonical_keys_and_drops_aliases() {
    for factory in get_test_stores() {
        let store = factory().await;
        let photo = sample_legacy_media_item("1", "hall.jpg", MediaType::Photo);
        store
            .set("photos", &serde_json::to_string(&vec![&photo]).unwrap())
            .await
            .unwrap();
        store.set("surveyResponses", "[]").await.unwrap();

        let mut snapshot = LegacySnapshot::load(&store).await.unwrap();
        snapshot.speakers.push(sample_speaker("Oleg"));
        snapshot.persist(&store).await.unwrap();

        assert_eq!(store.get("photos").await.unwrap(), None);
        assert_eq!(store.get("surveyResponses").await.unwrap(), None);
        assert!(store.get(SURVEY_KEY).await.unwrap().is_some());

        let reloaded = LegacySnapshot::load(&store).await.unwrap();
        assert_eq!(reloaded, snapshot);
    }
}

#[tokio::test]
async fn app_state_defaults_when_nothing_is_stored() {
    for factory in get_test_stores() {
        let state = AppState::init(factory().await).await.unwrap();
        assert!(!state.is_admin());
        assert!(state.legacy().is_empty());
    }
}

#[tokio::test]
async fn admin_flag_survives_reinit() {
    for factory in get_test_stores() {
        let mut state = AppState::init(factory().await).await.unwrap();
        state.login().await.unwrap();
        assert!(state.is_admin());

        let store = state.teardown();
        let mut state = AppState::init(store).await.unwrap();
        assert!(state.is_admin());

        state.logout().await.unwrap();
        let state = AppState::init(state.teardown()).await.unwrap();
        assert!(!state.is_admin());
    }
}

#[tokio::test]
async fn save_legacy_writes_edits_back() {
    let store = FakeLocalStore::new();
    let mut state = AppState::init(store.clone()).await.unwrap();

    state
        .legacy_mut()
        .media
        .push(sample_legacy_media_item("1", "a.jpg", MediaType::Photo));
    state.save_legacy().await.unwrap();

    let reloaded = LegacySnapshot::load(&store).await.unwrap();
    assert_eq!(reloaded.media.len(), 1);
    assert_eq!(reloaded.media[0].name, "a.jpg");
}
