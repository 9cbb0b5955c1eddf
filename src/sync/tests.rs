use crate::db::{FakeDatabase, Table};
use crate::gateway::Gateway;
use crate::models::MediaType;
use crate::s3::FakeStorage;
use crate::sync::{FetchState, Synchronizer, ViewState, MIN_SYNC_INTERVAL};
use crate::test_utils::{sample_media_item, sample_speaker, sample_survey_response};
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct TestEnvironment {
    db: FakeDatabase,
    gateway: Arc<Gateway<FakeDatabase, FakeStorage>>,
    synchronizer: Arc<Synchronizer<FakeDatabase, FakeStorage>>,
}

fn setup() -> TestEnvironment {
    let db = FakeDatabase::new();
    let gateway = Arc::new(Gateway::new(db.clone(), FakeStorage::new()));
    let synchronizer = Arc::new(
        Synchronizer::new(gateway.clone(), ViewState::shared())
            .with_interval(Duration::from_millis(20)),
    );
    TestEnvironment {
        db,
        gateway,
        synchronizer,
    }
}

#[tokio::test]
async fn reconcile_overwrites_every_collection() {
    let env = setup();
    let remote_photo = sample_media_item("remote.jpg", MediaType::Photo);
    env.gateway.create_media_item(&remote_photo).await.unwrap();
    env.gateway
        .create_speaker(&sample_speaker("Boris"))
        .await
        .unwrap();
    env.gateway
        .create_survey_response(&sample_survey_response("Anna"))
        .await
        .unwrap();

    // Something only cached locally disappears on reconcile
    env.synchronizer
        .view()
        .write()
        .await
        .add_media([sample_media_item("local-only.jpg", MediaType::Photo)]);

    let report = env
        .synchronizer
        .reconcile_once(&CancellationToken::new())
        .await
        .unwrap();
    assert!(report.all_reconciled());

    let view = env.synchronizer.view().read().await;
    assert_eq!(view.media.items.len(), 1);
    assert_eq!(view.media.items[0].id, remote_photo.id);
    assert_eq!(view.speakers.items.len(), 1);
    assert_eq!(view.survey_responses.items.len(), 1);
    assert!(view.media.last_reconciled.is_some());
}

#[tokio::test]
async fn failed_fetch_keeps_previous_items() {
    let env = setup();
    env.gateway
        .create_speaker(&sample_speaker("Boris"))
        .await
        .unwrap();
    env.synchronizer
        .reconcile_once(&CancellationToken::new())
        .await
        .unwrap();

    env.gateway
        .create_speaker(&sample_speaker("Vera"))
        .await
        .unwrap();
    env.db.fake_fail_table(Table::Speakers);

    let report = env
        .synchronizer
        .reconcile_once(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.speakers, FetchState::FetchFailed);
    assert_eq!(report.media, FetchState::Reconciled);
    assert!(!report.all_reconciled());

    {
        let view = env.synchronizer.view().read().await;
        assert_eq!(view.speakers.items.len(), 1);
        assert_eq!(view.speakers.items[0].name, "Boris");
        assert_eq!(view.speakers.state, FetchState::FetchFailed);
    }

    // The next cycle picks the change up
    env.db.fake_restore_table(Table::Speakers);
    env.synchronizer
        .reconcile_once(&CancellationToken::new())
        .await
        .unwrap();
    let view = env.synchronizer.view().read().await;
    let names: Vec<&str> = view.speakers.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Boris", "Vera"]);
}

#[tokio::test]
async fn cancelled_before_start_touches_nothing() {
    let env = setup();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(env.synchronizer.reconcile_once(&cancel).await.is_none());
    assert_eq!(env.db.call_count(Table::MediaItems), 0);

    let view = env.synchronizer.view().read().await;
    assert_eq!(view.media.state, FetchState::Idle);
}

#[tokio::test]
async fn cancel_during_fetch_discards_results() {
    let env = setup();
    env.gateway
        .create_media_item(&sample_media_item("late.jpg", MediaType::Photo))
        .await
        .unwrap();
    env.db.fake_set_latency(Duration::from_millis(200));

    let cancel = CancellationToken::new();
    let synchronizer = env.synchronizer.clone();
    let task_cancel = cancel.clone();
    let task = tokio::spawn(async move { synchronizer.reconcile_once(&task_cancel).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();

    assert!(task.await.unwrap().is_none());
    let view = env.synchronizer.view().read().await;
    assert!(view.media.items.is_empty());
    assert!(view.media.last_reconciled.is_none());
    assert_eq!(view.media.state, FetchState::Idle);
    assert_eq!(view.speakers.state, FetchState::Idle);
    assert_eq!(view.survey_responses.state, FetchState::Idle);
}

#[tokio::test]
async fn zero_interval_is_raised_and_loop_keeps_running() {
    let db = FakeDatabase::new();
    let gateway = Arc::new(Gateway::new(db.clone(), FakeStorage::new()));
    let synchronizer = Arc::new(
        Synchronizer::new(gateway, ViewState::shared()).with_interval(Duration::ZERO),
    );
    assert_eq!(synchronizer.interval(), MIN_SYNC_INTERVAL);

    let cancel = CancellationToken::new();
    let handle = synchronizer.clone().spawn(cancel.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    handle.await.unwrap();
    assert!(db.call_count(Table::MediaItems) >= 2);
    let view = synchronizer.view().read().await;
    assert!(view.media.last_reconciled.is_some());
    assert!(!view.media.state.is_busy());
}

#[tokio::test]
async fn loop_runs_on_start_and_stops_after_cancel() {
    let env = setup();
    let cancel = CancellationToken::new();
    let handle = env.synchronizer.clone().spawn(cancel.clone());

    tokio::time::sleep(Duration::from_millis(110)).await;
    cancel.cancel();
    handle.await.unwrap();

    let cycles = env.db.call_count(Table::MediaItems);
    assert!(cycles >= 2, "expected repeated cycles, got {cycles}");

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(env.db.call_count(Table::MediaItems), cycles);
}

#[tokio::test]
async fn unconfirmed_local_edit_is_overwritten() {
    let env = setup();
    env.synchronizer
        .reconcile_once(&CancellationToken::new())
        .await
        .unwrap();

    // Added locally without reaching the remote store
    env.synchronizer
        .view()
        .write()
        .await
        .upsert_speaker(sample_speaker("Unsaved"));

    env.synchronizer
        .reconcile_once(&CancellationToken::new())
        .await
        .unwrap();
    assert!(env.synchronizer.view().read().await.speakers.items.is_empty());
}

#[test]
fn view_helpers_keep_remote_ordering() {
    let mut view = ViewState::default();

    let mut older = sample_media_item("old.jpg", MediaType::Photo);
    older.upload_date = Utc::now() - ChronoDuration::days(1);
    view.add_media([older.clone()]);
    let newer = sample_media_item("new.jpg", MediaType::Photo);
    view.add_media([newer.clone()]);
    assert_eq!(view.media.items[0].id, newer.id);
    assert!(view.remove_media(&older.id));
    assert!(!view.remove_media(&older.id));

    let mut zoe = sample_speaker("Zoe");
    view.upsert_speaker(zoe.clone());
    view.upsert_speaker(sample_speaker("Adam"));
    zoe.role = "Founder".to_string();
    view.upsert_speaker(zoe.clone());
    let names: Vec<&str> = view.speakers.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Adam", "Zoe"]);
    assert_eq!(view.speakers.items[1].role, "Founder");

    let response = sample_survey_response("Ivan");
    view.add_survey_response(response.clone());
    assert!(view.remove_survey_response(&response.id));
}
