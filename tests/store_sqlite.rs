use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use moodlens_lib::{
    analytics::{mood_score, trend, Trend},
    AppState, Database, Emotion, EmotionStore, HistoryRead, ObservationPatch, RangeFilter,
    SettingsPatch, SlotStore,
};

fn open_store(path: &std::path::Path) -> EmotionStore {
    let db = Database::open(path.to_path_buf()).unwrap();
    EmotionStore::new(Arc::new(db))
}

#[tokio::test]
async fn history_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moodlens.sqlite3");
    let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();

    {
        let store = open_store(&path);
        for (minute, emotion) in [Emotion::Sad, Emotion::Neutral, Emotion::Happy, Emotion::Happy]
            .into_iter()
            .enumerate()
        {
            store
                .append_at(emotion, 0.8, start + Duration::minutes(minute as i64))
                .await
                .unwrap();
        }
    }

    let store = open_store(&path);
    let history = store.query(&RangeFilter::all()).await;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].emotion, Emotion::Sad);
    assert_eq!(history[0].date, "2024-03-04");
    assert_eq!(mood_score(&history), 68);
    assert_eq!(trend(&history).trend, Trend::Improving);
}

#[tokio::test]
async fn export_import_moves_history_between_databases() {
    let dir = tempfile::tempdir().unwrap();
    let source = open_store(&dir.path().join("a.sqlite3"));
    let target = open_store(&dir.path().join("b.sqlite3"));

    let first = source.append(Emotion::Fearful, 0.55).await.unwrap();
    source.append(Emotion::Surprised, 0.9).await.unwrap();
    assert!(source
        .update_by_id(
            first.id,
            ObservationPatch {
                emotion: Some(Emotion::Neutral),
                ..Default::default()
            }
        )
        .await
        .unwrap());

    let snapshot = source.export_snapshot().await.unwrap();
    assert!(target.import_snapshot(&snapshot).await.unwrap());
    assert_eq!(
        target.query(&RangeFilter::all()).await,
        source.query(&RangeFilter::all()).await
    );

    assert!(!target.import_snapshot("{\"not\":\"a list\"}").await.unwrap());
    assert_eq!(target.query(&RangeFilter::all()).await.len(), 2);
}

#[tokio::test]
async fn corrupt_slot_is_reported_and_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("moodlens.sqlite3")).unwrap();
    db.set("emotionHistory", "not json".into()).await.unwrap();

    let store = EmotionStore::new(Arc::new(db));
    assert!(matches!(store.read_history().await, HistoryRead::Corrupt(_)));
    assert!(store.query(&RangeFilter::all()).await.is_empty());
    assert!(store.append(Emotion::Happy, 0.9).await.is_err());

    store.clear().await.unwrap();
    assert_eq!(store.read_history().await, HistoryRead::Empty);
    store.append(Emotion::Happy, 0.9).await.unwrap();
    assert_eq!(store.last(5).await.len(), 1);
}

#[tokio::test]
async fn app_state_shares_one_database() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::open(dir.path().join("data")).unwrap();

    state.store.append(Emotion::Angry, 0.7).await.unwrap();
    let settings = state
        .settings
        .update(SettingsPatch {
            theme: Some("light".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(settings.theme, "light");

    assert!(state.db.get("emotionHistory").await.unwrap().is_some());
    assert!(state.db.get("appSettings").await.unwrap().is_some());
    assert!(!state.detection.lock().await.is_running());
}
