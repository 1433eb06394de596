pub mod analytics;
pub mod dashboard;
mod db;
pub mod detection;
pub mod error;
pub mod models;
pub mod settings;
pub mod storage;
pub mod store;
mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::Mutex;

pub use dashboard::DashboardSummary;
pub use db::Database;
pub use detection::{
    CaptureDevice, Classifier, DetectionConfig, DetectionController, DetectionError,
};
pub use error::{StoreError, StoreResult, ValidationError};
pub use models::{Emotion, Observation, ObservationPatch};
pub use settings::{Settings, SettingsPatch, SettingsStore};
pub use storage::{MemorySlots, SlotStore};
pub use store::{EmotionStore, HistoryRead, RangeFilter};

const DATA_DIR_ENV: &str = "MOODLENS_DATA_DIR";
const DEBUG_ENV: &str = "MOODLENS_DEBUG";
const DEFAULT_DATA_DIR: &str = "moodlens-data";
const DB_FILE_NAME: &str = "moodlens.sqlite3";

/// Shared handles the front end talks to. Every store reads and writes
/// through the same SQLite worker.
pub struct AppState {
    pub db: Database,
    pub store: EmotionStore,
    pub settings: SettingsStore,
    pub detection: Arc<Mutex<DetectionController>>,
}

impl AppState {
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db = Database::open(data_dir.join(DB_FILE_NAME))?;
        let slots: Arc<dyn SlotStore> = Arc::new(db.clone());

        let store = EmotionStore::new(slots.clone());
        let detection = DetectionController::new(store.clone());

        Ok(Self {
            db,
            store,
            settings: SettingsStore::new(slots),
            detection: Arc::new(Mutex::new(detection)),
        })
    }

    /// Start detection with the discard threshold and auto-save switch taken
    /// from the stored settings.
    pub async fn start_detection(
        &self,
        device: Box<dyn CaptureDevice>,
        classifier: Arc<dyn Classifier>,
    ) -> Result<(), DetectionError> {
        let config = DetectionConfig::from_settings(&self.settings.get().await);
        self.detection
            .lock()
            .await
            .start(device, classifier, config)
            .await
    }
}

fn data_dir_from_env() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn run() -> Result<()> {
    // RUST_LOG still wins over the default level
    let level = if std::env::var_os(DEBUG_ENV).is_some() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::info!("MoodLens starting up...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async {
        let data_dir = data_dir_from_env();
        let state = AppState::open(data_dir.clone())?;
        log::info!("Using data directory {}", data_dir.display());

        if let store::HistoryRead::Corrupt(reason) = state.store.read_history().await {
            log::warn!("Stored emotion history is unreadable ({reason}); clear or import to recover");
        }

        let settings = state.settings.get().await;
        log::debug!("Loaded settings: {settings:?}");

        let summary = DashboardSummary::build(&state.store, Utc::now()).await;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok::<(), anyhow::Error>(())
    })
}
