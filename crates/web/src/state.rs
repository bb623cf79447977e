//! Application state shared by every handler

use std::sync::{Arc, Mutex, MutexGuard};

use bracket_core::{Database, DiskBannerStore};
use tracing::info;

use crate::config::Config;
use crate::error::WebError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub banners: Arc<DiskBannerStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, banners: DiskBannerStore, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            banners: Arc::new(banners),
            config: Arc::new(config),
        }
    }

    /// Open the database and banner folder named by the config
    pub fn from_config(config: Config) -> Result<Self, WebError> {
        let db_path = config.database_path()?;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(bracket_core::Error::from)?;
        }

        let db = Database::open(&db_path)?;
        let banners = DiskBannerStore::with_base_path(config.uploads_dir()?)?;
        info!(db = %db_path.display(), uploads = %banners.base_path().display(), "Opened storage");

        Ok(Self::new(db, banners, config))
    }

    /// Lock the database. Never hold the guard across an `.await`.
    pub fn db(&self) -> Result<MutexGuard<'_, Database>, WebError> {
        self.db.lock().map_err(|_| WebError::LockPoisoned)
    }
}
