use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::factors;
use crate::services::AppServices;
use footprint_db::Db;

/// Paths and files needed to run the local calculator.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub factors_defaults_path: PathBuf,
}

/// Application state handed to every frontend (HTTP, CLI).
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db_path: PathBuf, factors_defaults_path: PathBuf) -> Self {
        let config = AppConfig {
            db_path,
            factors_defaults_path,
        };
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    /// Migrates the DB, seeds factors when none are stored, then mirrors
    /// them to the defaults file.
    pub fn initialize(&self) -> Result<()> {
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))?;
        if !self.open_db()?.has_emission_factors()? {
            self.apply_factor_defaults()?;
        }
        if let Err(err) = self.sync_factor_defaults() {
            tracing::warn!("failed to sync emission factor defaults: {}", err);
        }
        Ok(())
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }

    pub fn apply_factor_defaults(&self) -> Result<()> {
        factors::apply_factor_defaults(&self.config.db_path, &self.config.factors_defaults_path)
    }

    pub fn sync_factor_defaults(&self) -> Result<()> {
        factors::sync_factor_defaults(&self.config.db_path, &self.config.factors_defaults_path)
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
