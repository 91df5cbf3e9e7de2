use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::app::{AppConfig, setup_db};
use crate::error::{AppError, Result};
use crate::services::AppServices;

pub const LEGACY_CSV_FILE_NAME: &str = "carbon_footprint.csv";

#[derive(Clone, Debug)]
pub struct AppPaths {
    pub app_data_dir: PathBuf,
    pub db_path: PathBuf,
    pub factors_defaults_path: PathBuf,
}

impl AppPaths {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let db_path = app_data_dir.join("carbon-footprint.sqlite");
        let factors_defaults_path = app_data_dir.join("carbon-footprint-factors.json");
        Self {
            app_data_dir,
            db_path,
            factors_defaults_path,
        }
    }
}

/// Outcome of importing a legacy calculator CSV into a fresh database.
#[derive(Clone, Debug)]
pub struct LegacyImport {
    pub source: PathBuf,
    pub backup_dir: PathBuf,
    pub imported: usize,
}

pub fn ensure_app_data_dir(paths: &AppPaths) -> Result<()> {
    std::fs::create_dir_all(&paths.app_data_dir)?;
    Ok(())
}

/// Imports `carbon_footprint.csv` from the data dir or the working directory
/// when no database exists yet. The source file is backed up first.
pub fn migrate_legacy_storage(paths: &AppPaths) -> Result<Option<LegacyImport>> {
    let mut candidates = vec![paths.app_data_dir.join(LEGACY_CSV_FILE_NAME)];
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(LEGACY_CSV_FILE_NAME));
    }
    migrate_legacy_storage_from(paths, &candidates)
}

fn migrate_legacy_storage_from(
    paths: &AppPaths,
    candidates: &[PathBuf],
) -> Result<Option<LegacyImport>> {
    if paths.db_path.exists() {
        return Ok(None);
    }
    let Some(source) = candidates.iter().find(|path| path.is_file()) else {
        return Ok(None);
    };
    let backup_dir = paths.app_data_dir.join(format!(
        "legacy-backup-{}",
        Utc::now().format("%Y%m%d%H%M%S")
    ));
    std::fs::create_dir_all(&backup_dir)?;
    std::fs::copy(source, backup_dir.join(LEGACY_CSV_FILE_NAME))
        .map_err(|err| AppError::Message(format!("backup legacy ledger: {}", err)))?;

    setup_db(&paths.db_path)?;
    let services = AppServices::new(&AppConfig {
        db_path: paths.db_path.clone(),
        factors_defaults_path: paths.factors_defaults_path.clone(),
    });
    let imported = match services.ledger.import_legacy(source) {
        Ok(imported) => imported,
        Err(err) => {
            warn!(
                source = %source.display(),
                "legacy ledger import failed: {}", err
            );
            discard_db(&paths.db_path);
            return Err(err);
        }
    };
    info!(
        source = %source.display(),
        backup = %backup_dir.display(),
        imported,
        "migrated legacy ledger"
    );
    Ok(Some(LegacyImport {
        source: source.clone(),
        backup_dir,
        imported,
    }))
}

fn discard_db(db_path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut path = db_path.as_os_str().to_owned();
        path.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_db::{Db, EmissionLedger};

    const LEGACY: &str = "Name,City,Transport Emission,Electricity Emission,Waste Emission,Total Emission\n\
                          Asha,Mumbai,21.0,-25.0,2.0,-2.0\n\
                          Kiran,Pune,4.2,5.0,1.0,10.2\n";

    #[test]
    fn imports_legacy_csv_into_fresh_db() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = AppPaths::new(dir.path().join("data"));
        ensure_app_data_dir(&paths).expect("data dir");
        let legacy = dir.path().join(LEGACY_CSV_FILE_NAME);
        std::fs::write(&legacy, LEGACY).expect("write legacy");

        let import = migrate_legacy_storage_from(&paths, &[legacy.clone()])
            .expect("migrate")
            .expect("imported");

        assert_eq!(import.imported, 2);
        assert_eq!(import.source, legacy);
        assert!(import.backup_dir.join(LEGACY_CSV_FILE_NAME).exists());
        let db = Db::open(&paths.db_path).expect("open db");
        let records = db.read_all().expect("read all");
        assert_eq!(records[0].name, "Asha");
        assert_eq!(records[1].total_emission, 10.2);
        assert_eq!(
            db.legacy_import_source().expect("setting"),
            Some(legacy.to_string_lossy().to_string())
        );
    }

    #[test]
    fn existing_db_skips_import() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = AppPaths::new(dir.path().to_path_buf());
        setup_db(&paths.db_path).expect("setup db");
        let legacy = dir.path().join(LEGACY_CSV_FILE_NAME);
        std::fs::write(&legacy, LEGACY).expect("write legacy");

        let import = migrate_legacy_storage_from(&paths, &[legacy]).expect("migrate");
        assert!(import.is_none());
    }

    #[test]
    fn corrupt_legacy_file_leaves_no_db() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = AppPaths::new(dir.path().join("data"));
        ensure_app_data_dir(&paths).expect("data dir");
        let legacy = dir.path().join(LEGACY_CSV_FILE_NAME);
        std::fs::write(&legacy, "Asha,Mumbai,not-a-number,0,0,0\n").expect("write legacy");

        let result = migrate_legacy_storage_from(&paths, &[legacy]);
        assert!(result.is_err());
        assert!(!paths.db_path.exists());
    }
}
