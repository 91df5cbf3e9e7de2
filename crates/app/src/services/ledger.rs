use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, copy_ledger, open_db, snapshot};
use crate::util::time::{TimeRange, now_rfc3339};
use footprint_core::EmissionRecord;
use footprint_db::{CsvLedger, Db, DbError, LEGACY_IMPORT_SETTING, read_legacy_csv};

#[derive(Clone)]
pub struct LedgerService {
    config: SharedConfig,
}

impl LedgerService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn records(&self, range: Option<&TimeRange>) -> Result<Vec<EmissionRecord>> {
        let db = self.db()?;
        snapshot(&db, range)
    }

    pub fn count(&self) -> Result<u64> {
        let db = self.db()?;
        Ok(db.record_count()?)
    }

    pub fn legacy_import_source(&self) -> Result<Option<String>> {
        let db = self.db()?;
        Ok(db.legacy_import_source()?)
    }

    /// Writes the whole ledger to a new CSV file in the canonical schema.
    ///
    /// The target is created exclusively and always gets a header row.
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = self.db()?;
        let mut target = CsvLedger::create_new(path).map_err(|err| match err {
            DbError::Io(io) if io.kind() == ErrorKind::AlreadyExists => AppError::InvalidInput(
                format!("export target {} already exists", path.display()),
            ),
            other => other.into(),
        })?;
        let exported = copy_ledger(&db, &mut target)?;
        info!(exported, path = %path.display(), "exported ledger");
        Ok(exported)
    }

    /// Appends every row of a legacy calculator CSV, stamped with the import time.
    pub fn import_legacy(&self, path: &Path) -> Result<usize> {
        let records = read_legacy_csv(path, &now_rfc3339())?;
        let mut db = self.db()?;
        let imported = db.append_records(&records)?;
        db.set_setting(LEGACY_IMPORT_SETTING, &path.to_string_lossy())?;
        info!(imported, path = %path.display(), "imported legacy ledger");
        Ok(imported)
    }
}
