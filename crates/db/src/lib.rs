mod csv_ledger;
mod error;
mod factors;
mod ledger;
mod migrations;
mod settings;

use std::path::Path;

use rusqlite::Connection;

pub use csv_ledger::{CSV_HEADER, CsvLedger, LEGACY_CSV_HEADER, read_legacy_csv};
pub use error::{DbError, Result};
pub use ledger::EmissionLedger;
pub use migrations::MIGRATIONS;
pub use settings::LEGACY_IMPORT_SETTING;

/// SQLite-backed store for the emission ledger and its factor table.
pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self { conn })
    }
}
