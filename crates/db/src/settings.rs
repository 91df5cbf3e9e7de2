use rusqlite::params;

use crate::Db;
use crate::error::Result;

/// Path of the legacy CSV imported into this database, if any.
pub const LEGACY_IMPORT_SETTING: &str = "legacy_import_source";

impl Db {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_setting WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_setting (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    pub fn legacy_import_source(&self) -> Result<Option<String>> {
        self.get_setting(LEGACY_IMPORT_SETTING)
    }
}
