use chrono::{SecondsFormat, Utc};
use footprint_core::EmissionFactors;
use rusqlite::params;

use crate::Db;
use crate::error::Result;

impl Db {
    /// Stored factors layered over the defaults; unknown keys are skipped.
    pub fn load_emission_factors(&self) -> Result<EmissionFactors> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM emission_factor ORDER BY key ASC")?;
        let mut rows = stmt.query([])?;
        let mut factors = EmissionFactors::default();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let value: f64 = row.get(1)?;
            factors.apply_entry(&key, value);
        }
        Ok(factors)
    }

    pub fn has_emission_factors(&self) -> Result<bool> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM emission_factor", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    pub fn replace_emission_factors(&mut self, factors: &EmissionFactors) -> Result<usize> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let entries = factors.entries();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM emission_factor", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO emission_factor (key, value, updated_at) VALUES (?1, ?2, ?3)",
            )?;
            for (key, value) in &entries {
                stmt.execute(params![key, value, now])?;
            }
        }
        tx.commit()?;
        Ok(entries.len())
    }
}
