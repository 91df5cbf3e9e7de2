use footprint_core::EmissionRecord;
use rusqlite::{Row, params};

use crate::Db;
use crate::error::Result;

/// Append-only store of computed emission records.
///
/// Implementations keep records in insertion order and never update or remove
/// a row. `read_all` on an empty store returns an empty vec.
pub trait EmissionLedger {
    fn append(&mut self, record: &EmissionRecord) -> Result<()>;

    fn read_all(&self) -> Result<Vec<EmissionRecord>>;
}

impl EmissionLedger for Db {
    fn append(&mut self, record: &EmissionRecord) -> Result<()> {
        self.append_records(std::slice::from_ref(record))?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<EmissionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT recorded_at, name, city, transport_emission, electricity_emission,
                   waste_emission, total_emission
            FROM emission_record
            ORDER BY id ASC
            "#,
        )?;
        let rows = stmt
            .query_map([], row_to_emission_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl Db {
    /// Appends all records in one transaction, preserving slice order.
    pub fn append_records(&mut self, records: &[EmissionRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO emission_record (
                  recorded_at, name, city, transport_emission, electricity_emission,
                  waste_emission, total_emission
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for record in records {
                stmt.execute(params![
                    record.recorded_at,
                    record.name,
                    record.city,
                    record.transport_emission,
                    record.electricity_emission,
                    record.waste_emission,
                    record.total_emission,
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    pub fn record_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM emission_record", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn row_to_emission_record(row: &Row<'_>) -> std::result::Result<EmissionRecord, rusqlite::Error> {
    Ok(EmissionRecord {
        recorded_at: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        transport_emission: row.get(3)?,
        electricity_emission: row.get(4)?,
        waste_emission: row.get(5)?,
        total_emission: row.get(6)?,
    })
}
