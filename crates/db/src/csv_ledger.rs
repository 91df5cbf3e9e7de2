use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use footprint_core::EmissionRecord;
use serde::{Deserialize, Serialize};

use crate::error::{DbError, Result};
use crate::ledger::EmissionLedger;

pub const CSV_HEADER: [&str; 7] = [
    "Date",
    "Name",
    "City",
    "Transport Emission",
    "Electricity Emission",
    "Waste Emission",
    "Total Emission",
];

/// Layout written by the pre-ledger calculator: no date column.
pub const LEGACY_CSV_HEADER: [&str; 6] = [
    "Name",
    "City",
    "Transport Emission",
    "Electricity Emission",
    "Waste Emission",
    "Total Emission",
];

const TOTAL_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Transport Emission")]
    transport_emission: f64,
    #[serde(rename = "Electricity Emission")]
    electricity_emission: f64,
    #[serde(rename = "Waste Emission")]
    waste_emission: f64,
    #[serde(rename = "Total Emission")]
    total_emission: f64,
}

impl From<&EmissionRecord> for CsvRow {
    fn from(record: &EmissionRecord) -> Self {
        Self {
            date: record.recorded_at.clone(),
            name: record.name.clone(),
            city: record.city.clone(),
            transport_emission: record.transport_emission,
            electricity_emission: record.electricity_emission,
            waste_emission: record.waste_emission,
            total_emission: record.total_emission,
        }
    }
}

impl From<CsvRow> for EmissionRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            recorded_at: row.date,
            name: row.name,
            city: row.city,
            transport_emission: row.transport_emission,
            electricity_emission: row.electricity_emission,
            waste_emission: row.waste_emission,
            total_emission: row.total_emission,
        }
    }
}

/// Flat-file ledger in the canonical CSV schema (see [`CSV_HEADER`]).
///
/// Each append is a single write on an append-mode handle; `&mut self` keeps
/// one writer per instance.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a ledger file that must not exist yet, header included.
    pub fn create_new(path: impl Into<PathBuf>) -> Result<Self> {
        let ledger = Self::new(path);
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        let bytes = writer
            .into_inner()
            .map_err(|err| DbError::Io(err.into_error()))?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&ledger.path)?;
        file.write_all(&bytes)?;
        file.sync_data()?;
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn needs_header(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(true),
            Err(err) => Err(err.into()),
        }
    }

    fn unreadable(&self, detail: impl std::fmt::Display) -> DbError {
        DbError::Unreadable(format!("{}: {}", self.path.display(), detail))
    }
}

impl EmissionLedger for CsvLedger {
    fn append(&mut self, record: &EmissionRecord) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        if self.needs_header()? {
            writer.write_record(CSV_HEADER)?;
        }
        writer.serialize(CsvRow::from(record))?;
        let bytes = writer
            .into_inner()
            .map_err(|err| DbError::Io(err.into_error()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&bytes)?;
        file.sync_data()?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<EmissionRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);
        let headers = reader
            .headers()
            .map_err(|err| self.unreadable(err))?
            .clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if !headers.iter().eq(CSV_HEADER.iter().copied()) {
            return Err(self.unreadable(format!(
                "unexpected header {:?}",
                headers.iter().collect::<Vec<_>>()
            )));
        }
        let mut records = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|err| self.unreadable(err))?;
            records.push(EmissionRecord::from(row));
        }
        Ok(records)
    }
}

/// Reads a legacy calculator file, stamping every row with `recorded_at`.
///
/// The header row is optional; rows keep file order.
pub fn read_legacy_csv(path: &Path, recorded_at: &str) -> Result<Vec<EmissionRecord>> {
    let unreadable = |detail: String| DbError::Unreadable(format!("{}: {}", path.display(), detail));
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(file);
    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|err| unreadable(err.to_string()))?;
        if index == 0 && row.iter().eq(LEGACY_CSV_HEADER.iter().copied()) {
            continue;
        }
        if row.len() != LEGACY_CSV_HEADER.len() {
            return Err(unreadable(format!(
                "line {}: expected {} fields, found {}",
                index + 1,
                LEGACY_CSV_HEADER.len(),
                row.len()
            )));
        }
        let number = |column: usize| -> Result<f64> {
            row[column].trim().parse::<f64>().map_err(|err| {
                unreadable(format!(
                    "line {}: invalid {}: {}",
                    index + 1,
                    LEGACY_CSV_HEADER[column],
                    err
                ))
            })
        };
        let record = EmissionRecord {
            recorded_at: recorded_at.to_string(),
            name: row[0].to_string(),
            city: row[1].to_string(),
            transport_emission: number(2)?,
            electricity_emission: number(3)?,
            waste_emission: number(4)?,
            total_emission: number(5)?,
        };
        if !total_matches_components(&record) {
            return Err(unreadable(format!(
                "line {}: Total Emission {} is not the sum of its components",
                index + 1,
                record.total_emission
            )));
        }
        records.push(record);
    }
    Ok(records)
}

/// Stored total must equal the component sum, within a relative tolerance.
fn total_matches_components(record: &EmissionRecord) -> bool {
    let sum = record.transport_emission + record.electricity_emission + record.waste_emission;
    let tolerance = TOTAL_TOLERANCE * sum.abs().max(record.total_emission.abs()).max(1.0);
    sum.is_finite() && (sum - record.total_emission).abs() <= tolerance
}
