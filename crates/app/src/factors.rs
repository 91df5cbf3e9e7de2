use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{AppError, Result};
use footprint_core::EmissionFactors;
use footprint_db::Db;

pub fn apply_factor_defaults(db_path: &Path, defaults_path: &Path) -> Result<()> {
    let factors = if defaults_path.exists() {
        load_factor_defaults(defaults_path)?
    } else {
        load_initial_factors()?
    };
    validate_factors(&factors)?;
    let mut db = Db::open(db_path)?;
    db.replace_emission_factors(&factors)?;
    Ok(())
}

pub fn sync_factor_defaults(db_path: &Path, defaults_path: &Path) -> Result<()> {
    let db = Db::open(db_path)?;
    if !db.has_emission_factors()? && !defaults_path.exists() {
        return Ok(());
    }
    let factors = db.load_emission_factors()?;
    write_factor_defaults(defaults_path, &factors)
}

pub fn load_factor_defaults(path: &Path) -> Result<EmissionFactors> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(AppError::from)
}

pub fn load_initial_factors() -> Result<EmissionFactors> {
    let data = include_str!("../initial-factors.json");
    serde_json::from_str(data).map_err(AppError::from)
}

pub fn write_factor_defaults(path: &Path, factors: &EmissionFactors) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, factors).map_err(AppError::from)
}

pub(crate) fn validate_factors(factors: &EmissionFactors) -> Result<()> {
    if let Some((key, value)) = factors
        .entries()
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(AppError::InvalidInput(format!(
            "emission factor {} must be finite, got {}",
            key, value
        )));
    }
    Ok(())
}
