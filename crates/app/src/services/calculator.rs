use tracing::info;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};
use crate::util::time::now_rfc3339;
use footprint_core::{ActivityRecord, EmissionRecord, compute_emissions};
use footprint_db::{Db, EmissionLedger};

#[derive(Clone)]
pub struct CalculatorService {
    config: SharedConfig,
}

impl CalculatorService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Computes emissions with the stored factors and appends the result.
    pub fn submit(&self, activity: &ActivityRecord) -> Result<EmissionRecord> {
        let mut db = self.db()?;
        let factors = db.load_emission_factors()?;
        let breakdown = compute_emissions(activity, &factors);
        if !breakdown.is_finite() {
            return Err(AppError::InvalidInput(
                "input values are too large: emissions are not finite".to_string(),
            ));
        }
        let record = EmissionRecord::new(activity, breakdown, now_rfc3339());
        db.append(&record)?;
        info!(
            name = %record.name,
            city = %record.city,
            mode = %activity.transport_mode,
            total = record.total_emission,
            "recorded emissions"
        );
        Ok(record)
    }
}
