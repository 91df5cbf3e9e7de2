use tracing::{info, warn};

use crate::error::Result;
use crate::factors::{validate_factors, write_factor_defaults};
use crate::services::{SharedConfig, open_db};
use footprint_core::EmissionFactors;
use footprint_db::Db;

#[derive(Clone)]
pub struct FactorsService {
    config: SharedConfig,
}

impl FactorsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn get(&self) -> Result<EmissionFactors> {
        let db = self.db()?;
        Ok(db.load_emission_factors()?)
    }

    /// Stored records keep the factors they were computed with.
    pub fn replace(&self, factors: &EmissionFactors) -> Result<usize> {
        validate_factors(factors)?;
        let mut db = self.db()?;
        let updated = db.replace_emission_factors(factors)?;
        info!(updated, "replaced emission factors");
        if let Err(err) = write_factor_defaults(&self.config.factors_defaults_path, factors) {
            warn!("failed to update emission factor defaults: {}", err);
        }
        Ok(updated)
    }
}
