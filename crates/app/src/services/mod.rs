mod calculator;
mod factors;
mod leaderboard;
mod ledger;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::Result;
use crate::util::time::{TimeRange, filter_range};
use footprint_core::EmissionRecord;
use footprint_db::{Db, EmissionLedger};

pub use calculator::CalculatorService;
pub use factors::FactorsService;
pub use leaderboard::LeaderboardService;
pub use ledger::LedgerService;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub calculator: CalculatorService,
    pub factors: FactorsService,
    pub leaderboard: LeaderboardService,
    pub ledger: LedgerService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            calculator: CalculatorService::new(shared.clone()),
            factors: FactorsService::new(shared.clone()),
            leaderboard: LeaderboardService::new(shared.clone()),
            ledger: LedgerService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}

/// Full-ledger read narrowed to `range`, in insertion order.
fn snapshot(ledger: &dyn EmissionLedger, range: Option<&TimeRange>) -> Result<Vec<EmissionRecord>> {
    Ok(filter_range(ledger.read_all()?, range))
}

/// Appends every record of `from` to `to`, in order.
pub fn copy_ledger(from: &dyn EmissionLedger, to: &mut dyn EmissionLedger) -> Result<usize> {
    let records = from.read_all()?;
    for record in &records {
        to.append(record)?;
    }
    Ok(records.len())
}
