use crate::error::Result;
use crate::services::{SharedConfig, open_db, snapshot};
use crate::util::time::TimeRange;
use footprint_core::{ChartData, LeaderboardEntry, aggregate_for_chart, leaderboard};
use footprint_db::Db;

#[derive(Clone)]
pub struct LeaderboardService {
    config: SharedConfig,
}

impl LeaderboardService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn leaderboard(
        &self,
        range: Option<&TimeRange>,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let db = self.db()?;
        let records = snapshot(&db, range)?;
        Ok(leaderboard(&records, limit))
    }

    pub fn chart(&self, range: Option<&TimeRange>) -> Result<ChartData> {
        let db = self.db()?;
        let records = snapshot(&db, range)?;
        Ok(aggregate_for_chart(&records))
    }
}
