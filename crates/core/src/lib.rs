use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TRANSPORT_FACTOR: f64 = 0.21;
pub const DEFAULT_ELECTRICITY_FACTOR: f64 = 0.5;
pub const DEFAULT_DRY_WASTE_FACTOR: f64 = 0.1;
pub const DEFAULT_WET_WASTE_FACTOR: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Car,
    Bus,
    Train,
    Bike,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Car,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Bike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
            TransportMode::Bike => "bike",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransportMode(pub String);

impl fmt::Display for UnknownTransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported transport mode {}", self.0)
    }
}

impl std::error::Error for UnknownTransportMode {}

impl FromStr for TransportMode {
    type Err = UnknownTransportMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(TransportMode::Car),
            "bus" => Ok(TransportMode::Bus),
            "train" => Ok(TransportMode::Train),
            "bike" => Ok(TransportMode::Bike),
            _ => Err(UnknownTransportMode(value.to_string())),
        }
    }
}

/// One submitted activity, as collected at the form boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub name: String,
    pub city: String,
    /// Kilometres travelled.
    pub distance: f64,
    pub transport_mode: TransportMode,
    /// Previous month's meter reading, kWh.
    pub prev_usage: f64,
    /// Current meter reading, kWh.
    pub curr_usage: f64,
    /// Kilograms.
    pub dry_waste: f64,
    /// Kilograms.
    pub wet_waste: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportFactors {
    pub car: f64,
    pub bus: f64,
    pub train: f64,
    pub bike: f64,
}

impl Default for TransportFactors {
    fn default() -> Self {
        Self {
            car: DEFAULT_TRANSPORT_FACTOR,
            bus: DEFAULT_TRANSPORT_FACTOR,
            train: DEFAULT_TRANSPORT_FACTOR,
            bike: DEFAULT_TRANSPORT_FACTOR,
        }
    }
}

impl TransportFactors {
    pub fn get(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Car => self.car,
            TransportMode::Bus => self.bus,
            TransportMode::Train => self.train,
            TransportMode::Bike => self.bike,
        }
    }

    pub fn set(&mut self, mode: TransportMode, value: f64) {
        match mode {
            TransportMode::Car => self.car = value,
            TransportMode::Bus => self.bus = value,
            TransportMode::Train => self.train = value,
            TransportMode::Bike => self.bike = value,
        }
    }
}

/// Multipliers converting activity quantities (km, kWh, kg) into emissions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactors {
    pub transport: TransportFactors,
    pub electricity: f64,
    pub dry_waste: f64,
    pub wet_waste: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            transport: TransportFactors::default(),
            electricity: DEFAULT_ELECTRICITY_FACTOR,
            dry_waste: DEFAULT_DRY_WASTE_FACTOR,
            wet_waste: DEFAULT_WET_WASTE_FACTOR,
        }
    }
}

impl EmissionFactors {
    pub fn transport_factor(&self, mode: TransportMode) -> f64 {
        self.transport.get(mode)
    }

    /// Flattened `(key, value)` pairs, in a stable order.
    pub fn entries(&self) -> Vec<(String, f64)> {
        let mut entries = TransportMode::ALL
            .iter()
            .map(|mode| (transport_factor_key(*mode), self.transport.get(*mode)))
            .collect::<Vec<_>>();
        entries.push(("electricity".to_string(), self.electricity));
        entries.push(("dry_waste".to_string(), self.dry_waste));
        entries.push(("wet_waste".to_string(), self.wet_waste));
        entries
    }

    /// Applies a single flattened entry. Returns false for unknown keys.
    pub fn apply_entry(&mut self, key: &str, value: f64) -> bool {
        if let Some(mode) = key
            .strip_prefix("transport_")
            .and_then(|mode| mode.parse::<TransportMode>().ok())
        {
            self.transport.set(mode, value);
            return true;
        }
        match key {
            "electricity" => self.electricity = value,
            "dry_waste" => self.dry_waste = value,
            "wet_waste" => self.wet_waste = value,
            _ => return false,
        }
        true
    }
}

pub fn transport_factor_key(mode: TransportMode) -> String {
    format!("transport_{}", mode.as_str())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionBreakdown {
    pub transport_emission: f64,
    pub electricity_emission: f64,
    pub waste_emission: f64,
    pub total_emission: f64,
}

impl EmissionBreakdown {
    /// False when any component overflowed or came out NaN.
    pub fn is_finite(&self) -> bool {
        [
            self.transport_emission,
            self.electricity_emission,
            self.waste_emission,
            self.total_emission,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

pub fn compute_emissions(activity: &ActivityRecord, factors: &EmissionFactors) -> EmissionBreakdown {
    let transport = activity.distance * factors.transport_factor(activity.transport_mode);
    // A lower current reading than the previous one yields a negative emission.
    let electricity = (activity.curr_usage - activity.prev_usage) * factors.electricity;
    let waste = activity.dry_waste * factors.dry_waste + activity.wet_waste * factors.wet_waste;
    EmissionBreakdown {
        transport_emission: transport,
        electricity_emission: electricity,
        waste_emission: waste,
        total_emission: transport + electricity + waste,
    }
}

/// A computed ledger row. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    pub recorded_at: String,
    pub name: String,
    pub city: String,
    pub transport_emission: f64,
    pub electricity_emission: f64,
    pub waste_emission: f64,
    pub total_emission: f64,
}

impl EmissionRecord {
    pub fn new(
        activity: &ActivityRecord,
        breakdown: EmissionBreakdown,
        recorded_at: impl Into<String>,
    ) -> Self {
        Self {
            recorded_at: recorded_at.into(),
            name: activity.name.clone(),
            city: activity.city.clone(),
            transport_emission: breakdown.transport_emission,
            electricity_emission: breakdown.electricity_emission,
            waste_emission: breakdown.waste_emission,
            total_emission: breakdown.total_emission,
        }
    }

    pub fn breakdown(&self) -> EmissionBreakdown {
        EmissionBreakdown {
            transport_emission: self.transport_emission,
            electricity_emission: self.electricity_emission,
            waste_emission: self.waste_emission,
            total_emission: self.total_emission,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub record: EmissionRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameTotal {
    pub name: String,
    pub total_emission: f64,
    pub record_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub recorded_at: String,
    pub name: String,
    pub total_emission: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub by_name: Vec<NameTotal>,
    pub history: Vec<HistoryPoint>,
}

/// Records sorted ascending by total emission; ties keep insertion order.
pub fn rank(records: &[EmissionRecord]) -> Vec<EmissionRecord> {
    let mut ranked = records.to_vec();
    // `+ 0.0` folds -0.0 into 0.0 so signed zeros tie.
    ranked.sort_by(|a, b| (a.total_emission + 0.0).total_cmp(&(b.total_emission + 0.0)));
    ranked
}

pub fn leaderboard(records: &[EmissionRecord], limit: Option<usize>) -> Vec<LeaderboardEntry> {
    rank(records)
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(index, record)| LeaderboardEntry {
            position: index + 1,
            record,
        })
        .collect()
}

pub fn aggregate_for_chart(records: &[EmissionRecord]) -> ChartData {
    let mut by_name: Vec<NameTotal> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();
    let mut history = Vec::with_capacity(records.len());
    for record in records {
        match index_by_name.get(record.name.as_str()) {
            Some(&index) => {
                let entry = &mut by_name[index];
                entry.total_emission += record.total_emission;
                entry.record_count += 1;
            }
            None => {
                index_by_name.insert(record.name.as_str(), by_name.len());
                by_name.push(NameTotal {
                    name: record.name.clone(),
                    total_emission: record.total_emission,
                    record_count: 1,
                });
            }
        }
        history.push(HistoryPoint {
            recorded_at: record.recorded_at.clone(),
            name: record.name.clone(),
            total_emission: record.total_emission,
        });
    }
    ChartData { by_name, history }
}
