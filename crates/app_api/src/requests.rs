use footprint_core::EmissionFactors;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct EmptyRequest {}

/// Raw calculator form. Every field is optional on the wire so that a
/// missing one is reported by name instead of as a parse failure.
#[derive(Debug, Deserialize, Default)]
pub struct ActivityRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub distance: Option<f64>,
    pub transport_mode: Option<String>,
    pub prev_usage: Option<f64>,
    pub curr_usage: Option<f64>,
    pub dry_waste: Option<f64>,
    pub wet_waste: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RangeRequest {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LeaderboardRequest {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct FactorsReplaceRequest {
    pub factors: EmissionFactors,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub path: String,
}
