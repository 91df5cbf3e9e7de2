use footprint_core::{EmissionBreakdown, EmissionRecord};
use serde::Serialize;

#[derive(Serialize)]
pub struct SubmitResponse {
    pub record: EmissionRecord,
    pub breakdown: EmissionBreakdown,
}

#[derive(Serialize)]
pub struct LegacyImportResponse {
    pub source: String,
    pub backup_dir: String,
    pub imported: usize,
}

#[derive(Serialize)]
pub struct SettingsResponse {
    pub db_path: String,
    pub factors_defaults_path: String,
    pub app_data_dir: String,
    pub record_count: u64,
    pub legacy_import_source: Option<String>,
    pub legacy_import: Option<LegacyImportResponse>,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub updated: i64,
}

#[derive(Serialize)]
pub struct ExportedResponse {
    pub exported: usize,
    pub path: String,
}
