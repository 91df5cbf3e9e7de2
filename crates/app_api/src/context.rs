use std::path::PathBuf;

use footprint_app::{AppState, LegacyImport};

#[derive(Clone)]
pub struct AppContext {
    pub app_state: AppState,
    pub app_data_dir: PathBuf,
    pub legacy_import: Option<LegacyImport>,
}
