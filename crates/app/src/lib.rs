pub mod app;
pub mod config;
pub mod error;
pub mod factors;
pub mod services;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::RangeParams;
pub use error::{ApiError, AppError, Result};
pub use factors::{
    apply_factor_defaults, load_factor_defaults, load_initial_factors, sync_factor_defaults,
    write_factor_defaults,
};
pub use services::{AppServices, copy_ledger};
pub use startup::{AppPaths, LegacyImport, ensure_app_data_dir, migrate_legacy_storage};
pub use util::time::{
    TimeRange, filter_range, normalize_rfc3339_to_utc, now_rfc3339, resolve_optional_range,
    resolve_range,
};
