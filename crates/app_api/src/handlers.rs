use footprint_app::{AppError, RangeParams, Result, TimeRange, resolve_optional_range};
use footprint_core::{
    ActivityRecord, ChartData, EmissionFactors, EmissionRecord, LeaderboardEntry, TransportMode,
};

use crate::{
    ActivityRequest, AppContext, ExportRequest, ExportedResponse, FactorsReplaceRequest,
    LeaderboardRequest, LegacyImportResponse, RangeRequest, SettingsResponse, SubmitResponse,
    UpdatedResponse, resolve_user_path,
};

const MAX_LEADERBOARD_LIMIT: usize = 1000;

fn resolve_range(
    range: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<Option<TimeRange>> {
    resolve_optional_range(&RangeParams { range, start, end })
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| AppError::InputMissing(field.to_string()))
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    let value = required(value, field)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InputMissing(field.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Presence check at the form boundary; numbers are taken as given.
pub fn validate_activity(req: ActivityRequest) -> Result<ActivityRecord> {
    let name = required_text(req.name, "name")?;
    let city = required_text(req.city, "city")?;
    let distance = required(req.distance, "distance")?;
    let transport_mode = required_text(req.transport_mode, "transport_mode")?
        .parse::<TransportMode>()
        .map_err(|err| AppError::InvalidInput(err.to_string()))?;
    let prev_usage = required(req.prev_usage, "prev_usage")?;
    let curr_usage = required(req.curr_usage, "curr_usage")?;
    let dry_waste = required(req.dry_waste, "dry_waste")?;
    let wet_waste = required(req.wet_waste, "wet_waste")?;
    Ok(ActivityRecord {
        name,
        city,
        distance,
        transport_mode,
        prev_usage,
        curr_usage,
        dry_waste,
        wet_waste,
    })
}

pub fn submit(ctx: &AppContext, req: ActivityRequest) -> Result<SubmitResponse> {
    let activity = validate_activity(req)?;
    let record = ctx.app_state.services.calculator.submit(&activity)?;
    Ok(SubmitResponse {
        breakdown: record.breakdown(),
        record,
    })
}

pub fn leaderboard(ctx: &AppContext, req: LeaderboardRequest) -> Result<Vec<LeaderboardEntry>> {
    let range = resolve_range(req.range, req.start, req.end)?;
    let limit = req.limit.map(|limit| limit.min(MAX_LEADERBOARD_LIMIT));
    ctx.app_state
        .services
        .leaderboard
        .leaderboard(range.as_ref(), limit)
}

pub fn chart(ctx: &AppContext, req: RangeRequest) -> Result<ChartData> {
    let range = resolve_range(req.range, req.start, req.end)?;
    ctx.app_state.services.leaderboard.chart(range.as_ref())
}

pub fn records(ctx: &AppContext, req: RangeRequest) -> Result<Vec<EmissionRecord>> {
    let range = resolve_range(req.range, req.start, req.end)?;
    ctx.app_state.services.ledger.records(range.as_ref())
}

pub fn factors_get(ctx: &AppContext) -> Result<EmissionFactors> {
    ctx.app_state.services.factors.get()
}

pub fn factors_replace(ctx: &AppContext, req: FactorsReplaceRequest) -> Result<UpdatedResponse> {
    let count = ctx.app_state.services.factors.replace(&req.factors)?;
    Ok(UpdatedResponse {
        updated: count as i64,
    })
}

pub fn export_csv(ctx: &AppContext, req: ExportRequest) -> Result<ExportedResponse> {
    let path = req.path.trim();
    if path.is_empty() {
        return Err(AppError::InputMissing("path".to_string()));
    }
    let target = resolve_user_path(path, &ctx.app_data_dir);
    let exported = ctx.app_state.services.ledger.export_csv(&target)?;
    Ok(ExportedResponse {
        exported,
        path: target.to_string_lossy().to_string(),
    })
}

pub fn settings_get(ctx: &AppContext) -> Result<SettingsResponse> {
    let ledger = &ctx.app_state.services.ledger;
    Ok(SettingsResponse {
        db_path: ctx.app_state.config.db_path.to_string_lossy().to_string(),
        factors_defaults_path: ctx
            .app_state
            .config
            .factors_defaults_path
            .to_string_lossy()
            .to_string(),
        app_data_dir: ctx.app_data_dir.to_string_lossy().to_string(),
        record_count: ledger.count()?,
        legacy_import_source: ledger.legacy_import_source()?,
        legacy_import: ctx
            .legacy_import
            .as_ref()
            .map(|import| LegacyImportResponse {
                source: import.source.to_string_lossy().to_string(),
                backup_dir: import.backup_dir.to_string_lossy().to_string(),
                imported: import.imported,
            }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> ActivityRequest {
        ActivityRequest {
            name: Some(" Asha ".to_string()),
            city: Some("Mumbai".to_string()),
            distance: Some(100.0),
            transport_mode: Some("bus".to_string()),
            prev_usage: Some(200.0),
            curr_usage: Some(150.0),
            dry_waste: Some(10.0),
            wet_waste: Some(20.0),
        }
    }

    #[test]
    fn complete_form_validates() {
        let activity = validate_activity(full_request()).expect("valid");
        assert_eq!(activity.name, "Asha");
        assert_eq!(activity.transport_mode, TransportMode::Bus);
        assert_eq!(activity.curr_usage, 150.0);
    }

    #[test]
    fn missing_field_is_named() {
        let mut req = full_request();
        req.wet_waste = None;
        match validate_activity(req) {
            Err(AppError::InputMissing(field)) => assert_eq!(field, "wet_waste"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let mut req = full_request();
        req.city = Some("   ".to_string());
        assert!(matches!(
            validate_activity(req),
            Err(AppError::InputMissing(field)) if field == "city"
        ));
    }

    #[test]
    fn unknown_transport_mode_is_invalid() {
        let mut req = full_request();
        req.transport_mode = Some("rocket".to_string());
        assert!(matches!(
            validate_activity(req),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_numbers_are_accepted() {
        let mut req = full_request();
        req.distance = Some(-3.0);
        assert_eq!(validate_activity(req).expect("valid").distance, -3.0);
    }
}
