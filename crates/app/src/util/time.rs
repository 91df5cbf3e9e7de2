use chrono::{DateTime, Datelike, Duration, Local, SecondsFormat, TimeZone, Utc};

use crate::config::RangeParams;
use crate::error::{AppError, Result};
use footprint_core::EmissionRecord;

/// Half-open `[start, end)` window of normalized UTC timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

const EPOCH_UTC: &str = "1970-01-01T00:00:00.000Z";

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn resolve_optional_range(params: &RangeParams) -> Result<Option<TimeRange>> {
    if params.is_empty() {
        return Ok(None);
    }
    resolve_range(params).map(Some)
}

pub fn resolve_range(params: &RangeParams) -> Result<TimeRange> {
    match (params.start.clone(), params.end.clone()) {
        (Some(start), Some(end)) => {
            let start = normalize_rfc3339_to_utc(&start)?;
            let end = normalize_rfc3339_to_utc(&end)?;
            if start > end {
                return Err(AppError::InvalidInput(
                    "range start is after range end".to_string(),
                ));
            }
            return Ok(TimeRange { start, end });
        }
        (Some(start), None) => {
            let start = normalize_rfc3339_to_utc(&start)?;
            let end = (Utc::now() + Duration::milliseconds(1))
                .to_rfc3339_opts(SecondsFormat::Millis, true);
            return Ok(TimeRange { start, end });
        }
        (None, Some(end)) => {
            let end = normalize_rfc3339_to_utc(&end)?;
            return Ok(TimeRange {
                start: EPOCH_UTC.to_string(),
                end,
            });
        }
        (None, None) => {}
    }
    let now_local = Local::now();
    let (start_local, end_local) = match params.range.as_deref().unwrap_or("alltime") {
        "today" => {
            let start = Local
                .with_ymd_and_hms(
                    now_local.year(),
                    now_local.month(),
                    now_local.day(),
                    0,
                    0,
                    0,
                )
                .single()
                .ok_or_else(|| AppError::InvalidInput("invalid local date".to_string()))?;
            (start, now_local)
        }
        "last7days" => (now_local - Duration::days(7), now_local),
        "last14days" => (now_local - Duration::days(14), now_local),
        "thismonth" => {
            let start = Local
                .with_ymd_and_hms(now_local.year(), now_local.month(), 1, 0, 0, 0)
                .single()
                .ok_or_else(|| AppError::InvalidInput("invalid local date".to_string()))?;
            (start, now_local)
        }
        "alltime" => {
            let start = Local
                .with_ymd_and_hms(1970, 1, 1, 0, 0, 0)
                .single()
                .ok_or_else(|| AppError::InvalidInput("invalid local date".to_string()))?;
            (start, now_local)
        }
        value => {
            return Err(AppError::InvalidInput(format!(
                "unsupported range {}",
                value
            )));
        }
    };
    // Records stamped in the current millisecond must fall inside the window.
    let end_local = end_local + Duration::milliseconds(1);
    let start = start_local
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let end = end_local
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    Ok(TimeRange { start, end })
}

pub fn normalize_rfc3339_to_utc(value: &str) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map_err(|err| AppError::InvalidInput(format!("invalid datetime: {}", err)))?;
    Ok(parsed
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Keeps records inside `range`, preserving ledger order.
///
/// Timestamps share one normalized format, so string order is time order.
pub fn filter_range(records: Vec<EmissionRecord>, range: Option<&TimeRange>) -> Vec<EmissionRecord> {
    let Some(range) = range else {
        return records;
    };
    records
        .into_iter()
        .filter(|record| {
            record.recorded_at.as_str() >= range.start.as_str()
                && record.recorded_at.as_str() < range.end.as_str()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(ts: &str) -> EmissionRecord {
        EmissionRecord {
            recorded_at: ts.to_string(),
            name: "n".to_string(),
            city: "c".to_string(),
            transport_emission: 0.0,
            electricity_emission: 0.0,
            waste_emission: 0.0,
            total_emission: 0.0,
        }
    }

    #[test]
    fn empty_params_mean_no_range() {
        let range = resolve_optional_range(&RangeParams::default()).expect("range");
        assert!(range.is_none());
    }

    #[test]
    fn explicit_bounds_are_normalized() {
        let params = RangeParams {
            range: None,
            start: Some("2025-03-01T05:30:00+05:30".to_string()),
            end: Some("2025-03-02T00:00:00Z".to_string()),
        };
        let range = resolve_range(&params).expect("range");
        assert_eq!(range.start, "2025-03-01T00:00:00.000Z");
        assert_eq!(range.end, "2025-03-02T00:00:00.000Z");
    }

    #[test]
    fn unknown_range_is_invalid() {
        let params = RangeParams {
            range: Some("fortnight".to_string()),
            ..RangeParams::default()
        };
        assert!(matches!(
            resolve_range(&params),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn filter_keeps_order_and_is_half_open() {
        let records = vec![
            record_at("2025-03-01T00:00:00.000Z"),
            record_at("2025-03-01T12:00:00.000Z"),
            record_at("2025-03-02T00:00:00.000Z"),
        ];
        let range = TimeRange {
            start: "2025-03-01T00:00:00.000Z".to_string(),
            end: "2025-03-02T00:00:00.000Z".to_string(),
        };
        let kept = filter_range(records, Some(&range));
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].recorded_at, "2025-03-01T12:00:00.000Z");
    }

    #[test]
    fn alltime_includes_a_fresh_record() {
        let stamp = now_rfc3339();
        let params = RangeParams {
            range: Some("alltime".to_string()),
            ..RangeParams::default()
        };
        let range = resolve_range(&params).expect("range");
        let kept = filter_range(vec![record_at(&stamp)], Some(&range));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn open_ended_start_includes_a_fresh_record() {
        let stamp = now_rfc3339();
        let params = RangeParams {
            range: None,
            start: Some("2025-01-01T00:00:00Z".to_string()),
            end: None,
        };
        let range = resolve_range(&params).expect("range");
        assert!(range.end.as_str() > stamp.as_str());
        let kept = filter_range(vec![record_at(&stamp)], Some(&range));
        assert_eq!(kept.len(), 1);
    }
}
