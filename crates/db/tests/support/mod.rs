#![allow(dead_code)]

use std::path::PathBuf;

use footprint_core::{
    ActivityRecord, EmissionFactors, EmissionRecord, TransportMode, compute_emissions,
};
use footprint_db::Db;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn make_activity(name: &str, distance: f64, prev_usage: f64, curr_usage: f64) -> ActivityRecord {
    ActivityRecord {
        name: name.to_string(),
        city: "Mumbai".to_string(),
        distance,
        transport_mode: TransportMode::Bus,
        prev_usage,
        curr_usage,
        dry_waste: 10.0,
        wet_waste: 20.0,
    }
}

pub fn make_record(name: &str, distance: f64, recorded_at: &str) -> EmissionRecord {
    let activity = make_activity(name, distance, 100.0, 120.0);
    let breakdown = compute_emissions(&activity, &EmissionFactors::default());
    EmissionRecord::new(&activity, breakdown, recorded_at)
}
