mod support;

use footprint_db::{Db, EmissionLedger};
use rusqlite::Connection;
use support::{make_record, setup_db};

#[test]
fn migrate_is_idempotent() {
    let mut test_db = setup_db();
    test_db
        .db
        .append(&make_record("Asha", 10.0, "2025-03-01T10:00:00.000Z"))
        .expect("append");
    test_db.db.migrate().expect("second migrate");

    let reopened = Db::open(&test_db.path).expect("reopen");
    assert_eq!(reopened.record_count().expect("count"), 1);
}

#[test]
fn emission_records_reject_update_and_delete() {
    let mut test_db = setup_db();
    test_db
        .db
        .append(&make_record("Asha", 10.0, "2025-03-01T10:00:00.000Z"))
        .expect("append");

    let conn = Connection::open(&test_db.path).expect("open conn");
    let update = conn.execute("UPDATE emission_record SET total_emission = 0", []);
    assert!(update.is_err());
    let delete = conn.execute("DELETE FROM emission_record", []);
    assert!(delete.is_err());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM emission_record", [], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 1);
}
