use seqledger_core::catalog::EMPTY_FILE_SHA256;
use seqledger_core::storage::models::*;
use seqledger_core::storage::Database;

fn make_record(patient_id: &str, file_name: &str, hash: &str, size: &str) -> FileRecord {
    FileRecord {
        id: 0,
        ticket: "T-100".to_string(),
        first_seen: "2026-01-01T00:00:00+00:00".to_string(),
        patient_id: patient_id.to_string(),
        file_name: file_name.to_string(),
        extension: Some("vcf.gz".to_string()),
        file_size: Some(size.to_string()),
        content_hash: hash.to_string(),
        file_location: format!("/deliveries/T-100/{}/{}", patient_id, file_name),
        category: Some("vcf".to_string()),
        status: String::new(),
    }
}

#[test]
fn test_schema_creation_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    // open() already ran the DDL; running it again must be a no-op.
    db.ensure_schema().unwrap();
    db.ensure_schema().unwrap();

    let count = db
        .insert_file_record(&make_record("P1", "a.vcf.gz", "h1", "10 bytes"))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_insert_file_record_is_duplicate_safe() {
    let db = Database::open_in_memory().unwrap();
    let record = make_record("P1", "a.vcf.gz", "h1", "10 bytes");

    assert_eq!(db.insert_file_record(&record).unwrap(), 1);
    assert_eq!(db.insert_file_record(&record).unwrap(), 0);

    assert_eq!(db.count_patient_records("P1").unwrap(), 1);
}

#[test]
fn test_changed_hash_is_a_new_row() {
    let db = Database::open_in_memory().unwrap();
    db.insert_file_record(&make_record("P1", "a.vcf.gz", "h1", "10 bytes"))
        .unwrap();
    db.insert_file_record(&make_record("P1", "a.vcf.gz", "h2", "12 bytes"))
        .unwrap();

    assert_eq!(db.count_patient_records("P1").unwrap(), 2);
}

#[test]
fn test_latest_hash_returns_most_recent() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.latest_hash("P1", "a.vcf.gz").unwrap(), None);

    db.insert_file_record(&make_record("P1", "a.vcf.gz", "h1", "10 bytes"))
        .unwrap();
    db.insert_file_record(&make_record("P1", "a.vcf.gz", "h2", "12 bytes"))
        .unwrap();

    assert_eq!(
        db.latest_hash("P1", "a.vcf.gz").unwrap().as_deref(),
        Some("h2")
    );
}

#[test]
fn test_earliest_observation_is_the_baseline() {
    let db = Database::open_in_memory().unwrap();
    let mut first = make_record("P1", "a.vcf.gz", "h1", "10 bytes");
    first.first_seen = "2026-01-01T00:00:00+00:00".to_string();
    db.insert_file_record(&first).unwrap();

    let mut second = make_record("P1", "a.vcf.gz", "h2", "12 bytes");
    second.first_seen = "2026-02-01T00:00:00+00:00".to_string();
    db.insert_file_record(&second).unwrap();

    let (first_seen, hash, size, location) =
        db.earliest_observation("P1", "a.vcf.gz").unwrap().unwrap();
    assert_eq!(first_seen, "2026-01-01T00:00:00+00:00");
    assert_eq!(hash, "h1");
    assert_eq!(size.as_deref(), Some("10 bytes"));
    assert!(location.ends_with("P1/a.vcf.gz"));

    assert_eq!(db.earliest_observation("P2", "a.vcf.gz").unwrap(), None);
}

#[test]
fn test_count_records_with_prefix() {
    let db = Database::open_in_memory().unwrap();
    db.insert_file_record(&make_record("P1", "SV.germline.vcf.gz", "h1", "10 bytes"))
        .unwrap();
    db.insert_file_record(&make_record("P1", "SNV.germline.vcf.gz", "h2", "10 bytes"))
        .unwrap();
    db.insert_file_record(&make_record("P2", "SV.germline.vcf.gz", "h3", "10 bytes"))
        .unwrap();

    assert_eq!(db.count_records_with_prefix("P1", "SV.germline").unwrap(), 1);
    assert_eq!(db.count_records_with_prefix("P1", "SNV.germline").unwrap(), 1);
    assert_eq!(db.count_records_with_prefix("P1", "SV.somatic").unwrap(), 0);
    assert_eq!(db.count_records_with_prefix("P2", "SV.germline").unwrap(), 1);
}

#[test]
fn test_hash_drift_upsert_keeps_first_fields_anchored() {
    let db = Database::open_in_memory().unwrap();

    let drift = HashDriftRecord {
        id: 0,
        patient_id: "P1".to_string(),
        file_name: "a.vcf.gz".to_string(),
        first_hash: "h1".to_string(),
        last_hash: "h2".to_string(),
        first_seen: "t1".to_string(),
        last_seen: "t2".to_string(),
        first_size: Some("10 bytes".to_string()),
        last_size: Some("12 bytes".to_string()),
        first_location: "/old/a.vcf.gz".to_string(),
        last_location: "/new/a.vcf.gz".to_string(),
    };
    db.upsert_hash_drift(&drift).unwrap();

    // A later divergence carries a different "first" observation, but the
    // stored baseline must not move; only last_* may change.
    let redetect = HashDriftRecord {
        first_hash: "h2".to_string(),
        last_hash: "h3".to_string(),
        first_seen: "t2".to_string(),
        last_seen: "t3".to_string(),
        first_size: Some("12 bytes".to_string()),
        last_size: Some("14 bytes".to_string()),
        first_location: "/new/a.vcf.gz".to_string(),
        last_location: "/newer/a.vcf.gz".to_string(),
        ..drift.clone()
    };
    db.upsert_hash_drift(&redetect).unwrap();

    let stored = db.get_hash_drift("P1", "a.vcf.gz").unwrap().unwrap();
    assert_eq!(stored.first_hash, "h1");
    assert_eq!(stored.first_seen, "t1");
    assert_eq!(stored.first_size.as_deref(), Some("10 bytes"));
    assert_eq!(stored.first_location, "/old/a.vcf.gz");
    assert_eq!(stored.last_hash, "h3");
    assert_eq!(stored.last_seen, "t3");
    assert_eq!(stored.last_size.as_deref(), Some("14 bytes"));
    assert_eq!(stored.last_location, "/newer/a.vcf.gz");

    let keys = db.drifted_keys().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].patient_id, "P1");
}

#[test]
fn test_missing_essential_transitions() {
    let db = Database::open_in_memory().unwrap();

    // Absent, no row: insert with first = last = now, resolved = ''.
    assert_eq!(
        db.insert_missing_essential("P1", "SV.germline", "t1").unwrap(),
        1
    );
    let row = db.get_missing_essential("P1", "SV.germline").unwrap().unwrap();
    assert_eq!(row.first_missing, "t1");
    assert_eq!(row.last_missing, "t1");
    assert_eq!(row.resolved, "");

    // Unique on (patient, pattern): re-insert is ignored.
    assert_eq!(
        db.insert_missing_essential("P1", "SV.germline", "t2").unwrap(),
        0
    );

    // Still absent: last_missing refreshed, first anchored.
    db.touch_missing_essential("P1", "SV.germline", "t2").unwrap();
    let row = db.get_missing_essential("P1", "SV.germline").unwrap().unwrap();
    assert_eq!(row.first_missing, "t1");
    assert_eq!(row.last_missing, "t2");

    // Reappeared: resolved set once.
    assert_eq!(
        db.resolve_missing_essential("P1", "SV.germline", "t3").unwrap(),
        1
    );
    // One-way: a second resolve does not touch the row.
    assert_eq!(
        db.resolve_missing_essential("P1", "SV.germline", "t4").unwrap(),
        0
    );
    let row = db.get_missing_essential("P1", "SV.germline").unwrap().unwrap();
    assert_eq!(row.resolved, "t3");
}

#[test]
fn test_unresolved_missing_essentials_listing() {
    let db = Database::open_in_memory().unwrap();
    db.insert_missing_essential("P2", "SNV.somatic", "t1").unwrap();
    db.insert_missing_essential("P1", "SV.somatic", "t1").unwrap();
    db.insert_missing_essential("P1", "SNV.germline", "t1").unwrap();
    db.resolve_missing_essential("P1", "SNV.germline", "t2").unwrap();

    let unresolved = db.unresolved_missing_essentials().unwrap();
    assert_eq!(
        unresolved,
        vec![
            ("P1".to_string(), "SV.somatic".to_string()),
            ("P2".to_string(), "SNV.somatic".to_string()),
        ]
    );
}

#[test]
fn test_set_status_covers_every_row_of_the_key() {
    let db = Database::open_in_memory().unwrap();
    db.insert_file_record(&make_record("P1", "a.vcf.gz", "h1", "10 bytes"))
        .unwrap();
    db.insert_file_record(&make_record("P1", "a.vcf.gz", "h2", "12 bytes"))
        .unwrap();

    let updated = db.set_status("P1", "a.vcf.gz", "hash_unmatch").unwrap();
    assert_eq!(updated, 2);

    let count: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM file_record WHERE status = 'hash_unmatch'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_empty_file_keys_require_hash_and_size_class() {
    let db = Database::open_in_memory().unwrap();
    db.insert_file_record(&make_record("P1", "empty.cgh", EMPTY_FILE_SHA256, "0 bytes"))
        .unwrap();
    // Same hash but a non-zero size-class must not match.
    db.insert_file_record(&make_record("P1", "odd.cgh", EMPTY_FILE_SHA256, "10 bytes"))
        .unwrap();
    db.insert_file_record(&make_record("P1", "full.cgh", "h1", "10 bytes"))
        .unwrap();

    let keys = db.empty_file_keys().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].file_name, "empty.cgh");
}

#[test]
fn test_truncate_all() {
    let db = Database::open_in_memory().unwrap();
    db.insert_file_record(&make_record("P1", "a.vcf.gz", "h1", "10 bytes"))
        .unwrap();
    db.insert_missing_essential("P1", "SV.germline", "t1").unwrap();

    db.truncate_all().unwrap();

    assert_eq!(db.count_patient_records("P1").unwrap(), 0);
    assert_eq!(db.get_missing_essential("P1", "SV.germline").unwrap().map(|r| r.id), None);
}
