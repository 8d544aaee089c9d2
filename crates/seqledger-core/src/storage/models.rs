/// One observation of a (patient, file name, content hash) triple.
/// `id` is 0 until assigned by the store; `status` is empty until the
/// end-of-batch classification pass.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub id: i64,
    pub ticket: String,
    pub first_seen: String,
    pub patient_id: String,
    pub file_name: String,
    pub extension: Option<String>,
    pub file_size: Option<String>,
    pub content_hash: String,
    pub file_location: String,
    pub category: Option<String>,
    pub status: String,
}

/// Baseline vs most-recent observation for a file whose content changed.
/// first_* are anchored to the earliest observation and never advance.
#[derive(Debug, Clone)]
pub struct HashDriftRecord {
    pub id: i64,
    pub patient_id: String,
    pub file_name: String,
    pub first_hash: String,
    pub last_hash: String,
    pub first_seen: String,
    pub last_seen: String,
    pub first_size: Option<String>,
    pub last_size: Option<String>,
    pub first_location: String,
    pub last_location: String,
}

/// Ledger row for an essential pattern a patient has (or had) no files
/// for. `resolved` holds the empty-string sentinel while still missing.
#[derive(Debug, Clone)]
pub struct MissingEssentialFile {
    pub id: i64,
    pub patient_id: String,
    pub pattern: String,
    pub first_missing: String,
    pub last_missing: String,
    pub resolved: String,
}

/// Identity of a logical file: the (patient, file name) pair that hash
/// history and status classification are keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub patient_id: String,
    pub file_name: String,
}
