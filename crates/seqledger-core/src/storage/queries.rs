use super::models::*;
use super::sqlite::Database;
use crate::catalog;
use rusqlite::{params, Result};

impl Database {
    // ── File records ─────────────────────────────────────────────

    /// Duplicate-safe insert: re-observing an identical
    /// (patient, file name, hash) triple is a no-op. Returns rows added.
    pub fn insert_file_record(&self, record: &FileRecord) -> Result<usize> {
        self.connection().execute(
            "INSERT OR IGNORE INTO file_record \
             (ticket, first_seen, patient_id, file_name, extension, file_size, \
              content_hash, file_location, category, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.ticket,
                record.first_seen,
                record.patient_id,
                record.file_name,
                record.extension,
                record.file_size,
                record.content_hash,
                record.file_location,
                record.category,
                record.status,
            ],
        )
    }

    /// Most recently recorded hash for a logical file, if any.
    pub fn latest_hash(&self, patient_id: &str, file_name: &str) -> Result<Option<String>> {
        match self.connection().query_row(
            "SELECT content_hash FROM file_record \
             WHERE patient_id = ?1 AND file_name = ?2 \
             ORDER BY id DESC LIMIT 1",
            params![patient_id, file_name],
            |row| row.get(0),
        ) {
            Ok(hash) => Ok(Some(hash)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Earliest observation of a logical file, as
    /// (first_seen, content_hash, file_size, file_location).
    pub fn earliest_observation(
        &self,
        patient_id: &str,
        file_name: &str,
    ) -> Result<Option<(String, String, Option<String>, String)>> {
        match self.connection().query_row(
            "SELECT first_seen, content_hash, file_size, file_location \
             FROM file_record \
             WHERE patient_id = ?1 AND file_name = ?2 \
             ORDER BY id ASC LIMIT 1",
            params![patient_id, file_name],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        ) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn count_patient_records(&self, patient_id: &str) -> Result<i64> {
        self.connection().query_row(
            "SELECT COUNT(*) FROM file_record WHERE patient_id = ?1",
            params![patient_id],
            |row| row.get(0),
        )
    }

    /// Count a patient's records whose file name starts with the pattern.
    pub fn count_records_with_prefix(&self, patient_id: &str, pattern: &str) -> Result<i64> {
        self.connection().query_row(
            "SELECT COUNT(*) FROM file_record \
             WHERE patient_id = ?1 AND file_name LIKE ?2 || '%'",
            params![patient_id, pattern],
            |row| row.get(0),
        )
    }

    /// Every (patient, file name) pair in the store, one entry per row
    /// (a drifted file appears once per recorded hash).
    pub fn all_record_keys(&self) -> Result<Vec<RecordKey>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT patient_id, file_name FROM file_record")?;
        let keys = stmt
            .query_map([], |row| {
                Ok(RecordKey {
                    patient_id: row.get(0)?,
                    file_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(keys)
    }

    /// Stamp every row of a logical file with the given status.
    pub fn set_status(&self, patient_id: &str, file_name: &str, status: &str) -> Result<usize> {
        self.connection().execute(
            "UPDATE file_record SET status = ?3 \
             WHERE patient_id = ?1 AND file_name = ?2",
            params![patient_id, file_name, status],
        )
    }

    /// Keys of records carrying the zero-byte hash and a "0 bytes"
    /// size-class.
    pub fn empty_file_keys(&self) -> Result<Vec<RecordKey>> {
        let mut stmt = self.connection().prepare(
            "SELECT patient_id, file_name FROM file_record \
             WHERE content_hash = ?1 AND file_size = '0 bytes'",
        )?;
        let keys = stmt
            .query_map(params![catalog::EMPTY_FILE_SHA256], |row| {
                Ok(RecordKey {
                    patient_id: row.get(0)?,
                    file_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(keys)
    }

    // ── Hash drift ───────────────────────────────────────────────

    /// Record a divergence. First detection stores the anchored baseline
    /// (first_*) together with the current observation (last_*);
    /// re-detection only overwrites last_* — the baseline never advances.
    pub fn upsert_hash_drift(&self, drift: &HashDriftRecord) -> Result<usize> {
        self.connection().execute(
            "INSERT INTO hash_drift \
             (patient_id, file_name, first_hash, last_hash, first_seen, last_seen, \
              first_size, last_size, first_location, last_location) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
             ON CONFLICT(patient_id, file_name) DO UPDATE SET \
                 last_hash = excluded.last_hash, \
                 last_seen = excluded.last_seen, \
                 last_size = excluded.last_size, \
                 last_location = excluded.last_location",
            params![
                drift.patient_id,
                drift.file_name,
                drift.first_hash,
                drift.last_hash,
                drift.first_seen,
                drift.last_seen,
                drift.first_size,
                drift.last_size,
                drift.first_location,
                drift.last_location,
            ],
        )
    }

    pub fn get_hash_drift(
        &self,
        patient_id: &str,
        file_name: &str,
    ) -> Result<Option<HashDriftRecord>> {
        match self.connection().query_row(
            "SELECT id, patient_id, file_name, first_hash, last_hash, first_seen, \
                    last_seen, first_size, last_size, first_location, last_location \
             FROM hash_drift WHERE patient_id = ?1 AND file_name = ?2",
            params![patient_id, file_name],
            |row| {
                Ok(HashDriftRecord {
                    id: row.get(0)?,
                    patient_id: row.get(1)?,
                    file_name: row.get(2)?,
                    first_hash: row.get(3)?,
                    last_hash: row.get(4)?,
                    first_seen: row.get(5)?,
                    last_seen: row.get(6)?,
                    first_size: row.get(7)?,
                    last_size: row.get(8)?,
                    first_location: row.get(9)?,
                    last_location: row.get(10)?,
                })
            },
        ) {
            Ok(drift) => Ok(Some(drift)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Keys of every logical file that has ever drifted.
    pub fn drifted_keys(&self) -> Result<Vec<RecordKey>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT patient_id, file_name FROM hash_drift")?;
        let keys = stmt
            .query_map([], |row| {
                Ok(RecordKey {
                    patient_id: row.get(0)?,
                    file_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(keys)
    }

    // ── Missing essential files ──────────────────────────────────

    pub fn get_missing_essential(
        &self,
        patient_id: &str,
        pattern: &str,
    ) -> Result<Option<MissingEssentialFile>> {
        match self.connection().query_row(
            "SELECT id, patient_id, pattern, first_missing, last_missing, resolved \
             FROM missing_essential WHERE patient_id = ?1 AND pattern = ?2",
            params![patient_id, pattern],
            |row| {
                Ok(MissingEssentialFile {
                    id: row.get(0)?,
                    patient_id: row.get(1)?,
                    pattern: row.get(2)?,
                    first_missing: row.get(3)?,
                    last_missing: row.get(4)?,
                    resolved: row.get(5)?,
                })
            },
        ) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn insert_missing_essential(
        &self,
        patient_id: &str,
        pattern: &str,
        observed_at: &str,
    ) -> Result<usize> {
        self.connection().execute(
            "INSERT OR IGNORE INTO missing_essential \
             (patient_id, pattern, first_missing, last_missing, resolved) \
             VALUES (?1, ?2, ?3, ?3, '')",
            params![patient_id, pattern, observed_at],
        )
    }

    /// Refresh last_missing for a pattern that is still absent.
    pub fn touch_missing_essential(
        &self,
        patient_id: &str,
        pattern: &str,
        observed_at: &str,
    ) -> Result<usize> {
        self.connection().execute(
            "UPDATE missing_essential SET last_missing = ?3 \
             WHERE patient_id = ?1 AND pattern = ?2",
            params![patient_id, pattern, observed_at],
        )
    }

    /// One-way transition: only sets resolved while it is still unset.
    pub fn resolve_missing_essential(
        &self,
        patient_id: &str,
        pattern: &str,
        observed_at: &str,
    ) -> Result<usize> {
        self.connection().execute(
            "UPDATE missing_essential SET resolved = ?3 \
             WHERE patient_id = ?1 AND pattern = ?2 AND resolved = ''",
            params![patient_id, pattern, observed_at],
        )
    }

    /// (patient, pattern) pairs still unresolved, for the batch report.
    pub fn unresolved_missing_essentials(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self.connection().prepare(
            "SELECT DISTINCT patient_id, pattern FROM missing_essential \
             WHERE resolved = '' ORDER BY patient_id, pattern",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;
        Ok(rows)
    }
}
