use crate::error::Error;
use crate::fingerprint::Fingerprint;
use crate::storage::models::{FileRecord, HashDriftRecord};
use crate::storage::Database;
use tracing::debug;

/// Outcome of comparing one observed file against the store's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// First time this (patient, file name) has been seen.
    New,
    /// Recorded hash matches the current content.
    Unchanged,
    /// Content differs from the most recently recorded hash.
    HashChanged,
}

/// Reconcile one fingerprinted file against cumulative history.
///
/// A changed hash never mutates the old row: a new file_record row is
/// inserted (duplicate-safe, so repeated runs over identical inputs are
/// idempotent) and the drift ledger is upserted with first_* anchored to
/// the earliest observation ever recorded for this file.
pub fn reconcile_file(
    db: &Database,
    ticket: &str,
    patient_id: &str,
    fingerprint: &Fingerprint,
    observed_at: &str,
) -> Result<Decision, Error> {
    let recorded_hash = match db.latest_hash(patient_id, &fingerprint.file_name)? {
        None => {
            db.insert_file_record(&file_record(ticket, patient_id, fingerprint, observed_at))?;
            debug!("New record {}/{}", patient_id, fingerprint.file_name);
            return Ok(Decision::New);
        }
        Some(hash) => hash,
    };

    if recorded_hash == fingerprint.content_hash {
        return Ok(Decision::Unchanged);
    }

    // Baseline read before the new observation lands; the earliest row
    // anchors the drift record's first_* fields.
    let baseline = db.earliest_observation(patient_id, &fingerprint.file_name)?;

    db.insert_file_record(&file_record(ticket, patient_id, fingerprint, observed_at))?;

    if let Some((first_seen, first_hash, first_size, first_location)) = baseline {
        db.upsert_hash_drift(&HashDriftRecord {
            id: 0,
            patient_id: patient_id.to_string(),
            file_name: fingerprint.file_name.clone(),
            first_hash,
            last_hash: fingerprint.content_hash.clone(),
            first_seen,
            last_seen: observed_at.to_string(),
            first_size,
            last_size: fingerprint.size_class.clone(),
            first_location,
            last_location: fingerprint.absolute_path.clone(),
        })?;
    }

    debug!("Hash changed {}/{}", patient_id, fingerprint.file_name);
    Ok(Decision::HashChanged)
}

fn file_record(
    ticket: &str,
    patient_id: &str,
    fingerprint: &Fingerprint,
    observed_at: &str,
) -> FileRecord {
    FileRecord {
        id: 0,
        ticket: ticket.to_string(),
        first_seen: observed_at.to_string(),
        patient_id: patient_id.to_string(),
        file_name: fingerprint.file_name.clone(),
        extension: fingerprint.extension.clone(),
        file_size: fingerprint.size_class.clone(),
        content_hash: fingerprint.content_hash.clone(),
        file_location: fingerprint.absolute_path.clone(),
        category: fingerprint.category.clone(),
        status: String::new(),
    }
}
