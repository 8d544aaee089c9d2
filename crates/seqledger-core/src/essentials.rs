use crate::catalog::ESSENTIAL_PATTERNS;
use crate::error::Error;
use crate::storage::Database;
use tracing::debug;

/// Count each essential pattern for a patient and keep the missing-file
/// ledger current.
///
/// Returns the four counts in the fixed catalog order. The ledger updates
/// are a side effect, not part of the return contract:
///
/// - pattern absent, no row          → insert (first = last = now)
/// - pattern absent, unresolved row  → refresh last_missing
/// - pattern present, unresolved row → set resolved
/// - anything else                   → no-op (resolution is one-way)
pub fn audit_essentials(
    db: &Database,
    patient_id: &str,
    observed_at: &str,
) -> Result<[i64; 4], Error> {
    let mut counts = [0i64; 4];

    for (slot, pattern) in ESSENTIAL_PATTERNS.iter().copied().enumerate() {
        let count = db.count_records_with_prefix(patient_id, pattern)?;
        counts[slot] = count;

        let existing = db.get_missing_essential(patient_id, pattern)?;
        match (count, existing) {
            (0, None) => {
                db.insert_missing_essential(patient_id, pattern, observed_at)?;
                debug!("Essential {} missing for {}", pattern, patient_id);
            }
            (0, Some(row)) if row.resolved.is_empty() => {
                db.touch_missing_essential(patient_id, pattern, observed_at)?;
            }
            (n, Some(row)) if n > 0 && row.resolved.is_empty() => {
                db.resolve_missing_essential(patient_id, pattern, observed_at)?;
                debug!("Essential {} resolved for {}", pattern, patient_id);
            }
            _ => {}
        }
    }

    Ok(counts)
}
