use crate::engine::PatientSummary;
use crate::reconcile::Decision;

/// Hooks for surfacing run progress.
///
/// The CLI implements this with indicatif; tests use `SilentReporter`.
/// All methods have default no-op implementations.
pub trait RunReporter: Send + Sync {
    fn on_run_start(&self, _patient_count: usize) {}
    fn on_patient_start(&self, _patient_id: &str, _file_count: usize) {}
    fn on_file_reconciled(&self, _patient_id: &str, _file_name: &str, _decision: Decision) {}
    fn on_patient_complete(&self, _summary: &PatientSummary) {}
    fn on_classify_start(&self) {}
    fn on_classify_complete(&self, _records: usize, _duration_secs: f64) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl RunReporter for SilentReporter {}
