use crate::config::AppConfig;
use crate::error::Error;
use crate::essentials;
use crate::fingerprint;
use crate::progress::RunReporter;
use crate::reconcile::{self, Decision};
use crate::scanner;
use crate::storage::models::RecordKey;
use crate::storage::Database;
use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{error, info};

pub struct RunEngine {
    config: AppConfig,
    db_path: String,
}

/// Aggregates for one patient, reported after their directory is
/// processed.
#[derive(Debug, Clone)]
pub struct PatientSummary {
    pub patient_id: String,
    pub files_found: usize,
    pub previous_records: i64,
    pub new_records: i64,
    /// Per essential pattern, in catalog order.
    pub essential_counts: [i64; 4],
}

/// Everything one reconciliation pass produced, for reporting.
#[derive(Debug)]
pub struct RunResult {
    pub ticket: String,
    pub started_at: String,
    pub patients: Vec<PatientSummary>,
    pub patients_processed: usize,
    pub files_processed: usize,
    pub new_decisions: usize,
    pub changed_decisions: usize,
    /// (patient, pattern) pairs still unresolved after this pass.
    pub essentials_missing: Vec<(String, String)>,
    pub drifted: Vec<RecordKey>,
    pub empty: Vec<RecordKey>,
    pub missing: Vec<RecordKey>,
    pub records_classified: usize,
    pub scan_duration: Duration,
    pub classify_duration: Duration,
}

impl RunEngine {
    pub fn new(config: AppConfig) -> Self {
        let db_path = config.db_path.clone();
        Self { config, db_path }
    }

    pub fn with_db_path(mut self, path: &str) -> Self {
        self.db_path = path.to_string();
        self
    }

    /// Run one full reconciliation pass:
    /// 1. enumerate patient directories and reconcile every file
    /// 2. audit essential files once per patient
    /// 3. reclassify the status of every known record
    ///
    /// Per-file I/O failures and per-operation store failures are logged
    /// and skipped; only store unavailability at open aborts the run.
    pub fn run(&self, reporter: &dyn RunReporter) -> Result<RunResult, Error> {
        let input_path = self
            .config
            .input_path
            .as_deref()
            .ok_or_else(|| Error::Other("no input path configured".to_string()))?;
        let input = Path::new(input_path);

        let db = Database::open(&self.db_path)?;

        // The ticket/batch id is the name of the delivery directory.
        let ticket = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input_path.to_string());

        let started_at = chrono::Utc::now().to_rfc3339();
        info!("Reconciling delivery {} from {}", ticket, input.display());

        let scan_start = Instant::now();
        let patient_dirs = scanner::list_patient_directories(input)?;
        if patient_dirs.is_empty() {
            info!("No patient directories found under {}", input.display());
        }
        reporter.on_run_start(patient_dirs.len());

        let mut patients: Vec<PatientSummary> = Vec::new();
        let mut observed: HashSet<RecordKey> = HashSet::new();
        let mut files_processed = 0usize;
        let mut new_decisions = 0usize;
        let mut changed_decisions = 0usize;

        for patient in &patient_dirs {
            let files = scanner::list_patient_files(&patient.path);
            if files.is_empty() {
                info!("Patient {} has no files, skipping", patient.patient_id);
                continue;
            }
            reporter.on_patient_start(&patient.patient_id, files.len());

            let previous_records = match db.count_patient_records(&patient.patient_id) {
                Ok(count) => count,
                Err(err) => {
                    error!(
                        "Failed to count records for {}: {}",
                        patient.patient_id, err
                    );
                    0
                }
            };

            for file in &files {
                let fp = match fingerprint::fingerprint_file(file) {
                    Ok(fp) => fp,
                    Err(err) => {
                        error!("Failed to fingerprint {}: {}", file.display(), err);
                        continue;
                    }
                };

                let observed_at = chrono::Utc::now().to_rfc3339();
                match reconcile::reconcile_file(
                    &db,
                    &ticket,
                    &patient.patient_id,
                    &fp,
                    &observed_at,
                ) {
                    Ok(decision) => {
                        match decision {
                            Decision::New => new_decisions += 1,
                            Decision::HashChanged => changed_decisions += 1,
                            Decision::Unchanged => {}
                        }
                        reporter.on_file_reconciled(&patient.patient_id, &fp.file_name, decision);
                    }
                    Err(err) => {
                        error!(
                            "Failed to reconcile {}/{}: {}",
                            patient.patient_id, fp.file_name, err
                        );
                    }
                }

                // The file is part of the current listing even if its
                // reconciliation failed.
                observed.insert(RecordKey {
                    patient_id: patient.patient_id.clone(),
                    file_name: fp.file_name,
                });
                files_processed += 1;
            }

            let observed_at = chrono::Utc::now().to_rfc3339();
            let essential_counts =
                match essentials::audit_essentials(&db, &patient.patient_id, &observed_at) {
                    Ok(counts) => counts,
                    Err(err) => {
                        error!(
                            "Essential-file audit failed for {}: {}",
                            patient.patient_id, err
                        );
                        [0; 4]
                    }
                };

            let total_records = db
                .count_patient_records(&patient.patient_id)
                .unwrap_or(previous_records);
            let summary = PatientSummary {
                patient_id: patient.patient_id.clone(),
                files_found: files.len(),
                previous_records,
                new_records: total_records - previous_records,
                essential_counts,
            };
            reporter.on_patient_complete(&summary);
            patients.push(summary);
        }
        let scan_duration = scan_start.elapsed();

        // Full reclassification over every known record, not just those
        // touched this run: drift and missing state are global.
        reporter.on_classify_start();
        let classify_start = Instant::now();

        let drifted: HashSet<RecordKey> = db.drifted_keys()?.into_iter().collect();
        let empty: HashSet<RecordKey> = db.empty_file_keys()?.into_iter().collect();
        let keys = db.all_record_keys()?;

        let mut missing_set: HashSet<RecordKey> = HashSet::new();
        let mut records_classified = 0usize;

        for key in &keys {
            let status = if drifted.contains(key) {
                "hash_unmatch"
            } else if empty.contains(key) {
                "empty_file"
            } else if !observed.contains(key) {
                "missing_file"
            } else {
                "pass"
            };
            if status == "missing_file" {
                missing_set.insert(key.clone());
            }
            match db.set_status(&key.patient_id, &key.file_name, status) {
                Ok(_) => records_classified += 1,
                Err(err) => error!(
                    "Failed to set status for {}/{}: {}",
                    key.patient_id, key.file_name, err
                ),
            }
        }

        let essentials_missing = db.unresolved_missing_essentials()?;
        let classify_duration = classify_start.elapsed();
        reporter.on_classify_complete(records_classified, classify_duration.as_secs_f64());

        let mut drifted_list: Vec<RecordKey> = drifted.into_iter().collect();
        drifted_list.sort();
        let mut empty_list: Vec<RecordKey> = empty.into_iter().collect();
        empty_list.sort();
        let mut missing_list: Vec<RecordKey> = missing_set.into_iter().collect();
        missing_list.sort();

        info!(
            "Pass complete: {} patients, {} files, {} drifted, {} empty, {} missing",
            patients.len(),
            files_processed,
            drifted_list.len(),
            empty_list.len(),
            missing_list.len(),
        );

        let patients_processed = patients.len();
        Ok(RunResult {
            ticket,
            started_at,
            patients,
            patients_processed,
            files_processed,
            new_decisions,
            changed_decisions,
            essentials_missing,
            drifted: drifted_list,
            empty: empty_list,
            missing: missing_list,
            records_classified,
            scan_duration,
            classify_duration,
        })
    }
}
