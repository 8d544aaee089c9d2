use seqledger_core::catalog::ESSENTIAL_PATTERNS;
use seqledger_core::{PatientSummary, RecordKey, RunResult};
use std::fs::OpenOptions;
use std::io::{self, Write};

const RULE: &str =
    "----------------------------------------------------------------------";

/// Per-patient block: files found vs records, then the four essential-file
/// counts in fixed order.
pub fn patient_block(summary: &PatientSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nPatient: {}\n\n", summary.patient_id));
    out.push_str("Files in directory:\n");
    out.push_str(&format!("    - Files found: {}\n", summary.files_found));
    out.push_str(&format!(
        "    - Previous records in database: {}\n",
        summary.previous_records
    ));
    out.push_str(&format!(
        "    - New records in database: {}\n\n",
        summary.new_records
    ));
    out.push_str("Essential files:\n");
    for (pattern, count) in ESSENTIAL_PATTERNS.iter().zip(summary.essential_counts) {
        out.push_str(&format!("    - {}: {}\n", pattern, count));
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

/// Full report for one pass: every patient block followed by the
/// batch-wide issue lists.
pub fn render_report(result: &RunResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", RULE));
    out.push_str("------------------------ DELIVERY AUDIT REPORT ----------------------\n");
    out.push_str(&format!("{}\n", RULE));
    out.push_str(&format!("Ticket: {}\n", result.ticket));
    out.push_str(&format!("Date: {}\n", result.started_at));
    out.push_str(&format!(
        "Total patients processed: {}\n",
        result.patients_processed
    ));

    for patient in &result.patients {
        out.push_str(&patient_block(patient));
    }

    out.push_str("\nPatients missing essential files:\n");
    if result.essentials_missing.is_empty() {
        out.push_str("    - None\n");
    } else {
        for (patient_id, pattern) in &result.essentials_missing {
            out.push_str(&format!("    - {}: {}\n", patient_id, pattern));
        }
    }

    out.push_str("\nEmpty files (patient ID : file name):\n");
    push_key_lines(&mut out, &result.empty);

    out.push_str("\nFiles with changed content:\n");
    push_key_lines(&mut out, &result.drifted);

    out.push_str("\nPreviously recorded files now missing:\n");
    push_key_lines(&mut out, &result.missing);

    out.push_str(RULE);
    out.push('\n');
    out
}

fn push_key_lines(out: &mut String, keys: &[RecordKey]) {
    if keys.is_empty() {
        out.push_str("    - None\n");
        return;
    }
    for key in keys {
        out.push_str(&format!("    - {}: {}\n", key.patient_id, key.file_name));
    }
}

/// Append the rendered report to the report file, creating it on first
/// use. Successive runs accumulate.
pub fn append_to_file(path: &str, content: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", content)?;
    Ok(())
}
