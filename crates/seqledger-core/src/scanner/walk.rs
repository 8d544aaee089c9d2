use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// One top-level patient/case folder inside a delivery directory.
#[derive(Debug, Clone)]
pub struct PatientDirectory {
    pub patient_id: String,
    pub path: PathBuf,
}

/// Enumerate patient directories: the immediate subdirectories of the
/// delivery root, dot-named entries excluded, sorted by name.
pub fn list_patient_directories(input_path: &Path) -> io::Result<Vec<PatientDirectory>> {
    let mut patients = Vec::new();

    for entry in std::fs::read_dir(input_path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        patients.push(PatientDirectory {
            patient_id: name,
            path,
        });
    }

    patients.sort_by(|a, b| a.patient_id.cmp(&b.patient_id));
    Ok(patients)
}

/// Recursively list regular files under a patient directory.
///
/// Entries whose file name starts with '.' are skipped (platform
/// hidden-file convention, e.g. .DS_Store); nothing else is filtered.
/// Unreadable entries are logged and skipped so one bad path cannot fail
/// the whole walk.
pub fn list_patient_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.into_path());
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_patient_directories_sorted_and_dotless() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("P2")).unwrap();
        fs::create_dir(tmp.path().join("P1")).unwrap();
        fs::create_dir(tmp.path().join(".stale")).unwrap();
        fs::write(tmp.path().join("stray.txt"), "x").unwrap();

        let patients = list_patient_directories(tmp.path()).unwrap();
        let ids: Vec<&str> = patients.iter().map(|p| p.patient_id.as_str()).collect();
        assert_eq!(ids, ["P1", "P2"]);
    }

    #[test]
    fn test_file_listing_recurses_and_skips_dotfiles() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("results").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("top.vcf"), "a").unwrap();
        fs::write(nested.join("inner.cram"), "b").unwrap();
        fs::write(tmp.path().join(".DS_Store"), "junk").unwrap();

        let files = list_patient_files(tmp.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"top.vcf".to_string()));
        assert!(names.contains(&"inner.cram".to_string()));
    }
}
