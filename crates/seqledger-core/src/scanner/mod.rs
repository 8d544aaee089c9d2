mod walk;

pub use walk::{list_patient_directories, list_patient_files, PatientDirectory};
