use crate::catalog;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes hashed per read. Bounds peak memory on multi-GB CRAM/BAM
/// deliveries; the value itself is not semantically significant.
const HASH_CHUNK_SIZE: usize = 1024 * 1024;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// Identity attributes derived for one delivered file.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub file_name: String,
    pub extension: Option<String>,
    pub category: Option<String>,
    pub size_class: Option<String>,
    pub content_hash: String,
    pub absolute_path: String,
}

/// Derive the full identity tuple for one file.
///
/// Read-only; any I/O error is propagated so the caller can skip the file
/// and continue with the rest of the patient.
pub fn fingerprint_file(path: &Path) -> io::Result<Fingerprint> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = catalog::match_extension(&file_name).map(str::to_owned);
    let category = extension
        .as_deref()
        .and_then(catalog::category_for)
        .map(str::to_owned);

    let metadata = std::fs::metadata(path)?;
    let size_class = size_class(metadata.len());
    let content_hash = sha256_file(path)?;
    let absolute_path = std::fs::canonicalize(path)?
        .to_string_lossy()
        .into_owned();

    Ok(Fingerprint {
        file_name,
        extension,
        category,
        size_class,
        content_hash,
        absolute_path,
    })
}

/// Bucket a byte count into a human unit with the boundary at 1024.
/// Files of a tebibyte or more are not classified.
pub fn size_class(bytes: u64) -> Option<String> {
    if bytes < KIB {
        Some(format!("{} bytes", bytes))
    } else if bytes < MIB {
        Some(format!("{:.2} KB", bytes as f64 / KIB as f64))
    } else if bytes < GIB {
        Some(format!("{:.2} MB", bytes as f64 / MIB as f64))
    } else if bytes < TIB {
        Some(format!("{:.2} GB", bytes as f64 / GIB as f64))
    } else {
        None
    }
}

/// Stream the file through SHA-256 in fixed-size chunks and return the
/// lower-case hex digest.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
