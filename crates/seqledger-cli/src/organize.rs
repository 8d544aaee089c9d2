use crate::commands::OrganizeArgs;
use colored::*;
use seqledger_core::catalog;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Sort catalog-matching files in the input directory into per-category
/// folders under the output directory.
///
/// Non-recursive, like the delivery staging area it is meant for. Files
/// with unknown extensions are left in place.
pub fn organize(args: &OrganizeArgs) -> io::Result<()> {
    let input = Path::new(&args.input_path);
    let output = Path::new(&args.output_path);

    let mut matched = 0usize;
    let mut moved = 0usize;

    for entry in fs::read_dir(input)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let extension = match catalog::match_extension(&name) {
            Some(extension) => extension,
            None => continue,
        };
        if let Some(only) = &args.extension {
            if extension != only.as_str() {
                continue;
            }
        }
        matched += 1;

        let category = match catalog::category_for(extension) {
            Some(category) => category,
            None => continue,
        };
        let folder = output.join(category);
        if !folder.is_dir() {
            println!("{}", format!("[+] Making {} folder", category).blue());
            fs::create_dir_all(&folder)?;
        }

        let destination = folder.join(&name);
        println!("Moving {} to {}", path.display(), destination.display());
        match fs::rename(&path, &destination) {
            Ok(()) => moved += 1,
            Err(err) => warn!("Could not move {}: {}", path.display(), err),
        }
    }

    if matched == 0 {
        println!("{}", "Found nothing to sort!".blue());
    } else {
        println!("{}", format!("Done! {} files moved", moved).green());
        info!("Organized {} of {} matching files", moved, matched);
    }

    Ok(())
}
