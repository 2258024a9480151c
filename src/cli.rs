use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::account_map::AccountMap;
use crate::args::Args;
use crate::convert::{convert_files, ConvertOptions};

pub fn main(args: Args) -> Result<()> {
    let pjr_files = gather_pjr_files(&args.pjr_location)?;
    log::info!("Converting {} PJR file(s)", pjr_files.len());

    let account_map = AccountMap::load(&args.account_id_map_file)?;
    log::debug!(
        "Loaded {} account mapping(s) from {}",
        account_map.len(),
        args.account_id_map_file.display()
    );

    let options = ConvertOptions {
        ignore_negative: args.ignore_negative_transactions,
        tender_code: args.tender_code.clone(),
    };
    let output = convert_files(&pjr_files, &account_map, &options)?;

    match &args.iif_output_file {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Converted PJRs to {}", path.display());
        }
        None => print!("{output}"),
    }

    // Sources are only removed after the conversion succeeded and the
    // output has been written.
    if args.delete_pjrs_on_convert {
        log::info!("Deleting converted PJR files");
        for pjr_file in &pjr_files {
            fs::remove_file(pjr_file)
                .with_context(|| format!("Failed to delete {}", pjr_file.display()))?;
        }
    }

    Ok(())
}

/// Expands each location into the PJR files it names: plain files are taken
/// as-is, directories contribute the files directly inside them, sorted by
/// name so output order is deterministic.
fn gather_pjr_files(locations: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for location in locations {
        if location.is_dir() {
            files.extend(files_in_directory(location)?);
        } else {
            files.push(location.clone());
        }
    }
    Ok(files)
}

fn files_in_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list PJR directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to list PJR directory {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
