use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use std::fs;
use zipback_lib::{BackupRequest, BackupResult};

use crate::naming;
use crate::packaging::create_zip_sync;

/// Runs one backup: name the archive, write it, measure it.
pub fn run_backup(request: &BackupRequest) -> Result<BackupResult> {
    let destination = request.destination.to_string_lossy();

    // Create the backup folder if it does not exist
    fs::create_dir_all(&request.destination)
        .with_context(|| format!("creating destination directory {destination}"))?;

    let ts = naming::timestamp(&Local::now());
    let archive_path = naming::archive_path(&ts, &destination, request.name.as_deref());
    info!("writing archive {}", archive_path.display());

    let stats = create_zip_sync(&archive_path, &request.sources)?;
    info!(
        "stored {} entries ({} bytes read)",
        stats.entries, stats.input_bytes
    );

    let archive_bytes = fs::metadata(&archive_path)
        .with_context(|| format!("reading size of {}", archive_path.display()))?
        .len();

    Ok(BackupResult {
        archive_path,
        source_count: request.sources.len(),
        entry_count: stats.entries,
        archive_bytes,
    })
}
