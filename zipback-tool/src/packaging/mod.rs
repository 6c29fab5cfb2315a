use std::path::{Path, PathBuf};
use tokio::runtime::Builder;
use zipback_lib::BackupError;

pub mod zip;

/// Represents a file to include in the ZIP archive.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name_in_archive: String,
}

/// Totals gathered while writing an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub entries: usize,
    /// Uncompressed bytes read from the sources.
    pub input_bytes: u64,
}

/// Creates the ZIP archive, managing its own async runtime.
///
/// This is the entrypoint for the synchronous CLI. The runtime is
/// current-thread, so the whole write happens on the calling thread and
/// this call blocks until the archive is finalized.
pub fn create_zip_sync(archive_path: &Path, sources: &[PathBuf]) -> Result<ArchiveStats, BackupError> {
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| BackupError::archive_write(archive_path, e))?;

    rt.block_on(zip::write_archive(archive_path, sources))
}
