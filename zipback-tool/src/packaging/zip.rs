use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipDateTime, ZipEntryBuilder};
use chrono::{DateTime, Local};
use futures::io::AsyncWriteExt as _;
use log::{debug, warn};
use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use zipback_lib::BackupError;

use crate::fs_utils::{entry_name, walk_source};
use crate::packaging::{ArchiveStats, FileEntry};

const READ_BUF_SIZE: usize = 64 * 1024;

/// Writes every file under `sources` into a fresh ZIP at `archive_path`.
///
/// Sources are walked one at a time inside the write loop, so a missing
/// source aborts after the earlier ones were stored. The archive is
/// finalized and flushed on every path; when the loop failed, its error
/// wins over any finalization error.
pub async fn write_archive(
    archive_path: &Path,
    sources: &[PathBuf],
) -> Result<ArchiveStats, BackupError> {
    let file = File::create(archive_path)
        .await
        .map_err(|e| BackupError::archive_write(archive_path, e))?;
    let exclude = tokio::fs::canonicalize(archive_path).await.ok();

    let mut writer = ZipFileWriter::with_tokio(file);
    let outcome = append_sources(&mut writer, archive_path, sources, exclude.as_deref()).await;
    let finished = finish(writer, archive_path).await;

    let stats = outcome?;
    finished?;
    Ok(stats)
}

async fn append_sources(
    writer: &mut ZipFileWriter<File>,
    archive_path: &Path,
    sources: &[PathBuf],
    exclude: Option<&Path>,
) -> Result<ArchiveStats, BackupError> {
    let mut stats = ArchiveStats::default();
    let mut seen = HashSet::new();
    for source in sources {
        for path in walk_source(source, exclude)? {
            let entry = FileEntry {
                name_in_archive: entry_name(&path),
                path,
            };
            if !seen.insert(entry.name_in_archive.clone()) {
                warn!(
                    "duplicate entry name {} for {:?}; extractors will keep only one",
                    entry.name_in_archive, entry.path
                );
            }
            stats.input_bytes += append_file(writer, archive_path, &entry).await?;
            stats.entries += 1;
        }
    }
    Ok(stats)
}

/// Streams one file into a deflated entry. Returns the bytes read.
async fn append_file(
    writer: &mut ZipFileWriter<File>,
    archive_path: &Path,
    entry: &FileEntry,
) -> Result<u64, BackupError> {
    let mut f = File::open(&entry.path)
        .await
        .map_err(|e| BackupError::source_read(&entry.path, e))?;

    let meta = f
        .metadata()
        .await
        .map_err(|e| BackupError::source_read(&entry.path, e))?;

    debug!("adding {:?} as {}", entry.path, entry.name_in_archive);
    let builder = entry_builder(entry, &meta);
    let mut entry_writer = writer
        .write_entry_stream(builder)
        .await
        .map_err(|e| BackupError::archive_write(archive_path, e))?;

    let mut buf = vec![0u8; READ_BUF_SIZE];
    let mut total = 0u64;
    loop {
        let n = f
            .read(&mut buf)
            .await
            .map_err(|e| BackupError::source_read(&entry.path, e))?;
        if n == 0 {
            break;
        }
        entry_writer
            .write_all(&buf[..n])
            .await
            .map_err(|e| BackupError::archive_write(archive_path, e))?;
        total += n as u64;
    }

    entry_writer
        .close()
        .await
        .map_err(|e| BackupError::archive_write(archive_path, e))?;
    Ok(total)
}

/// Entry header carrying the file's mtime (local wall-clock, as DOS time)
/// and, on unix, its mode.
fn entry_builder(entry: &FileEntry, meta: &Metadata) -> ZipEntryBuilder {
    let mut builder =
        ZipEntryBuilder::new(entry.name_in_archive.clone().into(), Compression::Deflate);

    match meta.modified() {
        Ok(mtime) => {
            let local = DateTime::<Local>::from(mtime).naive_local().and_utc();
            builder = builder.last_modification_date(ZipDateTime::from_chrono(&local));
        }
        Err(e) => debug!("no mtime for {:?}: {e}", entry.path),
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder = builder.unix_permissions(meta.permissions().mode() as u16);
    }

    builder
}

/// Writes the central directory and flushes the file to disk.
async fn finish(writer: ZipFileWriter<File>, archive_path: &Path) -> Result<(), BackupError> {
    let mut file = writer
        .close()
        .await
        .map_err(|e| BackupError::archive_write(archive_path, e))?
        .into_inner();
    file.flush()
        .await
        .map_err(|e| BackupError::archive_write(archive_path, e))?;
    Ok(())
}
