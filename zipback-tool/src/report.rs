use zipback_lib::BackupResult;

const MIB: f64 = 1024.0 * 1024.0;

/// Archive size in mebibytes.
pub fn size_in_mib(bytes: u64) -> f64 {
    bytes as f64 / MIB
}

/// The one line printed after a successful run.
pub fn summary_line(result: &BackupResult, destination: &str) -> String {
    format!(
        "The backup of {} sources has been completed and saved to {} (size: {:.2} MB).",
        result.source_count,
        destination,
        size_in_mib(result.archive_bytes)
    )
}
