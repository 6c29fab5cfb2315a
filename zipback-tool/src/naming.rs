use chrono::{DateTime, TimeZone};
use std::path::PathBuf;

const TIMESTAMP_FORMAT: &str = "%d-%m-%y_%H-%M-%S";

/// Formats a point in time as `dd-mm-yy_hh-mm-ss`.
pub fn timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Picks the archive file name: `<name>.zip` when a name was given,
/// `backup_<timestamp>.zip` otherwise.
pub fn archive_file_name(timestamp: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{name}.zip"),
        None => format!("backup_{timestamp}.zip"),
    }
}

/// Joins destination and file name with a plain `/`.
/// Nothing is validated; an existing file at the result gets overwritten.
pub fn archive_path(timestamp: &str, destination: &str, name: Option<&str>) -> PathBuf {
    let file_name = archive_file_name(timestamp, name);
    PathBuf::from(format!("{destination}/{file_name}"))
}
