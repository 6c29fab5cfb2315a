use std::path::PathBuf;

use thiserror::Error;

/// One backup invocation, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRequest {
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
    pub name: Option<String>,
}

/// What a finished run produced. Only used to build the summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResult {
    pub archive_path: PathBuf,
    /// Number of top-level source arguments, not files.
    pub source_count: usize,
    pub entry_count: usize,
    pub archive_bytes: u64,
}

/// Every failure is fatal to the run.
#[derive(Error, Debug)]
pub enum BackupError {
    /// A listed source does not exist at walk time
    #[error("source does not exist: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// A directory could not be listed or a file could not be read
    #[error("cannot read source {}: {reason}", path.display())]
    SourceRead { path: PathBuf, reason: String },

    /// Creating, writing or finalizing the archive failed
    #[error("cannot write archive {}: {reason}", path.display())]
    ArchiveWrite { path: PathBuf, reason: String },
}

impl BackupError {
    pub fn source_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        BackupError::SourceRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn archive_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        BackupError::ArchiveWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
