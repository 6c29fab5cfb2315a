use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;
use zipback_lib::BackupRequest;

mod fs_utils;
mod naming;
mod packaging;
mod process;
mod report;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compress files and directories into a timestamped zip backup", long_about = None)]
pub struct Cli {
    /// The file or directory to be backed up
    #[arg(required = true, num_args = 1..)]
    pub source: Vec<PathBuf>,

    /// The directory to save the backup to
    #[arg()]
    pub destination: PathBuf,

    /// The name of the .zip file (defaults to backup_<timestamp>)
    #[arg(long)]
    pub name: Option<String>,
}

impl From<Cli> for BackupRequest {
    fn from(cli: Cli) -> Self {
        BackupRequest {
            sources: cli.source,
            destination: cli.destination,
            name: cli.name,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let request = BackupRequest::from(Cli::parse());
    let result = process::run_backup(&request)?;

    println!(
        "{}",
        report::summary_line(&result, &request.destination.to_string_lossy())
    );
    Ok(())
}
