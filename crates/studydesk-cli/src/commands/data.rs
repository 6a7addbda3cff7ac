//! Backup and restore of every slice.

use std::path::PathBuf;

use clap::Subcommand;
use studydesk_core::{Clock, StateStore, SystemClock};

use super::{open_state, print_json, CmdResult, Output};

#[derive(Subcommand)]
pub enum DataAction {
    /// Write every slice to a JSON backup
    Export {
        /// Output file (default: studydesk-backup-YYYY-MM-DD.json in the
        /// current directory); "-" writes to stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace every slice with a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
    },
}

pub fn run(action: DataAction, out: Output) -> CmdResult {
    let clock = SystemClock;
    let mut state = open_state(&clock)?;

    match action {
        DataAction::Export { output } => {
            let document = state.export_document()?;
            let path = output.unwrap_or_else(|| PathBuf::from(StateStore::export_file_name(clock.today())));
            if path.as_os_str() == "-" {
                println!("{document}");
                return Ok(());
            }
            std::fs::write(&path, document)?;
            tracing::info!(path = %path.display(), "exported");
            if out.json {
                print_json(&serde_json::json!({ "path": path }))?;
            } else {
                println!("exported to {}", path.display());
            }
        }
        DataAction::Import { file } => {
            let document = std::fs::read_to_string(&file)?;
            state.import_all(&document)?;
            if out.json {
                print_json(&serde_json::json!({ "imported": true }))?;
            } else {
                println!("imported {}; running sessions pick it up on next start", file.display());
            }
        }
    }
    Ok(())
}
