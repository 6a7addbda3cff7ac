pub mod completions;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod event;
pub mod resource;
pub mod schedule;
pub mod task;
pub mod timer;

use serde::Serialize;
use studydesk_core::{Clock, Database, StateStore};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

/// Open the SQLite store in the data directory and load every slice.
pub fn open_state(clock: &dyn Clock) -> Result<StateStore, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(StateStore::load(Box::new(db), clock)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print `ok`/`skipped` style feedback for commands that may be no-ops.
pub fn report(out: Output, changed: bool, done: &str, skipped: &str) -> CmdResult {
    if out.json {
        print_json(&serde_json::json!({ "changed": changed }))
    } else {
        println!("{}", if changed { done } else { skipped });
        Ok(())
    }
}
