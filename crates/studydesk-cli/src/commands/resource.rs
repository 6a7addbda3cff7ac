use clap::Subcommand;
use studydesk_core::{ResourceLibrary, SystemClock};

use super::{open_state, print_json, report, CmdResult, Output};

#[derive(Subcommand)]
pub enum ResourceAction {
    /// Save a video link
    VideoAdd { url: String },
    /// List saved videos
    VideoList,
    /// Delete a video by index
    VideoDelete { index: usize },
    /// Save a study tip
    TipAdd { text: String },
    /// List study tips
    TipList,
    /// Delete a tip by index
    TipDelete { index: usize },
}

pub fn run(action: ResourceAction, out: Output) -> CmdResult {
    let mut state = open_state(&SystemClock)?;
    let mut library = ResourceLibrary::new(&mut state);

    match action {
        ResourceAction::VideoAdd { url } => {
            let added = library.add_video(&url)?;
            report(out, added, "video saved", "skipped: empty url")?;
        }
        ResourceAction::VideoDelete { index } => {
            let deleted = library.delete_video(index)?;
            report(out, deleted, "video deleted", &format!("no video {index}"))?;
        }
        ResourceAction::TipAdd { text } => {
            let added = library.add_tip(&text)?;
            report(out, added, "tip saved", "skipped: empty tip")?;
        }
        ResourceAction::TipDelete { index } => {
            let deleted = library.delete_tip(index)?;
            report(out, deleted, "tip deleted", &format!("no tip {index}"))?;
        }
        ResourceAction::VideoList => list(out, &state.resources().videos)?,
        ResourceAction::TipList => list(out, &state.resources().tips)?,
    }
    Ok(())
}

fn list(out: Output, items: &[String]) -> CmdResult {
    if out.json {
        return print_json(items);
    }
    if items.is_empty() {
        println!("(none)");
    }
    for (index, item) in items.iter().enumerate() {
        println!("{index}: {item}");
    }
    Ok(())
}
