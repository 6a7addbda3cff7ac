//! Pomodoro timer commands for CLI.
//!
//! `timer run` is the only long-running command: it owns the state and the
//! engine and handles ticks, stdin commands and Ctrl-C one at a time.

use std::io::Write;

use clap::Subcommand;
use studydesk_core::{Clock, Config, Event, IntervalTicker, Phase, PomodoroEngine, StateStore, SystemClock, ZenCountdown};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{open_state, print_json, CmdResult, Output};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer interactively (stdin: start, pause, reset, status, quit)
    Run {
        /// Start the first phase right away
        #[arg(long)]
        start: bool,
    },
    /// Show today's progress and the idle timer
    Status,
    /// Fixed 25-minute focus countdown that records no study time
    /// (stdin: quit to leave early)
    Zen,
    /// Change durations and the daily goal
    Configure {
        /// Work interval in minutes
        #[arg(long)]
        work: Option<u32>,
        /// Break interval in minutes
        #[arg(long = "break")]
        break_minutes: Option<u32>,
        /// Daily goal in hours
        #[arg(long)]
        goal: Option<f64>,
    },
}

pub fn run(action: TimerAction, out: Output, config: &Config) -> CmdResult {
    let clock = SystemClock;
    let mut state = open_state(&clock)?;

    match action {
        TimerAction::Run { start } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_loop(&mut state, &clock, out, config, start))?;
        }
        TimerAction::Zen => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(zen_loop(out, config))?;
        }
        TimerAction::Status => {
            let mut engine = PomodoroEngine::new();
            engine.reset(&state);
            if let Some(rollover) = state.refresh_progress(clock.today())? {
                tracing::debug!(?rollover, "rolled over on status");
            }
            emit(out, &engine.snapshot(&state))?;
        }
        TimerAction::Configure {
            work,
            break_minutes,
            goal,
        } => {
            let current = *state.pomodoro();
            let updated = PomodoroEngine::new().configure(
                &mut state,
                work.unwrap_or(current.work),
                break_minutes.unwrap_or(current.break_minutes),
                goal.unwrap_or(current.goal),
            )?;
            if out.json {
                print_json(&updated)?;
            } else {
                println!(
                    "work {} min, break {} min, goal {} h",
                    updated.work, updated.break_minutes, updated.goal
                );
            }
        }
    }
    Ok(())
}

enum Command {
    Start,
    Pause,
    Reset,
    Status,
    Quit,
}

fn parse_command(input: &str) -> Option<Command> {
    match input.to_ascii_lowercase().as_str() {
        "s" | "start" => Some(Command::Start),
        "p" | "pause" => Some(Command::Pause),
        "r" | "reset" => Some(Command::Reset),
        "t" | "status" => Some(Command::Status),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

async fn run_loop(
    state: &mut StateStore,
    clock: &SystemClock,
    out: Output,
    config: &Config,
    autostart: bool,
) -> CmdResult {
    let (mut ticker, mut ticks) = IntervalTicker::new();
    let mut engine = PomodoroEngine::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    emit(out, &engine.reset(state))?;
    if autostart {
        emit(out, &engine.start(state, clock, &mut ticker)?)?;
    }

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                if !engine.accepts(tick) {
                    continue;
                }
                match engine.tick(state, clock)? {
                    Some(event) => {
                        clear_line(out);
                        emit(out, &event)?;
                        notify(config, &event);
                    }
                    None if !out.json => {
                        print!("\r{} {}", engine.phase(), engine.format_time_left());
                        std::io::stdout().flush()?;
                    }
                    None => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                clear_line(out);
                match parse_command(line.trim()) {
                    Some(Command::Start) => emit(out, &engine.start(state, clock, &mut ticker)?)?,
                    Some(Command::Pause) => emit(out, &engine.pause())?,
                    Some(Command::Reset) => emit(out, &engine.reset(state))?,
                    Some(Command::Status) => {
                        state.refresh_progress(clock.today())?;
                        emit(out, &engine.snapshot(state))?;
                    }
                    Some(Command::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => eprintln!("commands: start, pause, reset, status, quit"),
                }
            }
            _ = &mut ctrl_c => {
                clear_line(out);
                break;
            }
        }
    }

    engine.pause();
    Ok(())
}

async fn zen_loop(out: Output, config: &Config) -> CmdResult {
    let (mut ticker, mut ticks) = IntervalTicker::new();
    let mut zen = ZenCountdown::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    emit(out, &zen.start(&mut ticker))?;

    while zen.is_running() {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                if !zen.accepts(tick) {
                    continue;
                }
                match zen.tick() {
                    Some(event) => {
                        clear_line(out);
                        emit(out, &event)?;
                        notify(config, &event);
                    }
                    None if !out.json => {
                        print!("\rzen {}", zen.format_time_left());
                        std::io::stdout().flush()?;
                    }
                    None => {}
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) if matches!(parse_command(line.trim()), Some(Command::Quit)) => {
                        clear_line(out);
                        emit(out, &zen.stop())?;
                    }
                    Some(_) => {}
                    None => stdin_open = false,
                }
            }
            _ = &mut ctrl_c => {
                clear_line(out);
                emit(out, &zen.stop())?;
            }
        }
    }
    Ok(())
}

fn clear_line(out: Output) {
    if !out.json && cfg!(unix) {
        print!("\r\x1b[2K");
    }
}

/// Phase-end alert: a line on stderr and the terminal bell.
fn notify(config: &Config, event: &Event) {
    let message = match event {
        Event::PhaseCompleted { finished: Phase::Work, .. } => "Work session finished. Take a break!",
        Event::PhaseCompleted { finished: Phase::Break, .. } => "Break is over. Back to work!",
        Event::ZenCompleted { .. } => "Zen session complete!",
        _ => return,
    };
    if !config.notifications.enabled {
        return;
    }
    eprintln!("{message}");
    if config.notifications.bell {
        eprint!("\x07");
    }
}

fn emit(out: Output, event: &Event) -> CmdResult {
    if out.json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{}", describe(event));
    }
    Ok(())
}

fn mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn describe(event: &Event) -> String {
    match event {
        Event::TimerStarted {
            phase,
            time_left_secs,
            resumed,
            rollover,
            ..
        } => {
            let mut text = format!(
                "{} {phase}: {} left",
                if *resumed { "resumed" } else { "started" },
                mmss(*time_left_secs)
            );
            if let Some(r) = rollover {
                text.push_str(&format!(
                    "\nnew day: {} closed with {:.2} h, streak {}",
                    r.finished_date, r.finished_hours, r.streak
                ));
            }
            text
        }
        Event::TimerPaused { time_left_secs, .. } => format!("paused at {}", mmss(*time_left_secs)),
        Event::TimerReset { time_left_secs, .. } => format!("ready: work {}", mmss(*time_left_secs)),
        Event::PhaseCompleted {
            finished,
            next,
            hours_credited,
            daily_hours,
            ..
        } => {
            if *hours_credited > 0.0 {
                format!("{finished} done (+{hours_credited:.2} h, today {daily_hours:.2} h), {next} next")
            } else {
                format!("{finished} done, {next} next")
            }
        }
        Event::ZenStarted { time_left_secs, .. } => format!("zen: {} of quiet focus", mmss(*time_left_secs)),
        Event::ZenStopped { time_left_secs, .. } => format!("zen left with {} to go", mmss(*time_left_secs)),
        Event::ZenCompleted { .. } => "zen complete".to_string(),
        Event::StateSnapshot {
            phase,
            time_left_secs,
            is_paused,
            daily_hours,
            goal_hours,
            goal_pct,
            streak,
            ..
        } => format!(
            "{phase} {}{}\ntoday {daily_hours:.2} / {goal_hours} h ({goal_pct:.0}%), streak {streak}",
            mmss(*time_left_secs),
            if *is_paused { " (paused)" } else { "" }
        ),
    }
}
