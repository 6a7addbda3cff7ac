//! The six persisted slices and their load/save/export/import paths.
//!
//! Every slice is stored as one JSON string under its own key and always
//! rewritten whole. Load is forgiving (bad data falls back to the default),
//! import is strict (nothing changes unless the whole document is valid).

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::{normalize_events, EventLog};
use crate::clock::Clock;
use crate::error::{CoreError, ImportError, StorageError};
use crate::resources::{default_schedule, Resources, Schedule};
use crate::storage::KvStore;
use crate::task::Task;
use crate::timer::{PomodoroConfig, Progress, Rollover};

/// A persisted part of the application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Tasks,
    Events,
    Pomodoro,
    Resources,
    Schedule,
    Progress,
}

impl Slice {
    pub const ALL: [Slice; 6] = [
        Slice::Tasks,
        Slice::Events,
        Slice::Pomodoro,
        Slice::Resources,
        Slice::Schedule,
        Slice::Progress,
    ];

    /// Key in the kv store.
    pub fn key(self) -> &'static str {
        match self {
            Slice::Tasks => "studydesk.tasks",
            Slice::Events => "studydesk.events",
            Slice::Pomodoro => "studydesk.pomodoroConfig",
            Slice::Resources => "studydesk.resources",
            Slice::Schedule => "studydesk.schedule",
            Slice::Progress => "studydesk.progress",
        }
    }

    /// Field name in an export document.
    pub fn export_name(self) -> &'static str {
        match self {
            Slice::Tasks => "tasks",
            Slice::Events => "events",
            Slice::Pomodoro => "pomodoroConfig",
            Slice::Resources => "resources",
            Slice::Schedule => "schedule",
            Slice::Progress => "progress",
        }
    }
}

impl std::fmt::Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.export_name())
    }
}

/// Every slice at once, shaped like the export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub events: EventLog,
    pub pomodoro_config: PomodoroConfig,
    pub resources: Resources,
    pub schedule: Schedule,
    pub progress: Progress,
}

/// In-memory copy of the persisted state plus the backend it came from.
pub struct StateStore {
    backend: Box<dyn KvStore>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) events: EventLog,
    pub(crate) pomodoro: PomodoroConfig,
    pub(crate) resources: Resources,
    pub(crate) schedule: Schedule,
    pub(crate) progress: Progress,
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("tasks", &self.tasks.len())
            .field("event_days", &self.events.len())
            .field("pomodoro", &self.pomodoro)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl StateStore {
    /// Read all six slices from `backend`.
    ///
    /// A missing entry gives the slice's default. An entry that does not
    /// parse, or a pomodoro config outside its valid ranges, is logged and
    /// also replaced by the default. Event days are re-sorted and empty days
    /// dropped.
    ///
    /// # Errors
    /// Only backend read failures are returned.
    pub fn load(backend: Box<dyn KvStore>, clock: &dyn Clock) -> Result<Self, StorageError> {
        let tasks = read_slice(backend.as_ref(), Slice::Tasks)?.unwrap_or_default();
        let mut events: EventLog = read_slice(backend.as_ref(), Slice::Events)?.unwrap_or_default();
        normalize_events(&mut events);
        let pomodoro = read_slice::<PomodoroConfig>(backend.as_ref(), Slice::Pomodoro)?
            .filter(|config| match config.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "stored pomodoro config is invalid, using default");
                    false
                }
            })
            .unwrap_or_default();
        let resources = read_slice(backend.as_ref(), Slice::Resources)?.unwrap_or_default();
        let schedule = read_slice(backend.as_ref(), Slice::Schedule)?.unwrap_or_else(default_schedule);
        let progress = read_slice(backend.as_ref(), Slice::Progress)?
            .unwrap_or_else(|| Progress::new(clock.today()));

        Ok(Self {
            backend,
            tasks,
            events,
            pomodoro,
            resources,
            schedule,
            progress,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn pomodoro(&self) -> &PomodoroConfig {
        &self.pomodoro
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn backend(&self) -> &dyn KvStore {
        self.backend.as_ref()
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Serialize one slice and overwrite its entry.
    pub fn save(&mut self, slice: Slice) -> Result<(), StorageError> {
        let encoded = match slice {
            Slice::Tasks => serde_json::to_string(&self.tasks),
            Slice::Events => serde_json::to_string(&self.events),
            Slice::Pomodoro => serde_json::to_string(&self.pomodoro),
            Slice::Resources => serde_json::to_string(&self.resources),
            Slice::Schedule => serde_json::to_string(&self.schedule),
            Slice::Progress => serde_json::to_string(&self.progress),
        }
        .map_err(|e| StorageError::QueryFailed(format!("encode {slice}: {e}")))?;

        self.backend.set(slice.key(), &encoded)?;
        tracing::trace!(%slice, bytes = encoded.len(), "slice saved");
        Ok(())
    }

    /// Close out the stored day if the date moved on, saving progress when
    /// it did.
    pub fn refresh_progress(&mut self, today: NaiveDate) -> Result<Option<Rollover>, StorageError> {
        let rollover = self.progress.check_daily_reset(today, self.pomodoro.goal);
        if let Some(r) = &rollover {
            tracing::info!(
                finished = %r.finished_date,
                hours = r.finished_hours,
                goal_met = r.goal_met,
                streak = r.streak,
                "daily progress rolled over"
            );
            self.save(Slice::Progress)?;
        }
        Ok(rollover)
    }

    // ── Import / export ──────────────────────────────────────────────

    pub fn export_all(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks.clone(),
            events: self.events.clone(),
            pomodoro_config: self.pomodoro,
            resources: self.resources.clone(),
            schedule: self.schedule.clone(),
            progress: self.progress.clone(),
        }
    }

    /// Pretty-printed export document.
    pub fn export_document(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(&self.export_all())?)
    }

    /// `studydesk-backup-YYYY-MM-DD.json`
    pub fn export_file_name(date: NaiveDate) -> String {
        format!("studydesk-backup-{}.json", date.format("%Y-%m-%d"))
    }

    /// Replace every slice with the contents of an export document.
    ///
    /// The whole document is checked first. On any error no slice changes,
    /// in memory or in the backend. Event days are re-sorted by time and
    /// empty days dropped before they are stored.
    pub fn import_all(&mut self, document: &str) -> Result<(), CoreError> {
        let snapshot = parse_document(document)?;

        self.tasks = snapshot.tasks;
        self.events = snapshot.events;
        self.pomodoro = snapshot.pomodoro_config;
        self.resources = snapshot.resources;
        self.schedule = snapshot.schedule;
        self.progress = snapshot.progress;

        for slice in Slice::ALL {
            self.save(slice)?;
        }
        tracing::info!(tasks = self.tasks.len(), "state imported");
        Ok(())
    }
}

fn read_slice<T: DeserializeOwned>(backend: &dyn KvStore, slice: Slice) -> Result<Option<T>, StorageError> {
    let Some(raw) = backend.get(slice.key())? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(%slice, error = %e, "stored slice is malformed, using default");
            Ok(None)
        }
    }
}

fn parse_document(document: &str) -> Result<Snapshot, ImportError> {
    let root: Value = serde_json::from_str(document).map_err(ImportError::Parse)?;
    let Value::Object(mut root) = root else {
        return Err(ImportError::NotAnObject);
    };

    let pomodoro_config: PomodoroConfig = take_slice(&mut root, Slice::Pomodoro)?;
    pomodoro_config.validate().map_err(|e| ImportError::MalformedSlice {
        slice: Slice::Pomodoro.export_name(),
        source: serde::de::Error::custom(e),
    })?;

    let mut events: EventLog = take_slice(&mut root, Slice::Events)?;
    normalize_events(&mut events);

    Ok(Snapshot {
        tasks: take_slice(&mut root, Slice::Tasks)?,
        events,
        pomodoro_config,
        resources: take_slice(&mut root, Slice::Resources)?,
        schedule: take_slice(&mut root, Slice::Schedule)?,
        progress: take_slice(&mut root, Slice::Progress)?,
    })
}

fn take_slice<T: DeserializeOwned>(root: &mut Map<String, Value>, slice: Slice) -> Result<T, ImportError> {
    let name = slice.export_name();
    let value = root.remove(name).ok_or(ImportError::MissingSlice(name))?;
    serde_json::from_value(value).map_err(|source| ImportError::MalformedSlice { slice: name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;
    use crate::task::TaskBoard;

    fn clock() -> FixedClock {
        FixedClock::new(NaiveDate::from_ymd_opt(2026, 5, 12).unwrap())
    }

    fn store_with(entries: &[(Slice, &str)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for (slice, raw) in entries {
            store.set(slice.key(), raw).unwrap();
        }
        store
    }

    #[test]
    fn empty_backend_loads_defaults() {
        let clock = clock();
        let state = StateStore::load(Box::new(MemoryStore::new()), &clock).unwrap();
        assert!(state.tasks().is_empty());
        assert!(state.events().is_empty());
        assert_eq!(*state.pomodoro(), PomodoroConfig::default());
        assert_eq!(*state.schedule(), default_schedule());
        assert_eq!(state.progress().daily.date, clock.today());
        assert_eq!(state.progress().streak, 0);
    }

    #[test]
    fn malformed_slice_falls_back_to_default() {
        let store = store_with(&[
            (Slice::Tasks, "{not json"),
            (Slice::Pomodoro, r#"{"work":50,"break":10,"goal":2.0}"#),
        ]);
        let state = StateStore::load(Box::new(store), &clock()).unwrap();
        assert!(state.tasks().is_empty());
        assert_eq!(state.pomodoro().work, 50);
        assert_eq!(state.pomodoro().break_minutes, 10);
    }

    #[test]
    fn out_of_range_pomodoro_config_loads_as_default() {
        let store = store_with(&[(Slice::Pomodoro, r#"{"work":80000000,"break":5,"goal":1.0}"#)]);
        let state = StateStore::load(Box::new(store), &clock()).unwrap();
        assert_eq!(*state.pomodoro(), PomodoroConfig::default());
    }

    #[test]
    fn stored_event_days_are_sorted_and_empty_days_dropped() {
        let store = store_with(&[(
            Slice::Events,
            r#"{"2026-03-18":[{"time":"15:00","title":"Lab"},{"time":"08:30","title":"Exam"}],"2026-03-19":[]}"#,
        )]);
        let state = StateStore::load(Box::new(store), &clock()).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let times: Vec<&str> = state.events()[&day].iter().map(|e| e.time.as_str()).collect();
        assert_eq!(times, ["08:30", "15:00"]);
        assert_eq!(state.events().len(), 1);
    }

    #[test]
    fn imported_event_days_keep_calendar_order() {
        let mut state = StateStore::load(Box::new(MemoryStore::new()), &clock()).unwrap();
        let mut doc: Value = serde_json::from_str(&state.export_document().unwrap()).unwrap();
        doc["events"] = serde_json::json!({
            "2026-03-18": [
                { "time": "15:00", "title": "Lab" },
                { "time": "08:30", "title": "Exam" }
            ],
            "2026-03-19": []
        });
        state.import_all(&doc.to_string()).unwrap();

        let day = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let empty = NaiveDate::from_ymd_opt(2026, 3, 19).unwrap();
        assert!(!state.events().contains_key(&empty));

        let mut calendar = crate::calendar::Calendar::new(&mut state);
        assert_eq!(calendar.events_on(day)[0].title, "Exam");
        assert!(calendar.delete_event(day, 0).unwrap());
        assert_eq!(calendar.events_on(day)[0].title, "Lab");

        let stored = state.backend().get(Slice::Events.key()).unwrap().unwrap();
        assert!(!stored.contains("2026-03-19"));
    }

    #[test]
    fn save_writes_only_that_slice() {
        let mut state = StateStore::load(Box::new(MemoryStore::new()), &clock()).unwrap();
        state.save(Slice::Resources).unwrap();
        assert!(state.backend().get(Slice::Resources.key()).unwrap().is_some());
        assert!(state.backend().get(Slice::Tasks.key()).unwrap().is_none());
    }

    #[test]
    fn export_uses_slice_names() {
        let state = StateStore::load(Box::new(MemoryStore::new()), &clock()).unwrap();
        let doc: Value = serde_json::from_str(&state.export_document().unwrap()).unwrap();
        let root = doc.as_object().unwrap();
        for slice in Slice::ALL {
            assert!(root.contains_key(slice.export_name()), "missing {slice}");
        }
        assert_eq!(root.len(), 6);
        assert_eq!(doc["pomodoroConfig"]["break"], 5);
    }

    #[test]
    fn export_file_name_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        assert_eq!(StateStore::export_file_name(date), "studydesk-backup-2026-01-09.json");
    }

    #[test]
    fn import_rejects_missing_slice_and_keeps_state() {
        let clock = clock();
        let mut state = StateStore::load(Box::new(MemoryStore::new()), &clock).unwrap();
        TaskBoard::new(&mut state)
            .add("Essay", None, Default::default(), "", &clock)
            .unwrap();

        let mut doc: Value = serde_json::from_str(&state.export_document().unwrap()).unwrap();
        doc.as_object_mut().unwrap().remove("schedule");
        doc["tasks"] = Value::Array(Vec::new());

        let err = state.import_all(&doc.to_string()).unwrap_err();
        assert!(matches!(err, CoreError::Import(ImportError::MissingSlice("schedule"))));
        assert_eq!(state.tasks().len(), 1);
    }

    #[test]
    fn import_rejects_bad_shapes() {
        let mut state = StateStore::load(Box::new(MemoryStore::new()), &clock()).unwrap();

        assert!(matches!(
            state.import_all("[1, 2]"),
            Err(CoreError::Import(ImportError::NotAnObject))
        ));
        assert!(matches!(
            state.import_all("nope"),
            Err(CoreError::Import(ImportError::Parse(_)))
        ));

        let mut doc: Value = serde_json::from_str(&state.export_document().unwrap()).unwrap();
        doc["tasks"] = Value::String("oops".into());
        assert!(matches!(
            state.import_all(&doc.to_string()),
            Err(CoreError::Import(ImportError::MalformedSlice { slice: "tasks", .. }))
        ));

        let mut doc: Value = serde_json::from_str(&state.export_document().unwrap()).unwrap();
        doc["pomodoroConfig"]["work"] = Value::from(0);
        assert!(matches!(
            state.import_all(&doc.to_string()),
            Err(CoreError::Import(ImportError::MalformedSlice { slice: "pomodoroConfig", .. }))
        ));
    }

    #[test]
    fn refresh_progress_saves_on_rollover() {
        let mut clock = clock();
        let mut state = StateStore::load(Box::new(MemoryStore::new()), &clock).unwrap();
        assert!(state.refresh_progress(clock.today()).unwrap().is_none());
        assert!(state.backend().get(Slice::Progress.key()).unwrap().is_none());

        clock.advance_day();
        let rollover = state.refresh_progress(clock.today()).unwrap().unwrap();
        assert!(!rollover.goal_met);
        assert!(state.backend().get(Slice::Progress.key()).unwrap().is_some());
    }
}
