use crate::io;
use crate::model::{CalendarIndex, Schedule, Window};
use crate::reconcile::ReconcileError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Données déjà matérialisées : la rotation et les agendas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub schedule: Schedule,
    #[serde(default)]
    pub calendars: CalendarIndex,
}

impl Snapshot {
    /// Restreint la rotation et les agendas à la fenêtre d'analyse.
    pub fn restrict_to(&mut self, window: &Window) -> Result<(), ReconcileError> {
        let (since, until) = window.schedule_bounds()?;
        self.schedule.retain_between(since, until);
        let (since, until) = window.calendar_bounds()?;
        self.calendars.retain_between(since, until);
        Ok(())
    }
}

pub trait Source {
    /// Charge la rotation et les agendas depuis un support.
    fn load(&self) -> anyhow::Result<Snapshot>;
}

/// Snapshot JSON `{ "schedule": {...}, "calendars": {...} }`.
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Source for JsonSource {
    fn load(&self) -> anyhow::Result<Snapshot> {
        let snapshot: Snapshot = io::read_json(&self.path)?;
        info!(
            path = %self.path.display(),
            shifts = snapshot.schedule.len(),
            people = snapshot.calendars.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

/// Rotation CSV et, optionnellement, événements d'agenda CSV.
pub struct CsvSource {
    schedule: PathBuf,
    calendars: Option<PathBuf>,
    marker: String,
}

impl CsvSource {
    pub fn open<P: AsRef<Path>>(schedule: P) -> Self {
        Self {
            schedule: schedule.as_ref().to_path_buf(),
            calendars: None,
            marker: io::DEFAULT_OOO_MARKER.to_string(),
        }
    }

    pub fn with_calendars<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.calendars = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.marker = marker.into();
        self
    }
}

impl Source for CsvSource {
    fn load(&self) -> anyhow::Result<Snapshot> {
        let schedule = io::import_schedule_csv(&self.schedule)
            .with_context(|| format!("reading schedule {}", self.schedule.display()))?;

        let calendars = match &self.calendars {
            Some(path) => {
                let events = io::import_calendar_csv(path)
                    .with_context(|| format!("reading calendars {}", path.display()))?;
                io::build_calendar_index(&events, &schedule.people(), &self.marker)?
            }
            None => CalendarIndex::new(),
        };

        info!(
            shifts = schedule.len(),
            people = calendars.len(),
            "csv inputs loaded"
        );
        Ok(Snapshot {
            schedule,
            calendars,
        })
    }
}
