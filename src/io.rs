use crate::model::{midnight_utc, BusyInterval, CalendarIndex, Person, PersonId, Schedule, Shift};
use crate::report::ReportRow;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Marqueur par défaut des événements « absent » dans les titres d'agenda.
pub const DEFAULT_OOO_MARKER: &str = "out";

/// Événement brut tel que fourni par l'agenda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Identifiant de la personne ou adresse de contact.
    pub owner: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Import de la rotation: header `person_id,person_name,start,end[,contact]` (RFC3339 UTC).
/// L'ordre des lignes est conservé.
pub fn import_schedule_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Schedule> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut schedule = Schedule::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let id = rec.get(0).context("missing person_id")?.trim();
        let name = rec.get(1).context("missing person_name")?.trim();
        if id.is_empty() {
            bail!("invalid schedule row {} (empty person_id)", line + 1);
        }
        let start: DateTime<Utc> = rec
            .get(2)
            .context("missing start")?
            .trim()
            .parse()
            .context("start RFC3339")?;
        let end: DateTime<Utc> = rec
            .get(3)
            .context("missing end")?
            .trim()
            .parse()
            .context("end RFC3339")?;

        let mut person = Person::new(id, name);
        if let Some(contact) = rec.get(4).map(str::trim).filter(|c| !c.is_empty()) {
            person = person.with_contact(contact);
        }
        let shift = Shift::new(start, end, person)
            .with_context(|| format!("invalid schedule row {}", line + 1))?;
        schedule.push(shift);
    }
    Ok(schedule)
}

/// Import d'événements: header `owner,title,start,end`.
/// `start`/`end` en RFC3339 ou `YYYY-MM-DD` (minuit UTC).
pub fn import_calendar_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<CalendarEvent>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let owner = rec.get(0).context("missing owner")?.trim();
        if owner.is_empty() {
            bail!("invalid calendar row (empty owner)");
        }
        let title = rec.get(1).context("missing title")?.trim().to_string();
        let start = parse_point(rec.get(2).context("missing start")?.trim())?;
        let end = parse_point(rec.get(3).context("missing end")?.trim())?;
        out.push(CalendarEvent {
            owner: owner.to_string(),
            title,
            start,
            end,
        });
    }
    Ok(out)
}

/// Date-heure RFC3339, ou date seule ramenée à minuit UTC.
pub fn parse_point(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date/datetime: {raw}"))?;
    Ok(midnight_utc(date))
}

/// Vrai si `marker` apparaît comme mot du titre (casse ignorée).
pub fn is_out_of_office(title: &str, marker: &str) -> bool {
    title
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case(marker))
}

/// Construit l'index d'agenda à partir des événements « absent ».
///
/// `owner` est rapproché du contact d'une personne de `roster` ; à défaut
/// il est pris comme identifiant de personne.
pub fn build_calendar_index(
    events: &[CalendarEvent],
    roster: &[&Person],
    marker: &str,
) -> anyhow::Result<CalendarIndex> {
    let mut index = CalendarIndex::new();
    for event in events {
        if !is_out_of_office(&event.title, marker) {
            debug!(owner = %event.owner, title = %event.title, "ignoring calendar event");
            continue;
        }
        let person = roster
            .iter()
            .find(|p| {
                p.contact
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(&event.owner))
            })
            .map(|p| p.id.clone())
            .unwrap_or_else(|| PersonId::new(&event.owner));
        let interval = BusyInterval::new(event.start, event.end).with_context(|| {
            format!(
                "invalid calendar event \"{}\" for {}",
                event.title, event.owner
            )
        })?;
        index.insert(person, interval);
    }
    Ok(index)
}

/// Export CSV du rapport: header
/// `shift,start,end,person_id,person_name,reason,swap_start,swap_end,swap_person`
pub fn export_report_csv<P: AsRef<Path>>(path: P, rows: &[ReportRow]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "shift",
        "start",
        "end",
        "person_id",
        "person_name",
        "reason",
        "swap_start",
        "swap_end",
        "swap_person",
    ])?;
    for row in rows {
        let shift = row.shift.to_string();
        let start = row.start.to_rfc3339();
        let end = row.end.to_rfc3339();
        let (swap_start, swap_end, swap_person) = match &row.swap {
            Some(swap) => (
                swap.start.to_rfc3339(),
                swap.end.to_rfc3339(),
                swap.person_name.clone(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        w.write_record([
            shift.as_str(),
            start.as_str(),
            end.as_str(),
            row.person_id.as_str(),
            row.person_name.as_str(),
            row.reason,
            swap_start.as_str(),
            swap_end.as_str(),
            swap_person.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export JSON (jolie mise en forme), écrit de manière atomique.
pub fn export_json<P: AsRef<Path>, T: Serialize + ?Sized>(
    path: P,
    value: &T,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(value)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}

/// Lecture d'un fichier JSON quelconque.
pub fn read_json<P: AsRef<Path>, T: serde::de::DeserializeOwned>(path: P) -> anyhow::Result<T> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
}
