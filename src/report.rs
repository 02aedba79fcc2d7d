use crate::model::{Schedule, Shift, ShiftId};
use crate::reconcile::{ConflictKind, ConflictSet, ReconcileError, SwapPlan};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Lignes prêtes à afficher, dans l'ordre chronologique des conflits.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub conflicts: Vec<String>,
    pub swaps: Vec<String>,
    pub missing: Vec<String>,
}

/// Permet de customiser le rendu (texte, chat, etc.).
pub trait ReportRenderer {
    fn conflict(&self, shift: &Shift, kind: &ConflictKind) -> String;
    fn swap(&self, conflicted: &Shift, replacement: &Shift) -> String;
    fn missing_swap(&self, conflicted: &Shift) -> String;
}

/// Rendu texte brut pour le terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn conflict(&self, shift: &Shift, _kind: &ConflictKind) -> String {
        format!(
            "{} to {} : {}",
            stamp(shift.start),
            stamp(shift.end),
            shift.person.name
        )
    }

    fn swap(&self, conflicted: &Shift, replacement: &Shift) -> String {
        format!("{} -> {}", slot(conflicted), slot(replacement))
    }

    fn missing_swap(&self, conflicted: &Shift) -> String {
        format!(" ==> SWAP NOT FOUND FOR {} <==", slot(conflicted))
    }
}

fn slot(shift: &Shift) -> String {
    format!(
        "{} - {} - {}",
        stamp(shift.start),
        stamp(shift.end),
        shift.person.name
    )
}

fn stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn lookup(schedule: &Schedule, id: ShiftId) -> Result<&Shift, ReconcileError> {
    schedule
        .get(id)
        .ok_or(ReconcileError::UnknownShift(id.index()))
}

/// Prépare le rapport ; `plan` absent quand seule la détection a tourné.
pub fn prepare_report(
    schedule: &Schedule,
    conflicts: &ConflictSet,
    plan: Option<&SwapPlan>,
    renderer: &dyn ReportRenderer,
) -> Result<Report, ReconcileError> {
    let mut report = Report::default();

    for conflict in conflicts.sorted_by_start(schedule) {
        let shift = lookup(schedule, conflict.shift)?;
        report.conflicts.push(renderer.conflict(shift, &conflict.kind));

        let Some(plan) = plan else {
            continue;
        };
        match plan.replacement_for(conflict.shift) {
            Some(replacement) => {
                let replacement = lookup(schedule, replacement)?;
                report.swaps.push(renderer.swap(shift, replacement));
            }
            None => report.missing.push(renderer.missing_swap(shift)),
        }
    }

    Ok(report)
}

/// Occupant proposé pour reprendre un shift en conflit.
#[derive(Debug, Clone, Serialize)]
pub struct SwapSlot {
    pub shift: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub person_id: String,
    pub person_name: String,
}

/// Ligne d'export (CSV/JSON).
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub shift: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub person_id: String,
    pub person_name: String,
    pub reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<SwapSlot>,
}

pub fn report_rows(
    schedule: &Schedule,
    conflicts: &ConflictSet,
    plan: Option<&SwapPlan>,
) -> Result<Vec<ReportRow>, ReconcileError> {
    let mut rows = Vec::with_capacity(conflicts.len());

    for conflict in conflicts.sorted_by_start(schedule) {
        let shift = lookup(schedule, conflict.shift)?;
        let swap = match plan.and_then(|p| p.replacement_for(conflict.shift)) {
            Some(id) => {
                let replacement = lookup(schedule, id)?;
                Some(SwapSlot {
                    shift: id.index(),
                    start: replacement.start,
                    end: replacement.end,
                    person_id: replacement.person.id.as_str().to_string(),
                    person_name: replacement.person.name.clone(),
                })
            }
            None => None,
        };
        rows.push(ReportRow {
            shift: conflict.shift.index(),
            start: shift.start,
            end: shift.end,
            person_id: shift.person.id.as_str().to_string(),
            person_name: shift.person.name.clone(),
            reason: match conflict.kind {
                ConflictKind::RestViolation { .. } => "rest",
                ConflictKind::Unavailable { .. } => "unavailable",
            },
            swap,
        });
    }

    Ok(rows)
}
