#![forbid(unsafe_code)]
//! Rotacheck — confronte une rotation d'astreinte aux absences d'agenda.
//!
//! - Détection des shifts intenables (repos minimal, absence au démarrage).
//! - Recherche d'échanges au même horaire, premier candidat libre.
//! - Entrées fichiers (CSV/JSON) ; tout en UTC.

pub mod io;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod source;

pub use model::{BusyInterval, CalendarIndex, Person, PersonId, Schedule, Shift, ShiftId, Window};
pub use reconcile::{
    detect_conflicts, find_swap, find_swap_with, Conflict, ConflictKind, ConflictSet,
    DetectOptions, ReconcileError, Reconciler, RestScope, SwapOptions, SwapPlan, SwapProposal,
    SwapResolver,
};
pub use report::{prepare_report, report_rows, Report, ReportRenderer, ReportRow, TextReport};
pub use source::{CsvSource, JsonSource, Snapshot, Source};
