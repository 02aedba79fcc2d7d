use crate::model::{BusyInterval, Schedule, ShiftId};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Portée de la règle de repos minimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestScope {
    /// Parcourt la rotation dans son ordre, toutes personnes confondues.
    #[default]
    ScheduleOrder,
    /// Ne considère que les shifts de la même personne.
    SamePerson,
}

/// Options de détection
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectOptions {
    /// 0 désactive la règle de repos.
    pub min_rest_hours: u32,
    pub rest_scope: RestScope,
}

impl DetectOptions {
    pub fn with_rest_days(days: u32) -> Self {
        Self {
            min_rest_hours: days.saturating_mul(24),
            ..Self::default()
        }
    }
}

/// Options de recherche d'échange
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapOptions {
    /// Exige aussi que la personne en conflit puisse tenir le shift reçu.
    pub reciprocal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictKind {
    /// Démarre trop tôt après `previous`.
    RestViolation { previous: ShiftId },
    /// La personne est absente au démarrage du shift.
    Unavailable { interval: BusyInterval },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub shift: ShiftId,
    #[serde(flatten)]
    pub kind: ConflictKind,
}

/// Ensemble de shifts en conflit, par identité, dans l'ordre d'insertion.
#[derive(Debug, Clone, Default)]
pub struct ConflictSet {
    conflicts: Vec<Conflict>,
    members: HashSet<ShiftId>,
}

impl ConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne `false` si le shift y figurait déjà.
    pub fn insert(&mut self, conflict: Conflict) -> bool {
        if !self.members.insert(conflict.shift) {
            return false;
        }
        self.conflicts.push(conflict);
        true
    }

    pub fn contains(&self, shift: ShiftId) -> bool {
        self.members.contains(&shift)
    }

    pub fn get(&self, shift: ShiftId) -> Option<&Conflict> {
        self.conflicts.iter().find(|c| c.shift == shift)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conflict> + '_ {
        self.conflicts.iter()
    }

    pub fn shift_ids(&self) -> Vec<ShiftId> {
        self.conflicts.iter().map(|c| c.shift).collect()
    }

    /// Tri stable par début de shift, pour un affichage reproductible.
    pub fn sorted_by_start(&self, schedule: &Schedule) -> Vec<Conflict> {
        let mut out = self.conflicts.clone();
        out.sort_by_key(|c| schedule.get(c.shift).map(|s| s.start));
        out
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Le remplaçant de `replacement` reprend `conflicted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SwapProposal {
    pub conflicted: ShiftId,
    pub replacement: ShiftId,
}

/// Résultat d'une résolution séquentielle.
#[derive(Debug, Clone, Default)]
pub struct SwapPlan {
    pub proposals: Vec<SwapProposal>,
    pub unresolved: Vec<ShiftId>,
}

impl SwapPlan {
    pub fn replacement_for(&self, conflicted: ShiftId) -> Option<ShiftId> {
        self.proposals
            .iter()
            .find(|p| p.conflicted == conflicted)
            .map(|p| p.replacement)
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("unknown shift: #{0}")]
    UnknownShift(usize),
    #[error("analysis window exceeds the supported date range")]
    WindowOutOfRange,
}
