mod conflicts;
mod swap;
mod types;
mod util;

pub use swap::{find_swap, find_swap_with, SwapResolver};
pub use types::{
    Conflict, ConflictKind, ConflictSet, DetectOptions, ReconcileError, RestScope, SwapOptions,
    SwapPlan, SwapProposal,
};
pub use util::overlaps;

use crate::model::{CalendarIndex, Schedule, ShiftId};
use tracing::warn;

/// Détecte les shifts que leur titulaire ne peut pas tenir.
pub fn detect_conflicts(
    schedule: &Schedule,
    calendars: &CalendarIndex,
    opts: DetectOptions,
) -> ConflictSet {
    conflicts::detect_conflicts(schedule, calendars, opts)
}

/// Reconciler : confronte une rotation aux agendas, sans les modifier.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    schedule: &'a Schedule,
    calendars: &'a CalendarIndex,
}

impl<'a> Reconciler<'a> {
    pub fn new(schedule: &'a Schedule, calendars: &'a CalendarIndex) -> Self {
        Self {
            schedule,
            calendars,
        }
    }

    pub fn detect_conflicts(&self, opts: DetectOptions) -> ConflictSet {
        conflicts::detect_conflicts(self.schedule, self.calendars, opts)
    }

    pub fn find_swap(
        &self,
        conflicted: ShiftId,
        excluded: &std::collections::HashSet<ShiftId>,
        opts: SwapOptions,
    ) -> Option<ShiftId> {
        swap::find_swap_with(self.schedule, conflicted, self.calendars, excluded, opts)
    }

    /// Résout les conflits dans l'ordre de l'ensemble ; un remplaçant
    /// proposé n'est plus candidat pour les conflits suivants.
    pub fn propose_swaps(&self, conflicts: &ConflictSet, opts: SwapOptions) -> SwapPlan {
        let mut resolver = SwapResolver::new(opts);
        let mut plan = SwapPlan::default();

        for conflict in conflicts.iter() {
            match resolver.resolve(self.schedule, conflict.shift, self.calendars) {
                Some(proposal) => plan.proposals.push(proposal),
                None => {
                    warn!(shift = conflict.shift.index(), "no swap found");
                    plan.unresolved.push(conflict.shift);
                }
            }
        }

        plan
    }
}
