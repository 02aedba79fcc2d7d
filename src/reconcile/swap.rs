use super::{util, SwapOptions, SwapProposal};
use crate::model::{CalendarIndex, Schedule, ShiftId};
use std::collections::HashSet;
use tracing::{debug, info};

/// Premier shift de la rotation (hors `conflicted` et `excluded`) au même
/// horaire que `conflicted` et dont l'occupant est libre sur le créneau
/// réel de `conflicted`.
pub fn find_swap(
    schedule: &Schedule,
    conflicted: ShiftId,
    calendars: &CalendarIndex,
    excluded: &HashSet<ShiftId>,
) -> Option<ShiftId> {
    find_swap_with(schedule, conflicted, calendars, excluded, SwapOptions::default())
}

pub fn find_swap_with(
    schedule: &Schedule,
    conflicted: ShiftId,
    calendars: &CalendarIndex,
    excluded: &HashSet<ShiftId>,
    opts: SwapOptions,
) -> Option<ShiftId> {
    let target = schedule.get(conflicted)?;

    for (id, candidate) in schedule.iter() {
        if id == conflicted || excluded.contains(&id) {
            continue;
        }
        if !util::same_time_of_day(candidate.start, target.start)
            || !util::same_time_of_day(candidate.end, target.end)
        {
            continue;
        }

        if let Some(busy) = util::first_blocking(calendars.busy(&candidate.person.id), target) {
            debug!(
                conflicted = conflicted.index(),
                candidate = id.index(),
                person = candidate.person.id.as_str(),
                busy_start = %busy.start,
                "candidate unavailable for conflicted slot"
            );
            continue;
        }

        if opts.reciprocal
            && util::first_blocking(calendars.busy(&target.person.id), candidate).is_some()
        {
            debug!(
                conflicted = conflicted.index(),
                candidate = id.index(),
                person = target.person.id.as_str(),
                "conflicted person cannot take candidate slot"
            );
            continue;
        }

        return Some(id);
    }

    None
}

/// Résout les conflits un à un en écartant les remplaçants déjà proposés.
#[derive(Debug, Clone, Default)]
pub struct SwapResolver {
    opts: SwapOptions,
    excluded: HashSet<ShiftId>,
}

impl SwapResolver {
    pub fn new(opts: SwapOptions) -> Self {
        Self {
            opts,
            excluded: HashSet::new(),
        }
    }

    pub fn excluded(&self) -> &HashSet<ShiftId> {
        &self.excluded
    }

    /// Retire `shift` des candidats pour les résolutions suivantes.
    pub fn exclude(&mut self, shift: ShiftId) {
        self.excluded.insert(shift);
    }

    pub fn resolve(
        &mut self,
        schedule: &Schedule,
        conflicted: ShiftId,
        calendars: &CalendarIndex,
    ) -> Option<SwapProposal> {
        let replacement =
            find_swap_with(schedule, conflicted, calendars, &self.excluded, self.opts)?;
        self.excluded.insert(replacement);
        info!(
            conflicted = conflicted.index(),
            replacement = replacement.index(),
            "swap proposed"
        );
        Some(SwapProposal {
            conflicted,
            replacement,
        })
    }
}
