use super::{util, Conflict, ConflictKind, ConflictSet, DetectOptions, RestScope};
use crate::model::{CalendarIndex, Schedule, Shift, ShiftId};
use chrono::Duration;
use tracing::{debug, info};

pub(super) fn detect_conflicts(
    schedule: &Schedule,
    calendars: &CalendarIndex,
    opts: DetectOptions,
) -> ConflictSet {
    let mut out = ConflictSet::new();

    for (id, shift) in schedule.iter() {
        if let Some(previous) = rest_violation(schedule, id, shift, opts) {
            debug!(
                shift = id.index(),
                person = shift.person.id.as_str(),
                previous = previous.index(),
                "rest period not respected"
            );
            out.insert(Conflict {
                shift: id,
                kind: ConflictKind::RestViolation { previous },
            });
            continue;
        }

        let busy = calendars.busy(&shift.person.id);
        if let Some(interval) = util::first_blocking(busy, shift) {
            debug!(
                shift = id.index(),
                person = shift.person.id.as_str(),
                busy_start = %interval.start,
                busy_end = %interval.end,
                "person unavailable for shift"
            );
            out.insert(Conflict {
                shift: id,
                kind: ConflictKind::Unavailable {
                    interval: *interval,
                },
            });
        }
    }

    info!(
        shifts = schedule.len(),
        conflicts = out.len(),
        "conflict detection done"
    );
    out
}

/// Parcourt la rotation dans son ordre et s'arrête au premier shift qui
/// démarre au même moment ou après `shift`, ou sur `shift` lui-même.
fn rest_violation(
    schedule: &Schedule,
    id: ShiftId,
    shift: &Shift,
    opts: DetectOptions,
) -> Option<ShiftId> {
    if opts.min_rest_hours == 0 {
        return None;
    }
    let rest = Duration::hours(i64::from(opts.min_rest_hours));

    for (prev_id, prev) in schedule.iter() {
        if opts.rest_scope == RestScope::SamePerson && prev.person.id != shift.person.id {
            continue;
        }
        if prev_id == id || prev.start >= shift.start {
            return None;
        }
        // au-delà de la date maximale : encore dans la période de repos
        match prev.start.checked_add_signed(rest) {
            Some(limit) if shift.start >= limit => {}
            _ => return Some(prev_id),
        }
    }

    None
}
