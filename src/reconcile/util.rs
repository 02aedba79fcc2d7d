use crate::model::{BusyInterval, Shift};
use chrono::{DateTime, Timelike, Utc};

pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Test ancré sur le début du shift : l'absence commence au même instant,
/// commence pendant le shift, ou est encore en cours quand il démarre.
pub(super) fn busy_blocks_shift(busy: &BusyInterval, shift: &Shift) -> bool {
    if busy.start == shift.start {
        return true;
    }
    if busy.start > shift.start && busy.start < shift.end {
        return true;
    }
    busy.start < shift.start && busy.end > shift.start
}

pub(super) fn first_blocking<'a>(
    busy: &'a [BusyInterval],
    shift: &Shift,
) -> Option<&'a BusyInterval> {
    busy.iter().find(|b| busy_blocks_shift(b, shift))
}

/// Heure et minute seulement ; date et secondes ignorées.
pub(super) fn same_time_of_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.hour() == b.hour() && a.minute() == b.minute()
}
