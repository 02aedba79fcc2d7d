#![forbid(unsafe_code)]
use chrono::{DateTime, TimeZone, Utc};
use rotacheck::{
    prepare_report, BusyInterval, CalendarIndex, ConflictKind, DetectOptions, Person, PersonId,
    Reconciler, ReportRenderer, Schedule, Shift, SwapOptions, TextReport,
};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 1, day, hour, 0, 0).unwrap()
}

fn sample() -> (Schedule, CalendarIndex) {
    let mut schedule = Schedule::named("primary");
    schedule.push(Shift::new(at(2, 0), at(2, 8), Person::new("P1", "Alice")).unwrap());
    schedule.push(Shift::new(at(2, 8), at(2, 16), Person::new("P2", "Bob")).unwrap());
    schedule.push(Shift::new(at(3, 0), at(3, 8), Person::new("P3", "Carol")).unwrap());

    let mut calendars = CalendarIndex::new();
    calendars.insert(
        PersonId::new("P1"),
        BusyInterval::new(at(2, 0), at(3, 0)).unwrap(),
    );
    calendars.insert(
        PersonId::new("P2"),
        BusyInterval::new(at(2, 10), at(2, 12)).unwrap(),
    );
    (schedule, calendars)
}

#[test]
fn text_report_lists_conflicts_swaps_and_misses() {
    let (schedule, calendars) = sample();
    let reconciler = Reconciler::new(&schedule, &calendars);
    let conflicts = reconciler.detect_conflicts(DetectOptions::default());
    let plan = reconciler.propose_swaps(&conflicts, SwapOptions::default());

    let report = prepare_report(&schedule, &conflicts, Some(&plan), &TextReport).unwrap();

    insta::assert_snapshot!(report.conflicts.join("\n"), @r###"
    2019-01-02T00:00:00Z to 2019-01-02T08:00:00Z : Alice
    2019-01-02T08:00:00Z to 2019-01-02T16:00:00Z : Bob
    "###);
    insta::assert_snapshot!(report.swaps.join("\n"), @"2019-01-02T00:00:00Z - 2019-01-02T08:00:00Z - Alice -> 2019-01-03T00:00:00Z - 2019-01-03T08:00:00Z - Carol");
    insta::assert_snapshot!(report.missing.join("\n"), @" ==> SWAP NOT FOUND FOR 2019-01-02T08:00:00Z - 2019-01-02T16:00:00Z - Bob <==");
}

#[test]
fn detection_only_report_has_no_swap_lines() {
    let (schedule, calendars) = sample();
    let conflicts =
        Reconciler::new(&schedule, &calendars).detect_conflicts(DetectOptions::default());

    let report = prepare_report(&schedule, &conflicts, None, &TextReport).unwrap();
    assert_eq!(report.conflicts.len(), 2);
    assert!(report.swaps.is_empty());
    assert!(report.missing.is_empty());
}

struct Reasons;

impl ReportRenderer for Reasons {
    fn conflict(&self, shift: &Shift, kind: &ConflictKind) -> String {
        match kind {
            ConflictKind::RestViolation { previous } => {
                format!("{}: rest after #{}", shift.person.name, previous.index())
            }
            ConflictKind::Unavailable { .. } => format!("{}: away", shift.person.name),
        }
    }
    fn swap(&self, conflicted: &Shift, replacement: &Shift) -> String {
        format!("{} <- {}", conflicted.person.name, replacement.person.name)
    }
    fn missing_swap(&self, conflicted: &Shift) -> String {
        format!("{} stuck", conflicted.person.name)
    }
}

#[test]
fn custom_renderer_sees_conflict_kind() {
    let (schedule, calendars) = sample();
    let reconciler = Reconciler::new(&schedule, &calendars);
    let conflicts = reconciler.detect_conflicts(DetectOptions {
        min_rest_hours: 12,
        ..DetectOptions::default()
    });
    let plan = reconciler.propose_swaps(&conflicts, SwapOptions::default());

    let report = prepare_report(&schedule, &conflicts, Some(&plan), &Reasons).unwrap();
    assert_eq!(report.conflicts, ["Alice: away", "Bob: rest after #0"]);
    assert_eq!(report.swaps, ["Alice <- Carol"]);
    assert_eq!(report.missing, ["Bob stuck"]);
}
