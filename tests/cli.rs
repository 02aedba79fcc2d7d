#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SCHEDULE: &str = "\
person_id,person_name,start,end
P1,Alice,2019-01-02T00:00:00Z,2019-01-02T08:00:00Z
P2,Bob,2019-01-02T08:00:00Z,2019-01-02T16:00:00Z
P3,Carol,2019-01-03T00:00:00Z,2019-01-03T08:00:00Z
";

const CALENDARS: &str = "\
owner,title,start,end
P1,Out sick,2019-01-02,2019-01-03
P2,OOO - out,2019-01-02T10:00:00Z,2019-01-02T12:00:00Z
";

fn fixtures(dir: &Path) -> (String, String) {
    let schedule = dir.join("schedule.csv");
    let calendars = dir.join("calendars.csv");
    fs::write(&schedule, SCHEDULE).unwrap();
    fs::write(&calendars, CALENDARS).unwrap();
    (
        schedule.display().to_string(),
        calendars.display().to_string(),
    )
}

fn cli() -> Command {
    Command::cargo_bin("rotacheck-cli").unwrap()
}

#[test]
fn check_reports_conflicts_with_warning_code() {
    let dir = tempdir().unwrap();
    let (schedule, calendars) = fixtures(dir.path());
    let report = dir.path().join("conflicts.csv");

    cli()
        .args(["--schedule", &schedule, "--calendars", &calendars])
        .args(["check", "--between-days", "0"])
        .arg("--report")
        .arg(&report)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Conflict (slot : user)"))
        .stdout(predicate::str::contains(
            "2019-01-02T00:00:00Z to 2019-01-02T08:00:00Z : Alice",
        ))
        .stdout(predicate::str::contains(
            "2019-01-02T08:00:00Z to 2019-01-02T16:00:00Z : Bob",
        ));

    let written = fs::read_to_string(&report).unwrap();
    assert_eq!(written.lines().count(), 3);
}

#[test]
fn check_without_calendars_is_clean() {
    let dir = tempdir().unwrap();
    let (schedule, _) = fixtures(dir.path());

    cli()
        .args(["--schedule", &schedule, "check", "--between-days", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));
}

#[test]
fn swaps_prints_proposals_and_misses() {
    let dir = tempdir().unwrap();
    let (schedule, calendars) = fixtures(dir.path());
    let out_json = dir.path().join("swaps.json");

    cli()
        .args(["--schedule", &schedule, "--calendars", &calendars])
        .args(["swaps", "--between-days", "0"])
        .arg("--out-json")
        .arg(&out_json)
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "2019-01-02T00:00:00Z - 2019-01-02T08:00:00Z - Alice -> 2019-01-03T00:00:00Z - 2019-01-03T08:00:00Z - Carol",
        ))
        .stderr(predicate::str::contains(
            "==> SWAP NOT FOUND FOR 2019-01-02T08:00:00Z - 2019-01-02T16:00:00Z - Bob <==",
        ));

    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_json).unwrap()).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["reason"], "unavailable");
    assert_eq!(rows[0]["swap"]["person_name"], "Carol");
    assert!(rows[1].get("swap").is_none());
}

#[test]
fn marker_selects_which_events_count() {
    let dir = tempdir().unwrap();
    let (schedule, calendars) = fixtures(dir.path());

    cli()
        .args(["--schedule", &schedule, "--calendars", &calendars])
        .args(["--marker", "vacation", "check", "--between-days", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));
}

#[test]
fn past_start_is_rejected() {
    let dir = tempdir().unwrap();
    let (schedule, _) = fixtures(dir.path());

    cli()
        .args(["--schedule", &schedule, "check", "--start", "2019-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot re-write the past"));
}
