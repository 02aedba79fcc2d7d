#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use rotacheck::{
    io,
    model::Window,
    reconcile::{DetectOptions, Reconciler, RestScope, SwapOptions},
    report::{prepare_report, report_rows, TextReport},
    source::{CsvSource, JsonSource, Snapshot, Source},
};
use std::path::Path;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Vérifie une rotation d'astreinte contre les absences d'agenda
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Rotation : CSV `person_id,person_name,start,end[,contact]` ou snapshot JSON
    #[arg(long, global = true, default_value = "schedule.csv")]
    schedule: String,

    /// Événements d'agenda : CSV `owner,title,start,end`
    #[arg(long, global = true)]
    calendars: Option<String>,

    /// Mot qui marque un événement d'absence
    #[arg(long, global = true, default_value = io::DEFAULT_OOO_MARKER)]
    marker: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Début de la fenêtre (YYYY-MM-DD) ; toute la rotation si absent
    #[arg(long)]
    start: Option<String>,
    /// Nombre de jours analysés à partir de `start`
    #[arg(long, default_value_t = 30)]
    days: u32,
    /// Repos minimal entre deux shifts, en jours (0 pour désactiver)
    #[arg(long, default_value_t = 3)]
    between_days: u32,
    /// Limite la règle de repos aux shifts de la même personne
    #[arg(long)]
    same_person: bool,
    /// Export CSV des conflits (optionnel)
    #[arg(long)]
    report: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lister les shifts intenables
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },

    /// Détecter les conflits et proposer des échanges
    Swaps {
        #[command(flatten)]
        args: CheckArgs,
        /// Exige que la personne en conflit puisse tenir le shift reçu
        #[arg(long)]
        reciprocal: bool,
        /// Export JSON des propositions (optionnel)
        #[arg(long)]
        out_json: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match &cli.cmd {
        Commands::Check { args } => {
            let snapshot = load(&cli, args)?;
            let reconciler = Reconciler::new(&snapshot.schedule, &snapshot.calendars);
            let conflicts = reconciler.detect_conflicts(detect_options(args));

            if let Some(path) = &args.report {
                let rows = report_rows(&snapshot.schedule, &conflicts, None)?;
                io::export_report_csv(path, &rows)?;
            }

            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                let report = prepare_report(&snapshot.schedule, &conflicts, None, &TextReport)?;
                println!("Conflict (slot : user)");
                for line in &report.conflicts {
                    println!("{line}");
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Swaps {
            args,
            reciprocal,
            out_json,
        } => {
            let snapshot = load(&cli, args)?;
            let reconciler = Reconciler::new(&snapshot.schedule, &snapshot.calendars);
            let conflicts = reconciler.detect_conflicts(detect_options(args));
            let plan = reconciler.propose_swaps(
                &conflicts,
                SwapOptions {
                    reciprocal: *reciprocal,
                },
            );

            let rows = report_rows(&snapshot.schedule, &conflicts, Some(&plan))?;
            if let Some(path) = &args.report {
                io::export_report_csv(path, &rows)?;
            }
            if let Some(path) = out_json {
                io::export_json(path, &rows)?;
            }

            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                let report =
                    prepare_report(&snapshot.schedule, &conflicts, Some(&plan), &TextReport)?;
                println!("Potential Swaps (slot - user -> slot - user)");
                for line in &report.swaps {
                    println!("{line}");
                }
                for line in &report.missing {
                    eprintln!("{line}");
                }
                if plan.is_complete() {
                    0
                } else {
                    2
                }
            }
        }
    };

    std::process::exit(code);
}

fn detect_options(args: &CheckArgs) -> DetectOptions {
    let mut opts = DetectOptions::with_rest_days(args.between_days);
    if args.same_person {
        opts.rest_scope = RestScope::SamePerson;
    }
    opts
}

fn load(cli: &Cli, args: &CheckArgs) -> Result<Snapshot> {
    let is_json = Path::new(&cli.schedule)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let mut snapshot = if is_json {
        if cli.calendars.is_some() {
            bail!("--calendars only applies to a CSV schedule");
        }
        JsonSource::open(&cli.schedule).load()?
    } else {
        let mut source = CsvSource::open(&cli.schedule).with_marker(cli.marker.as_str());
        if let Some(path) = &cli.calendars {
            source = source.with_calendars(path);
        }
        source.load()?
    };

    if let Some(raw) = &args.start {
        let start = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid --start date: {raw}"))?;
        if start < Utc::now().date_naive() {
            bail!("sorry you cannot re-write the past");
        }
        let window = Window {
            start,
            days: args.days,
            between_days: args.between_days,
        };
        snapshot
            .restrict_to(&window)
            .with_context(|| format!("invalid window starting {start}"))?;
    }

    Ok(snapshot)
}
