use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use osis_admission::config::AppConfig;
use osis_admission::error::AppError;
use osis_admission::telemetry;
use osis_admission::workflows::admission::validation::ExceptionReport;
use osis_admission::workflows::admission::{DeterminedPool, MultipleBusinessExceptions};
use serde::Serialize;
use tracing::info;

use crate::snapshot::AdmissionSnapshot;

#[derive(Parser, Debug)]
#[command(
    name = "admission-cli",
    about = "Check admission propositions against the eligibility rules and registration calendar",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Determine the admission pool and academic year of a proposition
    Pool(SnapshotArgs),
    /// List every reason preventing the proposition from being submitted
    Verify(SnapshotArgs),
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// JSON snapshot holding the proposition, its trainings and the candidate profile
    #[arg(long)]
    snapshot: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

/// Printed on stdout, whatever the outcome.
#[derive(Debug, Serialize)]
struct Outcome {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pool: Option<DeterminedPool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ExceptionReport>,
}

impl Outcome {
    fn from_result<T>(
        result: Result<T, MultipleBusinessExceptions>,
        pool: impl FnOnce(&T) -> Option<DeterminedPool>,
    ) -> (Self, Option<MultipleBusinessExceptions>) {
        match result {
            Ok(value) => (
                Self {
                    ok: true,
                    pool: pool(&value),
                    errors: Vec::new(),
                },
                None,
            ),
            Err(failure) => (
                Self {
                    ok: false,
                    pool: None,
                    errors: failure.reports(),
                },
                Some(failure),
            ),
        }
    }
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let (outcome, failure) = match cli.command {
        Command::Pool(args) => {
            let (snapshot, today) = load(&args)?;
            let result = snapshot
                .determine_pool(today, &config.engine)
                .map_err(MultipleBusinessExceptions::from);
            Outcome::from_result(result, |pool| Some(*pool))
        }
        Command::Verify(args) => {
            let (snapshot, today) = load(&args)?;
            Outcome::from_result(snapshot.verify(today, &config.engine), |_| None)
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    match failure {
        Some(failure) => Err(AppError::Business(failure)),
        None => Ok(()),
    }
}

fn load(args: &SnapshotArgs) -> Result<(AdmissionSnapshot, NaiveDate), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let snapshot = AdmissionSnapshot::load(&args.snapshot)?;
    info!(
        proposition = %snapshot.proposition.id,
        formation = %snapshot.proposition.formation,
        %today,
        "evaluating snapshot"
    );
    Ok((snapshot, today))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
