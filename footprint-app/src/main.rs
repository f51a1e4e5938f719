use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use footprint_schemas::{range::FieldId, result::MassUnit};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::FootprintConfig;
use crate::store::{CalculationStore, CsvHistoryStore};
use crate::workflow::{EstimateOptions, EstimateOutcome};

mod config;
mod plotting;
mod store;
mod workflow;

#[derive(Parser)]
#[command(name = "footprint", version, about = "Estimate a personal carbon footprint")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Factor override file, or a directory of them.
    #[arg(long, global = true)]
    factors: Option<PathBuf>,

    /// Plausibility range override file, or a directory of them.
    #[arg(long, global = true)]
    ranges: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a form and calculate its annual footprint.
    Estimate {
        /// YAML form snapshot.
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = UnitArg::Kg)]
        unit: UnitArg,

        /// Continue past validation warnings and errors.
        #[arg(long)]
        acknowledge: bool,

        /// Replace a field with its statistical average before validating.
        #[arg(long = "use-average", value_name = "FIELD")]
        use_average: Vec<FieldId>,

        #[arg(long)]
        user: Option<String>,

        /// Append the calculation to this CSV history file.
        #[arg(long)]
        history: Option<PathBuf>,

        /// Save a breakdown bar chart to this PNG file.
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Check a form against the plausibility ranges only.
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// List the emission factors and plausibility ranges in effect.
    Factors,
    /// Show past calculations from a CSV history file.
    History { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Kg,
    T,
}

impl From<UnitArg> for MassUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Kg => MassUnit::Kilograms,
            UnitArg::T => MassUnit::Tonnes,
        }
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    println!("--- Footprint Calculator ---");
    let config = FootprintConfig::load(cli.factors.as_deref(), cli.ranges.as_deref())?;

    match cli.command {
        Command::Estimate {
            input,
            unit,
            acknowledge,
            use_average,
            user,
            history,
            chart,
        } => {
            let form = config::load_form(&input)?;
            let options = EstimateOptions {
                unit: unit.into(),
                acknowledge,
                use_average,
                user_id: user,
                chart,
            };

            let mut history_store = history.map(CsvHistoryStore::new);
            let store = history_store
                .as_mut()
                .map(|s| s as &mut dyn CalculationStore);

            match workflow::run_estimate(&form, &config, &options, store)? {
                EstimateOutcome::Completed { .. } => {
                    if let Some(s) = &history_store {
                        println!("\nHistory updated: {:?}", s.path());
                    }
                }
                EstimateOutcome::Blocked(report) => {
                    bail!(
                        "Calculation blocked by {} validation issue(s); fix the values, pass --use-average FIELD, or rerun with --acknowledge",
                        report.issues.len()
                    );
                }
            }
        }
        Command::Validate { input } => {
            let form = config::load_form(&input)?;
            let report = workflow::run_validate(&form, &config);
            if report.has_errors() {
                bail!("{} value(s) exceed realistic bounds", report.errors().count());
            }
        }
        Command::Factors => {
            workflow::print_factor_table(&config.factors);
            workflow::print_range_table(&config.ranges);
        }
        Command::History { path } => {
            let records = CsvHistoryStore::new(path).records()?;
            workflow::print_history(&records);
        }
    }

    Ok(())
}
