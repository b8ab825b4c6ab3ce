//! # Estimate CLI
//!
//! Command-line front end for the construction estimator. Loads the
//! configuration, a project (or bare inputs) file and the material price
//! table, runs the calculator stages and prints the results.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use estimate_core::advisory::{AdvisoryContext, Specialist};
use estimate_core::calculations::GrayStructureOverrides;
use estimate_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use estimate_core::file_io::{load_project_or_inputs, report_path_for, save_report};
use estimate_core::pipeline::{Estimator, RunReport, Stage, StageStatus};
use estimate_core::prices::PriceTable;
use estimate_core::project::Project;
use estimate_core::summary::Summary;

#[derive(Debug, Parser)]
#[command(
    name = "estimate",
    about = "Residential construction quantity and cost estimator",
    after_help = concat!(
        "Examples:\n",
        "  estimate run house.json\n",
        "  estimate summary house.json --stage labour\n",
        "  estimate context house.json --specialist steel",
    )
)]
struct Cli {
    /// Config file (default: ./estimate.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Material price table, overrides config
    #[arg(long, global = true)]
    prices: Option<PathBuf>,

    /// Currency label for the summary, overrides config
    #[arg(long, global = true)]
    currency: Option<String>,

    /// trace|debug|info|warn|error, overrides config
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the estimate, save a report and print the summary
    Run {
        project: PathBuf,

        /// Report path (default: <project>.report.json)
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        selection: StageSelection,

        #[command(flatten)]
        gray: GrayArgs,
    },
    /// Print the cost summary without writing a report
    Summary {
        project: PathBuf,

        #[command(flatten)]
        selection: StageSelection,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the advisory context for the whole project or one specialist
    Context {
        project: PathBuf,

        #[arg(long, value_enum)]
        specialist: Option<SpecialistArg>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, clap::Args)]
struct StageSelection {
    /// Stages to run, with their dependencies (default: all)
    #[arg(long = "stage", value_enum)]
    stages: Vec<StageArg>,
}

impl StageSelection {
    fn stages(&self) -> Vec<Stage> {
        if self.stages.is_empty() {
            Stage::ALL.to_vec()
        } else {
            self.stages.iter().map(|s| s.stage()).collect()
        }
    }
}

/// Gray-structure values that replace the project's for this run only
#[derive(Debug, clap::Args)]
struct GrayArgs {
    #[arg(long)]
    gray_floors: Option<u32>,
    #[arg(long)]
    gray_rooms: Option<u32>,
    #[arg(long)]
    gray_columns: Option<u32>,
    #[arg(long)]
    gray_room_sizes: Option<String>,
}

impl GrayArgs {
    fn overrides(&self) -> GrayStructureOverrides {
        GrayStructureOverrides {
            number_of_floors: self.gray_floors,
            number_of_rooms: self.gray_rooms,
            number_of_columns: self.gray_columns,
            room_sizes: self.gray_room_sizes.clone(),
            ..GrayStructureOverrides::default()
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StageArg {
    GrayStructure,
    Steel,
    Plumbing,
    Paint,
    Electrical,
    DoorsWindows,
    Labour,
}

impl StageArg {
    fn stage(self) -> Stage {
        match self {
            StageArg::GrayStructure => Stage::GrayStructure,
            StageArg::Steel => Stage::Steel,
            StageArg::Plumbing => Stage::Plumbing,
            StageArg::Paint => Stage::Paint,
            StageArg::Electrical => Stage::Electrical,
            StageArg::DoorsWindows => Stage::DoorsWindows,
            StageArg::Labour => Stage::Labour,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpecialistArg {
    GrayStructure,
    DoorsWindows,
    Electrical,
    Plumbing,
    Labour,
    Steel,
    Paint,
}

impl SpecialistArg {
    fn specialist(self) -> Specialist {
        match self {
            SpecialistArg::GrayStructure => Specialist::GrayStructure,
            SpecialistArg::DoorsWindows => Specialist::DoorsWindows,
            SpecialistArg::Electrical => Specialist::Electrical,
            SpecialistArg::Plumbing => Specialist::Plumbing,
            SpecialistArg::Labour => Specialist::Labour,
            SpecialistArg::Steel => Specialist::Steel,
            SpecialistArg::Paint => Specialist::Paint,
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides {
            prices_path: cli.prices.clone(),
            currency: cli.currency.clone(),
            log_level: cli.log_level.clone(),
        },
    };
    AppConfig::load(options).context("failed to load configuration")
}

fn estimate(
    config: &AppConfig,
    project_path: &Path,
    stages: &[Stage],
    overrides: GrayStructureOverrides,
) -> Result<(Project, RunReport)> {
    let prices = PriceTable::load(&config.prices.path)
        .with_context(|| format!("failed to load price table {}", config.prices.path.display()))?;
    let mut project = load_project_or_inputs(project_path)
        .with_context(|| format!("failed to load project {}", project_path.display()))?;

    let report = Estimator::new(&prices)
        .with_overrides(overrides)
        .run_stages(&mut project, stages)?;
    Ok((project, report))
}

fn print_failures(report: &RunReport) {
    for stage in report.failed() {
        if let StageStatus::Failed(failure) = &stage.status {
            eprintln!("warning: {} failed: {} ({})", stage.stage, failure.error, failure.code);
        }
    }
}

fn execute(cli: &Cli, config: &AppConfig) -> Result<()> {
    match &cli.command {
        Command::Run { project, output, selection, gray } => {
            let (estimated, report) =
                estimate(config, project, &selection.stages(), gray.overrides())?;
            print_failures(&report);

            let output = output.clone().unwrap_or_else(|| report_path_for(project));
            save_report(&estimated, &output)?;

            println!("{}", Summary::from_results(&estimated.results, &config.report.currency));
            println!();
            println!("Report written to {}", output.display());
        }
        Command::Summary { project, selection, json } => {
            let (estimated, report) =
                estimate(config, project, &selection.stages(), GrayStructureOverrides::default())?;
            print_failures(&report);

            let summary = Summary::from_results(&estimated.results, &config.report.currency);
            if *json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
        }
        Command::Context { project, specialist } => {
            let (estimated, _) =
                estimate(config, project, &Stage::ALL, GrayStructureOverrides::default())?;
            let summary = Summary::from_results(&estimated.results, &config.report.currency);
            let context = AdvisoryContext::build(&estimated, &summary)?;

            match specialist {
                Some(specialist) => {
                    let value = context.context_for(specialist.specialist());
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                None => println!("{}", context.full_text),
            }
        }
        Command::Config => {
            let rendered =
                toml::to_string_pretty(config).context("failed to render configuration")?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    match execute(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{:#}", err), "estimate failed");
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
