//! CLI entry point for the grade engine.
//!
//! Provides subcommands for classifying numbers, rolling up persisted grades,
//! ranking, converting between grading systems, and grading CSV score sheets.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grade_engine::book::{DEFAULT_BOOK_LIMIT, GradeBook};
use grade_engine::converters::{
    BinaryToPercentConverter, GradeConverter, NumericValueBasedConverter, TextValueBasedConverter,
    ZSystemToFiveStarConverter,
};
use grade_engine::output::{GradeRecord, append_records, read_score_rows};
use grade_engine::systems::DEFAULT_GRADING_SYSTEM;
use grade_engine::{Grade, GradeManager, GradeValue, GradingSystemRegistry, persist};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade_engine")]
#[command(about = "Classify, roll up, rank and convert grades", long_about = None)]
struct Cli {
    /// JSON file with an array of extra grading systems to register
    #[arg(long, global = true, value_name = "FILE")]
    definitions: Option<PathBuf>,

    /// Grading system used when a command is given no --system
    #[arg(long, global = true, env = "GRADE_DEFAULT_SYSTEM")]
    default_system: Option<String>,

    /// Maximum number of grades the in-memory book will hold
    #[arg(long, global = true, env = "GRADE_BOOK_LIMIT", default_value_t = DEFAULT_BOOK_LIMIT)]
    book_limit: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single number
    Grade {
        #[arg(allow_negative_numbers = true)]
        value: Decimal,

        #[arg(short, long)]
        system: Option<String>,
    },
    /// Classify the mean of several numbers
    Average {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<Decimal>,

        #[arg(short, long)]
        system: Option<String>,
    },
    /// Classify the (weighted) average of grades stored in a JSON file
    Rollup {
        #[arg(value_name = "GRADES_JSON")]
        grades: PathBuf,

        #[arg(short, long)]
        system: Option<String>,

        /// Use each grade's weight
        #[arg(short, long, default_value_t = false)]
        weighted: bool,
    },
    /// Print dense ranks for grades stored in a JSON file
    Rank {
        #[arg(value_name = "GRADES_JSON")]
        grades: PathBuf,

        #[arg(long, default_value_t = false)]
        low_to_high: bool,
    },
    /// Print label counts, highest label first
    Distribution {
        #[arg(value_name = "GRADES_JSON")]
        grades: PathBuf,
    },
    /// Convert a value from one grading system to another
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: Decimal,

        label: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long, value_enum, default_value_t = Strategy::Numeric)]
        strategy: Strategy,
    },
    /// List registered grading systems, optionally exporting them as JSON
    Systems {
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
    /// Grade each `id,score[,weight]` row of a CSV file and append the results
    ScoreCsv {
        #[arg(value_name = "INPUT_CSV")]
        input: PathBuf,

        #[arg(short, long)]
        system: Option<String>,

        /// CSV file to append results to
        #[arg(short, long, default_value = "grades.csv")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Numeric,
    Text,
    Binary,
    ZFiveStar,
}

impl Strategy {
    fn converter(self) -> Arc<dyn GradeConverter> {
        match self {
            Strategy::Numeric => Arc::new(NumericValueBasedConverter),
            Strategy::Text => Arc::new(TextValueBasedConverter),
            Strategy::Binary => Arc::new(BinaryToPercentConverter),
            Strategy::ZFiveStar => Arc::new(ZSystemToFiveStarConverter),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/grade_engine.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_engine.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let manager = build_manager(&cli)?;

    match cli.command {
        Commands::Grade { value, system } => {
            let graded = match system {
                Some(id) => manager.grade_with(value, &id)?,
                None => manager.grade(value)?,
            };
            print_value(&graded)?;
        }
        Commands::Average { values, system } => {
            let graded = match system {
                Some(id) => manager.grade_average_with(&values, &id)?,
                None => manager.grade_average(&values)?,
            };
            print_value(&graded)?;
        }
        Commands::Rollup {
            grades,
            system,
            weighted,
        } => {
            let grades = load_grades(&grades)?;
            let graded = rollup(&manager, &grades, system.as_deref(), weighted)?;
            print_value(&graded)?;
        }
        Commands::Rank {
            grades,
            low_to_high,
        } => {
            let grades = load_grades(&grades)?;
            let ranked = if low_to_high {
                manager.rank_low_to_high(&grades)
            } else {
                manager.rank_hi_to_low(&grades)
            };
            for entry in &ranked {
                println!(
                    "{}\t{}\t{}\t{}",
                    entry.rank,
                    entry.grade.id(),
                    entry.grade.numeric_value(),
                    entry.grade.text_value()
                );
            }
        }
        Commands::Distribution { grades } => {
            let grades = load_grades(&grades)?;
            for (label, count) in manager.distribution(&grades) {
                println!("{label}\t{count}");
            }
        }
        Commands::Convert {
            value,
            label,
            from,
            to,
            strategy,
        } => {
            manager.register_converter(from.clone(), to.clone(), strategy.converter());
            let source = GradeValue::new(value, label, from);
            let converted = manager
                .convert(&source, &to)
                .with_context(|| format!("converting into {to}"))?;
            print_value(&converted)?;
        }
        Commands::Systems { export } => {
            list_systems(manager.registry(), export.as_deref())?;
        }
        Commands::ScoreCsv {
            input,
            system,
            output,
        } => {
            score_csv(&manager, &input, system.as_deref(), &output)?;
        }
    }

    Ok(())
}

/// Builds the grading context from global flags and environment.
#[tracing::instrument(skip(cli), fields(definitions = ?cli.definitions, default_system = ?cli.default_system))]
fn build_manager(cli: &Cli) -> Result<GradeManager> {
    let management = BTreeMap::from([(
        "recordedBy".to_string(),
        Value::from(env!("CARGO_PKG_NAME")),
    )]);
    let book = GradeBook::with_limit("cli", cli.book_limit);
    let mut manager =
        GradeManager::with_parts(Arc::new(GradingSystemRegistry::new()), book, management)?;

    if !manager.load_bundled_grading_systems() {
        warn!("Continuing without some bundled grading systems");
    }

    if let Some(path) = &cli.definitions {
        let systems = persist::load_grading_systems(path)
            .with_context(|| format!("loading grading systems from {}", path.display()))?;
        info!(count = systems.len(), path = %path.display(), "Registering extra grading systems");
        for system in systems {
            manager.register_system(system.id().to_string(), Arc::new(system));
        }
    }

    if let Some(id) = &cli.default_system {
        manager
            .set_default_system_id(id)
            .with_context(|| format!("setting default grading system {id}"))?;
    }

    Ok(manager)
}

fn load_grades(path: &Path) -> Result<Vec<Grade>> {
    persist::load_grades(path).with_context(|| format!("loading grades from {}", path.display()))
}

fn rollup(
    manager: &GradeManager,
    grades: &[Grade],
    system: Option<&str>,
    weighted: bool,
) -> Result<GradeValue> {
    let graded = if weighted {
        match system {
            Some(id) => manager.grade_weighted_rollup_with(grades, id)?,
            None => manager.grade_weighted_rollup(grades)?,
        }
    } else {
        let values: Vec<GradeValue> = grades.iter().map(|g| g.value().clone()).collect();
        match system {
            Some(id) => manager.grade_rollup_with(&values, id)?,
            None => manager.grade_rollup(&values)?,
        }
    };
    Ok(graded)
}

fn print_value(value: &GradeValue) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list_systems(registry: &GradingSystemRegistry, export: Option<&Path>) -> Result<()> {
    let systems: Vec<_> = registry
        .system_ids()
        .into_iter()
        .filter(|id| id != DEFAULT_GRADING_SYSTEM)
        .filter_map(|id| registry.lookup_system(&id))
        .collect();

    for system in &systems {
        println!(
            "{}\t{}\t{} ranges\t{}",
            system.id(),
            system.system_type(),
            system.range_count(),
            system.description()
        );
    }

    if let Some(path) = export {
        let owned: Vec<_> = systems.iter().map(|s| (**s).clone()).collect();
        persist::save_grading_systems(path, &owned)
            .with_context(|| format!("exporting grading systems to {}", path.display()))?;
        info!(count = owned.len(), path = %path.display(), "Exported grading systems");
    }
    Ok(())
}

/// Grades every row of `input`, records the grades and appends them to `output`.
#[tracing::instrument(skip(manager, input, output), fields(input = %input.display(), output = %output.display()))]
fn score_csv(
    manager: &GradeManager,
    input: &Path,
    system: Option<&str>,
    output: &Path,
) -> Result<()> {
    let rows = read_score_rows(input)
        .with_context(|| format!("reading scores from {}", input.display()))?;

    let mut records = Vec::with_capacity(rows.len());
    let mut grades = Vec::with_capacity(rows.len());
    for row in rows {
        let graded = match system {
            Some(id) => manager.grade_with(row.score, id),
            None => manager.grade(row.score),
        };
        let graded = match graded {
            Ok(graded) => graded,
            Err(e) => {
                warn!(id = %row.id, score = %row.score, error = %e, "Skipping ungradable row");
                continue;
            }
        };
        grades.push(
            Grade::builder()
                .id(row.id.clone())
                .grade_type("score")
                .grade_value(&graded)
                .weight(row.weight)
                .build()?,
        );
        records.push(GradeRecord::new(row.id, &graded, row.weight));
    }

    manager.record_all(grades)?;
    append_records(output, &records)?;

    let weighted = manager.grade_weighted_rollup_with(
        &manager.find_all(),
        system.unwrap_or(DEFAULT_GRADING_SYSTEM),
    );
    match weighted {
        Ok(overall) => info!(
            rows = records.len(),
            overall = %overall.numeric_value(),
            label = overall.text_value(),
            "Scored CSV"
        ),
        Err(e) => warn!(rows = records.len(), error = %e, "Scored CSV without an overall grade"),
    }
    Ok(())
}
