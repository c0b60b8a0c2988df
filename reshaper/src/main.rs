//! Reshaper CLI - build the yeast model CSV
//!
//! ```bash
//! reshaper transform                                   # raw-values.csv -> yeast-model.csv
//! reshaper transform raw-values.csv ../src/data/yeast-model.csv
//! reshaper transform --order row-major --report run.json
//! reshaper inspect raw-values.csv                      # print the parsed table shape
//! ```
//!
//! Relative paths are resolved against the executable's directory unless
//! `--base-dir` is given.

use clap::{Parser, Subcommand, ValueEnum};
use reshaper::logs::{self, log_error, log_success};
use reshaper::paths::{executable_dir, resolve_against, DEFAULT_INPUT, DEFAULT_OUTPUT};
use reshaper::{
    parse_wide_file, transform_file, ReshapeError, ReshapeOptions, ReshapeResult, ReshapeSummary,
    RowOrder, RunReport,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "reshaper")]
#[command(about = "Unpivot the raw yeast values table into the yeast model CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reshape the wide raw values table into the long yeast model
    Transform {
        /// Input CSV with three header rows and two index columns
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output CSV (replaced if it exists)
        #[arg(default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Directory relative paths are resolved against (default: executable directory)
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Output row order (overrides the options file)
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// JSON file with pipeline options
        #[arg(long)]
        options: Option<PathBuf>,

        /// Write a JSON run report (summary and log) to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Don't print progress to stderr
        #[arg(short, long)]
        quiet: bool,
    },

    /// Parse a raw values table and print its shape as JSON
    Inspect {
        /// Input CSV
        input: PathBuf,

        /// Directory relative paths are resolved against (default: executable directory)
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    ColumnMajor,
    RowMajor,
}

impl From<OrderArg> for RowOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::ColumnMajor => RowOrder::ColumnMajor,
            OrderArg::RowMajor => RowOrder::RowMajor,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Transform {
            input,
            output,
            base_dir,
            order,
            options,
            report,
            quiet,
        } => cmd_transform(
            &input,
            &output,
            base_dir.as_deref(),
            order,
            options.as_deref(),
            report.as_deref(),
            quiet,
        ),

        Commands::Inspect {
            input,
            base_dir,
            delimiter,
        } => cmd_inspect(&input, base_dir.as_deref(), delimiter),
    };

    if let Err(e) = result {
        std::process::exit(i32::from(e.exit_code()));
    }
}

/// Log a command failure before it is turned into an exit code.
fn logged(e: ReshapeError) -> ReshapeError {
    log_error(format!("Error: {e}"));
    e
}

fn cmd_transform(
    input: &Path,
    output: &Path,
    base_dir: Option<&Path>,
    order: Option<OrderArg>,
    options_path: Option<&Path>,
    report: Option<&Path>,
    quiet: bool,
) -> ReshapeResult<()> {
    logs::set_quiet(quiet);
    let base = resolve_base(base_dir).map_err(logged)?;

    let outcome = run_transform(&base, input, output, order, options_path).map_err(logged);

    if let Some(report) = report {
        let report = resolve_against(&base, report);
        RunReport::new(&outcome, logs::LOGGER.history())
            .write(&report)
            .map_err(logged)?;
        log_success(format!("Report written to {}", report.display()));
    }

    outcome.map(|_| ())
}

fn run_transform(
    base: &Path,
    input: &Path,
    output: &Path,
    order: Option<OrderArg>,
    options_path: Option<&Path>,
) -> ReshapeResult<ReshapeSummary> {
    let mut options = match options_path {
        Some(p) => ReshapeOptions::from_json_file(&resolve_against(base, p))?,
        None => ReshapeOptions::default(),
    };
    if let Some(order) = order {
        options.order = order.into();
    }

    let input = resolve_against(base, input);
    let output = resolve_against(base, output);
    let summary = transform_file(&input, &output, &options)?;
    log_success(format!(
        "{} rows × {} columns → {} records ({} missing)",
        summary.rows, summary.columns, summary.records, summary.missing_cells
    ));
    Ok(summary)
}

fn cmd_inspect(input: &Path, base_dir: Option<&Path>, delimiter: char) -> ReshapeResult<()> {
    logs::set_quiet(true);
    inspect(input, base_dir, delimiter).map_err(logged)
}

fn inspect(input: &Path, base_dir: Option<&Path>, delimiter: char) -> ReshapeResult<()> {
    let base = resolve_base(base_dir)?;
    let options = ReshapeOptions {
        delimiter,
        ..ReshapeOptions::default()
    };

    let table = parse_wide_file(resolve_against(&base, input), options.delimiter_byte()?)?;
    println!("{}", serde_json::to_string_pretty(&table.overview())?);
    Ok(())
}

fn resolve_base(base_dir: Option<&Path>) -> ReshapeResult<PathBuf> {
    match base_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(executable_dir()?),
    }
}
