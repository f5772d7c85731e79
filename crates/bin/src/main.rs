//! salesfeat CLI binary.
//!
//! Computes the sales feature table for a date range and writes it to disk.

use clap::{Parser, ValueEnum};
use salesfeat::data::InputPaths;
use salesfeat::features::{DateRange, JoinPolicy};
use salesfeat::output::{ExportFormat, Exporter};
use salesfeat::{FeaturePipeline, PipelineConfig};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "salesfeat")]
#[command(about = "Generate product, brand and store sales features", long_about = None)]
#[command(version)]
struct Cli {
    /// Start date of the date range
    #[arg(long, default_value = "2021-01-08")]
    min_date: String,

    /// End date of the date range
    #[arg(long, default_value = "2021-05-30")]
    max_date: String,

    /// Directory holding brand.csv, product.csv, store.csv and sales.csv
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Brand table (overrides --data-dir)
    #[arg(long)]
    brand: Option<PathBuf>,

    /// Product table (overrides --data-dir)
    #[arg(long)]
    product: Option<PathBuf>,

    /// Store table (overrides --data-dir)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Sales table (overrides --data-dir)
    #[arg(long)]
    sales: Option<PathBuf>,

    /// Output file
    #[arg(long, short, default_value = "features.csv")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Handling of sales rows without a matching product, store or brand
    #[arg(long, value_enum, default_value_t = Policy::DropAndLog)]
    join_policy: Policy,

    /// Run summary printed after a successful run
    #[arg(long, value_enum, default_value_t = Summary::Text)]
    summary: Summary,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    DropAndLog,
    DropSilently,
    FailOnMismatch,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Summary {
    Text,
    Json,
    None,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::Json,
        }
    }
}

impl From<Policy> for JoinPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::DropAndLog => Self::DropAndLog,
            Policy::DropSilently => Self::DropSilently,
            Policy::FailOnMismatch => Self::FailOnMismatch,
        }
    }
}

impl Cli {
    fn input_paths(&self) -> InputPaths {
        let mut paths = InputPaths::in_dir(&self.data_dir);
        if let Some(brand) = &self.brand {
            paths = paths.with_brand(brand);
        }
        if let Some(product) = &self.product {
            paths = paths.with_product(product);
        }
        if let Some(store) = &self.store {
            paths = paths.with_store(store);
        }
        if let Some(sales) = &self.sales {
            paths = paths.with_sales(sales);
        }
        paths
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = PipelineConfig::default()
        .with_date_range(DateRange::parse(&cli.min_date, &cli.max_date)?)
        .with_join_policy(cli.join_policy.into());
    debug!(?config, output = %cli.output.display(), "starting run");
    let pipeline = FeaturePipeline::new(config);

    let summary = pipeline.run_to_file(&cli.input_paths(), &cli.output, cli.format.into())?;

    match cli.summary {
        Summary::Text => println!("{}", summary),
        Summary::Json => println!("{}", summary.export_to_string(ExportFormat::PrettyJson)?),
        Summary::None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["salesfeat"]);
        assert_eq!(cli.min_date, "2021-01-08");
        assert_eq!(cli.max_date, "2021-05-30");
        assert_eq!(cli.output, PathBuf::from("features.csv"));
        assert_eq!(cli.input_paths(), InputPaths::in_dir("."));
        assert_eq!(JoinPolicy::from(cli.join_policy), JoinPolicy::DropAndLog);
    }

    #[test]
    fn test_table_overrides() {
        let cli = Cli::parse_from([
            "salesfeat",
            "--data-dir",
            "/data",
            "--sales",
            "/archive/sales.csv",
            "--min-date",
            "2021-02-01",
            "--join-policy",
            "fail-on-mismatch",
        ]);
        let paths = cli.input_paths();
        assert_eq!(paths.sales, PathBuf::from("/archive/sales.csv"));
        assert_eq!(paths.brand, PathBuf::from("/data/brand.csv"));
        assert_eq!(cli.min_date, "2021-02-01");
        assert_eq!(JoinPolicy::from(cli.join_policy), JoinPolicy::FailOnMismatch);
    }
}
