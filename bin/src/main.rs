//! CLI for the pit-factors library.
//!
//! This binary lists and describes the registered factors, checks futures
//! contracts against the delivery-month table, and computes every factor for
//! one date from a long-format CSV file.

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use pit_factors::{
    ChainPredicates, DataFrequency, FactorCategory, FactorInfo, FactorRegistry, FrameLoader,
    Standardization, standardize_frame, winsorize_frame,
};
use polars::prelude::{CsvWriter, SerWriter};
use std::{collections::BTreeMap, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pit-factors")]
#[command(about = "Point-in-time factor library for quantitative finance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all available factors
    List,
    /// Show information about a specific factor
    Info {
        /// Factor name
        factor: String,
    },
    /// Check whether a futures contract belongs in its continuous chain
    Eligible {
        /// Root symbol, e.g. `M`
        root: String,
        /// Contract symbol, e.g. `M2109.XDCE`
        contract: String,
        /// JSON table of root symbols to allowed two-digit months
        #[arg(long)]
        predicates: Option<PathBuf>,
    },
    /// Compute factors for one date from a long-format CSV file, printing CSV
    Compute {
        /// CSV with `symbol`, `date` and one column per field
        #[arg(long)]
        csv: PathBuf,
        /// Evaluation date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Only compute these factors
        #[arg(long, value_delimiter = ',')]
        factors: Vec<String>,
        /// Clip every factor column to its PCT and 1-PCT quantiles
        #[arg(long, value_name = "PCT")]
        winsorize: Option<f64>,
        /// Standardize every factor column, after winsorizing
        #[arg(long, value_enum)]
        standardize: Option<Method>,
    },
}

/// Cross-sectional standardization method
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Method {
    /// Mean and standard deviation
    Zscore,
    /// Median and median absolute deviation
    Robust,
}

impl From<Method> for Standardization {
    fn from(method: Method) -> Self {
        match method {
            Method::Zscore => Self::ZScore,
            Method::Robust => Self::Robust,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("pit_factors=info".parse()?)
                .add_directive("polars=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = FactorRegistry::with_defaults();

    match cli.command {
        Commands::List => list_factors(&registry),
        Commands::Info { factor } => show_factor_info(&registry, &factor)?,
        Commands::Eligible {
            root,
            contract,
            predicates,
        } => check_eligible(&root, &contract, predicates)?,
        Commands::Compute {
            csv,
            date,
            factors,
            winsorize,
            standardize,
        } => compute(registry, csv, date, &factors, winsorize, standardize)?,
    }
    Ok(())
}

/// List all available factors grouped by category.
fn list_factors(registry: &FactorRegistry) {
    let mut by_category: BTreeMap<FactorCategory, Vec<FactorInfo>> = BTreeMap::new();
    for info in registry.all_info() {
        by_category.entry(info.category).or_default().push(info);
    }

    println!("Available Factors ({} total)\n", registry.len());

    for (category, factors) in by_category {
        println!("{category}:");
        for info in factors {
            println!("  {} - {}", info.name, info.description);
        }
        println!();
    }
}

/// Show detailed information about a specific factor.
fn show_factor_info(registry: &FactorRegistry, factor_name: &str) -> anyhow::Result<()> {
    let Some(info) = registry.info(factor_name) else {
        eprintln!("Available factors:");
        for name in registry.names() {
            eprintln!("  {name}");
        }
        bail!("factor '{factor_name}' not found");
    };

    println!("Factor: {}", info.name);
    println!("Category: {}", info.category);
    println!("Description: {}", info.description);
    println!("Frequency: {}", frequency_description(info.frequency));
    println!("Window: {} trading days", info.window_length);
    println!("Missing value: {}", info.missing_value);
    println!("Window safe: {}", info.window_safe);
    println!("Inputs:");
    for column in &info.inputs {
        println!("  - {column}");
    }
    Ok(())
}

fn check_eligible(root: &str, contract: &str, table: Option<PathBuf>) -> anyhow::Result<()> {
    let predicates = match table {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            ChainPredicates::from_json(&json)?
        }
        None => ChainPredicates::with_defaults(),
    };

    let eligible = predicates.is_eligible(root, contract)?;
    match predicates.months(root) {
        Some(months) => {
            let months: Vec<String> = months.iter().map(ToString::to_string).collect();
            println!("{root} delivers in [{}]", months.join(", "));
        }
        None => println!("{root} has no delivery-month rule"),
    }
    println!(
        "{contract}: {}",
        if eligible { "eligible" } else { "not eligible" }
    );
    Ok(())
}

fn compute(
    mut registry: FactorRegistry,
    csv: PathBuf,
    date: NaiveDate,
    factors: &[String],
    winsorize: Option<f64>,
    standardize: Option<Method>,
) -> anyhow::Result<()> {
    if !factors.is_empty() {
        let mut selected = FactorRegistry::new();
        for name in factors {
            let factor = registry
                .remove(name)
                .with_context(|| format!("factor '{name}' not found"))?;
            selected.register(factor);
        }
        registry = selected;
    }

    let loader = FrameLoader::from_csv(&csv)
        .with_context(|| format!("loading {}", csv.display()))?;
    let assets = loader.universe();
    info!(path = %csv.display(), assets = assets.len(), "loaded frame");

    let mut frame = registry.compute_all(&loader, date, &assets)?;
    if let Some(pct) = winsorize {
        frame = winsorize_frame(&frame, pct, 1.0 - pct)?;
    }
    if let Some(method) = standardize {
        let method = Standardization::from(method);
        info!(%method, "standardizing factor columns");
        frame = standardize_frame(&frame, method)?;
    }

    CsvWriter::new(std::io::stdout().lock())
        .include_header(true)
        .finish(&mut frame)?;
    Ok(())
}

/// Get a human-readable description of the data frequency.
const fn frequency_description(freq: DataFrequency) -> &'static str {
    match freq {
        DataFrequency::Daily => "daily",
        DataFrequency::Quarterly => "quarterly",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_not_empty() {
        let registry = FactorRegistry::with_defaults();
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_all_factors_have_info() {
        let registry = FactorRegistry::with_defaults();
        let all_info = registry.all_info();

        assert_eq!(all_info.len(), registry.len());

        for info in all_info {
            assert!(!info.name.is_empty());
            assert!(!info.description.is_empty());
            assert!(!info.inputs.is_empty());
            assert!(info.window_length > 0);
        }
    }

    #[test]
    fn test_factor_categories() {
        let registry = FactorRegistry::with_defaults();
        let categories: Vec<_> = registry.all_info().iter().map(|f| f.category).collect();

        assert!(categories.contains(&FactorCategory::Momentum));
        assert!(categories.contains(&FactorCategory::Value));
        assert!(categories.contains(&FactorCategory::Quality));
        assert!(categories.contains(&FactorCategory::Size));
        assert!(categories.contains(&FactorCategory::Volatility));
        assert!(categories.contains(&FactorCategory::Growth));
        assert!(categories.contains(&FactorCategory::Liquidity));
    }

    #[test]
    fn test_cli_parses_compute() {
        let cli = Cli::try_parse_from([
            "pit-factors",
            "compute",
            "--csv",
            "bars.csv",
            "--date",
            "2024-06-28",
            "--factors",
            "pb_ratio,size",
        ])
        .unwrap();

        let Commands::Compute { date, factors, .. } = cli.command else {
            panic!("expected compute");
        };
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        assert_eq!(factors, ["pb_ratio", "size"]);
    }

    #[test]
    fn test_cli_parses_post_processing() {
        let cli = Cli::try_parse_from([
            "pit-factors",
            "compute",
            "--csv",
            "bars.csv",
            "--date",
            "2024-06-28",
            "--winsorize",
            "0.01",
            "--standardize",
            "robust",
        ])
        .unwrap();

        let Commands::Compute {
            winsorize,
            standardize,
            ..
        } = cli.command
        else {
            panic!("expected compute");
        };
        assert_eq!(winsorize, Some(0.01));
        assert_eq!(standardize.map(Standardization::from), Some(Standardization::Robust));
    }

    #[test]
    fn test_frequency_description() {
        assert_eq!(frequency_description(DataFrequency::Quarterly), "quarterly");
    }
}
