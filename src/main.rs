//! craft-ledger CLI: crafting economy analysis.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use serde::Serialize;

use craft_ledger::config::AnalysisConfig;
use craft_ledger::dataset::Dataset;
use craft_ledger::economy::Economy;
use craft_ledger::report::{self, TableRow};

#[derive(Parser)]
#[command(name = "craft-ledger", version, about = "Crafting economy analysis")]
struct Cli {
    /// Analysis config (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for result tables.
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Most profitable product per sourcing channel.
    AddedValue {
        /// Dataset file (.toml or .json).
        #[arg(long)]
        dataset: PathBuf,
    },

    /// Dominant sourcing channel in each product's ingredient tree.
    Bottleneck {
        /// Dataset file (.toml or .json).
        #[arg(long)]
        dataset: PathBuf,

        /// Also write the table as JSON to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Raw factory material needed for target products.
    Factory {
        /// Dataset file (.toml or .json).
        #[arg(long)]
        dataset: PathBuf,

        /// Target products (repeatable). Defaults to the config's targets.
        #[arg(long = "target")]
        targets: Vec<String>,
    },

    /// Full bill of materials of one product.
    Flatten {
        /// Dataset file (.toml or .json).
        #[arg(long)]
        dataset: PathBuf,

        /// Product to expand.
        #[arg(long)]
        product: String,

        /// Sum entries per ingredient instead of listing the traversal.
        #[arg(long)]
        totals: bool,
    },

    /// Run all three metrics.
    Report {
        /// Dataset file (.toml or .json).
        #[arg(long)]
        dataset: PathBuf,

        /// Directory for `bottleneck.json`.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Load and validate a dataset, then print a summary.
    Validate {
        /// Dataset file (.toml or .json).
        #[arg(long)]
        dataset: PathBuf,
    },

    /// Write the default analysis config to a file.
    InitConfig {
        /// Destination path.
        #[arg(default_value = "craft-ledger.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::AddedValue { dataset } => {
            let economy = load_economy(&dataset, &config)?;
            emit(cli.format, "Added value", &economy.added_value()?)?;
        }

        Commands::Bottleneck { dataset, output } => {
            let economy = load_economy(&dataset, &config)?;
            let rows = economy.bottleneck()?;
            emit(cli.format, "Bottleneck", &rows)?;
            if let Some(path) = output {
                report::write_json(&path, &rows)?;
            }
        }

        Commands::Factory { dataset, targets } => {
            let economy = load_economy(&dataset, &config)?;
            let targets = if targets.is_empty() {
                config.factory_targets.clone()
            } else {
                targets
            };
            let rows = economy.factory_demand(&targets)?;
            emit(
                cli.format,
                &format!("Factory demand for {}", targets.join(", ")),
                &rows,
            )?;
        }

        Commands::Flatten {
            dataset,
            product,
            totals,
        } => {
            let economy = load_economy(&dataset, &config)?;
            if totals {
                let requirements = economy.requirements(&product)?;
                match cli.format {
                    Format::Json => {
                        println!("{}", serde_json::to_string_pretty(&requirements).map_err(|e| {
                            miette::miette!("failed to serialize requirements: {e}")
                        })?);
                    }
                    Format::Text => {
                        println!("Requirements for \"{product}\" ({}):", requirements.len());
                        for (ingredient, quantity) in &requirements {
                            println!("  {ingredient}: {quantity}");
                        }
                    }
                }
            } else {
                let flat = economy.flatten(&product)?;
                emit(cli.format, &format!("Bill of materials for \"{product}\""), &flat)?;
            }
        }

        Commands::Report {
            dataset,
            output_dir,
        } => {
            let economy = load_economy(&dataset, &config)?;

            let demand = economy.factory_demand(&config.factory_targets)?;
            emit(cli.format, "Factory demand", &demand)?;

            let bottleneck = economy.bottleneck()?;
            let path = output_dir.join("bottleneck.json");
            report::write_json(&path, &bottleneck)?;
            println!("Bottleneck table written to {}", path.display());

            emit(cli.format, "Added value", &economy.added_value()?)?;
        }

        Commands::Validate { dataset } => {
            let economy = load_economy(&dataset, &config)?;
            println!("Dataset {} is valid.", dataset.display());
            println!("{}", economy.info());
        }

        Commands::InitConfig { path } => {
            AnalysisConfig::default().save(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

fn load_economy(path: &Path, config: &AnalysisConfig) -> Result<Economy> {
    let dataset = Dataset::load(path)?;
    Ok(Economy::from_dataset(dataset, config.metric_options())?)
}

/// Print a result table in the requested format.
fn emit<T: TableRow + Serialize>(format: Format, title: &str, rows: &[T]) -> Result<()> {
    match format {
        Format::Text => {
            println!("{title} ({} rows):", rows.len());
            print!("{}", report::render_text(rows));
        }
        Format::Json => println!("{}", report::to_json(rows)?),
    }
    Ok(())
}
