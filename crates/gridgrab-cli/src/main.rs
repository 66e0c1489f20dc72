//! gridgrab command-line interface.
//!
//! Post-processes an OCR dump (Tesseract TSV or a serialized page as JSON)
//! the same way a screen grab is handled.
//!
//! ```bash
//! gridgrab text --input page.tsv
//! gridgrab table --input page.tsv --unit word --json
//! gridgrab scale --input first_pass.json --max-dimension 2000
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gridgrab::{EngineConfig, OcrPage, PassOutput, TableUnit, load_page_file, post_process};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridgrab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn OCR word boxes into clipboard text or tab-separated tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join the page into plain text, one line per OCR line
    Text {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Infer a table grid and print tab-separated text
    Table {
        #[command(flatten)]
        common: CommonArgs,

        /// What a grid unit is
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,

        /// Bands holding this many units or fewer are merged into a neighbour
        #[arg(long = "outlier-threshold")]
        outlier_threshold: Option<usize>,
    },
    /// Print the rescale factor advised for a first-pass result
    Scale {
        /// OCR dump to read (.json page, anything else is Tesseract TSV)
        #[arg(long, short)]
        input: PathBuf,

        /// Configuration file (TOML, YAML or JSON); discovered when omitted
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Largest raster side the backend accepts (0 = unlimited)
        #[arg(long = "max-dimension")]
        max_dimension: Option<u32>,

        /// Print a JSON object instead of the bare factor
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// OCR dump to read (.json page, anything else is Tesseract TSV)
    #[arg(long, short)]
    input: PathBuf,

    /// Configuration file (TOML, YAML or JSON); discovered when omitted
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Language tag overriding the one the page was read with
    #[arg(long, short)]
    language: Option<String>,

    /// Select units matching this text
    #[arg(long, short)]
    query: Option<String>,

    /// Match the query exactly and case-sensitively
    #[arg(long)]
    exact: bool,

    /// Print the whole pass output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Line,
    Word,
}

impl From<UnitArg> for TableUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Line => TableUnit::Line,
            UnitArg::Word => TableUnit::Word,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Text { common } => {
            let mut config = load_config(common.config.as_deref())?;
            config.table.enabled = false;
            run_pass(&common, config)
        }
        Commands::Table {
            common,
            unit,
            outlier_threshold,
        } => {
            let mut config = load_config(common.config.as_deref())?;
            config.table.enabled = true;
            if let Some(unit) = unit {
                config.table.unit = unit.into();
            }
            if let Some(threshold) = outlier_threshold {
                config.table.outlier_threshold = threshold;
            }
            run_pass(&common, config)
        }
        Commands::Scale {
            input,
            config,
            max_dimension,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let page = load_page(&input, &config)?;
            let max_dimension = max_dimension.unwrap_or(config.scale.max_image_dimension);
            let scale = config
                .scale
                .advisor()
                .ideal_scale(&page.word_heights(), page.width, page.height, max_dimension);

            if json {
                let report = serde_json::json!({
                    "scale": scale,
                    "width": page.width,
                    "height": page.height,
                    "words": page.word_count(),
                    "max_dimension": max_dimension,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", scale);
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => EngineConfig::discover()
            .context("Failed to discover configuration")?
            .unwrap_or_default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_page(input: &Path, config: &EngineConfig) -> Result<OcrPage> {
    let page = load_page_file(input, config.min_confidence)
        .with_context(|| format!("Failed to read OCR dump {}", input.display()))?;
    tracing::info!(
        "loaded {} words on {} lines from {}",
        page.word_count(),
        page.lines.len(),
        input.display()
    );
    Ok(page)
}

fn run_pass(common: &CommonArgs, mut config: EngineConfig) -> Result<()> {
    if let Some(language) = &common.language {
        config.language = Some(language.clone());
    }
    if common.exact {
        config.search.exact_match = true;
    }

    let page = load_page(&common.input, &config)?;
    let output = post_process(&page, &config, common.query.as_deref());

    if common.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&output);
    }
    Ok(())
}

fn print_text(output: &PassOutput) {
    if output.text.ends_with('\n') {
        print!("{}", output.text);
    } else {
        println!("{}", output.text);
    }
}
