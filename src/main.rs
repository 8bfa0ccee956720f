//! ECF Rectifier CLI
//!
//! Command-line interface for computing benefits and rectifying filings

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use serde::de::DeserializeOwned;

use ecf_rectifier::rectification::{write_outputs, DirectoryStore};
use ecf_rectifier::{
    load_selic_rates, rectify_filing, run_batch, AdjustmentPeriod, BenefitReport, FiscalYearInput,
    RectificationRequest, RectifierConfig,
};

/// Amended ECF filings from recovered fuel-evaporation losses
#[derive(Parser)]
#[command(name = "ecf_rectifier", version, about)]
struct Cli {
    /// JSON configuration file; defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a single filing with a list of adjustments
    Rectify {
        /// Original filing
        filing: PathBuf,
        /// JSON array of period adjustments
        #[arg(long)]
        adjustments: PathBuf,
        /// Only apply adjustments of this fiscal year
        #[arg(long)]
        year: Option<i32>,
        /// Where to write the amended filing (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        irpj_code: Option<String>,
        #[arg(long)]
        csll_code: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Rectify every fiscal year of a request
    Batch {
        /// Rectification request JSON
        request: PathBuf,
        /// Directory the request's file paths are relative to
        #[arg(long)]
        input_dir: PathBuf,
        /// Directory receiving `<year>-RETIFICADORA.txt` files
        #[arg(long)]
        output_dir: PathBuf,
    },

    /// Compute refundable taxes and their SELIC correction
    Benefit {
        /// JSON array of fiscal-year inputs
        input: PathBuf,
        /// SELIC rate CSV (`month,rate`)
        #[arg(long)]
        selic: Option<PathBuf>,
        /// Correction date, YYYY-MM-DD (today when omitted)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Write the full report as JSON here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the derived adjustments as JSON here
        #[arg(long)]
        adjustments_out: Option<PathBuf>,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<RectifierConfig> {
    match path {
        Some(path) => Ok(RectifierConfig::from_json_path(path)?),
        None => Ok(RectifierConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Rectify { filing, adjustments, year, output, irpj_code, csll_code, description } => {
            if let Some(code) = irpj_code {
                config.irpj_code = code;
            }
            if let Some(code) = csll_code {
                config.csll_code = code;
            }
            if let Some(text) = description {
                config.description = text;
            }
            config.validate()?;

            let mut adjustments: Vec<AdjustmentPeriod> = read_json(&adjustments)?;
            if let Some(year) = year {
                adjustments.retain(|a| a.fiscal_year == year);
            }

            let bytes = fs::read(&filing).with_context(|| format!("reading {}", filing.display()))?;
            let text = String::from_utf8_lossy(&bytes);
            let amended = rectify_filing(&text, &adjustments, &config.descriptor());

            match output {
                Some(path) => {
                    fs::write(&path, amended).with_context(|| format!("writing {}", path.display()))?;
                    info!("Wrote {}", path.display());
                }
                None => print!("{}", amended),
            }
        }

        Commands::Batch { request, input_dir, output_dir } => {
            let request: RectificationRequest = read_json(&request)?;
            let store = DirectoryStore::new(input_dir);
            let outputs = run_batch(&request, &store)?;

            for path in write_outputs(&output_dir, &outputs)? {
                println!("{}", path.display());
            }
        }

        Commands::Benefit { input, selic, as_of, output, adjustments_out } => {
            let inputs: Vec<FiscalYearInput> = read_json(&input)?;
            let selic_path = selic.unwrap_or_else(|| config.selic_path.clone());
            let series = load_selic_rates(&selic_path)
                .with_context(|| format!("loading SELIC rates from {}", selic_path.display()))?;
            let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());

            let report = BenefitReport::build(&inputs, &series, as_of, &config.eligible_years());

            println!("{:>6} {:>10} {:>14} {:>14} {:>14} {:>14}", "Year", "Method", "Generated", "Benefit", "SELIC", "Corrected");
            println!("{}", "-".repeat(78));
            for year in &report.summary.years {
                println!(
                    "{:>6} {:>10} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
                    year.fiscal_year,
                    year.method.as_str(),
                    year.generated_loss,
                    year.benefit,
                    year.selic,
                    year.corrected_total
                );
            }
            println!("Corrected total: {:.2}", report.summary.corrected_total());
            println!("Unused loss:     {:.2}", report.summary.unused_loss());

            if let Some(path) = output {
                fs::write(&path, serde_json::to_string_pretty(&report)?)?;
                info!("Wrote report to {}", path.display());
            }
            if let Some(path) = adjustments_out {
                fs::write(&path, serde_json::to_string_pretty(&report.adjustments())?)?;
                info!("Wrote adjustments to {}", path.display());
            }
        }
    }

    Ok(())
}
