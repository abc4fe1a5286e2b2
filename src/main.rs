use std::path::{Path, PathBuf};

use _model::Region;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    stores::{collect, getstore::GetStoreDriver, replay::ReplayDriver, Collection, Outcome},
};

mod config;
mod output;
mod stores;
mod utils;

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Collect every region from the live store map.
    Scrape {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also keep the raw store lists, for `replay`.
        #[arg(long)]
        raw: Option<PathBuf>,
        #[arg(long, value_enum)]
        only: Vec<Region>,
    },
    /// Rebuild the output from a raw capture.
    Replay {
        raw: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum)]
        only: Vec<Region>,
    },
    /// Per-region store and district counts of a written output file.
    Summary { output: Option<PathBuf> },
    /// Print the region codes and their canonical names.
    Regions,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Scrape {
            config,
            output,
            raw,
            only,
        } => {
            let config = Config::load(config.as_deref())?;
            let path = output.unwrap_or_else(|| config.output.clone());

            let mut driver = GetStoreDriver::connect(&config)?;
            let collection = collect(&mut driver, &selection(only), config.load_timeout())
                .context("store map stopped responding")?;

            if let Some(raw) = raw {
                output::write_json(&raw, driver.captures())?;
                info!(path = %raw.display(), "raw capture written");
            }
            finish(collection, &path)?;
        }
        Command::Replay { raw, output, only } => {
            let path = output.unwrap_or_else(|| Config::default().output);

            let mut driver = ReplayDriver::open(&raw)?;
            let timeout = Config::default().load_timeout();
            let collection = collect(&mut driver, &selection(only), timeout)?;
            finish(collection, &path)?;
        }
        Command::Summary { output } => {
            summary(&output.unwrap_or_else(|| Config::default().output))?;
        }
        Command::Regions => {
            for region in Region::all() {
                println!("{} {}", region.code(), region.name());
            }
        }
    }

    Ok(())
}

fn selection(only: Vec<Region>) -> Vec<Region> {
    if only.is_empty() {
        Region::all()
    } else {
        only.into_iter().sorted().dedup().collect()
    }
}

fn finish(collection: Collection, path: &Path) -> Result<()> {
    for summary in &collection.summaries {
        match &summary.outcome {
            Outcome::Failed(reason) => warn!(
                code = summary.region.code(),
                region = %summary.region,
                reason = %reason,
                "region missing from output"
            ),
            Outcome::Collected {
                count,
                skipped,
                duplicates,
            } => debug!(
                code = summary.region.code(),
                count,
                skipped,
                duplicates,
                "region complete"
            ),
        }
    }

    output::write(path, collection.records())?;
    info!(total = collection.records().len(), path = %path.display(), "stores written");
    Ok(())
}

fn summary(path: &Path) -> Result<()> {
    let records = output::read(path)?;
    let counts = records.iter().counts_by(|x| x.region);

    for region in Region::all() {
        let count = counts.get(&region).copied().unwrap_or_default();
        let districts = records
            .iter()
            .filter(|x| x.region == region)
            .map(|x| x.subregion.as_str())
            .filter(|x| !x.is_empty())
            .unique()
            .count();
        println!(
            "{} {} {count} stores, {districts} districts",
            region.code(),
            region.name()
        );
    }
    println!("total {}", records.len());
    Ok(())
}
