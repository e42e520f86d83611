//! Calculate a chart from a JSON birth request
//!
//! Usage:
//!   bazi_chart [REQUEST.json] [--summary] [--year YYYY]
//!
//! Without a request file a sample request (1990-06-15 10:30, 北京市, male)
//! is used. `--summary` prints the compact summary instead of the full
//! chart; `--year` sets the year used to pick the current luck window.
//! Configuration comes from the environment (`BAZI_CONFIG`, ...).

use anyhow::{Context, Result};
use bazi_engine::{BaziEngine, BirthRequest, ChartSummary, EngineConfig, Gender};
use chrono::Datelike;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Args {
    request_path: Option<PathBuf>,
    summary: bool,
    year: Option<i32>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        request_path: None,
        summary: false,
        year: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--summary" => args.summary = true,
            "--year" => {
                let raw = iter.next().context("--year needs a value")?;
                args.year = Some(raw.parse().with_context(|| format!("bad --year: {}", raw))?);
            }
            other if other.starts_with("--") => anyhow::bail!("unknown flag {}", other),
            path => args.request_path = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn load_request(path: Option<&PathBuf>) -> Result<BirthRequest> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request: {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse request JSON")
        }
        None => Ok(BirthRequest::solar(1990, 6, 15, 10, 30, Gender::Male, "北京市")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazi_engine=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args()?;
    let config = EngineConfig::from_env()?;
    let engine = BaziEngine::new(config)?;
    let request = load_request(args.request_path.as_ref())?;

    let chart = engine
        .calculate(&request)
        .with_context(|| format!("Failed to calculate chart for {:?}", request))?;

    let output = if args.summary {
        let year = args.year.unwrap_or_else(|| chrono::Local::now().year());
        serde_json::to_string_pretty(&ChartSummary::from_chart(&chart, year))?
    } else {
        serde_json::to_string_pretty(&chart)?
    };
    println!("{}", output);
    Ok(())
}
