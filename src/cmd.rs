use std::collections::BTreeMap;

use anyhow::Context;
use clap::Parser;

use crate::client::ProviderAdapter;
use crate::config::Config;
use crate::f1::F1Api;
use crate::types::{HttpMethod, Query, QueryKind, DEFAULT_SEASON};

const DEFAULT_SUBJECT: &str = "Driver";

#[derive(Parser, Debug)]
#[command(name = "paddock", about = "F1 race reports and driver stats")]
pub enum Cmd {
    /// Race report for one event
    RaceReport { event_id: String },
    /// Driver profile and current team
    AthleteInfo { athlete_id: String },
    /// One driver's results for a season
    RaceResults {
        driver_id: String,
        #[arg(long, default_value = DEFAULT_SEASON)]
        year: String,
        /// Name shown in the table heading
        #[arg(long, default_value = DEFAULT_SUBJECT)]
        name: String,
    },
    /// Career statistics, one row per season
    Stats {
        driver_id: String,
        #[arg(long, default_value = DEFAULT_SUBJECT)]
        name: String,
    },
    /// Profile, season results and career statistics together
    Driver {
        driver_id: String,
        #[arg(long, default_value = DEFAULT_SEASON)]
        year: String,
        #[arg(long, default_value = DEFAULT_SUBJECT)]
        name: String,
    },
    /// Raw provider call, printed as JSON
    Request {
        path: String,
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        #[arg(long, default_value = "GET")]
        method: String,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

async fn show(api: &impl ProviderAdapter, query: Query, subject: &str) -> anyhow::Result<()> {
    println!("fetching {} for {}...", query.kind(), query.identifier());
    let text = api.fetch_and_format(&query, subject).await?;
    println!("\n{text}");
    Ok(())
}

// sections that fail are reported and skipped
async fn show_driver(
    api: &impl ProviderAdapter,
    driver_id: String,
    year: String,
    name: &str,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        api.validate(QueryKind::Stats, &driver_id),
        "Invalid input. Driver ID should be numeric."
    );
    println!("fetching all statistics for {name}...");
    let queries = [
        Query::AthleteInfo {
            athlete_id: driver_id.clone(),
        },
        Query::RaceResults {
            driver_id: driver_id.clone(),
            year,
        },
        Query::Stats { driver_id },
    ];

    let mut shown = 0;
    for query in &queries {
        match api.fetch_and_format(query, name).await {
            Ok(text) => {
                println!("\n{text}");
                shown += 1;
            }
            Err(e) => tracing::warn!(kind = %query.kind(), "{e}"),
        }
    }

    if shown == 0 {
        anyhow::bail!("Failed to fetch driver statistics.");
    }
    Ok(())
}

async fn raw_request(
    api: &F1Api,
    path: &str,
    params: Vec<(String, String)>,
    method: &str,
) -> anyhow::Result<()> {
    let method: HttpMethod = method.parse()?;
    let params: BTreeMap<String, String> = params.into_iter().collect();
    let body = api.http().request(path, &params, method).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

impl Cmd {
    pub async fn run(self) -> anyhow::Result<()> {
        let config =
            Config::from_env().context("failed to load F1 Motorsport Data API configuration")?;
        tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "configured");
        let api = F1Api::new(&config)?;

        match self {
            Cmd::RaceReport { event_id } => {
                show(&api, Query::RaceReport { event_id }, DEFAULT_SUBJECT).await?;
            }
            Cmd::AthleteInfo { athlete_id } => {
                show(&api, Query::AthleteInfo { athlete_id }, DEFAULT_SUBJECT).await?;
            }
            Cmd::RaceResults {
                driver_id,
                year,
                name,
            } => {
                show(&api, Query::RaceResults { driver_id, year }, &name).await?;
            }
            Cmd::Stats { driver_id, name } => {
                show(&api, Query::Stats { driver_id }, &name).await?;
            }
            Cmd::Driver {
                driver_id,
                year,
                name,
            } => {
                show_driver(&api, driver_id, year, &name).await?;
            }
            Cmd::Request {
                path,
                params,
                method,
            } => {
                raw_request(&api, &path, params, &method).await?;
            }
        }

        Ok(())
    }
}
