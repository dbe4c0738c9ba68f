//! Resolve flags against crawlrate.toml and print the plan.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crawlrate_core::config::CrawlrateConfig;
use crawlrate_core::lists::{load_keywords, load_proxies};
use crawlrate_core::{Algorithm, Constraint, FillStrategy, Timing};
use crawlrate_placement::{compute_pulse, generate_with};

use crate::Cli;
use crate::render;

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub keywords: PathBuf,
    pub proxies: PathBuf,
    pub timing: Timing,
    pub constraint: Constraint,
    pub strategy: FillStrategy,
    pub debug: bool,
}

impl Settings {
    /// Flags win over the config file, which wins over built-in defaults.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => CrawlrateConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => CrawlrateConfig::default(),
        };

        let mut timing = config.timing();
        if let Some(runtime) = cli.avg_job_runtime {
            timing.avg_job_runtime = runtime;
        }
        if let Some(delay) = cli.minimum_delay {
            timing.minimum_delay = delay;
        }

        let algorithm = cli.algorithm.unwrap_or_else(|| config.algorithm());
        let constraint = match (algorithm, config.constraint(algorithm)) {
            (Algorithm::Duration, Constraint::FixedDuration { time_period }) => {
                Constraint::FixedDuration {
                    time_period: cli.time_period.unwrap_or(time_period),
                }
            }
            (Algorithm::Connections, Constraint::FixedConnections { max_connections }) => {
                Constraint::FixedConnections {
                    max_connections: cli.maximum_connections.unwrap_or(max_connections),
                }
            }
            (_, other) => other,
        };

        let mut strategy = config.fill_strategy();
        if let Some(weighting) = cli.weighting {
            strategy.weighting = weighting;
        }
        if let Some(remainder) = cli.remainder {
            strategy.remainder = remainder;
        }

        if algorithm == Algorithm::Duration && cli.maximum_connections.is_some() {
            warn!("--maximumConnections is ignored by the duration algorithm");
        }
        if algorithm == Algorithm::Connections && cli.time_period.is_some() {
            warn!("--timePeriod is ignored by the connections algorithm");
        }

        Ok(Self {
            keywords: cli.keywords.clone(),
            proxies: cli.proxies.clone(),
            timing,
            constraint,
            strategy,
            debug: cli.debug,
        })
    }
}

/// Load the lists, plan them, and write the table to `out`.
pub fn run(settings: &Settings, out: &mut impl Write) -> Result<()> {
    let keywords = load_keywords(&settings.keywords)?;
    let proxies = load_proxies(&settings.proxies)?;

    let pulse = compute_pulse(
        keywords.len(),
        proxies.len(),
        &settings.timing,
        &settings.constraint,
    )
    .with_context(|| format!("{} algorithm", settings.constraint.algorithm()))?;

    if settings.debug {
        render::debug_summary(out, &keywords, &proxies, &pulse)?;
    }

    let plan = generate_with(&keywords, &proxies, &pulse, settings.strategy)?;
    info!(
        keywords = keywords.len(),
        proxies = proxies.len(),
        assignments = plan.len(),
        %pulse,
        "crawl plan ready"
    );

    render::table(out, &plan)?;
    Ok(())
}
