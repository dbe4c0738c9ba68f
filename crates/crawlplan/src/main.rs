//! crawlplan: compute a crawl plan from keyword and proxy lists.
//!
//! ```text
//! crawlplan --keywords=./keywords.txt --proxies=./proxies.txt \
//!     --avgJobRuntime=60s --minimumDelay=60s --algorithm=duration --timePeriod=1h
//! crawlplan --keywords=./keywords.txt --proxies=./proxies.txt \
//!     --algorithm=connections --maximumConnections=5
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crawlrate_core::{Algorithm, Remainder, Weighting, parse_duration};

mod plan;
mod render;

#[derive(Parser, Debug)]
#[command(
    name = "crawlplan",
    about = "Crawlrate: schedule keywords across proxies",
    version
)]
pub struct Cli {
    /// Keyword file, one keyword per line. Keywords are sorted before planning.
    #[arg(long)]
    keywords: PathBuf,

    /// Proxy file, one proxy per line. File order is kept.
    #[arg(long)]
    proxies: PathBuf,

    /// Average job runtime, e.g. `60s` or `60` (default 60s).
    #[arg(long = "avgJobRuntime", value_parser = parse_duration)]
    avg_job_runtime: Option<Duration>,

    /// Minimum delay between jobs (default 0s).
    #[arg(long = "minimumDelay", value_parser = parse_duration)]
    minimum_delay: Option<Duration>,

    /// Algorithm used: duration or connections (default duration).
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// Time budget for the duration algorithm (default 1h).
    #[arg(long = "timePeriod", value_parser = parse_duration)]
    time_period: Option<Duration>,

    /// Connection cap for the connections algorithm (default 5).
    #[arg(long = "maximumConnections")]
    maximum_connections: Option<u32>,

    /// Which end of the window fills first: bottom or top (default bottom).
    #[arg(long)]
    weighting: Option<Weighting>,

    /// How the last partial tick is shared: starve or spread (default starve).
    #[arg(long)]
    remainder: Option<Remainder>,

    /// crawlrate.toml with defaults; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print input sizes and the computed pulse before the plan.
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("crawlplan=info".parse()?);
    if cli.debug {
        for directive in ["crawlplan=debug", "crawlrate_core=debug", "crawlrate_placement=debug"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let settings = plan::Settings::resolve(&cli)?;
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    plan::run(&settings, &mut out)?;
    out.flush()?;
    Ok(())
}
