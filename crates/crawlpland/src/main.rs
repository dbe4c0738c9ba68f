//! crawlpland: the crawl plan merge daemon.
//!
//! Clients open a session, submit any number of fixed-duration or
//! fixed-connections requests, then finalize to receive one merged plan.
//!
//! # Usage
//!
//! ```text
//! crawlpland --port 8470 --merge-policy sequential
//! ```

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use tracing::{info, warn};

use crawlrate_core::{FillStrategy, Remainder, Weighting};
use crawlrate_session::{MergePolicy, SessionStore};

#[derive(Parser, Debug)]
#[command(name = "crawlpland", about = "Crawlrate plan merge daemon", version)]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value = "8470")]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// How finalized requests are combined: sequential or concurrent.
    #[arg(long, default_value = "sequential")]
    merge_policy: MergePolicy,

    /// Fill weighting for every generated plan: bottom or top.
    #[arg(long, default_value = "bottom")]
    weighting: Weighting,

    /// Partial tick distribution: starve or spread.
    #[arg(long, default_value = "starve")]
    remainder: Remainder,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => "info,crawlpland=debug,crawlrate_session=debug".parse()?,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let strategy = FillStrategy::new(cli.weighting, cli.remainder);
    let sessions = SessionStore::new(cli.merge_policy, strategy);
    info!(
        policy = %cli.merge_policy,
        weighting = %strategy.weighting,
        remainder = %strategy.remainder,
        "session store initialized"
    );

    let router = crawlrate_api::build_router(sessions);
    let addr = SocketAddr::new(cli.bind, cli.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for ctrl-c, shutting down");
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("crawlpland stopped");
    Ok(())
}
