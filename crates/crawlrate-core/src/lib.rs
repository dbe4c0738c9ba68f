//! crawlrate-core: shared types for crawl planning.
//!
//! Holds the value types every other crate passes around (`Pulse`,
//! `WorkAssignment`, `CrawlPlan`), the error taxonomy, the generic
//! multi-key ordering used to canonicalize plans, and the
//! `crawlrate.toml` / list-file loaders used by the front ends.

pub mod config;
pub mod error;
pub mod lists;
pub mod ordering;
pub mod plan;
pub mod pulse;
pub mod request;
pub mod serde_secs;
pub mod strategy;
pub mod worker;

pub use config::{CrawlrateConfig, parse_duration};
pub use error::{ConfigError, PlanError, PlanResult};
pub use ordering::{LessFn, OrderedBy};
pub use plan::{CrawlPlan, WorkAssignment};
pub use pulse::Pulse;
pub use request::{Algorithm, Constraint, Timing};
pub use strategy::{FillStrategy, Remainder, Weighting};
pub use worker::WorkerId;
