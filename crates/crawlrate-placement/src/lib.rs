//! Crawl planning: rate calculation and schedule generation.
//!
//! Turns coarse constraints (how many items, how many workers, how long
//! a job takes, and either a time budget or a connection cap) into a
//! `Pulse`, then expands a pulse plus the concrete item and worker lists
//! into an ordered `CrawlPlan`.
//!
//! # Components
//!
//! - **`rate`**: `fixed_duration` and `fixed_connections` calculators
//! - **`planner`**: grid fill (ticks × workers × slots) and canonical ordering
//!
//! Everything here is synchronous and pure.

pub mod planner;
pub mod rate;

pub use planner::{generate, generate_with};
pub use rate::{compute_pulse, fixed_connections, fixed_duration};
