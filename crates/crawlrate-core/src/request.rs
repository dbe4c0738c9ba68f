//! Inputs to a pulse calculation.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_AVG_JOB_RUNTIME: Duration = Duration::from_secs(60);
pub const DEFAULT_MINIMUM_DELAY: Duration = Duration::ZERO;
pub const DEFAULT_TIME_PERIOD: Duration = Duration::from_secs(3600);
pub const DEFAULT_MAXIMUM_CONNECTIONS: u32 = 5;

fn default_avg_job_runtime() -> Duration {
    DEFAULT_AVG_JOB_RUNTIME
}

fn default_minimum_delay() -> Duration {
    DEFAULT_MINIMUM_DELAY
}

/// Per-job timing shared by both algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Average time one job takes.
    #[serde(with = "humantime_serde", default = "default_avg_job_runtime")]
    pub avg_job_runtime: Duration,
    /// Minimum delay between jobs on the same slot.
    #[serde(with = "humantime_serde", default = "default_minimum_delay")]
    pub minimum_delay: Duration,
}

impl Timing {
    pub fn new(avg_job_runtime: Duration, minimum_delay: Duration) -> Self {
        Self {
            avg_job_runtime,
            minimum_delay,
        }
    }

    pub fn from_secs(avg_job_runtime: u64, minimum_delay: u64) -> Self {
        Self::new(
            Duration::from_secs(avg_job_runtime),
            Duration::from_secs(minimum_delay),
        )
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(DEFAULT_AVG_JOB_RUNTIME, DEFAULT_MINIMUM_DELAY)
    }
}

/// The one constraint the caller fixes; the calculator solves for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum Constraint {
    /// Fixed time budget: solve for connections per worker.
    #[serde(rename = "duration")]
    FixedDuration {
        #[serde(with = "humantime_serde")]
        time_period: Duration,
    },
    /// Fixed connection cap: solve for how long the work takes.
    #[serde(rename = "connections")]
    FixedConnections { max_connections: u32 },
}

impl Constraint {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Constraint::FixedDuration { .. } => Algorithm::Duration,
            Constraint::FixedConnections { .. } => Algorithm::Connections,
        }
    }
}

/// Algorithm selector as named on the command line and in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Duration,
    Connections,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Duration => "duration",
            Algorithm::Connections => "connections",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "duration" => Ok(Algorithm::Duration),
            "connections" => Ok(Algorithm::Connections),
            other => Err(ConfigError::Unknown {
                kind: "algorithm",
                value: other.to_string(),
            }),
        }
    }
}
