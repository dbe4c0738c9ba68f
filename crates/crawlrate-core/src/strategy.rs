//! Fill strategies for the plan generator.
//!
//! A plan is a grid of ticks × workers × slots. When there are fewer
//! items than cells, two choices remain: which ticks stay empty
//! (`Weighting`) and how the one partially filled tick is shared out
//! (`Remainder`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which end of the window is saturated first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    /// Earliest ticks are full; the last used tick takes the remainder.
    #[default]
    #[serde(rename = "bottom")]
    BottomHeavy,
    /// Latest ticks are full; the first used tick takes the remainder.
    #[serde(rename = "top")]
    TopHeavy,
}

/// How the partially filled tick is distributed across workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remainder {
    /// Fill worker by worker: earlier workers get every slot, later
    /// workers may get none.
    #[default]
    Starve,
    /// Fill slot by slot: every worker is reduced evenly.
    Spread,
}

/// Complete fill policy for one plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillStrategy {
    #[serde(default)]
    pub weighting: Weighting,
    #[serde(default)]
    pub remainder: Remainder,
}

impl FillStrategy {
    pub fn new(weighting: Weighting, remainder: Remainder) -> Self {
        Self {
            weighting,
            remainder,
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Weighting::BottomHeavy => "bottom",
            Weighting::TopHeavy => "top",
        })
    }
}

impl FromStr for Weighting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom" | "bottom-heavy" => Ok(Weighting::BottomHeavy),
            "top" | "top-heavy" => Ok(Weighting::TopHeavy),
            other => Err(ConfigError::Unknown {
                kind: "weighting",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Remainder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Remainder::Starve => "starve",
            Remainder::Spread => "spread",
        })
    }
}

impl FromStr for Remainder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starve" => Ok(Remainder::Starve),
            "spread" => Ok(Remainder::Spread),
            other => Err(ConfigError::Unknown {
                kind: "remainder policy",
                value: other.to_string(),
            }),
        }
    }
}
