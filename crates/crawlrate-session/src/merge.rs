//! Combining per-request plans into one.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crawlrate_core::ordering::canonical;
use crawlrate_core::{CrawlPlan, PlanError, Pulse, WorkAssignment};

use crate::error::{SessionError, SessionResult};

/// How finalized requests are laid out relative to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Requests run back to back: each plan starts where the previous
    /// pulse's window ends.
    #[default]
    Sequential,
    /// Requests share the window from time zero. Slots are shifted by the
    /// volumes of earlier requests so no two assignments share a
    /// (time, worker, slot) cell.
    Concurrent,
}

impl MergePolicy {
    /// Merge plans in request order and return them canonically ordered.
    ///
    /// Fails when an offset time or slot no longer fits its type.
    pub fn merge(&self, parts: Vec<(Pulse, CrawlPlan)>) -> SessionResult<CrawlPlan> {
        // `None` once an offset has overflowed; only an error if a later
        // part actually needs it.
        let mut time_offset = Some(Duration::ZERO);
        let mut slot_offset = Some(0u32);
        let mut rules: Vec<WorkAssignment> = Vec::new();

        for (pulse, plan) in parts {
            for mut rule in plan {
                match self {
                    MergePolicy::Sequential => {
                        rule.time = time_offset
                            .and_then(|offset| rule.time.checked_add(offset))
                            .ok_or_else(|| overflow("assignment time"))?;
                    }
                    MergePolicy::Concurrent => {
                        rule.slot = slot_offset
                            .and_then(|offset| rule.slot.checked_add(offset))
                            .ok_or_else(|| overflow("assignment slot"))?;
                    }
                }
                rules.push(rule);
            }
            time_offset = time_offset.and_then(|offset| offset.checked_add(pulse.duration));
            slot_offset = slot_offset.and_then(|offset| offset.checked_add(pulse.volume));
        }

        let mut merged = CrawlPlan::new(rules);
        merged.reorder(&canonical());
        Ok(merged)
    }
}

fn overflow(what: &str) -> SessionError {
    SessionError::Plan(PlanError::InvalidArgument(format!("merged {what} overflows")))
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MergePolicy::Sequential => "sequential",
            MergePolicy::Concurrent => "concurrent",
        })
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(MergePolicy::Sequential),
            "concurrent" => Ok(MergePolicy::Concurrent),
            other => Err(format!("unknown merge policy: {other}")),
        }
    }
}
