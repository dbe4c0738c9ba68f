//! Work assignments and the crawl plan that holds them.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ordering::OrderedBy;
use crate::worker::WorkerId;

/// One (time, worker, slot, item) cell of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkAssignment {
    /// Offset from the start of the window. Always a multiple of the
    /// pulse frequency.
    #[serde(with = "crate::serde_secs")]
    pub time: Duration,
    pub worker: WorkerId,
    /// Connection index within the tick, below the pulse volume.
    pub slot: u32,
    pub item: String,
}

impl WorkAssignment {
    pub fn new(time: Duration, worker: WorkerId, slot: u32, item: impl Into<String>) -> Self {
        Self {
            time,
            worker,
            slot,
            item: item.into(),
        }
    }
}

impl fmt::Display for WorkAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}s]\t{}\t{}\t{}",
            self.time.as_secs(),
            self.worker,
            self.slot,
            self.item
        )
    }
}

/// Ordered sequence of work assignments.
///
/// Built once by the generator. It can be reordered as a whole but its
/// assignments are never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlPlan(Vec<WorkAssignment>);

impl CrawlPlan {
    pub fn new(assignments: Vec<WorkAssignment>) -> Self {
        Self(assignments)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkAssignment> {
        self.0.iter()
    }

    pub fn assignments(&self) -> &[WorkAssignment] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<WorkAssignment> {
        self.0
    }

    /// Stable re-sort under the given ordering.
    pub fn reorder(&mut self, ordering: &OrderedBy<WorkAssignment>) {
        ordering.sort(&mut self.0);
    }

    /// Distinct tick offsets used by the plan, ascending.
    pub fn ticks(&self) -> Vec<Duration> {
        self.per_tick_load().into_keys().collect()
    }

    /// Number of assignments dispatched at each tick.
    pub fn per_tick_load(&self) -> BTreeMap<Duration, usize> {
        let mut load = BTreeMap::new();
        for rule in &self.0 {
            *load.entry(rule.time).or_insert(0) += 1;
        }
        load
    }
}

impl From<Vec<WorkAssignment>> for CrawlPlan {
    fn from(assignments: Vec<WorkAssignment>) -> Self {
        Self(assignments)
    }
}

impl FromIterator<WorkAssignment> for CrawlPlan {
    fn from_iter<I: IntoIterator<Item = WorkAssignment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for CrawlPlan {
    type Item = WorkAssignment;
    type IntoIter = std::vec::IntoIter<WorkAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CrawlPlan {
    type Item = &'a WorkAssignment;
    type IntoIter = std::slice::Iter<'a, WorkAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
