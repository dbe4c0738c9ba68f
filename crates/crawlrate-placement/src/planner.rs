//! Crawl plan generator.
//!
//! A pulse describes a grid: `ticks` rows spaced `frequency` apart,
//! one column per worker, `volume` slots deep. Items are dealt into the
//! grid in input order until either runs out, then the result is put in
//! canonical order (time, worker, slot).
//!
//! ```text
//! bottom-heavy          top-heavy
//!   0s 2 2 2 2 2          0s 2 2 2
//!  60s 2 2 2 2 2         60s 2 2 2 2 2
//! 120s 2 2 2            120s 2 2 2 2 2
//! ```
//!
//! Only one tick is ever partially filled. `Weighting` picks which one,
//! `Remainder` picks how its cells are shared between workers.

use tracing::{debug, warn};

use crawlrate_core::ordering::canonical;
use crawlrate_core::{
    CrawlPlan, FillStrategy, PlanError, PlanResult, Pulse, Remainder, WorkAssignment, Weighting,
    WorkerId,
};

/// Generate a plan with the default bottom-heavy, starve-remainder fill.
///
/// A partial tick fills worker by worker (15 items, 3 workers, volume 2
/// ends with `p0` slots 0-1 and `p1` slot 0); use `Remainder::Spread` via
/// `generate_with` to put slot 0 on every worker instead.
pub fn generate<I, W>(items: &[I], workers: &[W], pulse: &Pulse) -> PlanResult<CrawlPlan>
where
    I: AsRef<str>,
    W: AsRef<str>,
{
    generate_with(items, workers, pulse, FillStrategy::default())
}

/// Generate a plan using the given fill strategy.
///
/// The plan holds `min(items, ticks × workers × volume)` assignments.
/// Empty item or worker lists produce an empty plan.
pub fn generate_with<I, W>(
    items: &[I],
    workers: &[W],
    pulse: &Pulse,
    strategy: FillStrategy,
) -> PlanResult<CrawlPlan>
where
    I: AsRef<str>,
    W: AsRef<str>,
{
    pulse.validate()?;

    if items.is_empty() || workers.is_empty() {
        return Ok(CrawlPlan::default());
    }

    let workers: Vec<WorkerId> = workers.iter().map(|w| WorkerId::new(w.as_ref())).collect();
    let per_tick = workers.len() as u64 * u64::from(pulse.volume);
    let capacity = pulse.capacity(workers.len());
    let placed = (items.len() as u64).min(capacity);

    if (items.len() as u64) > capacity {
        warn!(
            items = items.len(),
            capacity,
            unplaced = items.len() as u64 - capacity,
            "grid exhausted before items, plan is truncated"
        );
    }

    let mut next_item = items.iter();
    let mut rules = Vec::with_capacity(placed as usize);

    for (tick, count) in tick_layout(pulse.ticks(), per_tick, placed, strategy.weighting) {
        let time = pulse
            .tick_offset(tick)
            .ok_or_else(|| PlanError::InvalidArgument("plan window overflows".to_string()))?;

        for (worker, slot) in row_cells(workers.len(), pulse.volume, count, strategy.remainder) {
            let Some(item) = next_item.next() else { break };
            rules.push(WorkAssignment::new(
                time,
                workers[worker].clone(),
                slot,
                item.as_ref(),
            ));
        }
    }

    let mut plan = CrawlPlan::new(rules);
    plan.reorder(&canonical());

    debug!(
        assignments = plan.len(),
        workers = workers.len(),
        ticks = pulse.ticks(),
        weighting = %strategy.weighting,
        remainder = %strategy.remainder,
        "crawl plan generated"
    );
    Ok(plan)
}

/// Which ticks receive how many items, ascending by tick.
///
/// `placed` never exceeds `ticks × per_tick`.
fn tick_layout(ticks: u64, per_tick: u64, placed: u64, weighting: Weighting) -> Vec<(u64, u64)> {
    let full = placed / per_tick;
    let partial = placed % per_tick;

    match weighting {
        Weighting::BottomHeavy => {
            let mut layout: Vec<(u64, u64)> = (0..full).map(|t| (t, per_tick)).collect();
            if partial > 0 {
                layout.push((full, partial));
            }
            layout
        }
        Weighting::TopHeavy => {
            let first_full = ticks - full;
            let mut layout = Vec::with_capacity(full as usize + 1);
            if partial > 0 {
                layout.push((first_full - 1, partial));
            }
            layout.extend((first_full..ticks).map(|t| (t, per_tick)));
            layout
        }
    }
}

/// The first `count` cells of one tick, in fill order.
fn row_cells(workers: usize, volume: u32, count: u64, remainder: Remainder) -> Vec<(usize, u32)> {
    let count = count as usize;
    let partial = count < workers * volume as usize;

    match remainder {
        Remainder::Spread if partial => (0..volume)
            .flat_map(|slot| (0..workers).map(move |worker| (worker, slot)))
            .take(count)
            .collect(),
        _ => (0..workers)
            .flat_map(|worker| (0..volume).map(move |slot| (worker, slot)))
            .take(count)
            .collect(),
    }
}
