//! Multi-key ordering.
//!
//! An `OrderedBy` composes a list of less-than predicates into one total
//! order. Predicates are tried in sequence: the first one that prefers
//! either side decides, and the last one is trusted as-is since nothing
//! is left to break its ties. Different orders come from different
//! predicate lists, e.g. `[by_time, by_worker, by_slot_ascending]` or
//! `[by_worker, by_slot_ascending, by_time]`.

use std::cmp::Ordering;

use crate::plan::WorkAssignment;

/// A strict "is `a` before `b`" predicate.
pub type LessFn<T> = fn(&T, &T) -> bool;

/// Lexicographic composition of less-than predicates.
pub struct OrderedBy<T> {
    less: Vec<LessFn<T>>,
}

impl<T> OrderedBy<T> {
    pub fn new(less: Vec<LessFn<T>>) -> Self {
        Self { less }
    }

    /// Append a lower-precedence predicate.
    pub fn then(mut self, less: LessFn<T>) -> Self {
        self.less.push(less);
        self
    }

    /// Whether `p` sorts strictly before `q`.
    ///
    /// With no predicates every pair compares equal.
    pub fn less(&self, p: &T, q: &T) -> bool {
        let Some((last, rest)) = self.less.split_last() else {
            return false;
        };
        for less in rest {
            if less(p, q) {
                return true;
            }
            if less(q, p) {
                return false;
            }
        }
        last(p, q)
    }

    pub fn compare(&self, p: &T, q: &T) -> Ordering {
        if self.less(p, q) {
            Ordering::Less
        } else if self.less(q, p) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Stable sort, so re-sorting sorted input is a no-op.
    pub fn sort(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }

    pub fn is_sorted(&self, items: &[T]) -> bool {
        items.windows(2).all(|w| !self.less(&w[1], &w[0]))
    }
}

impl<T> Clone for OrderedBy<T> {
    fn clone(&self) -> Self {
        Self {
            less: self.less.clone(),
        }
    }
}

// ── Work assignment predicates ─────────────────────────────────────

pub fn by_time(a: &WorkAssignment, b: &WorkAssignment) -> bool {
    a.time < b.time
}

pub fn by_worker(a: &WorkAssignment, b: &WorkAssignment) -> bool {
    a.worker.as_str() < b.worker.as_str()
}

pub fn by_slot_ascending(a: &WorkAssignment, b: &WorkAssignment) -> bool {
    a.slot < b.slot
}

pub fn by_slot_descending(a: &WorkAssignment, b: &WorkAssignment) -> bool {
    a.slot > b.slot
}

/// Time, then worker, then ascending slot: the order plans are emitted in.
pub fn canonical() -> OrderedBy<WorkAssignment> {
    OrderedBy::new(vec![by_time, by_worker, by_slot_ascending])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerId;
    use std::time::Duration;

    fn rule(secs: u64, worker: &str, slot: u32, item: &str) -> WorkAssignment {
        WorkAssignment::new(Duration::from_secs(secs), WorkerId::new(worker), slot, item)
    }

    fn shuffled() -> Vec<WorkAssignment> {
        vec![
            rule(60, "p1", 1, "a"),
            rule(0, "p1", 0, "b"),
            rule(60, "p0", 0, "c"),
            rule(0, "p0", 1, "d"),
            rule(0, "p0", 0, "e"),
            rule(60, "p1", 0, "f"),
        ]
    }

    fn items(rules: &[WorkAssignment]) -> String {
        rules.iter().map(|r| r.item.as_str()).collect()
    }

    #[test]
    fn canonical_orders_time_then_worker_then_slot() {
        let mut rules = shuffled();
        canonical().sort(&mut rules);
        assert_eq!(items(&rules), "edbcfa");
    }

    #[test]
    fn predicate_order_selects_precedence() {
        let mut rules = shuffled();
        OrderedBy::new(vec![by_worker, by_slot_ascending, by_time]).sort(&mut rules);
        assert_eq!(items(&rules), "ecdbfa");
    }

    #[test]
    fn descending_slots() {
        let mut rules = shuffled();
        OrderedBy::new(vec![by_time, by_worker])
            .then(by_slot_descending)
            .sort(&mut rules);
        assert_eq!(items(&rules), "debcaf");
    }

    #[test]
    fn ties_fall_through_to_later_predicates() {
        let order = canonical();
        let a = rule(0, "p0", 0, "x");
        let b = rule(0, "p0", 1, "y");
        assert!(order.less(&a, &b));
        assert!(!order.less(&b, &a));
        assert_eq!(order.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn strict_and_transitive() {
        let order = canonical();
        let rules = shuffled();
        for a in &rules {
            assert!(!order.less(a, a));
            for b in &rules {
                assert!(!(order.less(a, b) && order.less(b, a)));
                for c in &rules {
                    if order.less(a, b) && order.less(b, c) {
                        assert!(order.less(a, c));
                    }
                }
            }
        }
    }

    #[test]
    fn resorting_sorted_input_is_a_no_op() {
        let order = canonical();
        let mut rules = shuffled();
        // Equal keys keep their relative order.
        rules.push(rule(0, "p0", 0, "z"));
        order.sort(&mut rules);
        let once = rules.clone();
        order.sort(&mut rules);
        assert_eq!(rules, once);
        assert!(order.is_sorted(&rules));
        assert_eq!(items(&rules), "ezdbcfa");
    }

    #[test]
    fn empty_predicate_list_keeps_input_order() {
        let order: OrderedBy<WorkAssignment> = OrderedBy::new(Vec::new());
        let mut rules = shuffled();
        order.sort(&mut rules);
        assert_eq!(items(&rules), "abcdef");
    }
}
