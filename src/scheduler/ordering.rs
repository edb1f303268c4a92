//! Comparison functions used by the scheduler.
//!
//! The ready queue itself is FIFO. These orderings only apply to explicit
//! sort calls: [`natural_order`] mirrors `Ord for Job`, and [`group_order`]
//! ranks the members of a drawn group so the first one becomes the leader.

use std::cmp::Ordering;

use crate::scheduler::job::Job;

/// Shortest burst first, higher priority value first on ties.
pub fn natural_order(a: &Job, b: &Job) -> Ordering {
    a.cmp(b)
}

/// Longest burst first, lower priority value first on ties.
pub fn group_order(a: &Job, b: &Job) -> Ordering {
    b.burst_time
        .cmp(&a.burst_time)
        .then_with(|| a.priority.cmp(&b.priority))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort a drawn group in place by [`group_order`].
pub fn sort_group(group: &mut [Job]) {
    group.sort_by(group_order);
}
