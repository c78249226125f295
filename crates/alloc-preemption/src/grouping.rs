//! Eligibility filtering and priority bucketing of preemption candidates.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::Allocation;

/// Allocations sharing one job priority.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityGroup<'a> {
    priority: i32,
    allocations: Vec<&'a Allocation>,
}

impl<'a> PriorityGroup<'a> {
    /// Creates a group from allocations that all have `priority`.
    #[must_use]
    pub fn new(priority: i32, allocations: Vec<&'a Allocation>) -> Self {
        Self {
            priority,
            allocations,
        }
    }

    /// Job priority shared by every allocation in the group.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Allocations still in the group.
    #[must_use]
    pub fn allocations(&self) -> &[&'a Allocation] {
        &self.allocations
    }

    /// Number of allocations still in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// Returns true if the group has no allocations left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Removes the allocation at `index`, moving the last one into its slot.
    pub(crate) fn take(&mut self, index: usize) -> &'a Allocation {
        self.allocations.swap_remove(index)
    }
}

/// Returns true if an allocation of `job_priority` may be preempted by a job
/// of `requesting_priority`.
#[must_use]
pub fn is_eligible(requesting_priority: i32, job_priority: i32, band: i32) -> bool {
    i64::from(job_priority) < i64::from(requesting_priority) + i64::from(band)
}

/// Drops allocations too close in priority to the requester and buckets the
/// rest by job priority, lowest priority first.
#[must_use]
pub fn filter_and_group(
    requesting_priority: i32,
    candidates: &[Allocation],
    band: i32,
) -> Vec<PriorityGroup<'_>> {
    let mut by_priority: BTreeMap<i32, Vec<&Allocation>> = BTreeMap::new();
    let mut skipped = 0usize;

    for alloc in candidates {
        if !is_eligible(requesting_priority, alloc.job_priority, band) {
            skipped += 1;
            continue;
        }
        by_priority.entry(alloc.job_priority).or_default().push(alloc);
    }

    debug!(
        requesting_priority,
        band,
        eligible = candidates.len() - skipped,
        skipped,
        groups = by_priority.len(),
        "Filtered preemption candidates"
    );

    by_priority
        .into_iter()
        .map(|(priority, allocations)| PriorityGroup::new(priority, allocations))
        .collect()
}
