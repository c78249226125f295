//! Greedy nearest-fit selection over priority groups.
//!
//! Groups are consumed lowest priority first. Within a group the remaining
//! allocation closest to the ask (by [`resource_distance`]) is picked until the
//! freed resources meet the ask or the group runs dry, then the next group is
//! tried. The result can over-select; [`crate::minimize`] trims it.

use tracing::{debug, trace};

use crate::distance::resource_distance;
use crate::grouping::PriorityGroup;
use crate::types::{Allocation, ResourceVector};

/// Outcome of the greedy pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedySelection<'a> {
    /// Allocations picked, in pick order.
    pub candidates: Vec<&'a Allocation>,
    /// Resources freed by evicting every candidate.
    pub freed: ResourceVector,
    /// Whether `freed` meets the ask.
    pub met: bool,
}

impl GreedySelection<'_> {
    fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            freed: ResourceVector::new(),
            met: false,
        }
    }
}

/// Index of the strictly closest allocation; the first one scanned wins ties.
fn closest_index(group: &PriorityGroup<'_>, ask: &ResourceVector) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_distance = f64::MAX;

    for (index, alloc) in group.allocations().iter().enumerate() {
        let distance = resource_distance(&alloc.resources, ask);
        trace!(
            alloc_id = %alloc.id,
            resources = %alloc.resources,
            distance,
            "Evaluated preemption candidate"
        );
        if distance < best_distance {
            best_distance = distance;
            best = Some(index);
        }
    }

    best
}

/// Picks allocations from `groups` until their combined resources meet `ask`.
///
/// Groups must already be ordered lowest priority first, as produced by
/// [`crate::filter_and_group`]. Picked allocations are removed from their
/// group.
#[must_use]
pub fn select_greedy<'a>(
    groups: &mut [PriorityGroup<'a>],
    ask: &ResourceVector,
) -> GreedySelection<'a> {
    let mut selection = GreedySelection::empty();

    'groups: for group in groups.iter_mut() {
        while !group.is_empty() {
            let Some(index) = closest_index(group, ask) else {
                // Nothing in a non-empty group is comparable; candidates are exhausted.
                break 'groups;
            };

            let alloc = group.take(index);
            selection.freed.accumulate(&alloc.resources);
            selection.candidates.push(alloc);
            selection.met = selection.freed.meets_requirements(ask);

            debug!(
                alloc_id = %alloc.id,
                priority = group.priority(),
                freed = %selection.freed,
                met = selection.met,
                "Picked preemption candidate"
            );

            if selection.met {
                break 'groups;
            }
        }
    }

    selection
}
