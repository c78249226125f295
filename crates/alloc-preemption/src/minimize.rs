//! Removal of redundant preemptions from a greedy selection.

use std::cmp::Ordering;

use tracing::debug;

use crate::distance::resource_distance;
use crate::types::{Allocation, ResourceVector};

/// Trims `candidates` down to a prefix that still meets `ask`.
///
/// Candidates are stably sorted by descending distance so that broad,
/// oversized allocations come first and can make later ones redundant. The
/// walk stops at the first prefix whose combined resources meet the ask. The
/// result is always a subset of `candidates`; if no prefix meets the ask, all
/// candidates are returned in sorted order.
#[must_use]
pub fn minimize<'a>(candidates: &[&'a Allocation], ask: &ResourceVector) -> Vec<&'a Allocation> {
    let mut ranked: Vec<(f64, &'a Allocation)> = candidates
        .iter()
        .map(|alloc| (resource_distance(&alloc.resources, ask), *alloc))
        .collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let mut freed = ResourceVector::new();
    let mut kept = Vec::with_capacity(ranked.len());

    for (_, alloc) in ranked {
        freed.accumulate(&alloc.resources);
        kept.push(alloc);
        if freed.meets_requirements(ask) {
            break;
        }
    }

    debug!(
        before = candidates.len(),
        after = kept.len(),
        freed = %freed,
        "Minimized preemption set"
    );

    kept
}
