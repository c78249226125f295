//! Preemption victim selection for node-level admission control.
//!
//! `alloc-preemption` decides which running allocations on a node to evict so
//! that a higher-priority pending workload's resource ask fits, while evicting
//! as little as possible. It is pure computation: it never talks to nodes and
//! never mutates the allocations it is given.
//!
//! # Features
//!
//! - **Priority Band**: Only allocations whose job priority is below
//!   `requesting + band` (default 10) are considered
//! - **Nearest-Fit Selection**: Lowest priority groups first, closest resource
//!   shape first within a group
//! - **Minimization**: Redundant picks are dropped after selection
//! - **Multi-Dimensional Resources**: CPU, memory, disk, IOPS and network
//!   bandwidth
//!
//! # Example
//!
//! ```rust
//! use alloc_preemption::{preemptible_allocations, Allocation, AllocationId, ResourceVector};
//!
//! let running = vec![
//!     Allocation::new(AllocationId::new("batch-1"), 5).with_resources(
//!         ResourceVector::new().with_cpu(600).with_memory_mb(1200).with_disk_mb(2000),
//!     ),
//!     Allocation::new(AllocationId::new("batch-2"), 5).with_resources(
//!         ResourceVector::new().with_cpu(200).with_memory_mb(400).with_disk_mb(500),
//!     ),
//! ];
//!
//! let ask = ResourceVector::new()
//!     .with_cpu(500)
//!     .with_memory_mb(1024)
//!     .with_disk_mb(2048);
//!
//! match preemptible_allocations(10, &running, &ask) {
//!     Some(victims) => println!("Evict {} allocations", victims.len()),
//!     None => println!("Cannot make room, leave the node alone"),
//! }
//! ```
//!
//! # Configuration
//!
//! A [`Preemptor`] carries a [`PreemptionConfig`] that can be loaded from JSON
//! and swapped at runtime:
//!
//! ```rust
//! use alloc_preemption::{PreemptionConfig, Preemptor, ResourceVector};
//!
//! let config = PreemptionConfig::from_json(r#"{"priority_band": 5, "max_victims": 8}"#)?;
//! let preemptor = Preemptor::new(config)?;
//!
//! let plan = preemptor.plan(50, &[], &ResourceVector::new().with_cpu(100));
//! assert!(!plan.satisfies_request);
//!
//! preemptor.update_config(preemptor.config().with_enabled(false))?;
//! # Ok::<(), alloc_preemption::PreemptionError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Preemptor                   │
//! │  ┌────────────┐  ┌──────────┐  ┌──────────┐  │
//! │  │ Filter &   │─▶│  Greedy  │─▶│ Minimize │  │
//! │  │ Group      │  │  Select  │  │          │  │
//! │  └────────────┘  └──────────┘  └──────────┘  │
//! │                       │              │       │
//! │                  ┌────┴──────────────┴────┐  │
//! │                  │   Resource Distance    │  │
//! │                  └────────────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod distance;
pub mod error;
pub mod grouping;
pub mod minimize;
pub mod preemptor;
pub mod selector;
pub mod types;

// Re-export main types
pub use distance::resource_distance;
pub use error::{PreemptionError, Result};
pub use grouping::{PriorityGroup, filter_and_group, is_eligible};
pub use minimize::minimize;
pub use preemptor::{PreemptionPlan, Preemptor, preemptible_allocations};
pub use selector::{GreedySelection, select_greedy};
pub use types::{
    Allocation, AllocationId, DEFAULT_PRIORITY_BAND, NetworkResource, PreemptionConfig,
    ResourceVector,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{PreemptionError, Result};
    pub use crate::preemptor::{PreemptionPlan, Preemptor, preemptible_allocations};
    pub use crate::types::{
        Allocation, AllocationId, NetworkResource, PreemptionConfig, ResourceVector,
    };
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn alloc(id: &str, priority: i32, resources: ResourceVector) -> Allocation {
        Allocation::new(AllocationId::new(id), priority)
            .with_job(format!("job-{id}"))
            .with_resources(resources)
    }

    #[test]
    fn full_preemption_workflow() {
        let running = vec![
            alloc(
                "a",
                5,
                ResourceVector::new()
                    .with_cpu(600)
                    .with_memory_mb(1200)
                    .with_disk_mb(2000),
            ),
            alloc(
                "b",
                5,
                ResourceVector::new()
                    .with_cpu(200)
                    .with_memory_mb(400)
                    .with_disk_mb(500),
            ),
        ];
        let ask = ResourceVector::new()
            .with_cpu(500)
            .with_memory_mb(1024)
            .with_disk_mb(2048);

        // A is the closer fit.
        let da = resource_distance(&running[0].resources, &ask);
        let db = resource_distance(&running[1].resources, &ask);
        assert!(da < db);

        let mut groups = filter_and_group(10, &running, DEFAULT_PRIORITY_BAND);
        assert_eq!(groups.len(), 1);

        let greedy = select_greedy(&mut groups, &ask);
        assert!(greedy.met);
        let picked: Vec<&str> = greedy.candidates.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(picked, vec!["a", "b"]);

        let kept = minimize(&greedy.candidates, &ask);
        let kept: Vec<&str> = kept.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(kept, vec!["b", "a"]);

        let victims = preemptible_allocations(10, &running, &ask);
        assert_eq!(victims.map(|v| v.len()), Some(2));
    }

    #[test]
    fn priority_tiers_are_respected() {
        let running = vec![
            alloc("system", 100, ResourceVector::new().with_cpu(4000)),
            alloc("service", 60, ResourceVector::new().with_cpu(1000)),
            alloc("batch", 20, ResourceVector::new().with_cpu(1000)),
            alloc("best-effort", 1, ResourceVector::new().with_cpu(1000)),
        ];
        let ask = ResourceVector::new().with_cpu(2000);

        // A priority-45 job can touch batch and best-effort, not service or system.
        let plan = Preemptor::with_defaults().plan(45, &running, &ask);
        assert!(plan.satisfies_request);
        let mut ids: Vec<&str> = plan.victims.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["batch", "best-effort"]);

        // A priority-5 job only reaches best-effort, which is not enough.
        assert!(Preemptor::with_defaults().plan(5, &running, &ask).victims.is_empty());
    }

    #[test]
    fn lowest_priority_preferred_over_better_fit() {
        let running = vec![
            alloc("exact-fit", 9, ResourceVector::new().with_cpu(1000)),
            alloc("oversized", 1, ResourceVector::new().with_cpu(3000)),
        ];
        let ask = ResourceVector::new().with_cpu(1000);

        let victims = preemptible_allocations(10, &running, &ask).unwrap_or_default();

        assert_eq!(victims.len(), 1);
        assert_eq!(victims[0].id.as_str(), "oversized");
    }

    #[test]
    fn plan_serializable_for_audit() {
        let running = vec![alloc("a", 1, ResourceVector::new().with_cpu(100))];
        let ask = ResourceVector::new().with_cpu(100);

        let plan = Preemptor::with_defaults().plan(10, &running, &ask);
        let record = serde_json::json!({
            "victims": plan.victims.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
            "freed": plan.freed_resources,
            "decided_at": plan.decided_at,
        });

        assert_eq!(record["victims"][0], "a");
        assert_eq!(record["freed"]["cpu"], 100);
    }

    #[test]
    fn empty_node_cannot_make_room() {
        let ask = ResourceVector::new().with_cpu(1);
        assert!(preemptible_allocations(10, &[], &ask).is_none());
    }
}
