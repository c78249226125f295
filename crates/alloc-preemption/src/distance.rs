//! Resource distance between an allocation and an ask.

use crate::types::ResourceVector;

/// Relative difference of one dimension. Zero when nothing is asked for.
fn coordinate(ask: u64, have: u64) -> f64 {
    if ask == 0 {
        return 0.0;
    }
    let ask = ask as f64;
    (ask - have as f64) / ask
}

/// Returns how close `resource` is to `ask`. Lower is closer.
///
/// Each dimension contributes `(ask - resource) / ask`, or zero when the ask
/// for that dimension is zero. Network bandwidth contributes only when both
/// sides carry a network descriptor. The result is the Euclidean norm of the
/// five coordinates, so over- and under-provisioning by the same fraction
/// score the same.
///
/// ```rust
/// use alloc_preemption::{resource_distance, ResourceVector};
///
/// let ask = ResourceVector::new().with_cpu(500).with_memory_mb(1024);
/// assert!(resource_distance(&ask, &ask).abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn resource_distance(resource: &ResourceVector, ask: &ResourceVector) -> f64 {
    let cpu = coordinate(ask.cpu, resource.cpu);
    let memory = coordinate(ask.memory_mb, resource.memory_mb);
    let disk = coordinate(ask.disk_mb, resource.disk_mb);
    let iops = coordinate(ask.iops, resource.iops);
    let mbits = match (ask.first_network(), resource.first_network()) {
        (Some(want), Some(have)) => coordinate(want.mbits, have.mbits),
        _ => 0.0,
    };

    (cpu.powi(2) + memory.powi(2) + disk.powi(2) + iops.powi(2) + mbits.powi(2)).sqrt()
}
