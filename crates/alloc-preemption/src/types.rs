//! Core types for preemption planning.
//!
//! This module provides the value types used throughout alloc-preemption:
//! - [`ResourceVector`]: Multi-dimensional resource quantity (ask or usage)
//! - [`NetworkResource`]: A network descriptor carrying bandwidth
//! - [`Allocation`]: A running workload instance that may be preempted
//! - [`PreemptionConfig`]: Tunables for victim selection

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PreemptionError, Result};

/// Default eligibility window above the requesting job's priority.
pub const DEFAULT_PRIORITY_BAND: i32 = 10;

/// Unique identifier for an allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationId(String);

impl AllocationId {
    /// Creates a new allocation ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new random allocation ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AllocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A network descriptor with its reserved bandwidth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NetworkResource {
    /// Device name, e.g. `eth0`.
    pub device: String,
    /// Bandwidth in megabits.
    pub mbits: u64,
}

impl NetworkResource {
    /// Creates a new network descriptor.
    #[must_use]
    pub fn new(device: impl Into<String>, mbits: u64) -> Self {
        Self {
            device: device.into(),
            mbits,
        }
    }
}

/// A multi-dimensional resource quantity.
///
/// Used both for what an allocation occupies and for what a pending workload
/// asks for. Only the first entry of `networks` takes part in comparison and
/// accumulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourceVector {
    /// CPU in MHz.
    pub cpu: u64,
    /// Memory in megabytes.
    pub memory_mb: u64,
    /// Disk in megabytes.
    pub disk_mb: u64,
    /// Disk IO operations per second.
    pub iops: u64,
    /// Network descriptors.
    pub networks: Vec<NetworkResource>,
}

impl ResourceVector {
    /// Creates an empty resource vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the CPU in MHz.
    #[must_use]
    pub const fn with_cpu(mut self, cpu: u64) -> Self {
        self.cpu = cpu;
        self
    }

    /// Sets the memory in megabytes.
    #[must_use]
    pub const fn with_memory_mb(mut self, memory_mb: u64) -> Self {
        self.memory_mb = memory_mb;
        self
    }

    /// Sets the disk in megabytes.
    #[must_use]
    pub const fn with_disk_mb(mut self, disk_mb: u64) -> Self {
        self.disk_mb = disk_mb;
        self
    }

    /// Sets the IOPS.
    #[must_use]
    pub const fn with_iops(mut self, iops: u64) -> Self {
        self.iops = iops;
        self
    }

    /// Appends a network descriptor.
    #[must_use]
    pub fn with_network(mut self, device: impl Into<String>, mbits: u64) -> Self {
        self.networks.push(NetworkResource::new(device, mbits));
        self
    }

    /// Returns the first network descriptor, the only one that is compared.
    #[must_use]
    pub fn first_network(&self) -> Option<&NetworkResource> {
        self.networks.first()
    }

    /// Adds `other` into this vector in place.
    ///
    /// Scalars are summed. For networks, the first descriptors' bandwidth is
    /// summed when both sides have one; an empty side adopts `other`'s first
    /// descriptor.
    pub fn accumulate(&mut self, other: &Self) {
        self.cpu = self.cpu.saturating_add(other.cpu);
        self.memory_mb = self.memory_mb.saturating_add(other.memory_mb);
        self.disk_mb = self.disk_mb.saturating_add(other.disk_mb);
        self.iops = self.iops.saturating_add(other.iops);

        if let Some(delta) = other.networks.first() {
            match self.networks.first_mut() {
                Some(net) => net.mbits = net.mbits.saturating_add(delta.mbits),
                None => self.networks.push(delta.clone()),
            }
        }
    }

    /// Returns the sum of these resources and another.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.accumulate(other);
        result
    }

    /// Checks whether these resources meet or exceed `want` in every dimension.
    ///
    /// Network bandwidth is only compared when both sides carry a network
    /// descriptor; otherwise it is not checked at all.
    ///
    /// ```rust
    /// use alloc_preemption::ResourceVector;
    ///
    /// let have = ResourceVector::new().with_cpu(1000).with_memory_mb(512);
    /// let want = ResourceVector::new().with_cpu(500).with_network("eth0", 100);
    /// assert!(have.meets_requirements(&want));
    /// ```
    #[must_use]
    pub fn meets_requirements(&self, want: &Self) -> bool {
        if self.cpu < want.cpu {
            return false;
        }
        if self.memory_mb < want.memory_mb {
            return false;
        }
        if self.disk_mb < want.disk_mb {
            return false;
        }
        if self.iops < want.iops {
            return false;
        }
        if let (Some(have), Some(needed)) = (self.first_network(), want.first_network()) {
            if have.mbits < needed.mbits {
                return false;
            }
        }
        true
    }

    /// Returns true if every dimension is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cpu == 0
            && self.memory_mb == 0
            && self.disk_mb == 0
            && self.iops == 0
            && self.networks.iter().all(|n| n.mbits == 0)
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cpu={} memory_mb={} disk_mb={} iops={}",
            self.cpu, self.memory_mb, self.disk_mb, self.iops
        )?;
        if let Some(net) = self.first_network() {
            write!(f, " mbits={}", net.mbits)?;
        }
        Ok(())
    }
}

/// A running workload instance on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation identifier.
    pub id: AllocationId,
    /// Job that owns this allocation.
    pub job_id: String,
    /// Priority of the owning job. Higher is more important.
    pub job_priority: i32,
    /// Resources the allocation currently occupies.
    pub resources: ResourceVector,
}

impl Allocation {
    /// Creates a new allocation with no resources.
    #[must_use]
    pub fn new(id: AllocationId, job_priority: i32) -> Self {
        Self {
            id,
            job_id: String::new(),
            job_priority,
            resources: ResourceVector::new(),
        }
    }

    /// Sets the owning job ID.
    #[must_use]
    pub fn with_job(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = job_id.into();
        self
    }

    /// Sets the occupied resources.
    #[must_use]
    pub fn with_resources(mut self, resources: ResourceVector) -> Self {
        self.resources = resources;
        self
    }
}

/// Configuration for victim selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreemptionConfig {
    /// Allocations whose job priority is at least `requesting + priority_band`
    /// are never preempted.
    pub priority_band: i32,
    /// Plans needing more victims than this are reported infeasible.
    /// Unlimited when `None`.
    pub max_victims: Option<usize>,
    /// Whether preemption is enabled at all.
    pub enabled: bool,
}

impl Default for PreemptionConfig {
    fn default() -> Self {
        Self {
            priority_band: DEFAULT_PRIORITY_BAND,
            max_victims: None,
            enabled: true,
        }
    }
}

impl PreemptionConfig {
    /// Creates a new preemption config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a config from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or the config is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the config for values that can never produce a plan.
    ///
    /// # Errors
    ///
    /// Returns error if `max_victims` is set to zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_victims == Some(0) {
            return Err(PreemptionError::InvalidConfig {
                reason: "max_victims must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Sets the priority band.
    #[must_use]
    pub const fn with_priority_band(mut self, band: i32) -> Self {
        self.priority_band = band;
        self
    }

    /// Caps the number of victims per plan.
    #[must_use]
    pub const fn with_max_victims(mut self, max: usize) -> Self {
        self.max_victims = Some(max);
        self
    }

    /// Enables or disables preemption.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
