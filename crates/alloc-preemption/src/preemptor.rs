//! Preemptor for planning which allocations to evict.
//!
//! The [`Preemptor`] is responsible for:
//! - Filtering out allocations too important to preempt
//! - Running the greedy nearest-fit selection over priority groups
//! - Trimming redundant picks with the minimization pass
//! - Enforcing the configured victim limit
//!
//! It never evicts anything itself. Callers act on the returned
//! [`PreemptionPlan`].

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{PreemptionError, Result};
use crate::grouping::filter_and_group;
use crate::minimize::minimize;
use crate::selector::select_greedy;
use crate::types::{Allocation, PreemptionConfig, ResourceVector};

/// The decision produced for one preemption request.
#[derive(Debug, Clone, PartialEq)]
pub struct PreemptionPlan<'a> {
    /// Resources that were asked for.
    pub ask: ResourceVector,
    /// Allocations to evict. Empty when the request cannot be satisfied.
    pub victims: Vec<&'a Allocation>,
    /// Resources freed by evicting `victims`, or, for an infeasible plan,
    /// everything the selection managed to gather.
    pub freed_resources: ResourceVector,
    /// Whether evicting `victims` satisfies the ask.
    pub satisfies_request: bool,
    /// When the plan was computed.
    pub decided_at: DateTime<Utc>,
}

impl<'a> PreemptionPlan<'a> {
    fn feasible(ask: &ResourceVector, victims: Vec<&'a Allocation>) -> Self {
        let mut freed_resources = ResourceVector::new();
        for victim in &victims {
            freed_resources.accumulate(&victim.resources);
        }
        Self {
            ask: ask.clone(),
            victims,
            freed_resources,
            satisfies_request: true,
            decided_at: Utc::now(),
        }
    }

    fn infeasible(ask: &ResourceVector, gathered: ResourceVector) -> Self {
        Self {
            ask: ask.clone(),
            victims: Vec::new(),
            freed_resources: gathered,
            satisfies_request: false,
            decided_at: Utc::now(),
        }
    }

    /// Returns the number of victims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.victims.len()
    }

    /// Returns true if there are no victims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.victims.is_empty()
    }

    /// Returns the victims, or an error if the ask cannot be satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`PreemptionError::Infeasible`] when no feasible set exists.
    pub fn into_victims(self) -> Result<Vec<&'a Allocation>> {
        if self.satisfies_request {
            Ok(self.victims)
        } else {
            Err(PreemptionError::Infeasible {
                needed: self.ask.to_string(),
                available: self.freed_resources.to_string(),
            })
        }
    }
}

/// Plans preemptions under a shared, swappable configuration.
#[derive(Debug, Default)]
pub struct Preemptor {
    config: RwLock<PreemptionConfig>,
}

impl Preemptor {
    /// Creates a new preemptor with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn new(config: PreemptionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: RwLock::new(config),
        })
    }

    /// Creates a preemptor with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> PreemptionConfig {
        self.config.read().clone()
    }

    /// Replaces the configuration. In-flight plans keep the old one.
    ///
    /// # Errors
    ///
    /// Returns error if the new configuration is invalid; the old one stays.
    pub fn update_config(&self, config: PreemptionConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "Rejected preemption config update");
            return Err(e);
        }
        *self.config.write() = config;
        Ok(())
    }

    /// Computes which of `current` to evict so that `ask` fits.
    ///
    /// `current` must hold the allocations of a single node.
    #[must_use]
    pub fn plan<'a>(
        &self,
        job_priority: i32,
        current: &'a [Allocation],
        ask: &ResourceVector,
    ) -> PreemptionPlan<'a> {
        let config = self.config();

        if !config.enabled {
            debug!(job_priority, "Preemption disabled, no plan");
            return PreemptionPlan::infeasible(ask, ResourceVector::new());
        }

        let mut groups = filter_and_group(job_priority, current, config.priority_band);
        let greedy = select_greedy(&mut groups, ask);

        if !greedy.met {
            debug!(
                job_priority,
                ask = %ask,
                freeable = %greedy.freed,
                picked = greedy.candidates.len(),
                "No feasible preemption set"
            );
            return PreemptionPlan::infeasible(ask, greedy.freed);
        }

        let victims = minimize(&greedy.candidates, ask);

        if let Some(max_victims) = config.max_victims.filter(|max| victims.len() > *max) {
            warn!(
                job_priority,
                victims = victims.len(),
                max_victims,
                "Preemption plan exceeds victim limit"
            );
            return PreemptionPlan::infeasible(ask, greedy.freed);
        }

        let plan = PreemptionPlan::feasible(ask, victims);
        debug!(
            job_priority,
            ask = %ask,
            victims = plan.len(),
            freed = %plan.freed_resources,
            "Planned preemption"
        );
        plan
    }
}

/// Returns the allocations to preempt so that `ask` fits, using the default
/// configuration, or `None` if no eligible set can satisfy it.
#[must_use]
pub fn preemptible_allocations<'a>(
    job_priority: i32,
    current: &'a [Allocation],
    ask: &ResourceVector,
) -> Option<Vec<&'a Allocation>> {
    Preemptor::with_defaults()
        .plan(job_priority, current, ask)
        .into_victims()
        .ok()
}
