//! Engine configuration.
//!
//! One `PlannerConfig` is constructed at process start and passed explicitly
//! into every component that needs a threshold — there is no global mutable
//! state and no re-reading of configuration on the hot path.

use std::time::Duration;

use crate::{EgressError, EgressResult};

// ── AccessibilityLimits ───────────────────────────────────────────────────────

/// Thresholds a path segment must satisfy to count as accessible.
///
/// Defaults follow common barrier-free construction standards: 1.2 m
/// corridor width, 5 % slope, 2 cm step height.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessibilityLimits {
    pub min_width_m: f32,
    pub max_slope: f32,
    pub max_step_m: f32,
}

impl Default for AccessibilityLimits {
    fn default() -> Self {
        Self {
            min_width_m: 1.2,
            max_slope: 0.05,
            max_step_m: 0.02,
        }
    }
}

// ── PlannerConfig ─────────────────────────────────────────────────────────────

/// Top-level planning configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Period of the dynamic re-planning loop.  Default: 500 ms.
    pub replan_interval: Duration,

    /// Multiplier applied to every fire zone's radius per replanning tick.
    /// Must be ≥ 1.0 — hazards never shrink.
    pub fire_growth_factor: f32,

    /// Hazard zones older than this are pruned on the next opportunistic
    /// sweep.  Default: 5 minutes.
    pub max_zone_age: Duration,

    /// Soft budget a search is expected to stay under.  The search reports
    /// its own response time; callers compare against this.
    pub search_budget: Duration,

    /// Planar tolerance when comparing nodes of successive plans for the
    /// path-changed test.  Default: 1 m.
    pub node_match_tolerance_m: f32,

    /// ETA multiplier reported with accessible plans (30 % slower).
    pub accessible_speed_multiplier: f32,

    pub limits: AccessibilityLimits,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            replan_interval: Duration::from_millis(500),
            fire_growth_factor: 1.1,
            max_zone_age: Duration::from_secs(300),
            search_budget: Duration::from_secs(1),
            node_match_tolerance_m: 1.0,
            accessible_speed_multiplier: 0.7,
            limits: AccessibilityLimits::default(),
        }
    }
}

impl PlannerConfig {
    /// Reject configurations that would violate engine invariants.
    pub fn validate(&self) -> EgressResult<()> {
        if self.fire_growth_factor < 1.0 {
            return Err(EgressError::Config(format!(
                "fire_growth_factor must be >= 1.0, got {}",
                self.fire_growth_factor
            )));
        }
        if self.replan_interval.is_zero() {
            return Err(EgressError::Config(
                "replan_interval must be non-zero".into(),
            ));
        }
        if self.node_match_tolerance_m <= 0.0 {
            return Err(EgressError::Config(format!(
                "node_match_tolerance_m must be positive, got {}",
                self.node_match_tolerance_m
            )));
        }
        Ok(())
    }
}
