//! Scheduler Parameters
//!
//! Every heuristic coefficient of the interval calculator, exposed as
//! configuration. The defaults are tuned starting points, not load-bearing
//! constants; deployments can override any of them.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Lower bound for the ease factor (SM-2 lineage floor)
pub const MIN_EASE: f64 = 1.3;

/// Upper bound for the ease factor
pub const MAX_EASE: f64 = 3.0;

/// Ease factor assigned to items entering the scheduler
pub const DEFAULT_EASE: f64 = 2.5;

// ============================================================================
// SCHEDULER CONFIG
// ============================================================================

/// Tunable coefficients for [`SchedulingCalculator`](super::SchedulingCalculator).
///
/// Grouped by the algorithm step they feed:
/// ease adjustment, lapse handling, interval growth tiers, and the
/// adaptive multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Ease factor floor
    pub min_ease: f64,
    /// Ease factor ceiling
    pub max_ease: f64,
    /// Ease factor for brand-new items; also the ease-scale pivot
    pub default_ease: f64,

    /// Fixed ease decay applied on every review before other adjustments
    pub natural_decay: f64,
    /// Base ease bonus for a correct answer on an easy item (difficulty <= 2)
    pub easy_bonus: f64,
    /// Extra ease per consecutive correct answer on easy items
    pub consistency_bonus_step: f64,
    /// Cap on the accumulated consistency bonus
    pub consistency_bonus_cap: f64,
    /// Ease decrease per difficulty point for hard-but-correct items (difficulty >= 4)
    pub hard_correct_penalty: f64,

    /// Base ease penalty for an incorrect answer, before forgiveness
    pub lapse_penalty: f64,
    /// How strongly the historical success rate softens the lapse penalty
    pub forgiveness_weight: f64,

    /// Interval reduction factor for incorrect answers
    pub lapse_factor: f64,
    /// Relaxation of the lapse factor per unit of historical success rate
    pub lapse_relief: f64,
    /// Interval growth factor for easy items (difficulty <= 2)
    pub easy_growth: f64,
    /// Interval growth factor for medium items (difficulty == 3)
    pub medium_growth: f64,
    /// Interval growth factor for hard-but-correct items (difficulty >= 4)
    pub hard_growth: f64,

    /// Interval above which logarithmic damping kicks in
    pub damping_threshold_days: u32,
    /// Strength of the logarithmic damping term
    pub damping_strength: f64,
    /// Confidence boost per consecutive correct answer beyond three
    pub confidence_step: f64,
    /// Cap on the accumulated confidence boost
    pub confidence_cap: f64,
    /// Interval boost per unit of historical success rate
    pub performance_boost: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease: MIN_EASE,
            max_ease: MAX_EASE,
            default_ease: DEFAULT_EASE,

            natural_decay: 0.02,
            easy_bonus: 0.15,
            consistency_bonus_step: 0.02,
            consistency_bonus_cap: 0.10,
            hard_correct_penalty: 0.01,

            lapse_penalty: 0.2,
            forgiveness_weight: 0.5,

            lapse_factor: 0.5,
            lapse_relief: 0.2,
            easy_growth: 2.5,
            medium_growth: 2.0,
            hard_growth: 1.5,

            damping_threshold_days: 21,
            damping_strength: 0.15,
            confidence_step: 0.05,
            confidence_cap: 0.20,
            performance_boost: 0.10,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
