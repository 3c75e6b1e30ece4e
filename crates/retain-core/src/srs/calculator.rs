//! Interval Calculator
//!
//! Pure computation of the next interval, ease factor, and due date for a
//! single answered review. All inputs arrive as arguments, including `now`,
//! so the calculator never touches a clock or a store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::parameters::SchedulerConfig;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Contract violations on calculator inputs.
///
/// Out-of-range inputs are caller errors and fail loudly; they are never
/// silently clamped (only the ease factor is clamped, to its documented
/// bounds).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CalculatorError {
    /// Difficulty outside the documented 1-5 scale
    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),
    /// Historical success rate outside 0.0..=1.0
    #[error("historical success rate must be within 0.0..=1.0, got {0}")]
    InvalidSuccessRate(f64),
    /// Ease factor that is not a finite positive number
    #[error("ease factor must be finite and positive, got {0}")]
    InvalidEaseFactor(f64),
}

// ============================================================================
// INPUT / OUTCOME
// ============================================================================

/// One answered review, as seen by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    /// Interval the item arrived with; 0 only before the first review
    pub current_interval_days: u32,
    /// Whether the learner answered correctly
    pub was_correct: bool,
    /// Item difficulty on the 1 (easy) to 5 (hard) scale
    pub difficulty: u8,
    /// Ease factor before this review
    pub ease_factor: f64,
    /// Run of correct answers before this one
    pub consecutive_correct: u32,
    /// Fraction of past answers that were correct, 0.0..=1.0
    pub historical_success_rate: f64,
    /// Review timestamp; the due date is computed relative to this
    pub now: DateTime<Utc>,
}

/// The calculator's verdict for one review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// Days until the next review, always >= 1
    pub interval_days: u32,
    /// Updated ease factor, clamped to the configured bounds
    pub ease_factor: f64,
    /// When the item is next due
    pub next_review_at: DateTime<Utc>,
}

// ============================================================================
// CALCULATOR
// ============================================================================

/// Pure interval/ease scheduler.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use retain_core::srs::{ReviewInput, SchedulingCalculator};
///
/// let calculator = SchedulingCalculator::default();
/// let outcome = calculator.compute_next(&ReviewInput {
///     current_interval_days: 0,
///     was_correct: true,
///     difficulty: 2,
///     ease_factor: 2.5,
///     consecutive_correct: 0,
///     historical_success_rate: 0.0,
///     now: Utc::now(),
/// })?;
/// assert_eq!(outcome.interval_days, 1);
/// # Ok::<(), retain_core::srs::CalculatorError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchedulingCalculator {
    config: SchedulerConfig,
}

impl SchedulingCalculator {
    /// Create a calculator with custom coefficients
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The active coefficient set
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Compute the next interval, ease factor, and due date for one review.
    ///
    /// Guarantees, for valid inputs:
    /// - the returned ease factor is within `[min_ease, max_ease]`
    /// - the returned interval is >= 1
    /// - an incorrect answer never grows the interval
    /// - a correct answer never shrinks it
    /// - `current_interval_days == 0` with a correct answer yields exactly 1
    ///   (bootstrap rule for the first-ever correct review)
    pub fn compute_next(&self, input: &ReviewInput) -> Result<ReviewOutcome, CalculatorError> {
        self.validate(input)?;

        let ease_factor = self.next_ease(input);
        let multiplier = self.interval_multiplier(input, ease_factor);

        let interval_days = if input.current_interval_days == 0 && input.was_correct {
            // First-ever correct review: always schedule for tomorrow
            1
        } else {
            let raw = (f64::from(input.current_interval_days) * multiplier).round();
            let mut days = raw.max(1.0) as u32;
            if !input.was_correct {
                // A lapse must never push the item further out
                days = days.min(input.current_interval_days.max(1));
            }
            days
        };

        Ok(ReviewOutcome {
            interval_days,
            ease_factor,
            next_review_at: input.now + Duration::days(i64::from(interval_days)),
        })
    }

    fn validate(&self, input: &ReviewInput) -> Result<(), CalculatorError> {
        if !(1..=5).contains(&input.difficulty) {
            return Err(CalculatorError::InvalidDifficulty(input.difficulty));
        }
        if !input.historical_success_rate.is_finite()
            || !(0.0..=1.0).contains(&input.historical_success_rate)
        {
            return Err(CalculatorError::InvalidSuccessRate(
                input.historical_success_rate,
            ));
        }
        if !input.ease_factor.is_finite() || input.ease_factor <= 0.0 {
            return Err(CalculatorError::InvalidEaseFactor(input.ease_factor));
        }
        Ok(())
    }

    /// Ease adjustment: natural decay, then the outcome-specific change,
    /// clamped to the configured bounds.
    fn next_ease(&self, input: &ReviewInput) -> f64 {
        let c = &self.config;

        // Gradual forgetting applies on every review, correct or not
        let mut ease = input.ease_factor - c.natural_decay;

        if input.was_correct {
            if input.difficulty <= 2 {
                let consistency = (c.consistency_bonus_step
                    * f64::from(input.consecutive_correct))
                .min(c.consistency_bonus_cap);
                ease += c.easy_bonus + consistency;
            } else if input.difficulty >= 4 {
                ease -= c.hard_correct_penalty * f64::from(input.difficulty);
            }
        } else {
            // Learners with a strong history are penalized less
            let forgiveness = c.forgiveness_weight * input.historical_success_rate;
            let penalty = c.lapse_penalty * (ease / c.min_ease).max(0.0).sqrt();
            ease -= penalty * (1.0 - forgiveness);
        }

        ease.clamp(c.min_ease, c.max_ease)
    }

    /// Combined interval multiplier: outcome/difficulty tier, ease scale,
    /// and the adaptive term.
    fn interval_multiplier(&self, input: &ReviewInput, new_ease: f64) -> f64 {
        let c = &self.config;

        let base = if !input.was_correct {
            // Steep reduction, slightly relaxed for learners with good history
            c.lapse_factor + c.lapse_relief * input.historical_success_rate
        } else if input.difficulty <= 2 {
            c.easy_growth
        } else if input.difficulty >= 4 {
            c.hard_growth
        } else {
            c.medium_growth
        };

        let mut multiplier = base * (new_ease / c.default_ease) * self.adaptive_multiplier(input);

        if input.was_correct {
            // A correct streak produces a non-decreasing interval sequence
            multiplier = multiplier.max(1.0);
        }
        multiplier
    }

    /// Adaptive term: logarithmic damping of long intervals, plus
    /// confidence and performance boosts on correct answers only (a lapse
    /// must not be inflated past its reduction factor).
    fn adaptive_multiplier(&self, input: &ReviewInput) -> f64 {
        let c = &self.config;
        let threshold = f64::from(c.damping_threshold_days.max(1));

        let mut adaptive = if f64::from(input.current_interval_days) > threshold {
            1.0 / (1.0 + c.damping_strength * (f64::from(input.current_interval_days) / threshold).ln())
        } else {
            1.0
        };

        if input.was_correct {
            if input.consecutive_correct > 3 {
                let confidence = (c.confidence_step
                    * f64::from(input.consecutive_correct - 3))
                .min(c.confidence_cap);
                adaptive *= 1.0 + confidence;
            }
            adaptive *= 1.0 + c.performance_boost * input.historical_success_rate;
        }

        adaptive
    }
}

// ============================================================================
// TESTS
// ============================================================================
