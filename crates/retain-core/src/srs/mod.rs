//! Spaced-Repetition Scheduling Module
//!
//! An ease-factor interval scheduler in the SM-2 family, extended with:
//! - Natural ease decay modeling gradual forgetting
//! - A forgiveness factor that softens lapse penalties for learners with
//!   a strong history
//! - Logarithmic damping of long intervals to prevent runaway growth
//! - Consistency and confidence bonuses for sustained correct streaks
//!
//! The calculator is pure: no clock, no store. Callers pass `now` in, so
//! tests can fix time.

mod calculator;
mod parameters;

pub use calculator::{CalculatorError, ReviewInput, ReviewOutcome, SchedulingCalculator};
pub use parameters::{SchedulerConfig, DEFAULT_EASE, MAX_EASE, MIN_EASE};
