//! Schedule Records
//!
//! The persistent per-(learner, item) scheduling state:
//! - Learning stage progression (New → Learning → Review → Graduated)
//! - Interval and ease factor history
//! - Derived success-rate signals consumed by the calculator

mod record;

pub use record::{
    LearningStage, ScheduleRecord, GRADUATION_THRESHOLD_DAYS, REVIEW_THRESHOLD_DAYS,
};
