//! Retain Scheduler Benchmarks
//!
//! Benchmarks for the pure interval calculator using Criterion.
//! Run with: cargo bench -p retain-core

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use retain_core::{ReviewInput, SchedulingCalculator};

fn bench_single_review(c: &mut Criterion) {
    let calculator = SchedulingCalculator::default();
    let now = Utc::now();

    c.bench_function("compute_next_correct", |b| {
        b.iter(|| {
            black_box(calculator.compute_next(&ReviewInput {
                current_interval_days: 10,
                was_correct: true,
                difficulty: 3,
                ease_factor: 2.5,
                consecutive_correct: 5,
                historical_success_rate: 0.85,
                now,
            }))
        })
    });

    c.bench_function("compute_next_lapse", |b| {
        b.iter(|| {
            black_box(calculator.compute_next(&ReviewInput {
                current_interval_days: 30,
                was_correct: false,
                difficulty: 4,
                ease_factor: 2.1,
                consecutive_correct: 0,
                historical_success_rate: 0.6,
                now,
            }))
        })
    });
}

fn bench_review_streak(c: &mut Criterion) {
    let calculator = SchedulingCalculator::default();
    let now = Utc::now();

    // A learner working through 100 reviews with an 80% hit rate
    c.bench_function("compute_next_streak_100", |b| {
        b.iter(|| {
            let mut interval = 0u32;
            let mut ease = 2.5;
            let mut consecutive = 0u32;
            for step in 0u32..100 {
                let correct = step % 5 != 0;
                let outcome = calculator
                    .compute_next(&ReviewInput {
                        current_interval_days: interval,
                        was_correct: correct,
                        difficulty: (step % 5 + 1) as u8,
                        ease_factor: ease,
                        consecutive_correct: consecutive,
                        historical_success_rate: 0.8,
                        now,
                    })
                    .expect("valid input");
                interval = outcome.interval_days;
                ease = outcome.ease_factor;
                consecutive = if correct { consecutive + 1 } else { 0 };
            }
            black_box(interval)
        })
    });
}

criterion_group!(benches, bench_single_review, bench_review_streak);
criterion_main!(benches);
