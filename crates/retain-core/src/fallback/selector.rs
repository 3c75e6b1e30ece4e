//! Fallback Selector
//!
//! Builds a prioritized candidate list from completed lessons, then splits
//! the pick between the highest-priority head (exploitation) and a shuffled
//! sample of the remainder (exploration) so sessions do not go stale on the
//! same high-priority set.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{ContentHistory, HistoryError};
use crate::session::ReviewItem;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Days after lesson completion during which recency still boosts priority
pub const RETENTION_WINDOW_DAYS: f64 = 30.0;

/// Share of the session taken directly from the priority head
pub const EXPLOIT_SHARE: f64 = 0.7;

/// Weight of the recency score in the priority blend
const RECENCY_WEIGHT: f64 = 0.7;

/// Weight of the difficulty score in the priority blend
const DIFFICULTY_WEIGHT: f64 = 0.3;

// ============================================================================
// CANDIDATE
// ============================================================================

/// One deduplicated content item with its completion recency
#[derive(Debug, Clone)]
struct Candidate {
    item_id: String,
    difficulty: u8,
    completed_at: DateTime<Utc>,
    days_since_completion: i64,
}

impl Candidate {
    /// Blend of recency (fresher is higher) and declared difficulty
    /// (harder is higher).
    fn priority_score(&self) -> f64 {
        let days = self.days_since_completion.max(0) as f64;
        let recency = ((RETENTION_WINDOW_DAYS - days) / RETENTION_WINDOW_DAYS).max(0.0);
        let difficulty = f64::from(self.difficulty) / 5.0;
        recency * RECENCY_WEIGHT + difficulty * DIFFICULTY_WEIGHT
    }

    /// Synthesize a transient review item. No schedule record is created
    /// here; fallback items stay unscheduled until actually answered.
    fn into_review_item(self, now: DateTime<Utc>) -> ReviewItem {
        let base_days_ahead = f64::from(6u8.saturating_sub(self.difficulty).max(1));
        let days = self.days_since_completion.max(0) as f64;
        let recency_factor = if days < 7.0 {
            (1.0 - days / 14.0).max(0.5)
        } else {
            0.5
        };
        let interval_days = ((base_days_ahead * recency_factor).round() as u32).max(1);

        ReviewItem {
            item_id: self.item_id,
            due_date: now + Duration::days(i64::from(interval_days)),
            difficulty: self.difficulty,
            interval_days,
        }
    }
}

// ============================================================================
// SELECTOR
// ============================================================================

/// Synthesizes review candidates from lesson-completion history.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSelector;

impl FallbackSelector {
    /// Create a selector
    pub fn new() -> Self {
        Self
    }

    /// Pick at most `limit` review items for `learner_id`.
    ///
    /// The shuffle for the exploration tail comes from the supplied `rng`,
    /// so callers can seed it for deterministic tests. Failures from the
    /// content collaborator degrade to an empty result; the caller maps
    /// that to an empty session.
    pub fn select<H, R>(
        &self,
        history: &H,
        learner_id: &str,
        limit: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<ReviewItem>
    where
        H: ContentHistory,
        R: Rng + ?Sized,
    {
        if limit == 0 {
            return Vec::new();
        }

        let candidates = match self.gather_candidates(history, learner_id, now) {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::warn!(learner_id, error = %err, "content history unavailable, no fallback candidates");
                return Vec::new();
            }
        };
        if candidates.is_empty() {
            tracing::debug!(learner_id, "no completed lessons, empty fallback selection");
            return Vec::new();
        }

        let mut ranked = candidates;
        ranked.sort_by(|a, b| {
            b.priority_score()
                .partial_cmp(&a.priority_score())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        // Exploitation head, then a uniformly shuffled exploration tail
        let exploit_count = ((limit as f64) * EXPLOIT_SHARE).ceil() as usize;
        let head_len = exploit_count.min(ranked.len());
        let mut tail: Vec<Candidate> = ranked.split_off(head_len);
        let mut picked = ranked;
        tail.shuffle(rng);
        picked.extend(tail.into_iter().take(limit - head_len));
        picked.truncate(limit);

        picked
            .into_iter()
            .map(|candidate| candidate.into_review_item(now))
            .collect()
    }

    /// Gather items from completed lessons, deduplicated by item id with
    /// the most recent completion winning.
    fn gather_candidates<H: ContentHistory>(
        &self,
        history: &H,
        learner_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Candidate>, HistoryError> {
        let lesson_ids = history.completed_lesson_ids(learner_id)?;

        let mut by_item: HashMap<String, Candidate> = HashMap::new();
        for lesson_id in &lesson_ids {
            let completed_at = history.completion_date(learner_id, lesson_id)?;
            let days_since_completion = (now - completed_at).num_days();

            for item in history.items_for_lesson(lesson_id)? {
                let candidate = Candidate {
                    item_id: item.item_id.clone(),
                    difficulty: item.difficulty.clamp(1, 5),
                    completed_at,
                    days_since_completion,
                };
                match by_item.get(&item.item_id) {
                    Some(existing) if existing.completed_at >= completed_at => {}
                    _ => {
                        by_item.insert(item.item_id, candidate);
                    }
                }
            }
        }

        Ok(by_item.into_values().collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::LessonItem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Scripted content history for tests
    struct FakeHistory {
        lessons: Vec<(String, DateTime<Utc>, Vec<LessonItem>)>,
        fail: bool,
    }

    impl FakeHistory {
        fn new(lessons: Vec<(&str, DateTime<Utc>, Vec<(&str, u8)>)>) -> Self {
            Self {
                lessons: lessons
                    .into_iter()
                    .map(|(id, at, items)| {
                        (
                            id.to_string(),
                            at,
                            items
                                .into_iter()
                                .map(|(item_id, difficulty)| LessonItem {
                                    item_id: item_id.to_string(),
                                    difficulty,
                                })
                                .collect(),
                        )
                    })
                    .collect(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                lessons: Vec::new(),
                fail: true,
            }
        }
    }

    impl ContentHistory for FakeHistory {
        fn completed_lesson_ids(&self, _learner_id: &str) -> crate::fallback::Result<Vec<String>> {
            if self.fail {
                return Err(HistoryError::Backend("content service down".to_string()));
            }
            Ok(self.lessons.iter().map(|(id, _, _)| id.clone()).collect())
        }

        fn items_for_lesson(&self, lesson_id: &str) -> crate::fallback::Result<Vec<LessonItem>> {
            self.lessons
                .iter()
                .find(|(id, _, _)| id == lesson_id)
                .map(|(_, _, items)| items.clone())
                .ok_or_else(|| HistoryError::UnknownLesson(lesson_id.to_string()))
        }

        fn completion_date(
            &self,
            _learner_id: &str,
            lesson_id: &str,
        ) -> crate::fallback::Result<DateTime<Utc>> {
            self.lessons
                .iter()
                .find(|(id, _, _)| id == lesson_id)
                .map(|(_, at, _)| *at)
                .ok_or_else(|| HistoryError::UnknownLesson(lesson_id.to_string()))
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_no_completed_lessons_yields_empty() {
        let history = FakeHistory::new(vec![]);
        let selector = FallbackSelector::new();
        let items = selector.select(&history, "learner-1", 10, Utc::now(), &mut rng());
        assert!(items.is_empty());
    }

    #[test]
    fn test_history_failure_degrades_to_empty() {
        let history = FakeHistory::failing();
        let selector = FallbackSelector::new();
        let items = selector.select(&history, "learner-1", 10, Utc::now(), &mut rng());
        assert!(items.is_empty());
    }

    #[test]
    fn test_never_returns_duplicates_and_respects_limit() {
        let now = Utc::now();
        // 3 lessons, 12 items, one item shared between lessons
        let history = FakeHistory::new(vec![
            (
                "lesson-1",
                now - Duration::days(2),
                vec![("a", 1), ("b", 2), ("c", 3), ("d", 4)],
            ),
            (
                "lesson-2",
                now - Duration::days(9),
                vec![("e", 5), ("f", 1), ("g", 2), ("a", 3)],
            ),
            (
                "lesson-3",
                now - Duration::days(20),
                vec![("h", 4), ("i", 5), ("j", 1), ("k", 2)],
            ),
        ]);
        let selector = FallbackSelector::new();

        for limit in [1usize, 5, 10, 11, 50] {
            let items = selector.select(&history, "learner-1", limit, now, &mut rng());
            // 11 distinct item ids in total
            assert_eq!(items.len(), limit.min(11));
            let ids: HashSet<&str> = items.iter().map(|i| i.item_id.as_str()).collect();
            assert_eq!(ids.len(), items.len(), "duplicate item at limit {limit}");
        }
    }

    #[test]
    fn test_dedup_keeps_most_recent_completion() {
        let now = Utc::now();
        let history = FakeHistory::new(vec![
            ("old", now - Duration::days(25), vec![("shared", 3)]),
            ("fresh", now - Duration::days(1), vec![("shared", 3)]),
        ]);
        let selector = FallbackSelector::new();
        let items = selector.select(&history, "learner-1", 5, now, &mut rng());
        assert_eq!(items.len(), 1);
        // Fresh completion: recency factor near 1, interval = base 3 days
        assert_eq!(items[0].interval_days, 3);
    }

    #[test]
    fn test_exploit_head_is_highest_priority() {
        let now = Utc::now();
        // "hot" is both recent and hard, so it must always be picked
        let history = FakeHistory::new(vec![
            ("lesson-1", now - Duration::days(1), vec![("hot", 5)]),
            (
                "lesson-2",
                now - Duration::days(28),
                vec![("cold-1", 1), ("cold-2", 1), ("cold-3", 1), ("cold-4", 1)],
            ),
        ]);
        let selector = FallbackSelector::new();
        for seed in 0..10u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let items = selector.select(&history, "learner-1", 2, now, &mut rng);
            assert!(items.iter().any(|i| i.item_id == "hot"), "seed {seed}");
        }
    }

    #[test]
    fn test_seeded_selection_is_deterministic() {
        let now = Utc::now();
        let history = FakeHistory::new(vec![(
            "lesson-1",
            now - Duration::days(3),
            vec![("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5), ("f", 3)],
        )]);
        let selector = FallbackSelector::new();

        let first = selector.select(&history, "learner-1", 4, now, &mut StdRng::seed_from_u64(7));
        let second = selector.select(&history, "learner-1", 4, now, &mut StdRng::seed_from_u64(7));
        let first_ids: Vec<&str> = first.iter().map(|i| i.item_id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn test_synthesized_interval_shape() {
        let now = Utc::now();
        let history = FakeHistory::new(vec![
            // Easy and fresh: base 5 days, recency ~1
            ("lesson-1", now - Duration::days(0), vec![("easy", 1)]),
            // Hard and stale: base 1 day, recency 0.5
            ("lesson-2", now - Duration::days(10), vec![("hard", 5)]),
        ]);
        let selector = FallbackSelector::new();
        let items = selector.select(&history, "learner-1", 10, now, &mut rng());

        let easy = items.iter().find(|i| i.item_id == "easy").unwrap();
        assert_eq!(easy.interval_days, 5);
        assert_eq!(easy.due_date, now + Duration::days(5));

        let hard = items.iter().find(|i| i.item_id == "hard").unwrap();
        assert_eq!(hard.interval_days, 1);
    }
}
