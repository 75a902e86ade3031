//! Metrics aggregator: folds completed quiz sessions into the running
//! per-user counters.
//!
//! Updates are increment-based and deliberately not idempotent: replaying
//! the same session double-counts. The caller owns deduplication and must
//! serialize concurrent updates for one user.

use crate::types::{AggregatedMetrics, Difficulty, QuizSessionRecord};

/// Fold one completed session into the counters.
///
/// Inputs are assumed well-formed (`score <= total_questions`); the
/// aggregator performs no validation.
pub fn record_session(metrics: &mut AggregatedMetrics, session: &QuizSessionRecord) {
    metrics.total_quizzes += 1;
    metrics.total_questions += session.total_questions;
    metrics.correct_answers += session.score;

    match session.difficulty {
        Difficulty::Easy => {
            metrics.easy_attempts += session.total_questions;
            metrics.easy_correct += session.score;
        }
        Difficulty::Medium => {
            metrics.medium_attempts += session.total_questions;
            metrics.medium_correct += session.score;
        }
        Difficulty::Hard => {
            metrics.hard_attempts += session.total_questions;
            metrics.hard_correct += session.score;
        }
    }

    let study_minutes = session.duration_secs as f64 / 60.0;
    let n = metrics.total_quizzes as f64;
    metrics.avg_study_time = (metrics.avg_study_time * (n - 1.0) + study_minutes) / n;

    update_streak(metrics, session);
    metrics.last_activity = Some(session.completed_at);
}

/// Fold one topic-tagged question result into the per-topic tallies.
pub fn record_topic_result(metrics: &mut AggregatedMetrics, topic: &str, correct: bool) {
    let stats = metrics.topic_performance.entry(topic.to_string()).or_default();
    stats.total += 1;
    if correct {
        stats.correct += 1;
    }
}

fn update_streak(metrics: &mut AggregatedMetrics, session: &QuizSessionRecord) {
    let today = session.completed_at.date_naive();

    metrics.study_streak = match metrics.last_activity {
        Some(last) => {
            // Calendar days, not elapsed hours: a 23:59 -> 00:01 pair still
            // counts as consecutive days.
            match (today - last.date_naive()).num_days() {
                0 => metrics.study_streak,
                1 => metrics.study_streak + 1,
                _ => 1,
            }
        }
        None => 1,
    };

    metrics.longest_streak = metrics.longest_streak.max(metrics.study_streak);
}
