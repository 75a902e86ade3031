//! Composite mastery score.
//!
//! Blends overall accuracy, difficulty-weighted accuracy, practice volume,
//! and study streak into a single 0-100 figure. The split is
//! accuracy 40 / difficulty 30 / volume 15 / streak 15.

use crate::config::MasteryWeights;
use crate::types::{AggregatedMetrics, Difficulty};

/// Score current mastery from the aggregated counters. Returns 0 for a user
/// with no answered questions.
pub fn mastery_score(metrics: &AggregatedMetrics, weights: &MasteryWeights) -> f64 {
    if metrics.total_questions == 0 {
        return 0.0;
    }

    let accuracy_score = metrics.overall_accuracy() * weights.accuracy_points;

    let difficulty_score = (metrics.difficulty_accuracy(Difficulty::Easy) * weights.easy_weight
        + metrics.difficulty_accuracy(Difficulty::Medium) * weights.medium_weight
        + metrics.difficulty_accuracy(Difficulty::Hard) * weights.hard_weight)
        * weights.difficulty_points;

    let volume_bonus = (metrics.total_questions as f64 / weights.volume_target_questions
        * weights.volume_points)
        .min(weights.volume_points);

    let streak_bonus = (metrics.study_streak as f64 / weights.streak_target_days
        * weights.streak_points)
        .min(weights.streak_points);

    (accuracy_score + difficulty_score + volume_bonus + streak_bonus).clamp(0.0, 100.0)
}
