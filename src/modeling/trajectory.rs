//! Progress trajectory classification.
//!
//! Fits a linear trend to session accuracy over time and cross-checks the
//! slope against the gap between recent and historical averages. Both
//! signals must agree for a directional call; when they disagree the sign
//! of the recent-vs-historical gap decides at reduced confidence.

use crate::config::TrajectoryParams;
use crate::modeling::stats;
use crate::types::{QuizSessionRecord, TrajectoryAssessment, TrajectoryCategory, TrendMetrics, TrendPoint};

pub fn classify_trajectory(
    sessions: &[QuizSessionRecord],
    params: &TrajectoryParams,
) -> TrajectoryAssessment {
    if sessions.len() < params.min_sessions {
        return TrajectoryAssessment {
            category: TrajectoryCategory::InsufficientData,
            confidence: 0.0,
            trend_data: Vec::new(),
            metrics: None,
        };
    }

    let mut ordered: Vec<&QuizSessionRecord> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.completed_at);

    // Percentage accuracy per session; empty sessions count as 0.
    let accuracies: Vec<f64> = ordered.iter().map(|s| s.accuracy() * 100.0).collect();

    let slope = stats::linear_slope(&accuracies);

    let recent_window = params.recent_window.min(accuracies.len());
    let recent_avg = stats::mean(&accuracies[accuracies.len() - recent_window..]);
    let historical_avg = if accuracies.len() > recent_window {
        stats::mean(&accuracies[..accuracies.len() - recent_window])
    } else {
        recent_avg
    };

    let improvement = recent_avg - historical_avg;
    let variance = stats::std_dev(&accuracies);

    let (category, confidence) = if slope > params.slope_threshold
        && improvement > params.improvement_threshold
    {
        (
            TrajectoryCategory::Accelerating,
            (0.7 + slope / 20.0).min(0.95),
        )
    } else if slope < -params.slope_threshold && improvement < -params.improvement_threshold {
        (
            TrajectoryCategory::Regressing,
            (0.7 + slope.abs() / 20.0).min(0.95),
        )
    } else if slope.abs() <= params.slope_threshold
        && improvement.abs() <= params.improvement_threshold
    {
        let confidence = if variance < params.stable_variance {
            0.8
        } else {
            0.6
        };
        (TrajectoryCategory::Plateauing, confidence)
    } else if improvement > 0.0 {
        (TrajectoryCategory::Accelerating, 0.6)
    } else if improvement < 0.0 {
        (TrajectoryCategory::Regressing, 0.6)
    } else {
        (TrajectoryCategory::Plateauing, 0.5)
    };

    let trend_data = ordered
        .iter()
        .zip(&accuracies)
        .enumerate()
        .map(|(i, (s, &accuracy))| TrendPoint {
            session: i + 1,
            accuracy,
            date: Some(s.completed_at),
        })
        .collect();

    TrajectoryAssessment {
        category,
        confidence,
        trend_data,
        metrics: Some(TrendMetrics {
            slope,
            recent_avg,
            historical_avg,
            improvement,
            variance,
        }),
    }
}
