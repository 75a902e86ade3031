//! Adaptive difficulty selector.
//!
//! A small state machine over easy/medium/hard, keyed on the difficulty the
//! learner currently sits at. Promotion needs sustained accuracy plus a
//! stability signal (consistency when leaving easy, positive learning
//! velocity when leaving medium); demotion triggers on low accuracy.

use crate::config::DifficultyParams;
use crate::modeling::stats;
use crate::types::{AggregatedMetrics, Difficulty, DifficultySelection, QuizSessionRecord};

/// Pick the next difficulty from recent performance.
///
/// `recent_sessions` must be ordered by completion time, oldest first; only
/// the last `params.window` sessions are considered. With fewer than
/// `params.min_sessions` sessions the selector has nothing to adapt to and
/// returns the medium default.
pub fn select_difficulty(
    metrics: &AggregatedMetrics,
    recent_sessions: &[QuizSessionRecord],
    params: &DifficultyParams,
) -> DifficultySelection {
    if recent_sessions.len() < params.min_sessions {
        return DifficultySelection {
            difficulty: Difficulty::Medium,
            confidence: params.default_confidence,
        };
    }

    let start = recent_sessions.len().saturating_sub(params.window);
    let window = &recent_sessions[start..];

    let easy_acc = window_accuracy(window, Difficulty::Easy);
    let medium_acc = window_accuracy(window, Difficulty::Medium);
    let hard_acc = window_accuracy(window, Difficulty::Hard);

    let velocity = learning_velocity(window);
    let consistency = consistency(window);

    match metrics.predicted_difficulty {
        Difficulty::Easy => {
            if easy_acc.unwrap_or(0.0) >= params.promote_easy_accuracy
                && consistency > params.promote_easy_consistency
            {
                DifficultySelection {
                    difficulty: Difficulty::Medium,
                    confidence: 0.7,
                }
            } else {
                DifficultySelection {
                    difficulty: Difficulty::Easy,
                    confidence: easy_acc.unwrap_or(params.default_confidence),
                }
            }
        }
        Difficulty::Medium => {
            let acc = medium_acc.unwrap_or(0.0);
            if acc >= params.promote_medium_accuracy && velocity > params.promote_medium_velocity {
                DifficultySelection {
                    difficulty: Difficulty::Hard,
                    confidence: 0.8,
                }
            } else if acc < params.demote_medium_accuracy && velocity < 0.0 {
                DifficultySelection {
                    difficulty: Difficulty::Easy,
                    confidence: acc,
                }
            } else {
                DifficultySelection {
                    difficulty: Difficulty::Medium,
                    confidence: acc,
                }
            }
        }
        Difficulty::Hard => {
            let acc = hard_acc.unwrap_or(0.0);
            if acc < params.demote_hard_accuracy {
                DifficultySelection {
                    difficulty: Difficulty::Medium,
                    confidence: acc,
                }
            } else {
                DifficultySelection {
                    difficulty: Difficulty::Hard,
                    confidence: acc,
                }
            }
        }
    }
}

/// Least-squares slope of per-session accuracy fractions; positive means the
/// learner is improving. Needs at least 3 sessions with answered questions.
pub fn learning_velocity(sessions: &[QuizSessionRecord]) -> f64 {
    let accuracies = session_accuracies(sessions);
    if accuracies.len() < 3 {
        return 0.0;
    }
    stats::linear_slope(&accuracies)
}

/// How stable recent session accuracy has been, in [0, 1]. A spread of half
/// a standard deviation already halves the score.
fn consistency(sessions: &[QuizSessionRecord]) -> f64 {
    if sessions.len() < 2 {
        return 0.5;
    }

    let accuracies = session_accuracies(sessions);
    if accuracies.is_empty() {
        return 0.5;
    }

    (1.0 - stats::std_dev(&accuracies) * 2.0).max(0.0)
}

fn session_accuracies(sessions: &[QuizSessionRecord]) -> Vec<f64> {
    sessions
        .iter()
        .filter(|s| s.total_questions > 0)
        .map(|s| s.accuracy())
        .collect()
}

/// Accuracy across the window for one difficulty band, `None` when that band
/// was never attempted in the window.
fn window_accuracy(sessions: &[QuizSessionRecord], difficulty: Difficulty) -> Option<f64> {
    let mut correct = 0u32;
    let mut total = 0u32;
    for s in sessions.iter().filter(|s| s.difficulty == difficulty) {
        correct += s.score;
        total += s.total_questions;
    }
    if total == 0 {
        None
    } else {
        Some(correct as f64 / total as f64)
    }
}
