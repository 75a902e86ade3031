//! Learner-facing guidance derived from the aggregated metrics.
//!
//! Three consumers of the same counters: a narrative insights block for the
//! dashboard, a prioritized recommendation feed, and a pre-quiz performance
//! prediction. All of it is string assembly over thresholds; the numeric
//! heavy lifting lives in `mastery` and `modeling`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MasteryWeights;
use crate::mastery::mastery_score;
use crate::modeling::learning_velocity;
use crate::types::{AggregatedMetrics, Difficulty, QuizSessionRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningInsights {
    pub overall_status: String,
    pub strength_areas: Vec<String>,
    pub improvement_areas: Vec<String>,
    /// Absent when there is no recent session history to fit a trend to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_velocity: Option<String>,
    pub next_steps: Vec<String>,
    pub motivational_message: String,
    pub predictions: InsightPredictions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPredictions {
    pub next_optimal_difficulty: Difficulty,
    pub estimated_mastery_in_week: f64,
    pub questions_to_next_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    TargetedPractice,
    LevelUp,
    StreakSaver,
    MilestoneReview,
    DocumentPractice,
}

/// An uploaded study document, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: u8,
    pub topic: String,
    pub difficulty: Difficulty,
    pub reason: String,
    pub estimated_time: String,
    pub potential_gain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionConfidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePrediction {
    /// Expected score as a percentage.
    pub predicted_score: u32,
    pub confidence: PredictionConfidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

pub fn learning_insights(
    metrics: &AggregatedMetrics,
    recent_sessions: &[QuizSessionRecord],
    weights: &MasteryWeights,
) -> LearningInsights {
    let mastery = mastery_score(metrics, weights);

    let overall_status = if mastery >= 80.0 {
        "Outstanding! You're a master learner!"
    } else if mastery >= 60.0 {
        "Great progress! You're on the right track!"
    } else if mastery >= 40.0 {
        "Good start! Keep practicing consistently."
    } else {
        "Just getting started! Every expert was once a beginner."
    };

    let easy_acc = metrics.difficulty_accuracy(Difficulty::Easy);
    let medium_acc = metrics.difficulty_accuracy(Difficulty::Medium);
    let hard_acc = metrics.difficulty_accuracy(Difficulty::Hard);

    let mut strength_areas = Vec::new();
    if easy_acc >= 0.75 {
        strength_areas.push("Solid foundation in basic concepts".to_string());
    }
    if medium_acc >= 0.70 {
        strength_areas.push("Strong intermediate-level understanding".to_string());
    }
    if hard_acc >= 0.60 {
        strength_areas.push("Excellent grasp of advanced topics".to_string());
    }

    let velocity = if recent_sessions.is_empty() {
        0.0
    } else {
        learning_velocity(recent_sessions)
    };

    let velocity_message = if recent_sessions.is_empty() {
        None
    } else if velocity > 0.1 {
        Some("Rapidly improving! Your performance is trending up.")
    } else if velocity > 0.0 {
        Some("Steady progress. Keep up the consistency!")
    } else if velocity > -0.1 {
        Some("Maintaining current level. Ready to push further?")
    } else {
        Some("Recent dip noticed. Take a break or review basics?")
    };

    let mut improvement_areas = Vec::new();
    if easy_acc < 0.70 && metrics.easy_attempts > 5 {
        improvement_areas.push("Focus on mastering fundamental concepts".to_string());
    }
    if medium_acc < 0.60 && metrics.medium_attempts > 5 {
        improvement_areas.push("Practice more medium-level questions".to_string());
    }
    if hard_acc < 0.50 && metrics.hard_attempts > 3 {
        improvement_areas.push("Hard questions need more preparation".to_string());
    }

    let mut next_steps = Vec::new();
    if metrics.predicted_difficulty == Difficulty::Easy && easy_acc >= 0.75 {
        next_steps.push("You're ready to tackle medium difficulty!".to_string());
    } else if metrics.predicted_difficulty == Difficulty::Medium && medium_acc >= 0.80 {
        next_steps.push("Challenge yourself with hard difficulty!".to_string());
    } else if metrics.total_questions < 50 {
        next_steps.push("Complete more quizzes to unlock detailed insights".to_string());
    }

    let motivational_message = if metrics.study_streak >= 7 {
        format!(
            "Amazing {}-day streak! You're unstoppable!",
            metrics.study_streak
        )
    } else if metrics.study_streak >= 3 {
        format!(
            "Great {}-day streak! Keep the momentum going!",
            metrics.study_streak
        )
    } else if mastery >= 70.0 {
        "You're making excellent progress! Keep it up!".to_string()
    } else {
        "Every question you answer makes you smarter. You've got this!".to_string()
    };

    LearningInsights {
        overall_status: overall_status.to_string(),
        strength_areas,
        improvement_areas,
        learning_velocity: velocity_message.map(str::to_string),
        next_steps,
        motivational_message,
        predictions: InsightPredictions {
            next_optimal_difficulty: metrics.predicted_difficulty,
            estimated_mastery_in_week: (mastery + velocity * 7.0).min(100.0),
            questions_to_next_level: 50 - metrics.total_questions % 50,
        },
    }
}

/// Topics below 70% accuracy with at least 3 attempts, weakest first.
pub fn weak_topics(metrics: &AggregatedMetrics) -> Vec<(String, f64)> {
    let mut weak: Vec<(String, f64)> = metrics
        .topic_performance
        .iter()
        .filter(|(_, stats)| stats.total >= 3)
        .map(|(topic, stats)| (topic.clone(), stats.accuracy()))
        .filter(|&(_, accuracy)| accuracy < 0.70)
        .collect();
    weak.sort_by(|a, b| a.1.total_cmp(&b.1));
    weak
}

/// Top-5 prioritized recommendation feed. `now` drives the streak-at-risk
/// check; callers pass the current time so the feed stays deterministic in
/// tests.
pub fn recommendations(
    metrics: &AggregatedMetrics,
    documents: &[DocumentRef],
    now: DateTime<Utc>,
) -> Vec<Recommendation> {
    let mut recs: Vec<Recommendation> = Vec::new();
    let current = metrics.predicted_difficulty;

    for (topic, accuracy) in weak_topics(metrics).into_iter().take(3) {
        let reason = format!(
            "You scored {:.0}% on {}. Let's improve this!",
            accuracy * 100.0,
            topic
        );
        recs.push(Recommendation {
            kind: RecommendationKind::TargetedPractice,
            priority: 10 - recs.len() as u8,
            topic,
            difficulty: if accuracy < 0.4 {
                Difficulty::Easy
            } else {
                Difficulty::Medium
            },
            reason,
            estimated_time: "10-15 min".to_string(),
            potential_gain: "+15 mastery points".to_string(),
            document_id: None,
        });
    }

    match current {
        Difficulty::Easy => {
            let easy_acc = metrics.difficulty_accuracy(Difficulty::Easy);
            if easy_acc >= 0.75 {
                recs.push(Recommendation {
                    kind: RecommendationKind::LevelUp,
                    priority: 9,
                    topic: "General Assessment".to_string(),
                    difficulty: Difficulty::Medium,
                    reason: format!(
                        "You're mastering easy questions ({:.0}%)! Ready for medium?",
                        easy_acc * 100.0
                    ),
                    estimated_time: "15-20 min".to_string(),
                    potential_gain: "Unlock medium difficulty".to_string(),
                    document_id: None,
                });
            }
        }
        Difficulty::Medium => {
            let medium_acc = metrics.difficulty_accuracy(Difficulty::Medium);
            if medium_acc >= 0.80 {
                recs.push(Recommendation {
                    kind: RecommendationKind::LevelUp,
                    priority: 9,
                    topic: "Advanced Challenge".to_string(),
                    difficulty: Difficulty::Hard,
                    reason: format!(
                        "Excellent medium performance ({:.0}%)! Try hard difficulty!",
                        medium_acc * 100.0
                    ),
                    estimated_time: "20-25 min".to_string(),
                    potential_gain: "Unlock hard difficulty".to_string(),
                    document_id: None,
                });
            }
        }
        Difficulty::Hard => {}
    }

    if metrics.study_streak > 0 {
        if let Some(last_activity) = metrics.last_activity {
            let hours_since = (now - last_activity).num_seconds() as f64 / 3600.0;
            if hours_since > 20.0 && hours_since < 24.0 {
                recs.push(Recommendation {
                    kind: RecommendationKind::StreakSaver,
                    priority: 10,
                    topic: "Quick Review".to_string(),
                    difficulty: current,
                    reason: format!(
                        "Don't break your {}-day streak! Quick quiz to keep it going",
                        metrics.study_streak
                    ),
                    estimated_time: "5-10 min".to_string(),
                    potential_gain: format!("Maintain {}-day streak", metrics.study_streak),
                    document_id: None,
                });
            }
        }
    }

    if metrics.total_quizzes >= 10 && metrics.total_quizzes % 10 == 0 {
        recs.push(Recommendation {
            kind: RecommendationKind::MilestoneReview,
            priority: 7,
            topic: "Comprehensive Review".to_string(),
            difficulty: current,
            reason: format!(
                "You've completed {} quizzes! Time for a comprehensive review.",
                metrics.total_quizzes
            ),
            estimated_time: "25-30 min".to_string(),
            potential_gain: "+25 mastery points".to_string(),
            document_id: None,
        });
    }

    for doc in documents.iter().take(2) {
        recs.push(Recommendation {
            kind: RecommendationKind::DocumentPractice,
            priority: 6,
            topic: doc.title.clone(),
            difficulty: current,
            reason: "Practice on your recently uploaded material".to_string(),
            estimated_time: "15-20 min".to_string(),
            potential_gain: "+10 mastery points".to_string(),
            document_id: Some(doc.id.clone()),
        });
    }

    recs.sort_by(|a, b| b.priority.cmp(&a.priority));
    recs.truncate(5);
    recs
}

/// Expected score for a quiz at `difficulty`, blended 70/30 with topic
/// history when the topic is known. Cold starts borrow from the adjacent
/// band at reduced confidence.
pub fn predict_performance(
    metrics: &AggregatedMetrics,
    difficulty: Difficulty,
    topic: Option<&str>,
) -> PerformancePrediction {
    let (attempts, correct) = metrics.difficulty_counts(difficulty);

    if attempts == 0 {
        return match difficulty {
            Difficulty::Easy => PerformancePrediction {
                predicted_score: 70,
                confidence: PredictionConfidence::Low,
                recommendation: None,
            },
            Difficulty::Hard => PerformancePrediction {
                predicted_score: (metrics.difficulty_accuracy(Difficulty::Medium) * 100.0 * 0.7)
                    as u32,
                confidence: PredictionConfidence::Medium,
                recommendation: None,
            },
            Difficulty::Medium => PerformancePrediction {
                predicted_score: (metrics.difficulty_accuracy(Difficulty::Easy) * 100.0 * 0.85)
                    as u32,
                confidence: PredictionConfidence::Medium,
                recommendation: None,
            },
        };
    }

    let mut accuracy = correct as f64 / attempts as f64;

    if let Some(topic) = topic {
        if let Some(stats) = metrics.topic_performance.get(topic) {
            if stats.total > 0 {
                accuracy = accuracy * 0.7 + stats.accuracy() * 0.3;
            }
        }
    }

    let confidence = if attempts >= 10 {
        PredictionConfidence::High
    } else if attempts >= 5 {
        PredictionConfidence::Medium
    } else {
        PredictionConfidence::Low
    };

    PerformancePrediction {
        predicted_score: (accuracy * 100.0) as u32,
        confidence,
        recommendation: Some(performance_recommendation(accuracy).to_string()),
    }
}

fn performance_recommendation(accuracy: f64) -> &'static str {
    if accuracy >= 0.80 {
        "You're likely to excel! Try challenging yourself with harder questions."
    } else if accuracy >= 0.65 {
        "You should do well! Focus and take your time."
    } else if accuracy >= 0.50 {
        "This might be challenging. Review the material first?"
    } else {
        "Consider reviewing the basics before attempting this quiz."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TopicStats;
    use chrono::{Duration, TimeZone, Utc};

    fn weights() -> MasteryWeights {
        MasteryWeights::default()
    }

    fn topic_stats(correct: u32, total: u32) -> TopicStats {
        TopicStats { total, correct }
    }

    fn sessions_from_scores(scores: &[u32]) -> Vec<QuizSessionRecord> {
        let base = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| QuizSessionRecord {
                score,
                total_questions: 10,
                difficulty: Difficulty::Medium,
                duration_secs: 300,
                completed_at: base + Duration::days(i as i64),
            })
            .collect()
    }

    #[test]
    fn fresh_account_gets_the_beginner_status() {
        let insights = learning_insights(&AggregatedMetrics::default(), &[], &weights());
        assert_eq!(
            insights.overall_status,
            "Just getting started! Every expert was once a beginner."
        );
        assert!(insights.learning_velocity.is_none());
        assert_eq!(insights.predictions.questions_to_next_level, 50);
    }

    #[test]
    fn high_mastery_gets_the_top_status_band() {
        let metrics = AggregatedMetrics {
            total_quizzes: 50,
            total_questions: 500,
            correct_answers: 500,
            easy_attempts: 100,
            easy_correct: 100,
            medium_attempts: 200,
            medium_correct: 200,
            hard_attempts: 200,
            hard_correct: 200,
            study_streak: 60,
            ..Default::default()
        };

        let insights = learning_insights(&metrics, &[], &weights());
        assert_eq!(insights.overall_status, "Outstanding! You're a master learner!");
        assert_eq!(insights.strength_areas.len(), 3);
        assert!(insights.improvement_areas.is_empty());
    }

    #[test]
    fn weak_bands_show_up_as_improvement_areas() {
        let metrics = AggregatedMetrics {
            total_quizzes: 3,
            total_questions: 24,
            correct_answers: 14,
            easy_attempts: 10,
            easy_correct: 8,
            medium_attempts: 10,
            medium_correct: 5,
            hard_attempts: 4,
            hard_correct: 1,
            ..Default::default()
        };

        let insights = learning_insights(&metrics, &[], &weights());
        // Easy sits at 80%: a strength, not an improvement area.
        assert_eq!(
            insights.strength_areas,
            vec!["Solid foundation in basic concepts".to_string()]
        );
        assert_eq!(
            insights.improvement_areas,
            vec![
                "Practice more medium-level questions".to_string(),
                "Hard questions need more preparation".to_string(),
            ]
        );
    }

    #[test]
    fn improving_sessions_report_rapid_velocity() {
        let metrics = AggregatedMetrics::default();
        let sessions = sessions_from_scores(&[4, 6, 8]);

        let insights = learning_insights(&metrics, &sessions, &weights());
        assert_eq!(
            insights.learning_velocity.as_deref(),
            Some("Rapidly improving! Your performance is trending up.")
        );
    }

    #[test]
    fn strong_medium_performance_points_at_hard() {
        let metrics = AggregatedMetrics {
            total_quizzes: 10,
            total_questions: 100,
            correct_answers: 85,
            medium_attempts: 100,
            medium_correct: 85,
            predicted_difficulty: Difficulty::Medium,
            ..Default::default()
        };

        let insights = learning_insights(&metrics, &[], &weights());
        assert_eq!(
            insights.next_steps,
            vec!["Challenge yourself with hard difficulty!".to_string()]
        );
    }

    #[test]
    fn long_streaks_drive_the_motivational_message() {
        let metrics = AggregatedMetrics {
            total_questions: 10,
            correct_answers: 5,
            medium_attempts: 10,
            medium_correct: 5,
            study_streak: 8,
            ..Default::default()
        };

        let insights = learning_insights(&metrics, &[], &weights());
        assert_eq!(
            insights.motivational_message,
            "Amazing 8-day streak! You're unstoppable!"
        );
    }

    #[test]
    fn weak_topics_are_sorted_weakest_first() {
        let mut metrics = AggregatedMetrics::default();
        metrics
            .topic_performance
            .insert("geometry".to_string(), topic_stats(2, 4));
        metrics
            .topic_performance
            .insert("algebra".to_string(), topic_stats(1, 5));
        metrics
            .topic_performance
            .insert("history".to_string(), topic_stats(9, 10));
        // Too few attempts to judge.
        metrics
            .topic_performance
            .insert("sparse".to_string(), topic_stats(0, 2));

        let weak = weak_topics(&metrics);
        assert_eq!(weak.len(), 2);
        assert_eq!(weak[0].0, "algebra");
        assert_eq!(weak[1].0, "geometry");
    }

    #[test]
    fn feed_is_priority_sorted_and_capped_at_five() {
        let now = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
        let mut metrics = AggregatedMetrics {
            total_quizzes: 20,
            total_questions: 200,
            correct_answers: 170,
            medium_attempts: 200,
            medium_correct: 170,
            predicted_difficulty: Difficulty::Medium,
            study_streak: 4,
            last_activity: Some(now - Duration::hours(21)),
            ..Default::default()
        };
        metrics
            .topic_performance
            .insert("algebra".to_string(), topic_stats(1, 5));
        metrics
            .topic_performance
            .insert("geometry".to_string(), topic_stats(2, 4));

        let documents = vec![
            DocumentRef {
                id: "d1".to_string(),
                title: "Chapter 3 notes".to_string(),
            },
            DocumentRef {
                id: "d2".to_string(),
                title: "Lecture slides".to_string(),
            },
        ];

        // Candidates: two targeted (10, 9), streak saver (10), level-up (9),
        // milestone (7), two document picks (6). Only five survive.
        let recs = recommendations(&metrics, &documents, now);
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0].kind, RecommendationKind::TargetedPractice);
        assert_eq!(recs[0].topic, "algebra");
        assert_eq!(recs[0].difficulty, Difficulty::Easy);
        assert_eq!(recs[1].kind, RecommendationKind::StreakSaver);
        assert!(recs
            .iter()
            .all(|r| r.kind != RecommendationKind::DocumentPractice));
        let priorities: Vec<u8> = recs.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![10, 10, 9, 9, 7]);
    }

    #[test]
    fn streak_saver_only_fires_inside_the_risk_window() {
        let now = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
        let metrics = AggregatedMetrics {
            study_streak: 3,
            last_activity: Some(now - Duration::hours(30)),
            predicted_difficulty: Difficulty::Medium,
            ..Default::default()
        };

        // Streak already lost; no saver.
        let recs = recommendations(&metrics, &[], now);
        assert!(recs
            .iter()
            .all(|r| r.kind != RecommendationKind::StreakSaver));
    }

    #[test]
    fn cold_start_predictions_borrow_from_adjacent_bands() {
        let metrics = AggregatedMetrics {
            total_questions: 10,
            correct_answers: 8,
            medium_attempts: 10,
            medium_correct: 8,
            easy_attempts: 0,
            ..Default::default()
        };

        let easy = predict_performance(&metrics, Difficulty::Easy, None);
        assert_eq!(easy.predicted_score, 70);
        assert_eq!(easy.confidence, PredictionConfidence::Low);
        assert!(easy.recommendation.is_none());

        // Hard borrows medium accuracy with a 30% haircut.
        let hard = predict_performance(&metrics, Difficulty::Hard, None);
        assert_eq!(hard.predicted_score, 56);
        assert_eq!(hard.confidence, PredictionConfidence::Medium);
    }

    #[test]
    fn history_backed_prediction_scales_confidence_with_attempts() {
        let metrics = AggregatedMetrics {
            total_questions: 20,
            correct_answers: 17,
            medium_attempts: 20,
            medium_correct: 17,
            ..Default::default()
        };

        let prediction = predict_performance(&metrics, Difficulty::Medium, None);
        assert_eq!(prediction.predicted_score, 85);
        assert_eq!(prediction.confidence, PredictionConfidence::High);
        assert_eq!(
            prediction.recommendation.as_deref(),
            Some("You're likely to excel! Try challenging yourself with harder questions.")
        );
    }

    #[test]
    fn topic_history_blends_into_the_prediction() {
        let mut metrics = AggregatedMetrics {
            total_questions: 10,
            correct_answers: 8,
            medium_attempts: 10,
            medium_correct: 8,
            ..Default::default()
        };
        metrics
            .topic_performance
            .insert("algebra".to_string(), topic_stats(2, 4));

        // 0.8 * 0.7 + 0.5 * 0.3 = 0.71.
        let prediction = predict_performance(&metrics, Difficulty::Medium, Some("algebra"));
        assert_eq!(prediction.predicted_score, 71);
        assert_eq!(
            prediction.recommendation.as_deref(),
            Some("You should do well! Focus and take your time.")
        );
    }
}
