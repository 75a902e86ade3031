use parking_lot::RwLock;
use std::collections::HashMap;

use crate::config::AnalyticsConfig;
use crate::insights::{
    self, DocumentRef, LearningInsights, PerformancePrediction, Recommendation,
};
use crate::intervention::synthesize_intervention;
use crate::mastery;
use crate::metrics;
use crate::modeling::{self, error_pattern};
use crate::types::*;

/// Analytics service object. Owns the per-user metrics store; all the
/// statistical work is delegated to the pure functions in `metrics`,
/// `mastery` and `modeling`.
///
/// The store lock serializes concurrent updates for the same user, so two
/// sessions recorded back to back never lose counts.
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    store: RwLock<HashMap<String, AggregatedMetrics>>,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            config,
            store: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Fold a completed session into the user's metrics and refresh the
    /// mastery score. Returns the updated snapshot.
    pub fn record_session(
        &self,
        user_id: &str,
        session: &QuizSessionRecord,
    ) -> AggregatedMetrics {
        let mut store = self.store.write();
        let entry = store.entry(user_id.to_string()).or_default();

        metrics::record_session(entry, session);
        entry.mastery_score = mastery::mastery_score(entry, &self.config.mastery);

        tracing::debug!(
            user_id,
            total_quizzes = entry.total_quizzes,
            mastery = entry.mastery_score,
            "recorded quiz session"
        );

        entry.clone()
    }

    /// Fold one answered question into the user's per-topic tallies.
    pub fn record_topic_result(&self, user_id: &str, topic: &str, correct: bool) {
        let mut store = self.store.write();
        let entry = store.entry(user_id.to_string()).or_default();
        metrics::record_topic_result(entry, topic, correct);
    }

    pub fn metrics_snapshot(&self, user_id: &str) -> Option<AggregatedMetrics> {
        self.store.read().get(user_id).cloned()
    }

    /// Current mastery score, 0 for unknown users.
    pub fn mastery(&self, user_id: &str) -> f64 {
        self.store
            .read()
            .get(user_id)
            .map(|m| mastery::mastery_score(m, &self.config.mastery))
            .unwrap_or(0.0)
    }

    pub fn score_mastery(&self, metrics: &AggregatedMetrics) -> f64 {
        mastery::mastery_score(metrics, &self.config.mastery)
    }

    /// Pick the next quiz difficulty and persist the pick (plus the fitted
    /// learning velocity) back into the user's metrics.
    ///
    /// `recent_sessions` must be ordered oldest first.
    pub fn select_difficulty(
        &self,
        user_id: &str,
        recent_sessions: &[QuizSessionRecord],
    ) -> DifficultySelection {
        let mut store = self.store.write();
        let entry = store.entry(user_id.to_string()).or_default();

        let selection =
            modeling::select_difficulty(entry, recent_sessions, &self.config.difficulty);

        entry.predicted_difficulty = selection.difficulty;
        entry.learning_velocity = modeling::learning_velocity(recent_sessions);

        tracing::info!(
            user_id,
            difficulty = selection.difficulty.as_str(),
            confidence = selection.confidence,
            "selected next difficulty"
        );

        selection
    }

    /// Derive and store the error bucket for every incorrect attempt.
    /// Correct attempts keep `error_type = None`.
    pub fn tag_error_types(&self, attempts: &mut [QuestionAttemptRecord]) {
        for attempt in attempts.iter_mut().filter(|a| !a.is_correct) {
            attempt.error_type = Some(error_pattern::bucket_for(
                attempt,
                &self.config.error_pattern,
            ));
        }
    }

    /// Full multi-dimensional classification. Recomputes everything from the
    /// supplied history; the stored metrics are not consulted.
    pub fn classify_student(
        &self,
        user_id: &str,
        sessions: &[QuizSessionRecord],
        questions: &[QuestionAttemptRecord],
        concepts: &HashMap<String, ConceptStats>,
    ) -> ClassificationProfile {
        if sessions.len() < self.config.trajectory.min_sessions {
            tracing::debug!(
                user_id,
                sessions = sessions.len(),
                "not enough history to classify"
            );
            return insufficient_data_profile(user_id);
        }

        tracing::debug!(
            user_id,
            sessions = sessions.len(),
            questions = questions.len(),
            concepts = concepts.len(),
            "classifying student"
        );

        let capacity = modeling::classify_capacity(sessions, questions, &self.config.capacity);
        let trajectory = modeling::classify_trajectory(sessions, &self.config.trajectory);
        let error_pattern =
            modeling::classify_error_pattern(questions, &self.config.error_pattern);

        let intervention = synthesize_intervention(
            capacity.category,
            trajectory.category,
            error_pattern.category,
        );

        tracing::info!(
            user_id,
            capacity = capacity.category.as_str(),
            trajectory = trajectory.category.as_str(),
            error_pattern = error_pattern.category.as_str(),
            priority = intervention.priority.as_str(),
            "classified student"
        );

        ClassificationProfile {
            student_id: user_id.to_string(),
            capacity,
            trajectory,
            error_pattern,
            intervention,
        }
    }

    /// Dashboard insights block for the user, `None` for unknown users.
    pub fn learning_insights(
        &self,
        user_id: &str,
        recent_sessions: &[QuizSessionRecord],
    ) -> Option<LearningInsights> {
        let store = self.store.read();
        let metrics = store.get(user_id)?;
        Some(insights::learning_insights(
            metrics,
            recent_sessions,
            &self.config.mastery,
        ))
    }

    /// Prioritized recommendation feed. Empty for unknown users.
    pub fn recommendations(
        &self,
        user_id: &str,
        documents: &[DocumentRef],
        now: chrono::DateTime<chrono::Utc>,
    ) -> Vec<Recommendation> {
        let store = self.store.read();
        match store.get(user_id) {
            Some(metrics) => insights::recommendations(metrics, documents, now),
            None => Vec::new(),
        }
    }

    /// Expected score for the user's next quiz at `difficulty`.
    pub fn predict_performance(
        &self,
        user_id: &str,
        difficulty: Difficulty,
        topic: Option<&str>,
    ) -> PerformancePrediction {
        let store = self.store.read();
        match store.get(user_id) {
            Some(metrics) => insights::predict_performance(metrics, difficulty, topic),
            None => insights::predict_performance(&AggregatedMetrics::default(), difficulty, topic),
        }
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

fn insufficient_data_profile(user_id: &str) -> ClassificationProfile {
    ClassificationProfile {
        student_id: user_id.to_string(),
        capacity: CapacityAssessment {
            category: CapacityCategory::InsufficientData,
            confidence: 0.0,
            evidence: None,
        },
        trajectory: TrajectoryAssessment {
            category: TrajectoryCategory::InsufficientData,
            confidence: 0.0,
            trend_data: Vec::new(),
            metrics: None,
        },
        error_pattern: ErrorPatternAssessment {
            category: ErrorPatternCategory::InsufficientData,
            confidence: 0.0,
            examples: Vec::new(),
            distribution: None,
        },
        intervention: InterventionPlan {
            strategy: "Complete more quizzes to enable personalized analysis and recommendations."
                .to_string(),
            priority: InterventionPriority::Low,
            insights: vec![
                "Student needs to complete at least 3 quizzes for meaningful analysis.".to_string(),
                "Encourage consistent practice to build sufficient data for personalized insights."
                    .to_string(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn session(score: u32, total: u32, day: i64) -> QuizSessionRecord {
        QuizSessionRecord {
            score,
            total_questions: total,
            difficulty: Difficulty::Medium,
            duration_secs: 300,
            completed_at: Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap()
                + Duration::days(day),
        }
    }

    #[test]
    fn record_session_creates_and_updates_metrics() {
        let engine = AnalyticsEngine::default();

        let snapshot = engine.record_session("u1", &session(8, 10, 0));
        assert_eq!(snapshot.total_quizzes, 1);
        assert_eq!(snapshot.total_questions, 10);
        assert!(snapshot.mastery_score > 0.0);

        let snapshot = engine.record_session("u1", &session(6, 10, 1));
        assert_eq!(snapshot.total_quizzes, 2);
        assert_eq!(snapshot.study_streak, 2);
    }

    #[test]
    fn users_are_isolated() {
        let engine = AnalyticsEngine::default();
        engine.record_session("u1", &session(8, 10, 0));

        assert!(engine.metrics_snapshot("u2").is_none());
        assert_eq!(engine.mastery("u2"), 0.0);
    }

    #[test]
    fn select_difficulty_persists_the_pick() {
        let engine = AnalyticsEngine::default();
        let sessions: Vec<_> = (0..4).map(|i| session(9, 10, i)).collect();
        for s in &sessions {
            engine.record_session("u1", s);
        }

        let selection = engine.select_difficulty("u1", &sessions);
        let snapshot = engine.metrics_snapshot("u1").unwrap();
        assert_eq!(snapshot.predicted_difficulty, selection.difficulty);
    }

    #[test]
    fn tagging_leaves_correct_attempts_untouched() {
        let engine = AnalyticsEngine::default();
        let mut attempts = vec![
            QuestionAttemptRecord {
                question_index: 0,
                question_text: String::new(),
                difficulty: Difficulty::Easy,
                is_correct: true,
                time_spent_secs: Some(5),
                attempts_on_question: Some(1),
                error_type: None,
            },
            QuestionAttemptRecord {
                question_index: 1,
                question_text: String::new(),
                difficulty: Difficulty::Easy,
                is_correct: false,
                time_spent_secs: Some(25),
                attempts_on_question: Some(1),
                error_type: None,
            },
        ];

        engine.tag_error_types(&mut attempts);
        assert!(attempts[0].error_type.is_none());
        assert_eq!(
            attempts[1].error_type,
            Some(ErrorPatternCategory::FoundationalGap)
        );
    }

    #[test]
    fn short_history_yields_the_insufficient_data_profile() {
        let engine = AnalyticsEngine::default();
        let sessions = vec![session(8, 10, 0), session(7, 10, 1)];

        let profile = engine.classify_student("u1", &sessions, &[], &HashMap::new());
        assert_eq!(profile.capacity.category, CapacityCategory::InsufficientData);
        assert_eq!(
            profile.trajectory.category,
            TrajectoryCategory::InsufficientData
        );
        assert_eq!(
            profile.error_pattern.category,
            ErrorPatternCategory::InsufficientData
        );
        assert_eq!(profile.intervention.priority, InterventionPriority::Low);
        assert_eq!(profile.intervention.insights.len(), 2);
    }
}
