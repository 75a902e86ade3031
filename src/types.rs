use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityCategory {
    #[serde(rename = "Fast Adapter")]
    FastAdapter,
    #[serde(rename = "Steady Builder")]
    SteadyBuilder,
    #[serde(rename = "Needs Scaffolding")]
    NeedsScaffolding,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl CapacityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FastAdapter => "Fast Adapter",
            Self::SteadyBuilder => "Steady Builder",
            Self::NeedsScaffolding => "Needs Scaffolding",
            Self::InsufficientData => "Insufficient Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrajectoryCategory {
    Accelerating,
    Plateauing,
    Regressing,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl TrajectoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accelerating => "Accelerating",
            Self::Plateauing => "Plateauing",
            Self::Regressing => "Regressing",
            Self::InsufficientData => "Insufficient Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorPatternCategory {
    #[serde(rename = "Foundational Gap")]
    FoundationalGap,
    #[serde(rename = "Application Error")]
    ApplicationError,
    #[serde(rename = "Precision/Attention")]
    PrecisionAttention,
    #[serde(rename = "No Errors (Excellent)")]
    NoErrors,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl ErrorPatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoundationalGap => "Foundational Gap",
            Self::ApplicationError => "Application Error",
            Self::PrecisionAttention => "Precision/Attention",
            Self::NoErrors => "No Errors (Excellent)",
            Self::InsufficientData => "Insufficient Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterventionPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl InterventionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One completed quiz attempt. Immutable once created; trend analysis
/// orders these by `completed_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSessionRecord {
    pub score: u32,
    pub total_questions: u32,
    pub difficulty: Difficulty,
    /// Seconds spent on the whole session.
    pub duration_secs: u32,
    pub completed_at: DateTime<Utc>,
}

impl QuizSessionRecord {
    /// Accuracy as a fraction in [0, 1]. Zero when the session had no questions.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.score as f64 / self.total_questions as f64
    }
}

/// One answered question within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAttemptRecord {
    pub question_index: u32,
    #[serde(default)]
    pub question_text: String,
    pub difficulty: Difficulty,
    pub is_correct: bool,
    /// Seconds spent on this question, when the client reported it.
    pub time_spent_secs: Option<u32>,
    pub attempts_on_question: Option<u32>,
    /// Derived per-attempt tag, never supplied by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorPatternCategory>,
}

impl QuestionAttemptRecord {
    /// Unreported timings fall back to a typical 30 seconds.
    pub fn time_spent(&self) -> u32 {
        self.time_spent_secs.unwrap_or(30)
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempts_on_question.unwrap_or(1)
    }
}

/// Per-topic correct/total tally kept inside `AggregatedMetrics`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub total: u32,
    pub correct: u32,
}

impl TopicStats {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Concept-level mastery tally, supplied by the boundary layer alongside
/// session and question history.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptStats {
    pub total_attempts: u32,
    pub correct_attempts: u32,
    pub mastery_level: f64,
}

/// Running per-user counters, updated after every completed session.
///
/// Invariants: `total_questions` and `correct_answers` are the sums of the
/// per-difficulty pairs, and each `*_correct <= *_attempts`. Applying the
/// same session twice double-counts; callers must not replay events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    pub total_quizzes: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub easy_attempts: u32,
    pub easy_correct: u32,
    pub medium_attempts: u32,
    pub medium_correct: u32,
    pub hard_attempts: u32,
    pub hard_correct: u32,
    #[serde(default)]
    pub topic_performance: HashMap<String, TopicStats>,
    /// Running mean of session length, in minutes.
    pub avg_study_time: f64,
    /// Consecutive calendar days with at least one completed session.
    pub study_streak: u32,
    pub longest_streak: u32,
    pub last_activity: Option<DateTime<Utc>>,
    pub predicted_difficulty: Difficulty,
    pub learning_velocity: f64,
    pub mastery_score: f64,
}

impl AggregatedMetrics {
    pub fn overall_accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct_answers as f64 / self.total_questions as f64
    }

    /// Accuracy for one difficulty band, 0 when it was never attempted.
    pub fn difficulty_accuracy(&self, difficulty: Difficulty) -> f64 {
        let (attempts, correct) = self.difficulty_counts(difficulty);
        if attempts == 0 {
            return 0.0;
        }
        correct as f64 / attempts as f64
    }

    pub fn difficulty_counts(&self, difficulty: Difficulty) -> (u32, u32) {
        match difficulty {
            Difficulty::Easy => (self.easy_attempts, self.easy_correct),
            Difficulty::Medium => (self.medium_attempts, self.medium_correct),
            Difficulty::Hard => (self.hard_attempts, self.hard_correct),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultySelection {
    pub difficulty: Difficulty,
    pub confidence: f64,
}

/// Supporting measurements behind a capacity classification. The optional
/// attempt fields are present only when question-level data was available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityEvidence {
    pub avg_time_per_question: f64,
    pub overall_accuracy: f64,
    pub sample_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_attempts_per_question: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_percentile: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityAssessment {
    pub category: CapacityCategory,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<CapacityEvidence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// 1-based session number within the analyzed series.
    pub session: usize,
    /// Percentage accuracy for that session.
    pub accuracy: f64,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetrics {
    pub slope: f64,
    pub recent_avg: f64,
    pub historical_avg: f64,
    pub improvement: f64,
    /// Spread of session accuracies (standard deviation of percentages;
    /// the field keeps the name the rest of the pipeline expects).
    pub variance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryAssessment {
    pub category: TrajectoryCategory,
    pub confidence: f64,
    pub trend_data: Vec<TrendPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<TrendMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorExample {
    /// Question text, truncated to 100 characters.
    pub question: String,
    pub difficulty: Difficulty,
    pub time_spent_secs: u32,
    pub reason: String,
}

/// Share of incorrect attempts landing in each bucket, as percentages.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDistribution {
    pub foundational: f64,
    pub application: f64,
    pub precision: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPatternAssessment {
    pub category: ErrorPatternCategory,
    pub confidence: f64,
    pub examples: Vec<ErrorExample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<ErrorDistribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionPlan {
    pub strategy: String,
    pub priority: InterventionPriority,
    pub insights: Vec<String>,
}

/// Full learner profile produced by one classification run. Recomputed from
/// scratch on every call; it is never updated incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationProfile {
    pub student_id: String,
    pub capacity: CapacityAssessment,
    pub trajectory: TrajectoryAssessment,
    pub error_pattern: ErrorPatternAssessment,
    pub intervention: InterventionPlan,
}
