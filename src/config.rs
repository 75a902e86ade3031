use serde::{Deserialize, Serialize};

/// Weights for the composite 0-100 mastery score. The 40/30/15/15 split and
/// the 0.3/0.5/0.7 difficulty weighting are tuned values; changing them
/// changes every downstream band and test expectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryWeights {
    pub accuracy_points: f64,
    pub difficulty_points: f64,
    pub easy_weight: f64,
    pub medium_weight: f64,
    pub hard_weight: f64,
    pub volume_points: f64,
    /// Question count at which the volume bonus saturates.
    pub volume_target_questions: f64,
    pub streak_points: f64,
    /// Streak length (days) at which the streak bonus saturates.
    pub streak_target_days: f64,
}

impl Default for MasteryWeights {
    fn default() -> Self {
        Self {
            accuracy_points: 40.0,
            difficulty_points: 30.0,
            easy_weight: 0.3,
            medium_weight: 0.5,
            hard_weight: 0.7,
            volume_points: 15.0,
            volume_target_questions: 100.0,
            streak_points: 15.0,
            streak_target_days: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Sessions considered when judging recent performance.
    pub window: usize,
    /// Below this many sessions the selector returns the medium default.
    pub min_sessions: usize,
    pub promote_easy_accuracy: f64,
    pub promote_easy_consistency: f64,
    pub promote_medium_accuracy: f64,
    pub promote_medium_velocity: f64,
    pub demote_medium_accuracy: f64,
    pub demote_hard_accuracy: f64,
    pub default_confidence: f64,
}

impl Default for DifficultyParams {
    fn default() -> Self {
        Self {
            window: 10,
            min_sessions: 2,
            promote_easy_accuracy: 0.75,
            promote_easy_consistency: 0.7,
            promote_medium_accuracy: 0.80,
            promote_medium_velocity: 0.1,
            demote_medium_accuracy: 0.50,
            demote_hard_accuracy: 0.55,
            default_confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryParams {
    pub min_sessions: usize,
    /// Sessions counted as "recent" when comparing against history.
    pub recent_window: usize,
    /// Percentage-points-per-session slope beyond which a trend is directional.
    pub slope_threshold: f64,
    /// Recent-vs-historical gap (percentage points) backing the slope signal.
    pub improvement_threshold: f64,
    /// Accuracy spread under which a plateau is called with high confidence.
    pub stable_variance: f64,
}

impl Default for TrajectoryParams {
    fn default() -> Self {
        Self {
            min_sessions: 3,
            recent_window: 5,
            slope_threshold: 2.0,
            improvement_threshold: 5.0,
            stable_variance: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPatternParams {
    /// A wrong answer faster than this on easy/medium reads as carelessness.
    pub fast_answer_secs: u32,
    /// A wrong answer slower than this on hard reads as an application struggle.
    pub slow_hard_secs: u32,
    /// Bucket share that makes a pattern dominant.
    pub dominance_ratio: f64,
    pub max_examples: usize,
}

impl Default for ErrorPatternParams {
    fn default() -> Self {
        Self {
            fast_answer_secs: 10,
            slow_hard_secs: 30,
            dominance_ratio: 0.4,
            max_examples: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityParams {
    pub fast_max_attempts: f64,
    pub fast_max_time_percentile: f64,
    pub fast_min_accuracy: f64,
    pub steady_max_attempts: f64,
    pub steady_max_time_percentile: f64,
    pub steady_min_accuracy: f64,
    pub scaffold_min_attempts: f64,
    pub scaffold_min_time_percentile: f64,
    pub scaffold_max_accuracy: f64,
    /// Accuracy split used when a learner falls between categories.
    pub edge_accuracy: f64,
    /// Seconds-per-question mapped to the top of the time percentile scale.
    pub time_percentile_baseline_secs: f64,
    /// Session-only fallback thresholds (seconds per question).
    pub session_fast_max_secs: f64,
    pub session_steady_max_secs: f64,
    pub session_fallback_confidence: f64,
}

impl Default for CapacityParams {
    fn default() -> Self {
        Self {
            fast_max_attempts: 1.5,
            fast_max_time_percentile: 0.3,
            fast_min_accuracy: 0.8,
            steady_max_attempts: 2.5,
            steady_max_time_percentile: 0.6,
            steady_min_accuracy: 0.65,
            scaffold_min_attempts: 3.0,
            scaffold_min_time_percentile: 0.8,
            scaffold_max_accuracy: 0.5,
            edge_accuracy: 0.70,
            time_percentile_baseline_secs: 60.0,
            session_fast_max_secs: 20.0,
            session_steady_max_secs: 35.0,
            session_fallback_confidence: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub mastery: MasteryWeights,
    pub difficulty: DifficultyParams,
    pub trajectory: TrajectoryParams,
    pub error_pattern: ErrorPatternParams,
    pub capacity: CapacityParams,
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ANALYTICS_DIFFICULTY_WINDOW") {
            config.difficulty.window = val.parse().unwrap_or(config.difficulty.window);
        }
        if let Ok(val) = std::env::var("ANALYTICS_TRAJECTORY_RECENT_WINDOW") {
            config.trajectory.recent_window =
                val.parse().unwrap_or(config.trajectory.recent_window);
        }
        if let Ok(val) = std::env::var("ANALYTICS_ERROR_MAX_EXAMPLES") {
            config.error_pattern.max_examples =
                val.parse().unwrap_or(config.error_pattern.max_examples);
        }

        config
    }
}
