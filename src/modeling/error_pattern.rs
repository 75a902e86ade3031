//! Error pattern classification.
//!
//! Buckets every incorrect attempt into one of three root causes and picks
//! the dominant one. A fast wrong answer on an easy or medium question reads
//! as a lapse of attention; a wrong easy answer as a missing prerequisite; a
//! slow wrong hard answer as a failure to apply understood material.

use crate::config::ErrorPatternParams;
use crate::types::{
    Difficulty, ErrorDistribution, ErrorExample, ErrorPatternAssessment, ErrorPatternCategory,
    QuestionAttemptRecord,
};

const EXAMPLE_TEXT_LIMIT: usize = 100;

struct Bucket {
    count: usize,
    examples: Vec<ErrorExample>,
}

impl Bucket {
    fn new() -> Self {
        Self {
            count: 0,
            examples: Vec::new(),
        }
    }

    fn push(&mut self, attempt: &QuestionAttemptRecord, reason: &str, max_examples: usize) {
        self.count += 1;
        if self.examples.len() < max_examples {
            self.examples.push(ErrorExample {
                question: truncate(&attempt.question_text, EXAMPLE_TEXT_LIMIT),
                difficulty: attempt.difficulty,
                time_spent_secs: attempt.time_spent(),
                reason: reason.to_string(),
            });
        }
    }
}

pub fn classify_error_pattern(
    attempts: &[QuestionAttemptRecord],
    params: &ErrorPatternParams,
) -> ErrorPatternAssessment {
    if attempts.is_empty() {
        return ErrorPatternAssessment {
            category: ErrorPatternCategory::InsufficientData,
            confidence: 0.0,
            examples: Vec::new(),
            distribution: None,
        };
    }

    let incorrect: Vec<&QuestionAttemptRecord> =
        attempts.iter().filter(|a| !a.is_correct).collect();

    if incorrect.is_empty() {
        return ErrorPatternAssessment {
            category: ErrorPatternCategory::NoErrors,
            confidence: 1.0,
            examples: Vec::new(),
            distribution: None,
        };
    }

    let mut foundational = Bucket::new();
    let mut application = Bucket::new();
    let mut precision = Bucket::new();

    for attempt in &incorrect {
        match bucket_for(attempt, params) {
            ErrorPatternCategory::PrecisionAttention => precision.push(
                attempt,
                "Fast completion with error suggests careless mistake",
                params.max_examples,
            ),
            ErrorPatternCategory::FoundationalGap => foundational.push(
                attempt,
                "Error on easy question indicates foundational gap",
                params.max_examples,
            ),
            _ => {
                let reason = if attempt.difficulty == Difficulty::Hard
                    && attempt.time_spent() > params.slow_hard_secs
                {
                    "Long time on hard question suggests application difficulty"
                } else {
                    "Moderate difficulty with error"
                };
                application.push(attempt, reason, params.max_examples);
            }
        }
    }

    let total = incorrect.len() as f64;
    let foundational_ratio = foundational.count as f64 / total;
    let application_ratio = application.count as f64 / total;
    let precision_ratio = precision.count as f64 / total;

    let distribution = ErrorDistribution {
        foundational: round1(foundational_ratio * 100.0),
        application: round1(application_ratio * 100.0),
        precision: round1(precision_ratio * 100.0),
    };

    // A bucket holding a 40% share dominates outright; otherwise fall back
    // to plurality, foundational first since missing basics is the most
    // actionable finding.
    let (category, confidence, examples) = if foundational_ratio >= params.dominance_ratio {
        (
            ErrorPatternCategory::FoundationalGap,
            (0.6 + foundational_ratio * 0.4).min(0.95),
            foundational.examples,
        )
    } else if precision_ratio >= params.dominance_ratio {
        (
            ErrorPatternCategory::PrecisionAttention,
            (0.6 + precision_ratio * 0.4).min(0.95),
            precision.examples,
        )
    } else if application_ratio >= params.dominance_ratio {
        (
            ErrorPatternCategory::ApplicationError,
            (0.6 + application_ratio * 0.4).min(0.95),
            application.examples,
        )
    } else if foundational.count >= application.count && foundational.count >= precision.count {
        (
            ErrorPatternCategory::FoundationalGap,
            0.5,
            foundational.examples,
        )
    } else if application.count >= precision.count {
        (
            ErrorPatternCategory::ApplicationError,
            0.5,
            application.examples,
        )
    } else {
        (
            ErrorPatternCategory::PrecisionAttention,
            0.5,
            precision.examples,
        )
    };

    ErrorPatternAssessment {
        category,
        confidence,
        examples,
        distribution: Some(distribution),
    }
}

/// Bucket a single incorrect attempt. Also used to derive the `error_type`
/// tag stored on attempt records as they are ingested.
pub fn bucket_for(
    attempt: &QuestionAttemptRecord,
    params: &ErrorPatternParams,
) -> ErrorPatternCategory {
    let fast = attempt.time_spent() < params.fast_answer_secs;

    if fast && attempt.difficulty != Difficulty::Hard {
        ErrorPatternCategory::PrecisionAttention
    } else if attempt.difficulty == Difficulty::Easy {
        ErrorPatternCategory::FoundationalGap
    } else {
        ErrorPatternCategory::ApplicationError
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
