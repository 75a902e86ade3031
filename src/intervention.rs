//! Intervention synthesis.
//!
//! Combines the three classifications into a recommended teaching strategy,
//! an urgency level, and one actionable insight per dimension. Well-known
//! profile combinations get a hand-written strategy; anything else falls
//! back to a chain ordered by how critical the signal is.

use crate::types::{
    CapacityCategory, ErrorPatternCategory, InterventionPlan, InterventionPriority,
    TrajectoryCategory,
};

pub fn synthesize_intervention(
    capacity: CapacityCategory,
    trajectory: TrajectoryCategory,
    error_pattern: ErrorPatternCategory,
) -> InterventionPlan {
    InterventionPlan {
        strategy: strategy_for(capacity, trajectory, error_pattern).to_string(),
        priority: priority_for(capacity, trajectory, error_pattern),
        insights: vec![
            capacity_insight(capacity).to_string(),
            trajectory_insight(trajectory).to_string(),
            error_insight(error_pattern).to_string(),
        ],
    }
}

fn priority_for(
    capacity: CapacityCategory,
    trajectory: TrajectoryCategory,
    error_pattern: ErrorPatternCategory,
) -> InterventionPriority {
    if trajectory == TrajectoryCategory::Regressing
        || error_pattern == ErrorPatternCategory::FoundationalGap
    {
        InterventionPriority::Critical
    } else if capacity == CapacityCategory::NeedsScaffolding
        || trajectory == TrajectoryCategory::Plateauing
    {
        InterventionPriority::High
    } else if capacity == CapacityCategory::SteadyBuilder
        && error_pattern != ErrorPatternCategory::NoErrors
    {
        InterventionPriority::Medium
    } else {
        InterventionPriority::Low
    }
}

fn strategy_for(
    capacity: CapacityCategory,
    trajectory: TrajectoryCategory,
    error_pattern: ErrorPatternCategory,
) -> &'static str {
    use CapacityCategory as C;
    use ErrorPatternCategory as E;
    use TrajectoryCategory as T;

    match (capacity, trajectory, error_pattern) {
        (C::FastAdapter, T::Accelerating, E::NoErrors) => {
            "Provide advanced challenges and leadership opportunities; consider peer tutoring role."
        }
        (C::FastAdapter, T::Accelerating, E::ApplicationError) => {
            "Introduce complex problem-solving scenarios and real-world applications to deepen understanding."
        }
        (C::FastAdapter, T::Plateauing, E::PrecisionAttention) => {
            "Emphasize careful review; introduce time-management strategies and attention-to-detail exercises."
        }
        (C::SteadyBuilder, T::Accelerating, E::ApplicationError) => {
            "Provide structured practice with guided examples before independent application problems."
        }
        (C::SteadyBuilder, T::Plateauing, E::FoundationalGap) => {
            "Review prerequisite concepts with targeted mini-lessons and scaffolded practice."
        }
        (C::SteadyBuilder, T::Regressing, E::ApplicationError) => {
            "Reduce difficulty temporarily; use worked examples and step-by-step problem breakdowns."
        }
        (C::NeedsScaffolding, T::Accelerating, E::FoundationalGap) => {
            "Continue intensive foundational review with frequent check-ins; celebrate incremental progress."
        }
        (C::NeedsScaffolding, T::Plateauing, E::FoundationalGap) => {
            "Implement one-on-one tutoring focused on building prerequisite skills before advancing."
        }
        (C::NeedsScaffolding, T::Regressing, E::FoundationalGap) => {
            "URGENT: Provide immediate intensive intervention with basic concepts; consider alternative learning modalities."
        }
        (C::NeedsScaffolding, T::Plateauing, E::ApplicationError) => {
            "Break down complex problems into smaller steps; use visual aids and manipulatives."
        }
        (C::NeedsScaffolding, T::Regressing, E::PrecisionAttention) => {
            "Reduce cognitive load; implement checklists and error-tracking sheets to build mindful habits."
        }
        (_, _, E::FoundationalGap) => {
            "Focus on building strong foundational understanding before advancing to complex topics."
        }
        (_, _, E::ApplicationError) => {
            "Provide more practice with application problems using scaffolded support."
        }
        (_, _, E::PrecisionAttention) => {
            "Implement error-checking routines and encourage slowing down to review work."
        }
        (_, T::Regressing, _) => {
            "Pause advancement; review recent material and rebuild confidence with achievable goals."
        }
        (C::NeedsScaffolding, _, _) => {
            "Provide step-by-step guidance with frequent positive reinforcement and check-ins."
        }
        _ => "Continue current approach with gradual increase in challenge level.",
    }
}

fn capacity_insight(capacity: CapacityCategory) -> &'static str {
    match capacity {
        CapacityCategory::FastAdapter => {
            "This student learns quickly - provide enrichment and avoid repetitive practice."
        }
        CapacityCategory::SteadyBuilder => {
            "This student benefits from consistent practice and gradual complexity increases."
        }
        _ => "This student needs extra time and support - break lessons into smaller chunks.",
    }
}

fn trajectory_insight(trajectory: TrajectoryCategory) -> &'static str {
    match trajectory {
        TrajectoryCategory::Accelerating => {
            "Performance is improving - maintain motivation with positive feedback and new challenges."
        }
        TrajectoryCategory::Plateauing => {
            "Student has hit a plateau - introduce new teaching methods or take a different approach."
        }
        _ => {
            "Performance is declining - investigate causes (motivation, personal issues, content difficulty)."
        }
    }
}

fn error_insight(error_pattern: ErrorPatternCategory) -> &'static str {
    match error_pattern {
        ErrorPatternCategory::FoundationalGap => {
            "Errors stem from missing prerequisites - diagnostic assessment needed to identify specific gaps."
        }
        ErrorPatternCategory::ApplicationError => {
            "Student understands concepts but struggles to apply them - provide more worked examples."
        }
        ErrorPatternCategory::PrecisionAttention => {
            "Errors are careless rather than conceptual - encourage slowing down and double-checking."
        }
        _ => "No recurring error pattern - accuracy is strong; raise the challenge level to sustain growth.",
    }
}
