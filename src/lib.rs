//! Adaptive learning analytics for quiz-based study.
//!
//! Aggregates per-user quiz metrics, scores mastery, adapts quiz difficulty,
//! classifies learners along three dimensions (capacity, trajectory, error
//! pattern), and synthesizes intervention plans and learner-facing guidance.
//! Everything is in-process and synchronous; persistence and transport live
//! outside this crate.

pub mod config;
pub mod engine;
pub mod insights;
pub mod intervention;
pub mod mastery;
pub mod metrics;
pub mod modeling;
pub mod types;

pub use config::AnalyticsConfig;
pub use engine::AnalyticsEngine;
pub use types::*;
