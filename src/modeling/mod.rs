pub mod capacity;
pub mod difficulty;
pub mod error_pattern;
pub mod stats;
pub mod trajectory;

pub use capacity::classify_capacity;
pub use difficulty::{learning_velocity, select_difficulty};
pub use error_pattern::classify_error_pattern;
pub use trajectory::classify_trajectory;
