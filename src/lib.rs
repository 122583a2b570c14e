// Library interface for CoachRS modules
// This allows integration tests to access the core functionality

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod hydration;
pub mod logging;
pub mod models;
pub mod parser;
pub mod storage;

// Re-export commonly used types for convenience
pub use models::*;
pub use parser::PlanParser;
pub use hydration::{
    AdherenceBucket, Decision, HydrationModel, TipCategory, TrainingRow, WorkoutIntensity,
};
pub use hydration::tracker::HydrationTracker;
pub use batch::{BatchParseConfig, BatchParser};
pub use storage::{PlanStore, StoredPlan};
pub use error::{CoachRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
