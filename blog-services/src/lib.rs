//! Services for the broker blog
//!
//! This crate provides the layer that turns the search and writing building
//! blocks into published posts:
//! - `BlogAssembler`: one request in, one finished article out
//! - `BlogStorage`: SQLite persistence for posts and the broker directory
//! - `BlogAutomation`: the unattended "pick a subject, write, store" run
//! - `BlogScheduler`: the background loop deciding when a run is due

pub mod assembler;
pub mod automation;
pub mod scheduler;
pub mod storage;

pub use assembler::{BlogAssembler, PipelineConfig};
pub use automation::{AutomationError, AutomationResult, BlogAutomation, RunPlan};
pub use scheduler::{
    calculate_next_run, cron_expression, validate, AutomationManager, BlogScheduler, Frequency,
    GenerationStats, ScheduleConfig,
};
pub use storage::{BlogStorage, StorageError, StoredPost};
