//! actiongen - build GitHub Actions workflows in code

pub mod cli;
pub mod core;
pub mod persistence;
pub mod scaffold;

// Re-export commonly used types
pub use core::{Job, JobConfig, PersistenceError, Step, ValidationError, Workflow, WorkflowConfig};
pub use core::{RunStepConfig, UsesStepConfig, Trigger, EventFilter};
pub use persistence::{FileSink, InMemoryFileSink, LocalFileSink};
