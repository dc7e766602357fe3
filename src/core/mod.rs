//! Core domain models for workflows
//!
//! This module defines the workflow, job and step types, their validation
//! rules and the YAML rendering of a workflow.

pub mod error;
pub mod job;
pub mod render;
pub mod step;
pub mod value;
pub mod workflow;

pub use error::*;
pub use job::*;
pub use step::*;
pub use value::*;
pub use workflow::*;
