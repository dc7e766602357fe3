//! Error types for building and persisting workflows

use thiserror::Error;

/// Structural violation detected while constructing a step, job or workflow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The 'run' property must have a value.")]
    MissingRun,

    #[error("The 'uses' property must have a value.")]
    MissingUses,

    #[error("Invalid shell specified: {shell}. Allowed values are: {allowed}.")]
    InvalidShell { shell: String, allowed: String },

    #[error("The 'runs-on' property is required for a job.")]
    MissingRunsOn,

    #[error("The 'image' property is required when specifying a container.")]
    MissingContainerImage,

    #[error("The 'image' property is required for each service (missing for service '{service}').")]
    MissingServiceImage { service: String },

    #[error("The 'on' property is required in the workflow configuration.")]
    MissingTrigger,

    #[error("The '{property}' property for event '{event}' must be an array.")]
    FilterNotSequence { event: String, property: String },

    #[error("Invalid shell specified in defaults.run.shell: {shell}. Allowed values are: {allowed}.")]
    InvalidDefaultShell { shell: String, allowed: String },
}

/// Failure while rendering or storing a workflow file
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to render workflow: {0}")]
    Render(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
