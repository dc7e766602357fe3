//! Step domain model
//!
//! A step is either a `run` step (inline command) or a `uses` step (packaged
//! action). Both share the conditional/name/env/timeout attributes.

use crate::core::{
    error::ValidationError,
    value::{EnvMap, InputMap},
};
use std::fmt;
use std::str::FromStr;

/// Shells accepted by `shell` and `defaults.run.shell`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    Bash,
    Pwsh,
    Python,
    Sh,
    Cmd,
    Powershell,
}

impl Shell {
    pub const ALL: [Shell; 6] = [
        Shell::Bash,
        Shell::Pwsh,
        Shell::Python,
        Shell::Sh,
        Shell::Cmd,
        Shell::Powershell,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Pwsh => "pwsh",
            Shell::Python => "python",
            Shell::Sh => "sh",
            Shell::Cmd => "cmd",
            Shell::Powershell => "powershell",
        }
    }

    /// Human-readable list of allowed shells, e.g. `'bash', 'pwsh', ...`
    pub fn allowed() -> String {
        Shell::ALL
            .iter()
            .map(|shell| format!("'{}'", shell.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shell {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shell::ALL
            .into_iter()
            .find(|shell| shell.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidShell {
                shell: s.to_string(),
                allowed: Shell::allowed(),
            })
    }
}

/// Variant-specific part of a step
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Inline command
    Run {
        run: String,
        working_directory: Option<String>,
        shell: Option<String>,
    },
    /// Packaged action reference such as `actions/checkout@v4`
    Uses {
        uses: String,
        /// Action inputs; `args` and `entrypoint` are ordinary entries
        with: Option<InputMap>,
    },
}

/// A single step inside a job
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Step identifier, referenced from expressions as `steps.<id>`
    pub id: Option<String>,

    /// Conditional-execution expression (`if`)
    pub condition: Option<String>,

    /// Display name
    pub name: Option<String>,

    pub env: Option<EnvMap>,

    pub continue_on_error: Option<bool>,

    pub timeout_minutes: Option<u32>,

    pub action: StepAction,
}

/// Options for a `run` step
#[derive(Debug, Clone, Default)]
pub struct RunStepConfig {
    pub id: Option<String>,
    pub condition: Option<String>,
    pub name: Option<String>,
    /// Command text; required
    pub run: String,
    pub working_directory: Option<String>,
    pub shell: Option<String>,
    pub env: Option<EnvMap>,
    pub continue_on_error: Option<bool>,
    pub timeout_minutes: Option<u32>,
}

impl RunStepConfig {
    /// Config with only the command set
    pub fn command(run: impl Into<String>) -> Self {
        Self {
            run: run.into(),
            ..Default::default()
        }
    }
}

/// Options for a `uses` step
#[derive(Debug, Clone, Default)]
pub struct UsesStepConfig {
    pub id: Option<String>,
    pub condition: Option<String>,
    pub name: Option<String>,
    /// Action reference; required
    pub uses: String,
    pub with: Option<InputMap>,
    pub env: Option<EnvMap>,
    pub continue_on_error: Option<bool>,
    pub timeout_minutes: Option<u32>,
}

impl UsesStepConfig {
    /// Config with only the action reference set
    pub fn action(uses: impl Into<String>) -> Self {
        Self {
            uses: uses.into(),
            ..Default::default()
        }
    }
}

impl Step {
    /// Create a `run` step
    pub fn run(config: RunStepConfig) -> Result<Self, ValidationError> {
        let step = Step {
            id: config.id,
            condition: config.condition,
            name: config.name,
            env: config.env,
            continue_on_error: config.continue_on_error,
            timeout_minutes: config.timeout_minutes,
            action: StepAction::Run {
                run: config.run,
                working_directory: config.working_directory,
                shell: config.shell,
            },
        };
        step.validate()?;
        Ok(step)
    }

    /// Create a `uses` step
    pub fn uses(config: UsesStepConfig) -> Result<Self, ValidationError> {
        let step = Step {
            id: config.id,
            condition: config.condition,
            name: config.name,
            env: config.env,
            continue_on_error: config.continue_on_error,
            timeout_minutes: config.timeout_minutes,
            action: StepAction::Uses {
                uses: config.uses,
                with: config.with,
            },
        };
        step.validate()?;
        Ok(step)
    }

    /// Check the variant's required field and, for `run` steps, the shell
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.action {
            StepAction::Run { run, shell, .. } => {
                if run.is_empty() {
                    return Err(ValidationError::MissingRun);
                }
                if let Some(shell) = shell.as_deref().filter(|s| !s.is_empty()) {
                    shell.parse::<Shell>()?;
                }
            }
            StepAction::Uses { uses, .. } => {
                if uses.is_empty() {
                    return Err(ValidationError::MissingUses);
                }
            }
        }
        Ok(())
    }

    pub fn is_run(&self) -> bool {
        matches!(self.action, StepAction::Run { .. })
    }
}
