//! Job domain model

use crate::core::{
    error::ValidationError,
    step::{Shell, Step},
    value::{EnvMap, InputMap, OneOrMany},
};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::debug;

/// Registry credentials for a container or service image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Container a job (or service) runs in
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Container {
    pub image: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<u16>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl Container {
    pub fn image(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }
}

/// Service containers share the job container's shape
pub type Service = Container;

/// Access level granted to a permission scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Write,
    None,
}

/// Scopes accepted in a `permissions` map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionScope {
    Actions,
    Checks,
    Contents,
    Deployments,
    Discussions,
    IdToken,
    Issues,
    Packages,
    Pages,
    PullRequests,
    RepositoryProjects,
    SecurityEvents,
    Statuses,
}

/// Token permissions for a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permissions {
    ReadAll,
    WriteAll,
    Scoped(IndexMap<PermissionScope, Access>),
}

impl Permissions {
    pub fn scoped(scopes: impl IntoIterator<Item = (PermissionScope, Access)>) -> Self {
        Permissions::Scoped(scopes.into_iter().collect())
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Permissions::ReadAll => serializer.serialize_str("read-all"),
            Permissions::WriteAll => serializer.serialize_str("write-all"),
            Permissions::Scoped(scopes) => scopes.serialize(serializer),
        }
    }
}

/// `defaults` block shared by jobs and workflows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Defaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunDefaults>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunDefaults {
    #[serde(skip_serializing_if = "is_blank")]
    pub shell: Option<String>,

    #[serde(skip_serializing_if = "is_blank")]
    pub working_directory: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl Defaults {
    /// Reject a `run.shell` outside the allowed set
    pub fn validate(&self) -> Result<(), ValidationError> {
        let shell = self.run.as_ref().and_then(|run| run.shell.as_deref());
        if let Some(shell) = shell.filter(|s| !s.is_empty()) {
            if shell.parse::<Shell>().is_err() {
                return Err(ValidationError::InvalidDefaultShell {
                    shell: shell.to_string(),
                    allowed: Shell::allowed(),
                });
            }
        }
        Ok(())
    }
}

/// Concurrency group with its cancellation flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConcurrencyPolicy {
    pub group: String,
    pub cancel_in_progress: bool,
}

/// Matrix strategy for a job
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Strategy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<InputMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<u32>,
}

/// A job: runner selection, metadata and an ordered list of steps
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub name: Option<String>,
    /// Deployment environment name
    pub environment: Option<String>,
    /// Identifiers of jobs that must finish first
    pub needs: Option<OneOrMany>,
    pub permissions: Option<Permissions>,
    pub runs_on: OneOrMany,
    pub outputs: Option<EnvMap>,
    pub env: Option<EnvMap>,
    pub defaults: Option<Defaults>,
    pub condition: Option<String>,
    pub steps: Vec<Step>,
    pub strategy: Option<Strategy>,
    pub timeout_minutes: Option<u32>,
    pub continue_on_error: Option<bool>,
    pub container: Option<Container>,
    pub services: Option<IndexMap<String, Service>>,
    /// Reusable workflow reference, used instead of inline steps
    pub uses: Option<String>,
    pub with: Option<InputMap>,
    pub secrets: Option<EnvMap>,
    pub concurrency: Option<ConcurrencyPolicy>,
}

/// Options for a job; `runs_on` is required
#[derive(Debug, Clone, Default)]
pub struct JobConfig {
    pub name: Option<String>,
    pub environment: Option<String>,
    pub needs: Option<OneOrMany>,
    pub permissions: Option<Permissions>,
    pub runs_on: Option<OneOrMany>,
    pub outputs: Option<EnvMap>,
    pub env: Option<EnvMap>,
    pub defaults: Option<Defaults>,
    pub condition: Option<String>,
    pub steps: Option<Vec<Step>>,
    pub strategy: Option<Strategy>,
    pub timeout_minutes: Option<u32>,
    pub continue_on_error: Option<bool>,
    pub container: Option<Container>,
    pub services: Option<IndexMap<String, Service>>,
    pub uses: Option<String>,
    pub with: Option<InputMap>,
    pub secrets: Option<EnvMap>,
    pub concurrency: Option<ConcurrencyPolicy>,
}

impl JobConfig {
    /// Config with only the runner selector set
    pub fn runs_on(runs_on: impl Into<OneOrMany>) -> Self {
        Self {
            runs_on: Some(runs_on.into()),
            ..Default::default()
        }
    }
}

impl Job {
    /// Create a job and validate it, including any steps it starts with
    pub fn new(config: JobConfig) -> Result<Self, ValidationError> {
        let runs_on = config.runs_on.ok_or(ValidationError::MissingRunsOn)?;
        let job = Job {
            name: config.name,
            environment: config.environment,
            needs: config.needs,
            permissions: config.permissions,
            runs_on,
            outputs: config.outputs,
            env: config.env,
            defaults: config.defaults,
            condition: config.condition,
            steps: config.steps.unwrap_or_default(),
            strategy: config.strategy,
            timeout_minutes: config.timeout_minutes,
            continue_on_error: config.continue_on_error,
            container: config.container,
            services: config.services,
            uses: config.uses,
            with: config.with,
            secrets: config.secrets,
            concurrency: config.concurrency,
        };
        job.validate()?;
        Ok(job)
    }

    /// Append a step. Call [`Job::validate`] afterwards to re-check the job.
    pub fn add_step(&mut self, step: Step) {
        debug!(
            step = step.name.as_deref().unwrap_or("<unnamed>"),
            position = self.steps.len(),
            "Appending step"
        );
        self.steps.push(step);
    }

    /// Builder-style [`Job::add_step`]
    pub fn with_step(mut self, step: Step) -> Self {
        self.add_step(step);
        self
    }

    /// Re-check the job's structural rules and every attached step
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.runs_on.is_empty() {
            return Err(ValidationError::MissingRunsOn);
        }

        if let Some(container) = &self.container {
            if container.image.is_empty() {
                return Err(ValidationError::MissingContainerImage);
            }
        }

        if let Some(services) = &self.services {
            for (service_id, service) in services {
                if service.image.is_empty() {
                    return Err(ValidationError::MissingServiceImage {
                        service: service_id.clone(),
                    });
                }
            }
        }

        if let Some(defaults) = &self.defaults {
            defaults.validate()?;
        }

        for step in &self.steps {
            step.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::step::{RunStepConfig, StepAction, UsesStepConfig};

    fn services(entries: Vec<(&str, Service)>) -> IndexMap<String, Service> {
        entries
            .into_iter()
            .map(|(id, service)| (id.to_string(), service))
            .collect()
    }

    #[test]
    fn test_missing_runs_on_fails() {
        let err = Job::new(JobConfig {
            name: Some("Build".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingRunsOn);
    }

    #[test]
    fn test_empty_runner_labels_fail() {
        assert_eq!(
            Job::new(JobConfig::runs_on("")).unwrap_err(),
            ValidationError::MissingRunsOn
        );
        assert_eq!(
            Job::new(JobConfig::runs_on(Vec::<String>::new())).unwrap_err(),
            ValidationError::MissingRunsOn
        );
    }

    #[test]
    fn test_runs_on_single_or_many_labels() {
        assert!(Job::new(JobConfig::runs_on("ubuntu-latest")).is_ok());
        let job = Job::new(JobConfig::runs_on(vec!["self-hosted", "linux", "x64"])).unwrap();
        assert_eq!(job.runs_on.iter().count(), 3);
        assert!(job.steps.is_empty());
    }

    #[test]
    fn test_container_without_image_fails() {
        let err = Job::new(JobConfig {
            container: Some(Container {
                options: Some("--cpus 2".to_string()),
                ..Default::default()
            }),
            ..JobConfig::runs_on("ubuntu-latest")
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingContainerImage);
    }

    #[test]
    fn test_service_without_image_names_service() {
        let err = Job::new(JobConfig {
            container: Some(Container::image("node:18")),
            services: Some(services(vec![
                ("redis", Container::image("redis:7")),
                (
                    "test",
                    Container {
                        ports: Some(vec![5432]),
                        ..Default::default()
                    },
                ),
            ])),
            ..JobConfig::runs_on("ubuntu-latest")
        })
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingServiceImage {
                service: "test".to_string()
            }
        );
        assert!(err.to_string().contains("'test'"));
    }

    #[test]
    fn test_invalid_step_in_initial_steps_fails() {
        let mut step = Step::run(RunStepConfig::command("make")).unwrap();
        if let StepAction::Run { run, .. } = &mut step.action {
            run.clear();
        }
        let err = Job::new(JobConfig {
            steps: Some(vec![step]),
            ..JobConfig::runs_on("ubuntu-latest")
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingRun);
    }

    #[test]
    fn test_add_step_does_not_validate_until_asked() {
        let mut job = Job::new(JobConfig::runs_on("ubuntu-latest")).unwrap();
        let mut step = Step::uses(UsesStepConfig::action("actions/checkout@v4")).unwrap();
        if let StepAction::Uses { uses, .. } = &mut step.action {
            uses.clear();
        }

        job.add_step(step);
        assert_eq!(job.steps.len(), 1);
        assert_eq!(job.validate(), Err(ValidationError::MissingUses));
    }

    #[test]
    fn test_steps_keep_append_order() {
        let job = Job::new(JobConfig::runs_on("ubuntu-latest"))
            .unwrap()
            .with_step(Step::uses(UsesStepConfig::action("actions/checkout@v4")).unwrap())
            .with_step(Step::run(RunStepConfig::command("cargo test")).unwrap());

        assert!(!job.steps[0].is_run());
        assert!(job.steps[1].is_run());
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_default_shell_is_checked() {
        let err = Job::new(JobConfig {
            defaults: Some(Defaults {
                run: Some(RunDefaults {
                    shell: Some("tcsh".to_string()),
                    working_directory: None,
                }),
            }),
            ..JobConfig::runs_on("ubuntu-latest")
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDefaultShell { .. }));
    }

    #[test]
    fn test_empty_default_shell_is_unset() {
        let defaults = Defaults {
            run: Some(RunDefaults {
                shell: Some(String::new()),
                working_directory: Some("app".to_string()),
            }),
        };
        assert!(defaults.validate().is_ok());
        assert_eq!(
            serde_yaml::to_string(&defaults).unwrap(),
            "run:\n  working-directory: app\n"
        );
    }

    #[test]
    fn test_permissions_serialize() {
        assert_eq!(
            serde_yaml::to_string(&Permissions::ReadAll).unwrap(),
            "read-all\n"
        );
        let scoped = Permissions::scoped([
            (PermissionScope::Contents, Access::Read),
            (PermissionScope::IdToken, Access::Write),
            (PermissionScope::PullRequests, Access::None),
        ]);
        assert_eq!(
            serde_yaml::to_string(&scoped).unwrap(),
            "contents: read\nid-token: write\npull-requests: none\n"
        );
    }
}
