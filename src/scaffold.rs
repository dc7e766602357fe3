//! Starter CI workflows for common project layouts

use crate::core::{
    env_map, input_map, Access, Concurrency, ConcurrencyPolicy, EventFilter, Job, JobConfig,
    PermissionScope, Permissions, RunStepConfig, Step, Strategy, Trigger, UsesStepConfig,
    ValidationError, Value, Workflow, WorkflowConfig,
};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Kind of project a starter workflow is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Rust,
    Node,
    Generic,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::Rust => f.write_str("rust"),
            ProjectKind::Node => f.write_str("node"),
            ProjectKind::Generic => f.write_str("generic"),
        }
    }
}

/// Guess the project kind from marker files in `root`
pub fn detect_project(root: &Path) -> ProjectKind {
    let kind = if root.join("Cargo.toml").is_file() {
        ProjectKind::Rust
    } else if root.join("package.json").is_file() {
        ProjectKind::Node
    } else {
        ProjectKind::Generic
    };
    debug!(root = %root.display(), %kind, "Detected project kind");
    kind
}

/// Knobs for the starter workflow
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub filename: String,
    pub name: Option<String>,
    pub branches: Vec<String>,
    pub runner: String,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            filename: "ci.yml".to_string(),
            name: Some("CI".to_string()),
            branches: vec!["main".to_string()],
            runner: "ubuntu-latest".to_string(),
        }
    }
}

/// Build the starter workflow for `kind`
pub fn build_workflow(kind: ProjectKind, options: &ScaffoldOptions) -> Result<Workflow, ValidationError> {
    let branches = || options.branches.iter().map(String::as_str);
    let config = WorkflowConfig {
        name: options.name.clone(),
        concurrency: Some(Concurrency::Policy(ConcurrencyPolicy {
            group: "${{ github.workflow }}-${{ github.ref }}".to_string(),
            cancel_in_progress: true,
        })),
        ..WorkflowConfig::on(Trigger::filtered([
            ("push", EventFilter::new().branches(branches())),
            ("pull_request", EventFilter::new().branches(branches())),
        ]))
    };

    let mut workflow = Workflow::new(options.filename.as_str(), config)?;
    match kind {
        ProjectKind::Rust => {
            workflow.env = Some(env_map([("CARGO_TERM_COLOR", "always")]));
            workflow.add_job("check", rust_check_job(options)?);
            workflow.add_job("test", rust_test_job(options)?);
        }
        ProjectKind::Node => {
            workflow.add_job("test", node_test_job(options)?);
        }
        ProjectKind::Generic => {
            workflow.add_job("build", generic_build_job(options)?);
        }
    }
    Ok(workflow)
}

fn base_job(options: &ScaffoldOptions, name: &str) -> Result<Job, ValidationError> {
    Job::new(JobConfig {
        name: Some(name.to_string()),
        permissions: Some(Permissions::scoped([(PermissionScope::Contents, Access::Read)])),
        ..JobConfig::runs_on(options.runner.as_str())
    })
}

fn checkout() -> Result<Step, ValidationError> {
    Step::uses(UsesStepConfig {
        name: Some("Checkout".to_string()),
        ..UsesStepConfig::action("actions/checkout@v4")
    })
}

fn named_run(name: &str, command: &str) -> Result<Step, ValidationError> {
    Step::run(RunStepConfig {
        name: Some(name.to_string()),
        ..RunStepConfig::command(command)
    })
}

fn rust_toolchain(components: Option<&str>) -> Result<Step, ValidationError> {
    Step::uses(UsesStepConfig {
        name: Some("Install toolchain".to_string()),
        with: components.map(|c| input_map([("components", c)])),
        ..UsesStepConfig::action("dtolnay/rust-toolchain@stable")
    })
}

fn rust_check_job(options: &ScaffoldOptions) -> Result<Job, ValidationError> {
    let mut job = base_job(options, "Lint")?;
    job.timeout_minutes = Some(15);
    job.add_step(checkout()?);
    job.add_step(rust_toolchain(Some("rustfmt, clippy"))?);
    job.add_step(named_run("Format", "cargo fmt --all -- --check")?);
    job.add_step(named_run("Clippy", "cargo clippy --all-targets --all-features -- -D warnings")?);
    job.validate()?;
    Ok(job)
}

fn rust_test_job(options: &ScaffoldOptions) -> Result<Job, ValidationError> {
    let mut job = base_job(options, "Test")?;
    job.needs = Some("check".into());
    job.add_step(checkout()?);
    job.add_step(rust_toolchain(None)?);
    job.add_step(Step::uses(UsesStepConfig::action("Swatinem/rust-cache@v2"))?);
    job.add_step(named_run("Test", "cargo test --all-features")?);
    job.validate()?;
    Ok(job)
}

fn node_test_job(options: &ScaffoldOptions) -> Result<Job, ValidationError> {
    let mut job = base_job(options, "Test")?;
    job.strategy = Some(Strategy {
        matrix: Some(input_map([("node-version", Value::from(vec![18i64, 20, 22]))])),
        fail_fast: Some(false),
        max_parallel: None,
    });
    job.add_step(checkout()?);
    job.add_step(Step::uses(UsesStepConfig {
        name: Some("Setup Node".to_string()),
        with: Some(input_map([
            ("node-version", "${{ matrix.node-version }}"),
            ("cache", "npm"),
        ])),
        ..UsesStepConfig::action("actions/setup-node@v4")
    })?);
    job.add_step(named_run("Install", "npm ci")?);
    job.add_step(named_run("Test", "npm test")?);
    job.validate()?;
    Ok(job)
}

fn generic_build_job(options: &ScaffoldOptions) -> Result<Job, ValidationError> {
    let mut job = base_job(options, "Build")?;
    job.add_step(checkout()?);
    job.add_step(named_run("Build", "make")?);
    job.validate()?;
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OneOrMany, StepAction};
    use tempfile::tempdir;

    #[test]
    fn test_detect_project_kinds() {
        let temp = tempdir().unwrap();
        assert_eq!(detect_project(temp.path()), ProjectKind::Generic);

        std::fs::write(temp.path().join("package.json"), "{}").unwrap();
        assert_eq!(detect_project(temp.path()), ProjectKind::Node);

        std::fs::write(temp.path().join("Cargo.toml"), "[package]\n").unwrap();
        assert_eq!(detect_project(temp.path()), ProjectKind::Rust);
    }

    #[test]
    fn test_rust_workflow_jobs() {
        let workflow = build_workflow(ProjectKind::Rust, &ScaffoldOptions::default()).unwrap();
        let ids: Vec<_> = workflow.jobs().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["check", "test"]);

        let test = workflow.job("test").unwrap();
        assert_eq!(test.needs, Some(OneOrMany::from("check")));
        assert_eq!(test.steps.len(), 4);
        assert!(matches!(
            &test.steps[0].action,
            StepAction::Uses { uses, .. } if uses == "actions/checkout@v4"
        ));
    }

    #[test]
    fn test_node_workflow_uses_matrix() {
        let workflow = build_workflow(ProjectKind::Node, &ScaffoldOptions::default()).unwrap();
        let yaml = workflow.to_yaml().unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        let matrix = &doc["jobs"]["test"]["strategy"]["matrix"]["node-version"];
        assert_eq!(matrix.as_sequence().map(|s| s.len()), Some(3));
        assert_eq!(doc["jobs"]["test"]["steps"][1]["with"]["cache"].as_str(), Some("npm"));
    }

    #[test]
    fn test_options_flow_into_workflow() {
        let options = ScaffoldOptions {
            filename: "build.yml".to_string(),
            name: None,
            branches: vec!["main".to_string(), "release/*".to_string()],
            runner: "macos-latest".to_string(),
        };
        let workflow = build_workflow(ProjectKind::Generic, &options).unwrap();
        assert_eq!(workflow.filename(), "build.yml");
        assert!(workflow.name.is_none());

        let doc: serde_yaml::Value = serde_yaml::from_str(&workflow.to_yaml().unwrap()).unwrap();
        assert_eq!(doc["on"]["pull_request"]["branches"][1].as_str(), Some("release/*"));
        assert_eq!(doc["jobs"]["build"]["runs-on"].as_str(), Some("macos-latest"));
    }

    #[test]
    fn test_empty_runner_is_rejected() {
        let options = ScaffoldOptions {
            runner: String::new(),
            ..ScaffoldOptions::default()
        };
        assert_eq!(
            build_workflow(ProjectKind::Rust, &options).unwrap_err(),
            ValidationError::MissingRunsOn
        );
    }
}
