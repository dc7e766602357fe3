//! Test utility functions for actiongen

#![allow(dead_code)]

use actiongen::core::{Job, JobConfig, RunStepConfig, Step, UsesStepConfig, Workflow, WorkflowConfig};

/// Parse rendered YAML back into a generic document for assertions
pub fn parse(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).expect("rendered workflow should be valid YAML")
}

/// Keys of a mapping node, in document order
pub fn keys(node: &serde_yaml::Value) -> Vec<String> {
    node.as_mapping()
        .expect("expected a mapping")
        .keys()
        .map(|k| k.as_str().expect("expected a string key").to_string())
        .collect()
}

pub fn run(command: &str) -> Step {
    Step::run(RunStepConfig::command(command)).expect("valid run step")
}

pub fn uses(action: &str) -> Step {
    Step::uses(UsesStepConfig::action(action)).expect("valid uses step")
}

pub fn job(runner: &str, steps: Vec<Step>) -> Job {
    Job::new(JobConfig {
        steps: Some(steps),
        ..JobConfig::runs_on(runner)
    })
    .expect("valid job")
}

/// `on: push` workflow with a single `build` job running `echo hi`
pub fn hello_workflow(filename: &str) -> Workflow {
    Workflow::new(filename, WorkflowConfig::on("push"))
        .expect("valid workflow")
        .with_job("build", job("ubuntu-latest", vec![run("echo hi")]))
}
