//! YAML rendering for workflows
//!
//! Keys are emitted in a fixed order and unset (or falsy) optional fields are
//! left out entirely rather than written as null or empty values.

use crate::core::{
    job::Job,
    step::{Step, StepAction},
    workflow::Workflow,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

impl Workflow {
    /// Render the workflow as YAML. Does not modify the workflow.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn flag(value: Option<bool>) -> Option<bool> {
    value.filter(|set| *set)
}

fn minutes(value: Option<u32>) -> Option<u32> {
    value.filter(|m| *m > 0)
}

/// Jobs keyed by id, in insertion order
struct JobTable<'a>(&'a Workflow);

impl Serialize for JobTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.jobs())
    }
}

impl Serialize for Workflow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(name) = text(&self.name) {
            map.serialize_entry("name", name)?;
        }
        map.serialize_entry("on", &self.on)?;
        if let Some(env) = &self.env {
            map.serialize_entry("env", env)?;
        }
        if let Some(defaults) = &self.defaults {
            map.serialize_entry("defaults", defaults)?;
        }
        if let Some(concurrency) = &self.concurrency {
            map.serialize_entry("concurrency", concurrency)?;
        }
        map.serialize_entry("jobs", &JobTable(self))?;
        map.end()
    }
}

impl Serialize for Job {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(name) = text(&self.name) {
            map.serialize_entry("name", name)?;
        }
        if let Some(needs) = self.needs.as_ref().filter(|n| !n.is_empty()) {
            map.serialize_entry("needs", needs)?;
        }
        if let Some(permissions) = &self.permissions {
            map.serialize_entry("permissions", permissions)?;
        }
        map.serialize_entry("runs-on", &self.runs_on)?;
        if let Some(environment) = text(&self.environment) {
            map.serialize_entry("environment", environment)?;
        }
        if let Some(outputs) = &self.outputs {
            map.serialize_entry("outputs", outputs)?;
        }
        if let Some(env) = &self.env {
            map.serialize_entry("env", env)?;
        }
        if let Some(defaults) = &self.defaults {
            map.serialize_entry("defaults", defaults)?;
        }
        if let Some(condition) = text(&self.condition) {
            map.serialize_entry("if", condition)?;
        }
        if !self.steps.is_empty() {
            map.serialize_entry("steps", &self.steps)?;
        }
        if let Some(strategy) = &self.strategy {
            map.serialize_entry("strategy", strategy)?;
        }
        if let Some(timeout) = minutes(self.timeout_minutes) {
            map.serialize_entry("timeout-minutes", &timeout)?;
        }
        if let Some(continue_on_error) = flag(self.continue_on_error) {
            map.serialize_entry("continue-on-error", &continue_on_error)?;
        }
        if let Some(container) = &self.container {
            map.serialize_entry("container", container)?;
        }
        if let Some(services) = &self.services {
            map.serialize_entry("services", services)?;
        }
        if let Some(uses) = text(&self.uses) {
            map.serialize_entry("uses", uses)?;
        }
        if let Some(with) = &self.with {
            map.serialize_entry("with", with)?;
        }
        if let Some(secrets) = &self.secrets {
            map.serialize_entry("secrets", secrets)?;
        }
        if let Some(concurrency) = &self.concurrency {
            map.serialize_entry("concurrency", concurrency)?;
        }
        map.end()
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = text(&self.id) {
            map.serialize_entry("id", id)?;
        }
        if let Some(condition) = text(&self.condition) {
            map.serialize_entry("if", condition)?;
        }
        if let Some(name) = text(&self.name) {
            map.serialize_entry("name", name)?;
        }
        match &self.action {
            StepAction::Run {
                run,
                working_directory,
                shell,
            } => {
                map.serialize_entry("run", run)?;
                if let Some(dir) = text(working_directory) {
                    map.serialize_entry("working-directory", dir)?;
                }
                if let Some(shell) = text(shell) {
                    map.serialize_entry("shell", shell)?;
                }
            }
            StepAction::Uses { uses, with } => {
                map.serialize_entry("uses", uses)?;
                if let Some(with) = with {
                    map.serialize_entry("with", with)?;
                }
            }
        }
        if let Some(env) = &self.env {
            map.serialize_entry("env", env)?;
        }
        if let Some(continue_on_error) = flag(self.continue_on_error) {
            map.serialize_entry("continue-on-error", &continue_on_error)?;
        }
        if let Some(timeout) = minutes(self.timeout_minutes) {
            map.serialize_entry("timeout-minutes", &timeout)?;
        }
        map.end()
    }
}
