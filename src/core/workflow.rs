//! Workflow domain model

use crate::core::{
    error::ValidationError,
    job::{ConcurrencyPolicy, Defaults, Job},
    value::{EnvMap, Value},
};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// Event filter properties that must hold sequences
pub const FILTER_PROPERTIES: [&str; 5] = ["types", "branches", "branches-ignore", "paths", "paths-ignore"];

/// Filter attached to a single trigger event
///
/// Known keys are `types`, `branches`, `branches-ignore`, `paths` and
/// `paths-ignore`; anything else is passed through as-is. Falsy entries
/// are neither checked nor rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter(IndexMap<String, Value>);

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary filter property
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn types<'a>(self, types: impl IntoIterator<Item = &'a str>) -> Self {
        self.set("types", strings(types))
    }

    pub fn branches<'a>(self, branches: impl IntoIterator<Item = &'a str>) -> Self {
        self.set("branches", strings(branches))
    }

    pub fn branches_ignore<'a>(self, branches: impl IntoIterator<Item = &'a str>) -> Self {
        self.set("branches-ignore", strings(branches))
    }

    pub fn paths<'a>(self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        self.set("paths", strings(paths))
    }

    pub fn paths_ignore<'a>(self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        self.set("paths-ignore", strings(paths))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for EventFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().filter(|(_, value)| !value.is_falsy()))
    }
}

fn strings<'a>(values: impl IntoIterator<Item = &'a str>) -> Value {
    Value::Sequence(values.into_iter().map(Value::from).collect())
}

/// Events that start the workflow (`on`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Trigger {
    Event(String),
    Events(Vec<String>),
    Filtered(IndexMap<String, EventFilter>),
}

impl Trigger {
    pub fn filtered<'a>(events: impl IntoIterator<Item = (&'a str, EventFilter)>) -> Self {
        Trigger::Filtered(
            events
                .into_iter()
                .map(|(event, filter)| (event.to_string(), filter))
                .collect(),
        )
    }

    /// Check the trigger shape: an event must be named, filters must be sequences
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Trigger::Event(event) if event.is_empty() => Err(ValidationError::MissingTrigger),
            Trigger::Event(_) | Trigger::Events(_) => Ok(()),
            Trigger::Filtered(events) => {
                for (event, filter) in events {
                    for property in FILTER_PROPERTIES {
                        if let Some(value) = filter.get(property).filter(|v| !v.is_falsy()) {
                            if !value.is_sequence() {
                                return Err(ValidationError::FilterNotSequence {
                                    event: event.clone(),
                                    property: property.to_string(),
                                });
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Trigger {
    fn from(event: &str) -> Self {
        Trigger::Event(event.to_string())
    }
}

impl From<String> for Trigger {
    fn from(event: String) -> Self {
        Trigger::Event(event)
    }
}

impl From<Vec<&str>> for Trigger {
    fn from(events: Vec<&str>) -> Self {
        Trigger::Events(events.into_iter().map(str::to_string).collect())
    }
}

/// Workflow-level concurrency: a bare group name or a full policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Concurrency {
    Group(String),
    Policy(ConcurrencyPolicy),
}

/// Options for a workflow; `on` is required
#[derive(Debug, Clone, Default)]
pub struct WorkflowConfig {
    pub name: Option<String>,
    pub on: Option<Trigger>,
    pub env: Option<EnvMap>,
    pub defaults: Option<Defaults>,
    pub concurrency: Option<Concurrency>,
}

impl WorkflowConfig {
    /// Config with only the trigger set
    pub fn on(trigger: impl Into<Trigger>) -> Self {
        Self {
            on: Some(trigger.into()),
            ..Default::default()
        }
    }

    /// Validate the configuration before a workflow is built from it
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.on
            .as_ref()
            .ok_or(ValidationError::MissingTrigger)?
            .validate()?;

        if let Some(defaults) = &self.defaults {
            defaults.validate()?;
        }

        Ok(())
    }
}

/// A workflow definition, rendered to `<WORKFLOWS_DIR>/<filename>`
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    filename: String,
    pub name: Option<String>,
    pub on: Trigger,
    pub env: Option<EnvMap>,
    pub defaults: Option<Defaults>,
    pub concurrency: Option<Concurrency>,
    jobs: IndexMap<String, Job>,
}

impl Workflow {
    /// Create a workflow after validating its configuration
    pub fn new(filename: impl Into<String>, config: WorkflowConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let on = config.on.ok_or(ValidationError::MissingTrigger)?;

        Ok(Workflow {
            filename: filename.into(),
            name: config.name,
            on,
            env: config.env,
            defaults: config.defaults,
            concurrency: config.concurrency,
            jobs: IndexMap::new(),
        })
    }

    /// Store a job under `id`. An existing job with the same id is replaced
    /// in place and returned.
    pub fn add_job(&mut self, id: impl Into<String>, job: Job) -> Option<Job> {
        let id = id.into();
        let previous = self.jobs.insert(id.clone(), job);
        if previous.is_some() {
            warn!(workflow = %self.filename, job = %id, "Replacing existing job");
        } else {
            debug!(workflow = %self.filename, job = %id, "Added job");
        }
        previous
    }

    /// Builder-style [`Workflow::add_job`]
    pub fn with_job(mut self, id: impl Into<String>, job: Job) -> Self {
        self.add_job(id, job);
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Jobs in the order they were first added
    pub fn jobs(&self) -> impl Iterator<Item = (&str, &Job)> {
        self.jobs.iter().map(|(id, job)| (id.as_str(), job))
    }
}
