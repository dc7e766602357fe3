//! Value bags shared by steps, jobs and workflows

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered string-to-string mapping (`env`, `outputs`, `secrets`)
pub type EnvMap = IndexMap<String, String>;

/// Ordered mapping of free-form inputs (`with`, matrix axes)
pub type InputMap = IndexMap<String, Value>;

/// Closed value type for pass-through maps
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// Returns true when the value is a sequence
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Returns true for `false`, zero and the empty string
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::Integer(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Sequence(_) | Value::Mapping(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Mapping(map)
    }
}

/// A single label or an ordered list of labels (`runs-on`, `needs`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// True when there is no usable label at all
    pub fn is_empty(&self) -> bool {
        match self {
            OneOrMany::One(label) => label.is_empty(),
            OneOrMany::Many(labels) => labels.is_empty(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let labels: &[String] = match self {
            OneOrMany::One(label) => std::slice::from_ref(label),
            OneOrMany::Many(labels) => labels,
        };
        labels.iter().map(String::as_str)
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Build an [`EnvMap`] from borrowed pairs
pub fn env_map<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> EnvMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Build an [`InputMap`] from borrowed keys and convertible values
pub fn input_map<'a, V: Into<Value>>(pairs: impl IntoIterator<Item = (&'a str, V)>) -> InputMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into()))
        .collect()
}
