use serde_json::{Number, Value};
use serde_yaml::Value as Yaml;
use serde_yaml::value::TaggedValue;
use thiserror::Error;

use crate::Record;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConversionError {
    #[error("{0}")]
    Syntax(String),
    #[error("top-level value must be a mapping, found {0}")]
    NotAMapping(&'static str),
    #[error("mapping keys must be scalars, found {0}")]
    ComplexKey(&'static str),
    #[error("duplicate mapping key `{0}`")]
    DuplicateKey(String),
}

impl From<serde_yaml::Error> for ConversionError {
    fn from(err: serde_yaml::Error) -> Self {
        ConversionError::Syntax(err.to_string())
    }
}

/// Parses the contents of a YAML file into a [`Record`].
///
/// Merge keys (`<<`) are resolved, tags are dropped and trailing newlines are
/// stripped from every string, keys included.
pub fn parse_record(contents: &str) -> Result<Record, ConversionError> {
    let mut value: Yaml = serde_yaml::from_str(contents)?;
    value.apply_merge()?;

    match yaml_to_json(value)? {
        Value::Object(record) => Ok(record),
        other => Err(ConversionError::NotAMapping(json_kind(&other))),
    }
}

pub fn yaml_to_json(value: Yaml) -> Result<Value, ConversionError> {
    let value = match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => number_to_json(&n),
        Yaml::String(s) => Value::String(strip_trailing_newlines(s)),
        Yaml::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut record = Record::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = key_to_string(key)?;
                // `1` and `"1"` are distinct YAML keys but collide once rendered.
                if record.contains_key(&key) {
                    return Err(ConversionError::DuplicateKey(key));
                }
                record.insert(key, yaml_to_json(value)?);
            }
            Value::Object(record)
        }
        Yaml::Tagged(tagged) => {
            let TaggedValue { value, .. } = *tagged;
            yaml_to_json(value)?
        }
    };

    Ok(value)
}

fn key_to_string(key: Yaml) -> Result<String, ConversionError> {
    match key {
        Yaml::String(s) => Ok(strip_trailing_newlines(s)),
        Yaml::Null => Ok("null".to_owned()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Tagged(tagged) => {
            let TaggedValue { value, .. } = *tagged;
            key_to_string(value)
        }
        Yaml::Sequence(_) => Err(ConversionError::ComplexKey("a sequence")),
        Yaml::Mapping(_) => Err(ConversionError::ComplexKey("a mapping")),
    }
}

// `.nan` and `.inf` have no JSON number representation.
fn number_to_json(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(n.to_string()), Value::Number)
    }
}

#[inline]
fn strip_trailing_newlines(mut s: String) -> String {
    let len = s.trim_end_matches('\n').len();
    s.truncate(len);
    s
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
