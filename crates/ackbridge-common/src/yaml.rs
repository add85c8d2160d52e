//! YAML utilities using yaml-rust2
//!
//! Input documents are parsed into `serde_json::Value` for typed
//! deserialization; synthesized manifests are emitted as multi-document YAML.

use serde_json::{Map, Number, Value};
use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter, YamlLoader};

use crate::{Error, Result};

/// First document of a YAML stream as JSON; `Value::Null` when the stream is empty
pub fn parse_yaml(input: &str) -> Result<Value> {
    load(input)?
        .into_iter()
        .next()
        .map_or(Ok(Value::Null), to_json)
}

/// Every document of a YAML stream as JSON, in stream order
pub fn parse_yaml_multi(input: &str) -> Result<Vec<Value>> {
    load(input)?.into_iter().map(to_json).collect()
}

fn load(input: &str) -> Result<Vec<Yaml>> {
    YamlLoader::load_from_str(input).map_err(|e| Error::Yaml(e.to_string()))
}

/// Render values as a `---` separated YAML stream
pub fn to_yaml_multi(docs: &[Value]) -> Result<String> {
    let mut out = String::new();
    for doc in docs {
        let mut rendered = String::new();
        YamlEmitter::new(&mut rendered)
            .dump(&json_to_yaml(doc))
            .map_err(|e| Error::Yaml(e.to_string()))?;
        out.push_str(&rendered);
        out.push('\n');
    }
    Ok(out)
}

fn to_json(node: Yaml) -> Result<Value> {
    let value = match node {
        Yaml::Null => Value::Null,
        Yaml::Boolean(b) => Value::Bool(b),
        Yaml::Integer(i) => Value::from(i),
        Yaml::String(s) => Value::String(s),
        Yaml::Real(text) => real(&text)?,
        Yaml::Array(items) => {
            Value::Array(items.into_iter().map(to_json).collect::<Result<_>>()?)
        }
        Yaml::Hash(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(mapping_key(key)?, to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Alias(_) => return Err(Error::Yaml("unresolved alias".to_string())),
        Yaml::BadValue => return Err(Error::Yaml("invalid node".to_string())),
    };
    Ok(value)
}

/// Floats outside the JSON number range are rejected
fn real(text: &str) -> Result<Value> {
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| Error::Yaml(format!("'{text}' is not a finite number")))
}

/// JSON object keys are strings; scalar YAML keys are stringified
fn mapping_key(key: Yaml) -> Result<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Ok(s),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(Error::Yaml(format!("mapping key {other:?} is not a scalar"))),
    }
}

fn json_to_yaml(value: &Value) -> Yaml {
    match value {
        Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Yaml::Integer(i),
            None => Yaml::Real(n.to_string()),
        },
        Value::String(s) => Yaml::String(s.clone()),
        Value::Array(items) => Yaml::Array(items.iter().map(json_to_yaml).collect()),
        Value::Object(fields) => {
            let mut hash = Hash::new();
            for (k, v) in fields {
                hash.insert(Yaml::String(k.clone()), json_to_yaml(v));
            }
            Yaml::Hash(hash)
        }
    }
}
