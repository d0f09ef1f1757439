// ABOUTME: Loading of template variables from YAML or JSON context files
// ABOUTME: Converts a top-level mapping of scalars and sequences into template values

use anyhow::{anyhow, bail, Context as _, Result};
use serde_yaml::Value as YamlValue;
use std::path::Path;
use tokio::fs;

use crate::template::Value;

/// Read a context file, keeping the order of its entries
pub async fn load_context_file(path: &Path) -> Result<Vec<(String, Value)>> {
    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read context file '{}'", path.display()))?;

    parse_context(&contents)
        .with_context(|| format!("Invalid context file '{}'", path.display()))
}

/// Parse context file contents. JSON is accepted since it is valid YAML.
pub fn parse_context(contents: &str) -> Result<Vec<(String, Value)>> {
    let document: YamlValue = serde_yaml::from_str(contents)?;

    let mapping = match document {
        YamlValue::Mapping(mapping) => mapping,
        YamlValue::Null => return Ok(Vec::new()),
        _ => bail!("Context file must contain a mapping of names to values"),
    };

    mapping
        .into_iter()
        .map(|(key, value)| {
            let name = scalar_text(&key)
                .ok_or_else(|| anyhow!("Variable names must be scalars, got {:?}", key))?;
            let value = convert(&name, value)?;
            Ok((name, value))
        })
        .collect()
}

fn convert(name: &str, value: YamlValue) -> Result<Value> {
    match value {
        YamlValue::Sequence(items) => items
            .into_iter()
            .map(|item| convert(name, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        YamlValue::Tagged(tagged) => convert(name, tagged.value),
        YamlValue::Mapping(_) => bail!("Variable '{}' is a mapping, which is not supported", name),
        other => scalar_text(&other)
            .map(Value::String)
            .ok_or_else(|| anyhow!("Variable '{}' has no value", name)),
    }
}

fn scalar_text(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
