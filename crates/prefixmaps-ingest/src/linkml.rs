//! LinkML-style YAML: a `prefixes` mapping, optionally with `name` and
//! `description`.

use anyhow::{anyhow, Context as _, Result};
use prefixmaps_core::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Schema {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    prefixes: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PrefixValue {
    Plain(String),
    Expanded { prefix_reference: String },
}

/// Build a context from LinkML YAML. Mapping order is declaration priority.
///
/// Without an explicit `name` the document's own `name` is used.
pub fn from_linkml_yaml(text: &str, name: Option<&str>) -> Result<Context> {
    let schema: Schema = serde_yaml::from_str(text).context("invalid LinkML YAML")?;
    let name = name
        .map(str::to_string)
        .or(schema.name)
        .ok_or_else(|| anyhow!("LinkML document has no name and none was given"))?;
    let mut context = Context::new(name);
    if let Some(description) = schema.description {
        context = context.with_description(description);
    }

    for (key, value) in schema.prefixes {
        let prefix = key
            .as_str()
            .ok_or_else(|| anyhow!("non-string prefix key: {key:?}"))?
            .to_string();
        let namespace = match serde_yaml::from_value::<PrefixValue>(value)
            .with_context(|| format!("unsupported value for prefix {prefix}"))?
        {
            PrefixValue::Plain(ns) => ns,
            PrefixValue::Expanded { prefix_reference } => prefix_reference,
        };
        context.add_prefix(&prefix, &namespace)?;
    }
    Ok(context)
}
