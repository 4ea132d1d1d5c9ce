//! Curated BioPortal prefix lists.

use anyhow::{anyhow, Context as _, Result};
use prefixmaps_core::{AddPrefix, Context, StatusType};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Curated {
    #[serde(default)]
    prefixes: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Namespaces {
    One(String),
    Many(Vec<String>),
}

/// Build a context from a BioPortal curation file.
///
/// A prefix may map to a list of namespaces: the first is canonical, the rest
/// are recorded as prefix aliases. All declarations are preferred, so prefix
/// case is kept as given.
pub fn from_bioportal_yaml(text: &str, name: &str) -> Result<Context> {
    let curated: Curated = serde_yaml::from_str(text).context("invalid BioPortal YAML")?;
    let mut context = Context::new(name);

    for (key, value) in curated.prefixes {
        let prefix = key
            .as_str()
            .ok_or_else(|| anyhow!("non-string prefix key: {key:?}"))?
            .to_string();
        let namespaces = match serde_yaml::from_value::<Namespaces>(value)
            .with_context(|| format!("unsupported value for prefix {prefix}"))?
        {
            Namespaces::One(ns) => vec![ns],
            Namespaces::Many(list) => list,
        };
        for (idx, namespace) in namespaces.iter().enumerate() {
            let status = if idx == 0 {
                StatusType::Canonical
            } else {
                StatusType::PrefixAlias
            };
            context.add_prefix_with(
                &prefix,
                namespace,
                AddPrefix::status(status).preferred(true),
            )?;
        }
    }
    Ok(context)
}
