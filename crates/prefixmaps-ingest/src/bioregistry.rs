//! Bioregistry extended prefix map exports.

use anyhow::{Context as _, Result};
use prefixmaps_core::expansion::is_valid_namespace;
use prefixmaps_core::{AddPrefix, Context};
use serde::{Deserialize, Serialize};

/// Registry keys never imported.
pub const SKIP: &[&str] = &["gro"];

/// Registry keys whose synonyms are not imported.
pub const NO_SYNONYMS: &[&str] = &["wikidata"];

/// One record of a Bioregistry extended prefix map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioregistryRecord {
    pub prefix: String,
    pub uri_prefix: String,
    #[serde(default)]
    pub prefix_synonyms: Vec<String>,
    #[serde(default)]
    pub uri_prefix_synonyms: Vec<String>,
    /// Casing preferred by the resource's authors (e.g. `FBbt`).
    #[serde(default)]
    pub preferred_prefix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BioregistryOptions {
    /// Uppercase prefixes that have no preferred casing.
    pub upper: bool,
    /// Drop records whose URI prefix does not look like a namespace.
    pub filter_dubious: bool,
}

impl Default for BioregistryOptions {
    fn default() -> Self {
        Self {
            upper: false,
            filter_dubious: true,
        }
    }
}

/// Build a context from Bioregistry records.
///
/// A record's preferred prefix (when present) is added as given; the registry
/// key becomes one of its synonyms. Registry keys are lowercase, so a record
/// whose `prefix` already carries capitals is an export in preferred casing
/// and is kept as given too. Synonym prefixes and URI prefixes are
/// added after the primary pair, so collision resolution files them as
/// aliases.
pub fn from_bioregistry_records(
    records: &[BioregistryRecord],
    name: &str,
    options: BioregistryOptions,
) -> Result<Context> {
    let mut context = Context::new(name).with_upper(options.upper);

    for record in records {
        if SKIP.contains(&record.prefix.as_str()) {
            continue;
        }
        if options.filter_dubious && !is_valid_namespace(&record.uri_prefix) {
            tracing::debug!(
                prefix = %record.prefix,
                uri_prefix = %record.uri_prefix,
                "skipping dubious uri prefix"
            );
            continue;
        }

        let prefix = record.preferred_prefix.as_deref().unwrap_or(&record.prefix);
        let preferred = record.preferred_prefix.is_some() || has_capitals(&record.prefix);
        let add = || AddPrefix::default().preferred(preferred);

        context.add_prefix_with(prefix, &record.uri_prefix, add())?;
        if NO_SYNONYMS.contains(&record.prefix.as_str()) {
            continue;
        }

        let mut synonyms: Vec<&str> = Vec::new();
        if prefix != record.prefix {
            synonyms.push(&record.prefix);
        }
        synonyms.extend(record.prefix_synonyms.iter().map(String::as_str));
        for synonym in synonyms {
            context.add_prefix_with(synonym, &record.uri_prefix, add())?;
        }
        for uri_prefix in &record.uri_prefix_synonyms {
            context.add_prefix_with(prefix, uri_prefix, add())?;
        }
    }
    Ok(context)
}

fn has_capitals(prefix: &str) -> bool {
    prefix.chars().any(char::is_uppercase)
}

/// Build a context from a Bioregistry extended prefix map JSON document.
pub fn from_bioregistry_json(
    text: &str,
    name: &str,
    options: BioregistryOptions,
) -> Result<Context> {
    let records: Vec<BioregistryRecord> =
        serde_json::from_str(text).context("invalid Bioregistry extended prefix map")?;
    from_bioregistry_records(&records, name, options)
}
