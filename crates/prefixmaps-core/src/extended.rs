//! Extended prefix map projection.
//!
//! An extended prefix map keeps one record per canonical mapping plus the
//! synonyms collected from alias records. It collapses to a plain prefix map
//! by taking `prefix` and `uri_prefix`, and is the input for [`crate::Converter`].

use crate::context::Context;
use crate::status::StatusType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One entry of an extended prefix map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPrefixRecord {
    /// Canonical prefix.
    pub prefix: String,
    /// Canonical namespace.
    pub uri_prefix: String,
    /// Other prefixes for the same namespace (from `namespace_alias` records).
    #[serde(default)]
    pub prefix_synonyms: Vec<String>,
    /// Other namespaces for the same prefix (from `prefix_alias` records).
    #[serde(default)]
    pub uri_prefix_synonyms: Vec<String>,
}

impl ExtendedPrefixRecord {
    pub fn new(prefix: impl Into<String>, uri_prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri_prefix: uri_prefix.into(),
            prefix_synonyms: Vec::new(),
            uri_prefix_synonyms: Vec::new(),
        }
    }
}

impl Context {
    /// Project the canonical records and their synonyms.
    ///
    /// Records are sorted by canonical prefix; synonym lists are deduplicated
    /// and sorted. A `namespace_alias` whose namespace is not canonical here
    /// (e.g. it came from a lower priority source that never won) is skipped.
    pub fn as_extended_prefix_map(&self) -> Vec<ExtendedPrefixRecord> {
        let mut prefix_map: BTreeMap<&str, &str> = BTreeMap::new();
        let mut reverse_prefix_map: BTreeMap<&str, &str> = BTreeMap::new();
        for pe in self.canonical_expansions() {
            prefix_map.insert(pe.prefix.as_str(), pe.namespace.as_str());
            reverse_prefix_map.insert(pe.namespace.as_str(), pe.prefix.as_str());
        }

        let mut uri_prefix_synonyms: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        let mut prefix_synonyms: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for pe in self.prefix_expansions() {
            match pe.status {
                StatusType::PrefixAlias => {
                    uri_prefix_synonyms
                        .entry(pe.prefix.as_str())
                        .or_default()
                        .insert(pe.namespace.as_str());
                }
                StatusType::NamespaceAlias => match reverse_prefix_map.get(pe.namespace.as_str()) {
                    Some(canonical) => {
                        prefix_synonyms
                            .entry(*canonical)
                            .or_default()
                            .insert(pe.prefix.as_str());
                    }
                    None => {
                        tracing::info!(
                            context = %self.name,
                            namespace = %pe.namespace,
                            prefix = %pe.prefix,
                            "namespace alias is not a canonical expansion"
                        );
                    }
                },
                StatusType::Canonical | StatusType::MultiAlias => {}
            }
        }

        prefix_map
            .into_iter()
            .map(|(prefix, uri_prefix)| ExtendedPrefixRecord {
                prefix: prefix.to_string(),
                uri_prefix: uri_prefix.to_string(),
                prefix_synonyms: synonyms(&prefix_synonyms, prefix),
                uri_prefix_synonyms: synonyms(&uri_prefix_synonyms, prefix),
            })
            .collect()
    }
}

fn synonyms(table: &BTreeMap<&str, BTreeSet<&str>>, key: &str) -> Vec<String> {
    table
        .get(key)
        .map(|set| set.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}
