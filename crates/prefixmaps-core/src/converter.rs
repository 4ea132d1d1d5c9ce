//! Bidirectional CURIE <-> URI conversion over an extended prefix map.

use crate::context::Context;
use crate::error::{PrefixMapError, Result};
use crate::extended::ExtendedPrefixRecord;
use std::collections::{BTreeMap, HashMap};

/// Split a CURIE on its first colon into `(prefix, local_id)`.
pub fn parse_curie(curie: &str) -> Result<(&str, &str)> {
    curie
        .split_once(':')
        .ok_or_else(|| PrefixMapError::InvalidCurie {
            curie: curie.to_string(),
        })
}

/// Expands CURIEs and compresses URIs.
///
/// Both canonical and synonym prefixes/URI prefixes are understood on input;
/// output always uses the canonical forms. When two records claim the same
/// synonym, the first record keeps it.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    records: Vec<ExtendedPrefixRecord>,
    /// Any known prefix -> record index.
    by_prefix: HashMap<String, usize>,
    /// Any known URI prefix -> record index, longest URI prefix first.
    by_uri_prefix: Vec<(String, usize)>,
}

impl Converter {
    pub fn from_extended_prefix_map(
        records: impl IntoIterator<Item = ExtendedPrefixRecord>,
    ) -> Self {
        let records: Vec<ExtendedPrefixRecord> = records.into_iter().collect();
        let mut by_prefix: HashMap<String, usize> = HashMap::new();
        let mut by_uri: HashMap<String, usize> = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            let prefixes = std::iter::once(&record.prefix).chain(&record.prefix_synonyms);
            for prefix in prefixes {
                claim(&mut by_prefix, prefix, idx, "prefix");
            }
            let uri_prefixes =
                std::iter::once(&record.uri_prefix).chain(&record.uri_prefix_synonyms);
            for uri_prefix in uri_prefixes {
                claim(&mut by_uri, uri_prefix, idx, "uri_prefix");
            }
        }

        let mut by_uri_prefix: Vec<(String, usize)> = by_uri.into_iter().collect();
        by_uri_prefix.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            records,
            by_prefix,
            by_uri_prefix,
        }
    }

    pub fn records(&self) -> &[ExtendedPrefixRecord] {
        &self.records
    }

    /// Canonical `prefix -> uri_prefix`.
    pub fn prefix_map(&self) -> BTreeMap<String, String> {
        self.records
            .iter()
            .map(|r| (r.prefix.clone(), r.uri_prefix.clone()))
            .collect()
    }

    /// Every known URI prefix (canonical or synonym) -> canonical prefix.
    pub fn reverse_prefix_map(&self) -> BTreeMap<String, String> {
        self.by_uri_prefix
            .iter()
            .map(|(uri_prefix, idx)| (uri_prefix.clone(), self.records[*idx].prefix.clone()))
            .collect()
    }

    fn record_for_prefix(&self, prefix: &str) -> Option<&ExtendedPrefixRecord> {
        self.by_prefix.get(prefix).map(|idx| &self.records[*idx])
    }

    /// Canonical form of a (possibly synonym) prefix.
    pub fn standardize_prefix(&self, prefix: &str) -> Option<&str> {
        self.record_for_prefix(prefix).map(|r| r.prefix.as_str())
    }

    /// Rewrite a CURIE to use the canonical prefix.
    pub fn standardize_curie(&self, curie: &str) -> Option<String> {
        let (prefix, local) = parse_curie(curie).ok()?;
        let canonical = self.standardize_prefix(prefix)?;
        Some(format!("{canonical}:{local}"))
    }

    pub fn expand_pair(&self, prefix: &str, local_id: &str) -> Option<String> {
        self.record_for_prefix(prefix)
            .map(|r| format!("{}{local_id}", r.uri_prefix))
    }

    /// Expand a CURIE to a full URI; `None` if the prefix is unknown or the
    /// input has no colon.
    pub fn expand(&self, curie: &str) -> Option<String> {
        let (prefix, local) = parse_curie(curie).ok()?;
        self.expand_pair(prefix, local)
    }

    /// Compress a URI with the longest matching URI prefix.
    pub fn compress(&self, uri: &str) -> Option<String> {
        self.by_uri_prefix.iter().find_map(|(uri_prefix, idx)| {
            uri.strip_prefix(uri_prefix.as_str())
                .map(|local| format!("{}:{local}", self.records[*idx].prefix))
        })
    }
}

fn claim(table: &mut HashMap<String, usize>, key: &str, idx: usize, kind: &str) {
    if let Some(existing) = table.get(key) {
        if *existing != idx {
            tracing::debug!(
                key,
                kind,
                kept = *existing,
                dropped = idx,
                "duplicate synonym in extended prefix map"
            );
        }
        return;
    }
    table.insert(key.to_string(), idx);
}

impl Context {
    /// Converter over this context's extended prefix map.
    pub fn as_converter(&self) -> Converter {
        Converter::from_extended_prefix_map(self.as_extended_prefix_map())
    }
}
