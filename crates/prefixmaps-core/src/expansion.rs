//! A single `prefix -> namespace` declaration.

use crate::status::StatusType;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Prefixes must be valid CURIE prefixes: word characters and dots only.
pub const PREFIX_PATTERN: &str = r"^[\w\.]+$";

/// Namespaces are a restricted subset of URI syntax.
///
/// URLs with query parameters (`?`, `=`) or non-namespace fragments are
/// rejected: they are web pages for humans, almost never intended as the
/// subject of RDF statements.
pub const NAMESPACE_PATTERN: &str = r"^https?://[\w\.\-/]+[#/_:]$";

fn prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PREFIX_PATTERN).expect("PREFIX_PATTERN is a valid regex"))
}

fn namespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAMESPACE_PATTERN).expect("NAMESPACE_PATTERN is a valid regex"))
}

/// True if `prefix` is a syntactically valid prefix.
pub fn is_valid_prefix(prefix: &str) -> bool {
    prefix_re().is_match(prefix)
}

/// True if `namespace` matches the restricted namespace syntax.
pub fn is_valid_namespace(namespace: &str) -> bool {
    namespace_re().is_match(namespace)
}

/// One mapping between a prefix and a namespace inside a context.
///
/// Corresponds to a SHACL prefix declaration (`sh:prefix` / `sh:namespace`).
/// Records are created by `Context::add_prefix` (or reloaded from a persisted
/// file) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefixExpansion {
    /// Name of the owning context.
    pub context: String,
    pub prefix: String,
    pub namespace: String,
    pub status: StatusType,
    /// Originating context, set only in combined contexts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion_source: Option<String>,
}

impl PrefixExpansion {
    pub fn new(
        context: impl Into<String>,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
        status: StatusType,
    ) -> Self {
        Self {
            context: context.into(),
            prefix: prefix.into(),
            namespace: namespace.into(),
            status,
            expansion_source: None,
        }
    }

    pub fn with_expansion_source(mut self, source: impl Into<String>) -> Self {
        self.expansion_source = Some(source.into());
        self
    }

    /// True if this is the canonical mapping in both directions.
    ///
    /// Canonicality is relative to the context: `("GEO", ".../obo/GEO_")` is
    /// canonical in `obo` but may be an alias in a merged context.
    pub fn is_canonical(&self) -> bool {
        self.status == StatusType::Canonical
    }

    /// Human-readable validation findings; empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if !is_valid_prefix(&self.prefix) {
            messages.push(format!(
                "prefix {} does not match {PREFIX_PATTERN}",
                self.prefix
            ));
        }
        if !is_valid_namespace(&self.namespace) {
            messages.push(format!(
                "namespace {} does not match {NAMESPACE_PATTERN} (prefix: {})",
                self.namespace, self.prefix
            ));
        }
        messages
    }
}
