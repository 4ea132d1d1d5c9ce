//! Contexts: named, ordered collections of prefix expansions.
//!
//! A context should be internally consistent (its canonical records are a
//! bijection between prefixes and namespaces), but there is no guarantee that
//! it agrees with any other context. Combining contexts is therefore always
//! done in explicit priority order: the target wins, incoming conflicts are
//! demoted to aliases.

use crate::error::{PrefixMapError, Result};
use crate::expansion::PrefixExpansion;
use crate::status::StatusType;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ============================================================================
// Insertion options / outcome
// ============================================================================

/// Options for [`Context::add_prefix_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddPrefix {
    /// Status to use when neither prefix nor namespace collide.
    pub status: StatusType,
    /// Keep the prefix casing as given, bypassing the context's
    /// `upper`/`lower` normalization (e.g. an upstream-declared `FBbt`).
    pub preferred: bool,
    /// Originating context; set by [`Context::combine`].
    pub expansion_source: Option<String>,
}

impl AddPrefix {
    pub fn status(status: StatusType) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn preferred(mut self, preferred: bool) -> Self {
        self.preferred = preferred;
        self
    }

    pub fn expansion_source(mut self, source: impl Into<String>) -> Self {
        self.expansion_source = Some(source.into());
        self
    }
}

/// What [`Context::add_prefix_with`] did with a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A record was appended with the resolved status.
    Appended(StatusType),
    /// Prefix and namespace were both already present; nothing was appended.
    Redundant,
}

impl AddOutcome {
    pub fn status(self) -> Option<StatusType> {
        match self {
            AddOutcome::Appended(status) => Some(status),
            AddOutcome::Redundant => None,
        }
    }
}

// ============================================================================
// Derived key sets
// ============================================================================

/// Prefix/namespace sets derived from the records.
///
/// Records are append-only and immutable, so every append updates the sets
/// and they can never go stale.
#[derive(Debug, Clone, Default)]
struct KeyIndex {
    prefixes: BTreeSet<String>,
    prefixes_lower: BTreeSet<String>,
    namespaces: BTreeSet<String>,
    namespaces_lower: BTreeSet<String>,
}

impl KeyIndex {
    fn insert(&mut self, pe: &PrefixExpansion) {
        self.prefixes.insert(pe.prefix.clone());
        self.prefixes_lower.insert(pe.prefix.to_lowercase());
        self.namespaces.insert(pe.namespace.clone());
        self.namespaces_lower.insert(pe.namespace.to_lowercase());
    }
}

// ============================================================================
// Context
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Unique stable handle.
    pub name: String,
    pub description: Option<String>,
    pub comments: Vec<String>,
    pub location: Option<String>,
    pub format: Option<String>,
    /// Names of the contexts combined into this one, in combination order.
    pub merged_from: Vec<String>,
    /// Uppercase incoming prefixes (unless preferred).
    pub upper: bool,
    /// Lowercase incoming prefixes (unless preferred).
    pub lower: bool,
    prefix_expansions: Vec<PrefixExpansion>,
    index: KeyIndex,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_upper(mut self, upper: bool) -> Self {
        self.upper = upper;
        self
    }

    pub fn with_lower(mut self, lower: bool) -> Self {
        self.lower = lower;
        self
    }

    /// All records, in insertion order.
    pub fn prefix_expansions(&self) -> &[PrefixExpansion] {
        &self.prefix_expansions
    }

    pub fn len(&self) -> usize {
        self.prefix_expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefix_expansions.is_empty()
    }

    pub fn canonical_expansions(&self) -> impl Iterator<Item = &PrefixExpansion> {
        self.prefix_expansions.iter().filter(|pe| pe.is_canonical())
    }

    /// Add a canonical declaration with default options.
    pub fn add_prefix(&mut self, prefix: &str, namespace: &str) -> Result<AddOutcome> {
        self.add_prefix_with(prefix, namespace, AddPrefix::default())
    }

    /// Add a declaration, classifying it against the records already present.
    ///
    /// Collisions are detected case-insensitively, before the record is appended:
    ///
    /// 1. prefix and namespace both known: redundant, nothing is appended
    /// 2. only the prefix is known: `prefix_alias`
    /// 3. only the namespace is known: `namespace_alias`
    /// 4. neither: `options.status` (canonical by default)
    ///
    /// Records are never reordered: the first declaration of a prefix or
    /// namespace keeps canonical status.
    pub fn add_prefix_with(
        &mut self,
        prefix: &str,
        namespace: &str,
        options: AddPrefix,
    ) -> Result<AddOutcome> {
        if self.upper && self.lower {
            return Err(PrefixMapError::ConflictingCaseNormalization {
                context: self.name.clone(),
            });
        }

        let prefix = if options.preferred {
            prefix.to_string()
        } else if self.upper {
            prefix.to_uppercase()
        } else if self.lower {
            prefix.to_lowercase()
        } else {
            prefix.to_string()
        };

        let prefix_known = self.index.prefixes_lower.contains(&prefix.to_lowercase());
        let namespace_known = self
            .index
            .namespaces_lower
            .contains(&namespace.to_lowercase());

        // Both known also covers the case where they are known independently of
        // each other; `multi_alias` is not assigned here (see DESIGN.md).
        let status = match (prefix_known, namespace_known) {
            (true, true) => {
                tracing::trace!(
                    context = %self.name,
                    prefix = %prefix,
                    namespace = %namespace,
                    "dropping redundant prefix declaration"
                );
                return Ok(AddOutcome::Redundant);
            }
            (true, false) => StatusType::PrefixAlias,
            (false, true) => StatusType::NamespaceAlias,
            (false, false) => options.status,
        };

        let pe = PrefixExpansion {
            context: self.name.clone(),
            prefix,
            namespace: namespace.to_string(),
            status,
            expansion_source: options.expansion_source,
        };
        self.push_expansion(pe);
        Ok(AddOutcome::Appended(status))
    }

    /// Append an already-classified record as-is, without collision resolution.
    ///
    /// Used when reloading a persisted context, where the file is authoritative.
    pub fn push_expansion(&mut self, pe: PrefixExpansion) {
        self.index.insert(&pe);
        self.prefix_expansions.push(pe);
    }

    /// Merge `other` into this context.
    ///
    /// Every record of `other` is re-added in its stored order, tagged with
    /// `other.name` as its expansion source. Existing canonical assignments of
    /// `self` always take precedence; conflicting incoming records become aliases.
    pub fn combine(&mut self, other: &Context) -> Result<()> {
        for pe in &other.prefix_expansions {
            self.add_prefix_with(
                &pe.prefix,
                &pe.namespace,
                AddPrefix::status(pe.status).expansion_source(other.name.clone()),
            )?;
        }
        self.merged_from.push(other.name.clone());
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Records matching the given equality constraints (`None` matches anything).
    pub fn filter(&self, prefix: Option<&str>, namespace: Option<&str>) -> Vec<&PrefixExpansion> {
        self.prefix_expansions
            .iter()
            .filter(|pe| prefix.map_or(true, |p| p == pe.prefix))
            .filter(|pe| namespace.map_or(true, |n| n == pe.namespace))
            .collect()
    }

    /// All unique prefixes, optionally lowercased.
    pub fn prefixes(&self, lower: bool) -> &BTreeSet<String> {
        if lower {
            &self.index.prefixes_lower
        } else {
            &self.index.prefixes
        }
    }

    /// All unique namespaces, optionally lowercased.
    pub fn namespaces(&self, lower: bool) -> &BTreeSet<String> {
        if lower {
            &self.index.namespaces_lower
        } else {
            &self.index.namespaces
        }
    }

    /// Canonical `prefix -> namespace` map, safe to use in RDF document headers.
    ///
    /// If duplicate canonical prefixes exist, the last inserted one wins.
    pub fn as_dict(&self) -> BTreeMap<String, String> {
        self.canonical_expansions()
            .map(|pe| (pe.prefix.clone(), pe.namespace.clone()))
            .collect()
    }

    /// Canonical `namespace -> prefix` map.
    pub fn as_inverted_dict(&self) -> BTreeMap<String, String> {
        self.canonical_expansions()
            .map(|pe| (pe.namespace.clone(), pe.prefix.clone()))
            .collect()
    }

    /// Validation findings for canonical records only, or for every record.
    pub fn validate(&self, canonical_only: bool) -> Vec<String> {
        self.prefix_expansions
            .iter()
            .filter(|pe| !canonical_only || pe.is_canonical())
            .flat_map(PrefixExpansion::validate)
            .collect()
    }

    // ========================================================================
    // Integrity checks
    // ========================================================================

    /// Prefixes declared canonical more than once.
    pub fn duplicate_canonical_prefixes(&self) -> BTreeSet<String> {
        duplicates(self.canonical_expansions().map(|pe| pe.prefix.as_str()))
    }

    /// Namespaces that are the canonical target of more than one record.
    pub fn duplicate_canonical_namespaces(&self) -> BTreeSet<String> {
        duplicates(self.canonical_expansions().map(|pe| pe.namespace.as_str()))
    }

    /// Alias records whose anchor never became canonical.
    ///
    /// A `prefix_alias` must share its prefix with a canonical record, a
    /// `namespace_alias` its namespace. Comparison is case-insensitive, like
    /// the classification that produced the aliases.
    pub fn dangling_aliases(&self) -> Vec<&PrefixExpansion> {
        let canonical_prefixes: BTreeSet<String> = self
            .canonical_expansions()
            .map(|pe| pe.prefix.to_lowercase())
            .collect();
        let canonical_namespaces: BTreeSet<String> = self
            .canonical_expansions()
            .map(|pe| pe.namespace.to_lowercase())
            .collect();

        self.prefix_expansions
            .iter()
            .filter(|pe| match pe.status {
                StatusType::PrefixAlias => {
                    !canonical_prefixes.contains(&pe.prefix.to_lowercase())
                }
                StatusType::NamespaceAlias => {
                    !canonical_namespaces.contains(&pe.namespace.to_lowercase())
                }
                StatusType::Canonical | StatusType::MultiAlias => false,
            })
            .collect()
    }
}

fn duplicates<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(key, _)| key.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GO_NS: &str = "http://purl.obolibrary.org/obo/GO_";
    const CL_NS: &str = "http://purl.obolibrary.org/obo/CL_";

    fn obo() -> Context {
        let mut ctx = Context::new("obo");
        for (p, ns) in [
            ("GO", GO_NS),
            ("CL", CL_NS),
            ("GEO", "http://purl.obolibrary.org/obo/GEO_"),
            ("WBPhenotype", "http://purl.obolibrary.org/obo/WBPhenotype_"),
        ] {
            assert_eq!(
                ctx.add_prefix(p, ns).unwrap(),
                AddOutcome::Appended(StatusType::Canonical)
            );
        }
        ctx
    }

    #[test]
    fn lowercase_prefix_collision_becomes_prefix_alias() {
        let mut ctx = obo();
        let outcome = ctx.add_prefix("go", "http://example.org/go/").unwrap();
        assert_eq!(outcome, AddOutcome::Appended(StatusType::PrefixAlias));

        let found = ctx.filter(Some("go"), None);
        assert_eq!(found.len(), 1);
        // ordering preserved: the alias is the last record
        assert_eq!(found[0], ctx.prefix_expansions().last().unwrap());
        assert_eq!(ctx.as_dict()["GO"], GO_NS);
    }

    #[test]
    fn namespace_collision_is_case_insensitive() {
        let mut ctx = obo();
        ctx.add_prefix("notcl", "http://purl.obolibrary.org/obo/cl_")
            .unwrap();
        let found = ctx.filter(Some("notcl"), None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].status, StatusType::NamespaceAlias);
        assert!(!found[0].is_canonical());
    }

    #[test]
    fn namespace_alias_keeps_given_namespace() {
        let mut ctx = obo();
        ctx.add_prefix("GEOGEO", "http://purl.obolibrary.org/obo/GEO_")
            .unwrap();
        let found = ctx.filter(Some("GEOGEO"), None);
        assert_eq!(found[0].status, StatusType::NamespaceAlias);
        assert_eq!(found[0].namespace, "http://purl.obolibrary.org/obo/GEO_");
    }

    #[test]
    fn fresh_pair_is_canonical_and_caller_status_is_overridden_on_collision() {
        let mut ctx = obo();
        assert_eq!(
            ctx.add_prefix("x", "http://example.org/x/").unwrap(),
            AddOutcome::Appended(StatusType::Canonical)
        );
        let outcome = ctx
            .add_prefix_with(
                "x",
                "http://example.org/y/",
                AddPrefix::status(StatusType::Canonical),
            )
            .unwrap();
        assert_eq!(outcome, AddOutcome::Appended(StatusType::PrefixAlias));
    }

    #[test]
    fn redundant_declaration_is_a_noop() {
        let mut ctx = obo();
        let before = ctx.len();
        assert_eq!(ctx.add_prefix("GO", GO_NS).unwrap(), AddOutcome::Redundant);
        assert_eq!(ctx.add_prefix("go", &GO_NS.to_lowercase()).unwrap(), AddOutcome::Redundant);
        assert_eq!(ctx.len(), before);
    }

    #[test]
    fn independently_known_prefix_and_namespace_is_dropped() {
        let mut ctx = obo();
        let before = ctx.len();
        assert_eq!(ctx.add_prefix("CL", GO_NS).unwrap(), AddOutcome::Redundant);
        assert_eq!(ctx.len(), before);
    }

    #[test]
    fn case_normalization() {
        let mut ctx = Context::new("upper").with_upper(true);
        ctx.add_prefix("go", GO_NS).unwrap();
        ctx.add_prefix_with("FBbt", "http://purl.obolibrary.org/obo/FBbt_", AddPrefix::default().preferred(true))
            .unwrap();
        assert!(ctx.as_dict().contains_key("GO"));
        assert!(ctx.as_dict().contains_key("FBbt"));

        let mut ctx = Context::new("lower").with_lower(true);
        ctx.add_prefix("OWL", "http://www.w3.org/2002/07/owl#").unwrap();
        assert!(ctx.as_dict().contains_key("owl"));
    }

    #[test]
    fn conflicting_case_flags_are_fatal() {
        let mut ctx = Context::new("bad").with_upper(true).with_lower(true);
        let err = ctx.add_prefix("go", GO_NS).unwrap_err();
        assert_eq!(
            err,
            PrefixMapError::ConflictingCaseNormalization {
                context: "bad".to_string()
            }
        );
        assert!(ctx.is_empty());
    }

    #[test]
    fn combine_respects_target_priority() {
        let mut a = Context::new("a");
        a.add_prefix("x", "http://a/x/").unwrap();
        let mut b = Context::new("b");
        b.add_prefix("x", "http://b/x/").unwrap();
        b.add_prefix("y", "http://b/y/").unwrap();

        a.combine(&b).unwrap();

        assert_eq!(a.as_dict()["x"], "http://a/x/");
        assert_eq!(a.as_dict()["y"], "http://b/y/");
        let alias = a.filter(Some("x"), Some("http://b/x/"));
        assert_eq!(alias.len(), 1);
        assert_eq!(alias[0].status, StatusType::PrefixAlias);
        assert_eq!(alias[0].context, "a");
        assert_eq!(alias[0].expansion_source.as_deref(), Some("b"));
        assert_eq!(a.merged_from, vec!["b".to_string()]);
        // source untouched
        assert_eq!(b.len(), 2);
        assert!(b.prefix_expansions().iter().all(|pe| pe.expansion_source.is_none()));
    }

    #[test]
    fn combine_carries_source_status_for_new_keys() {
        let mut src = Context::new("src");
        src.add_prefix_with("p", "http://p/", AddPrefix::status(StatusType::MultiAlias))
            .unwrap();
        let mut dst = Context::new("dst");
        dst.combine(&src).unwrap();
        assert_eq!(dst.prefix_expansions()[0].status, StatusType::MultiAlias);
    }

    #[test]
    fn key_sets_track_appends() {
        let mut ctx = obo();
        assert!(ctx.prefixes(false).contains("GO"));
        assert!(ctx.prefixes(true).contains("go"));
        assert!(!ctx.prefixes(true).contains("GO"));
        ctx.add_prefix("new", "http://example.org/New/").unwrap();
        assert!(ctx.prefixes(false).contains("new"));
        assert!(ctx.namespaces(false).contains("http://example.org/New/"));
        assert!(ctx.namespaces(true).contains("http://example.org/new/"));
    }

    #[test]
    fn filter_by_prefix_and_namespace() {
        let ctx = obo();
        assert_eq!(ctx.filter(None, None).len(), ctx.len());
        assert_eq!(ctx.filter(Some("CL"), Some(CL_NS)).len(), 1);
        assert!(ctx.filter(Some("CL"), Some(GO_NS)).is_empty());
        assert!(ctx.filter(Some("cl"), None).is_empty());
    }

    #[test]
    fn inverted_dict_mirrors_dict() {
        let ctx = obo();
        let dict = ctx.as_dict();
        let inverted = ctx.as_inverted_dict();
        assert_eq!(dict.len(), inverted.len());
        for (p, ns) in &dict {
            assert_eq!(&inverted[ns], p);
        }
    }

    #[test]
    fn validate_canonical_only_skips_aliases() {
        let mut ctx = Context::new("t");
        ctx.add_prefix("ok", "http://example.org/ok/").unwrap();
        ctx.add_prefix("ok", "http://example.org/search?q=").unwrap();
        assert!(ctx.validate(true).is_empty());
        assert_eq!(ctx.validate(false).len(), 1);
    }

    #[test]
    fn raw_pushes_can_break_bijectivity_and_are_reported() {
        let mut ctx = Context::new("raw");
        ctx.push_expansion(PrefixExpansion::new("raw", "a", "http://a/", StatusType::Canonical));
        ctx.push_expansion(PrefixExpansion::new("raw", "a", "http://b/", StatusType::Canonical));
        ctx.push_expansion(PrefixExpansion::new("raw", "c", "http://b/", StatusType::Canonical));
        ctx.push_expansion(PrefixExpansion::new("raw", "z", "http://z/", StatusType::PrefixAlias));

        assert_eq!(ctx.duplicate_canonical_prefixes(), BTreeSet::from(["a".to_string()]));
        assert_eq!(
            ctx.duplicate_canonical_namespaces(),
            BTreeSet::from(["http://b/".to_string()])
        );
        // last inserted wins
        assert_eq!(ctx.as_dict()["a"], "http://b/");
        let dangling = ctx.dangling_aliases();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].prefix, "z");
        // raw records still participate in collision detection
        assert_eq!(ctx.add_prefix("A", "http://new/").unwrap(), AddOutcome::Appended(StatusType::PrefixAlias));
    }

    #[test]
    fn namespace_aliases_need_a_canonical_namespace() {
        let mut ctx = Context::new("raw");
        ctx.push_expansion(PrefixExpansion::new("raw", "GO", "http://Purl.org/GO_", StatusType::Canonical));
        ctx.push_expansion(PrefixExpansion::new("raw", "gomf", "http://purl.org/go_", StatusType::NamespaceAlias));
        ctx.push_expansion(PrefixExpansion::new("raw", "orphan", "http://nowhere/", StatusType::NamespaceAlias));
        ctx.push_expansion(PrefixExpansion::new("raw", "go", "http://identifiers.org/go/", StatusType::PrefixAlias));

        let dangling = ctx.dangling_aliases();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].prefix, "orphan");
        assert_eq!(dangling[0].status, StatusType::NamespaceAlias);
    }

    #[test]
    fn well_formed_context_has_no_integrity_findings() {
        let mut ctx = obo();
        ctx.add_prefix("go", "http://example.org/go/").unwrap();
        ctx.add_prefix("notcl", "http://purl.obolibrary.org/obo/cl_").unwrap();
        assert!(ctx.duplicate_canonical_prefixes().is_empty());
        assert!(ctx.duplicate_canonical_namespaces().is_empty());
        assert!(ctx.dangling_aliases().is_empty());
    }
}
