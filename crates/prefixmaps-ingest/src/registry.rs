//! Source registry: which adapter builds which context, and how merged
//! contexts are assembled.

use crate::bioregistry::{from_bioregistry_json, BioregistryOptions};
use crate::fetch::{fetch_text, is_remote, FetchConfig};
use crate::{bioportal, go, jsonld, linkml, shacl, w3id};
use anyhow::{bail, Context as _, Result};
use prefixmaps_core::{Context, PrefixMapError};
use prefixmaps_io::DataDir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// prefix.cc keys that clash with better-curated sources.
pub const PREFIXCC_EXCLUDE: &[&str] = &[
    "bp", "terms", "dc", "ma", "ont", "fb", "obo", "http", "dcterm", "dc11", "uniprot", "go",
    "gold", "chebi",
];

/// Priority order of the standard merged contexts.
pub const MERGED_PRIORITY: &[&str] = &["obo", "go", "linked_data", "bioregistry.upper", "prefixcc"];

fn default_true() -> bool {
    true
}

/// How to build one atomic context.
///
/// `location` is either an `http(s)` URL or a path resolved against the
/// data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    Shacl {
        location: String,
    },
    Jsonld {
        location: String,
        #[serde(default)]
        excludes: Vec<String>,
    },
    Linkml {
        location: String,
    },
    GoXrefs {
        location: String,
    },
    Bioportal {
        location: String,
    },
    Bioregistry {
        location: String,
        #[serde(default)]
        upper: bool,
        #[serde(default = "default_true")]
        filter_dubious: bool,
    },
    W3id {
        location: String,
    },
}

impl SourceKind {
    pub fn location(&self) -> &str {
        match self {
            SourceKind::Shacl { location }
            | SourceKind::Jsonld { location, .. }
            | SourceKind::Linkml { location }
            | SourceKind::GoXrefs { location }
            | SourceKind::Bioportal { location }
            | SourceKind::Bioregistry { location, .. }
            | SourceKind::W3id { location } => location,
        }
    }

    /// Run the adapter over already-retrieved source text.
    pub fn build(&self, text: &str, name: &str) -> Result<Context> {
        match self {
            SourceKind::Shacl { .. } => shacl::from_shacl_turtle(text, name),
            SourceKind::Jsonld { excludes, .. } => jsonld::from_jsonld_context(text, name, excludes),
            SourceKind::Linkml { .. } => linkml::from_linkml_yaml(text, Some(name)),
            SourceKind::GoXrefs { .. } => go::from_go_xrefs_yaml(text, name),
            SourceKind::Bioportal { .. } => bioportal::from_bioportal_yaml(text, name),
            SourceKind::Bioregistry {
                upper,
                filter_dubious,
                ..
            } => from_bioregistry_json(
                text,
                name,
                BioregistryOptions {
                    upper: *upper,
                    filter_dubious: *filter_dubious,
                },
            ),
            SourceKind::W3id { .. } => w3id::from_w3id_tree(text, name),
        }
    }
}

/// Named sources and merge recipes.
///
/// Built once and passed by reference; nothing here mutates after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRegistry {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceKind>,
    /// Merged context name -> member names, highest priority first.
    #[serde(default)]
    pub combined: BTreeMap<String, Vec<String>>,
}

impl SourceRegistry {
    /// The upstream registries the bundled snapshots are built from.
    pub fn standard() -> Self {
        let bioregistry_epm =
            "https://raw.githubusercontent.com/biopragmatics/bioregistry/main/exports/contexts/bioregistry.epm.json";
        let sources = [
            (
                "obo",
                SourceKind::Shacl {
                    location: "http://obofoundry.org/registry/obo_prefixes.ttl".into(),
                },
            ),
            (
                "go",
                SourceKind::GoXrefs {
                    location: "https://raw.githubusercontent.com/geneontology/go-site/master/metadata/db-xrefs.yaml".into(),
                },
            ),
            (
                "linked_data",
                SourceKind::Linkml {
                    location: "linked_data.curated.yaml".into(),
                },
            ),
            (
                "bioportal",
                SourceKind::Bioportal {
                    location: "bioportal.curated.yaml".into(),
                },
            ),
            (
                "bioregistry.upper",
                SourceKind::Bioregistry {
                    location: bioregistry_epm.into(),
                    upper: true,
                    filter_dubious: true,
                },
            ),
            (
                "bioregistry",
                SourceKind::Bioregistry {
                    location: bioregistry_epm.into(),
                    upper: false,
                    filter_dubious: true,
                },
            ),
            (
                "prefixcc",
                SourceKind::Jsonld {
                    location: "http://prefix.cc/context.jsonld".into(),
                    excludes: PREFIXCC_EXCLUDE.iter().map(|s| s.to_string()).collect(),
                },
            ),
            (
                "w3id",
                SourceKind::W3id {
                    location: "https://api.github.com/repos/perma-id/w3id.org/git/trees/master".into(),
                },
            ),
        ];

        let recipe: Vec<String> = MERGED_PRIORITY.iter().map(|s| s.to_string()).collect();
        let combined = ["merged", "merged.monarch", "merged.oak"]
            .into_iter()
            .map(|name| (name.to_string(), recipe.clone()))
            .collect();

        Self {
            fetch: FetchConfig::default(),
            sources: sources
                .into_iter()
                .map(|(name, source)| (name.to_string(), source))
                .collect(),
            combined,
        }
    }

    /// Read a registry from JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read registry {}", path.display()))?;
        let registry: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse registry {}", path.display()))?;
        registry.check()?;
        Ok(registry)
    }

    /// Every recipe member must be a known name; names must be unique across
    /// sources and recipes.
    pub fn check(&self) -> Result<()> {
        for (name, members) in &self.combined {
            if self.sources.contains_key(name) {
                bail!("{name} is both a source and a merge recipe");
            }
            for member in members {
                if !self.contains(member) {
                    bail!("merge recipe {name} refers to unknown context {member}");
                }
            }
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name) || self.combined.contains_key(name)
    }

    pub fn is_combined(&self, name: &str) -> bool {
        self.combined.contains_key(name)
    }

    /// Atomic sources first, then recipes.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().chain(self.combined.keys()).map(String::as_str)
    }

    /// Text at `location`: fetched when it is a URL, else read from the data
    /// directory.
    pub fn read_location(&self, data_dir: &DataDir, location: &str) -> Result<String> {
        if is_remote(location) {
            return fetch_text(&self.fetch, location);
        }
        let path = data_dir.curated_path(location);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read source {}", path.display()))
    }

    /// Build one atomic context from its upstream source.
    pub fn build_source(&self, data_dir: &DataDir, name: &str, source: &SourceKind) -> Result<Context> {
        let text = self.read_location(data_dir, source.location())?;
        let context = source
            .build(&text, name)
            .with_context(|| format!("failed to build context {name} from {}", source.location()))?;
        tracing::info!(context = %name, records = context.len(), "built context from source");
        Ok(context)
    }

    /// Build `name` from upstream, bypassing persisted snapshots.
    ///
    /// Merge recipes are built by combining their members, each built from
    /// upstream in turn.
    pub fn load_context_from_source(&self, data_dir: &DataDir, name: &str) -> Result<Context> {
        self.load_from_source(data_dir, name, &mut Vec::new())
    }

    fn load_from_source(
        &self,
        data_dir: &DataDir,
        name: &str,
        building: &mut Vec<String>,
    ) -> Result<Context> {
        if let Some(source) = self.sources.get(name) {
            return self.build_source(data_dir, name, source);
        }
        let Some(members) = self.combined.get(name) else {
            return Err(PrefixMapError::UnknownContext {
                name: name.to_string(),
            }
            .into());
        };
        if building.iter().any(|b| b == name) {
            bail!("merge recipe {name} refers back to itself");
        }

        building.push(name.to_string());
        let mut context = Context::new(name);
        for member in members {
            let part = self.load_from_source(data_dir, member, building)?;
            context.combine(&part)?;
        }
        building.pop();
        Ok(context)
    }

    /// Load `name` from the data directory, or from upstream when `refresh`.
    pub fn load_context(&self, data_dir: &DataDir, name: &str, refresh: bool) -> Result<Context> {
        if refresh {
            self.load_context_from_source(data_dir, name)
        } else {
            prefixmaps_io::load_context(data_dir, name)
        }
    }
}
