//! Ingestion of upstream prefix registries into [`prefixmaps_core::Context`]s.
//!
//! Each adapter module exposes a pure `from_*` function over source text.
//! [`SourceRegistry`] ties context names to adapters and source locations and
//! knows how merged contexts are assembled; [`run_etl`] rebuilds every
//! persisted snapshot.

pub mod bioportal;
pub mod bioregistry;
pub mod etl;
pub mod fetch;
pub mod go;
pub mod jsonld;
pub mod linkml;
pub mod registry;
pub mod shacl;
pub mod w3id;

pub use bioportal::from_bioportal_yaml;
pub use bioregistry::{from_bioregistry_json, from_bioregistry_records, BioregistryOptions, BioregistryRecord};
pub use etl::run_etl;
pub use fetch::FetchConfig;
pub use go::from_go_xrefs_yaml;
pub use jsonld::from_jsonld_context;
pub use linkml::from_linkml_yaml;
pub use registry::{SourceRegistry, SourceKind, MERGED_PRIORITY, PREFIXCC_EXCLUDE};
pub use shacl::from_shacl_turtle;
pub use w3id::from_w3id_tree;
