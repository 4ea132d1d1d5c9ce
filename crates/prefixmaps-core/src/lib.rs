//! Prefix maps: curated mappings between short prefixes and namespace URIs.
//!
//! This crate is the in-memory core:
//!
//! - [`PrefixExpansion`]: one declared `prefix -> namespace` record with a [`StatusType`]
//! - [`Context`]: a named, ordered collection of records, with the insertion
//!   (collision resolution) and combination algorithms
//! - [`ExtendedPrefixRecord`]: the canonical-plus-synonyms projection
//! - [`Converter`]: bidirectional CURIE/URI lookup built from that projection
//!
//! The core never performs I/O. Reading and writing persisted contexts lives in
//! `prefixmaps-io`, fetching upstream registries in `prefixmaps-ingest`.

pub mod context;
pub mod converter;
pub mod error;
pub mod expansion;
pub mod extended;
pub mod status;

pub use context::{AddOutcome, AddPrefix, Context};
pub use converter::Converter;
pub use error::{PrefixMapError, Result};
pub use expansion::PrefixExpansion;
pub use extended::ExtendedPrefixRecord;
pub use status::StatusType;
