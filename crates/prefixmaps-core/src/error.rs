use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrefixMapError>;

/// Fatal errors raised by the core.
///
/// Malformed prefixes and namespaces are *not* errors: they are accepted at
/// insertion time and reported as data by `validate()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixMapError {
    #[error("context `{context}` sets both upper and lower case normalization")]
    ConflictingCaseNormalization { context: String },

    #[error("no such context: {name}")]
    UnknownContext { name: String },

    #[error("not a CURIE (missing `:`): {curie}")]
    InvalidCurie { curie: String },

    #[error("unknown status `{value}` (expected canonical, prefix_alias, namespace_alias or multi_alias)")]
    UnknownStatus { value: String },
}
