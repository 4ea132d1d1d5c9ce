//! Classification of prefix expansions.

use crate::error::PrefixMapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a [`crate::PrefixExpansion`] within its context.
///
/// Only canonical records are exposed through `as_dict`; the alias kinds are
/// kept for traceability and feed the synonym lists of the extended map.
///
/// The declaration order is the persisted sort order
/// (`canonical < prefix_alias < namespace_alias < multi_alias`), so the derived
/// `Ord` is relied upon by the writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusType {
    /// The authoritative mapping. Canonical records of a context are bijective.
    #[default]
    Canonical,
    /// The prefix already denotes a different canonical namespace.
    PrefixAlias,
    /// The namespace is already the canonical target of a different prefix.
    NamespaceAlias,
    /// Both prefix and namespace exist independently elsewhere.
    ///
    /// Never assigned by `Context::add_prefix` (see DESIGN.md), but accepted
    /// from callers and persisted files.
    MultiAlias,
}

impl StatusType {
    pub const ALL: [StatusType; 4] = [
        StatusType::Canonical,
        StatusType::PrefixAlias,
        StatusType::NamespaceAlias,
        StatusType::MultiAlias,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusType::Canonical => "canonical",
            StatusType::PrefixAlias => "prefix_alias",
            StatusType::NamespaceAlias => "namespace_alias",
            StatusType::MultiAlias => "multi_alias",
        }
    }

    /// Position in the persisted row order.
    pub fn sort_rank(self) -> u8 {
        match self {
            StatusType::Canonical => 0,
            StatusType::PrefixAlias => 1,
            StatusType::NamespaceAlias => 2,
            StatusType::MultiAlias => 3,
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusType {
    type Err = PrefixMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusType::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| PrefixMapError::UnknownStatus {
                value: s.to_string(),
            })
    }
}
