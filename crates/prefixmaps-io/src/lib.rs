//! Persisted prefix map contexts.
//!
//! One UTF-8 CSV file per context, columns `context,prefix,namespace,status`
//! plus an optional `expansion_source` column for combined contexts:
//!
//! ```text
//! context,prefix,namespace,status
//! obo,GO,http://purl.obolibrary.org/obo/GO_,canonical
//! obo,go,http://example.org/go/,prefix_alias
//! ```
//!
//! Rows are written sorted by case-folded prefix then status, so regenerated
//! files diff cleanly. Reading keeps file order, which therefore becomes the
//! insertion order of the reloaded context (a documented, lossy round-trip:
//! canonical content is preserved, original insertion order is not).

pub mod data;
pub mod loader;
pub mod parser;
pub mod writer;

pub use data::{DataDir, DATA_DIR_ENV};
pub use loader::{load_context, load_converter, load_multi_context, merge_named};
pub use parser::{context_from_file, context_from_reader};
pub use writer::{context_to_file, context_to_writer, save_context};

pub const COLUMNS: [&str; 4] = ["context", "prefix", "namespace", "status"];
pub const EXPANSION_SOURCE_COLUMN: &str = "expansion_source";
