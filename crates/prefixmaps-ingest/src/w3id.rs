//! w3id.org permanent identifier namespaces, from the GitHub tree listing of
//! the w3id.org repository.

use anyhow::{bail, Context as _, Result};
use prefixmaps_core::Context;
use serde::Deserialize;

pub const W3ID_BASE: &str = "https://w3id.org/";

#[derive(Debug, Deserialize)]
struct Tree {
    #[serde(default)]
    truncated: bool,
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Build a context with one `path -> https://w3id.org/<path>/` entry per
/// top-level directory.
///
/// Paths containing `.` (files, dot-directories) are skipped. A truncated
/// listing is an error, since entries would be silently missing.
pub fn from_w3id_tree(text: &str, name: &str) -> Result<Context> {
    let tree: Tree = serde_json::from_str(text).context("invalid GitHub tree listing")?;
    if tree.truncated {
        bail!("GitHub tree listing is truncated");
    }

    let mut context = Context::new(name);
    for entry in tree.tree {
        if entry.kind != "tree" || entry.path.contains('.') || entry.path.contains('/') {
            continue;
        }
        context.add_prefix(&entry.path, &format!("{W3ID_BASE}{}/", entry.path))?;
    }
    Ok(context)
}
