//! Rebuild persisted snapshots from upstream.

use crate::registry::SourceRegistry;
use anyhow::{bail, Context as _, Result};
use prefixmaps_core::{Context, PrefixMapError};
use prefixmaps_io::{save_context, DataDir};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Build every registered context and write `<name>.csv` into
/// `output_directory`.
///
/// Atomic sources are built once; merge recipes combine the already-built
/// contexts, and a recipe may name another recipe. Only merged contexts get
/// the `expansion_source` column. Returns the written paths.
pub fn run_etl(
    registry: &SourceRegistry,
    data_dir: &DataDir,
    output_directory: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_directory)
        .with_context(|| format!("failed to create {}", output_directory.display()))?;
    let output = DataDir::new(output_directory);

    let mut built: BTreeMap<String, Context> = BTreeMap::new();
    for (name, source) in &registry.sources {
        let context = registry.build_source(data_dir, name, source)?;
        built.insert(name.clone(), context);
    }

    let mut written = Vec::new();
    for (name, context) in &built {
        written.push(write(&output, context, false)?);
        tracing::debug!(context = %name, "wrote snapshot");
    }

    for name in registry.combined.keys() {
        build_merged(registry, name, &mut built, &mut Vec::new())?;
        if let Some(merged) = built.get(name) {
            written.push(write(&output, merged, true)?);
        }
    }
    Ok(written)
}

/// Build the recipe `name` into `built`, building member recipes first.
fn build_merged(
    registry: &SourceRegistry,
    name: &str,
    built: &mut BTreeMap<String, Context>,
    building: &mut Vec<String>,
) -> Result<()> {
    if built.contains_key(name) {
        return Ok(());
    }
    let members = registry
        .combined
        .get(name)
        .ok_or_else(|| PrefixMapError::UnknownContext {
            name: name.to_string(),
        })?;
    if building.iter().any(|b| b == name) {
        bail!("merge recipe {name} refers back to itself");
    }

    building.push(name.to_string());
    for member in members {
        build_merged(registry, member, built, building)?;
    }
    building.pop();

    let mut merged = Context::new(name);
    for member in members {
        if let Some(part) = built.get(member) {
            merged.combine(part)?;
        }
    }
    tracing::info!(context = %name, records = merged.len(), "built merged context");
    built.insert(name.to_string(), merged);
    Ok(())
}

fn write(output: &DataDir, context: &Context, include_expansion_source: bool) -> Result<PathBuf> {
    save_context(output, context, include_expansion_source)?;
    Ok(output.context_path(&context.name))
}
