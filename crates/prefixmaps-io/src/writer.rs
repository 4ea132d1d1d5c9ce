use crate::data::DataDir;
use crate::{COLUMNS, EXPANSION_SOURCE_COLUMN};
use anyhow::{Context as _, Result};
use prefixmaps_core::{Context, PrefixExpansion};
use std::io::Write;
use std::path::Path;

/// Rows in persisted order: case-folded prefix, then status rank.
///
/// The sort is stable, so records equal on both keys keep insertion order.
fn sorted_rows(context: &Context) -> Vec<&PrefixExpansion> {
    let mut rows: Vec<&PrefixExpansion> = context.prefix_expansions().iter().collect();
    rows.sort_by_cached_key(|pe| (pe.prefix.to_lowercase(), pe.status.sort_rank()));
    rows
}

/// Write `context` as CSV.
pub fn context_to_writer<W: Write>(
    context: &Context,
    writer: W,
    include_expansion_source: bool,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = COLUMNS.to_vec();
    if include_expansion_source {
        header.push(EXPANSION_SOURCE_COLUMN);
    }
    csv.write_record(&header)?;

    for pe in sorted_rows(context) {
        let mut record = vec![
            pe.context.as_str(),
            pe.prefix.as_str(),
            pe.namespace.as_str(),
            pe.status.as_str(),
        ];
        if include_expansion_source {
            record.push(pe.expansion_source.as_deref().unwrap_or(""));
        }
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn context_to_file(
    context: &Context,
    path: &Path,
    include_expansion_source: bool,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    context_to_writer(context, std::io::BufWriter::new(file), include_expansion_source)
        .with_context(|| format!("failed to write context {} to {}", context.name, path.display()))
}

/// Write `context` to its standard location in `data_dir`.
pub fn save_context(data_dir: &DataDir, context: &Context, include_expansion_source: bool) -> Result<()> {
    context_to_file(
        context,
        &data_dir.context_path(&context.name),
        include_expansion_source,
    )
}
