use anyhow::{anyhow, Context as _, Result};
use prefixmaps_core::{Context, PrefixExpansion, StatusType};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Row {
    context: String,
    prefix: String,
    namespace: String,
    status: String,
    #[serde(default)]
    expansion_source: Option<String>,
}

/// Read a persisted context.
///
/// Rows are appended in file order without collision resolution: the file is
/// taken as already classified. Each record keeps the `context` value of its
/// row; `name` only names the returned collection.
pub fn context_from_reader<R: Read>(name: &str, reader: R) -> Result<Context> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut context = Context::new(name);

    for (idx, row) in csv.deserialize::<Row>().enumerate() {
        // header is line 1
        let line = idx + 2;
        let row = row.with_context(|| format!("malformed row at line {line}"))?;
        let status: StatusType = row
            .status
            .parse()
            .map_err(|e| anyhow!("line {line}: {e}"))?;
        context.push_expansion(PrefixExpansion {
            context: row.context,
            prefix: row.prefix,
            namespace: row.namespace,
            status,
            expansion_source: row.expansion_source.filter(|s| !s.is_empty()),
        });
    }

    tracing::debug!(context = %name, records = context.len(), "loaded context");
    Ok(context)
}

pub fn context_from_file(name: &str, path: &Path) -> Result<Context> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    context_from_reader(name, std::io::BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}
