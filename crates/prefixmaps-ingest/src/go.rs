//! Gene Ontology `db-xrefs.yaml`.

use anyhow::{Context as _, Result};
use prefixmaps_core::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DbXref {
    database: String,
    #[serde(default)]
    rdf_uri_prefix: Option<String>,
}

/// Build a context from the GO database cross-reference registry.
///
/// Entries without `rdf_uri_prefix` are skipped. Namespaces not ending in
/// `/`, `#` or `_` get a trailing `/`.
pub fn from_go_xrefs_yaml(text: &str, name: &str) -> Result<Context> {
    let entries: Vec<DbXref> = serde_yaml::from_str(text).context("invalid db-xrefs YAML")?;
    let mut context = Context::new(name);
    for entry in entries {
        let Some(mut namespace) = entry.rdf_uri_prefix else {
            continue;
        };
        if !namespace.ends_with(['/', '#', '_']) {
            namespace.push('/');
        }
        context.add_prefix(&entry.database, &namespace)?;
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_namespace_endings() {
        let text = "\
- database: GO
  name: Gene Ontology
  rdf_uri_prefix: http://purl.obolibrary.org/obo/GO_
- database: UniProtKB
  rdf_uri_prefix: http://purl.uniprot.org/uniprot
- database: NoRdf
  name: Has no prefix
- database: dcterms
  rdf_uri_prefix: http://purl.org/dc/terms#
";
        let ctx = from_go_xrefs_yaml(text, "go").unwrap();
        let dict = ctx.as_dict();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict["GO"], "http://purl.obolibrary.org/obo/GO_");
        assert_eq!(dict["UniProtKB"], "http://purl.uniprot.org/uniprot/");
        assert_eq!(dict["dcterms"], "http://purl.org/dc/terms#");
        assert!(!dict.contains_key("NoRdf"));
    }
}
