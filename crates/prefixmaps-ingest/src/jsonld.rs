//! JSON-LD `@context` objects (e.g. prefix.cc).

use anyhow::{bail, Context as _, Result};
use prefixmaps_core::Context;
use serde_json::Value;

/// Build a context from a JSON-LD document's `@context`.
///
/// Keys are taken in document order; `excludes` are skipped. Only string
/// values are supported.
pub fn from_jsonld_context(text: &str, name: &str, excludes: &[String]) -> Result<Context> {
    let doc: Value = serde_json::from_str(text).context("invalid JSON-LD document")?;
    let Some(entries) = doc.get("@context").and_then(Value::as_object) else {
        bail!("JSON-LD document has no @context object");
    };

    let mut context = Context::new(name);
    for (prefix, value) in entries {
        if excludes.iter().any(|e| e == prefix) {
            continue;
        }
        let Value::String(namespace) = value else {
            bail!("unsupported @context value for {prefix}: {value}");
        };
        context.add_prefix(prefix, namespace)?;
    }
    Ok(context)
}
