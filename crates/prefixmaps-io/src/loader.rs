//! Lookup entry points over a [`DataDir`].

use crate::data::DataDir;
use crate::parser::context_from_file;
use anyhow::Result;
use prefixmaps_core::{Context, Converter, PrefixMapError};

/// Load one persisted context by name.
pub fn load_context(data_dir: &DataDir, name: &str) -> Result<Context> {
    let path = data_dir.context_path(name);
    if !path.is_file() {
        return Err(PrefixMapError::UnknownContext {
            name: name.to_string(),
        }
        .into());
    }
    context_from_file(name, &path)
}

/// Load several contexts and merge them in priority order (first name wins).
///
/// The result is named `names.join("+")`. A single name is loaded as-is.
pub fn load_multi_context<S: AsRef<str>>(data_dir: &DataDir, names: &[S]) -> Result<Context> {
    merge_named(names, |name| load_context(data_dir, name))
}

/// Merge the contexts `load` returns for each name, in priority order,
/// naming the result like [`load_multi_context`].
pub fn merge_named<S, F>(names: &[S], mut load: F) -> Result<Context>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Result<Context>,
{
    if let [only] = names {
        return load(only.as_ref());
    }
    let joined: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
    let mut merged = Context::new(joined.join("+"));
    for name in &joined {
        let context = load(name)?;
        merged.combine(&context)?;
    }
    Ok(merged)
}

/// Converter over one or more merged contexts.
pub fn load_converter<S: AsRef<str>>(data_dir: &DataDir, names: &[S]) -> Result<Converter> {
    Ok(load_multi_context(data_dir, names)?.as_converter())
}
