use crate::ShowFormat;
use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use prefixmaps_core::converter::parse_curie;
use prefixmaps_core::{Context, Converter};
use prefixmaps_io::DataDir;
use prefixmaps_ingest::SourceRegistry;
use std::io::Write;
use std::path::Path;

/// Load one context, or several merged in priority order.
pub fn load(
    registry: &SourceRegistry,
    data_dir: &DataDir,
    names: &[String],
    refresh: bool,
) -> Result<Context> {
    tracing::debug!(names = ?names, refresh, data_dir = %data_dir.root().display(), "loading contexts");
    prefixmaps_io::merge_named(names, |name| registry.load_context(data_dir, name, refresh))
}

pub fn cmd_etl(registry: &SourceRegistry, data_dir: &DataDir, output_directory: &Path) -> Result<()> {
    let written = prefixmaps_ingest::run_etl(registry, data_dir, output_directory)?;
    for path in &written {
        eprintln!("{} {}", "wrote".green().bold(), path.display());
    }
    Ok(())
}

pub fn cmd_list(data_dir: &DataDir, out: &mut impl Write) -> Result<()> {
    for name in data_dir.context_paths()?.keys() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub fn cmd_show(context: &Context, format: ShowFormat, all: bool, out: &mut impl Write) -> Result<()> {
    match format {
        ShowFormat::Csv => {
            let include_source = context
                .prefix_expansions()
                .iter()
                .any(|pe| pe.expansion_source.is_some());
            prefixmaps_io::context_to_writer(context, &mut *out, include_source)?;
        }
        ShowFormat::Json if all => {
            serde_json::to_writer_pretty(&mut *out, context.prefix_expansions())?;
            writeln!(out)?;
        }
        ShowFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &context.as_dict())?;
            writeln!(out)?;
        }
        ShowFormat::Epm => {
            serde_json::to_writer_pretty(&mut *out, &context.as_extended_prefix_map())?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Validation messages plus integrity findings, one per line.
pub fn findings(context: &Context, all_records: bool) -> Vec<String> {
    let mut messages = context.validate(!all_records);
    for prefix in context.duplicate_canonical_prefixes() {
        messages.push(format!("prefix {prefix} has more than one canonical record"));
    }
    for namespace in context.duplicate_canonical_namespaces() {
        messages.push(format!("namespace {namespace} has more than one canonical record"));
    }
    for pe in context.dangling_aliases() {
        messages.push(format!(
            "{} {} -> {} has no canonical counterpart",
            pe.status, pe.prefix, pe.namespace
        ));
    }
    messages
}

pub fn cmd_validate(
    context: &Context,
    all_records: bool,
    strict: bool,
    out: &mut impl Write,
) -> Result<()> {
    let messages = findings(context, all_records);
    for message in &messages {
        writeln!(out, "{message}")?;
    }
    if messages.is_empty() {
        eprintln!("{} {} ({} records)", "ok".green().bold(), context.name, context.len());
        return Ok(());
    }
    eprintln!(
        "{} {}: {} problem(s)",
        "warn:".yellow().bold(),
        context.name,
        messages.len()
    );
    if strict {
        bail!("{} has {} validation problem(s)", context.name, messages.len());
    }
    Ok(())
}

pub fn cmd_expand(converter: &Converter, curie: &str, out: &mut impl Write) -> Result<()> {
    parse_curie(curie)?;
    let uri = converter
        .expand(curie)
        .ok_or_else(|| anyhow!("no known prefix for {curie}"))?;
    writeln!(out, "{uri}")?;
    Ok(())
}

pub fn cmd_compress(converter: &Converter, uri: &str, out: &mut impl Write) -> Result<()> {
    let curie = converter
        .compress(uri)
        .ok_or_else(|| anyhow!("no known namespace for {uri}"))?;
    writeln!(out, "{curie}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefixmaps_core::{PrefixExpansion, PrefixMapError, StatusType};
    use tempfile::tempdir;

    fn render(context: &Context, format: ShowFormat, all: bool) -> String {
        let mut buf = Vec::new();
        cmd_show(context, format, all, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> Context {
        let mut ctx = Context::new("t");
        ctx.add_prefix("GO", "http://purl.obolibrary.org/obo/GO_").unwrap();
        ctx.add_prefix("go", "http://identifiers.org/go/").unwrap();
        ctx
    }

    #[test]
    fn show_formats() {
        let ctx = sample();
        let json: serde_json::Value = serde_json::from_str(&render(&ctx, ShowFormat::Json, false)).unwrap();
        assert_eq!(json["GO"], "http://purl.obolibrary.org/obo/GO_");
        assert_eq!(json.as_object().unwrap().len(), 1);

        let all: serde_json::Value = serde_json::from_str(&render(&ctx, ShowFormat::Json, true)).unwrap();
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[1]["status"], "prefix_alias");

        let epm: serde_json::Value = serde_json::from_str(&render(&ctx, ShowFormat::Epm, false)).unwrap();
        assert_eq!(epm[0]["uri_prefix_synonyms"][0], "http://identifiers.org/go/");

        let csv = render(&ctx, ShowFormat::Csv, false);
        assert_eq!(csv.lines().next(), Some("context,prefix,namespace,status"));
    }

    #[test]
    fn strict_validation_fails_on_findings() {
        let mut ctx = Context::new("bad");
        ctx.push_expansion(PrefixExpansion::new("bad", "x y", "http://x/", StatusType::Canonical));
        ctx.push_expansion(PrefixExpansion::new("bad", "z", "http://x/", StatusType::Canonical));

        let found = findings(&ctx, false);
        assert!(found.iter().any(|m| m.contains("x y")));
        assert!(found.iter().any(|m| m.contains("namespace http://x/ has more than one")));

        let mut buf = Vec::new();
        assert!(cmd_validate(&ctx, false, false, &mut buf).is_ok());
        assert!(cmd_validate(&ctx, false, true, &mut Vec::new()).is_err());
        assert!(cmd_validate(&sample(), true, true, &mut Vec::new()).is_ok());
    }

    #[test]
    fn expand_and_compress() {
        let converter = sample().as_converter();
        let mut buf = Vec::new();
        cmd_expand(&converter, "GO:0008150", &mut buf).unwrap();
        cmd_compress(&converter, "http://identifiers.org/go/0008150", &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "http://purl.obolibrary.org/obo/GO_0008150\nGO:0008150\n"
        );

        let err = cmd_expand(&converter, "nocolon", &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrefixMapError>(),
            Some(PrefixMapError::InvalidCurie { .. })
        ));
        assert!(cmd_expand(&converter, "XX:1", &mut Vec::new()).is_err());
        assert!(cmd_compress(&converter, "http://nowhere/1", &mut Vec::new()).is_err());
    }

    #[test]
    fn list_and_load_from_data_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.csv"),
            "context,prefix,namespace,status\na,x,http://a/x/,canonical\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.csv"),
            "context,prefix,namespace,status\nb,x,http://b/x/,canonical\nb,y,http://b/y/,canonical\n",
        )
        .unwrap();
        let data = DataDir::new(dir.path());

        let mut buf = Vec::new();
        cmd_list(&data, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a\nb\n");

        let registry = SourceRegistry::default();
        let names = vec!["b".to_string(), "a".to_string()];
        let merged = load(&registry, &data, &names, false).unwrap();
        assert_eq!(merged.name, "b+a");
        assert_eq!(merged.as_dict()["x"], "http://b/x/");

        let err = load(&registry, &data, &["nope".to_string()], false).unwrap_err();
        assert!(err.to_string().contains("no such context"));
        let err = load(&registry, &data, &["nope".to_string()], true).unwrap_err();
        assert!(err.to_string().contains("no such context"));
    }
}
