//! SHACL prefix declarations (`sh:prefix` / `sh:namespace`) in Turtle.
//!
//! Parsing uses Sophia. Terms are read back from their display form, which is
//! enough to tell IRIs, blank nodes and literals apart.

use anyhow::{anyhow, bail, Result};
use prefixmaps_core::Context;
use sophia::api::prelude::*;
use std::collections::HashMap;

pub const SHACL_PREFIX: &str = "http://www.w3.org/ns/shacl#prefix";
pub const SHACL_NAMESPACE: &str = "http://www.w3.org/ns/shacl#namespace";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    Node(String),
    Literal(String),
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct ShaclSinkError {
    message: String,
}

impl From<anyhow::Error> for ShaclSinkError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_term_display(term: &str) -> Result<Term> {
    let s = term.trim();

    if let Some(iri) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(Term::Node(iri.to_string()));
    }
    if s.starts_with("_:") {
        return Ok(Term::Node(s.to_string()));
    }
    if s.starts_with('"') {
        // lexical form up to the first unescaped quote; datatype/lang tag ignored
        let mut escaped = false;
        for (i, ch) in s.char_indices().skip(1) {
            match ch {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => return Ok(Term::Literal(unescape(&s[1..i]))),
                _ => escaped = false,
            }
        }
        return Err(anyhow!("invalid literal term (missing closing quote): {s}"));
    }
    Err(anyhow!("unsupported RDF term form: {s}"))
}

/// `(subject, predicate IRI, object)` for the two SHACL predicates, in document order.
fn shacl_statements(turtle: &str) -> Result<Vec<(String, String, Term)>> {
    let mut out = Vec::new();
    let reader = std::io::BufReader::new(std::io::Cursor::new(turtle.as_bytes()));
    let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
    parser
        .try_for_each_triple(|t| -> std::result::Result<(), ShaclSinkError> {
            let Term::Node(predicate) = parse_term_display(&t.p().to_string())? else {
                return Ok(());
            };
            if predicate != SHACL_PREFIX && predicate != SHACL_NAMESPACE {
                return Ok(());
            }
            let Term::Node(subject) = parse_term_display(&t.s().to_string())? else {
                return Ok(());
            };
            let object = parse_term_display(&t.o().to_string())?;
            out.push((subject, predicate, object));
            Ok(())
        })
        .map_err(|e| anyhow!("failed to parse Turtle: {e}"))?;
    Ok(out)
}

/// Build a context from Turtle using the SHACL prefix vocabulary.
///
/// Every `sh:prefix` subject must carry exactly one `sh:namespace`; both must
/// be literals.
pub fn from_shacl_turtle(turtle: &str, name: &str) -> Result<Context> {
    let statements = shacl_statements(turtle)?;

    let mut namespaces: HashMap<&str, Vec<&Term>> = HashMap::new();
    for (subject, predicate, object) in &statements {
        if predicate == SHACL_NAMESPACE {
            namespaces.entry(subject.as_str()).or_default().push(object);
        }
    }

    let mut context = Context::new(name);
    for (subject, predicate, object) in &statements {
        if predicate != SHACL_PREFIX {
            continue;
        }
        let Term::Literal(prefix) = object else {
            bail!("expected literal for sh:prefix of {subject}, got {object:?}");
        };
        let found = namespaces.get(subject.as_str()).map(Vec::as_slice).unwrap_or_default();
        let [namespace] = found else {
            bail!(
                "expected exactly one sh:namespace for {prefix}, got {}",
                found.len()
            );
        };
        let Term::Literal(namespace) = namespace else {
            bail!("expected literal for sh:namespace of {prefix}, got {namespace:?}");
        };
        context.add_prefix(prefix, namespace)?;
    }
    Ok(context)
}
