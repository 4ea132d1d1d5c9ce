use prefixmaps_core::{AddOutcome, AddPrefix, Context, StatusType};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn prefix() -> impl Strategy<Value = String> {
    // Small alphabet so that collisions (including case-only ones) are frequent.
    proptest::string::string_regex("[a-cA-C][a-c0-9]{0,2}").unwrap()
}

fn namespace() -> impl Strategy<Value = String> {
    (
        proptest::string::string_regex("[a-cA-C]{1,2}").unwrap(),
        prop_oneof![Just("/"), Just("#"), Just("_")],
    )
        .prop_map(|(path, end)| format!("http://example.org/{path}{end}"))
}

fn pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec((prefix(), namespace()), 0..40)
}

fn build(name: &str, pairs: &[(String, String)]) -> Context {
    let mut ctx = Context::new(name);
    for (p, ns) in pairs {
        ctx.add_prefix(p, ns).expect("no conflicting case flags");
    }
    ctx
}

fn assert_bijective(ctx: &Context) -> Result<(), TestCaseError> {
    let mut prefixes = HashSet::new();
    let mut namespaces = HashSet::new();
    for pe in ctx.canonical_expansions() {
        prop_assert!(
            prefixes.insert(pe.prefix.to_lowercase()),
            "duplicate canonical prefix {}",
            pe.prefix
        );
        prop_assert!(
            namespaces.insert(pe.namespace.to_lowercase()),
            "duplicate canonical namespace {}",
            pe.namespace
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn canonical_records_are_bijective(pairs in pairs()) {
        let ctx = build("t", &pairs);
        assert_bijective(&ctx)?;
        prop_assert!(ctx.duplicate_canonical_prefixes().is_empty());
        prop_assert!(ctx.duplicate_canonical_namespaces().is_empty());
        prop_assert_eq!(ctx.as_dict().len(), ctx.as_inverted_dict().len());
    }

    #[test]
    fn repeated_insertion_is_idempotent(pairs in pairs(), p in prefix(), ns in namespace()) {
        let mut ctx = build("t", &pairs);
        ctx.add_prefix(&p, &ns).unwrap();
        let after_first = ctx.len();
        prop_assert_eq!(ctx.add_prefix(&p, &ns).unwrap(), AddOutcome::Redundant);
        prop_assert_eq!(ctx.len(), after_first);
    }

    #[test]
    fn records_are_an_ordered_subsequence_of_calls(pairs in pairs()) {
        let ctx = build("t", &pairs);
        let mut calls = pairs.iter();
        for pe in ctx.prefix_expansions() {
            let found = calls.any(|(p, ns)| *p == pe.prefix && *ns == pe.namespace);
            prop_assert!(found, "record {}:{} out of call order", pe.prefix, pe.namespace);
        }
        if let Some((p, ns)) = pairs.first() {
            prop_assert_eq!(&ctx.prefix_expansions()[0].prefix, p);
            prop_assert_eq!(&ctx.prefix_expansions()[0].namespace, ns);
            prop_assert!(ctx.prefix_expansions()[0].is_canonical());
        }
    }

    #[test]
    fn combination_never_overrides_target_canonicals(a in pairs(), b in pairs()) {
        let mut target = build("a", &a);
        let before: HashMap<String, String> = target.as_dict().into_iter().collect();
        let source = build("b", &b);

        target.combine(&source).unwrap();

        let after = target.as_dict();
        for (p, ns) in &before {
            prop_assert_eq!(after.get(p), Some(ns));
        }
        assert_bijective(&target)?;
        for pe in target.prefix_expansions() {
            prop_assert_eq!(pe.context.as_str(), "a");
            if let Some(source) = &pe.expansion_source {
                prop_assert_eq!(source.as_str(), "b");
            }
        }
    }

    #[test]
    fn upper_context_only_holds_uppercase_unless_preferred(pairs in pairs()) {
        let mut ctx = Context::new("u").with_upper(true);
        for (i, (p, ns)) in pairs.iter().enumerate() {
            ctx.add_prefix_with(p, ns, AddPrefix::default().preferred(i % 5 == 0)).unwrap();
        }
        for pe in ctx.prefix_expansions() {
            let preferred_source = pairs.iter().enumerate().any(|(i, (p, _))| i % 5 == 0 && *p == pe.prefix);
            prop_assert!(preferred_source || pe.prefix == pe.prefix.to_uppercase());
        }
    }
}

#[test]
fn priority_scenario_from_two_registries() {
    let mut a = Context::new("a");
    a.add_prefix("x", "http://a/x/").unwrap();
    let mut b = Context::new("b");
    b.add_prefix("x", "http://b/x/").unwrap();

    a.combine(&b).unwrap();

    assert_eq!(a.as_dict()["x"], "http://a/x/");
    let aliases = a.filter(Some("x"), Some("http://b/x/"));
    assert_eq!(aliases.len(), 1);
    assert_eq!(aliases[0].status, StatusType::PrefixAlias);
}
