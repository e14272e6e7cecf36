use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use viasmime::{
    canonicalize::{canonicalize_value, CanonicalizationAlgorithm},
    HeaderReconciler, SecuredField, SecuredHeaderFields,
};

// Universal invariants of the reconciliation engine, checked over generated
// header material.

fn header_entries() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(("X-[A-Za-z][A-Za-z0-9]{0,6}", "[a-z@. ]{0,12}"), 1..8)
}

fn join_with(words: &[String], seps: &[&str]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push_str(seps[i % seps.len()]);
        }
        out.push_str(word);
    }
    out
}

fn trusted_pairs(reconciler: &HeaderReconciler) -> Vec<(String, String)> {
    reconciler
        .headers()
        .filter(|h| h.is_trusted())
        .map(|h| (h.name().to_owned(), h.value().to_owned()))
        .collect()
}

fn multiset(pairs: &[(String, String)]) -> HashMap<&(String, String), usize> {
    let mut counts = HashMap::new();
    for pair in pairs {
        *counts.entry(pair).or_insert(0) += 1;
    }
    counts
}

fn multiset_contains(outer: &[(String, String)], inner: &[(String, String)]) -> bool {
    let outer = multiset(outer);
    multiset(inner)
        .iter()
        .all(|(pair, count)| outer.get(pair).copied().unwrap_or(0) >= *count)
}

proptest! {
    // Two values built from the same words compare equal under relaxed
    // canonicalization, whatever whitespace separates the words.
    #[test]
    fn prop_relaxed_value_eq_ignores_whitespace(
        words in proptest::collection::vec("[a-zA-Z0-9@.;]{1,6}", 1..5),
        seps_a in proptest::collection::vec(prop::sample::select(vec![" ", "\t", " \t", "  "]), 4),
        seps_b in proptest::collection::vec(prop::sample::select(vec![" ", "\t", "\t\t", "   "]), 4),
        lead in prop::sample::select(vec!["", " ", "\t "]),
        trail in prop::sample::select(vec!["", "  ", "\t"]),
    ) {
        let a = format!("{}{}", lead, join_with(&words, &seps_a));
        let b = format!("{}{}", join_with(&words, &seps_b), trail);

        prop_assert!(CanonicalizationAlgorithm::Relaxed.value_eq(&a, &b));
        prop_assert_eq!(canonicalize_value(&a), canonicalize_value(&b));
    }

    // No sequence of imports ever stores a header from the ignore list.
    #[test]
    fn prop_ignored_names_never_stored(
        names in proptest::collection::vec(
            prop::sample::select(vec![
                "Content-Type", "content-type", "MIME-Version", "Received", "RECEIVED",
                "X-Ok", "From", "Subject",
            ]),
            0..10,
        ),
    ) {
        let entries: Vec<(String, String)> = names
            .iter()
            .map(|name| ((*name).to_owned(), "v".to_owned()))
            .collect();

        let mut reconciler = HeaderReconciler::new();
        reconciler.import_untrusted(entries.clone());
        reconciler.import_trusted_relaxed(entries);

        for header in reconciler.headers() {
            let upper = header.name().to_ascii_uppercase();
            prop_assert!(!matches!(
                upper.as_str(),
                "CONTENT-TYPE" | "MIME-VERSION" | "RECEIVED"
            ));
        }
    }

    // A strict inner import of an exact subset of the envelope succeeds and
    // marks exactly the subset records trusted.
    #[test]
    fn prop_strict_subset_marks_exactly_matching_records(
        envelope in header_entries(),
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let inner: Vec<(String, String)> = picks
            .iter()
            .map(|index| envelope[index.index(envelope.len())].clone())
            .collect();
        let inner_set: HashSet<&(String, String)> = inner.iter().collect();

        let mut reconciler = HeaderReconciler::new();
        reconciler.import_untrusted(envelope.clone());
        prop_assert!(reconciler.import_trusted(inner.clone()).is_ok());

        for header in reconciler.headers() {
            let pair = (header.name().to_owned(), header.value().to_owned());
            prop_assert_eq!(header.is_trusted(), inner_set.contains(&pair));
        }
    }

    // After a relaxed inner import, every trusted record was authenticated
    // by the inner message, and every untrusted record came from the
    // envelope.
    #[test]
    fn prop_relaxed_trusted_records_come_from_inner(
        envelope in header_entries(),
        inner in header_entries(),
    ) {
        let inner_set: HashSet<&(String, String)> = inner.iter().collect();
        let envelope_set: HashSet<&(String, String)> = envelope.iter().collect();

        let mut reconciler = HeaderReconciler::new();
        reconciler.import_untrusted(envelope.clone());
        reconciler.import_trusted_relaxed(inner.clone());

        for header in reconciler.headers() {
            let pair = (header.name().to_owned(), header.value().to_owned());
            if header.is_trusted() {
                prop_assert!(inner_set.contains(&pair));
            } else {
                prop_assert!(envelope_set.contains(&pair));
            }
        }
    }

    // The trusted record multiset only ever grows while inner headers are
    // imported one at a time.
    #[test]
    fn prop_trust_is_monotonic_under_relaxed_imports(
        envelope in header_entries(),
        inner in header_entries(),
    ) {
        let mut reconciler = HeaderReconciler::new();
        reconciler.import_untrusted(envelope);

        let mut previous = trusted_pairs(&reconciler);
        for entry in inner {
            reconciler.import_trusted_relaxed(vec![entry]);

            let current = trusted_pairs(&reconciler);
            prop_assert!(multiset_contains(&current, &previous));
            previous = current;
        }
    }

    // Every duplicated directive that applies cleanly leaves a trusted
    // record with its name and value behind.
    #[test]
    fn prop_duplicated_directives_become_trusted(
        envelope in header_entries(),
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 1..6),
    ) {
        let fields: Vec<SecuredField> = picks
            .iter()
            .map(|index| {
                let (name, value) = &envelope[index.index(envelope.len())];
                SecuredField::new(name.clone(), value.clone())
            })
            .collect();

        let mut reconciler = HeaderReconciler::new();
        reconciler.import_untrusted(envelope.clone());
        prop_assert!(reconciler
            .import_secured_fields(&SecuredHeaderFields::new(fields.clone()))
            .is_ok());

        for field in &fields {
            prop_assert!(reconciler.headers().any(|h| h.is_trusted()
                && h.name() == field.name
                && h.value() == field.value));
        }
    }
}
