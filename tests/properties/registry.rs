//! Property tests for check name resolution and slugs.

use proptest::prelude::*;

use tailaudit::domain::entities::{slugify, CheckKind};
use tailaudit::CheckRegistry;

fn title() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 '()/,.:-]{0,48}").unwrap()
}

/// Flip the case of the characters selected by `mask`.
fn scramble_case(value: &str, mask: &[bool]) -> String {
    value
        .chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

#[test]
fn slugs_are_distinct_and_non_empty() {
    let registry = CheckRegistry::global().unwrap();
    let mut slugs: Vec<&str> = registry.all().iter().map(|c| c.slug.as_str()).collect();
    assert!(slugs.iter().all(|s| !s.is_empty()));
    let count = slugs.len();
    slugs.sort();
    slugs.dedup();
    assert_eq!(slugs.len(), count);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Slugs only contain lowercase alphanumerics and single inner dashes.
    #[test]
    fn property_slug_shape(title in title()) {
        let slug = slugify(&title);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    /// PROPERTY: Slugging is idempotent.
    #[test]
    fn property_slug_is_idempotent(title in title()) {
        let slug = slugify(&title);
        prop_assert_eq!(slugify(&slug), slug);
    }

    /// PROPERTY: Every selectable check resolves by ID or slug in any case.
    #[test]
    fn property_resolve_ignores_case(
        index in 0usize..1000,
        mask in proptest::collection::vec(any::<bool>(), 1..8),
    ) {
        let registry = CheckRegistry::global().unwrap();
        let checks: Vec<_> = registry.checks().collect();
        let check = checks[index % checks.len()];

        prop_assert_eq!(registry.resolve(&scramble_case(check.id, &mask)), Some(check.id));
        prop_assert_eq!(registry.resolve(&scramble_case(&check.slug, &mask)), Some(check.id));
    }

    /// PROPERTY: Diagnostic entries never resolve.
    #[test]
    fn property_diagnostics_are_not_selectable(index in 0usize..1000) {
        let registry = CheckRegistry::global().unwrap();
        let diagnostics: Vec<_> = registry
            .all()
            .iter()
            .filter(|c| c.kind != CheckKind::Check)
            .collect();
        prop_assume!(!diagnostics.is_empty());
        let diagnostic = diagnostics[index % diagnostics.len()];

        prop_assert_eq!(registry.resolve(diagnostic.id), None);
        prop_assert!(registry.get(diagnostic.id).is_some());
    }
}
