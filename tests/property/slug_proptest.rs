//! Slug generation invariants

use link_ai::backend::pages::slug::{generate_slug, numbered};
use proptest::prelude::*;

proptest! {
    #[test]
    fn slug_is_url_safe(title in "\\PC{0,80}") {
        let slug = generate_slug(&title);
        prop_assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    #[test]
    fn slug_is_idempotent(title in "[a-zA-Z0-9 ]{1,40}") {
        let slug = generate_slug(&title);
        prop_assert_eq!(generate_slug(&slug), slug);
    }

    #[test]
    fn numbered_slug_keeps_base(base in "[a-z]{1,20}", n in 1u32..1000) {
        let slug = numbered(&base, n);
        prop_assert!(slug.starts_with(&base));
        prop_assert_ne!(slug, base);
    }
}
