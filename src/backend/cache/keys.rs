//! Cache key builders
//!
//! Every key the server reads or invalidates is built here so that the
//! handlers which write a key and the handlers which invalidate it agree.

/// TTL for rendered SSR pages (seconds)
pub const SSR_TTL_SECS: u64 = 600;

/// TTL for generated PWA assets (seconds)
pub const PWA_TTL_SECS: u64 = 3600;

/// TTL for provider API settings (seconds)
pub const API_SETTINGS_TTL_SECS: u64 = 300;

/// Key holding the provider API settings
pub const API_SETTINGS_KEY: &str = "api_settings:all";

/// Pattern matching every rendered SSR page
pub const SSR_PATTERN: &str = "ssr:*";

/// Kinds of generated PWA asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwaAsset {
    Manifest,
    ServiceWorker,
    Offline,
}

impl PwaAsset {
    pub const ALL: [PwaAsset; 3] = [PwaAsset::Manifest, PwaAsset::ServiceWorker, PwaAsset::Offline];

    fn segment(self) -> &'static str {
        match self {
            PwaAsset::Manifest => "manifest",
            PwaAsset::ServiceWorker => "sw",
            PwaAsset::Offline => "offline",
        }
    }
}

/// `ssr:page:{slug}` or `ssr:custom:{domain}:{slug}`
pub fn ssr_page(slug: &str, custom_domain: Option<&str>) -> String {
    match custom_domain {
        Some(domain) => format!("ssr:custom:{domain}:{slug}"),
        None => format!("ssr:page:{slug}"),
    }
}

/// `pwa:{kind}:{slug}` or `pwa:{kind}:custom:{domain}:{slug}`
pub fn pwa(asset: PwaAsset, slug: &str, custom_domain: Option<&str>) -> String {
    match custom_domain {
        Some(domain) => format!("pwa:{}:custom:{domain}:{slug}", asset.segment()),
        None => format!("pwa:{}:{slug}", asset.segment()),
    }
}

/// Keys to drop after a page update
///
/// The SSR key is always included. PWA keys are added when a PWA field
/// changed, and the old slug's keys when the slug itself changed.
pub fn page_invalidation(slug: &str, old_slug: Option<&str>, pwa_changed: bool) -> Vec<String> {
    let mut keys = vec![ssr_page(slug, None)];
    if pwa_changed {
        keys.extend(PwaAsset::ALL.iter().map(|asset| pwa(*asset, slug, None)));
    }
    if let Some(old) = old_slug.filter(|old| *old != slug) {
        keys.push(ssr_page(old, None));
        keys.extend(PwaAsset::ALL.iter().map(|asset| pwa(*asset, old, None)));
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ssr_keys() {
        assert_eq!(ssr_page("home", None), "ssr:page:home");
        assert_eq!(ssr_page("root", Some("shop.example.com")), "ssr:custom:shop.example.com:root");
    }

    #[test]
    fn test_pwa_keys() {
        assert_eq!(pwa(PwaAsset::Manifest, "home", None), "pwa:manifest:home");
        assert_eq!(pwa(PwaAsset::ServiceWorker, "home", None), "pwa:sw:home");
        assert_eq!(
            pwa(PwaAsset::Offline, "home", Some("a.com")),
            "pwa:offline:custom:a.com:home"
        );
    }

    #[test]
    fn test_invalidation_plain_update() {
        assert_eq!(page_invalidation("home", None, false), vec!["ssr:page:home"]);
    }

    #[test]
    fn test_invalidation_with_pwa_and_slug_change() {
        let keys = page_invalidation("new", Some("old"), true);
        assert_eq!(
            keys,
            vec![
                "ssr:page:new",
                "pwa:manifest:new",
                "pwa:sw:new",
                "pwa:offline:new",
                "ssr:page:old",
                "pwa:manifest:old",
                "pwa:sw:old",
                "pwa:offline:old",
            ]
        );
    }

    #[test]
    fn test_invalidation_same_slug_is_not_duplicated() {
        assert_eq!(page_invalidation("home", Some("home"), false), vec!["ssr:page:home"]);
    }
}
