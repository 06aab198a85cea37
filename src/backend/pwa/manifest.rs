/**
 * Web App Manifest
 *
 * Builds `manifest.json` for an installable page. Without an icon URL the
 * icons are generated SVG data URLs showing the app's initial on the theme
 * color.
 */

use serde::Serialize;

use crate::backend::pages::AiPage;
use crate::backend::render::pwa_tags::{
    app_name, background_color, icon_url, short_name, theme_color,
};

pub const ICON_SIZES: [&str; 8] = [
    "72x72", "96x96", "128x128", "144x144", "152x152", "192x192", "384x384", "512x512",
];

const SHORTCUT_ICON_SIZE: &str = "96x96";
const MASKABLE_ICON_SIZE: &str = "512x512";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: &'static str,
    #[serde(rename = "type")]
    pub mime: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Shortcut {
    pub name: &'static str,
    pub short_name: &'static str,
    pub description: String,
    pub url: String,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub orientation: &'static str,
    pub scope: String,
    pub icons: Vec<ManifestIcon>,
    pub shortcuts: Vec<Shortcut>,
    pub categories: [&'static str; 3],
    pub lang: &'static str,
    pub dir: &'static str,
    pub prefer_related_applications: bool,
    pub display_override: [&'static str; 3],
}

/// SVG data URL with the app's initial on its theme color
pub fn letter_icon(page: &AiPage) -> String {
    let letter: String = short_name(page)
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    let color = theme_color(page).trim_start_matches('#');
    format!(
        r#"data:image/svg+xml,<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><rect width="100" height="100" fill="%23{color}"/><text x="50" y="50" font-size="48" text-anchor="middle" dominant-baseline="middle" fill="white">{letter}</text></svg>"#
    )
}

fn icon(src: &str, sizes: &'static str, has_url: bool, purpose: Option<&'static str>) -> ManifestIcon {
    ManifestIcon {
        src: src.to_string(),
        sizes,
        mime: if has_url { "image/png" } else { "image/svg+xml" },
        purpose,
    }
}

fn icons(page: &AiPage) -> Vec<ManifestIcon> {
    let url = icon_url(page);
    let src = url.map(str::to_string).unwrap_or_else(|| letter_icon(page));
    let has_url = url.is_some();

    ICON_SIZES
        .iter()
        .map(|size| icon(&src, size, has_url, Some("any")))
        .chain(std::iter::once(icon(&src, MASKABLE_ICON_SIZE, has_url, Some("maskable"))))
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Manifest for a PWA-enabled page reached through `slug`
pub fn build_manifest(page: &AiPage, slug: &str) -> Manifest {
    let url = icon_url(page);
    let shortcut_icon = icon(
        &url.map(str::to_string).unwrap_or_else(|| letter_icon(page)),
        SHORTCUT_ICON_SIZE,
        url.is_some(),
        None,
    );

    Manifest {
        name: app_name(page).to_string(),
        short_name: short_name(page),
        description: non_empty(&page.pwa_description)
            .map(str::to_string)
            .unwrap_or_else(|| format!("App: {}", page.title)),
        start_url: non_empty(&page.pwa_start_url)
            .map(str::to_string)
            .unwrap_or_else(|| format!("/{slug}")),
        display: non_empty(&page.pwa_display_mode).unwrap_or("standalone").to_string(),
        background_color: background_color(page).to_string(),
        theme_color: theme_color(page).to_string(),
        orientation: "portrait-primary",
        scope: non_empty(&page.pwa_scope)
            .map(str::to_string)
            .unwrap_or_else(|| format!("/{slug}/")),
        icons: icons(page),
        shortcuts: vec![Shortcut {
            name: "Open page",
            short_name: "Open",
            description: format!("Open {}", page.title),
            url: format!("/{slug}"),
            icons: vec![shortcut_icon],
        }],
        categories: ["productivity", "utilities", "lifestyle"],
        lang: "en",
        dir: "ltr",
        prefer_related_applications: false,
        display_override: ["window-controls-overlay", "standalone", "minimal-ui"],
    }
}
