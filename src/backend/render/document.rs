/**
 * Document Assembly
 *
 * Turns a stored page into the final HTML document. Fragments (anything
 * without both a doctype and an `<html>` tag) are wrapped in a full
 * document. Complete documents keep their own structure and only receive
 * what they are missing.
 */

use super::meta::{base_css, meta_tags, pixel_scripts};
use super::pwa_tags::{pwa_script, pwa_tags};
use crate::backend::analytics::{analytics_script, PageType};
use crate::backend::pages::AiPage;

const TAILWIND_SCRIPT: &str = r#"<script src="https://cdn.tailwindcss.com"></script>"#;

/// Everything injected into a page, built once per render
struct Parts {
    meta: String,
    pixels: String,
    css: String,
    pwa_tags: String,
    pwa_script: String,
    analytics: String,
}

impl Parts {
    fn build(page: &AiPage, asset_base: &str) -> Self {
        Self {
            meta: meta_tags(page),
            pixels: pixel_scripts(page),
            css: base_css(page),
            pwa_tags: pwa_tags(page, asset_base),
            pwa_script: if page.pwa_enabled {
                pwa_script(page, asset_base)
            } else {
                String::new()
            },
            analytics: analytics_script(
                &page.id.to_string(),
                PageType::AiPage,
                Some(&page.user_id),
            ),
        }
    }
}

/// Whether stored HTML is already a complete document
pub fn is_complete_document(html: &str) -> bool {
    html.contains("<!DOCTYPE html>") && html.contains("<html")
}

/// Render the final HTML for a page
///
/// `asset_base` is the path prefix of the page's PWA assets.
pub fn render_document(page: &AiPage, asset_base: &str) -> String {
    let parts = Parts::build(page, asset_base);
    if is_complete_document(&page.html_content) {
        inject(page, &parts)
    } else {
        wrap(page, &parts)
    }
}

fn wrap(page: &AiPage, parts: &Parts) -> String {
    let custom_head = page.custom_head.as_deref().unwrap_or_default();
    let custom_body = page.custom_body.as_deref().unwrap_or_default();
    let custom_footer = page.custom_footer.as_deref().unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta http-equiv="X-UA-Compatible" content="IE=edge">
  {TAILWIND_SCRIPT}
  {meta}
  {pwa_tags}
  <style>
{css}
  </style>
  {custom_head}
</head>
<body>
  {custom_body}
  {content}
  {custom_footer}
  {pixels}
  {pwa_script}
  {analytics}
</body>
</html>"#,
        meta = parts.meta,
        pwa_tags = parts.pwa_tags,
        css = parts.css,
        content = page.html_content,
        pixels = parts.pixels,
        pwa_script = parts.pwa_script,
        analytics = parts.analytics,
    )
}

fn inject(page: &AiPage, parts: &Parts) -> String {
    let mut html = page.html_content.clone();

    if !html.contains("tailwindcss.com") {
        html = after_open_head(&html, TAILWIND_SCRIPT);
    }
    if !html.contains(r#"<meta name="description""#) && !parts.meta.is_empty() {
        html = after_open_head(&html, &parts.meta);
    }
    if page.pwa_enabled && !html.contains(r#"rel="manifest""#) {
        html = after_open_head(&html, &parts.pwa_tags);
    }

    if !parts.pixels.is_empty() {
        html = before_close_body(&html, &parts.pixels);
    }
    if page.pwa_enabled {
        html = before_close_body(&html, &parts.pwa_script);
    }
    html = before_close_body(&html, &parts.analytics);

    if let Some(head) = non_empty(&page.custom_head) {
        html = html.replacen("</head>", &format!("{head}\n</head>"), 1);
    }
    if let Some(body) = non_empty(&page.custom_body) {
        html = html.replacen("<body>", &format!("<body>\n{body}"), 1);
    }
    if let Some(footer) = non_empty(&page.custom_footer) {
        html = before_close_body(&html, footer);
    }

    html
}

fn after_open_head(html: &str, fragment: &str) -> String {
    html.replacen("<head>", &format!("<head>\n  {fragment}"), 1)
}

fn before_close_body(html: &str, fragment: &str) -> String {
    html.replacen("</body>", &format!("{fragment}\n</body>"), 1)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::pages::types::fixtures::page;

    const FULL_DOC: &str = "<!DOCTYPE html>\n<html>\n<head>\n<title>Mine</title>\n</head>\n<body>\n<h1>Hi</h1>\n</body>\n</html>";

    #[test]
    fn test_fragment_is_wrapped() {
        let p = page("coffee");
        let html = render_document(&p, "/coffee");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(TAILWIND_SCRIPT));
        assert!(html.contains("<title>Coffee Shop</title>"));
        assert!(html.contains("<div><h1>Coffee</h1></div>"));
        assert!(html.contains("/api/analytics/track"));
        assert!(!html.contains("manifest.json"));
    }

    #[test]
    fn test_doctype_without_html_tag_is_wrapped() {
        let mut p = page("coffee");
        p.html_content = "<!DOCTYPE html><div>x</div>".into();
        assert!(!is_complete_document(&p.html_content));
        assert_eq!(render_document(&p, "/coffee").matches("<!DOCTYPE html>").count(), 2);
    }

    #[test]
    fn test_complete_document_gets_injections() {
        let mut p = page("coffee");
        p.html_content = FULL_DOC.into();
        p.pwa_enabled = true;
        p.custom_head = Some("<!-- head -->".into());
        p.custom_body = Some("<!-- body -->".into());
        p.custom_footer = Some("<!-- footer -->".into());
        let html = render_document(&p, "/coffee");

        assert_eq!(html.matches("<!DOCTYPE html>").count(), 1);
        assert!(html.contains(TAILWIND_SCRIPT));
        assert!(html.contains(r#"<link rel="manifest" href="/coffee/manifest.json">"#));
        assert!(html.contains("<!-- head -->\n</head>"));
        assert!(html.contains("<body>\n<!-- body -->"));
        assert!(html.contains("<!-- footer -->\n</body>"));
        assert!(html.contains("register('/coffee/sw.js')"));

        let analytics_at = html.find("/api/analytics/track").unwrap();
        let body_close = html.find("</body>").unwrap();
        assert!(analytics_at < body_close);
    }

    #[test]
    fn test_existing_description_and_tailwind_are_kept() {
        let mut p = page("coffee");
        p.html_content = FULL_DOC.replace(
            "<head>",
            "<head><meta name=\"description\" content=\"own\"><script src=\"https://cdn.tailwindcss.com\"></script>",
        );
        let html = render_document(&p, "/coffee");
        assert_eq!(html.matches("tailwindcss.com").count(), 1);
        assert!(!html.contains("<title>Coffee Shop</title>"));
    }
}
