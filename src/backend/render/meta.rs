/**
 * Head Tags
 *
 * SEO meta tags, tracking pixels and the base stylesheet for a rendered
 * page. Every builder returns an empty string when it has nothing to add.
 */

use super::escape::{attr, first};
use crate::backend::pages::AiPage;

const TAG_SEPARATOR: &str = "\n  ";

/// Title, favicon, description, robots, canonical, Open Graph and Twitter tags
///
/// Title precedence is `page_title`, `meta_title`, `title`. Twitter tags
/// fall back to the Open Graph values.
pub fn meta_tags(page: &AiPage) -> String {
    let mut tags = Vec::new();

    let title = first(&[
        page.page_title.as_deref(),
        page.meta_title.as_deref(),
        Some(page.title.as_str()),
    ]);
    if let Some(title) = title {
        tags.push(format!("<title>{}</title>", attr(title)));
    }

    if let Some(favicon) = first(&[page.favicon_url.as_deref()]) {
        let href = attr(favicon);
        tags.push(format!(r#"<link rel="icon" type="image/x-icon" href="{href}">"#));
        tags.push(format!(r#"<link rel="shortcut icon" type="image/x-icon" href="{href}">"#));
    }

    let description = first(&[page.page_description.as_deref(), page.meta_description.as_deref()]);
    let mut named = |name: &str, value: Option<&str>| {
        if let Some(value) = value {
            tags.push(format!(r#"<meta name="{name}" content="{}">"#, attr(value)));
        }
    };
    named("description", description);
    named("keywords", first(&[page.keywords.as_deref()]));
    named("robots", first(&[page.robots.as_deref()]));

    if let Some(canonical) = first(&[page.canonical_url.as_deref()]) {
        tags.push(format!(r#"<link rel="canonical" href="{}">"#, attr(canonical)));
    }

    let og_title = first(&[page.og_title.as_deref()]);
    let og_description = first(&[page.og_description.as_deref()]);
    let og_image = first(&[page.og_image.as_deref()]);
    let mut property = |name: &str, value: Option<&str>| {
        if let Some(value) = value {
            tags.push(format!(r#"<meta property="{name}" content="{}">"#, attr(value)));
        }
    };
    property("og:title", og_title);
    property("og:description", og_description);
    property("og:image", og_image);
    property("og:type", Some("website"));

    let mut twitter = |name: &str, value: Option<&str>| {
        if let Some(value) = value {
            tags.push(format!(r#"<meta name="{name}" content="{}">"#, attr(value)));
        }
    };
    twitter("twitter:title", first(&[page.twitter_title.as_deref(), og_title]));
    twitter(
        "twitter:description",
        first(&[page.twitter_description.as_deref(), og_description]),
    );
    twitter("twitter:image", first(&[page.twitter_image.as_deref(), og_image]));
    twitter("twitter:card", Some("summary_large_image"));

    tags.join(TAG_SEPARATOR)
}

/// Google Analytics, Google Tag Manager and Facebook Pixel snippets
pub fn pixel_scripts(page: &AiPage) -> String {
    let mut scripts = Vec::new();

    if let Some(id) = first(&[page.google_analytics.as_deref()]).map(attr) {
        scripts.push(format!(
            r#"
<!-- Google Analytics -->
<script async src="https://www.googletagmanager.com/gtag/js?id={id}"></script>
<script>
  window.dataLayer = window.dataLayer || [];
  function gtag(){{dataLayer.push(arguments);}}
  gtag('js', new Date());
  gtag('config', '{id}');
</script>"#
        ));
    }

    if let Some(id) = first(&[page.google_tag_manager.as_deref()]).map(attr) {
        scripts.push(format!(
            r#"
<!-- Google Tag Manager -->
<script>(function(w,d,s,l,i){{w[l]=w[l]||[];w[l].push({{'gtm.start':
new Date().getTime(),event:'gtm.js'}});var f=d.getElementsByTagName(s)[0],
j=d.createElement(s),dl=l!='dataLayer'?'&l='+l:'';j.async=true;j.src=
'https://www.googletagmanager.com/gtm.js?id='+i+dl;f.parentNode.insertBefore(j,f);
}})(window,document,'script','dataLayer','{id}');</script>"#
        ));
    }

    if let Some(id) = first(&[page.facebook_pixel.as_deref()]).map(attr) {
        scripts.push(format!(
            r#"
<!-- Facebook Pixel -->
<script>
!function(f,b,e,v,n,t,s)
{{if(f.fbq)return;n=f.fbq=function(){{n.callMethod?
n.callMethod.apply(n,arguments):n.queue.push(arguments)}};
if(!f._fbq)f._fbq=n;n.push=n;n.loaded=!0;n.version='2.0';
n.queue=[];t=b.createElement(e);t.async=!0;
t.src=v;s=b.getElementsByTagName(e)[0];
s.parentNode.insertBefore(t,s)}}(window, document,'script',
'https://connect.facebook.net/en_US/fbevents.js');
fbq('init', '{id}');
fbq('track', 'PageView');
</script>"#
        ));
    }

    scripts.join("\n")
}

/// Reset stylesheet followed by the page's custom CSS
pub fn base_css(page: &AiPage) -> String {
    let mut css = String::from(
        r#"
    * {
      box-sizing: border-box;
    }
    body {
      margin: 0;
      padding: 0;
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    }"#,
    );
    if let Some(custom) = first(&[page.custom_css.as_deref()]) {
        css.push_str("\n    ");
        css.push_str(custom);
    }
    css
}
