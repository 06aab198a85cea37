/**
 * Model Output Cleanup
 *
 * Models wrap HTML in code fences, append "notes" after the markup and
 * sometimes stop before closing every `<div>`. `clean_html` removes that
 * noise; `extract_json` pulls a JSON object out of a fenced answer.
 */

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z]*").expect("valid regex"));

static END_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\*\*\*+.*|\*\*HTML_END.*|HTML_END[ \t]*|END[ \t]*)$").expect("valid regex")
});

static NOTE_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:notes?|observação|nota)[ \t]*:[^\n]*$").expect("valid regex")
});

static ADVICE_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:customi[sz]e|adjust|modify|remember|personalize|ajuste|modifique|lembre-se)\b[^<\n]*$")
        .expect("valid regex")
});

static DIV_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<div(?:\s[^>]*)?>").expect("valid regex"));

static DIV_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</div\s*>").expect("valid regex"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid regex"));

/// Strip fences and trailing commentary, then close unbalanced `<div>`s
pub fn clean_html(raw: &str) -> String {
    let mut html = CODE_FENCE.replace_all(raw.trim(), "").into_owned();
    html = END_MARKERS.replace_all(&html, "").into_owned();
    html = NOTE_LINES.replace_all(&html, "").into_owned();
    html = ADVICE_LINES.replace_all(&html, "").into_owned();
    html = BLANK_LINES.replace_all(&html, "\n\n").into_owned();
    let mut html = html.trim().to_string();

    let missing = DIV_OPEN
        .find_iter(&html)
        .count()
        .saturating_sub(DIV_CLOSE.find_iter(&html).count());
    for _ in 0..missing {
        html.push_str("</div>");
    }

    html
}

/// Parse a JSON object out of a model answer
///
/// Accepts bare JSON, fenced JSON, or JSON surrounded by prose.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    let unfenced = CODE_FENCE.replace_all(text, "");
    let trimmed = unfenced.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_code_fences() {
        let raw = "```html\n<div class=\"hero\">Hi</div>\n```";
        assert_eq!(clean_html(raw), "<div class=\"hero\">Hi</div>");
    }

    #[test]
    fn test_strips_trailing_notes() {
        let raw = "<section>Body</section>\n\nNote: replace the images with your own.\nCustomize the colors as needed.";
        assert_eq!(clean_html(raw), "<section>Body</section>");
    }

    #[test]
    fn test_strips_end_markers() {
        let raw = "<p>a</p>\nHTML_END\n***\n";
        assert_eq!(clean_html(raw), "<p>a</p>");
    }

    #[test]
    fn test_keeps_content_lines_with_tags() {
        let raw = "<p>Customize <b>your</b> plan</p>";
        assert_eq!(clean_html(raw), raw);
    }

    #[test]
    fn test_closes_unbalanced_divs() {
        let raw = "<div class=\"a\"><div><p>x</p></div>";
        assert_eq!(clean_html(raw), "<div class=\"a\"><div><p>x</p></div></div>");
    }

    #[test]
    fn test_divider_tag_is_not_counted_as_div() {
        let raw = "<divider></divider><div>x</div>";
        assert_eq!(clean_html(raw), raw);
    }

    #[test]
    fn test_extract_json_variants() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Meta {
            #[serde(rename = "metaTitle")]
            meta_title: String,
        }

        let bare: Option<Meta> = extract_json(r#"{"metaTitle":"A"}"#);
        assert_eq!(bare.unwrap().meta_title, "A");

        let fenced: Option<Meta> = extract_json("```json\n{\"metaTitle\":\"B\"}\n```");
        assert_eq!(fenced.unwrap().meta_title, "B");

        let prose: Option<Meta> = extract_json("Here you go: {\"metaTitle\":\"C\"} enjoy");
        assert_eq!(prose.unwrap().meta_title, "C");

        let broken: Option<Meta> = extract_json("not json at all");
        assert!(broken.is_none());
    }
}
