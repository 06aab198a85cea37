//! HTML escaping for values placed into generated markup

/// Escape text for an HTML attribute value or text node
pub fn attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// The first non-empty value
pub fn first<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_escaping() {
        assert_eq!(attr(r#"Tom & "Jerry" <b>"#), "Tom &amp; &quot;Jerry&quot; &lt;b&gt;");
    }

    #[test]
    fn test_first_skips_blank() {
        assert_eq!(first(&[None, Some("  "), Some("x"), Some("y")]), Some("x"));
        assert_eq!(first(&[None, Some("")]), None);
    }
}
