//! Escaping of attribute values.
//!
//! Only the five predefined XML entities are handled: `&amp;`, `&lt;`,
//! `&gt;`, `&apos;` and `&quot;`. An `&` that already starts one of them is
//! left alone by [`escape`], so escaping is idempotent. The flip side: text
//! that literally contains an entity, such as `"&lt;"`, is not preserved by
//! an escape/unescape round trip and comes back as `"<"`.

use alloc::borrow::Cow;
use alloc::string::String;

const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&apos;", '\''),
    ("&quot;", '"'),
];

fn entity_at(text: &str) -> Option<(&'static str, char)> {
    ENTITIES.into_iter().find(|(entity, _)| text.starts_with(entity))
}

/// Replaces markup characters with entities.
///
/// # Examples
///
/// ```
/// use gx_xml::escape::escape;
///
/// assert_eq!(escape("a < b"), "a &lt; b");
/// assert_eq!(escape("Tom & \"Jerry\""), "Tom &amp; &quot;Jerry&quot;");
/// // Existing entities are kept.
/// assert_eq!(escape("&amp; &copy;"), "&amp; &amp;copy;");
/// ```
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '\'', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for (index, ch) in text.char_indices() {
        match ch {
            '&' if entity_at(&text[index..]).is_some() => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Replaces the five predefined entities with their characters.
///
/// Any other `&` sequence is kept verbatim.
///
/// # Examples
///
/// ```
/// use gx_xml::escape::unescape;
///
/// assert_eq!(unescape("a &lt; b &amp;&amp; c"), "a < b && c");
/// assert_eq!(unescape("&copy; &#65;"), "&copy; &#65;");
/// ```
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match entity_at(tail) {
            Some((entity, ch)) => {
                out.push(ch);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_when_unchanged() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
        assert!(matches!(unescape("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn round_trip_of_markup() {
        for text in [
            "",
            "<tag attr='1'>",
            "fish & chips",
            "&",
            "&amp",
            "& amp;",
            "\"quoted\"",
            "ünïcödé & ✓",
        ] {
            assert_eq!(unescape(&escape(text)), text, "{text}");
        }
    }

    #[test]
    fn escape_is_idempotent() {
        let once = escape("a < b & c &quot;");
        assert_eq!(once, "a &lt; b &amp; c &quot;");
        assert_eq!(escape(&once), once);
    }

    #[test]
    fn literal_entities_do_not_survive() {
        assert_eq!(unescape(&escape("&lt;")), "<");
    }
}
