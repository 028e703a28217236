use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub(crate) fn decode_html_symbols(text: &str) -> String {
    // some sites double-encode entities (&amp;amp;), so decode twice
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

/// Strip tags, decode entities and collapse whitespace. Non-breaking spaces
/// become plain spaces.
pub(crate) fn clean_html_text(fragment: &str) -> String {
    let without_tags = TAG_RE.replace_all(fragment, " ");
    let decoded = decode_html_symbols(&without_tags).replace('\u{a0}', " ");
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// Decode entities in a JSON-LD string value and trim it.
pub(crate) fn clean_text_value(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(decode_html_symbols(text).replace('\u{a0}', " ").trim(), " ")
        .into_owned()
}
