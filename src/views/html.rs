/// Turn an HN text fragment into plain display text.
///
/// Entities are decoded first (with `&nbsp;` mapped to a plain space), then
/// every `<...>` tag is removed, then the common named entities that survived
/// the first pass (double-encoded input) are replaced once more. Total over
/// any input.
pub fn decode_html(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(&raw.replace("&nbsp;", " ")).into_owned();
    strip_tags(&decoded)
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&apos;", "'")
}

/// Remove every match of `<[^>]*>`. A `<` with no closing `>` is kept.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}
