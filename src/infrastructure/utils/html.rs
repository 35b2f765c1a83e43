/// Escapes text for HTML element content and quoted attribute values.
///
/// Entity-encodes everything that could open a tag or end an attribute, including
/// `/`, `=` and whitespace; browsers decode those before resolving URLs.
pub fn escape_html(raw: &str) -> String {
    ammonia::clean_text(raw)
}

/// Cuts `raw` to at most `limit` bytes without splitting a UTF-8 sequence.
pub fn truncate_utf8(raw: &str, limit: usize) -> &str {
    if raw.len() <= limit {
        return raw;
    }
    let mut end = limit;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    &raw[..end]
}
