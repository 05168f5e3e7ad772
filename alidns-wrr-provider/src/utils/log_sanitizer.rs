//! Keep credentials and oversized bodies out of logs.

/// Bytes of a response body kept in a log line or error detail.
const BODY_LOG_LIMIT: usize = 256;

/// Cut `body` to at most [`BODY_LOG_LIMIT`] bytes on a char boundary,
/// noting the full length when anything was dropped.
pub fn truncate_for_log(body: &str) -> String {
    if body.len() <= BODY_LOG_LIMIT {
        return body.to_string();
    }
    let cut = body
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= BODY_LOG_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &body[..cut], body.len())
}

/// Show only the first and last four characters of an AccessKey ID.
pub fn mask_access_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}
