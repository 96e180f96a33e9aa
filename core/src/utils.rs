/// Lowercase hex rendering used in error messages and logs.
pub fn fmt_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }
    hex::encode(bytes)
}

/// Parse a hex string, tolerating an optional `0x` prefix and `:`, `_` or space separators.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ':' | ' ' | '_'))
        .collect();
    hex::decode(cleaned)
}
