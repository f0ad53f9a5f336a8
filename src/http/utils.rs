use std::time::Duration;

use serde_json::Value;

use crate::config::PollConfig;

/// Turns a raw POST body into message content.
///
/// A JSON object carrying `content` yields that value. Any other JSON object
/// or array is stored as its compact JSON text. A JSON string is unquoted.
/// Everything else is kept as plain text.
pub fn extract_content(body: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut fields)) => match fields.remove("content") {
            Some(content) => content,
            None => Value::String(Value::Object(fields).to_string()),
        },
        Ok(array @ Value::Array(_)) => Value::String(array.to_string()),
        Ok(Value::String(text)) => Value::String(text),
        _ => Value::String(String::from_utf8_lossy(body).into_owned()),
    }
}

/// Parses the `timeout` query value in milliseconds. Missing or malformed
/// values use the default; everything is clamped to the configured maximum.
pub fn resolve_timeout(raw: Option<&str>, poll: &PollConfig) -> Duration {
    let requested = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(poll.default_timeout);

    requested.min(poll.max_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_field_is_unwrapped() {
        assert_eq!(extract_content(br#"{"content":"Order #1"}"#), json!("Order #1"));
        assert_eq!(
            extract_content(br#"{"content":{"sku":42},"extra":true}"#),
            json!({"sku": 42})
        );
    }

    #[test]
    fn test_object_without_content_is_serialized() {
        assert_eq!(extract_content(br#"{"sku": 42}"#), json!(r#"{"sku":42}"#));
        assert_eq!(extract_content(b"[1, 2]"), json!("[1,2]"));
    }

    #[test]
    fn test_plain_text_is_kept() {
        assert_eq!(extract_content(b"hello"), json!("hello"));
        assert_eq!(extract_content(b"42"), json!("42"));
        assert_eq!(extract_content(b""), json!(""));
    }

    #[test]
    fn test_json_string_is_unquoted() {
        assert_eq!(extract_content(br#""hello""#), json!("hello"));
    }

    #[test]
    fn test_timeout_parsing() {
        let poll = PollConfig::default();

        assert_eq!(resolve_timeout(None, &poll), Duration::from_secs(10));
        assert_eq!(resolve_timeout(Some("abc"), &poll), Duration::from_secs(10));
        assert_eq!(resolve_timeout(Some("-5"), &poll), Duration::from_secs(10));
        assert_eq!(resolve_timeout(Some("0"), &poll), Duration::ZERO);
        assert_eq!(resolve_timeout(Some("250"), &poll), Duration::from_millis(250));
        assert_eq!(resolve_timeout(Some("999999999"), &poll), Duration::from_secs(60));
    }
}
