//! Turns an HTTP response body into a JSON-RPC envelope.
//!
//! Streamable HTTP servers answer either with a plain JSON object or with an
//! event stream whose `data: ` line carries that same object.

use serde_json::Value;

use crate::error::DecodeError;

pub const EVENT_STREAM: &str = "text/event-stream";
const DATA_PREFIX: &str = "data: ";

pub fn decode_response(content_type: Option<&str>, body: &str) -> Result<Value, DecodeError> {
    let is_event_stream = content_type.map(has_event_stream_type).unwrap_or(false);

    if is_event_stream {
        let data = body
            .trim()
            .lines()
            .find_map(|line| line.strip_prefix(DATA_PREFIX))
            .ok_or(DecodeError::NoDataLine)?;
        Ok(serde_json::from_str(data)?)
    } else {
        Ok(serde_json::from_str(body)?)
    }
}

/// Media types compare case-insensitively.
fn has_event_stream_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..EVENT_STREAM.len())
        .map(|prefix| prefix.eq_ignore_ascii_case(EVENT_STREAM))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        let value = decode_response(Some("application/json"), r#"{"result":{"content":[]}}"#).unwrap();
        assert_eq!(value, json!({"result": {"content": []}}));
    }

    #[test]
    fn test_missing_content_type_parses_as_json() {
        let value = decode_response(None, r#"{"id":1}"#).unwrap();
        assert_eq!(value["id"], 1);
    }

    #[test]
    fn test_event_stream_takes_first_data_line() {
        let body = "event: message\ndata: {\"result\":{\"content\":[1]}}\n\ndata: {\"result\":2}\n";
        let value = decode_response(Some("text/event-stream; charset=utf-8"), body).unwrap();
        assert_eq!(value, json!({"result": {"content": [1]}}));
    }

    #[test]
    fn test_event_stream_crlf_lines() {
        let body = "event: message\r\ndata: {\"ok\":true}\r\n\r\n";
        let value = decode_response(Some("text/event-stream"), body).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_event_stream_without_data_line() {
        let err = decode_response(Some("text/event-stream"), "event: ping\n: keepalive\n").unwrap_err();
        assert!(matches!(err, DecodeError::NoDataLine));
    }

    #[test]
    fn test_data_without_space_is_not_a_data_line() {
        let err = decode_response(Some("text/event-stream"), "data:{\"a\":1}\n").unwrap_err();
        assert!(matches!(err, DecodeError::NoDataLine));
    }

    #[test]
    fn test_event_stream_type_ignores_case() {
        let value = decode_response(Some("Text/Event-Stream"), "data: {\"a\":1}\n").unwrap();
        assert_eq!(value, json!({"a": 1}));
        assert!(!has_event_stream_type("text/"));
    }

    #[test]
    fn test_malformed_json() {
        let err = decode_response(Some("application/json"), "not valid json").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));

        let err = decode_response(Some("text/event-stream"), "data: {broken\n").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }
}
