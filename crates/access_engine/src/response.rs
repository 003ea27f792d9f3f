use access_core::ProcessingResult;
use serde_json::{Map, Value};

use crate::ServiceError;

const MAX_DETAIL_CHARS: usize = 512;

/// Maps a successful response body onto [`ProcessingResult`].
///
/// Absent, null, blank or oddly-shaped fields are treated as not present. An empty body or
/// a JSON value that is not an object is an empty success; only a body that is not JSON at
/// all is an error.
pub fn normalize_response(body: &[u8]) -> Result<ProcessingResult, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProcessingResult::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(|err| ServiceError::Service {
        status: None,
        detail: Some(format!("malformed response body: {err}")),
    })?;
    let Value::Object(fields) = value else {
        return Ok(ProcessingResult::default());
    };

    Ok(ProcessingResult {
        simplified_text: optional_string(&fields, "simplified_text"),
        audio_url: optional_string(&fields, "audio_url"),
        keywords: string_list(&fields, "keywords"),
        zip_url: optional_string(&fields, "zip_url"),
    })
}

fn optional_string(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn string_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|item| !item.trim().is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Best-effort diagnostics from an error response body.
///
/// Prefers the service's `{"error": .., "detail": ..}` shape, then falls back to the raw text.
pub fn error_detail(body: &[u8]) -> Option<String> {
    if let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) {
        let error = optional_string(&fields, "error");
        let detail = optional_string(&fields, "detail");
        match (error, detail) {
            (Some(error), Some(detail)) => return Some(format!("{error}: {detail}")),
            (Some(text), None) | (None, Some(text)) => return Some(text),
            (None, None) => {}
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(truncate_chars(text, MAX_DETAIL_CHARS))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_shapes_are_not_present() {
        let body = br#"{
            "simplified_text": 42,
            "audio_url": null,
            "keywords": "law",
            "zip_url": ["x"]
        }"#;
        assert_eq!(normalize_response(body), Ok(ProcessingResult::default()));
    }

    #[test]
    fn keyword_list_keeps_only_strings_in_order() {
        let body = br#"{"keywords": ["law", 3, null, "  ", "justice"]}"#;
        let result = normalize_response(body).unwrap();
        assert_eq!(result.keywords, vec!["law", "justice"]);
    }

    #[test]
    fn blank_strings_count_as_absent() {
        let body = br#"{"simplified_text": "  ", "zip_url": ""}"#;
        let result = normalize_response(body).unwrap();
        assert_eq!(result.simplified_text, None);
        assert_eq!(result.zip_url, None);
    }

    #[test]
    fn empty_and_non_object_bodies_are_empty_successes() {
        assert!(normalize_response(b"").unwrap().is_empty());
        assert!(normalize_response(b" \n").unwrap().is_empty());
        assert!(normalize_response(b"null").unwrap().is_empty());
        assert!(normalize_response(b"[1, 2]").unwrap().is_empty());
    }

    #[test]
    fn non_json_body_is_a_service_error() {
        let err = normalize_response(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, ServiceError::Service { status: None, detail: Some(_) }));
    }

    #[test]
    fn error_detail_prefers_structured_fields() {
        let body = br#"{"error": "Internal server error", "detail": "quota exceeded"}"#;
        assert_eq!(
            error_detail(body).as_deref(),
            Some("Internal server error: quota exceeded")
        );
        assert_eq!(
            error_detail(br#"{"error": "No file or url provided"}"#).as_deref(),
            Some("No file or url provided")
        );
    }

    #[test]
    fn error_detail_falls_back_to_text_and_tolerates_empty() {
        assert_eq!(error_detail(b"Bad Gateway\n").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_detail(b""), None);
        let long = "x".repeat(MAX_DETAIL_CHARS + 10);
        let detail = error_detail(long.as_bytes()).unwrap();
        assert_eq!(detail.len(), MAX_DETAIL_CHARS + 3);
    }
}
