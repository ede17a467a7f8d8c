//! Locating the caller's words in inbound relay frames.
//!
//! Relay integrations do not agree on where the transcript lives, so several
//! shapes are tried in order:
//! - `{"input_transcript": "..."}`
//! - `{"speech": {"alternatives": [{"transcript": "..."}]}}` or `speech.text`
//!   (`asr` is accepted in place of `speech`)
//! - `{"text" | "user" | "utterance" | "transcript": "..."}`
//! - `{"input": {"text": "..."}}`
//! - a bare JSON string, or a frame that is not JSON at all

use serde_json::Value;

/// Top-level keys that may carry the utterance directly, in lookup order
const DIRECT_KEYS: &[&str] = &["text", "user", "utterance", "transcript"];

/// Extract the utterance from a raw text frame.
pub fn from_frame(raw: &str) -> Option<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => extract(&value),
        Err(_) => non_blank(raw),
    }
}

/// Extract the utterance from an already parsed payload.
pub fn extract(payload: &Value) -> Option<String> {
    let obj = match payload {
        Value::String(s) => return non_blank(s),
        Value::Object(obj) => obj,
        _ => return None,
    };

    if let Some(t) = obj.get("input_transcript").and_then(string_field) {
        return Some(t);
    }

    let speech = obj
        .get("speech")
        .filter(|v| is_truthy(v))
        .or_else(|| obj.get("asr"));
    if let Some(Value::Object(speech)) = speech {
        let first_alternative = speech
            .get("alternatives")
            .and_then(Value::as_array)
            .and_then(|alts| alts.first())
            .and_then(|alt| alt.get("transcript"))
            .and_then(string_field);
        if let Some(t) = first_alternative {
            return Some(t);
        }
        if let Some(t) = speech.get("text").and_then(string_field) {
            return Some(t);
        }
    }

    if let Some(t) = DIRECT_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(string_field))
    {
        return Some(t);
    }

    obj.get("input")
        .and_then(|input| input.get("text"))
        .and_then(string_field)
}

fn string_field(value: &Value) -> Option<String> {
    value.as_str().and_then(non_blank)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Falsy values (`null`, `false`, `0`, `""`, `[]`, `{}`) fall through to `asr`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_frame() {
        assert_eq!(
            from_frame("  soy propietario ").as_deref(),
            Some("soy propietario")
        );
    }

    #[test]
    fn test_blank_plain_text_frame() {
        assert_eq!(from_frame("   "), None);
    }

    #[test]
    fn test_json_string_frame() {
        assert_eq!(from_frame(r#""hola""#).as_deref(), Some("hola"));
    }

    #[test]
    fn test_input_transcript() {
        let payload = json!({"input_transcript": " Madrid ", "text": "ignored"});
        assert_eq!(extract(&payload).as_deref(), Some("Madrid"));
    }

    #[test]
    fn test_speech_alternatives() {
        let payload = json!({
            "speech": {
                "type": "transcript",
                "alternatives": [{"transcript": "inquilino"}, {"transcript": "otro"}]
            }
        });
        assert_eq!(extract(&payload).as_deref(), Some("inquilino"));
    }

    #[test]
    fn test_speech_text_when_no_alternatives() {
        let payload = json!({"speech": {"alternatives": [], "text": "vale"}});
        assert_eq!(extract(&payload).as_deref(), Some("vale"));
    }

    #[test]
    fn test_asr_used_when_speech_missing() {
        let payload = json!({"asr": {"alternatives": [{"transcript": "sí"}]}});
        assert_eq!(extract(&payload).as_deref(), Some("sí"));
    }

    #[test]
    fn test_asr_used_when_speech_empty() {
        let payload = json!({"speech": {}, "asr": {"text": "no"}});
        assert_eq!(extract(&payload).as_deref(), Some("no"));
    }

    #[test]
    fn test_direct_keys_in_order() {
        let payload = json!({"utterance": "tercero", "user": "segundo"});
        assert_eq!(extract(&payload).as_deref(), Some("segundo"));
    }

    #[test]
    fn test_blank_keys_are_skipped() {
        let payload = json!({"text": "  ", "transcript": "Bilbao"});
        assert_eq!(extract(&payload).as_deref(), Some("Bilbao"));
    }

    #[test]
    fn test_nested_input_text() {
        let payload = json!({"input": {"text": "Valencia"}});
        assert_eq!(extract(&payload).as_deref(), Some("Valencia"));
    }

    #[test]
    fn test_non_string_fields_ignored() {
        let payload = json!({"text": 42, "input": {"text": null}});
        assert_eq!(extract(&payload), None);
    }

    #[test]
    fn test_non_object_payloads() {
        assert_eq!(extract(&json!(12)), None);
        assert_eq!(extract(&json!(["hola"])), None);
        assert_eq!(extract(&Value::Null), None);
    }

    #[test]
    fn test_control_frame_has_no_transcript() {
        assert_eq!(from_frame(r#"{"type":"setup","callSid":"CA123"}"#), None);
    }
}
