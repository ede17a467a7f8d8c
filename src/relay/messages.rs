//! Outbound relay frames.

use serde::Serialize;

/// A text token for the relay to synthesize as speech.
///
/// Replies are always sent as a single complete token, so `last` is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Speak {
    #[serde(rename = "type")]
    kind: &'static str,
    pub token: String,
    last: bool,
    pub interruptible: bool,
}

impl Speak {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            kind: "text",
            token: token.into(),
            last: true,
            interruptible: true,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_speak_wire_shape() {
        let frame: serde_json::Value =
            serde_json::from_str(&Speak::new("Hola").to_json().unwrap()).unwrap();
        assert_eq!(
            frame,
            json!({"type": "text", "token": "Hola", "last": true, "interruptible": true})
        );
    }

    #[test]
    fn test_speak_serializes_compactly() {
        assert_eq!(
            Speak::new("¿Sí?").to_json().unwrap(),
            r#"{"type":"text","token":"¿Sí?","last":true,"interruptible":true}"#
        );
    }
}
