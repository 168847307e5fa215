//! Inbound payload parsing.
//!
//! The only place a request can be rejected. A rejected request never
//! reaches the provider.

use digiai_core::types::ChatRequest;

/// Which JSON field carries the user's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestField {
    /// `{"message": "..."}` (`POST /chat`).
    Message,
    /// `{"question": "..."}` (`POST /query`).
    Question,
}

impl RequestField {
    pub fn name(self) -> &'static str {
        match self {
            RequestField::Message => "message",
            RequestField::Question => "question",
        }
    }
}

/// Why a payload was rejected. Only used for logs; clients see one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputErrorReason {
    MalformedJson,
    MissingField,
    NotAString,
    Blank,
}

/// A malformed or incomplete request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("No {} provided", .field.name())]
pub struct InputError {
    pub field: RequestField,
    pub reason: InputErrorReason,
}

impl InputError {
    fn new(field: RequestField, reason: InputErrorReason) -> Self {
        InputError { field, reason }
    }
}

/// Parse a raw JSON body into a [`ChatRequest`].
///
/// The body must be a JSON object whose `field` is a string with at least
/// one non-whitespace character. The text is kept as sent.
pub fn parse_request(payload: &[u8], field: RequestField) -> Result<ChatRequest, InputError> {
    let value: serde_json::Value = serde_json::from_slice(payload)
        .map_err(|_| InputError::new(field, InputErrorReason::MalformedJson))?;

    let raw = value
        .get(field.name())
        .ok_or_else(|| InputError::new(field, InputErrorReason::MissingField))?;

    let message = raw
        .as_str()
        .ok_or_else(|| InputError::new(field, InputErrorReason::NotAString))?;

    request_from_text(message, field)
}

/// Build a [`ChatRequest`] from text that did not arrive as JSON (CLI input).
pub fn request_from_text(text: &str, field: RequestField) -> Result<ChatRequest, InputError> {
    if text.trim().is_empty() {
        return Err(InputError::new(field, InputErrorReason::Blank));
    }

    Ok(ChatRequest {
        message: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(payload: &str) -> InputErrorReason {
        parse_request(payload.as_bytes(), RequestField::Message)
            .unwrap_err()
            .reason
    }

    #[test]
    fn parses_message() {
        let req = parse_request(
            br#"{"message": "How do I recover my DID?"}"#,
            RequestField::Message,
        )
        .unwrap();
        assert_eq!(req.message, "How do I recover my DID?");
    }

    #[test]
    fn parses_question_field() {
        let req = parse_request(br#"{"question": "What is a VC?"}"#, RequestField::Question)
            .unwrap();
        assert_eq!(req.message, "What is a VC?");
    }

    #[test]
    fn keeps_text_verbatim() {
        let req = parse_request(br#"{"message": "  hi  "}"#, RequestField::Message).unwrap();
        assert_eq!(req.message, "  hi  ");
    }

    #[test]
    fn ignores_extra_fields() {
        let req = parse_request(
            br#"{"message": "hi", "session": "abc", "helpful": false}"#,
            RequestField::Message,
        )
        .unwrap();
        assert_eq!(req.message, "hi");
    }

    #[test]
    fn empty_object_is_missing() {
        let err = parse_request(b"{}", RequestField::Message).unwrap_err();
        assert_eq!(err.reason, InputErrorReason::MissingField);
        assert_eq!(err.to_string(), "No message provided");
    }

    #[test]
    fn wrong_field_name_is_missing() {
        let err = parse_request(br#"{"message": "hi"}"#, RequestField::Question).unwrap_err();
        assert_eq!(err.reason, InputErrorReason::MissingField);
        assert_eq!(err.to_string(), "No question provided");
    }

    #[test]
    fn rejection_reasons() {
        assert_eq!(reason(""), InputErrorReason::MalformedJson);
        assert_eq!(reason("{not json"), InputErrorReason::MalformedJson);
        assert_eq!(reason("[]"), InputErrorReason::MissingField);
        assert_eq!(reason(r#""message""#), InputErrorReason::MissingField);
        assert_eq!(reason(r#"{"message": null}"#), InputErrorReason::NotAString);
        assert_eq!(reason(r#"{"message": 42}"#), InputErrorReason::NotAString);
        assert_eq!(reason(r#"{"message": ""}"#), InputErrorReason::Blank);
        assert_eq!(reason(r#"{"message": " \n\t"}"#), InputErrorReason::Blank);
    }

    #[test]
    fn plain_text_requests() {
        assert_eq!(
            request_from_text("hello", RequestField::Message).unwrap().message,
            "hello"
        );
        let err = request_from_text("  ", RequestField::Message).unwrap_err();
        assert_eq!(err.reason, InputErrorReason::Blank);
    }
}
