//! # DECODE ERROR CLASSIFICATION
//!
//! **CRITICAL**: Folds `serde_json` failures into the toolkit's JSON error taxonomy.
//! **ORDER**: Categories overlap, so they are tested in a fixed priority:
//!
//! 1. syntax → `MalformedJson`
//! 2. wrong type, value or length → `JsonTypeMismatch`
//! 3. end of input → `EmptyBody` (nothing but whitespace read) or `MalformedJson`
//! 4. unknown key → `UnknownJsonField`
//! 5. reader tripped the size limit → `SizeExceeded`
//! 6. anything else → `JsonDecode`

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::error::Category;

use crate::errors::ToolkitError;

static UNKNOWN_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"unknown field `([^`]*)`").expect("valid unknown-field pattern"));

/// **READ SIGNALS** - What the size limiter observed while the decoder pulled bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSignals {
    pub limit: u64,
    pub exceeded: bool,
    pub saw_content: bool,
}

/// **CLASSIFY**
///
/// `unknown_field` is the first key the decoder skipped, when the caller
/// forbids unknown keys. `error_path` is the dotted path of the value being
/// decoded when `err` was raised, if it was inside an object or array.
pub fn classify(
    err: &serde_json::Error,
    signals: ReadSignals,
    unknown_field: Option<&str>,
    error_path: Option<&str>,
) -> ToolkitError {
    let (line, column) = (err.line(), err.column());

    match err.classify() {
        Category::Syntax => return ToolkitError::MalformedJson { line, column },
        Category::Data if is_type_mismatch(err) => {
            return ToolkitError::JsonTypeMismatch {
                detail: detail(err),
                field: error_path.map(str::to_string),
                line,
                column,
            }
        }
        Category::Eof if signals.saw_content => return ToolkitError::MalformedJson { line, column },
        Category::Eof => return ToolkitError::EmptyBody,
        _ => {}
    }

    let message = err.to_string();
    let reported = UNKNOWN_FIELD
        .captures(&message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    if let Some(field) = reported.or(unknown_field) {
        return ToolkitError::UnknownJsonField {
            field: field.to_string(),
        };
    }

    if err.is_io() && signals.exceeded {
        return ToolkitError::SizeExceeded {
            limit: signals.limit,
        };
    }

    ToolkitError::JsonDecode(detail(err))
}

fn is_type_mismatch(err: &serde_json::Error) -> bool {
    let message = err.to_string();
    ["invalid type", "invalid value", "invalid length"]
        .iter()
        .any(|prefix| message.starts_with(prefix))
}

/// Error text without the trailing " at line L column C".
fn detail(err: &serde_json::Error) -> String {
    let message = err.to_string();
    if err.line() == 0 {
        return message;
    }
    match message.rsplit_once(" at line ") {
        Some((head, _)) => head.to_string(),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io;

    #[allow(dead_code)]
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Strict {
        foo: String,
    }

    const QUIET: ReadSignals = ReadSignals {
        limit: 1024,
        exceeded: false,
        saw_content: true,
    };

    struct BrokenReader(io::ErrorKind);

    impl io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "read failed"))
        }
    }

    fn error_for(body: &str) -> serde_json::Error {
        serde_json::from_str::<Strict>(body).unwrap_err()
    }

    fn io_error(kind: io::ErrorKind) -> serde_json::Error {
        serde_json::from_reader::<_, Strict>(BrokenReader(kind)).unwrap_err()
    }

    #[test]
    fn test_syntax_is_malformed() {
        match classify(&error_for(r#"{"foo": bar}"#), QUIET, None, None) {
            ToolkitError::MalformedJson { line, column } => {
                assert_eq!(line, 1);
                assert!(column > 0);
            }
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch_detail() {
        match classify(&error_for(r#"{"foo": 1}"#), QUIET, None, None) {
            ToolkitError::JsonTypeMismatch { detail, field, line, .. } => {
                assert!(detail.starts_with("invalid type: integer `1`"));
                assert!(!detail.contains("at line"));
                assert_eq!(field, None);
                assert_eq!(line, 1);
            }
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch_names_field() {
        let err = classify(&error_for(r#"{"foo": true}"#), QUIET, None, Some("foo"));
        match &err {
            ToolkitError::JsonTypeMismatch { field, .. } => assert_eq!(field.as_deref(), Some("foo")),
            other => panic!("Wrong error type: {:?}", other),
        }
        assert!(err.to_string().contains("for field 'foo'"));
    }

    #[test]
    fn test_eof_without_content_is_empty_body() {
        let signals = ReadSignals {
            saw_content: false,
            ..QUIET
        };
        assert!(matches!(classify(&error_for(""), signals, None, None), ToolkitError::EmptyBody));
    }

    #[test]
    fn test_eof_after_content_is_malformed() {
        assert!(matches!(
            classify(&error_for(r#"{"foo": "#), QUIET, None, None),
            ToolkitError::MalformedJson { .. }
        ));
    }

    #[test]
    fn test_unknown_field_from_message() {
        match classify(&error_for(r#"{"foo": "a", "bar": 1}"#), QUIET, None, None) {
            ToolkitError::UnknownJsonField { field } => assert_eq!(field, "bar"),
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    #[test]
    fn test_recorded_unknown_field() {
        let io_err = io_error(io::ErrorKind::InvalidData);
        match classify(&io_err, QUIET, Some("meta.extra"), None) {
            ToolkitError::UnknownJsonField { field } => assert_eq!(field, "meta.extra"),
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    #[test]
    fn test_tripped_limit_is_size_exceeded() {
        let io_err = io_error(io::ErrorKind::InvalidData);
        let signals = ReadSignals {
            exceeded: true,
            ..QUIET
        };
        assert!(matches!(
            classify(&io_err, signals, None, None),
            ToolkitError::SizeExceeded { limit: 1024 }
        ));
    }

    #[test]
    fn test_other_failures_fall_through() {
        let io_err = io_error(io::ErrorKind::ConnectionReset);
        assert!(matches!(classify(&io_err, QUIET, None, None), ToolkitError::JsonDecode(_)));

        match classify(&error_for("{}"), QUIET, None, None) {
            ToolkitError::JsonDecode(detail) => assert_eq!(detail, "missing field `foo`"),
            other => panic!("Wrong error type: {:?}", other),
        }
    }
}
