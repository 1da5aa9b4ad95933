use crate::convert::FieldKind;
use crate::value::ValueKind;

/// Coarse classification of a [`ScanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DestinationNotWritable,
    ConversionFailed,
    UnsupportedConversion,
    TextDecodeFailed,
    EmptyResult,
    Cursor,
}

/// Error returned by every scan operation.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("destination is not writable")]
    DestinationNotWritable,

    #[error("cannot convert {from} value into {to} field")]
    ConversionFailed { from: ValueKind, to: FieldKind },

    #[error("cannot parse {text:?} as {to} field: {reason}")]
    ParseFailed {
        text: String,
        to: FieldKind,
        reason: String,
    },

    #[error("invalid time layout {layout:?}")]
    TimeLayout { layout: String },

    #[error("no conversion from {from} value into {to} field")]
    UnsupportedConversion { from: ValueKind, to: FieldKind },

    #[error("value is not valid UTF-8: {0}")]
    TextDecode(#[from] std::str::Utf8Error),

    #[error("result set is empty")]
    EmptyResult,

    #[error("field '{field}' (column '{column}'): {source}")]
    Field {
        field: &'static str,
        column: String,
        source: Box<ScanError>,
    },

    #[error("cursor error: {0}")]
    Cursor(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::DestinationNotWritable => ErrorKind::DestinationNotWritable,
            ScanError::ConversionFailed { .. }
            | ScanError::ParseFailed { .. }
            | ScanError::TimeLayout { .. } => ErrorKind::ConversionFailed,
            ScanError::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
            ScanError::TextDecode(_) => ErrorKind::TextDecodeFailed,
            ScanError::EmptyResult => ErrorKind::EmptyResult,
            ScanError::Field { source, .. } => source.kind(),
            ScanError::Cursor(_) => ErrorKind::Cursor,
        }
    }

    /// Wrap a cursor failure, keeping it as the error source.
    pub fn cursor(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        ScanError::Cursor(Box::new(e))
    }

    /// Attach the record field and column the error occurred on.
    ///
    /// Produces: `"field 'name' (column 'col'): original message"`.
    pub fn in_field(self, field: &'static str, column: impl Into<String>) -> Self {
        ScanError::Field {
            field,
            column: column.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_context_keeps_inner_kind() {
        let err = ScanError::UnsupportedConversion {
            from: ValueKind::Bytes,
            to: FieldKind::Bool,
        }
        .in_field("active", "is_active");

        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
        assert_eq!(
            err.to_string(),
            "field 'active' (column 'is_active'): no conversion from bytes value into bool field"
        );
    }

    #[test]
    fn parse_failure_is_a_conversion_failure() {
        let err = ScanError::ParseFailed {
            text: "x".into(),
            to: FieldKind::Int,
            reason: "invalid digit found in string".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ConversionFailed);
    }

    #[test]
    fn cursor_error_is_preserved_as_source() {
        use std::error::Error as _;

        let io = std::io::Error::other("connection reset");
        let err = ScanError::cursor(io);

        assert_eq!(err.kind(), ErrorKind::Cursor);
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("connection reset"));
    }
}
