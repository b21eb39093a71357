//! Error types for the copy pipeline.

/// Errors produced while deep-copying one record into another.
///
/// Field and element context wraps outward as the driver unwinds, so a
/// failure three levels deep reads `field a: field b: element 2: ...`.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("field {field}: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<CopyError>,
    },

    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<CopyError>,
    },

    #[error("cannot store {found} into {slot} expecting {expected}")]
    ShapeMismatch {
        slot: String,
        expected: String,
        found: String,
    },

    #[error("record {record} has no field {field}")]
    UnknownField { record: &'static str, field: String },

    #[error("timestamp out of range: {seconds}s {nanos}ns")]
    InvalidTimestamp { seconds: i64, nanos: i32 },

    #[error("duration out of range: {seconds}s {nanos}ns")]
    InvalidDuration { seconds: i64, nanos: i32 },

    #[error("custom setter: {message}")]
    Setter { message: String },
}

impl CopyError {
    /// Wrap an error with the source field it occurred under.
    pub fn in_field(field: &str, source: CopyError) -> Self {
        CopyError::Field {
            field: field.to_string(),
            source: Box::new(source),
        }
    }

    /// Wrap an error with the element index it occurred at.
    pub fn in_element(index: usize, source: CopyError) -> Self {
        CopyError::Element {
            index,
            source: Box::new(source),
        }
    }

    /// A custom setter failure with a free-form message.
    pub fn setter(message: impl Into<String>) -> Self {
        CopyError::Setter {
            message: message.into(),
        }
    }
}

/// Result alias used across the crate.
pub type CopyResult<T> = Result<T, CopyError>;
