use thiserror::Error;

/// Errors produced by the extraction, naming, parsing and theme layers.
///
/// Every variant carries the offending value so the CLI can report it
/// verbatim. None of these are retried internally.
#[derive(Debug, Error)]
pub enum Error {
    /// The pixel source could not be read or decoded.
    #[error("cannot decode pixel source: {0}")]
    Decode(String),

    /// A numeric argument was out of range (e.g. a zero cluster count).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A color value was not a 6-hex-digit RGB string.
    #[error("invalid color {value:?}: {reason}")]
    InvalidColor { value: String, reason: String },

    /// A slot name appeared twice within one variant.
    #[error("duplicate slot {slot:?} in variant {variant:?}")]
    DuplicateSlot { variant: String, slot: String },

    /// A variant or scheme name is already registered.
    #[error("{kind} {name:?} already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// A lookup named a variant or scheme that is not registered.
    #[error("{kind} {name:?} not found")]
    NotFound { kind: &'static str, name: String },

    /// Text parsing found no slot/color pair at all.
    #[error("no slot/color pairs found ({skipped} non-empty lines skipped)")]
    ParseEmpty { skipped: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_color(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
