use thiserror::Error;

use crate::model::{LineKey, NumpadField};

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable identifiers for hosts that translate or log notices. Match on
// these, never on the message text.

/// Stable error code constants.
pub mod error_code {
    pub const FIELD_NOT_SELECTED: &str = "FIELD_NOT_SELECTED";
    pub const DISCOUNT_EXCEEDED: &str = "DISCOUNT_EXCEEDED";
    pub const DUPLICATE_DECIMAL_POINT: &str = "DUPLICATE_DECIMAL_POINT";
    pub const LINE_NOT_FOUND: &str = "LINE_NOT_FOUND";
    pub const DUPLICATE_LINE: &str = "DUPLICATE_LINE";
    pub const READ_ONLY_FIELD: &str = "READ_ONLY_FIELD";
    pub const UNKNOWN_KEY: &str = "UNKNOWN_KEY";
    pub const CONFIG: &str = "CONFIG";
    pub const NO_RUNTIME: &str = "NO_RUNTIME";
}

/// How the engine reacts to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Ambiguous or out-of-bound entry. Reported to the user as a warning.
    UserInputRejected,
    /// Key press not valid in the current state. Ignored as a no-op.
    InvalidTransition,
    /// Construction-time failure returned to the caller.
    Setup,
}

// ── PosError ────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PosError {
    #[error("Please select a field to edit from numpad")]
    FieldNotSelected,

    #[error("Discount cannot be greater than {max}%")]
    DiscountExceeded { value: f64, max: f64 },

    #[error("{field} already has a decimal point")]
    DuplicateDecimalPoint { field: NumpadField },

    #[error("cart line not found: {0}")]
    LineNotFound(LineKey),

    #[error("cart line already exists: {0}")]
    DuplicateLine(LineKey),

    #[error("customer field is read-only: {0}")]
    ReadOnlyField(&'static str),

    #[error("unknown numpad key: {0:?}")]
    UnknownKey(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("no tokio runtime: {0}")]
    NoRuntime(String),
}

impl PosError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PosError::FieldNotSelected | PosError::DiscountExceeded { .. } => {
                ErrorKind::UserInputRejected
            }
            PosError::DuplicateDecimalPoint { .. }
            | PosError::LineNotFound(_)
            | PosError::DuplicateLine(_)
            | PosError::ReadOnlyField(_) => ErrorKind::InvalidTransition,
            PosError::UnknownKey(_) | PosError::Config(_) | PosError::NoRuntime(_) => {
                ErrorKind::Setup
            }
        }
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            PosError::FieldNotSelected => error_code::FIELD_NOT_SELECTED,
            PosError::DiscountExceeded { .. } => error_code::DISCOUNT_EXCEEDED,
            PosError::DuplicateDecimalPoint { .. } => error_code::DUPLICATE_DECIMAL_POINT,
            PosError::LineNotFound(_) => error_code::LINE_NOT_FOUND,
            PosError::DuplicateLine(_) => error_code::DUPLICATE_LINE,
            PosError::ReadOnlyField(_) => error_code::READ_ONLY_FIELD,
            PosError::UnknownKey(_) => error_code::UNKNOWN_KEY,
            PosError::Config(_) => error_code::CONFIG,
            PosError::NoRuntime(_) => error_code::NO_RUNTIME,
        }
    }

    /// The user-facing notice for this error, if it should be shown at all.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            PosError::FieldNotSelected => Some(Notice::new(self.to_string(), Indicator::Red)),
            PosError::DiscountExceeded { .. } => {
                Some(Notice::new(self.to_string(), Indicator::Orange))
            }
            _ => None,
        }
    }
}

impl From<toml::de::Error> for PosError {
    fn from(e: toml::de::Error) -> Self {
        PosError::Config(e.to_string())
    }
}

impl From<std::io::Error> for PosError {
    fn from(e: std::io::Error) -> Self {
        PosError::Config(e.to_string())
    }
}

// ── Notice ──────────────────────────────────────────────────────────

/// Colour hint attached to a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Red,
    Orange,
    Green,
    Grey,
}

/// A non-blocking, user-facing message.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Notice {
    pub message: String,
    pub indicator: Indicator,
}

impl Notice {
    pub fn new(message: impl Into<String>, indicator: Indicator) -> Self {
        Self {
            message: message.into(),
            indicator,
        }
    }
}
