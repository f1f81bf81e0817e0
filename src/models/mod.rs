pub mod usermodel;
pub mod tendermodel;
pub mod contractmodel;
pub mod feedbackmodel;
pub mod messagemodel;
pub mod supportmodel;
pub mod reportmodel;

use thiserror::Error;

/// Raised when a TEXT status column holds a value none of the enums know about.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }
}
