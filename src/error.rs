use thiserror::Error;

/// Recoverable errors raised while translating values that cross the
/// shell/plugin boundary.
///
/// None of these ever abort a lifecycle operation: callers log them and skip
/// the affected facet.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("unknown dock position: {0}")]
    InvalidPosition(u32),

    #[error("unknown dock display mode: {0}")]
    InvalidDisplayMode(u32),

    #[error("unknown palette type: {0}")]
    InvalidPaletteType(u32),

    #[error("malformed plugin message: {0}")]
    MalformedMessage(String),

    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("no {slot} wrapper registered for item {item_key}")]
    UnknownWrapper { item_key: String, slot: String },
}

pub type HostResult<T> = std::result::Result<T, HostError>;
