use thiserror::Error;

/// Errors that can occur during TS parsing
#[derive(Error, Debug)]
pub enum TsError {
    #[error("Invalid packet size: expected {expected} bytes, got {actual}")]
    InvalidPacketSize { expected: usize, actual: usize },

    #[error("Invalid sync byte: expected 0x47, got 0x{0:02x}")]
    InvalidSyncByte(u8),

    #[error("Insufficient data: expected at least {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Invalid table ID: expected {expected}, got {actual}")]
    InvalidTableId { expected: u8, actual: u8 },

    #[error("Invalid section length: {0}")]
    InvalidSectionLength(u16),

    #[error("Parse error: {0}")]
    ParseError(String),
}
