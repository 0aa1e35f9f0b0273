use thiserror::Error;

/// Errors that can occur while reading bits
///
/// All of these are recoverable for the caller: an outer scanner may resume
/// at the next start code after a failed header parse.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitError {
    /// The cursor reached the end of the buffer in the middle of a syntax
    /// element.
    #[error("bitstream truncated at bit position {position}")]
    Truncated {
        /// Absolute bit position at which the read was attempted
        position: usize,
    },

    /// A bit mandated to be 1 by the syntax table was 0.
    #[error("marker bit violation at bit position {position}")]
    MarkerBitViolation {
        /// Absolute bit position of the offending bit
        position: usize,
    },

    /// An Exp-Golomb code had more than 31 leading zeros and cannot be a
    /// valid `ue(v)` element.
    #[error("exp-golomb code exceeds 32 bits at bit position {position}")]
    ExpGolombOverflow {
        /// Absolute bit position at which the code started
        position: usize,
    },
}
