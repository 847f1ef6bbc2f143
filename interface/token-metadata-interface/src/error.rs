//! Error types

use thiserror::Error;

/// Errors raised while decoding or encoding Token Metadata accounts and instructions.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetadataError {
    // 0
    /// Account data ended early or held an invalid value
    #[error("Failed to deserialize account data")]
    DeserializationError,
    /// Leading key byte names a different account type
    #[error("Data type mismatch")]
    DataTypeMismatch,
    /// Instruction data could not be encoded
    #[error("Failed to serialize instruction data")]
    SerializationError,
    /// Unknown instruction discriminator or malformed arguments
    #[error("Invalid instruction data")]
    InvalidInstructionData,
    /// Name exceeds `MAX_NAME_LENGTH`
    #[error("Name too long")]
    NameTooLong,
    // 5
    /// Symbol exceeds `MAX_SYMBOL_LENGTH`
    #[error("Symbol too long")]
    SymbolTooLong,
    /// URI exceeds `MAX_URI_LENGTH`
    #[error("URI too long")]
    UriTooLong,
    /// More than `MAX_CREATOR_LIMIT` creators
    #[error("Creators list too long")]
    CreatorsTooLong,
    /// Creator shares do not add up to 100
    #[error("Share total must equal 100 for creator array")]
    ShareTotalMustBe100,
    /// Basis points above 10000
    #[error("Basis points cannot be more than 10000")]
    InvalidBasisPoints,
}

impl From<std::io::Error> for MetadataError {
    fn from(_: std::io::Error) -> Self {
        MetadataError::DeserializationError
    }
}
