use thiserror::Error;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors returned by [`encode`][crate::encode] and [`decode`][crate::decode].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The identifier is at or past the encodable domain.
    #[error("identifier {id} is outside the encodable range 0..1000000")]
    IdOutOfRange { id: u64 },
    /// The token is not exactly six characters from the token alphabet.
    #[error("malformed token: {0:?}")]
    MalformedToken(String),
    /// The token is well formed but decodes to an identifier no encode call
    /// could have produced.
    #[error("token does not correspond to any identifier")]
    UnknownToken,
}
