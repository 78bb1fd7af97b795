use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying stream failed. Recoverable: the caller may retry.
    #[error("Envelope read failed: {0}")]
    Read(#[from] std::io::Error),

    /// The bytes are not a well-formed envelope. No partial record is
    /// produced.
    #[error("Envelope decode failed: {0}")]
    Decode(#[from] prost::DecodeError),
}
