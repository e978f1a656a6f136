//! Error types for key handling, script evaluation and transaction signing

use thiserror::Error;

/// Coarse failure class of a [`SigningError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad encodings, truncated buffers, out-of-range values, unexpected script shapes
    MalformedInput,
    /// Well-formed data that fails a curve or signature check
    Cryptographic,
    /// The operating system could not provide secure randomness
    ResourceExhaustion,
}

#[derive(Error, Debug)]
pub enum SigningError {
    #[error("Invalid base58 encoding: {0}")]
    Base58(String),

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Invalid compact size: {0}")]
    InvalidCompactSize(String),

    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Unexpected script shape: {0}")]
    ScriptShape(String),

    #[error("Input index {index} out of range for transaction with {count} inputs")]
    InputIndexOutOfRange { index: usize, count: usize },

    #[error("Input {0} appears more than once in a signing batch")]
    DuplicateInput(usize),

    #[error("Unsupported sighash type: 0x{0:02x}")]
    UnsupportedSigHashType(u32),

    #[error("{0} trailing bytes after transaction")]
    TrailingData(usize),

    #[error("Point is not on the curve")]
    PointNotOnCurve,

    #[error("Signature value out of range: {0}")]
    SignatureOutOfRange(String),

    #[error("Signature verification failed")]
    VerificationFailed,

    #[error("Public key recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("Secure randomness unavailable: {0}")]
    Randomness(String),
}

impl SigningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SigningError::Base58(_)
            | SigningError::ChecksumMismatch
            | SigningError::Truncated { .. }
            | SigningError::InvalidCompactSize(_)
            | SigningError::InvalidScalar(_)
            | SigningError::InvalidEncoding(_)
            | SigningError::ScriptShape(_)
            | SigningError::InputIndexOutOfRange { .. }
            | SigningError::DuplicateInput(_)
            | SigningError::UnsupportedSigHashType(_)
            | SigningError::TrailingData(_) => ErrorKind::MalformedInput,
            SigningError::PointNotOnCurve
            | SigningError::SignatureOutOfRange(_)
            | SigningError::VerificationFailed
            | SigningError::RecoveryFailed(_) => ErrorKind::Cryptographic,
            SigningError::Randomness(_) => ErrorKind::ResourceExhaustion,
        }
    }
}

impl From<bs58::decode::Error> for SigningError {
    fn from(err: bs58::decode::Error) -> Self {
        match err {
            bs58::decode::Error::InvalidChecksum { .. } => SigningError::ChecksumMismatch,
            other => SigningError::Base58(other.to_string()),
        }
    }
}

impl From<base64::DecodeError> for SigningError {
    fn from(err: base64::DecodeError) -> Self {
        SigningError::InvalidEncoding(format!("base64: {}", err))
    }
}

impl From<hex::FromHexError> for SigningError {
    fn from(err: hex::FromHexError) -> Self {
        SigningError::InvalidEncoding(format!("hex: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SigningError>;
