use thiserror::Error;

use crate::Network;

/// Malformed Bech32/Bech32m strings and silent payment address payloads.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("string mixes upper and lower case characters")]
    MixedCase,
    #[error("no separator character '1' found")]
    NoSeparator,
    #[error("invalid human-readable part")]
    InvalidHrp,
    #[error("invalid data part")]
    InvalidData,
    #[error("invalid checksum")]
    BadChecksum,
    #[error("wrong prefix, expected \"sp\", \"tsp\", or \"sprt\", got \"{0}\"")]
    InvalidPrefix(String),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),
    #[error("wrong payload length, expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("invalid network: {0}")]
    InvalidNetwork(String),
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Failures of scalar and point arithmetic on secp256k1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("x coordinate is not below the field prime")]
    OutOfRange,
    #[error("x coordinate is not on the curve")]
    NotOnCurve,
    #[error("invalid compressed point encoding")]
    InvalidPoint,
    #[error("scalar is zero or not below the curve order")]
    ScalarOutOfRange,
    #[error("secp256k1: {0}")]
    Backend(secp256k1::Error),
}

impl From<secp256k1::Error> for CurveError {
    fn from(e: secp256k1::Error) -> Self {
        match e {
            secp256k1::Error::InvalidPublicKey | secp256k1::Error::InvalidPublicKeySum => {
                CurveError::InvalidPoint
            }
            secp256k1::Error::InvalidSecretKey | secp256k1::Error::InvalidTweak => {
                CurveError::ScalarOutOfRange
            }
            other => CurveError::Backend(other),
        }
    }
}

/// Violations of Taproot and silent payment protocol rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("script tree branch has {0} children, at most 2 allowed")]
    TooManyBranches(usize),
    #[error("integer {0} too large for compact size encoding")]
    IntegerTooLarge(u64),
    #[error("no inputs given")]
    NoInputs,
    #[error("input secret keys not available, session was built from public keys")]
    MissingInputSecrets,
    #[error("wrong network for address, expected {expected:?}, got {got:?}")]
    NetworkMismatch { expected: Network, got: Network },
    #[error("label {0} is not in the label table")]
    UnknownLabel(u32),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("failed to derive key: {0}")]
    Bip32(#[from] bitcoin::bip32::Error),
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        Error::Curve(e.into())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::Format(e.into())
    }
}
