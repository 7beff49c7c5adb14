/// Unified error type for all primitives operations.
///
/// Covers errors from field and scalar arithmetic, curve point handling,
/// signing, verification, recovery, and key encoding.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid input length: expected {expected}, got {got}")]
    InputLength { expected: usize, got: usize },

    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    #[error("non-canonical signature: s is greater than half the curve order")]
    NonCanonicalSignature,

    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("point not on curve")]
    PointNotOnCurve,

    #[error("could not find a valid nonce after {0} attempts")]
    NonceExhaustion(usize),

    #[error("inverse does not exist for zero")]
    InverseOfZero,

    #[error("refusing to operate on an all-zero message")]
    AllZeroMessage,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
