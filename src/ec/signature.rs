//! Recoverable ECDSA signature in the 65-byte Ethereum layout.
//!
//! A signature serializes as `r || s || v`: two 32-byte big-endian scalars
//! followed by the recovery byte, 27 for an even and 28 for an odd
//! nonce-point y-coordinate.

use std::fmt;

use crate::ec::public_key::PublicKey;
use crate::ecdsa;
use crate::scalar::ScalarElement;
use crate::PrimitivesError;

/// Length of a serialized recoverable signature in bytes.
const SIGNATURE_BYTES_LEN: usize = 65;

/// A recoverable ECDSA signature over secp256k1.
///
/// Public constructors enforce the canonical form: `r` and `s` non-zero
/// scalars below the curve order, `s` in the low half, and `v` in {27, 28}.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Signature r component, big-endian.
    r: [u8; 32],
    /// Signature s component, big-endian.
    s: [u8; 32],
    /// Recovery id, offset by 27.
    v: u8,
}

impl Signature {
    /// Construct a signature from its components, validating canonical form.
    ///
    /// # Arguments
    /// * `r` - Signature r component, 32 bytes big-endian.
    /// * `s` - Signature s component, 32 bytes big-endian.
    /// * `v` - Recovery id, 27 or 28.
    ///
    /// # Returns
    /// `Ok(Signature)`, or an error for zero or out-of-range components,
    /// a high `s`, or a recovery id outside {27, 28}.
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Result<Self, PrimitivesError> {
        let r_scalar = ScalarElement::from_bytes32(&r)?;
        let s_scalar = ScalarElement::from_bytes32(&s)?;
        if r_scalar.is_zero() || s_scalar.is_zero() {
            return Err(PrimitivesError::InvalidScalar(
                "signature components must be non-zero".to_string(),
            ));
        }
        if s_scalar.is_high() {
            return Err(PrimitivesError::NonCanonicalSignature);
        }
        if v != 27 && v != 28 {
            return Err(PrimitivesError::InvalidRecoveryId(v));
        }
        Ok(Signature { r, s, v })
    }

    /// Construct without validation.
    ///
    /// The signing code produces components that are in range by
    /// construction, and this path also carries the rare recovery values
    /// above 28 that `new` refuses.
    pub(crate) fn from_parts(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Signature { r, s, v }
    }

    /// The r component, 32 bytes big-endian.
    pub fn r(&self) -> [u8; 32] {
        self.r
    }

    /// The s component, 32 bytes big-endian.
    pub fn s(&self) -> [u8; 32] {
        self.s
    }

    /// The recovery id, offset by 27.
    pub fn v(&self) -> u8 {
        self.v
    }

    /// Serialize as the 65-byte `r || s || v` layout.
    ///
    /// # Returns
    /// A 65-byte array containing the signature.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        let mut out = [0u8; SIGNATURE_BYTES_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Parse a 65-byte `r || s || v` signature, validating as [`Signature::new`].
    ///
    /// # Arguments
    /// * `bytes` - The serialized signature.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error for a bad length or
    /// non-canonical components.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(PrimitivesError::InputLength {
                expected: SIGNATURE_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Self::new(r, s, bytes[64])
    }

    /// Serialize as a lowercase 130-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse a 130-character hex string produced by [`Signature::to_hex`].
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Recover the public key that produced this signature.
    ///
    /// # Arguments
    /// * `message_hash` - The 32-byte message hash that was signed.
    ///
    /// # Returns
    /// The signing `PublicKey`, or an error if recovery fails.
    pub fn recover(&self, message_hash: &[u8; 32]) -> Result<PublicKey, PrimitivesError> {
        ecdsa::recover(message_hash, &self.r, &self.s, self.v)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
