//! secp256k1 private key with Ethereum-specific functionality.
//!
//! Wraps the secret scalar bytes and adds deterministic RFC 6979 signing,
//! public key derivation, and zeroization on drop.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::ecdsa;
use crate::scalar::ScalarElement;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// A secp256k1 private key for deterministic signing.
///
/// Holds the raw 32-byte secret scalar, guaranteed non-zero and below the
/// curve order by every constructor. The bytes are wiped on drop.
#[derive(Clone)]
pub struct PrivateKey {
    /// The secret scalar, big-endian.
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    ///
    /// Draws 32-byte candidates until one falls in `[1, n-1]`; out-of-range
    /// draws happen with probability around 2^-128.
    ///
    /// # Returns
    /// A new randomly generated `PrivateKey`.
    pub fn new() -> Self {
        let mut bytes = [0u8; 32];
        loop {
            OsRng.fill_bytes(&mut bytes);
            if !ScalarElement::exceeds_order(&bytes) && bytes.iter().any(|&b| b != 0) {
                return PrivateKey { bytes };
            }
        }
    }

    /// Create a private key from a raw 32-byte scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a valid scalar on secp256k1,
    /// or an error if the scalar is zero or out of range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InputLength {
                expected: PRIVATE_KEY_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let mut fixed = [0u8; 32];
        fixed.copy_from_slice(bytes);
        if ScalarElement::exceeds_order(&fixed) {
            return Err(PrimitivesError::InvalidScalar(
                "private key is not below the curve order".to_string(),
            ));
        }
        if fixed.iter().all(|&b| b == 0) {
            return Err(PrimitivesError::InvalidScalar(
                "private key is zero".to_string(),
            ));
        }
        Ok(PrivateKey { bytes: fixed })
    }

    /// Create a private key from a hexadecimal string.
    ///
    /// # Arguments
    /// * `hex_str` - A 64-character hex string representing the 32-byte scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, or an error if the hex is invalid or the
    /// scalar is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidHex(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the private key as a 32-byte big-endian array.
    ///
    /// # Returns
    /// A 32-byte array containing the private key scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    /// Serialize the private key as a lowercase hexadecimal string.
    ///
    /// # Returns
    /// A 64-character hex string representing the 32-byte scalar.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Derive the corresponding public key for this private key.
    ///
    /// # Returns
    /// The `PublicKey` corresponding to this private key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_private(self)
    }

    /// Sign a 32-byte message hash using deterministic RFC 6979 nonces.
    ///
    /// Produces a low-S signature with the recovery id embedded as `v`.
    ///
    /// # Arguments
    /// * `message_hash` - The 32-byte message hash to sign.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if signing fails.
    pub fn sign(&self, message_hash: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        ecdsa::sign(message_hash, &self.bytes)
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bytes", &"[redacted]")
            .finish()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PrivateKey {}
