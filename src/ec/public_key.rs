//! secp256k1 public key with Ethereum-specific functionality.
//!
//! Supports compressed, uncompressed, and raw-coordinate serialization,
//! Ethereum address derivation, and ECDSA signature verification.

use std::fmt;

use crate::ec::private_key::PrivateKey;
use crate::ec::signature::Signature;
use crate::ecdsa;
use crate::field::FieldElement;
use crate::hash::keccak256;
use crate::point::Point;
use crate::scalar::ScalarElement;
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed public key in bytes (prefix + 32 byte x + 32 byte y).
const UNCOMPRESSED_LEN: usize = 65;

/// Length of a public key given as bare coordinates without a prefix byte.
const RAW_COORDS_LEN: usize = 64;

/// Length of an Ethereum address in bytes.
const ETH_ADDRESS_LEN: usize = 20;

/// A secp256k1 public key for verification and address derivation.
///
/// Wraps a curve point that is finite and on-curve by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    /// The underlying curve point.
    point: Point,
}

impl PublicKey {
    /// Derive the public key for a private key, `Q = d*G`.
    ///
    /// # Arguments
    /// * `private_key` - The private key to derive from.
    ///
    /// # Returns
    /// The corresponding `PublicKey`.
    pub fn from_private(private_key: &PrivateKey) -> Self {
        let d = ScalarElement::from_bytes32_reduced(&private_key.to_bytes());
        PublicKey {
            point: Point::generator().scalar_mul(&d),
        }
    }

    /// Create a PublicKey from serialized bytes.
    ///
    /// Accepts compressed (33-byte), uncompressed (65-byte), and bare
    /// coordinate (64-byte) formats.
    ///
    /// # Arguments
    /// * `bytes` - Serialized public key bytes.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the bytes don't represent
    /// a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        match bytes.len() {
            0 => Err(PrimitivesError::InvalidPublicKey(
                "pubkey bytes are empty".to_string(),
            )),
            COMPRESSED_LEN => {
                let odd_y = match bytes[0] {
                    0x02 => false,
                    0x03 => true,
                    other => {
                        return Err(PrimitivesError::InvalidPublicKey(format!(
                            "unexpected compressed prefix byte 0x{:02x}",
                            other
                        )));
                    }
                };
                let x = FieldElement::from_bytes32(&array32(&bytes[1..]));
                let point = Point::from_x(x, odd_y)?;
                Ok(PublicKey { point })
            }
            UNCOMPRESSED_LEN => {
                if bytes[0] != 0x04 {
                    return Err(PrimitivesError::InvalidPublicKey(format!(
                        "unexpected uncompressed prefix byte 0x{:02x}",
                        bytes[0]
                    )));
                }
                Self::from_coordinates(&bytes[1..])
            }
            RAW_COORDS_LEN => Self::from_coordinates(bytes),
            other => Err(PrimitivesError::InvalidPublicKey(format!(
                "unexpected length {}",
                other
            ))),
        }
    }

    /// Create a PublicKey from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - Hex of a compressed, uncompressed, or bare-coordinate key.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the hex or point is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the public key in compressed format (33 bytes).
    ///
    /// The first byte is 0x02 (even Y) or 0x03 (odd Y), followed by the
    /// 32-byte X coordinate.
    ///
    /// # Returns
    /// A 33-byte array containing the compressed public key.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let mut out = [0u8; COMPRESSED_LEN];
        out[0] = if self.point.y().is_even() { 0x02 } else { 0x03 };
        out[1..].copy_from_slice(&self.point.x().to_bytes32());
        out
    }

    /// Serialize the public key in uncompressed format (65 bytes).
    ///
    /// The first byte is 0x04, followed by 32-byte X and 32-byte Y
    /// coordinates.
    ///
    /// # Returns
    /// A 65-byte array containing the uncompressed public key.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.point.x().to_bytes32());
        out[33..].copy_from_slice(&self.point.y().to_bytes32());
        out
    }

    /// Serialize the public key as a lowercase hexadecimal string
    /// (compressed format).
    ///
    /// # Returns
    /// A 66-character hex string of the compressed public key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Derive the Ethereum address for this public key.
    ///
    /// The address is the last 20 bytes of the Keccak-256 digest of the
    /// uncompressed key without its 0x04 prefix.
    ///
    /// # Returns
    /// The 20-byte Ethereum address.
    pub fn to_eth_address(&self) -> [u8; ETH_ADDRESS_LEN] {
        let uncompressed = self.to_uncompressed();
        let digest = keccak256(&uncompressed[1..]);
        let mut out = [0u8; ETH_ADDRESS_LEN];
        out.copy_from_slice(&digest[12..]);
        out
    }

    /// Verify an ECDSA signature against a message hash using this public key.
    ///
    /// # Arguments
    /// * `message_hash` - The 32-byte message hash that was signed.
    /// * `signature` - The ECDSA signature to verify.
    ///
    /// # Returns
    /// `true` if the signature is valid for this hash and public key,
    /// `false` otherwise.
    pub fn verify(&self, message_hash: &[u8; 32], signature: &Signature) -> bool {
        ecdsa::verify(
            &self.to_compressed(),
            message_hash,
            &signature.r(),
            &signature.s(),
        )
        .unwrap_or(false)
    }

    /// Wrap a curve point produced by EC arithmetic.
    ///
    /// # Arguments
    /// * `point` - A finite curve point.
    ///
    /// # Returns
    /// `Ok(PublicKey)`, or an error for the point at infinity.
    pub(crate) fn from_point(point: Point) -> Result<Self, PrimitivesError> {
        if point.is_infinity() {
            return Err(PrimitivesError::InvalidPublicKey(
                "point at infinity".to_string(),
            ));
        }
        Ok(PublicKey { point })
    }

    /// Access the underlying curve point for EC arithmetic.
    pub(crate) fn point(&self) -> Point {
        self.point
    }

    fn from_coordinates(raw: &[u8]) -> Result<Self, PrimitivesError> {
        let x = FieldElement::from_bytes32(&array32(&raw[..32]));
        let y = FieldElement::from_bytes32(&array32(&raw[32..]));
        let point = Point::new(x, y)?;
        Ok(PublicKey { point })
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn array32(slice: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(slice);
    out
}
