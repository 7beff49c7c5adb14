//! Arithmetic mod the secp256k1 group order `n`.
//!
//! Scalars multiply curve points and make up the `r`, `s` and nonce values
//! of ECDSA. Unlike the base field there is no performance-critical path
//! here, so the representation is a reduced `BigUint` and inversion runs
//! the extended Euclidean algorithm.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::PrimitivesError;

/// secp256k1 curve order `n`, big-endian bytes.
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// `floor(n / 2)`, the boundary between low-S and high-S signatures.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

fn order() -> BigUint {
    BigUint::from_bytes_be(&CURVE_ORDER)
}

fn half_order() -> BigUint {
    BigUint::from_bytes_be(&HALF_ORDER)
}

/// An integer mod the curve order, always reduced.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScalarElement {
    value: BigUint,
}

impl ScalarElement {
    /// Wrap an arbitrary non-negative integer, reducing mod `n`.
    pub fn new(value: BigUint) -> Self {
        ScalarElement {
            value: value % order(),
        }
    }

    pub fn zero() -> Self {
        ScalarElement {
            value: BigUint::zero(),
        }
    }

    pub fn one() -> Self {
        ScalarElement {
            value: BigUint::one(),
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self::new(BigUint::from(value))
    }

    /// Decode a 32-byte big-endian integer, rejecting values at or above
    /// the curve order.
    ///
    /// This is the strict parse used for secret keys and incoming `r`/`s`
    /// components.
    ///
    /// # Arguments
    /// * `bytes` - 32-byte big-endian integer.
    ///
    /// # Returns
    /// `Ok(ScalarElement)`, or `InvalidScalar` if the value is not below `n`.
    pub fn from_bytes32(bytes: &[u8; 32]) -> Result<Self, PrimitivesError> {
        if Self::exceeds_order(bytes) {
            return Err(PrimitivesError::InvalidScalar(
                "value is not below the curve order".to_string(),
            ));
        }
        Ok(ScalarElement {
            value: BigUint::from_bytes_be(bytes),
        })
    }

    /// Decode a 32-byte big-endian integer, reducing it mod `n`.
    ///
    /// Used where the input is a hash rather than a key, so out-of-range
    /// values wrap instead of failing. Any 256-bit value is below `2n`,
    /// so one conditional subtraction fully reduces it.
    pub fn from_bytes32_reduced(bytes: &[u8; 32]) -> Self {
        let mut value = BigUint::from_bytes_be(bytes);
        let n = order();
        if value >= n {
            value -= n;
        }
        ScalarElement { value }
    }

    /// Check whether a 32-byte big-endian value is at or above the curve
    /// order, without constructing a big integer.
    pub fn exceeds_order(bytes: &[u8; 32]) -> bool {
        for i in 0..32 {
            if bytes[i] > CURVE_ORDER[i] {
                return true;
            }
            if bytes[i] < CURVE_ORDER[i] {
                return false;
            }
        }
        true
    }

    /// Encode as a 32-byte big-endian integer.
    pub fn to_bytes32(&self) -> [u8; 32] {
        let raw = self.value.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    /// Decode a 64-character hex string with the strict range check.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        if bytes.len() != 32 {
            return Err(PrimitivesError::InputLength {
                expected: 32,
                got: bytes.len(),
            });
        }
        let mut fixed = [0u8; 32];
        fixed.copy_from_slice(&bytes);
        Self::from_bytes32(&fixed)
    }

    /// Encode as a lowercase 64-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes32())
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// True when the scalar is above `n/2`. High-S signatures are the
    /// malleable twins that canonical signing folds down.
    pub fn is_high(&self) -> bool {
        self.value > half_order()
    }

    /// Bit access for double-and-add loops, little-endian bit order.
    pub(crate) fn bit(&self, index: u64) -> bool {
        self.value.bit(index)
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(&self.value + &other.value)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.value * &other.value)
    }

    /// Additive inverse mod `n`.
    pub fn neg(&self) -> Self {
        if self.value.is_zero() {
            self.clone()
        } else {
            ScalarElement {
                value: order() - &self.value,
            }
        }
    }

    /// Multiplicative inverse mod `n` via the extended Euclidean algorithm.
    ///
    /// # Returns
    /// `Ok(inverse)`, or `InverseOfZero` if `self` is zero.
    pub fn invert(&self) -> Result<Self, PrimitivesError> {
        if self.is_zero() {
            return Err(PrimitivesError::InverseOfZero);
        }
        let n = BigInt::from(order());
        let mut old_r = n.clone();
        let mut r = BigInt::from(self.value.clone());
        let mut old_t = BigInt::zero();
        let mut t = BigInt::one();
        while !r.is_zero() {
            let q = &old_r / &r;
            let next_r = &old_r - &q * &r;
            old_r = std::mem::replace(&mut r, next_r);
            let next_t = &old_t - &q * &t;
            old_t = std::mem::replace(&mut t, next_t);
        }
        let mut value = old_t % &n;
        if value.sign() == Sign::Minus {
            value += &n;
        }
        Ok(ScalarElement {
            value: value.magnitude().clone(),
        })
    }
}
