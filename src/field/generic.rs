//! Big-integer field arithmetic over the same prime as the limb backend.
//!
//! This mirror trades speed for obviousness. It leans on `num-bigint` for
//! all carrying and reduction and inverts through the extended Euclidean
//! algorithm instead of Fermat, which makes it a useful cross-check for the
//! hand-rolled limb code.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::PrimitivesError;

/// secp256k1 prime, big-endian bytes.
const P_BYTES: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF,
    0xFC, 0x2F,
];

fn prime() -> BigUint {
    BigUint::from_bytes_be(&P_BYTES)
}

/// A base-field element backed by `BigUint`, always reduced mod `p`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldElementBig {
    value: BigUint,
}

impl FieldElementBig {
    /// Wrap an arbitrary non-negative integer, reducing mod `p`.
    pub fn new(value: BigUint) -> Self {
        FieldElementBig {
            value: value % prime(),
        }
    }

    pub fn zero() -> Self {
        FieldElementBig {
            value: BigUint::zero(),
        }
    }

    pub fn one() -> Self {
        FieldElementBig {
            value: BigUint::one(),
        }
    }

    /// Reduce a possibly negative integer into `[0, p)`.
    ///
    /// `BigInt`'s `%` truncates toward zero, so a negative operand leaves a
    /// negative remainder that one addition of `p` fixes.
    fn reduce(value: BigInt) -> BigUint {
        let p = BigInt::from(prime());
        let mut r = value % &p;
        if r.sign() == Sign::Minus {
            r += &p;
        }
        r.magnitude().clone()
    }

    /// Decode a 32-byte big-endian integer, reducing it mod `p`.
    pub fn from_bytes32(bytes: &[u8; 32]) -> Self {
        Self::new(BigUint::from_bytes_be(bytes))
    }

    /// Encode as a 32-byte big-endian integer.
    pub fn to_bytes32(&self) -> [u8; 32] {
        let raw = self.value.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_even(&self) -> bool {
        !self.value.bit(0)
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(&self.value + &other.value)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let diff = BigInt::from(self.value.clone()) - BigInt::from(other.value.clone());
        FieldElementBig {
            value: Self::reduce(diff),
        }
    }

    pub fn neg(&self) -> Self {
        if self.is_zero() {
            self.clone()
        } else {
            FieldElementBig {
                value: prime() - &self.value,
            }
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.value * &other.value)
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    pub fn pow(&self, exp: &BigUint) -> Self {
        FieldElementBig {
            value: self.value.modpow(exp, &prime()),
        }
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    ///
    /// Runs Bezout on `(p, a)`; since `p` is prime the gcd is 1 and the
    /// final coefficient of `a` is its inverse mod `p`.
    ///
    /// # Returns
    /// `Ok(inverse)`, or `InverseOfZero` if `self` is zero.
    pub fn invert(&self) -> Result<Self, PrimitivesError> {
        if self.is_zero() {
            return Err(PrimitivesError::InverseOfZero);
        }
        let mut old_r = BigInt::from(prime());
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
        Ok(FieldElementBig {
            value: Self::reduce(old_t),
        })
    }

    /// Square root via `a^((p+1)/4)`, valid because `p ≡ 3 (mod 4)`.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }
        let exp = (prime() + 1u8) >> 2;
        let root = self.pow(&exp);
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }
}
