//! Arithmetic over the secp256k1 base field.
//!
//! Elements are residues mod `p = 2^256 - 2^32 - 977`, held as four 64-bit
//! limbs in little-endian limb order and kept canonical (below `p`) after
//! every public operation. Reduction exploits the pseudo-Mersenne shape of
//! `p`: the high 256 bits of a product fold back in as `(H << 32) + 977*H`.
//!
//! A slower `BigUint`-backed implementation with the same contract lives in
//! [`generic`] and serves as the oracle for differential tests.

pub mod generic;

use std::cmp::Ordering;

use crate::PrimitivesError;

/// The field prime, little-endian limbs.
const P_LIMBS: [u64; 4] = [
    0xFFFFFFFEFFFFFC2F,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
];

/// `p - 2`, the Fermat inversion exponent.
pub(crate) const P_MINUS_2: [u64; 4] = [
    0xFFFFFFFEFFFFFC2D,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
];

/// `(p + 1) / 4`, the square-root exponent (valid since `p ≡ 3 mod 4`).
const SQRT_EXP: [u64; 4] = [
    0xFFFFFFFFBFFFFF0C,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0x3FFFFFFFFFFFFFFF,
];

/// An element of the secp256k1 base field, always canonical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldElement([u64; 4]);

impl FieldElement {
    /// The additive identity.
    pub fn zero() -> Self {
        FieldElement([0, 0, 0, 0])
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        FieldElement([1, 0, 0, 0])
    }

    /// Create a field element from a small integer.
    pub fn from_u64(value: u64) -> Self {
        FieldElement([value, 0, 0, 0])
    }

    /// Decode a 32-byte big-endian integer, reducing it into `[0, p)`.
    ///
    /// The raw value is below `2^256 < 2p`, so a single conditional
    /// subtraction canonicalizes it.
    ///
    /// # Arguments
    /// * `bytes` - 32-byte big-endian integer.
    ///
    /// # Returns
    /// The canonical residue of the input mod `p`.
    pub fn from_bytes32(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            limbs[3 - i] = u64::from_be_bytes(word);
        }
        if gte(&limbs, &P_LIMBS) {
            limbs = sub_limbs(&limbs, &P_LIMBS).0;
        }
        FieldElement(limbs)
    }

    /// Encode as a 32-byte big-endian integer.
    pub fn to_bytes32(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..4 {
            out[i * 8..(i + 1) * 8].copy_from_slice(&self.0[3 - i].to_be_bytes());
        }
        out
    }

    /// Decode a 64-character hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Hex encoding of a 32-byte big-endian integer.
    ///
    /// # Returns
    /// `Ok(FieldElement)` reduced into `[0, p)`, or an error if the hex is
    /// malformed or not exactly 32 bytes.
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
        Ok(Self::from_bytes32(&fixed))
    }

    /// Encode as a lowercase 64-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes32())
    }

    /// Check for the additive identity.
    pub fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0, 0]
    }

    /// Check for the multiplicative identity.
    pub fn is_one(&self) -> bool {
        self.0 == [1, 0, 0, 0]
    }

    /// Parity of the canonical representative.
    pub fn is_even(&self) -> bool {
        self.0[0] & 1 == 0
    }

    /// Field addition.
    pub fn add(&self, other: &Self) -> Self {
        let (sum, overflow) = add_limbs(&self.0, &other.0);
        if overflow || gte(&sum, &P_LIMBS) {
            FieldElement(sub_limbs(&sum, &P_LIMBS).0)
        } else {
            FieldElement(sum)
        }
    }

    /// Field subtraction.
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = sub_limbs(&self.0, &other.0);
        if borrow {
            FieldElement(add_limbs(&diff, &P_LIMBS).0)
        } else {
            FieldElement(diff)
        }
    }

    /// Additive inverse.
    pub fn neg(&self) -> Self {
        if self.is_zero() {
            *self
        } else {
            FieldElement(sub_limbs(&P_LIMBS, &self.0).0)
        }
    }

    /// Field multiplication.
    pub fn mul(&self, other: &Self) -> Self {
        reduce_wide(&mul_wide(&self.0, &other.0))
    }

    /// Field squaring.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Raise to a 256-bit exponent, scanning bits from most significant to
    /// least significant: square every step, multiply on set bits.
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut acc = FieldElement::one();
        for i in (0..256).rev() {
            acc = acc.square();
            if (exp[i / 64] >> (i % 64)) & 1 == 1 {
                acc = acc.mul(self);
            }
        }
        acc
    }

    /// Multiplicative inverse via Fermat's little theorem, `a^(p-2)`.
    ///
    /// # Returns
    /// `Ok(inverse)`, or `InverseOfZero` if `self` is zero.
    pub fn invert(&self) -> Result<Self, PrimitivesError> {
        if self.is_zero() {
            return Err(PrimitivesError::InverseOfZero);
        }
        Ok(self.pow(&P_MINUS_2))
    }

    /// Square root via `a^((p+1)/4)`.
    ///
    /// # Returns
    /// `Some(root)` whose square equals `self`, or `None` if `self` is not a
    /// quadratic residue.
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(Self::zero());
        }
        let root = self.pow(&SQRT_EXP);
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }
}

impl PartialOrd for FieldElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldElement {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl std::ops::Add for FieldElement {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        FieldElement::add(&self, &rhs)
    }
}

impl std::ops::Sub for FieldElement {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        FieldElement::sub(&self, &rhs)
    }
}

impl std::ops::Mul for FieldElement {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        FieldElement::mul(&self, &rhs)
    }
}

impl std::ops::Neg for FieldElement {
    type Output = Self;
    fn neg(self) -> Self {
        FieldElement::neg(&self)
    }
}

/// Schoolbook 4x4 limb multiplication into an 8-limb product.
///
/// The running carry must flow through the inner accumulation and out into
/// the next limb; computing it from the immediate addition alone corrupts
/// limb 1 upward.
fn mul_wide(a: &[u64; 4], b: &[u64; 4]) -> [u64; 8] {
    let mut t = [0u64; 8];
    for i in 0..4 {
        let mut carry: u128 = 0;
        for j in 0..4 {
            let prod = a[i] as u128 * b[j] as u128 + t[i + j] as u128 + carry;
            t[i + j] = prod as u64;
            carry = prod >> 64;
        }
        t[i + 4] = carry as u64;
    }
    t
}

/// Reduce an 8-limb product mod `p` using `2^256 ≡ 2^32 + 977 (mod p)`.
fn reduce_wide(t: &[u64; 8]) -> FieldElement {
    let h = [t[4], t[5], t[6], t[7]];

    // R = L + (H << 32) + 977*H. The shifted high half spans five limbs.
    let shifted = [
        h[0] << 32,
        (h[1] << 32) | (h[0] >> 32),
        (h[2] << 32) | (h[1] >> 32),
        (h[3] << 32) | (h[2] >> 32),
        h[3] >> 32,
    ];

    let mut r = [t[0], t[1], t[2], t[3], 0u64, 0u64];
    let mut carry: u128 = 0;
    for i in 0..5 {
        let sum = r[i] as u128 + shifted[i] as u128 + carry;
        r[i] = sum as u64;
        carry = sum >> 64;
    }
    r[5] = carry as u64;

    let mut carry: u128 = 0;
    for i in 0..4 {
        let sum = r[i] as u128 + 977 * h[i] as u128 + carry;
        r[i] = sum as u64;
        carry = sum >> 64;
    }
    let sum = r[4] as u128 + carry;
    r[4] = sum as u64;
    r[5] += (sum >> 64) as u64;

    // Fold any overflow beyond 256 bits back in with the same identity,
    // repeating until none remains.
    let mut limbs = [r[0], r[1], r[2], r[3]];
    let mut overflow = r[4] as u128 | ((r[5] as u128) << 64);
    while overflow != 0 {
        let fold = overflow * ((1u128 << 32) + 977);
        let fold_limbs = [fold as u64, (fold >> 64) as u64];
        let mut carry: u128 = 0;
        for i in 0..4 {
            let addend = if i < 2 { fold_limbs[i] as u128 } else { 0 };
            let sum = limbs[i] as u128 + addend + carry;
            limbs[i] = sum as u64;
            carry = sum >> 64;
        }
        overflow = carry;
    }

    // At most two conditional subtractions are needed after the fold.
    while gte(&limbs, &P_LIMBS) {
        limbs = sub_limbs(&limbs, &P_LIMBS).0;
    }
    FieldElement(limbs)
}

/// 256-bit addition with carry-out.
fn add_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], bool) {
    let mut out = [0u64; 4];
    let mut carry = false;
    for i in 0..4 {
        let (sum, c1) = a[i].overflowing_add(b[i]);
        let (sum, c2) = sum.overflowing_add(carry as u64);
        out[i] = sum;
        carry = c1 || c2;
    }
    (out, carry)
}

/// 256-bit subtraction with borrow-out.
fn sub_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], bool) {
    let mut out = [0u64; 4];
    let mut borrow = false;
    for i in 0..4 {
        let (diff, b1) = a[i].overflowing_sub(b[i]);
        let (diff, b2) = diff.overflowing_sub(borrow as u64);
        out[i] = diff;
        borrow = b1 || b2;
    }
    (out, borrow)
}

/// Limb-wise `a >= b`.
fn gte(a: &[u64; 4], b: &[u64; 4]) -> bool {
    for i in (0..4).rev() {
        if a[i] > b[i] {
            return true;
        }
        if a[i] < b[i] {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(hex_str: &str) -> FieldElement {
        FieldElement::from_hex(hex_str).unwrap()
    }

    #[test]
    fn test_add_small() {
        let c = FieldElement::from_u64(100).add(&FieldElement::from_u64(200));
        assert_eq!(c, FieldElement::from_u64(300));
    }

    #[test]
    fn test_mul_small() {
        let c = FieldElement::from_u64(3).mul(&FieldElement::from_u64(7));
        assert_eq!(c, FieldElement::from_u64(21));
    }

    #[test]
    fn test_mul_known_vector() {
        let a = fe("deadbeefcafebabe123456789abcdef00f1e2d3c4b5a69788796a5b4c3d2e1f0");
        let b = fe("0123456789abcdeffedcba987654321000112233445566778899aabbccddeeff");
        assert_eq!(
            a.mul(&b).to_hex(),
            "fe84e6781e54b266be363d665f13e5cc38d9b4bdbc80a3ccefb8f7d987f13b52"
        );
        assert_eq!(a.mul(&b), b.mul(&a));
    }

    /// (p-1)^2 mod p must equal 1. This input once exposed a lost running
    /// carry in `mul_wide` and stays as a permanent guard.
    #[test]
    fn test_square_of_minus_one_is_one() {
        let minus_one = FieldElement::zero().sub(&FieldElement::one());
        assert_eq!(
            minus_one.to_hex(),
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2e"
        );
        assert!(minus_one.square().is_one());
    }

    #[test]
    fn test_invert_known_vector() {
        let a = fe("deadbeefcafebabe123456789abcdef00f1e2d3c4b5a69788796a5b4c3d2e1f0");
        let inv = a.invert().unwrap();
        assert_eq!(
            inv.to_hex(),
            "8c536948042d7fcc1eac880333c32db1211d86f5138c176ec8c66d00a1882add"
        );
        assert!(a.mul(&inv).is_one());
    }

    #[test]
    fn test_invert_zero_fails() {
        assert!(matches!(
            FieldElement::zero().invert(),
            Err(PrimitivesError::InverseOfZero)
        ));
    }

    #[test]
    fn test_sqrt_of_square() {
        let a = fe("deadbeefcafebabe123456789abcdef00f1e2d3c4b5a69788796a5b4c3d2e1f0");
        let squared = a.square();
        assert_eq!(
            squared.to_hex(),
            "22984c7923df7e486a1639faa25ac27cde2c6863a8774fd107e5b1c438f1a8b8"
        );
        let root = squared.sqrt().unwrap();
        assert!(root == a || root == a.neg());
        assert_eq!(root.square(), squared);
    }

    /// -1 is a non-residue for p ≡ 3 (mod 4).
    #[test]
    fn test_sqrt_of_non_residue_is_none() {
        let minus_one = FieldElement::zero().sub(&FieldElement::one());
        assert!(minus_one.sqrt().is_none());
    }

    /// Decoding 2^256 - 1 must land on 2^256 - 1 - p = 0x1000003d0 after a
    /// single subtraction.
    #[test]
    fn test_from_bytes_reduces_with_one_subtraction() {
        let decoded = FieldElement::from_bytes32(&[0xFF; 32]);
        assert_eq!(decoded, FieldElement::from_u64(0x1000003D0));
    }

    #[test]
    fn test_bytes_round_trip() {
        let a = fe("0f1e2d3c4b5a69788796a5b4c3d2e1f0deadbeefcafebabe123456789abcdef0");
        assert_eq!(FieldElement::from_bytes32(&a.to_bytes32()), a);
        assert_eq!(a.to_hex().len(), 64);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(FieldElement::from_hex("zz").is_err());
        assert!(matches!(
            FieldElement::from_hex("00ff"),
            Err(PrimitivesError::InputLength { expected: 32, got: 2 })
        ));
    }

    #[test]
    fn test_neg_cancels() {
        let a = fe("deadbeefcafebabe123456789abcdef00f1e2d3c4b5a69788796a5b4c3d2e1f0");
        assert!(a.add(&a.neg()).is_zero());
        assert!(FieldElement::zero().neg().is_zero());
    }

    #[test]
    fn test_ordering_is_big_endian_value_order() {
        let small = FieldElement::from_u64(5);
        let big = fe("0000000000000000000000000000000100000000000000000000000000000000");
        assert!(small < big);
        assert!(big > small);
    }

    #[test]
    fn test_operator_impls_match_methods() {
        let a = fe("deadbeefcafebabe123456789abcdef00f1e2d3c4b5a69788796a5b4c3d2e1f0");
        let b = fe("0123456789abcdeffedcba987654321000112233445566778899aabbccddeeff");
        assert_eq!(a + b, a.add(&b));
        assert_eq!(a - b, a.sub(&b));
        assert_eq!(a * b, a.mul(&b));
        assert_eq!(-a, a.neg());
    }
}
