//! ECDSA over secp256k1.
//!
//! This module exposes standalone sign, verify and recover functions that
//! operate on raw 32-byte hashes and keys without requiring the full
//! PrivateKey/PublicKey abstractions.

use sha2::Sha256;

use crate::ec::{PublicKey, Signature};
use crate::field::FieldElement;
use crate::point::Point;
use crate::rfc6979::NonceGenerator;
use crate::scalar::ScalarElement;
use crate::PrimitivesError;

/// Upper bound on nonce candidates before signing gives up. RFC 6979
/// reaches a usable nonce on the first draw for essentially every input,
/// so hitting this bound means the nonce source is broken.
const MAX_NONCE_ATTEMPTS: usize = 1024;

/// Sign a 32-byte message hash with a deterministic RFC 6979 nonce.
///
/// The nonce stream is HMAC-SHA256 DRBG seeded from the key and hash, so
/// signing the same input twice yields the identical signature. The
/// returned signature is always low-S, with the recovery id folded into
/// `v` as 27 or 28.
///
/// # Arguments
/// * `message_hash` - 32-byte hash of the message to sign.
/// * `secret_key` - 32-byte big-endian secret scalar in `[1, n-1]`.
///
/// # Returns
/// The recoverable signature, or an error for an out-of-range key.
pub fn sign(message_hash: &[u8; 32], secret_key: &[u8; 32]) -> Result<Signature, PrimitivesError> {
    let mut drbg = NonceGenerator::<Sha256>::new(secret_key, message_hash);
    let mut first = true;
    sign_with_nonce_source(message_hash, secret_key, move || {
        if first {
            first = false;
        } else {
            drbg.reseed();
        }
        drbg.next_nonce()
    })
}

/// Signing loop over an arbitrary nonce source.
///
/// Candidates outside `[1, n-1]` and attempts that produce a zero `r` or
/// `s` are rejected, pulling the next candidate, up to the attempt bound.
fn sign_with_nonce_source<F>(
    message_hash: &[u8; 32],
    secret_key: &[u8; 32],
    mut nonce_source: F,
) -> Result<Signature, PrimitivesError>
where
    F: FnMut() -> [u8; 32],
{
    let d = parse_secret_key(secret_key)?;
    let e = ScalarElement::from_bytes32_reduced(message_hash);
    for _ in 0..MAX_NONCE_ATTEMPTS {
        let candidate = nonce_source();
        let k = match ScalarElement::from_bytes32(&candidate) {
            Ok(k) if !k.is_zero() => k,
            _ => continue,
        };
        if let Some(signature) = sign_attempt(&k, &e, &d) {
            return Ok(signature);
        }
    }
    Err(PrimitivesError::NonceExhaustion(MAX_NONCE_ATTEMPTS))
}

/// One signing attempt with a fixed nonce.
///
/// Returns `None` when the attempt must be retried: `k*G` at infinity, or
/// a zero `r` or `s`. On success the signature is canonicalized to low-S,
/// flipping the recovery parity bit alongside the negation.
fn sign_attempt(k: &ScalarElement, e: &ScalarElement, d: &ScalarElement) -> Option<Signature> {
    let r_point = Point::generator().scalar_mul(k);
    if r_point.is_infinity() {
        return None;
    }
    let x_bytes = r_point.x().to_bytes32();
    let r = ScalarElement::from_bytes32_reduced(&x_bytes);
    if r.is_zero() {
        return None;
    }
    let k_inv = k.invert().ok()?;
    let s = k_inv.mul(&e.add(&r.mul(d)));
    if s.is_zero() {
        return None;
    }
    let mut recovery = if r_point.y().is_even() { 0u8 } else { 1u8 };
    let s = if s.is_high() {
        recovery ^= 1;
        s.neg()
    } else {
        s
    };
    // The second recovery bit records an x-coordinate that wrapped past n,
    // a roughly 1 in 2^128 event.
    if ScalarElement::exceeds_order(&x_bytes) {
        recovery |= 2;
    }
    Some(Signature::from_parts(
        r.to_bytes32(),
        s.to_bytes32(),
        27 + recovery,
    ))
}

/// Verify a signature against a serialized public key.
///
/// Accepts both low-S and high-S signatures; canonicality is recovery's
/// concern, not verification's.
///
/// # Arguments
/// * `public_key` - Compressed (33), uncompressed (65) or raw (64) key bytes.
/// * `message_hash` - 32-byte hash of the signed message.
/// * `r` - Signature r component, 32 bytes big-endian.
/// * `s` - Signature s component, 32 bytes big-endian.
///
/// # Returns
/// `Ok(true)` when the signature matches, `Ok(false)` when it does not,
/// or an error for malformed inputs.
pub fn verify(
    public_key: &[u8],
    message_hash: &[u8; 32],
    r: &[u8; 32],
    s: &[u8; 32],
) -> Result<bool, PrimitivesError> {
    let public = PublicKey::from_bytes(public_key)?;
    let r_scalar = ScalarElement::from_bytes32(r)?;
    let s_scalar = ScalarElement::from_bytes32(s)?;
    if r_scalar.is_zero() || s_scalar.is_zero() {
        return Err(PrimitivesError::InvalidScalar(
            "signature components must be non-zero".to_string(),
        ));
    }
    let e = ScalarElement::from_bytes32_reduced(message_hash);
    let w = s_scalar.invert()?;
    let u1 = e.mul(&w);
    let u2 = r_scalar.mul(&w);
    let candidate = Point::generator()
        .scalar_mul(&u1)
        .add(&public.point().scalar_mul(&u2));
    if candidate.is_infinity() {
        return Ok(false);
    }
    let candidate_r = ScalarElement::from_bytes32_reduced(&candidate.x().to_bytes32());
    Ok(candidate_r == r_scalar)
}

/// Recover the signing public key from a recoverable signature.
///
/// Only canonical signatures recover: `s` must be in the low half of the
/// order and `v` must be 27 or 28. The all-zero message hash is refused
/// outright since no honest signer produces it.
///
/// # Arguments
/// * `message_hash` - 32-byte hash of the signed message.
/// * `r` - Signature r component, 32 bytes big-endian.
/// * `s` - Signature s component, 32 bytes big-endian.
/// * `v` - Recovery id, 27 (even y) or 28 (odd y).
///
/// # Returns
/// The unique public key that verifies this signature.
pub fn recover(
    message_hash: &[u8; 32],
    r: &[u8; 32],
    s: &[u8; 32],
    v: u8,
) -> Result<PublicKey, PrimitivesError> {
    if v != 27 && v != 28 {
        return Err(PrimitivesError::InvalidRecoveryId(v));
    }
    let r_scalar = ScalarElement::from_bytes32(r)?;
    let s_scalar = ScalarElement::from_bytes32(s)?;
    if r_scalar.is_zero() || s_scalar.is_zero() {
        return Err(PrimitivesError::InvalidScalar(
            "signature components must be non-zero".to_string(),
        ));
    }
    if s_scalar.is_high() {
        return Err(PrimitivesError::NonCanonicalSignature);
    }
    if message_hash.iter().all(|&b| b == 0) {
        return Err(PrimitivesError::AllZeroMessage);
    }
    let x = FieldElement::from_bytes32(r);
    if x.is_zero() {
        return Err(PrimitivesError::InvalidScalar(
            "r maps to a zero x-coordinate".to_string(),
        ));
    }
    let r_point = Point::from_x(x, (v - 27) & 1 == 1)?;
    let e = ScalarElement::from_bytes32_reduced(message_hash);
    let r_inv = r_scalar.invert()?;
    // Q = r^-1 * (s*R - e*G)
    let q = r_point
        .scalar_mul(&s_scalar)
        .add(&Point::generator().scalar_mul(&e).neg())
        .scalar_mul(&r_inv);
    if q.is_infinity() || !q.is_on_curve() {
        return Err(PrimitivesError::PointNotOnCurve);
    }
    PublicKey::from_point(q)
}

fn parse_secret_key(secret_key: &[u8; 32]) -> Result<ScalarElement, PrimitivesError> {
    let d = ScalarElement::from_bytes32(secret_key)?;
    if d.is_zero() {
        return Err(PrimitivesError::InvalidScalar(
            "secret key is zero".to_string(),
        ));
    }
    Ok(d)
}
