/// Ethereum-style secp256k1 primitives: field and curve arithmetic with
/// recoverable ECDSA.
///
/// This crate provides the foundational building blocks for signing:
/// - Hash functions (SHA-256, Keccak-256, HMAC)
/// - Base field arithmetic (fast limb backend plus a big-integer mirror)
/// - Scalar arithmetic mod the curve order
/// - Affine curve points and scalar multiplication
/// - RFC 6979 deterministic nonce generation
/// - ECDSA signing, verification, and public key recovery
/// - Key and signature types with Ethereum address derivation

pub mod hash;
pub mod field;
pub mod scalar;
pub mod point;
pub mod rfc6979;
pub mod ec;
pub mod ecdsa;

mod error;
pub use error::PrimitivesError;
