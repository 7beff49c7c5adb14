//! Deterministic nonce generation per RFC 6979.
//!
//! The generator is the HMAC_DRBG construction from section 3.2, generic
//! over the underlying hash so the same state machine drives SHA-256 (the
//! standard instantiation) or any other 256-bit digest. Seeding folds in
//! the secret key and message hash; every rejected candidate steps the
//! state with a reseed, so retries never repeat a nonce.

use std::marker::PhantomData;

use hmac::digest::{consts::U32, core_api::BlockSizeUser, Digest, OutputSizeUser};
use hmac::{Mac, SimpleHmac};

/// HMAC over the chosen digest, keyed once and fed a list of parts.
fn hmac_chain<D>(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32]
where
    D: Digest + BlockSizeUser + OutputSizeUser<OutputSize = U32>,
{
    let mut mac =
        <SimpleHmac<D> as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// HMAC_DRBG state seeded from a secret key and message hash.
///
/// `K` is the rolling HMAC key and `V` the rolling value block; both are
/// 256 bits for the digests this crate instantiates.
pub struct NonceGenerator<D>
where
    D: Digest + BlockSizeUser + OutputSizeUser<OutputSize = U32>,
{
    k: [u8; 32],
    v: [u8; 32],
    _hash: PhantomData<D>,
}

impl<D> NonceGenerator<D>
where
    D: Digest + BlockSizeUser + OutputSizeUser<OutputSize = U32>,
{
    /// Seed the generator.
    ///
    /// Runs the two-round instantiation from RFC 6979 3.2 steps b-f:
    /// starting from `K = 0x00..`, `V = 0x01..`, each round mixes the
    /// secret key and message hash into `K` under a separator byte and
    /// refreshes `V`.
    ///
    /// # Arguments
    /// * `secret_key` - 32-byte big-endian secret scalar.
    /// * `message_hash` - 32-byte hash of the message being signed.
    pub fn new(secret_key: &[u8; 32], message_hash: &[u8; 32]) -> Self {
        let mut state = NonceGenerator {
            k: [0x00; 32],
            v: [0x01; 32],
            _hash: PhantomData,
        };
        state.k = hmac_chain::<D>(&state.k, &[&state.v, &[0x00], secret_key, message_hash]);
        state.v = hmac_chain::<D>(&state.k, &[&state.v]);
        state.k = hmac_chain::<D>(&state.k, &[&state.v, &[0x01], secret_key, message_hash]);
        state.v = hmac_chain::<D>(&state.k, &[&state.v]);
        state
    }

    /// Produce the next 32-byte nonce candidate.
    ///
    /// One `V = HMAC(K, V)` step fills the full 256 bits, so no
    /// concatenation loop is needed for this curve size.
    pub fn next_nonce(&mut self) -> [u8; 32] {
        self.v = hmac_chain::<D>(&self.k, &[&self.v]);
        self.v
    }

    /// Step the state after a rejected candidate, per RFC 6979 3.2 h.3.
    ///
    /// Must be called before asking for another nonce, otherwise
    /// `next_nonce` would return the same bytes forever.
    pub fn reseed(&mut self) {
        self.k = hmac_chain::<D>(&self.k, &[&self.v, &[0x00]]);
        self.v = hmac_chain::<D>(&self.k, &[&self.v]);
    }
}
