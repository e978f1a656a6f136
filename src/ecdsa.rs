//! ECDSA over secp256k1: key derivation, signing, verification and public key recovery
//!
//! Scalar and point arithmetic is delegated to libsecp256k1, whose fixed-width
//! field and scalar types run in constant time with respect to secret scalars.
//! Nonces are derived deterministically (RFC 6979). A nonce that yields r = 0
//! or s = 0 is skipped inside the library and never reaches the caller.

use crate::error::{Result, SigningError};
use crate::keys::{PrivateKey, PublicKey};
use crate::types::Hash;
use secp256k1::constants::CURVE_ORDER;
use secp256k1::ecdsa::{self, RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1};

/// ECDSA signature (r, s) with s in the lower half of the curve order,
/// optionally tagged with the recovery indicator produced at signing time
///
/// Equality compares (r, s) only. The recovery indicator is not part of the
/// DER or compact encodings, so a parsed signature equals the one it was
/// encoded from.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    inner: ecdsa::Signature,
    recovery_id: Option<u8>,
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Signature {}

impl Signature {
    /// Parse a 64-byte r || s signature
    pub fn from_compact(bytes: &[u8]) -> Result<Self> {
        Self::canonical(compact_array(bytes)?, None)
    }

    /// Parse a 64-byte r || s signature carrying a recovery indicator (0-3)
    pub fn from_compact_recoverable(bytes: &[u8], recovery_id: u8) -> Result<Self> {
        check_recovery_id(recovery_id)?;
        Self::canonical(compact_array(bytes)?, Some(recovery_id))
    }

    /// Parse a strict DER signature (no trailing sighash byte)
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let parsed = ecdsa::Signature::from_der(bytes)
            .map_err(|e| SigningError::InvalidEncoding(format!("DER signature: {}", e)))?;
        Self::canonical(parsed.serialize_compact(), None)
    }

    /// Minimal DER encoding; integers with the high bit set get a leading 0x00
    pub fn to_der(&self) -> Vec<u8> {
        self.inner.serialize_der().to_vec()
    }

    pub fn to_compact(&self) -> [u8; 64] {
        self.inner.serialize_compact()
    }

    pub fn r(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        r.copy_from_slice(&self.to_compact()[..32]);
        r
    }

    pub fn s(&self) -> [u8; 32] {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.to_compact()[32..]);
        s
    }

    pub fn recovery_id(&self) -> Option<u8> {
        self.recovery_id
    }

    pub fn with_recovery_id(self, recovery_id: u8) -> Result<Self> {
        check_recovery_id(recovery_id)?;
        Ok(Signature {
            recovery_id: Some(recovery_id),
            ..self
        })
    }

    /// Range-check r and s, then replace s by n - s when s > n/2. Negating s
    /// negates the nonce point, so the parity bit of the recovery id flips with it.
    fn canonical(compact: [u8; 64], recovery_id: Option<u8>) -> Result<Self> {
        check_scalar_range("r", &compact[..32])?;
        check_scalar_range("s", &compact[32..])?;
        let mut inner = ecdsa::Signature::from_compact(&compact)
            .map_err(|e| SigningError::SignatureOutOfRange(e.to_string()))?;
        inner.normalize_s();
        let flipped = inner.serialize_compact() != compact;
        Ok(Signature {
            inner,
            recovery_id: recovery_id.map(|id| if flipped { id ^ 1 } else { id }),
        })
    }

    pub(crate) fn inner(&self) -> &ecdsa::Signature {
        &self.inner
    }
}

fn compact_array(bytes: &[u8]) -> Result<[u8; 64]> {
    bytes.try_into().map_err(|_| {
        SigningError::InvalidEncoding(format!(
            "compact signature must be 64 bytes, got {}",
            bytes.len()
        ))
    })
}

fn check_recovery_id(recovery_id: u8) -> Result<()> {
    if recovery_id > 3 {
        return Err(SigningError::InvalidEncoding(format!(
            "recovery id {} not in 0..=3",
            recovery_id
        )));
    }
    Ok(())
}

/// r and s must lie in (0, n); big-endian byte order makes the slice comparison numeric
fn check_scalar_range(name: &str, value: &[u8]) -> Result<()> {
    if value.iter().all(|b| *b == 0) {
        return Err(SigningError::SignatureOutOfRange(format!("{} is zero", name)));
    }
    if value >= &CURVE_ORDER[..] {
        return Err(SigningError::SignatureOutOfRange(format!(
            "{} is not below the curve order",
            name
        )));
    }
    Ok(())
}

/// DerivePublicKey: d → d·G
pub fn derive_public_key(private_key: &PrivateKey) -> PublicKey {
    let secp = Secp256k1::signing_only();
    let point = secp256k1::PublicKey::from_secret_key(&secp, private_key.secret_key());
    PublicKey::from_point(point, private_key.compressed())
}

/// Sign a 32-byte message hash. The result is low-s and carries the recovery
/// indicator (bit 0: parity of R.y, bit 1: R.x overflowed the curve order).
pub fn sign(message_hash: &Hash, private_key: &PrivateKey) -> Signature {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(*message_hash);
    let recoverable = secp.sign_ecdsa_recoverable(&message, private_key.secret_key());
    let (recovery_id, _) = recoverable.serialize_compact();
    Signature {
        inner: recoverable.to_standard(),
        recovery_id: Some(recovery_id.to_i32() as u8),
    }
}

/// Standard ECDSA verification equation against `public_key`
pub fn verify(message_hash: &Hash, signature: &Signature, public_key: &PublicKey) -> bool {
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*message_hash);
    secp.verify_ecdsa(&message, signature.inner(), public_key.point())
        .is_ok()
}

/// Reconstruct the signer's public key from the hash and a signature carrying
/// its recovery indicator. The returned key serializes uncompressed; use
/// [`PublicKey::with_compression`] to select the compressed form.
pub fn recover_public_key(message_hash: &Hash, signature: &Signature) -> Result<PublicKey> {
    let id = signature.recovery_id.ok_or_else(|| {
        SigningError::RecoveryFailed("signature carries no recovery indicator".to_string())
    })?;
    let recovery_id = RecoveryId::from_i32(id as i32)
        .map_err(|e| SigningError::RecoveryFailed(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(&signature.to_compact(), recovery_id)
        .map_err(|e| SigningError::RecoveryFailed(e.to_string()))?;

    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*message_hash);
    let point = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| SigningError::RecoveryFailed(e.to_string()))?;
    Ok(PublicKey::from_point(point, false))
}
