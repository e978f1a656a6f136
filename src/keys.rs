//! Private and public keys, WIF import/export and P2PKH address derivation

use crate::constants::*;
use crate::ecdsa::{self, Signature};
use crate::error::{Result, SigningError};
use crate::hash::{base58check_decode, base58check_encode, hash160};
use crate::types::{Hash, Network};
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::SecretKey;
use std::fmt;

/// Private key: a scalar in [1, n-1], plus the network and compression flag
/// carried by its WIF encoding
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
    compressed: bool,
    network: Network,
}

impl PrivateKey {
    /// Construct from 32 big-endian bytes; zero and values >= n are rejected
    pub fn from_bytes(bytes: &[u8], network: Network, compressed: bool) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(SigningError::InvalidScalar(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let secret = SecretKey::from_slice(bytes).map_err(|_| {
            SigningError::InvalidScalar("zero or not below the curve order".to_string())
        })?;
        Ok(PrivateKey {
            secret,
            compressed,
            network,
        })
    }

    /// Fresh key from the operating system's secure random source
    pub fn generate(network: Network, compressed: bool) -> Result<Self> {
        let mut bytes = [0u8; 32];
        loop {
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|e| SigningError::Randomness(e.to_string()))?;
            // Out of range with probability ~2^-128; draw again
            if let Ok(secret) = SecretKey::from_slice(&bytes) {
                return Ok(PrivateKey {
                    secret,
                    compressed,
                    network,
                });
            }
        }
    }

    /// Decode a WIF string: base58check(version || secret [|| 0x01])
    pub fn from_wif(wif: &str) -> Result<Self> {
        let (version, payload) = base58check_decode(wif)?;
        let network = Network::from_wif_version(version).ok_or_else(|| {
            SigningError::InvalidEncoding(format!("unknown WIF version 0x{:02x}", version))
        })?;
        let compressed = match payload.len() {
            32 => false,
            33 if payload[32] == WIF_COMPRESSED_FLAG => true,
            33 => {
                return Err(SigningError::InvalidEncoding(format!(
                    "invalid WIF compression flag 0x{:02x}",
                    payload[32]
                )))
            }
            len => {
                return Err(SigningError::InvalidEncoding(format!(
                    "invalid WIF payload length: {}",
                    len
                )))
            }
        };
        Self::from_bytes(&payload[..32], network, compressed)
    }

    pub fn to_wif(&self) -> String {
        let mut payload = self.secret.secret_bytes().to_vec();
        if self.compressed {
            payload.push(WIF_COMPRESSED_FLAG);
        }
        base58check_encode(self.network.wif_version(), &payload)
    }

    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn public_key(&self) -> PublicKey {
        ecdsa::derive_public_key(self)
    }

    pub fn sign(&self, message_hash: &Hash) -> Signature {
        ecdsa::sign(message_hash, self)
    }

    /// P2PKH address of the derived public key on this key's network
    pub fn address(&self) -> String {
        self.public_key().address(self.network)
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("secret", &"<redacted>")
            .field("compressed", &self.compressed)
            .field("network", &self.network)
            .finish()
    }
}

/// Public key: a curve point plus the serialization form used for addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    point: secp256k1::PublicKey,
    compressed: bool,
}

impl PublicKey {
    pub(crate) fn from_point(point: secp256k1::PublicKey, compressed: bool) -> Self {
        PublicKey { point, compressed }
    }

    /// Parse a 33-byte compressed or 65-byte uncompressed SEC encoding. The
    /// point must lie on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let compressed = match bytes.len() {
            COMPRESSED_PUBLIC_KEY_SIZE => true,
            UNCOMPRESSED_PUBLIC_KEY_SIZE => false,
            len => {
                return Err(SigningError::InvalidEncoding(format!(
                    "public key must be 33 or 65 bytes, got {}",
                    len
                )))
            }
        };
        match bytes[0] {
            0x02 | 0x03 if compressed => {}
            0x04 if !compressed => {}
            prefix => {
                return Err(SigningError::InvalidEncoding(format!(
                    "invalid public key prefix 0x{:02x}",
                    prefix
                )))
            }
        }
        let point =
            secp256k1::PublicKey::from_slice(bytes).map_err(|_| SigningError::PointNotOnCurve)?;
        Ok(PublicKey { point, compressed })
    }

    pub fn with_compression(self, compressed: bool) -> Self {
        PublicKey { compressed, ..self }
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    /// Serialized form selected by the compression flag
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.point.serialize().to_vec()
        } else {
            self.point.serialize_uncompressed().to_vec()
        }
    }

    /// Affine (x, y) coordinates, big-endian
    pub fn coordinates(&self) -> ([u8; 32], [u8; 32]) {
        let uncompressed = self.point.serialize_uncompressed();
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&uncompressed[1..33]);
        y.copy_from_slice(&uncompressed[33..65]);
        (x, y)
    }

    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_bytes())
    }

    /// base58check(version || hash160(serialized key))
    pub fn address(&self, network: Network) -> String {
        base58check_encode(network.p2pkh_version(), &self.hash160())
    }

    pub fn verify(&self, message_hash: &Hash, signature: &Signature) -> bool {
        ecdsa::verify(message_hash, signature, self)
    }

    pub(crate) fn point(&self) -> &secp256k1::PublicKey {
        &self.point
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

/// Split a P2PKH address into its network and 20-byte key hash
pub fn address_to_key_hash(address: &str) -> Result<(Network, [u8; 20])> {
    let (version, payload) = base58check_decode(address)?;
    let network = Network::from_p2pkh_version(version).ok_or_else(|| {
        SigningError::InvalidEncoding(format!("unknown address version 0x{:02x}", version))
    })?;
    let key_hash: [u8; HASH160_SIZE] = payload.as_slice().try_into().map_err(|_| {
        SigningError::InvalidEncoding(format!(
            "address payload must be {} bytes, got {}",
            HASH160_SIZE,
            payload.len()
        ))
    })?;
    Ok((network, key_hash))
}
