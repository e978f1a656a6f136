//! Hash primitives and base58check encoding

use crate::constants::CHECKSUM_SIZE;
use crate::error::{Result, SigningError};
use crate::types::Hash;
use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> Hash {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// SHA256(SHA256(x))
pub fn double_sha256(data: &[u8]) -> Hash {
    sha256d::Hash::hash(data).into_inner()
}

/// RIPEMD160(SHA256(x))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha256_hash = Sha256::digest(data);
    let ripemd160_hash = Ripemd160::digest(sha256_hash);
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripemd160_hash);
    out
}

/// First four bytes of the double SHA-256 of `data`
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&double_sha256(data)[..CHECKSUM_SIZE]);
    out
}

/// base58(version || payload || checksum(version || payload))
pub fn base58check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    bs58::encode(data).with_check().into_string()
}

/// Inverse of [`base58check_encode`]; returns the version byte and payload
pub fn base58check_decode(encoded: &str) -> Result<(u8, Vec<u8>)> {
    let mut data = bs58::decode(encoded).with_check(None).into_vec()?;
    if data.is_empty() {
        return Err(SigningError::Base58("missing version byte".to_string()));
    }
    let payload = data.split_off(1);
    Ok((data[0], payload))
}
