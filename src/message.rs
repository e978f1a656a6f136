//! Bitcoin signed messages
//!
//! The signed digest is
//! `dSHA256(compact_size(24) || "Bitcoin Signed Message:\n" || compact_size(len) || message)`
//! and the signature travels as base64 of a header byte (27 + recovery id,
//! plus 4 when the signer's key is compressed) followed by r || s.

use crate::constants::*;
use crate::ecdsa::{self, Signature};
use crate::encoding::write_compact_size;
use crate::error::{Result, SigningError};
use crate::hash::double_sha256;
use crate::keys::{address_to_key_hash, PrivateKey, PublicKey};
use crate::types::Hash;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::debug;

pub fn message_hash(message: &[u8]) -> Hash {
    let mut data = Vec::with_capacity(MESSAGE_MAGIC.len() + message.len() + 10);
    write_compact_size(MESSAGE_MAGIC.len() as u64, &mut data);
    data.extend_from_slice(MESSAGE_MAGIC);
    write_compact_size(message.len() as u64, &mut data);
    data.extend_from_slice(message);
    double_sha256(&data)
}

pub fn sign_message(private_key: &PrivateKey, message: &[u8]) -> String {
    let signature = ecdsa::sign(&message_hash(message), private_key);
    // sign() always attaches a recovery id
    let recovery_id = signature.recovery_id().unwrap_or_default();
    let mut header = MESSAGE_HEADER_BASE + recovery_id;
    if private_key.compressed() {
        header += MESSAGE_HEADER_COMPRESSED_OFFSET;
    }
    let mut encoded = Vec::with_capacity(1 + COMPACT_SIGNATURE_SIZE);
    encoded.push(header);
    encoded.extend_from_slice(&signature.to_compact());
    BASE64.encode(encoded)
}

/// Split a base64 message signature into its signature (with recovery id)
/// and the compression flag of the signing key
pub fn decode_message_signature(signature_b64: &str) -> Result<(Signature, bool)> {
    let decoded = BASE64.decode(signature_b64)?;
    if decoded.len() != 1 + COMPACT_SIGNATURE_SIZE {
        return Err(SigningError::InvalidEncoding(format!(
            "message signature must be {} bytes, got {}",
            1 + COMPACT_SIGNATURE_SIZE,
            decoded.len()
        )));
    }
    let header = decoded[0];
    let max_header = MESSAGE_HEADER_BASE + MESSAGE_HEADER_COMPRESSED_OFFSET + 3;
    if !(MESSAGE_HEADER_BASE..=max_header).contains(&header) {
        return Err(SigningError::InvalidEncoding(format!(
            "invalid message signature header {}",
            header
        )));
    }
    let offset = header - MESSAGE_HEADER_BASE;
    let compressed = offset >= MESSAGE_HEADER_COMPRESSED_OFFSET;
    let signature = Signature::from_compact_recoverable(&decoded[1..], offset & 0x03)?;
    Ok((signature, compressed))
}

/// Recover the key that produced `signature_b64` over `message` and check
/// that it verifies
pub fn recover_message_signer(message: &[u8], signature_b64: &str) -> Result<PublicKey> {
    let (signature, compressed) = decode_message_signature(signature_b64)?;
    let hash = message_hash(message);
    let public_key = ecdsa::recover_public_key(&hash, &signature)?.with_compression(compressed);
    if !public_key.verify(&hash, &signature) {
        return Err(SigningError::VerificationFailed);
    }
    Ok(public_key)
}

/// True when `signature_b64` over `message` was made by the key behind `address`
///
/// A signature that recovers to some other key (a different message, a
/// different address) gives `Ok(false)`. A signature from which no key can be
/// recovered gives `Err(RecoveryFailed)`. Input is taken exactly as given:
/// surrounding whitespace is an encoding error.
pub fn verify_message(address: &str, message: &[u8], signature_b64: &str) -> Result<bool> {
    let (network, _) = address_to_key_hash(address)?;
    let signer = recover_message_signer(message, signature_b64)?;
    let matches = signer.address(network) == address;
    debug!("Message signature recovered {}, expected {}", signer.address(network), address);
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_vectors::*;

    #[test]
    fn test_message_hash_prefix() {
        // prefix byte 0x18 is the compact size of the magic string
        assert_eq!(MESSAGE_MAGIC.len(), 0x18);
        let mut expected = vec![0x18];
        expected.extend_from_slice(b"Bitcoin Signed Message:\n");
        expected.push(3);
        expected.extend_from_slice(b"abc");
        assert_eq!(message_hash(b"abc"), double_sha256(&expected));
    }

    #[test]
    fn test_sign_message_vectors() {
        let key = PrivateKey::from_wif(KEY0_WIF).unwrap();
        for (message, expected) in MESSAGE_VECTORS {
            assert_eq!(sign_message(&key, message.as_bytes()), expected);
        }
    }

    #[test]
    fn test_sign_message_compressed_header() {
        let key = PrivateKey::from_wif(KEY0_COMPRESSED_WIF).unwrap();
        let signature = sign_message(&key, b"Hello, World!!");
        assert_eq!(signature, COMPRESSED_MESSAGE_SIGNATURE);
        let (_, compressed) = decode_message_signature(&signature).unwrap();
        assert!(compressed);
    }

    #[test]
    fn test_recover_message_signer() {
        let key = PrivateKey::from_wif(KEY0_WIF).unwrap();
        for (message, signature) in MESSAGE_VECTORS {
            let signer = recover_message_signer(message.as_bytes(), signature).unwrap();
            assert_eq!(signer, key.public_key());
            assert_eq!(signer.address(key.network()), KEY0_ADDRESS);
        }
    }

    #[test]
    fn test_verify_message() {
        let (message, signature) = MESSAGE_VECTORS[0];
        assert!(verify_message(KEY0_ADDRESS, message.as_bytes(), signature).unwrap());
        assert!(!verify_message(KEY1_ADDRESS, message.as_bytes(), signature).unwrap());
        assert!(
            verify_message(KEY0_COMPRESSED_ADDRESS, message.as_bytes(), COMPRESSED_MESSAGE_SIGNATURE)
                .unwrap()
        );
        // the compressed signature does not vouch for the uncompressed address
        assert!(
            !verify_message(KEY0_ADDRESS, message.as_bytes(), COMPRESSED_MESSAGE_SIGNATURE)
                .unwrap()
        );
    }

    #[test]
    fn test_verify_message_other_text() {
        let (_, signature) = MESSAGE_VECTORS[0];
        for message in [&b"Hello, World!"[..], b"", b"Hello, World!!!"] {
            assert!(matches!(
                verify_message(KEY0_ADDRESS, message, signature),
                Ok(false)
            ));
        }
    }

    #[test]
    fn test_verify_message_unrecoverable_signature() {
        let (message, signature) = MESSAGE_VECTORS[0];
        let mut raw = BASE64.decode(signature).unwrap();
        // recovery id 2 needs r < p - n, which this r is not
        raw[0] = MESSAGE_HEADER_BASE + 2;
        let tampered = BASE64.encode(&raw);
        assert!(matches!(
            recover_message_signer(message.as_bytes(), &tampered),
            Err(SigningError::RecoveryFailed(_))
        ));
        assert!(matches!(
            verify_message(KEY0_ADDRESS, message.as_bytes(), &tampered),
            Err(SigningError::RecoveryFailed(_))
        ));
    }

    #[test]
    fn test_surrounding_whitespace_is_rejected() {
        let (message, signature) = MESSAGE_VECTORS[0];
        for padded in [format!(" {}", signature), format!("{}\n", signature)] {
            assert!(matches!(
                decode_message_signature(&padded),
                Err(SigningError::InvalidEncoding(_))
            ));
            assert!(verify_message(KEY0_ADDRESS, message.as_bytes(), &padded).is_err());
        }
    }

    #[test]
    fn test_decode_message_signature_errors() {
        assert!(matches!(
            decode_message_signature("not base64!"),
            Err(SigningError::InvalidEncoding(_))
        ));
        assert!(matches!(
            decode_message_signature(&BASE64.encode([27u8; 10])),
            Err(SigningError::InvalidEncoding(_))
        ));
        let mut bad_header = BASE64.decode(MESSAGE_VECTORS[0].1).unwrap();
        bad_header[0] = 26;
        assert!(matches!(
            decode_message_signature(&BASE64.encode(&bad_header)),
            Err(SigningError::InvalidEncoding(_))
        ));
        bad_header[0] = 35;
        assert!(decode_message_signature(&BASE64.encode(&bad_header)).is_err());
    }
}
