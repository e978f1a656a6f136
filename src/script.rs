//! Script representation: opcodes, data pushes and the standard P2PKH patterns
//!
//! A [`Script`] keeps its serialized bytes so that scripts read from the wire
//! re-serialize byte for byte; [`Script::elements`] parses them on demand.

use crate::constants::*;
use crate::encoding::Reader;
use crate::error::{Result, SigningError};
use crate::keys::address_to_key_hash;
use crate::types::ByteString;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;

/// Non-push operations. Only the first five are executable; anything else is
/// carried as `Other` so foreign scripts still parse and re-serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Dup,
    Hash160,
    Equal,
    EqualVerify,
    CheckSig,
    Other(u8),
}

impl Opcode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            OP_DUP => Opcode::Dup,
            OP_HASH160 => Opcode::Hash160,
            OP_EQUAL => Opcode::Equal,
            OP_EQUALVERIFY => Opcode::EqualVerify,
            OP_CHECKSIG => Opcode::CheckSig,
            other => Opcode::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::Dup => OP_DUP,
            Opcode::Hash160 => OP_HASH160,
            Opcode::Equal => OP_EQUAL,
            Opcode::EqualVerify => OP_EQUALVERIFY,
            Opcode::CheckSig => OP_CHECKSIG,
            Opcode::Other(byte) => byte,
        }
    }

    pub fn name(self) -> String {
        match self {
            Opcode::Dup => "OP_DUP".to_string(),
            Opcode::Hash160 => "OP_HASH160".to_string(),
            Opcode::Equal => "OP_EQUAL".to_string(),
            Opcode::EqualVerify => "OP_EQUALVERIFY".to_string(),
            Opcode::CheckSig => "OP_CHECKSIG".to_string(),
            Opcode::Other(byte) => format!("OP_UNKNOWN_0x{:02x}", byte),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptElement {
    Op(Opcode),
    Push(ByteString),
}

/// Standard shapes recognised by [`Script::classify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptPattern {
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    PayToPubkeyHash([u8; 20]),
    /// `<signature || sighash byte> <public key>`
    SignatureAndPubkey {
        signature: ByteString,
        public_key: ByteString,
    },
    Empty,
    NonStandard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script(ByteString);

impl Script {
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Wrap raw script bytes. No validation happens here; malformed pushes
    /// surface from [`Script::elements`].
    pub fn from_bytes(bytes: ByteString) -> Self {
        Script(bytes)
    }

    /// Wrap `bytes` after checking that every push is complete
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let script = Script(bytes.to_vec());
        script.elements()?;
        Ok(script)
    }

    pub fn from_elements(elements: &[ScriptElement]) -> Self {
        let mut bytes = Vec::new();
        for element in elements {
            match element {
                ScriptElement::Op(op) => bytes.push(op.to_byte()),
                ScriptElement::Push(data) => write_push(data, &mut bytes),
            }
        }
        Script(bytes)
    }

    /// BuildP2PKH: `OP_DUP OP_HASH160 <key_hash> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn build_p2pkh(key_hash: &[u8; 20]) -> Self {
        Self::from_elements(&[
            ScriptElement::Op(Opcode::Dup),
            ScriptElement::Op(Opcode::Hash160),
            ScriptElement::Push(key_hash.to_vec()),
            ScriptElement::Op(Opcode::EqualVerify),
            ScriptElement::Op(Opcode::CheckSig),
        ])
    }

    pub fn build_p2pkh_for_address(address: &str) -> Result<Self> {
        let (_, key_hash) = address_to_key_hash(address)?;
        Ok(Self::build_p2pkh(&key_hash))
    }

    /// Unlocking script `<signature || sighash byte> <public key>`
    pub fn build_signature_and_pubkey(signature: &[u8], public_key: &[u8]) -> Self {
        Self::from_elements(&[
            ScriptElement::Push(signature.to_vec()),
            ScriptElement::Push(public_key.to_vec()),
        ])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse into opcodes and pushes
    pub fn elements(&self) -> Result<Vec<ScriptElement>> {
        let mut reader = Reader::new(&self.0);
        let mut elements = Vec::new();
        while !reader.is_empty() {
            let opcode = reader.read_u8()?;
            let push_len = match opcode {
                OP_0 => Some(0),
                0x01..=0x4b => Some(opcode as usize),
                OP_PUSHDATA1 => Some(reader.read_u8()? as usize),
                OP_PUSHDATA2 => Some(reader.read_u16_le()? as usize),
                OP_PUSHDATA4 => Some(reader.read_u32_le()? as usize),
                _ => None,
            };
            let element = match push_len {
                Some(len) => {
                    let data = reader.read_bytes(len).map_err(|_| {
                        SigningError::ScriptShape(format!(
                            "push of {} bytes runs past end of script",
                            len
                        ))
                    })?;
                    ScriptElement::Push(data.to_vec())
                }
                None => ScriptElement::Op(Opcode::from_byte(opcode)),
            };
            elements.push(element);
        }
        Ok(elements)
    }

    pub fn is_push_only(&self) -> bool {
        match self.elements() {
            Ok(elements) => elements
                .iter()
                .all(|e| matches!(e, ScriptElement::Push(_))),
            Err(_) => false,
        }
    }

    pub fn classify(&self) -> ScriptPattern {
        if self.is_empty() {
            return ScriptPattern::Empty;
        }
        let elements = match self.elements() {
            Ok(elements) => elements,
            Err(_) => return ScriptPattern::NonStandard,
        };
        match elements.as_slice() {
            [ScriptElement::Op(Opcode::Dup), ScriptElement::Op(Opcode::Hash160), ScriptElement::Push(hash), ScriptElement::Op(Opcode::EqualVerify), ScriptElement::Op(Opcode::CheckSig)]
                if hash.len() == HASH160_SIZE =>
            {
                let mut key_hash = [0u8; 20];
                key_hash.copy_from_slice(hash);
                ScriptPattern::PayToPubkeyHash(key_hash)
            }
            [ScriptElement::Push(signature), ScriptElement::Push(public_key)]
                if !signature.is_empty()
                    && matches!(
                        public_key.len(),
                        COMPRESSED_PUBLIC_KEY_SIZE | UNCOMPRESSED_PUBLIC_KEY_SIZE
                    ) =>
            {
                ScriptPattern::SignatureAndPubkey {
                    signature: signature.clone(),
                    public_key: public_key.clone(),
                }
            }
            _ => ScriptPattern::NonStandard,
        }
    }

    /// Key hash of a P2PKH locking script
    pub fn p2pkh_key_hash(&self) -> Option<[u8; 20]> {
        match self.classify() {
            ScriptPattern::PayToPubkeyHash(key_hash) => Some(key_hash),
            _ => None,
        }
    }
}

impl From<ByteString> for Script {
    fn from(bytes: ByteString) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements = match self.elements() {
            Ok(elements) => elements,
            Err(_) => return write!(f, "<malformed {}>", hex::encode(&self.0)),
        };
        let rendered: Vec<String> = elements
            .iter()
            .map(|element| match element {
                ScriptElement::Op(op) => op.name(),
                ScriptElement::Push(data) if data.is_empty() => "OP_0".to_string(),
                ScriptElement::Push(data) => hex::encode(data),
            })
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// Shortest push encoding for `data`
fn write_push(data: &[u8], out: &mut Vec<u8>) {
    let len = data.len();
    if len < OP_PUSHDATA1 as usize {
        out.push(len as u8);
    } else if len <= 0xff {
        out.push(OP_PUSHDATA1);
        out.push(len as u8);
    } else if len <= 0xffff {
        out.push(OP_PUSHDATA2);
        out.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        out.push(OP_PUSHDATA4);
        out.extend_from_slice(&(len as u32).to_le_bytes());
    }
    out.extend_from_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_vectors::*;

    #[test]
    fn test_build_p2pkh_bytes() {
        let key_hash: [u8; 20] = hex::decode(KEY1_HASH160).unwrap().try_into().unwrap();
        let script = Script::build_p2pkh(&key_hash);
        assert_eq!(
            hex::encode(script.as_bytes()),
            format!("76a914{}88ac", KEY1_HASH160)
        );
    }

    #[test]
    fn test_build_p2pkh_five_elements() {
        for fill in [0x00u8, 0x4c, 0xab, 0xff] {
            let key_hash = [fill; 20];
            let elements = Script::build_p2pkh(&key_hash).elements().unwrap();
            assert_eq!(
                elements,
                vec![
                    ScriptElement::Op(Opcode::Dup),
                    ScriptElement::Op(Opcode::Hash160),
                    ScriptElement::Push(key_hash.to_vec()),
                    ScriptElement::Op(Opcode::EqualVerify),
                    ScriptElement::Op(Opcode::CheckSig),
                ]
            );
        }
    }

    #[test]
    fn test_build_p2pkh_for_address() {
        let script = Script::build_p2pkh_for_address(KEY1_ADDRESS).unwrap();
        assert_eq!(
            hex::encode(script.p2pkh_key_hash().unwrap()),
            KEY1_HASH160
        );
        assert!(Script::build_p2pkh_for_address("not-an-address").is_err());
    }

    #[test]
    fn test_push_encodings() {
        let cases: [(usize, &[u8]); 5] = [
            (0, &[OP_0]),
            (0x4b, &[0x4b]),
            (0x4c, &[OP_PUSHDATA1, 0x4c]),
            (0x100, &[OP_PUSHDATA2, 0x00, 0x01]),
            (0x10000, &[OP_PUSHDATA4, 0x00, 0x00, 0x01, 0x00]),
        ];
        for (len, prefix) in cases {
            let data = vec![0x5a; len];
            let script = Script::from_elements(&[ScriptElement::Push(data.clone())]);
            assert_eq!(&script.as_bytes()[..prefix.len()], prefix);
            assert_eq!(script.len(), prefix.len() + len);
            assert_eq!(script.elements().unwrap(), vec![ScriptElement::Push(data)]);
        }
    }

    #[test]
    fn test_non_minimal_push_preserved() {
        // PUSHDATA1 for 3 bytes is not minimal but must survive unchanged
        let bytes = vec![OP_PUSHDATA1, 0x03, 0x01, 0x02, 0x03];
        let script = Script::from_bytes(bytes.clone());
        assert_eq!(
            script.elements().unwrap(),
            vec![ScriptElement::Push(vec![1, 2, 3])]
        );
        assert_eq!(script.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_truncated_push() {
        let script = Script::from_bytes(vec![0x14, 0x00, 0x01]);
        assert!(matches!(
            script.elements(),
            Err(SigningError::ScriptShape(_))
        ));
        assert!(Script::parse(&[0x14, 0x00, 0x01]).is_err());
        assert!(Script::parse(&[0x02, 0x00, 0x01, OP_DUP]).is_ok());
        let script = Script::from_bytes(vec![OP_PUSHDATA2, 0x01]);
        assert!(matches!(
            script.elements(),
            Err(SigningError::Truncated { .. })
        ));
        assert!(!script.is_push_only());
        assert_eq!(script.classify(), ScriptPattern::NonStandard);
    }

    #[test]
    fn test_classify() {
        assert_eq!(Script::new().classify(), ScriptPattern::Empty);

        let key_hash = [0x42; 20];
        assert_eq!(
            Script::build_p2pkh(&key_hash).classify(),
            ScriptPattern::PayToPubkeyHash(key_hash)
        );

        let unlocking = Script::build_signature_and_pubkey(&[0x30; 71], &[0x02; 33]);
        assert!(unlocking.is_push_only());
        assert_eq!(
            unlocking.classify(),
            ScriptPattern::SignatureAndPubkey {
                signature: vec![0x30; 71],
                public_key: vec![0x02; 33],
            }
        );

        let odd = Script::from_bytes(vec![0x51, 0x51, OP_EQUAL]);
        assert_eq!(odd.classify(), ScriptPattern::NonStandard);
        assert!(!odd.is_push_only());
    }

    #[test]
    fn test_unknown_opcode_round_trip() {
        let bytes = vec![0x51, OP_DUP, 0xff];
        let script = Script::from_bytes(bytes.clone());
        let elements = script.elements().unwrap();
        assert_eq!(elements[0], ScriptElement::Op(Opcode::Other(0x51)));
        assert_eq!(Script::from_elements(&elements).as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_display() {
        let script = Script::build_p2pkh(&[0x11; 20]);
        assert_eq!(
            script.to_string(),
            format!(
                "OP_DUP OP_HASH160 {} OP_EQUALVERIFY OP_CHECKSIG",
                "11".repeat(20)
            )
        );
    }
}
