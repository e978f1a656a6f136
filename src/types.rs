//! Core transaction types and network parameters

use crate::constants::*;
use crate::script::Script;
use serde::{Deserialize, Serialize};

/// Hash type: 256-bit hash, in wire (internal) byte order
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Network whose version bytes are used for WIF and address encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn p2pkh_version(self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2PKH_VERSION,
            Network::Testnet => TESTNET_P2PKH_VERSION,
        }
    }

    pub fn wif_version(self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_WIF_VERSION,
            Network::Testnet => TESTNET_WIF_VERSION,
        }
    }

    pub fn from_p2pkh_version(version: u8) -> Option<Self> {
        match version {
            MAINNET_P2PKH_VERSION => Some(Network::Mainnet),
            TESTNET_P2PKH_VERSION => Some(Network::Testnet),
            _ => None,
        }
    }

    pub fn from_wif_version(version: u8) -> Option<Self> {
        match version {
            MAINNET_WIF_VERSION => Some(Network::Mainnet),
            TESTNET_WIF_VERSION => Some(Network::Testnet),
            _ => None,
        }
    }
}

/// Reference to a previous transaction output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

/// Transaction Input: previous output, unlocking script, sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: Script,
    pub sequence: u32,
}

/// Transaction Output: value in satoshis, locking script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: u64,
    pub script_pubkey: Script,
}

/// Transaction: version, inputs, outputs, lock time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

impl TransactionInput {
    /// Unsigned input spending `prevout` with a final sequence number
    pub fn new(prevout: OutPoint) -> Self {
        TransactionInput {
            prevout,
            script_sig: Script::new(),
            sequence: SEQUENCE_FINAL,
        }
    }
}

impl Transaction {
    pub fn new(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Transaction {
            version: DEFAULT_TRANSACTION_VERSION,
            inputs,
            outputs,
            lock_time: 0,
        }
    }
}
