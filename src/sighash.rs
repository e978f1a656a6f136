//! Legacy (pre-segwit) signature hash

use crate::error::{Result, SigningError};
use crate::hash::double_sha256;
use crate::script::Script;
use crate::transaction::serialize_transaction;
use crate::types::{Hash, Transaction, TransactionOutput};
use log::trace;
use serde::{Deserialize, Serialize};

pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_NONE: u32 = 0x02;
pub const SIGHASH_SINGLE: u32 = 0x03;
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Which parts of a transaction a signature commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SigHashType {
    #[default]
    All,
    None,
    Single,
    AllAnyoneCanPay,
    NoneAnyoneCanPay,
    SingleAnyoneCanPay,
}

impl SigHashType {
    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            0x01 => Ok(SigHashType::All),
            0x02 => Ok(SigHashType::None),
            0x03 => Ok(SigHashType::Single),
            0x81 => Ok(SigHashType::AllAnyoneCanPay),
            0x82 => Ok(SigHashType::NoneAnyoneCanPay),
            0x83 => Ok(SigHashType::SingleAnyoneCanPay),
            other => Err(SigningError::UnsupportedSigHashType(other)),
        }
    }

    pub fn to_u32(self) -> u32 {
        let base = match self.base() {
            SigHashType::None => SIGHASH_NONE,
            SigHashType::Single => SIGHASH_SINGLE,
            _ => SIGHASH_ALL,
        };
        if self.anyone_can_pay() {
            base | SIGHASH_ANYONECANPAY
        } else {
            base
        }
    }

    /// Trailing byte appended to a DER signature in an unlocking script
    pub fn to_byte(self) -> u8 {
        self.to_u32() as u8
    }

    /// The output-selection mode with the anyone-can-pay flag removed
    pub fn base(self) -> SigHashType {
        match self {
            SigHashType::All | SigHashType::AllAnyoneCanPay => SigHashType::All,
            SigHashType::None | SigHashType::NoneAnyoneCanPay => SigHashType::None,
            SigHashType::Single | SigHashType::SingleAnyoneCanPay => SigHashType::Single,
        }
    }

    pub fn anyone_can_pay(self) -> bool {
        matches!(
            self,
            SigHashType::AllAnyoneCanPay
                | SigHashType::NoneAnyoneCanPay
                | SigHashType::SingleAnyoneCanPay
        )
    }
}

/// Digest returned for SINGLE when the signed input has no matching output
pub const SIGHASH_SINGLE_NO_OUTPUT: Hash = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

/// ComputeSignatureHash: the digest a signature for `input_index` authorizes
///
/// Every unlocking script is cleared except the signed input's, which is
/// replaced by `previous_locking_script`. NONE drops all outputs and zeroes
/// the other inputs' sequences; SINGLE keeps outputs up to the input's index,
/// blanking the earlier ones; ANYONECANPAY keeps only the signed input. The
/// serialized copy plus the 4-byte little-endian type is double-SHA256 hashed.
pub fn compute_signature_hash(
    tx: &Transaction,
    input_index: usize,
    sighash_type: SigHashType,
    previous_locking_script: &Script,
) -> Result<Hash> {
    if input_index >= tx.inputs.len() {
        return Err(SigningError::InputIndexOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        });
    }
    let base = sighash_type.base();
    if base == SigHashType::Single && input_index >= tx.outputs.len() {
        trace!(
            "SINGLE signature for input {} without matching output",
            input_index
        );
        return Ok(SIGHASH_SINGLE_NO_OUTPUT);
    }

    let mut copy = tx.clone();
    for (i, input) in copy.inputs.iter_mut().enumerate() {
        if i == input_index {
            input.script_sig = previous_locking_script.clone();
        } else {
            input.script_sig = Script::new();
            if base != SigHashType::All {
                input.sequence = 0;
            }
        }
    }

    match base {
        SigHashType::None => copy.outputs.clear(),
        SigHashType::Single => {
            copy.outputs.truncate(input_index + 1);
            for output in copy.outputs.iter_mut().take(input_index) {
                *output = TransactionOutput {
                    value: u64::MAX,
                    script_pubkey: Script::new(),
                };
            }
        }
        _ => {}
    }

    if sighash_type.anyone_can_pay() {
        let signed = copy.inputs.swap_remove(input_index);
        copy.inputs = vec![signed];
    }

    let mut preimage = serialize_transaction(&copy);
    preimage.extend_from_slice(&sighash_type.to_u32().to_le_bytes());
    Ok(double_sha256(&preimage))
}
