//! Transaction serialization, input signing and input verification

use crate::ecdsa::Signature;
use crate::encoding::{compact_size_len, write_compact_size, Reader};
use crate::error::{Result, SigningError};
use crate::hash::double_sha256;
use crate::interpreter::{verify_script, SignatureChecker};
use crate::keys::{PrivateKey, PublicKey};
use crate::script::{Script, ScriptPattern};
use crate::sighash::{compute_signature_hash, SigHashType};
use crate::types::*;
use log::{debug, trace};
use std::collections::HashSet;

/// Legacy wire format:
/// `version | compact(#in) | inputs | compact(#out) | outputs | lock_time`
pub fn serialize_transaction(tx: &Transaction) -> ByteString {
    let mut out = Vec::with_capacity(calculate_transaction_size(tx));
    out.extend_from_slice(&tx.version.to_le_bytes());

    write_compact_size(tx.inputs.len() as u64, &mut out);
    for input in &tx.inputs {
        out.extend_from_slice(&input.prevout.hash);
        out.extend_from_slice(&input.prevout.index.to_le_bytes());
        write_compact_size(input.script_sig.len() as u64, &mut out);
        out.extend_from_slice(input.script_sig.as_bytes());
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_compact_size(tx.outputs.len() as u64, &mut out);
    for output in &tx.outputs {
        out.extend_from_slice(&output.value.to_le_bytes());
        write_compact_size(output.script_pubkey.len() as u64, &mut out);
        out.extend_from_slice(output.script_pubkey.as_bytes());
    }

    out.extend_from_slice(&tx.lock_time.to_le_bytes());
    out
}

/// Parse a legacy transaction; bytes left over after the lock time are an error
pub fn deserialize_transaction(bytes: &[u8]) -> Result<Transaction> {
    let mut reader = Reader::new(bytes);
    let version = reader.read_u32_le()?;

    let input_count = reader.read_compact_size()?;
    let mut inputs = Vec::new();
    for _ in 0..input_count {
        let hash = reader.read_array::<32>()?;
        let index = reader.read_u32_le()?;
        let script_sig = Script::from_bytes(reader.read_var_bytes()?.to_vec());
        let sequence = reader.read_u32_le()?;
        inputs.push(TransactionInput {
            prevout: OutPoint { hash, index },
            script_sig,
            sequence,
        });
    }

    let output_count = reader.read_compact_size()?;
    let mut outputs = Vec::new();
    for _ in 0..output_count {
        let value = reader.read_u64_le()?;
        let script_pubkey = Script::from_bytes(reader.read_var_bytes()?.to_vec());
        outputs.push(TransactionOutput {
            value,
            script_pubkey,
        });
    }

    let lock_time = reader.read_u32_le()?;
    if !reader.is_empty() {
        return Err(SigningError::TrailingData(reader.remaining()));
    }

    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}

pub fn transaction_to_hex(tx: &Transaction) -> String {
    hex::encode(serialize_transaction(tx))
}

pub fn transaction_from_hex(hex_str: &str) -> Result<Transaction> {
    deserialize_transaction(&hex::decode(hex_str)?)
}

/// Serialized size in bytes
pub fn calculate_transaction_size(tx: &Transaction) -> usize {
    let inputs: usize = tx
        .inputs
        .iter()
        .map(|i| 32 + 4 + compact_size_len(i.script_sig.len() as u64) + i.script_sig.len() + 4)
        .sum();
    let outputs: usize = tx
        .outputs
        .iter()
        .map(|o| 8 + compact_size_len(o.script_pubkey.len() as u64) + o.script_pubkey.len())
        .sum();
    4 + compact_size_len(tx.inputs.len() as u64)
        + inputs
        + compact_size_len(tx.outputs.len() as u64)
        + outputs
        + 4
}

/// Transaction id in display order (double-SHA256 of the wire bytes, reversed)
pub fn txid(tx: &Transaction) -> Hash {
    let mut hash = double_sha256(&serialize_transaction(tx));
    hash.reverse();
    hash
}

pub fn txid_hex(tx: &Transaction) -> String {
    hex::encode(txid(tx))
}

/// Display-order hex (as shown by explorers) to a wire-order hash
pub fn hash_from_display_hex(hex_str: &str) -> Result<Hash> {
    let bytes = hex::decode(hex_str)?;
    let mut hash: Hash = bytes.as_slice().try_into().map_err(|_| {
        SigningError::InvalidEncoding(format!("hash must be 32 bytes, got {}", bytes.len()))
    })?;
    hash.reverse();
    Ok(hash)
}

pub fn hash_to_display_hex(hash: &Hash) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// Outpoint referencing output `index` of the transaction shown as `txid_hex`
pub fn outpoint_from_txid(txid_hex: &str, index: u32) -> Result<OutPoint> {
    Ok(OutPoint {
        hash: hash_from_display_hex(txid_hex)?,
        index,
    })
}

/// The unlocking script `<DER || sighash byte> <public key>` that signs
/// `input_index`, computed without touching `tx`
pub fn unlocking_script_for(
    tx: &Transaction,
    input_index: usize,
    sighash_type: SigHashType,
    private_key: &PrivateKey,
    previous_locking_script: &Script,
) -> Result<Script> {
    let hash = compute_signature_hash(tx, input_index, sighash_type, previous_locking_script)?;
    let signature = private_key.sign(&hash);
    let mut blob = signature.to_der();
    blob.push(sighash_type.to_byte());
    trace!(
        "Input {} sighash {} signature {}",
        input_index,
        hex::encode(hash),
        hex::encode(&blob)
    );
    Ok(Script::build_signature_and_pubkey(
        &blob,
        &private_key.public_key().to_bytes(),
    ))
}

/// SignInput: overwrite the unlocking script of `input_index`
///
/// The transaction is left untouched if anything fails.
pub fn sign_input(
    tx: &mut Transaction,
    input_index: usize,
    sighash_type: SigHashType,
    private_key: &PrivateKey,
    previous_locking_script: &Script,
) -> Result<()> {
    let script = unlocking_script_for(
        tx,
        input_index,
        sighash_type,
        private_key,
        previous_locking_script,
    )?;
    debug!(
        "Signed input {} ({:?}) with {}",
        input_index,
        sighash_type,
        private_key.address()
    );
    tx.inputs[input_index].script_sig = script;
    Ok(())
}

/// One input to sign in a [`sign_inputs`] batch
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    pub input_index: usize,
    pub sighash_type: SigHashType,
    pub private_key: &'a PrivateKey,
    pub previous_locking_script: &'a Script,
}

/// Sign several inputs of `tx`
///
/// Every signature hash clears all unlocking scripts, so the scripts are
/// computed against the unmodified transaction (in parallel with the `rayon`
/// feature) and written only once all of them succeeded.
pub fn sign_inputs(tx: &mut Transaction, requests: &[SigningRequest<'_>]) -> Result<()> {
    let mut seen = HashSet::new();
    for request in requests {
        if !seen.insert(request.input_index) {
            return Err(SigningError::DuplicateInput(request.input_index));
        }
    }

    let snapshot: &Transaction = &*tx;
    let compute = |request: &SigningRequest<'_>| {
        unlocking_script_for(
            snapshot,
            request.input_index,
            request.sighash_type,
            request.private_key,
            request.previous_locking_script,
        )
    };

    #[cfg(feature = "rayon")]
    let scripts: Result<Vec<Script>> = {
        use rayon::prelude::*;
        requests.par_iter().map(compute).collect()
    };

    #[cfg(not(feature = "rayon"))]
    let scripts: Result<Vec<Script>> = requests.iter().map(compute).collect();

    let scripts = scripts?;
    for (request, script) in requests.iter().zip(scripts) {
        tx.inputs[request.input_index].script_sig = script;
    }
    debug!("Signed {} inputs", requests.len());
    Ok(())
}

/// Split a `<signature || sighash byte> <public key>` unlocking script
pub fn extract_signature_and_public_key(
    script: &Script,
) -> Result<(Signature, SigHashType, PublicKey)> {
    match script.classify() {
        ScriptPattern::SignatureAndPubkey {
            signature,
            public_key,
        } => {
            let (signature, sighash_type) = parse_signature_blob(&signature)?;
            Ok((signature, sighash_type, PublicKey::from_bytes(&public_key)?))
        }
        other => Err(SigningError::ScriptShape(format!(
            "expected <signature> <public key>, found {:?}",
            other
        ))),
    }
}

fn parse_signature_blob(blob: &[u8]) -> Result<(Signature, SigHashType)> {
    let (sighash_byte, der) = blob
        .split_last()
        .ok_or_else(|| SigningError::InvalidEncoding("empty signature".to_string()))?;
    let sighash_type = SigHashType::from_u32(*sighash_byte as u32)?;
    Ok((Signature::from_der(der)?, sighash_type))
}

/// Checks signatures against the signature hash of one input of `tx`
#[derive(Debug, Clone, Copy)]
pub struct TransactionSignatureChecker<'a> {
    tx: &'a Transaction,
    input_index: usize,
}

impl<'a> TransactionSignatureChecker<'a> {
    pub fn new(tx: &'a Transaction, input_index: usize) -> Self {
        TransactionSignatureChecker { tx, input_index }
    }
}

impl SignatureChecker for TransactionSignatureChecker<'_> {
    fn check_signature(
        &self,
        signature: &[u8],
        public_key: &[u8],
        script_code: &Script,
    ) -> Result<bool> {
        if signature.is_empty() {
            return Ok(false);
        }
        let (signature, sighash_type) = parse_signature_blob(signature)?;
        let public_key = PublicKey::from_bytes(public_key)?;
        let hash = compute_signature_hash(self.tx, self.input_index, sighash_type, script_code)?;
        Ok(public_key.verify(&hash, &signature))
    }
}

/// Run the unlocking script of `input_index` followed by the locking script
/// of the output it spends
pub fn verify_input(
    tx: &Transaction,
    input_index: usize,
    previous_locking_script: &Script,
) -> Result<bool> {
    let input = tx
        .inputs
        .get(input_index)
        .ok_or(SigningError::InputIndexOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        })?;
    let checker = TransactionSignatureChecker::new(tx, input_index);
    let valid = verify_script(&input.script_sig, previous_locking_script, &checker)?;
    debug!("Input {} verification: {}", input_index, valid);
    Ok(valid)
}
