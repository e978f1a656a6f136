//! # btc-signer
//!
//! Legacy Bitcoin transaction signing: keys, addresses, message signatures,
//! P2PKH scripts and the pre-segwit signature hash.
//!
//! ## Layout
//!
//! - `encoding`, `hash`: integer packing, compact sizes, double-SHA256, hash160, base58check
//! - `ecdsa`, `keys`, `message`: secp256k1 signing, WIF, addresses, signed messages
//! - `script`, `interpreter`: P2PKH scripts and the minimal interpreter that validates them
//! - `sighash`, `transaction`: wire format, signature hash, signing and verifying inputs
//!
//! ## Usage
//!
//! ```rust
//! use btc_signer::{SigningEngine, Network};
//! use btc_signer::script::Script;
//! use btc_signer::types::*;
//!
//! let engine = SigningEngine::new(Network::Mainnet);
//! let key = engine
//!     .import_wif("5JcjcDkFZ3Dz4RjnK3n9cyLVmNS3FzGdNRtNMGFBfJKgzM8eAhH")
//!     .unwrap();
//! let locking = Script::build_p2pkh(&key.public_key().hash160());
//!
//! let input = TransactionInput::new(OutPoint { hash: [7; 32], index: 0 });
//! let output = TransactionOutput {
//!     value: 9000,
//!     script_pubkey: Script::build_p2pkh_for_address("1P4X54WbgeVKAnbKziaGP5n9b6Qvc9R8RZ").unwrap(),
//! };
//! let mut tx = Transaction::new(vec![input], vec![output]);
//!
//! engine.sign_input(&mut tx, 0, &key, &locking).unwrap();
//! assert!(engine.verify_input(&tx, 0, &locking).unwrap());
//! ```

pub mod types;
pub mod constants;
pub mod error;
pub mod encoding;
pub mod hash;
pub mod ecdsa;
pub mod keys;
pub mod message;
pub mod script;
pub mod interpreter;
pub mod sighash;
pub mod transaction;

#[cfg(test)]
mod test_vectors;

// Re-export commonly used types
pub use types::*;
pub use error::{ErrorKind, Result, SigningError};
pub use ecdsa::Signature;
pub use keys::{PrivateKey, PublicKey};
pub use script::Script;
pub use sighash::SigHashType;

/// Signing front end bound to one network
///
/// # Examples
///
/// ```
/// use btc_signer::{SigningEngine, Network};
///
/// let engine = SigningEngine::new(Network::Mainnet);
/// let key = engine
///     .import_wif("5JcjcDkFZ3Dz4RjnK3n9cyLVmNS3FzGdNRtNMGFBfJKgzM8eAhH")
///     .unwrap();
/// assert_eq!(
///     engine.address_for(&key.public_key()),
///     "1NKxQnbtKDdL6BY1UaKdrzCxQHfn3TQnqZ"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SigningEngine {
    network: Network,
}

impl SigningEngine {
    pub fn new(network: Network) -> Self {
        SigningEngine { network }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Parse a WIF private key, refusing keys encoded for another network
    pub fn import_wif(&self, wif: &str) -> Result<PrivateKey> {
        let key = PrivateKey::from_wif(wif)?;
        if key.network() != self.network {
            return Err(SigningError::InvalidEncoding(format!(
                "WIF key is for {:?}, expected {:?}",
                key.network(),
                self.network
            )));
        }
        Ok(key)
    }

    /// Fresh random key on this engine's network
    pub fn generate_key(&self, compressed: bool) -> Result<PrivateKey> {
        PrivateKey::generate(self.network, compressed)
    }

    pub fn address_for(&self, public_key: &PublicKey) -> String {
        public_key.address(self.network)
    }

    /// Sign `input_index` with SIGHASH_ALL
    ///
    /// # Examples
    ///
    /// ```
    /// use btc_signer::{SigningEngine, SigHashType};
    /// use btc_signer::types::*;
    /// use btc_signer::script::Script;
    ///
    /// let engine = SigningEngine::default();
    /// let key = engine.generate_key(true).unwrap();
    /// let locking = Script::build_p2pkh(&key.public_key().hash160());
    /// let mut tx = Transaction::new(
    ///     vec![TransactionInput::new(OutPoint { hash: [1; 32], index: 3 })],
    ///     vec![],
    /// );
    ///
    /// engine.sign_input(&mut tx, 0, &key, &locking).unwrap();
    /// let (_, sighash_type, public_key) =
    ///     btc_signer::transaction::extract_signature_and_public_key(&tx.inputs[0].script_sig)
    ///         .unwrap();
    /// assert_eq!(sighash_type, SigHashType::All);
    /// assert_eq!(public_key, key.public_key());
    /// ```
    pub fn sign_input(
        &self,
        tx: &mut Transaction,
        input_index: usize,
        private_key: &PrivateKey,
        previous_locking_script: &Script,
    ) -> Result<()> {
        self.sign_input_with(
            tx,
            input_index,
            SigHashType::All,
            private_key,
            previous_locking_script,
        )
    }

    pub fn sign_input_with(
        &self,
        tx: &mut Transaction,
        input_index: usize,
        sighash_type: SigHashType,
        private_key: &PrivateKey,
        previous_locking_script: &Script,
    ) -> Result<()> {
        transaction::sign_input(
            tx,
            input_index,
            sighash_type,
            private_key,
            previous_locking_script,
        )
    }

    pub fn verify_input(
        &self,
        tx: &Transaction,
        input_index: usize,
        previous_locking_script: &Script,
    ) -> Result<bool> {
        transaction::verify_input(tx, input_index, previous_locking_script)
    }

    /// Base64 Bitcoin message signature
    ///
    /// # Examples
    ///
    /// ```
    /// use btc_signer::{SigningEngine, Network};
    ///
    /// let engine = SigningEngine::new(Network::Mainnet);
    /// let key = engine
    ///     .import_wif("5JcjcDkFZ3Dz4RjnK3n9cyLVmNS3FzGdNRtNMGFBfJKgzM8eAhH")
    ///     .unwrap();
    /// let signature = engine.sign_message(&key, "Hello, World!!");
    /// assert_eq!(
    ///     signature,
    ///     "G1axea+IdcHXdLH6mO5RLLFpwfLHq0aeCio2IBkntGPrBYKuLybWBoF/ZUivx179qGUU9/1kv9GND9sLvsSBlzw="
    /// );
    /// assert!(engine
    ///     .verify_message("1NKxQnbtKDdL6BY1UaKdrzCxQHfn3TQnqZ", "Hello, World!!", &signature)
    ///     .unwrap());
    /// ```
    pub fn sign_message(&self, private_key: &PrivateKey, message: &str) -> String {
        message::sign_message(private_key, message.as_bytes())
    }

    pub fn verify_message(&self, address: &str, message: &str, signature_b64: &str) -> Result<bool> {
        message::verify_message(address, message.as_bytes(), signature_b64)
    }
}
