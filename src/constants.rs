//! Wire-format, key-encoding and script constants

/// Version used for newly built transactions
pub const DEFAULT_TRANSACTION_VERSION: u32 = 1;

/// Sequence number for final transaction
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Maximum script length
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Maximum size of a single pushed stack element
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Maximum stack size during script execution
pub const MAX_STACK_SIZE: usize = 1000;

/// P2PKH address version byte on mainnet
pub const MAINNET_P2PKH_VERSION: u8 = 0x00;

/// P2PKH address version byte on testnet
pub const TESTNET_P2PKH_VERSION: u8 = 0x6f;

/// WIF version byte on mainnet
pub const MAINNET_WIF_VERSION: u8 = 0x80;

/// WIF version byte on testnet
pub const TESTNET_WIF_VERSION: u8 = 0xef;

/// Trailing WIF byte marking a key whose public key serializes compressed
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// Serialized public key sizes
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// Length of a hash160 digest
pub const HASH160_SIZE: usize = 20;

/// Length of a base58check checksum
pub const CHECKSUM_SIZE: usize = 4;

/// Prefix hashed in front of every signed message (itself length-prefixed)
pub const MESSAGE_MAGIC: &[u8] = b"Bitcoin Signed Message:\n";

/// Message signature header: 27 + recovery id, plus 4 for compressed keys
pub const MESSAGE_HEADER_BASE: u8 = 27;
pub const MESSAGE_HEADER_COMPRESSED_OFFSET: u8 = 4;

/// Size of a compact (r || s) signature
pub const COMPACT_SIGNATURE_SIZE: usize = 64;
