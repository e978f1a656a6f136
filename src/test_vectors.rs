//! Fixed key pairs and transaction fixtures shared by unit tests

/// Key that received 10000 satoshis in block 369023
pub const KEY0_WIF: &str = "5JcjcDkFZ3Dz4RjnK3n9cyLVmNS3FzGdNRtNMGFBfJKgzM8eAhH";
pub const KEY0_SECRET: &str = "6977b0281ced7fe1abc59fb3a47df963aeda102ce1027f25bcf5470a61b59f57";
pub const KEY0_X: &str = "e674caf81eb3bb4a97f2acf81b54dc930d9db6a6805fd46ca74ac3ab212c0bbf";
pub const KEY0_Y: &str = "62164a11e7edaf31fbf24a878087d925303079f2556664f3b32d125f2138cbef";
pub const KEY0_HASH160: &str = "e9f061ff2c9885c7b137de35e416cbd5d3e1087c";
pub const KEY0_ADDRESS: &str = "1NKxQnbtKDdL6BY1UaKdrzCxQHfn3TQnqZ";
pub const KEY0_COMPRESSED_WIF: &str = "Kzkj4TFuEQpJr8BpzfGH3mf3xqbWy9myXaqjESHc43TVViCjrVKC";
pub const KEY0_COMPRESSED_ADDRESS: &str = "18yzJaxuFT5QqNjGtn1D5wchzZNm1XjW8r";
pub const KEY0_TESTNET_WIF: &str = "92PNBxZo9GJ82VF4wPg4VZtTR2nkR9opiNkKRtbh134jmHkSm5b";
pub const KEY0_TESTNET_ADDRESS: &str = "n2quhqgs8F4asJ1dC9J1guRHGHGUyBfrot";

pub const KEY1_WIF: &str = "5KK5GkzYJKa7evzYPdvDPmB9XWaKQY9qJS5ouRx4ndBHNHbb2Hq";
pub const KEY1_X: &str = "5866260447c0adfdb26dbe5060a7a298e17d051008ce1677d19fe3d3373284b9";
pub const KEY1_Y: &str = "c384a3445dd96f96c11d3b33d82083e9ecc27d0abfa9fd433afaa5006186bf61";
pub const KEY1_HASH160: &str = "f1fd1dc65af03c30fe743ac63cef3a120ffab57d";
pub const KEY1_ADDRESS: &str = "1P4X54WbgeVKAnbKziaGP5n9b6Qvc9R8RZ";

/// Output of the block 369023 transaction paying KEY0 (wire byte order)
pub const PREV_TX_HASH: &str = "205607fb482a03600b736fb0c257dfd4faa49e45db3990e2c4994796031eae6e";

/// KEY0 spending PREV_TX_HASH:0 to KEY1 for 9000 satoshis
pub const UNSIGNED_TX: &str = "0100000001205607fb482a03600b736fb0c257dfd4faa49e45db3990e2c4994796031eae6e0000000000ffffffff0128230000000000001976a914f1fd1dc65af03c30fe743ac63cef3a120ffab57d88ac00000000";
pub const SIGNED_TX: &str = "0100000001205607fb482a03600b736fb0c257dfd4faa49e45db3990e2c4994796031eae6e000000008b483045022100ed84be709227397fb1bc13b749f235e1f98f07ef8216f15da79e926b99d2bdeb02206ff39819d91bc81fecd74e59a721a38b00725389abb9cbecb42ad1c939fd8262014104e674caf81eb3bb4a97f2acf81b54dc930d9db6a6805fd46ca74ac3ab212c0bbf62164a11e7edaf31fbf24a878087d925303079f2556664f3b32d125f2138cbefffffffff0128230000000000001976a914f1fd1dc65af03c30fe743ac63cef3a120ffab57d88ac00000000";
pub const SIGNED_TX_SIGHASH: &str = "f3261751c8f4ab3fab689838c957ff942565766ba475db02b82dfe19d553e402";
pub const SIGNED_TXID: &str = "695f0b8605cc8a117c3fe5b959e6ee2fabfa49dcc615ac496b5dd114105cd360";

/// DER signature inside SIGNED_TX, without the trailing sighash byte
pub const SIGNED_TX_DER: &str = "3045022100ed84be709227397fb1bc13b749f235e1f98f07ef8216f15da79e926b99d2bdeb02206ff39819d91bc81fecd74e59a721a38b00725389abb9cbecb42ad1c939fd8262";

/// Bitcoin message signatures made with KEY0
pub const MESSAGE_VECTORS: [(&str, &str); 3] = [
    ("Hello, World!!", "G1axea+IdcHXdLH6mO5RLLFpwfLHq0aeCio2IBkntGPrBYKuLybWBoF/ZUivx179qGUU9/1kv9GND9sLvsSBlzw="),
    ("Hello, World!!!", "HF9Q4TQMXGhjPeugn852A1WogZOGx2MOL5eMgHryTdkMZCKmCNzjHk4Lmi+sUWv9ekimLtBSiqkfjmoyUo1qzgM="),
    ("The dog is brown.", "HNiO1y7/h+Y+YfKfmubK40jnwraR3FDA7R3Ne42lML1MfIdcXMNvCrUMsONjDSuOqvft8YmIE8sQ/9S2pb+rL7Y="),
];

/// KEY0 signing "Hello, World!!" with its compressed public key
pub const COMPRESSED_MESSAGE_SIGNATURE: &str = "H1axea+IdcHXdLH6mO5RLLFpwfLHq0aeCio2IBkntGPrBYKuLybWBoF/ZUivx179qGUU9/1kv9GND9sLvsSBlzw=";

pub fn hash_from_hex(hex_str: &str) -> crate::types::Hash {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hex::decode(hex_str).unwrap());
    hash
}
