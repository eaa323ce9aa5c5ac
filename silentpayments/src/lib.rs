//! Silent payments (BIP352) for Bitcoin wallets.
//!
//! A sender derives a fresh Taproot output for a receiver's static address
//! from the transaction's inputs; the receiver finds it again by scanning with
//! its scan key and spends it with its spend key.
#![allow(non_snake_case)]
pub mod address;
pub mod bech32;
pub mod curve;
pub mod error;
pub mod hash;
pub mod hd;
pub mod network;
pub mod protocol;
pub mod taproot;

pub use bitcoin_hashes;
pub use secp256k1;

pub use address::{Destination, SilentPaymentAddress, SpKeyPair};
pub use error::Error;
pub use network::Network;

pub type Result<T> = std::result::Result<T, Error>;
