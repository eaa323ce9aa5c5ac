//! Key derivation paths for silent payment wallets.
//!
//! BIP32 derivation itself is left to an [`HdKeyProvider`]; this module only
//! knows which paths hold the scan and spend keys:
//!
//! - scan:  `m/352'/coin_type'/account'/1'/0`
//! - spend: `m/352'/coin_type'/account'/0'/0`
//!
//! `coin_type` is 0 on mainnet and 1 on test networks, as in BIP44.

use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv};
use secp256k1::SecretKey;

use crate::{curve, Network, Result};

const PURPOSE: u32 = 352;
const SCAN_BRANCH: u32 = 1;
const SPEND_BRANCH: u32 = 0;

/// Anything that can derive a secret key at a BIP32 path.
pub trait HdKeyProvider {
    fn derive_secret(&self, path: &DerivationPath) -> Result<SecretKey>;
}

impl HdKeyProvider for Xpriv {
    fn derive_secret(&self, path: &DerivationPath) -> Result<SecretKey> {
        Ok(self.derive_priv(curve::secp(), path)?.private_key)
    }
}

fn key_path(network: Network, account: u32, branch: u32) -> Result<DerivationPath> {
    let path = vec![
        ChildNumber::from_hardened_idx(PURPOSE)?,
        ChildNumber::from_hardened_idx(network.coin_type())?,
        ChildNumber::from_hardened_idx(account)?,
        ChildNumber::from_hardened_idx(branch)?,
        ChildNumber::from_normal_idx(0)?,
    ];
    Ok(DerivationPath::from(path))
}

pub fn scan_path(network: Network, account: u32) -> Result<DerivationPath> {
    key_path(network, account, SCAN_BRANCH)
}

pub fn spend_path(network: Network, account: u32) -> Result<DerivationPath> {
    key_path(network, account, SPEND_BRANCH)
}
