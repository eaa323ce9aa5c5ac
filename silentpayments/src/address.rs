use std::convert::TryFrom;
use std::fmt;

use secp256k1::{PublicKey, SecretKey};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bech32::{self, Variant};
use crate::curve;
use crate::error::{Error, FormatError};
use crate::hd::{self, HdKeyProvider};
use crate::protocol::Label;
use crate::{Network, Result};

const PUBKEYS_LENGTH: usize = 66;

/// A silent payment address: the receiver's scan and spend public keys.
///
/// Only version 0 is defined; any other version is rejected on construction.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct SilentPaymentAddress {
    version: u8,
    scan_pubkey: PublicKey,
    spend_pubkey: PublicKey,
    network: Network,
}

#[cfg(feature = "serde")]
impl Serialize for SilentPaymentAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded: String = (*self).into();
        serializer.serialize_str(&encoded)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SilentPaymentAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let addr_str: String = Deserialize::deserialize(deserializer)?;

        SilentPaymentAddress::try_from(addr_str.as_str()).map_err(serde::de::Error::custom)
    }
}

impl SilentPaymentAddress {
    pub fn new(
        scan_pubkey: PublicKey,
        spend_pubkey: PublicKey,
        network: Network,
        version: u8,
    ) -> Result<Self> {
        if version != 0 {
            return Err(FormatError::UnsupportedVersion(version).into());
        }

        Ok(SilentPaymentAddress {
            version,
            scan_pubkey,
            spend_pubkey,
            network,
        })
    }

    pub fn from_secret_keys(
        scan_sk: &SecretKey,
        spend_sk: &SecretKey,
        network: Network,
    ) -> Result<Self> {
        let secp = curve::secp();

        Self::new(
            curve::base_mul(secp, scan_sk),
            curve::base_mul(secp, spend_sk),
            network,
            0,
        )
    }

    /// The address for `label`: same scan key, spend key `B_spend + label·G`.
    pub fn labeled(&self, label: &Label) -> Result<Self> {
        let spend_pubkey = curve::point_add(&self.spend_pubkey, label.point())?;

        Ok(SilentPaymentAddress {
            spend_pubkey,
            ..*self
        })
    }

    /// Get the scan public key.
    pub fn get_scan_key(&self) -> PublicKey {
        self.scan_pubkey
    }

    /// Get the spend public key.
    pub fn get_spend_key(&self) -> PublicKey {
        self.spend_pubkey
    }

    /// Get the network.
    pub fn get_network(&self) -> Network {
        self.network
    }

    /// Get the version byte.
    pub fn get_version(&self) -> u8 {
        self.version
    }
}

impl fmt::Display for SilentPaymentAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", <SilentPaymentAddress as Into<String>>::into(*self))
    }
}

impl TryFrom<&str> for SilentPaymentAddress {
    type Error = Error;

    fn try_from(addr: &str) -> Result<Self> {
        let (hrp, data) = bech32::decode(addr, Variant::Bech32m)?;

        let network =
            Network::from_sp_hrp(&hrp).ok_or_else(|| FormatError::InvalidPrefix(hrp.clone()))?;

        // the decoder guarantees at least one data word
        let version = data[0];
        if version != 0 {
            return Err(FormatError::UnsupportedVersion(version).into());
        }

        let pubkeys = bech32::from_base32(&data[1..])?;
        if pubkeys.len() != PUBKEYS_LENGTH {
            return Err(FormatError::InvalidLength {
                expected: PUBKEYS_LENGTH,
                got: pubkeys.len(),
            }
            .into());
        }

        let scan_pubkey = curve::parse_point(&pubkeys[..33])?;
        let spend_pubkey = curve::parse_point(&pubkeys[33..])?;

        SilentPaymentAddress::new(scan_pubkey, spend_pubkey, network, version)
    }
}

impl TryFrom<String> for SilentPaymentAddress {
    type Error = Error;

    fn try_from(addr: String) -> Result<Self> {
        addr.as_str().try_into()
    }
}

impl From<SilentPaymentAddress> for String {
    fn from(val: SilentPaymentAddress) -> Self {
        let mut pubkeys = [0u8; PUBKEYS_LENGTH];
        pubkeys[..33].copy_from_slice(&val.scan_pubkey.serialize());
        pubkeys[33..].copy_from_slice(&val.spend_pubkey.serialize());

        let mut data = vec![val.version];
        data.extend(bech32::to_base32(&pubkeys));

        bech32::encode(val.network.sp_hrp(), &data, Variant::Bech32m)
            .expect("We should always be able to encode public keys")
    }
}

/// A payment to a silent payment address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Destination {
    pub address: SilentPaymentAddress,
    /// Amount in satoshis.
    pub amount: u64,
}

impl Destination {
    pub fn new(address: SilentPaymentAddress, amount: u64) -> Self {
        Self { address, amount }
    }
}

/// The receiver's secret scan and spend keys, with the address they give.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpKeyPair {
    address: SilentPaymentAddress,
    scan_sk: SecretKey,
    spend_sk: SecretKey,
}

impl SpKeyPair {
    pub fn new(scan_sk: SecretKey, spend_sk: SecretKey, network: Network) -> Result<Self> {
        let address = SilentPaymentAddress::from_secret_keys(&scan_sk, &spend_sk, network)?;

        Ok(Self {
            address,
            scan_sk,
            spend_sk,
        })
    }

    /// Derive the scan and spend keys of `account` from an HD key provider.
    pub fn from_hd<P: HdKeyProvider>(provider: &P, network: Network, account: u32) -> Result<Self> {
        let scan_sk = provider.derive_secret(&hd::scan_path(network, account)?)?;
        let spend_sk = provider.derive_secret(&hd::spend_path(network, account)?)?;

        Self::new(scan_sk, spend_sk, network)
    }

    /// Derive the keys of account 0 from a BIP32 seed.
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self> {
        let master = bitcoin::bip32::Xpriv::new_master(bitcoin::Network::from(network), seed)?;

        Self::from_hd(&master, network, 0)
    }

    pub fn get_address(&self) -> SilentPaymentAddress {
        self.address
    }

    pub fn get_scan_key(&self) -> SecretKey {
        self.scan_sk
    }

    pub fn get_spend_key(&self) -> SecretKey {
        self.spend_sk
    }
}
