use std::convert::TryFrom;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// The network format used for silent payment and Taproot addresses.
///
/// There are three network types: Mainnet (`sp1..`), Testnet (`tsp1..`), and Regtest (`sprt1..`).
/// Signet uses the same network type as Testnet.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    /// Human-readable part of a silent payment address on this network.
    ///
    /// Regtest addresses are both written and read with `sprt`, so a regtest
    /// wallet can hand out addresses that other regtest wallets accept.
    pub fn sp_hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "sp",
            Network::Testnet => "tsp",
            Network::Regtest => "sprt",
        }
    }

    /// Human-readable part of a segwit address on this network.
    pub fn segwit_hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "bc",
            Network::Testnet => "tb",
            Network::Regtest => "bcrt",
        }
    }

    pub(crate) fn from_sp_hrp(hrp: &str) -> Option<Self> {
        match hrp {
            "sp" => Some(Network::Mainnet),
            "tsp" => Some(Network::Testnet),
            "sprt" => Some(Network::Regtest),
            _ => None,
        }
    }

    /// BIP44 coin type used in derivation paths.
    pub(crate) fn coin_type(self) -> u32 {
        match self {
            Network::Mainnet => 0,
            Network::Testnet | Network::Regtest => 1,
        }
    }
}

impl From<Network> for &str {
    fn from(value: Network) -> Self {
        match value {
            // same string as rust-bitcoin
            Network::Mainnet => "bitcoin",
            Network::Regtest => "regtest",
            Network::Testnet => "testnet",
        }
    }
}

impl TryFrom<&str> for Network {
    type Error = FormatError;

    fn try_from(value: &str) -> Result<Self, FormatError> {
        let res = match value {
            "bitcoin" | "main" => Self::Mainnet, // We also take the core style argument
            "regtest" => Self::Regtest,
            "testnet" | "signet" | "test" => Self::Testnet, // core arg
            _ => return Err(FormatError::InvalidNetwork(value.to_string())),
        };
        Ok(res)
    }
}

impl From<Network> for bitcoin::Network {
    fn from(value: Network) -> Self {
        match value {
            Network::Mainnet => bitcoin::Network::Bitcoin,
            Network::Testnet => bitcoin::Network::Testnet,
            Network::Regtest => bitcoin::Network::Regtest,
        }
    }
}
