use secp256k1::{Parity, PublicKey, Secp256k1, SecretKey, Signing};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::curve;
use crate::error::{Error, FormatError, ProtocolError};
use crate::hash::{tagged_hash, TAG_INPUTS};
use crate::taproot::tweak_private_key;
use crate::Result;

/// A reference to a transaction output being spent.
///
/// `txid` is kept in the byte order it is displayed in; it is reversed when
/// serialized.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Outpoint {
    pub txid: [u8; 32],
    pub vout: u32,
}

impl Outpoint {
    pub fn new(txid: [u8; 32], vout: u32) -> Self {
        Self { txid, vout }
    }

    pub fn from_hex(txid: &str, vout: u32) -> Result<Self> {
        let bytes = hex::decode(txid)?;
        let txid: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| FormatError::InvalidLength {
                expected: 32,
                got: b.len(),
            })?;

        Ok(Self { txid, vout })
    }

    /// reversed txid || little-endian vout
    pub fn serialize(&self) -> [u8; 36] {
        let mut res = [0u8; 36];
        res[..32].copy_from_slice(&self.txid);
        res[..32].reverse();
        res[32..].copy_from_slice(&self.vout.to_le_bytes());
        res
    }
}

/// The secret key of one transaction input, and how it was locked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputKey {
    pub secret: SecretKey,
    /// The input spends a Taproot output.
    pub is_taproot: bool,
    /// `secret` is the internal key and must be tweaked into the output key.
    pub needs_taproot_tweak: bool,
}

impl InputKey {
    pub fn new(secret: SecretKey) -> Self {
        Self {
            secret,
            is_taproot: false,
            needs_taproot_tweak: false,
        }
    }

    pub fn taproot(secret: SecretKey, needs_taproot_tweak: bool) -> Self {
        Self {
            secret,
            is_taproot: true,
            needs_taproot_tweak,
        }
    }

    /// The secret key of the public key that appears on chain.
    ///
    /// Taproot keys are x-only, so their secret is negated when needed to
    /// match the even Y point.
    pub fn effective_secret<C: Signing>(&self, secp: &Secp256k1<C>) -> Result<SecretKey> {
        if !self.is_taproot {
            return Ok(self.secret);
        }

        let sk = if self.needs_taproot_tweak {
            tweak_private_key(secp, &self.secret)?
        } else {
            self.secret
        };

        Ok(match sk.x_only_public_key(secp).1 {
            Parity::Odd => curve::negate_scalar(&sk),
            Parity::Even => sk,
        })
    }
}

/// The lexicographically smallest serialized outpoint.
pub fn smallest_outpoint(outpoints: &[Outpoint]) -> Result<[u8; 36]> {
    outpoints
        .iter()
        .map(Outpoint::serialize)
        .min()
        .ok_or(Error::Protocol(ProtocolError::NoInputs))
}

/// hash_BIP0352/Inputs(smallest_outpoint || A_sum)
pub fn calculate_input_hash(outpoints: &[Outpoint], A_sum: &PublicKey) -> Result<SecretKey> {
    let mut data = [0u8; 36 + 33];
    data[..36].copy_from_slice(&smallest_outpoint(outpoints)?);
    data[36..].copy_from_slice(&A_sum.serialize());

    Ok(curve::parse_scalar(&tagged_hash(TAG_INPUTS, &data))?)
}

/// Sum of the input public keys, as computed by a receiver or verifier.
pub fn sum_public_keys(public_keys: &[PublicKey]) -> Result<PublicKey> {
    if public_keys.is_empty() {
        return Err(ProtocolError::NoInputs.into());
    }
    Ok(curve::point_sum(public_keys)?)
}

/// Sum of the input secret keys, as computed by a sender. Summation order
/// does not matter.
pub fn sum_input_secrets<C: Signing>(
    secp: &Secp256k1<C>,
    inputs: &[InputKey],
) -> Result<SecretKey> {
    let (first, rest) = inputs.split_first().ok_or(ProtocolError::NoInputs)?;

    rest.iter()
        .try_fold(first.effective_secret(secp)?, |acc, input| -> Result<SecretKey> {
            Ok(curve::scalar_add(&acc, &input.effective_secret(secp)?)?)
        })
}
