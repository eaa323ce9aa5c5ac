//! Per-transaction derivation of silent payment outputs.
//!
//! A [`Session`] holds the values every party derives from a transaction's
//! inputs: the smallest outpoint, `A_sum` and `input_hash`. They are computed
//! once on construction and never change afterwards.
//!
//! A session built with [`Session::from_input_keys`] also keeps the summed
//! input secret and can create outputs. One built with
//! [`Session::from_public_keys`] can only scan and spend.

use std::collections::HashMap;

use secp256k1::{PublicKey, Secp256k1, SecretKey, Verification, XOnlyPublicKey};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::address::Destination;
use crate::curve;
use crate::error::ProtocolError;
use crate::protocol::common::{
    calculate_P_k, calculate_receiver_shared_secret, calculate_sender_shared_secret,
    calculate_t_k, calculate_tweak_data,
};
use crate::protocol::inputs::{
    calculate_input_hash, sum_input_secrets, sum_public_keys, InputKey, Outpoint,
};
use crate::protocol::labels::LabelTable;
use crate::taproot::{encode_taproot_address, to_taproot_address};
use crate::{Network, Result};

/// A value precomputed outside the session, typically served by an indexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverTweak {
    /// `input_hash·A_sum`, replaces the session's own tweak data when scanning.
    TweakData(PublicKey),
    /// The final per-output tweak, used as is when spending.
    OutputTweak(SecretKey),
}

/// A Taproot output created for a silent payment destination.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TaprootOutput {
    pub address: String,
    pub output_key: XOnlyPublicKey,
    pub amount: u64,
}

/// A Taproot output of a transaction that might pay us.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateOutput {
    pub output_key: XOnlyPublicKey,
    pub amount: u64,
}

/// A candidate output found to belong to the receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ScanMatch {
    pub address: String,
    pub output_key: XOnlyPublicKey,
    pub amount: u64,
    /// Added to `b_spend`, gives the secret key of the output.
    pub tweak: SecretKey,
    pub label: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    outpoints: Vec<Outpoint>,
    A_sum: PublicKey,
    input_hash: SecretKey,
    a_sum: Option<SecretKey>,
    network: Network,
    receiver_tweak: Option<ReceiverTweak>,
}

impl Session {
    /// A session for a receiver or verifier, who only sees the input public keys.
    pub fn from_public_keys(
        outpoints: Vec<Outpoint>,
        public_keys: &[PublicKey],
        network: Network,
    ) -> Result<Self> {
        let A_sum = sum_public_keys(public_keys)?;
        let input_hash = calculate_input_hash(&outpoints, &A_sum)?;

        Ok(Self {
            outpoints,
            A_sum,
            input_hash,
            a_sum: None,
            network,
            receiver_tweak: None,
        })
    }

    /// A session for the sender, who holds the input secret keys.
    pub fn from_input_keys(
        outpoints: Vec<Outpoint>,
        inputs: &[InputKey],
        network: Network,
    ) -> Result<Self> {
        let secp = curve::secp();

        let a_sum = sum_input_secrets(secp, inputs)?;
        let A_sum = curve::base_mul(secp, &a_sum);
        let input_hash = calculate_input_hash(&outpoints, &A_sum)?;

        Ok(Self {
            outpoints,
            A_sum,
            input_hash,
            a_sum: Some(a_sum),
            network,
            receiver_tweak: None,
        })
    }

    pub fn with_receiver_tweak(mut self, tweak: ReceiverTweak) -> Self {
        self.receiver_tweak = Some(tweak);
        self
    }

    pub fn outpoints(&self) -> &[Outpoint] {
        &self.outpoints
    }

    pub fn get_A_sum(&self) -> PublicKey {
        self.A_sum
    }

    pub fn get_input_hash(&self) -> SecretKey {
        self.input_hash
    }

    pub fn get_network(&self) -> Network {
        self.network
    }

    pub fn get_receiver_tweak(&self) -> Option<ReceiverTweak> {
        self.receiver_tweak
    }

    /// The tweak data a receiver multiplies with its scan key.
    pub fn tweak_data(&self) -> Result<PublicKey> {
        match self.receiver_tweak {
            Some(ReceiverTweak::TweakData(tweak_data)) => Ok(tweak_data),
            _ => calculate_tweak_data(curve::secp(), &self.A_sum, &self.input_hash),
        }
    }

    /// Derive the Taproot outputs paying `destinations`.
    ///
    /// Destinations sharing a scan key share one ECDH secret and are numbered
    /// k = 0, 1, ... in the order given. The result is keyed by the
    /// destination's silent payment address.
    ///
    /// This should only be called once per transaction, calling it again with
    /// more destinations for the same address reuses output keys.
    pub fn create_outputs(
        &self,
        destinations: &[Destination],
    ) -> Result<HashMap<String, Vec<TaprootOutput>>> {
        let secp = curve::secp();
        let a_sum = self.a_sum.ok_or(ProtocolError::MissingInputSecrets)?;
        let partial_secret = curve::scalar_mul(&a_sum, &self.input_hash)?;

        let mut groups: Vec<(PublicKey, Vec<&Destination>)> = vec![];
        for destination in destinations {
            let address = destination.address;
            if address.get_network() != self.network {
                return Err(ProtocolError::NetworkMismatch {
                    expected: self.network,
                    got: address.get_network(),
                }
                .into());
            }

            let B_scan = address.get_scan_key();
            match groups.iter_mut().find(|(key, _)| *key == B_scan) {
                Some((_, group)) => group.push(destination),
                None => groups.push((B_scan, vec![destination])),
            }
        }
        log::debug!(
            "creating {} outputs for {} scan keys",
            destinations.len(),
            groups.len()
        );

        let mut result: HashMap<String, Vec<TaprootOutput>> = HashMap::new();
        for (B_scan, group) in groups {
            let ecdh_shared_secret =
                calculate_sender_shared_secret(secp, &B_scan, &partial_secret)?;

            for (k, destination) in group.into_iter().enumerate() {
                let t_k = calculate_t_k(&ecdh_shared_secret, k as u32)?;
                let P_k = calculate_P_k(secp, &destination.address.get_spend_key(), &t_k)?;

                let output = TaprootOutput {
                    address: to_taproot_address(secp, &P_k, self.network, false, None)?,
                    output_key: P_k.x_only_public_key().0,
                    amount: destination.amount,
                };
                result
                    .entry(destination.address.to_string())
                    .or_default()
                    .push(output);
            }
        }
        Ok(result)
    }

    /// Find the candidates paying to `B_spend` (or to one of its labels).
    ///
    /// The result is keyed by the hex encoded x-only output key. No match is
    /// not an error; the map is simply empty.
    pub fn scan_outputs(
        &self,
        b_scan: &SecretKey,
        B_spend: &PublicKey,
        candidates: &[CandidateOutput],
        labels: Option<&LabelTable>,
    ) -> Result<HashMap<String, ScanMatch>> {
        let secp = curve::secp();
        let ecdh_shared_secret =
            calculate_receiver_shared_secret(secp, &self.tweak_data()?, b_scan)?;

        scan_with_shared_secret(
            secp,
            &ecdh_shared_secret,
            B_spend,
            candidates,
            labels,
            self.network,
        )
    }

    /// Recover the secret key of the k = 0 output.
    ///
    /// With a [`ReceiverTweak::OutputTweak`] set, that tweak is used instead,
    /// which is how keys for outputs with k > 0 are recovered.
    pub fn spend_outputs(&self, b_scan: &SecretKey, b_spend: &SecretKey) -> Result<SecretKey> {
        let tweak = match self.receiver_tweak {
            Some(ReceiverTweak::OutputTweak(tweak)) => tweak,
            _ => {
                let ecdh_shared_secret =
                    calculate_receiver_shared_secret(curve::secp(), &self.tweak_data()?, b_scan)?;
                calculate_t_k(&ecdh_shared_secret, 0)?
            }
        };

        recover_private_key(b_spend, &tweak)
    }
}

/// (b_spend + tweak) mod n
pub fn recover_private_key(b_spend: &SecretKey, tweak: &SecretKey) -> Result<SecretKey> {
    Ok(curve::scalar_add(b_spend, tweak)?)
}

/// Create the outputs of a transaction spending `inputs` at `outpoints`.
pub fn create_outputs(
    outpoints: Vec<Outpoint>,
    inputs: &[InputKey],
    destinations: &[Destination],
    network: Network,
) -> Result<HashMap<String, Vec<TaprootOutput>>> {
    Session::from_input_keys(outpoints, inputs, network)?.create_outputs(destinations)
}

/// Match candidates against the outputs derived from one ECDH shared secret.
///
/// Starting at k = 0, each round looks for a candidate equal to P_k, then for
/// one that is P_k plus a known label. A match consumes the candidate and
/// moves on to k + 1; a round without a match ends the scan.
pub fn scan_with_shared_secret<C: Verification>(
    secp: &Secp256k1<C>,
    ecdh_shared_secret: &PublicKey,
    B_spend: &PublicKey,
    candidates: &[CandidateOutput],
    labels: Option<&LabelTable>,
    network: Network,
) -> Result<HashMap<String, ScanMatch>> {
    let mut remaining: Vec<&CandidateOutput> = candidates.iter().collect();
    let mut found: HashMap<String, ScanMatch> = HashMap::new();
    let mut k: u32 = 0;

    while !remaining.is_empty() {
        let t_k = calculate_t_k(ecdh_shared_secret, k)?;
        let P_k = calculate_P_k(secp, B_spend, &t_k)?;
        let P_k_xonly = P_k.x_only_public_key().0;

        let hit = match remaining.iter().position(|c| c.output_key == P_k_xonly) {
            Some(pos) => Some((pos, t_k, P_k_xonly, None)),
            None => match labels {
                Some(labels) => find_labeled(secp, &P_k, &t_k, &remaining, labels)?,
                None => None,
            },
        };

        let (pos, tweak, output_key, label) = match hit {
            Some(hit) => hit,
            None => break,
        };
        let candidate = remaining.remove(pos);
        log::trace!("k={} matched output {}", k, candidate.output_key);

        found.insert(
            hex::encode(candidate.output_key.serialize()),
            ScanMatch {
                address: encode_taproot_address(&output_key, network),
                output_key: candidate.output_key,
                amount: candidate.amount,
                tweak,
                label,
            },
        );
        k += 1;
    }

    log::debug!("scan finished after k={}, {} outputs found", k, found.len());
    Ok(found)
}

type LabeledHit = (usize, SecretKey, XOnlyPublicKey, Option<u32>);

fn find_labeled<C: Verification>(
    secp: &Secp256k1<C>,
    P_k: &PublicKey,
    t_k: &SecretKey,
    remaining: &[&CandidateOutput],
    labels: &LabelTable,
) -> Result<Option<LabeledHit>> {
    let neg_P_k = curve::negate_point(secp, P_k);

    for (pos, candidate) in remaining.iter().enumerate() {
        // the candidate's y coordinate is unknown, so try both points with its x
        let output = curve::lift_x(&candidate.output_key.serialize())?;
        let neg_output = curve::negate_point(secp, &output);

        for point in [output, neg_output] {
            let diff = match curve::point_add(&point, &neg_P_k) {
                Ok(diff) => diff,
                // point == P_k, a direct match would have been found already
                Err(_) => continue,
            };
            if let Some(label) = labels.find(&diff) {
                let P_km = curve::point_add(P_k, label.point())?;
                let tweak = curve::scalar_add(t_k, label.scalar())?;

                return Ok(Some((
                    pos,
                    tweak,
                    P_km.x_only_public_key().0,
                    Some(label.index()),
                )));
            }
        }
    }
    Ok(None)
}
