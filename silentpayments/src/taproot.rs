//! BIP341 output key tweaking and witness v1 address encoding.

use bitcoin::consensus::encode::{serialize, VarInt};
use bitcoin::hashes::Hash as _;
use bitcoin::key::TweakedPublicKey;
use bitcoin::taproot::{LeafVersion, TapLeafHash, TapNodeHash, TapTweakHash};
use bitcoin::{Address, Script};
use secp256k1::{
    Parity, PublicKey, Scalar, Secp256k1, SecretKey, Signing, Verification, XOnlyPublicKey,
};

use crate::bech32::{self, Variant};
use crate::curve;
use crate::error::{CurveError, FormatError, ProtocolError};
use crate::{Network, Result};

/// Leaf version for BIP342 tapscript.
pub const TAPSCRIPT_LEAF_VERSION: u8 = 0xc0;

const TAPROOT_WITNESS_VERSION: u8 = 1;

/// A script tree committed to in a Taproot output.
///
/// A branch holds at most two subtrees. Empty branches carry no hash and are
/// skipped when combining their parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptTree {
    Leaf(Vec<u8>),
    Branch(Vec<ScriptTree>),
}

/// Bitcoin's variable length integer encoding, limited to 32-bit values.
pub fn compact_size(n: u64) -> std::result::Result<Vec<u8>, ProtocolError> {
    if n > u64::from(u32::MAX) {
        return Err(ProtocolError::IntegerTooLarge(n));
    }
    Ok(serialize(&VarInt(n)))
}

pub fn leaf_hash(script: &[u8]) -> std::result::Result<[u8; 32], ProtocolError> {
    compact_size(script.len() as u64)?;
    let hash = TapLeafHash::from_script(Script::from_bytes(script), LeafVersion::TapScript);

    Ok(hash.to_byte_array())
}

/// Combine two child hashes. The smaller hash always comes first, so the
/// result does not depend on the order of the children.
pub fn branch_hash(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    TapNodeHash::from_node_hashes(
        TapNodeHash::from_byte_array(*a),
        TapNodeHash::from_byte_array(*b),
    )
    .to_byte_array()
}

/// The merkle root of a script tree, or `None` if the tree has no leaves.
pub fn merkle_root(tree: &ScriptTree) -> std::result::Result<Option<[u8; 32]>, ProtocolError> {
    let children = match tree {
        ScriptTree::Leaf(script) => return Ok(Some(leaf_hash(script)?)),
        ScriptTree::Branch(children) => children,
    };
    if children.len() > 2 {
        return Err(ProtocolError::TooManyBranches(children.len()));
    }

    let mut root = None;
    for child in children {
        root = match (root, merkle_root(child)?) {
            (Some(a), Some(b)) => Some(branch_hash(&a, &b)),
            (a, b) => a.or(b),
        };
    }
    Ok(root)
}

fn tap_tweak(
    x: &XOnlyPublicKey,
    merkle_root: Option<&[u8; 32]>,
) -> std::result::Result<SecretKey, CurveError> {
    let root = merkle_root.map(|r| TapNodeHash::from_byte_array(*r));
    let hash = TapTweakHash::from_key_and_tweak(*x, root);

    curve::parse_scalar(&hash.to_byte_array())
}

/// Tweak an internal key into a Taproot output key.
///
/// The internal key is used through its x coordinate only, so its parity does
/// not matter. Returns the x-only output key and the parity of the full point.
pub fn tweak_output_key<C: Verification>(
    secp: &Secp256k1<C>,
    internal: &PublicKey,
    merkle_root: Option<&[u8; 32]>,
) -> std::result::Result<(XOnlyPublicKey, Parity), CurveError> {
    let (x, _) = internal.x_only_public_key();
    let tweak = tap_tweak(&x, merkle_root)?;

    Ok(x.add_tweak(secp, &Scalar::from(tweak))?)
}

/// The secret key for a key-path-only Taproot output whose internal secret
/// key is `internal`.
pub fn tweak_private_key<C: Signing>(
    secp: &Secp256k1<C>,
    internal: &SecretKey,
) -> std::result::Result<SecretKey, CurveError> {
    let (x, parity) = internal.x_only_public_key(secp);
    let internal = match parity {
        Parity::Odd => curve::negate_scalar(internal),
        Parity::Even => *internal,
    };
    let tweak = tap_tweak(&x, None)?;

    curve::scalar_add(&internal, &tweak)
}

/// Encode a 32-byte x-only key as a witness v1 address.
pub fn encode_taproot_address(output_key: &XOnlyPublicKey, network: Network) -> String {
    let output_key = TweakedPublicKey::dangerous_assume_tweaked(*output_key);

    Address::p2tr_tweaked(output_key, bitcoin::Network::from(network)).to_string()
}

/// Encode `point` as a Taproot address.
///
/// With `tweak` set, `point` is the internal key and is tweaked with the
/// merkle root of `scripts` (if any) first. Otherwise `point` already is the
/// output key.
pub fn to_taproot_address<C: Verification>(
    secp: &Secp256k1<C>,
    point: &PublicKey,
    network: Network,
    tweak: bool,
    scripts: Option<&ScriptTree>,
) -> Result<String> {
    let output_key = if tweak {
        let root = match scripts {
            Some(tree) => merkle_root(tree)?,
            None => None,
        };
        tweak_output_key(secp, point, root.as_ref())?.0
    } else {
        point.x_only_public_key().0
    };

    Ok(encode_taproot_address(&output_key, network))
}

/// Decode a witness v1 address back into its x-only output key.
pub fn decode_taproot_address(address: &str) -> Result<(XOnlyPublicKey, Network)> {
    let (hrp, data) = bech32::decode(address, Variant::Bech32m)?;
    let network = [Network::Mainnet, Network::Testnet, Network::Regtest]
        .into_iter()
        .find(|n| n.segwit_hrp() == hrp)
        .ok_or(FormatError::InvalidPrefix(hrp))?;
    if data.first() != Some(&TAPROOT_WITNESS_VERSION) {
        let version = data.first().copied().unwrap_or_default();
        return Err(FormatError::UnsupportedVersion(version).into());
    }
    let program = bech32::from_base32(&data[1..])?;
    if program.len() != 32 {
        return Err(FormatError::InvalidLength {
            expected: 32,
            got: program.len(),
        }
        .into());
    }
    let key = XOnlyPublicKey::from_slice(&program).map_err(|_| CurveError::NotOnCurve)?;

    Ok((key, network))
}
