//! Domain separated SHA256 as defined in BIP340.

use bitcoin_hashes::{sha256, Hash, HashEngine};

pub const TAG_TAP_LEAF: &str = "TapLeaf";
pub const TAG_TAP_BRANCH: &str = "TapBranch";
pub const TAG_TAP_TWEAK: &str = "TapTweak";
pub const TAG_INPUTS: &str = "BIP0352/Inputs";
pub const TAG_SHARED_SECRET: &str = "BIP0352/SharedSecret";
pub const TAG_LABEL: &str = "BIP0352/Label";

/// SHA256(SHA256(tag) || SHA256(tag) || data)
pub fn tagged_hash(tag: &str, data: &[u8]) -> [u8; 32] {
    let tag_hash = sha256::Hash::hash(tag.as_bytes());

    let mut engine = sha256::Hash::engine();
    engine.input(tag_hash.as_ref());
    engine.input(tag_hash.as_ref());
    engine.input(data);
    sha256::Hash::from_engine(engine).to_byte_array()
}
