use std::collections::HashMap;

use bimap::BiMap;
use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};

use crate::curve;
use crate::hash::{tagged_hash, TAG_LABEL};
use crate::Result;

/// Label index reserved for change outputs.
pub const CHANGE_LABEL: u32 = 0;

/// A label lets one scan key receive on several linked addresses.
///
/// The label scalar is `hash_BIP0352/Label(ser256(b_scan) || ser32(m))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label {
    index: u32,
    scalar: SecretKey,
    point: PublicKey,
}

impl Label {
    pub fn new<C: Signing>(secp: &Secp256k1<C>, b_scan: &SecretKey, m: u32) -> Result<Self> {
        let mut data = [0u8; 36];
        data[..32].copy_from_slice(&b_scan.secret_bytes());
        data[32..].copy_from_slice(&m.to_be_bytes());

        let scalar = curve::parse_scalar(&tagged_hash(TAG_LABEL, &data))?;

        Ok(Self {
            index: m,
            scalar,
            point: curve::base_mul(secp, &scalar),
        })
    }

    pub fn change<C: Signing>(secp: &Secp256k1<C>, b_scan: &SecretKey) -> Result<Self> {
        Self::new(secp, b_scan, CHANGE_LABEL)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn scalar(&self) -> &SecretKey {
        &self.scalar
    }

    pub fn point(&self) -> &PublicKey {
        &self.point
    }
}

/// Labels a receiver scans for, looked up by their point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    points: BiMap<PublicKey, u32>,
    scalars: HashMap<u32, SecretKey>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table for the given indices under one scan key.
    pub fn from_indices<C: Signing>(
        secp: &Secp256k1<C>,
        b_scan: &SecretKey,
        indices: &[u32],
    ) -> Result<Self> {
        let mut table = Self::new();
        for m in indices {
            table.insert(Label::new(secp, b_scan, *m)?);
        }
        Ok(table)
    }

    pub fn insert(&mut self, label: Label) {
        self.points.insert(label.point, label.index);
        self.scalars.insert(label.index, label.scalar);
    }

    pub fn get(&self, m: u32) -> Option<Label> {
        let point = self.points.get_by_right(&m)?;
        let scalar = self.scalars.get(&m)?;

        Some(Label {
            index: m,
            scalar: *scalar,
            point: *point,
        })
    }

    /// The label whose point is `point`, if any.
    pub fn find(&self, point: &PublicKey) -> Option<Label> {
        let m = self.points.get_by_left(point)?;
        self.get(*m)
    }

    pub fn contains(&self, m: u32) -> bool {
        self.points.contains_right(&m)
    }

    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.points.right_values().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
