use std::collections::HashMap;

use secp256k1::SecretKey;

use crate::address::{SilentPaymentAddress, SpKeyPair};
use crate::curve;
use crate::error::ProtocolError;
use crate::protocol::labels::{Label, LabelTable, CHANGE_LABEL};
use crate::protocol::session::{CandidateOutput, ScanMatch, Session};
use crate::Result;

/// A wallet's receiving side: its keys and the labels it scans for.
///
/// The change label is always part of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receiver {
    keys: SpKeyPair,
    labels: LabelTable,
}

impl Receiver {
    pub fn new(keys: SpKeyPair, labels: &[u32]) -> Result<Self> {
        let secp = curve::secp();
        let mut table = LabelTable::new();

        table.insert(Label::change(secp, &keys.get_scan_key())?);
        for m in labels {
            table.insert(Label::new(secp, &keys.get_scan_key(), *m)?);
        }

        Ok(Self {
            keys,
            labels: table,
        })
    }

    pub fn add_label(&mut self, m: u32) -> Result<SilentPaymentAddress> {
        let label = Label::new(curve::secp(), &self.keys.get_scan_key(), m)?;
        self.labels.insert(label);

        self.keys.get_address().labeled(&label)
    }

    pub fn get_labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn receiving_address(&self) -> SilentPaymentAddress {
        self.keys.get_address()
    }

    pub fn change_address(&self) -> Result<SilentPaymentAddress> {
        self.labeled_address(CHANGE_LABEL)
    }

    pub fn labeled_address(&self, m: u32) -> Result<SilentPaymentAddress> {
        let label = self.labels.get(m).ok_or(ProtocolError::UnknownLabel(m))?;

        self.keys.get_address().labeled(&label)
    }

    /// Scan one transaction's outputs.
    pub fn scan(
        &self,
        session: &Session,
        candidates: &[CandidateOutput],
    ) -> Result<HashMap<String, ScanMatch>> {
        session.scan_outputs(
            &self.keys.get_scan_key(),
            &self.keys.get_address().get_spend_key(),
            candidates,
            Some(&self.labels),
        )
    }

    /// Scan many transactions, one result per session in the same order.
    pub fn scan_sessions(
        &self,
        transactions: &[(Session, Vec<CandidateOutput>)],
    ) -> Result<Vec<HashMap<String, ScanMatch>>> {
        log::debug!("scanning {} transactions", transactions.len());

        #[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
        let found: Result<Vec<_>> = {
            use rayon::prelude::*;
            transactions
                .par_iter()
                .map(|(session, candidates)| self.scan(session, candidates))
                .collect()
        };

        #[cfg(not(all(not(target_arch = "wasm32"), feature = "parallel")))]
        let found: Result<Vec<_>> = transactions
            .iter()
            .map(|(session, candidates)| self.scan(session, candidates))
            .collect();

        found
    }

    /// Secret key for an output found by [`Receiver::scan`].
    pub fn spend_key_for(&self, found: &ScanMatch) -> Result<SecretKey> {
        crate::protocol::session::recover_private_key(&self.keys.get_spend_key(), &found.tweak)
    }
}
