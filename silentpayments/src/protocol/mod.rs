//! BIP352 Silent Payments protocol implementation.
//!
//! ## Module Organization
//!
//! - [`inputs`] - Outpoints, input keys and the input hash
//! - [`labels`] - Label scalars and the table a receiver scans with
//! - [`common`] - Shared secret and per-output tweak derivation
//! - [`session`] - Creating, scanning for and spending outputs of one transaction
//! - [`receiver`] - A wallet's receiving keys and labels, scanning many transactions
//!
//! ## Examples
//!
//! ### Sending to a Silent Payment Address
//!
//! ```ignore
//! use silentpayments::protocol::create_outputs;
//!
//! let outputs = create_outputs(outpoints, &input_keys, &destinations, Network::Mainnet)?;
//! ```
//!
//! ### Scanning for Received Outputs
//!
//! ```ignore
//! use silentpayments::protocol::{Receiver, Session};
//!
//! let session = Session::from_public_keys(outpoints, &input_pubkeys, Network::Mainnet)?;
//! let found = receiver.scan(&session, &candidates)?;
//! ```
pub mod common;
pub mod inputs;
pub mod labels;
pub mod receiver;
pub mod session;

pub use inputs::{InputKey, Outpoint};
pub use labels::{Label, LabelTable, CHANGE_LABEL};
pub use receiver::Receiver;
pub use session::{
    create_outputs, recover_private_key, CandidateOutput, ReceiverTweak, ScanMatch, Session,
    TaprootOutput,
};
