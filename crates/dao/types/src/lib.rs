//! DAO Governance Domain Types
//!
//! This crate defines the data model shared by the governance engine and
//! its hosts: who votes, what they vote on, and what happens once a vote
//! passes.
//!
//! # Key Concepts
//!
//! - **Ballot**: one vote per voter for one proposal. Last write wins.
//! - **Action**: a kind-tagged payload describing the side effect a passed
//!   proposal will perform. Payload shapes are declared with
//!   [`ActionPayload`] and narrowed with [`Action::decode`].
//! - **Proposal**: a request to execute one Action, tracked through
//!   `Open → Passed → Executed`.
//! - **Extension**: a named, versioned read-only capability a DAO exposes
//!   outside the proposal flow.
//!
//! # Architecture
//!
//! This is a pure types crate with no runtime behaviour beyond recording
//! and narrowing. All conditions, stores, and orchestration live in
//! `dao-runtime`.

#![deny(unsafe_code)]

mod action;
mod ballot;
mod errors;
mod event;
mod extension;
mod ids;
mod proposal;
mod vote;

pub use action::*;
pub use ballot::*;
pub use errors::*;
pub use event::*;
pub use extension::*;
pub use ids::*;
pub use proposal::*;
pub use vote::*;
