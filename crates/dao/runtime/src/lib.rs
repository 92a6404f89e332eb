//! DAO Governance Runtime
//!
//! This crate provides the decision engine behind a DAO: configurable
//! conditions decide when a proposal has passed, and handlers perform the
//! proposal's action once it executes.
//!
//! # Architecture
//!
//! The [`DaoCore`] is the main entry point. It composes:
//!
//! - [`ResourceStore`]: action kind bound to a condition and a handler
//! - [`ProposalStore`]: sequentially numbered proposals and their ballots
//! - [`ExtensionRegistry`]: read-only capabilities such as [`MembersExtension`]
//! - [`EventSink`]: receives a [`dao_types::DaoEvent`] for every state change
//!
//! Conditions ([`MembersThreshold`], [`RoleThreshold`], [`RoleCount`],
//! [`And`], [`Or`]) are stateless and read membership through
//! [`DirectoryLookups`], so they never own member data.
//!
//! # Key Invariants
//!
//! 1. Proposal state only moves forward: `Open → Passed → Executed`
//! 2. Execution re-checks the condition against the current ballot
//! 3. A failed operation leaves stores unchanged
//! 4. Resources are resolved by kind at the time of use
//!
//! # Example
//!
//! ```rust
//! use dao_runtime::{
//!     DaoCore, DirectoryLookups, InMemoryDirectory, MembersThreshold, NoopEventSink, Resource,
//!     TextHandler,
//! };
//! use dao_types::{Action, ProposalRequest, ProposalState, TextProposal, Vote, VoterId};
//! use std::sync::Arc;
//!
//! let directory = Arc::new(InMemoryDirectory::with_members([
//!     (VoterId::new("alice"), Vec::new()),
//!     (VoterId::new("bob"), Vec::new()),
//! ]));
//! let lookups = DirectoryLookups::from_directory(directory);
//! let condition = MembersThreshold::from_lookups(0.5, &lookups).unwrap();
//!
//! let mut dao = DaoCore::builder("council")
//!     .with_event_sink(Arc::new(NoopEventSink))
//!     .with_resource(Resource::new(Arc::new(TextHandler::new()), Arc::new(condition)))
//!     .build()
//!     .unwrap();
//!
//! let action = Action::new(&TextProposal { body: "adopt charter".into() }).unwrap();
//! let id = dao
//!     .propose(VoterId::new("alice"), ProposalRequest::new("Charter", "", action))
//!     .unwrap();
//!
//! let state = dao.vote(id, VoterId::new("alice"), Vote::Yes).unwrap();
//! assert_eq!(state, ProposalState::Passed);
//!
//! dao.execute(id).unwrap();
//! assert_eq!(dao.proposal(id).unwrap().state, ProposalState::Executed);
//! ```

#![deny(unsafe_code)]

pub mod condition;
pub mod config;
pub mod dao_core;
pub mod events;
pub mod extension;
pub mod handler;
pub mod membership;
pub mod proposal_store;
pub mod resource;
pub mod store;

// Re-export main types for convenience
pub use condition::{
    And, Condition, ConditionSpec, MembersThreshold, Or, RoleCount, RoleThreshold,
    SharedCondition,
};
pub use config::{DaoConfig, LoggingConfig, MemberConfig, ResourceConfig};
pub use dao_core::{instant_execute, DaoCore, DaoCoreBuilder, HandlerProvider};
pub use events::{EventSink, NoopEventSink, RecordingEventSink, TracingEventSink};
pub use extension::{
    Extension, ExtensionRegistry, MembersExtension, QueryOrigin, SharedExtension,
};
pub use handler::{typed_handler, ActionHandler, SharedHandler, TextHandler, TypedHandler};
pub use membership::{
    DirectoryLookups, HasRoleFn, InMemoryDirectory, IsMemberFn, MemberDirectory,
    MembersCountFn, RoleCountFn,
};
pub use proposal_store::ProposalStore;
pub use resource::{Resource, ResourcePolicy, ResourceStore};
pub use store::{KeyedStore, MemoryStore};
