//! Error types for the governance engine

use crate::ProposalId;

/// Errors that can occur in DAO operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DaoError {
    #[error("Unknown proposal: {0}")]
    UnknownProposal(ProposalId),

    #[error("Proposal {0} has already been executed")]
    ProposalTerminal(ProposalId),

    #[error("Condition not met for proposal {id} (signal {signal:.2})")]
    ConditionNotMet { id: ProposalId, signal: f64 },

    #[error("No resource registered for action kind: {0}")]
    UnknownResourceKind(String),

    #[error("Payload mismatch for action kind {kind}: {reason}")]
    PayloadMismatch { kind: String, reason: String },

    #[error("Resource already registered for action kind: {0}")]
    DuplicateResourceKind(String),

    #[error("Extension not found: {0}")]
    ExtensionNotFound(String),

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Handler for {kind} failed: {reason}")]
    HandlerFailed { kind: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for DAO operations
pub type DaoResult<T> = Result<T, DaoError>;
