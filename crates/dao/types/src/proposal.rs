//! Proposals and their lifecycle state

use crate::{Action, Ballot, ProposalId, VoterId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the caller asks the DAO to do. Immutable once submitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposalRequest {
    pub title: String,
    pub description: String,
    pub action: Action,
}

impl ProposalRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>, action: Action) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            action,
        }
    }
}

/// Lifecycle state of a proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProposalState {
    /// Collecting votes; condition not yet observed satisfied
    #[default]
    Open,
    /// Condition satisfied; eligible for execution
    Passed,
    /// Handler ran successfully. Terminal.
    Executed,
}

impl ProposalState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProposalState::Executed)
    }
}

impl std::fmt::Display for ProposalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProposalState::Open => "open",
            ProposalState::Passed => "passed",
            ProposalState::Executed => "executed",
        };
        f.write_str(s)
    }
}

/// A proposal tracked by a DAO
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub request: ProposalRequest,
    pub ballot: Ballot,
    pub state: ProposalState,
    /// Who submitted the request
    pub proposer: VoterId,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
}

impl Proposal {
    pub fn new(id: ProposalId, proposer: VoterId, request: ProposalRequest) -> Self {
        Self {
            id,
            request,
            ballot: Ballot::new(),
            state: ProposalState::Open,
            proposer,
            created_at: Utc::now(),
            executed_at: None,
        }
    }

    /// Kind of the action this proposal would execute
    pub fn kind(&self) -> &str {
        &self.request.action.kind
    }

    pub fn action(&self) -> &Action {
        &self.request.action
    }
}
