//! Governance events emitted on state transitions

use crate::{ProposalId, Vote, VoterId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DaoEvent {
    DaoCreated {
        name: String,
    },
    ProposalCreated {
        id: ProposalId,
        proposer: VoterId,
        kind: String,
        title: String,
    },
    VoteCast {
        id: ProposalId,
        voter: VoterId,
        vote: Vote,
    },
    ProposalPassed {
        id: ProposalId,
    },
    ProposalExecuted {
        id: ProposalId,
        kind: String,
    },
    ResourceRegistered {
        kind: String,
        replaced: bool,
    },
    ResourceRemoved {
        kind: String,
    },
    ExtensionRegistered {
        path: String,
        version: String,
    },
}

impl DaoEvent {
    /// Short event name, as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            DaoEvent::DaoCreated { .. } => "dao_created",
            DaoEvent::ProposalCreated { .. } => "proposal_created",
            DaoEvent::VoteCast { .. } => "vote_cast",
            DaoEvent::ProposalPassed { .. } => "proposal_passed",
            DaoEvent::ProposalExecuted { .. } => "proposal_executed",
            DaoEvent::ResourceRegistered { .. } => "resource_registered",
            DaoEvent::ResourceRemoved { .. } => "resource_removed",
            DaoEvent::ExtensionRegistered { .. } => "extension_registered",
        }
    }
}

/// An event stamped with identity and time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: String,
    /// Name of the DAO that emitted the event
    pub dao: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: DaoEvent,
}

impl EventEnvelope {
    pub fn new(dao: impl Into<String>, event: DaoEvent) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            dao: dao.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_flat() {
        let envelope = EventEnvelope::new("council", DaoEvent::ProposalPassed { id: ProposalId(3) });
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["event"], "proposal_passed");
        assert_eq!(json["id"], 3);
        assert_eq!(json["dao"], "council");
        assert!(!envelope.event_id.is_empty());
    }
}
