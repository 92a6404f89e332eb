//! Proposal store: every proposal of a DAO, keyed by sequential id

use crate::store::{self, KeyedStore, MemoryStore};
use dao_types::{DaoError, DaoResult, Proposal, ProposalId, ProposalRequest, VoterId};
use std::ops::ControlFlow;

/// Holds proposals and assigns their ids. Ids start at 1 and are never reused.
pub struct ProposalStore {
    proposals: Box<dyn KeyedStore<ProposalId, Proposal>>,
    /// `None` once `u64::MAX` has been assigned
    next_id: Option<ProposalId>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::with_backend(Box::new(MemoryStore::new()))
    }

    /// Wrap an existing backend, continuing after its highest id.
    pub fn with_backend(proposals: Box<dyn KeyedStore<ProposalId, Proposal>>) -> Self {
        let mut highest = None;
        proposals.iterate(&mut |id, _| {
            highest = Some(*id);
            ControlFlow::Continue(())
        });
        let next_id = match highest {
            Some(id) => id.next(),
            None => Some(ProposalId::FIRST),
        };
        Self { proposals, next_id }
    }

    /// Id the next created proposal will receive, `None` if ids are exhausted
    pub fn next_id(&self) -> Option<ProposalId> {
        self.next_id
    }

    fn require_next_id(&self) -> DaoResult<ProposalId> {
        self.next_id
            .ok_or_else(|| DaoError::Storage("proposal ids exhausted".into()))
    }

    /// Create and store an `Open` proposal with an empty ballot.
    pub fn create(&mut self, proposer: VoterId, request: ProposalRequest) -> DaoResult<Proposal> {
        let proposal = self.draft(proposer, request)?;
        self.proposals.set(proposal.id, proposal.clone());
        self.next_id = proposal.id.next();
        Ok(proposal)
    }

    /// Build the proposal `create` would store, without storing it or
    /// consuming its id.
    pub fn draft(&self, proposer: VoterId, request: ProposalRequest) -> DaoResult<Proposal> {
        Ok(Proposal::new(self.require_next_id()?, proposer, request))
    }

    /// Store a drafted proposal, consuming its id.
    pub fn commit_draft(&mut self, proposal: Proposal) -> DaoResult<()> {
        let expected = self.require_next_id()?;
        if proposal.id != expected {
            return Err(DaoError::Storage(format!(
                "draft {} is stale, next id is {}",
                proposal.id, expected
            )));
        }
        self.next_id = proposal.id.next();
        self.proposals.set(proposal.id, proposal);
        Ok(())
    }

    /// Snapshot of a proposal, or `UnknownProposal`
    pub fn get(&self, id: ProposalId) -> DaoResult<Proposal> {
        self.proposals
            .get(&id)
            .ok_or(DaoError::UnknownProposal(id))
    }

    /// Write back a modified snapshot.
    pub fn save(&mut self, proposal: Proposal) {
        self.proposals.set(proposal.id, proposal);
    }

    /// All proposals in id order
    pub fn list(&self) -> Vec<Proposal> {
        store::values(self.proposals.as_ref())
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}

impl Default for ProposalStore {
    fn default() -> Self {
        Self::new()
    }
}
