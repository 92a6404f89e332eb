//! Ballot: the per-proposal record of votes

use crate::{Vote, VoterId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::ControlFlow;

/// One vote per voter for one proposal.
///
/// Keys are kept in a `BTreeMap` so iteration order is stable regardless of
/// the order votes were cast.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    votes: BTreeMap<VoterId, Vote>,
}

/// Per-choice counts over a ballot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes: usize,
    pub no: usize,
    pub abstain: usize,
}

impl VoteTally {
    pub fn total(&self) -> usize {
        self.yes + self.no + self.abstain
    }
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `vote` for `voter`, replacing any earlier vote.
    ///
    /// Returns the previous vote, if any.
    pub fn vote(&mut self, voter: VoterId, vote: Vote) -> Option<Vote> {
        self.votes.insert(voter, vote)
    }

    /// The recorded vote, or `None` if the voter has not voted.
    pub fn get(&self, voter: &VoterId) -> Option<Vote> {
        self.votes.get(voter).copied()
    }

    /// Number of distinct voters, abstentions included.
    pub fn total(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Visit every entry in voter order until `f` breaks.
    pub fn iterate<F>(&self, mut f: F)
    where
        F: FnMut(&VoterId, Vote) -> ControlFlow<()>,
    {
        for (voter, vote) in &self.votes {
            if f(voter, *vote).is_break() {
                break;
            }
        }
    }

    /// Iterator over entries in voter order
    pub fn iter(&self) -> impl Iterator<Item = (&VoterId, Vote)> {
        self.votes.iter().map(|(voter, vote)| (voter, *vote))
    }

    /// Voters whose recorded vote is `Yes`
    pub fn yes_voters(&self) -> impl Iterator<Item = &VoterId> {
        self.iter()
            .filter(|(_, vote)| vote.is_yes())
            .map(|(voter, _)| voter)
    }

    pub fn tally(&self) -> VoteTally {
        let mut tally = VoteTally::default();
        for vote in self.votes.values() {
            match vote {
                Vote::Yes => tally.yes += 1,
                Vote::No => tally.no += 1,
                Vote::Abstain => tally.abstain += 1,
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revote_overwrites() {
        let mut ballot = Ballot::new();
        let alice = VoterId::new("alice");

        assert_eq!(ballot.vote(alice.clone(), Vote::Yes), None);
        assert_eq!(ballot.vote(alice.clone(), Vote::No), Some(Vote::Yes));

        assert_eq!(ballot.total(), 1);
        assert_eq!(ballot.get(&alice), Some(Vote::No));
    }

    #[test]
    fn test_missing_voter_is_none() {
        let ballot = Ballot::new();
        assert_eq!(ballot.get(&VoterId::new("nobody")), None);
        assert!(ballot.is_empty());
    }

    #[test]
    fn test_abstain_counts_toward_total() {
        let mut ballot = Ballot::new();
        ballot.vote(VoterId::new("a"), Vote::Abstain);
        ballot.vote(VoterId::new("b"), Vote::Yes);

        assert_eq!(ballot.total(), 2);
        assert_eq!(
            ballot.tally(),
            VoteTally {
                yes: 1,
                no: 0,
                abstain: 1
            }
        );
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let mut ballot = Ballot::new();
        for name in ["carol", "alice", "bob"] {
            ballot.vote(VoterId::new(name), Vote::Yes);
        }

        let mut seen = Vec::new();
        ballot.iterate(|voter, _| {
            seen.push(voter.to_string());
            ControlFlow::Continue(())
        });
        assert_eq!(seen, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_iteration_stops_early() {
        let mut ballot = Ballot::new();
        for name in ["a", "b", "c"] {
            ballot.vote(VoterId::new(name), Vote::No);
        }

        let mut visited = 0;
        ballot.iterate(|_, _| {
            visited += 1;
            if visited == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(visited, 2);
    }
}
