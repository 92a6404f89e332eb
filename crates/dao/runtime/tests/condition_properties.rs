//! Property tests: conditions are pure, bounded, and monotone in Yes votes.

use dao_runtime::{
    And, Condition, DirectoryLookups, InMemoryDirectory, MembersThreshold, Or, RoleCount,
    RoleThreshold, SharedCondition,
};
use dao_types::{Ballot, RoleId, Vote, VoterId};
use proptest::prelude::*;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Voters v0..v5 are members (v0-v2 admin, v3-v4 CFO); v6 and v7 are not.
fn lookups() -> DirectoryLookups {
    let admin = RoleId::new("admin");
    let cfo = RoleId::new("CFO");
    let directory = InMemoryDirectory::with_members((0..6).map(|i| {
        let roles = match i {
            0..=2 => vec![admin.clone()],
            3 | 4 => vec![cfo.clone()],
            _ => Vec::new(),
        };
        (voter(i), roles)
    }));
    DirectoryLookups::from_directory(Arc::new(directory))
}

fn voter(i: usize) -> VoterId {
    VoterId::new(format!("v{i}"))
}

fn arb_vote() -> impl Strategy<Value = Vote> {
    prop_oneof![Just(Vote::Yes), Just(Vote::No), Just(Vote::Abstain)]
}

fn arb_ballot() -> impl Strategy<Value = Ballot> {
    prop::collection::vec((0usize..8, arb_vote()), 0..16).prop_map(|votes| {
        let mut ballot = Ballot::default();
        for (i, vote) in votes {
            ballot.vote(voter(i), vote);
        }
        ballot
    })
}

fn arb_threshold() -> impl Strategy<Value = f64> {
    (1u32..=100).prop_map(|p| p as f64 / 100.0)
}

/// One of the built-in leaves, bound to the shared directory.
fn arb_leaf() -> impl Strategy<Value = SharedCondition> {
    prop_oneof![
        arb_threshold().prop_map(|t| {
            Arc::new(MembersThreshold::from_lookups(t, &lookups()).unwrap()) as SharedCondition
        }),
        arb_threshold().prop_map(|t| {
            Arc::new(RoleThreshold::from_lookups(t, "admin", &lookups()).unwrap())
                as SharedCondition
        }),
        (0u64..4).prop_map(|n| {
            Arc::new(RoleCount::from_lookups(n, "CFO", &lookups())) as SharedCondition
        }),
    ]
}

fn arb_condition() -> impl Strategy<Value = SharedCondition> {
    arb_leaf().prop_recursive(3, 12, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|c| Arc::new(And::new(c)) as SharedCondition),
            prop::collection::vec(inner, 0..4)
                .prop_map(|c| Arc::new(Or::new(c)) as SharedCondition),
        ]
    })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Signal is always a fraction in [0, 1].
    #[test]
    fn signal_is_bounded(condition in arb_condition(), ballot in arb_ballot()) {
        let signal = condition.signal(&ballot);
        prop_assert!((0.0..=1.0).contains(&signal), "signal {} out of range", signal);
    }

    /// Evaluating twice gives the same answer and leaves the ballot alone.
    #[test]
    fn evaluation_is_pure(condition in arb_condition(), ballot in arb_ballot()) {
        let before = ballot.clone();
        let first = (condition.eval(&ballot), condition.signal(&ballot));
        let second = (condition.eval(&ballot), condition.signal(&ballot));
        prop_assert_eq!(first, second);
        prop_assert_eq!(ballot, before);
    }

    /// And is all-of, Or is any-of, with min / max signals.
    #[test]
    fn combinators_follow_children(
        children in prop::collection::vec(arb_leaf(), 0..5),
        ballot in arb_ballot(),
    ) {
        let evals: Vec<bool> = children.iter().map(|c| c.eval(&ballot)).collect();
        let signals: Vec<f64> = children.iter().map(|c| c.signal(&ballot)).collect();

        let and = And::new(children.clone());
        let or = Or::new(children);

        prop_assert_eq!(and.eval(&ballot), evals.iter().all(|e| *e));
        prop_assert_eq!(or.eval(&ballot), evals.iter().any(|e| *e));
        prop_assert_eq!(and.signal(&ballot), signals.iter().copied().fold(1.0, f64::min));
        prop_assert_eq!(or.signal(&ballot), signals.iter().copied().fold(0.0, f64::max));
    }

    /// Turning any vote into Yes never lowers the signal or un-passes a condition.
    #[test]
    fn yes_votes_are_monotone(
        condition in arb_condition(),
        ballot in arb_ballot(),
        extra in 0usize..8,
    ) {
        let mut more = ballot.clone();
        more.vote(voter(extra), Vote::Yes);

        prop_assert!(condition.signal(&more) >= condition.signal(&ballot));
        if condition.eval(&ballot) {
            prop_assert!(condition.eval(&more));
        }
    }

    /// Members threshold passes exactly when the Yes share of members reaches it.
    #[test]
    fn members_threshold_matches_share(threshold in arb_threshold(), ballot in arb_ballot()) {
        let condition = MembersThreshold::from_lookups(threshold, &lookups()).unwrap();
        let approvals = (0..6)
            .filter(|i| ballot.get(&voter(*i)) == Some(Vote::Yes))
            .count();
        prop_assert_eq!(condition.eval(&ballot), approvals as f64 / 6.0 >= threshold);
    }

    /// A threshold of exactly k/n is met by k Yes votes and missed by k-1.
    #[test]
    fn exact_boundary_passes(k in 1usize..=6) {
        let condition = MembersThreshold::from_lookups(k as f64 / 6.0, &lookups()).unwrap();
        let mut ballot = Ballot::default();
        for i in 0..k - 1 {
            ballot.vote(voter(i), Vote::Yes);
        }
        prop_assert!(!condition.eval(&ballot));

        ballot.vote(voter(k - 1), Vote::Yes);
        prop_assert!(condition.eval(&ballot));
    }
}
