//! Vote choices

use serde::{Deserialize, Serialize};

/// A single voter's choice on a proposal.
///
/// There is no "unset" variant: a voter who has not voted is simply absent
/// from the [`Ballot`](crate::Ballot).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Abstain,
    No,
    Yes,
}

impl Vote {
    pub fn is_yes(&self) -> bool {
        matches!(self, Vote::Yes)
    }
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Vote::Abstain => "abstain",
            Vote::No => "no",
            Vote::Yes => "yes",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Vote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abstain" => Ok(Vote::Abstain),
            "no" => Ok(Vote::No),
            "yes" => Ok(Vote::Yes),
            other => Err(format!("unknown vote: {other}")),
        }
    }
}
