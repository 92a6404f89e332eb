//! Scripted governance sessions
//!
//! A script is a TOML list of `[[steps]]`, each tagged with `step`:
//!
//! ```toml
//! [[steps]]
//! step = "propose"
//! proposer = "alice"
//! title = "Adopt charter"
//! kind = "gov/dao.text"
//! payload = { body = "We govern in the open." }
//!
//! [[steps]]
//! step = "vote"
//! proposal = 1
//! voter = "alice"
//! vote = "yes"
//! ```
//!
//! A failing step is recorded and the session continues.

use anyhow::Context;
use dao_runtime::DaoCore;
use dao_types::{Action, DaoError, ProposalId, ProposalRequest, Vote, VoterId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// A parsed session script
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("invalid session script")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents)
    }
}

/// One operation against the DAO
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Propose {
        proposer: VoterId,
        #[serde(flatten)]
        request: RequestSpec,
    },
    Vote {
        proposal: ProposalId,
        voter: VoterId,
        vote: Vote,
    },
    Execute {
        proposal: ProposalId,
    },
    Instant {
        caller: VoterId,
        #[serde(flatten)]
        request: RequestSpec,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Propose { .. } => "propose",
            Step::Vote { .. } => "vote",
            Step::Execute { .. } => "execute",
            Step::Instant { .. } => "instant",
        }
    }
}

/// Proposal fields shared by `propose` and `instant`
#[derive(Debug, Clone, Deserialize)]
pub struct RequestSpec {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: String,
    #[serde(default = "empty_payload")]
    pub payload: serde_json::Value,
}

fn empty_payload() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl RequestSpec {
    fn to_request(&self) -> ProposalRequest {
        ProposalRequest::new(
            self.title.clone(),
            self.description.clone(),
            Action::raw(self.kind.clone(), self.payload.clone()),
        )
    }
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub step: &'static str,
    pub ok: bool,
    pub detail: String,
}

/// Run every step in order against `dao`.
pub fn run(dao: &mut DaoCore, script: &Script) -> Vec<StepOutcome> {
    script
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let index = i + 1;
            let (ok, detail) = match apply(dao, step) {
                Ok(detail) => {
                    debug!(index, step = step.name(), %detail, "Step succeeded");
                    (true, detail)
                }
                Err(e) => {
                    warn!(index, step = step.name(), error = %e, "Step failed");
                    (false, e.to_string())
                }
            };
            StepOutcome {
                index,
                step: step.name(),
                ok,
                detail,
            }
        })
        .collect()
}

fn apply(dao: &mut DaoCore, step: &Step) -> anyhow::Result<String> {
    match step {
        Step::Propose { proposer, request } => {
            let id = dao.propose(proposer.clone(), request.to_request())?;
            Ok(format!("proposal #{id} created"))
        }
        Step::Vote {
            proposal,
            voter,
            vote,
        } => {
            let state = dao.vote(*proposal, voter.clone(), *vote)?;
            Ok(format!("{voter} voted {vote} on #{proposal}, now {state}"))
        }
        Step::Execute { proposal } => {
            dao.execute(*proposal)?;
            Ok(format!("proposal #{proposal} executed"))
        }
        Step::Instant { caller, request } => {
            match dao.instant_execute(caller.clone(), request.to_request()) {
                Ok(id) => Ok(format!("proposal #{id} instantly executed")),
                // the reported id belongs to an uncommitted draft
                Err(DaoError::ConditionNotMet { signal, .. }) => Err(anyhow::anyhow!(
                    "condition not met for {caller} (signal {signal:.2}), nothing stored"
                )),
                Err(e) => Err(e.into()),
            }
        }
    }
}
