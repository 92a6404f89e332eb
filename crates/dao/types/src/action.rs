//! Actions: kind-tagged payloads executed by passed proposals
//!
//! An [`Action`] carries its payload as JSON so it can be stored and
//! rendered without knowing its shape. Each payload shape is declared once
//! with [`ActionPayload`]; handlers narrow back to the typed value through
//! [`Action::decode`], which turns every shape or kind mismatch into
//! [`DaoError::PayloadMismatch`].

use crate::{DaoError, DaoResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A typed payload bound to one globally unique action kind.
///
/// Kinds are namespaced paths by convention, e.g. `gov/dao.members.add`.
pub trait ActionPayload: Serialize + DeserializeOwned {
    const KIND: &'static str;
}

/// A governance action: kind plus opaque payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: String,
    pub payload: serde_json::Value,
}

impl Action {
    /// Tag a typed payload with its kind.
    pub fn new<P: ActionPayload>(payload: &P) -> DaoResult<Self> {
        let payload = serde_json::to_value(payload).map_err(|e| DaoError::PayloadMismatch {
            kind: P::KIND.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            kind: P::KIND.to_string(),
            payload,
        })
    }

    /// Build an action from an already-encoded payload.
    pub fn raw(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Narrow the payload to `P`.
    pub fn decode<P: ActionPayload>(&self) -> DaoResult<P> {
        if self.kind != P::KIND {
            return Err(DaoError::PayloadMismatch {
                kind: self.kind.clone(),
                reason: format!("expected kind {}", P::KIND),
            });
        }
        serde_json::from_value(self.payload.clone()).map_err(|e| DaoError::PayloadMismatch {
            kind: self.kind.clone(),
            reason: e.to_string(),
        })
    }
}

/// Signalling proposal: adopting a text carries no side effect of its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextProposal {
    pub body: String,
}

impl ActionPayload for TextProposal {
    const KIND: &'static str = "gov/dao.text";
}
