//! Handlers available to a simulated DAO

use dao_runtime::{ActionHandler, SharedHandler, TextHandler};
use dao_types::{Action, ActionPayload, DaoError, DaoResult, TextProposal};
use std::sync::Arc;
use tracing::info;

/// Stand-in for host-specific actions: accepts any object payload and logs it
#[derive(Debug, Clone)]
pub struct LoggingHandler {
    kind: String,
}

impl LoggingHandler {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl ActionHandler for LoggingHandler {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn execute(&self, action: &Action) -> DaoResult<()> {
        if action.kind != self.kind {
            return Err(DaoError::PayloadMismatch {
                kind: action.kind.clone(),
                reason: format!("handler is bound to {}", self.kind),
            });
        }
        let fields = action.payload.as_object().ok_or_else(|| DaoError::PayloadMismatch {
            kind: self.kind.clone(),
            reason: "payload must be an object".into(),
        })?;
        info!(kind = %self.kind, fields = fields.len(), payload = %action.payload, "Action performed");
        Ok(())
    }
}

/// Text proposals are adopted by [`TextHandler`]; any other kind is logged.
pub fn provider(kind: &str) -> Option<SharedHandler> {
    if kind == TextProposal::KIND {
        return Some(Arc::new(TextHandler::new()));
    }
    Some(Arc::new(LoggingHandler::new(kind)))
}
