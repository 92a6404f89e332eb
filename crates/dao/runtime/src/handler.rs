//! Action handlers: the executable side of a resource
//!
//! Dispatch is a plain lookup by kind string; there is no fallback handler.
//! [`TypedHandler`] narrows the payload before business logic runs, so a
//! payload of the wrong shape fails with `PayloadMismatch` instead of
//! reaching the closure.

use dao_types::{Action, ActionPayload, DaoResult, TextProposal};
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::info;

/// Performs the side effect of one action kind
pub trait ActionHandler: Send + Sync {
    /// The single kind this handler is bound to
    fn kind(&self) -> &str;

    /// Run the side effect. Must fail on payloads it cannot interpret.
    fn execute(&self, action: &Action) -> DaoResult<()>;
}

/// Shared handle to any handler
pub type SharedHandler = Arc<dyn ActionHandler>;

/// Handler over a typed payload `P`
pub struct TypedHandler<P, F> {
    f: F,
    _payload: PhantomData<fn(P)>,
}

impl<P, F> TypedHandler<P, F>
where
    P: ActionPayload,
    F: Fn(P) -> DaoResult<()> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _payload: PhantomData,
        }
    }
}

impl<P, F> ActionHandler for TypedHandler<P, F>
where
    P: ActionPayload,
    F: Fn(P) -> DaoResult<()> + Send + Sync,
{
    fn kind(&self) -> &str {
        P::KIND
    }

    fn execute(&self, action: &Action) -> DaoResult<()> {
        let payload = action.decode::<P>()?;
        (self.f)(payload)
    }
}

/// Convenience constructor for a shared [`TypedHandler`]
pub fn typed_handler<P, F>(f: F) -> SharedHandler
where
    P: ActionPayload + 'static,
    F: Fn(P) -> DaoResult<()> + Send + Sync + 'static,
{
    Arc::new(TypedHandler::<P, F>::new(f))
}

/// Handler for [`TextProposal`]: records each adopted text
#[derive(Debug, Default)]
pub struct TextHandler {
    adopted: Mutex<Vec<String>>,
}

impl TextHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts adopted so far, oldest first
    pub fn adopted(&self) -> Vec<String> {
        self.adopted.lock().clone()
    }
}

impl ActionHandler for TextHandler {
    fn kind(&self) -> &str {
        TextProposal::KIND
    }

    fn execute(&self, action: &Action) -> DaoResult<()> {
        let text: TextProposal = action.decode()?;
        info!(length = text.body.len(), "Text proposal adopted");
        self.adopted.lock().push(text.body);
        Ok(())
    }
}
