//! Resources: the binding of an action kind to a condition and a handler

use crate::condition::SharedCondition;
use crate::handler::SharedHandler;
use crate::store::{self, KeyedStore, MemoryStore};
use dao_types::{DaoError, DaoResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One unit of governance configuration
#[derive(Clone)]
pub struct Resource {
    pub condition: SharedCondition,
    pub handler: SharedHandler,
    pub display_name: String,
    pub description: String,
}

impl Resource {
    pub fn new(handler: SharedHandler, condition: SharedCondition) -> Self {
        let display_name = handler.kind().to_string();
        Self {
            condition,
            handler,
            display_name,
            description: String::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The action kind, taken from the handler
    pub fn kind(&self) -> &str {
        self.handler.kind()
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind())
            .field("condition", &self.condition.render())
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// What happens when a resource is registered for a kind that already has one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourcePolicy {
    /// The new binding replaces the old one
    #[default]
    Replace,
    /// Registration fails with `DuplicateResourceKind`
    Reject,
}

/// Resources keyed by action kind, at most one per kind
pub struct ResourceStore {
    resources: Box<dyn KeyedStore<String, Resource>>,
    policy: ResourcePolicy,
}

impl ResourceStore {
    pub fn new(policy: ResourcePolicy) -> Self {
        Self::with_backend(policy, Box::new(MemoryStore::new()))
    }

    pub fn with_backend(
        policy: ResourcePolicy,
        resources: Box<dyn KeyedStore<String, Resource>>,
    ) -> Self {
        Self { resources, policy }
    }

    pub fn policy(&self) -> ResourcePolicy {
        self.policy
    }

    /// Register a resource under its kind.
    ///
    /// Returns `true` if an existing binding was replaced.
    pub fn register(&mut self, resource: Resource) -> DaoResult<bool> {
        let kind = resource.kind().to_string();
        if self.policy == ResourcePolicy::Reject && self.resources.contains(&kind) {
            warn!(kind = %kind, "Rejected duplicate resource registration");
            return Err(DaoError::DuplicateResourceKind(kind));
        }
        let replaced = self.resources.set(kind.clone(), resource);
        debug!(kind = %kind, replaced, "Resource stored");
        Ok(replaced)
    }

    pub fn remove(&mut self, kind: &str) -> bool {
        self.resources.remove(&kind.to_string())
    }

    pub fn get(&self, kind: &str) -> Option<Resource> {
        self.resources.get(&kind.to_string())
    }

    /// Resolve the resource for `kind` or fail with `UnknownResourceKind`.
    pub fn resolve(&self, kind: &str) -> DaoResult<Resource> {
        self.get(kind)
            .ok_or_else(|| DaoError::UnknownResourceKind(kind.to_string()))
    }

    /// All resources in kind order
    pub fn list(&self) -> Vec<Resource> {
        store::values(self.resources.as_ref())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new(ResourcePolicy::default())
    }
}
