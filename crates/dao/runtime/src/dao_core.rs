//! DAO Core: proposal orchestration
//!
//! [`DaoCore`] is the only component with write access to the resource and
//! proposal stores. It drives every proposal through
//! `Open → Passed → Executed`:
//!
//! - `propose` binds a request to the resource registered for its action
//!   kind and stores an `Open` proposal.
//! - `vote` records a ballot entry and, while the proposal is `Open`,
//!   re-evaluates the resource's condition; a satisfied condition moves it
//!   to `Passed` immediately.
//! - `execute` re-resolves the resource, re-checks the condition against
//!   the current ballot, runs the handler, and only then marks the proposal
//!   `Executed`.
//!
//! Every operation works on a snapshot and writes back only after all
//! fallible steps succeeded, so a failed call leaves both stores unchanged.

use crate::config::DaoConfig;
use crate::events::{EventSink, TracingEventSink};
use crate::extension::{ExtensionRegistry, MembersExtension, QueryOrigin, SharedExtension};
use crate::handler::SharedHandler;
use crate::membership::{DirectoryLookups, MemberDirectory};
use crate::proposal_store::ProposalStore;
use crate::resource::{Resource, ResourcePolicy, ResourceStore};
use crate::store::KeyedStore;
use chrono::Utc;
use dao_types::{
    DaoError, DaoEvent, DaoResult, EventEnvelope, ExtensionInfo, Proposal, ProposalId,
    ProposalRequest, ProposalState, Vote, VoterId,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Supplies the handler for a configured action kind
pub type HandlerProvider<'a> = &'a dyn Fn(&str) -> Option<SharedHandler>;

/// The governed entity: Propose / Vote / Execute plus resource and
/// extension management
pub struct DaoCore {
    name: String,
    description: String,
    resources: ResourceStore,
    proposals: ProposalStore,
    extensions: ExtensionRegistry,
    events: Arc<dyn EventSink>,
}

/// Step-by-step construction of a [`DaoCore`]
pub struct DaoCoreBuilder {
    name: String,
    description: String,
    policy: ResourcePolicy,
    events: Arc<dyn EventSink>,
    resource_backend: Option<Box<dyn KeyedStore<String, Resource>>>,
    proposal_backend: Option<Box<dyn KeyedStore<ProposalId, Proposal>>>,
    resources: Vec<Resource>,
    extensions: Vec<SharedExtension>,
}

impl DaoCoreBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            policy: ResourcePolicy::default(),
            events: Arc::new(TracingEventSink),
            resource_backend: None,
            proposal_backend: None,
            resources: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_resource_policy(mut self, policy: ResourcePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    pub fn with_resource_backend(mut self, backend: Box<dyn KeyedStore<String, Resource>>) -> Self {
        self.resource_backend = Some(backend);
        self
    }

    pub fn with_proposal_backend(mut self, backend: Box<dyn KeyedStore<ProposalId, Proposal>>) -> Self {
        self.proposal_backend = Some(backend);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_extension(mut self, extension: SharedExtension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Build the DAO, registering queued resources and extensions in order.
    pub fn build(self) -> DaoResult<DaoCore> {
        let resources = match self.resource_backend {
            Some(backend) => ResourceStore::with_backend(self.policy, backend),
            None => ResourceStore::new(self.policy),
        };
        let proposals = match self.proposal_backend {
            Some(backend) => ProposalStore::with_backend(backend),
            None => ProposalStore::new(),
        };

        let mut core = DaoCore {
            name: self.name,
            description: self.description,
            resources,
            proposals,
            extensions: ExtensionRegistry::new(),
            events: self.events,
        };

        info!(dao = %core.name, policy = ?core.resources.policy(), "DAO created");
        core.emit(DaoEvent::DaoCreated {
            name: core.name.clone(),
        });

        for resource in self.resources {
            core.register_resource(resource)?;
        }
        for extension in self.extensions {
            core.set_extension(extension);
        }
        Ok(core)
    }
}

impl DaoCore {
    pub fn builder(name: impl Into<String>) -> DaoCoreBuilder {
        DaoCoreBuilder::new(name)
    }

    /// Build a DAO from configuration.
    ///
    /// Conditions are bound to `directory`; `handlers` supplies the handler
    /// for every configured kind and must return one whose `kind()` matches.
    pub fn from_config(
        config: &DaoConfig,
        directory: Arc<dyn MemberDirectory>,
        handlers: HandlerProvider<'_>,
        events: Arc<dyn EventSink>,
    ) -> DaoResult<Self> {
        config.validate()?;
        let lookups = DirectoryLookups::from_directory(directory);

        let mut builder = DaoCoreBuilder::new(config.name.clone())
            .with_description(config.description.clone())
            .with_resource_policy(config.resource_policy)
            .with_event_sink(events);

        for entry in &config.resources {
            let handler = handlers(entry.kind.as_str()).ok_or_else(|| {
                DaoError::Config(format!("no handler available for kind {}", entry.kind))
            })?;
            if handler.kind() != entry.kind {
                return Err(DaoError::Config(format!(
                    "handler for {} is bound to {}",
                    entry.kind,
                    handler.kind()
                )));
            }
            let condition = entry.condition.build(&lookups)?;
            let mut resource =
                Resource::new(handler, condition).with_description(entry.description.clone());
            if let Some(name) = &entry.display_name {
                resource = resource.with_display_name(name.clone());
            }
            builder = builder.with_resource(resource);
        }

        if config.members_extension {
            builder = builder.with_extension(Arc::new(MembersExtension::new(
                lookups.is_member.clone(),
                lookups.members_count.clone(),
            )));
        }

        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    // --- Proposal lifecycle ---

    /// Create an `Open` proposal for `request`.
    ///
    /// Fails with `UnknownResourceKind` if no resource is registered for the
    /// action kind; in that case no proposal is created and no id consumed.
    pub fn propose(&mut self, proposer: VoterId, request: ProposalRequest) -> DaoResult<ProposalId> {
        let kind = request.action.kind.clone();
        if let Err(e) = self.resources.resolve(&kind) {
            warn!(dao = %self.name, kind = %kind, proposer = %proposer, "Proposal rejected: no resource");
            return Err(e);
        }

        let proposal = self.proposals.create(proposer, request)?;
        info!(
            dao = %self.name,
            proposal = %proposal.id,
            kind = %kind,
            proposer = %proposal.proposer,
            "Proposal created"
        );
        self.emit(DaoEvent::ProposalCreated {
            id: proposal.id,
            proposer: proposal.proposer.clone(),
            kind,
            title: proposal.request.title.clone(),
        });
        Ok(proposal.id)
    }

    /// Record `vote` for `voter` and return the resulting state.
    ///
    /// An `Open` proposal whose condition is now satisfied becomes `Passed`.
    /// Votes on a `Passed` proposal are recorded without further effect.
    pub fn vote(&mut self, id: ProposalId, voter: VoterId, vote: Vote) -> DaoResult<ProposalState> {
        let mut proposal = self.proposals.get(id)?;
        if proposal.state.is_terminal() {
            warn!(dao = %self.name, proposal = %id, voter = %voter, "Vote on executed proposal");
            return Err(DaoError::ProposalTerminal(id));
        }

        let previous = proposal.ballot.vote(voter.clone(), vote);
        debug!(
            dao = %self.name,
            proposal = %id,
            voter = %voter,
            vote = %vote,
            previous = ?previous,
            total = proposal.ballot.total(),
            "Vote recorded"
        );

        let mut passed = false;
        if proposal.state == ProposalState::Open {
            match self.resources.get(proposal.kind()) {
                Some(resource) => {
                    if resource.condition.eval(&proposal.ballot) {
                        proposal.state = ProposalState::Passed;
                        passed = true;
                    }
                }
                None => warn!(
                    dao = %self.name,
                    proposal = %id,
                    kind = %proposal.kind(),
                    "No resource bound; vote recorded without evaluation"
                ),
            }
        }

        let state = proposal.state;
        self.proposals.save(proposal);

        self.emit(DaoEvent::VoteCast { id, voter, vote });
        if passed {
            info!(dao = %self.name, proposal = %id, "Proposal passed");
            self.emit(DaoEvent::ProposalPassed { id });
        }
        Ok(state)
    }

    /// Run the proposal's action and mark it `Executed`.
    ///
    /// The resource is resolved at call time and its condition re-checked
    /// against the current ballot, whatever the stored state. A handler
    /// failure is returned as-is and leaves the proposal untouched.
    pub fn execute(&mut self, id: ProposalId) -> DaoResult<()> {
        let mut proposal = self.proposals.get(id)?;
        if proposal.state.is_terminal() {
            warn!(dao = %self.name, proposal = %id, "Proposal already executed");
            return Err(DaoError::ProposalTerminal(id));
        }

        let resource = self.resources.resolve(proposal.kind())?;
        if !resource.condition.eval(&proposal.ballot) {
            let signal = resource.condition.signal(&proposal.ballot);
            warn!(dao = %self.name, proposal = %id, signal, "Execution refused: condition not met");
            return Err(DaoError::ConditionNotMet { id, signal });
        }

        if let Err(e) = resource.handler.execute(proposal.action()) {
            warn!(dao = %self.name, proposal = %id, kind = %proposal.kind(), error = %e, "Handler failed");
            return Err(e);
        }

        let was_open = proposal.state == ProposalState::Open;
        proposal.state = ProposalState::Executed;
        proposal.executed_at = Some(Utc::now());
        let kind = proposal.kind().to_string();
        self.proposals.save(proposal);

        if was_open {
            self.emit(DaoEvent::ProposalPassed { id });
        }
        info!(dao = %self.name, proposal = %id, kind = %kind, "Proposal executed");
        self.emit(DaoEvent::ProposalExecuted { id, kind });
        Ok(())
    }

    /// Propose, vote `Yes` as `caller`, and execute, as one call.
    ///
    /// Nothing is stored unless every step succeeds: the proposal is
    /// drafted, voted, and executed off-store and committed already
    /// `Executed`.
    ///
    /// On failure no id is consumed. `ConditionNotMet { id, .. }` then
    /// carries the id the draft would have received, which names no stored
    /// proposal and is handed to the next one created.
    pub fn instant_execute(
        &mut self,
        caller: VoterId,
        request: ProposalRequest,
    ) -> DaoResult<ProposalId> {
        let resource = self.resources.resolve(&request.action.kind)?;

        let mut proposal = self.proposals.draft(caller.clone(), request)?;
        let id = proposal.id;
        proposal.ballot.vote(caller.clone(), Vote::Yes);

        if !resource.condition.eval(&proposal.ballot) {
            let signal = resource.condition.signal(&proposal.ballot);
            warn!(dao = %self.name, caller = %caller, draft = %id, signal, "Instant execution refused: condition not met");
            return Err(DaoError::ConditionNotMet { id, signal });
        }
        if let Err(e) = resource.handler.execute(proposal.action()) {
            warn!(dao = %self.name, caller = %caller, kind = %proposal.kind(), error = %e, "Handler failed");
            return Err(e);
        }

        proposal.state = ProposalState::Executed;
        proposal.executed_at = Some(Utc::now());
        let kind = proposal.kind().to_string();
        let title = proposal.request.title.clone();
        self.proposals.commit_draft(proposal)?;

        info!(dao = %self.name, proposal = %id, kind = %kind, caller = %caller, "Proposal instantly executed");
        self.emit(DaoEvent::ProposalCreated {
            id,
            proposer: caller.clone(),
            kind: kind.clone(),
            title,
        });
        self.emit(DaoEvent::VoteCast {
            id,
            voter: caller,
            vote: Vote::Yes,
        });
        self.emit(DaoEvent::ProposalPassed { id });
        self.emit(DaoEvent::ProposalExecuted { id, kind });
        Ok(id)
    }

    // --- Proposal queries ---

    pub fn proposal(&self, id: ProposalId) -> DaoResult<Proposal> {
        self.proposals.get(id)
    }

    /// All proposals in id order
    pub fn proposals(&self) -> Vec<Proposal> {
        self.proposals.list()
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Current progress of a proposal under its resource's condition
    pub fn proposal_signal(&self, id: ProposalId) -> DaoResult<f64> {
        let proposal = self.proposals.get(id)?;
        let resource = self.resources.resolve(proposal.kind())?;
        Ok(resource.condition.signal(&proposal.ballot))
    }

    /// One-line summary with the condition rendered against current votes
    pub fn render_proposal(&self, id: ProposalId) -> DaoResult<String> {
        let proposal = self.proposals.get(id)?;
        let resource = self.resources.resolve(proposal.kind())?;
        Ok(format!(
            "#{} {} [{}] {}",
            proposal.id,
            proposal.request.title,
            proposal.state,
            resource.condition.render_with_votes(&proposal.ballot)
        ))
    }

    // --- Resources ---

    /// Register a resource under its kind, subject to the resource policy.
    ///
    /// Returns `true` if an existing binding was replaced.
    pub fn register_resource(&mut self, resource: Resource) -> DaoResult<bool> {
        let kind = resource.kind().to_string();
        let condition = resource.condition.render();
        let replaced = self.resources.register(resource)?;
        info!(dao = %self.name, kind = %kind, condition = %condition, replaced, "Resource registered");
        self.emit(DaoEvent::ResourceRegistered { kind, replaced });
        Ok(replaced)
    }

    /// Remove the resource for `kind`. Returns `true` if it existed.
    pub fn remove_resource(&mut self, kind: &str) -> bool {
        let removed = self.resources.remove(kind);
        if removed {
            info!(dao = %self.name, kind = %kind, "Resource removed");
            self.emit(DaoEvent::ResourceRemoved {
                kind: kind.to_string(),
            });
        }
        removed
    }

    pub fn resource(&self, kind: &str) -> Option<Resource> {
        self.resources.get(kind)
    }

    /// All resources in kind order
    pub fn resources(&self) -> Vec<Resource> {
        self.resources.list()
    }

    // --- Extensions ---

    /// Register or replace an extension. Returns `true` if replaced.
    pub fn set_extension(&mut self, extension: SharedExtension) -> bool {
        let info = extension.info();
        let replaced = self.extensions.set(extension);
        self.emit(DaoEvent::ExtensionRegistered {
            path: info.path,
            version: info.version,
        });
        replaced
    }

    pub fn remove_extension(&mut self, path: &str) -> bool {
        self.extensions.remove(path)
    }

    pub fn extension(&self, path: &str) -> Option<SharedExtension> {
        self.extensions.get(path)
    }

    pub fn require_extension(&self, path: &str) -> DaoResult<SharedExtension> {
        self.extensions.require(path)
    }

    /// Extension metadata in path order
    pub fn extensions_list(&self) -> Vec<ExtensionInfo> {
        self.extensions.list()
    }

    pub fn query_extension(
        &self,
        query_path: &str,
        args: &str,
        origin: QueryOrigin,
    ) -> DaoResult<serde_json::Value> {
        self.extensions.query(query_path, args, origin)
    }

    fn emit(&self, event: DaoEvent) {
        self.events.emit(EventEnvelope::new(self.name.clone(), event));
    }
}

/// Propose `request`, vote `Yes` as `caller`, and execute it, as one call.
pub fn instant_execute(
    dao: &mut DaoCore,
    caller: VoterId,
    request: ProposalRequest,
) -> DaoResult<ProposalId> {
    dao.instant_execute(caller, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{And, MembersThreshold};
    use crate::events::RecordingEventSink;
    use crate::handler::TextHandler;
    use crate::membership::InMemoryDirectory;
    use dao_types::{Action, TextProposal};

    fn setup() -> (DaoCore, Arc<RecordingEventSink>, Arc<TextHandler>) {
        let directory = Arc::new(InMemoryDirectory::with_members([
            (VoterId::new("m1"), Vec::new()),
            (VoterId::new("m2"), Vec::new()),
            (VoterId::new("m3"), Vec::new()),
        ]));
        let lookups = DirectoryLookups::from_directory(directory);
        let sink = Arc::new(RecordingEventSink::new());
        let handler = Arc::new(TextHandler::new());

        let core = DaoCore::builder("council")
            .with_event_sink(sink.clone())
            .with_resource(Resource::new(
                handler.clone(),
                Arc::new(MembersThreshold::from_lookups(0.6, &lookups).unwrap()),
            ))
            .build()
            .unwrap();
        (core, sink, handler)
    }

    fn text(body: &str) -> ProposalRequest {
        let action = Action::new(&TextProposal { body: body.into() }).unwrap();
        ProposalRequest::new(body, "", action)
    }

    #[test]
    fn test_propose_starts_open() {
        let (mut core, sink, _) = setup();
        let id = core.propose(VoterId::new("m1"), text("charter")).unwrap();

        let proposal = core.proposal(id).unwrap();
        assert_eq!(proposal.id, ProposalId(1));
        assert_eq!(proposal.state, ProposalState::Open);
        assert_eq!(
            sink.names(),
            vec!["dao_created", "resource_registered", "proposal_created"]
        );
    }

    #[test]
    fn test_vote_on_unknown_proposal() {
        let (mut core, _, _) = setup();
        assert_eq!(
            core.vote(ProposalId(7), VoterId::new("m1"), Vote::Yes)
                .unwrap_err(),
            DaoError::UnknownProposal(ProposalId(7))
        );
    }

    #[test]
    fn test_votes_after_pass_are_recorded() {
        let (mut core, _, _) = setup();
        let id = core.propose(VoterId::new("m1"), text("charter")).unwrap();
        core.vote(id, VoterId::new("m1"), Vote::Yes).unwrap();
        assert_eq!(
            core.vote(id, VoterId::new("m2"), Vote::Yes).unwrap(),
            ProposalState::Passed
        );
        assert_eq!(
            core.vote(id, VoterId::new("m3"), Vote::No).unwrap(),
            ProposalState::Passed
        );
        assert_eq!(core.proposal(id).unwrap().ballot.total(), 3);
    }

    #[test]
    fn test_vote_on_executed_is_terminal() {
        let (mut core, _, _) = setup();
        let id = core.propose(VoterId::new("m1"), text("charter")).unwrap();
        core.vote(id, VoterId::new("m1"), Vote::Yes).unwrap();
        core.vote(id, VoterId::new("m2"), Vote::Yes).unwrap();
        core.execute(id).unwrap();

        assert_eq!(
            core.vote(id, VoterId::new("m3"), Vote::Yes).unwrap_err(),
            DaoError::ProposalTerminal(id)
        );
    }

    #[test]
    fn test_render_proposal() {
        let (mut core, _, _) = setup();
        let id = core.propose(VoterId::new("m1"), text("charter")).unwrap();
        core.vote(id, VoterId::new("m1"), Vote::Yes).unwrap();

        assert_eq!(
            core.render_proposal(id).unwrap(),
            "#1 charter [open] 60% of members (1/3 yes, signal 0.33)"
        );
    }

    #[test]
    fn test_instant_execute_commits_only_on_success() {
        let (mut core, _, handler) = setup();

        let err = instant_execute(&mut core, VoterId::new("m1"), text("solo")).unwrap_err();
        match err {
            DaoError::ConditionNotMet { id, .. } => {
                assert_eq!(id, ProposalId(1));
                assert!(core.proposal(id).is_err());
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(core.proposal_count(), 0);

        core.register_resource(Resource::new(handler.clone(), Arc::new(And::default())))
            .unwrap();
        let id = instant_execute(&mut core, VoterId::new("m1"), text("solo")).unwrap();

        assert_eq!(id, ProposalId(1));
        let proposal = core.proposal(id).unwrap();
        assert_eq!(proposal.state, ProposalState::Executed);
        assert_eq!(proposal.ballot.get(&VoterId::new("m1")), Some(Vote::Yes));
        assert_eq!(handler.adopted(), vec!["solo".to_string()]);
    }

    #[test]
    fn test_members_extension_from_config() {
        let config = DaoConfig::new("council").with_member("alice", &["admin"]);
        let directory: Arc<dyn MemberDirectory> = Arc::new(config.directory());
        let core = DaoCore::from_config(
            &config,
            directory,
            &|_: &str| None::<SharedHandler>,
            Arc::new(RecordingEventSink::new()),
        )
        .unwrap();

        let list = core.extensions_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].path, MembersExtension::PATH);
        assert_eq!(
            core.query_extension("members", "alice", QueryOrigin::External)
                .unwrap(),
            serde_json::json!({ "member": true })
        );
        assert!(matches!(
            core.require_extension("gov/dao/unknown"),
            Err(DaoError::ExtensionNotFound(_))
        ));
    }
}
