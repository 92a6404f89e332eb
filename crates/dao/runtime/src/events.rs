//! Event sinks: fire-and-forget notification of state transitions

use dao_types::{DaoEvent, EventEnvelope};
use parking_lot::Mutex;
use tracing::info;

/// Receives governance events. Delivery is best-effort and never fails
/// the operation that produced the event.
pub trait EventSink: Send + Sync {
    fn emit(&self, envelope: EventEnvelope);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, envelope: EventEnvelope) {
        info!(
            target: "dao::events",
            dao = %envelope.dao,
            event = envelope.event.name(),
            event_id = %envelope.event_id,
            details = ?envelope.event,
            "Governance event"
        );
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _envelope: EventEnvelope) {}
}

/// Keeps events in memory, for hosts that replay them and for tests
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<EventEnvelope>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.events.lock().clone()
    }

    pub fn events(&self) -> Vec<DaoEvent> {
        self.envelopes().into_iter().map(|e| e.event).collect()
    }

    /// Event names in emission order
    pub fn names(&self) -> Vec<&'static str> {
        self.envelopes().iter().map(|e| e.event.name()).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, envelope: EventEnvelope) {
        self.events.lock().push(envelope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dao_types::ProposalId;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingEventSink::new();
        sink.emit(EventEnvelope::new(
            "council",
            DaoEvent::DaoCreated {
                name: "council".into(),
            },
        ));
        sink.emit(EventEnvelope::new(
            "council",
            DaoEvent::ProposalPassed { id: ProposalId(1) },
        ));

        assert_eq!(sink.names(), vec!["dao_created", "proposal_passed"]);
        assert_eq!(
            sink.events()[1],
            DaoEvent::ProposalPassed { id: ProposalId(1) }
        );
    }
}
