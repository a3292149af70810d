// crates/flexstake-ledger/src/sink.rs
//
// Event sinks: an ordered in-memory log, and a decorator that logs each
// committed event through `tracing` before forwarding it.

use tracing::info;

use flexstake_core::{EventSink, LedgerEvent};

/// Ordered, in-memory record of committed events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

/// Logs every event at `info` level, then hands it to the inner sink.
#[derive(Debug, Clone, Default)]
pub struct TracingSink<S> {
    inner: S,
}

impl<S: EventSink> TracingSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for TracingSink<S> {
    fn emit(&mut self, event: LedgerEvent) {
        match serde_json::to_string(&event) {
            Ok(body) => info!(event = event.name(), "{}", body),
            Err(_) => info!(event = event.name(), "{:?}", event),
        }
        self.inner.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_keeps_order() {
        let mut log = EventLog::new();
        log.emit(LedgerEvent::Paused);
        log.emit(LedgerEvent::Unpaused);
        assert_eq!(log.events(), &[LedgerEvent::Paused, LedgerEvent::Unpaused]);
        assert_eq!(log.drain().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_tracing_sink_forwards() {
        let mut sink = TracingSink::new(EventLog::new());
        sink.emit(LedgerEvent::Paused);
        assert_eq!(sink.inner().len(), 1);
    }
}
