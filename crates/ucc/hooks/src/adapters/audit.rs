//! Structured audit logger

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::event::{EventRecord, GovernanceEvent, GovernanceEventType};
use crate::hook::GovernanceHook;

type Sink = Box<dyn Fn(&EventRecord) + Send + Sync>;

/// Filter over audit records. Unset fields match everything; set fields
/// combine with AND.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub event_type: Option<GovernanceEventType>,
    pub use_case_name: Option<String>,
    /// Inclusive lower bound on the event timestamp.
    pub since: Option<DateTime<Utc>>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, event_type: GovernanceEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn use_case(mut self, name: impl Into<String>) -> Self {
        self.use_case_name = Some(name.into());
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn matches(&self, record: &EventRecord) -> bool {
        if let Some(event_type) = self.event_type {
            if record.event_type != event_type {
                return false;
            }
        }

        if let Some(ref name) = self.use_case_name {
            if &record.use_case_name != name {
                return false;
            }
        }

        if let Some(since) = self.since {
            if record.timestamp < since {
                return false;
            }
        }

        true
    }
}

/// Records every event it observes, in order.
///
/// An optional sink receives each record after it is appended, for forwarding
/// to an external system.
pub struct AuditLogger {
    log: RwLock<Vec<EventRecord>>,
    sink: Option<Sink>,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self {
            log: RwLock::new(Vec::new()),
            sink: None,
        }
    }

    pub fn with_sink<F>(sink: F) -> Self
    where
        F: Fn(&EventRecord) + Send + Sync + 'static,
    {
        Self {
            log: RwLock::new(Vec::new()),
            sink: Some(Box::new(sink)),
        }
    }

    /// All records in arrival order.
    pub fn entries(&self) -> Vec<EventRecord> {
        self.log.read().clone()
    }

    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }

    pub fn clear(&self) {
        self.log.write().clear();
    }

    pub fn query(&self, query: &AuditQuery) -> Vec<EventRecord> {
        self.log
            .read()
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect()
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl GovernanceHook for AuditLogger {
    fn on_event(&self, event: &GovernanceEvent) {
        let record = event.to_record();
        self.log.write().push(record.clone());
        if let Some(sink) = &self.sink {
            sink(&record);
        }
    }
}
