use std::sync::atomic::{AtomicU64, Ordering};

use crate::event::{EventRecord, GovernanceEvent};
use crate::hook::GovernanceHook;

type Callback = Box<dyn Fn(&EventRecord) + Send + Sync>;
type Filter = Box<dyn Fn(&GovernanceEvent) -> bool + Send + Sync>;

/// Forwards events to a webhook, SIEM or chat callback.
pub struct NotificationBridge {
    callback: Callback,
    filter: Option<Filter>,
    sent: AtomicU64,
}

impl NotificationBridge {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&EventRecord) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
            filter: None,
            sent: AtomicU64::new(0),
        }
    }

    /// Only forward events the predicate accepts.
    pub fn with_filter<P>(mut self, filter: P) -> Self
    where
        P: Fn(&GovernanceEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Events actually forwarded.
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

impl GovernanceHook for NotificationBridge {
    fn on_event(&self, event: &GovernanceEvent) {
        if let Some(filter) = &self.filter {
            if !filter(event) {
                return;
            }
        }
        (self.callback)(&event.to_record());
        self.sent.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::GovernanceEventType;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn forwards_everything_without_filter() {
        let got = Arc::new(Mutex::new(Vec::new()));
        let sink = got.clone();
        let bridge = NotificationBridge::new(move |r| sink.lock().push(r.description.clone()));
        bridge.on_event(&GovernanceEvent::new(GovernanceEventType::FlagRaised).with_description("x"));
        bridge.on_event(&GovernanceEvent::new(GovernanceEventType::Custom).with_description("y"));
        assert_eq!(bridge.sent_count(), 2);
        assert_eq!(*got.lock(), vec!["x", "y"]);
    }

    #[test]
    fn filter_rejects_and_count_skips() {
        let bridge = NotificationBridge::new(|_| {})
            .with_filter(|e| e.level == "HIGH" || e.level == "CRITICAL");
        bridge.on_event(&GovernanceEvent::new(GovernanceEventType::FlagRaised).with_level("LOW"));
        bridge.on_event(&GovernanceEvent::new(GovernanceEventType::FlagRaised).with_level("HIGH"));
        assert_eq!(bridge.sent_count(), 1);
    }
}
