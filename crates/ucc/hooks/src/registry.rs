use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::debug;

use crate::event::GovernanceEvent;
use crate::hook::{dispatch, GovernanceHook};

/// Ordered list of hooks. Registration order is dispatch order.
#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<Vec<Arc<dyn GovernanceHook>>>,
}

fn same_hook<H: GovernanceHook + ?Sized>(a: &Arc<dyn GovernanceHook>, b: &Arc<H>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook. Registering the same instance again is a no-op;
    /// returns whether the hook was added.
    pub fn register(&self, hook: Arc<dyn GovernanceHook>) -> bool {
        let mut hooks = self.hooks.write();
        if hooks.iter().any(|h| same_hook(h, &hook)) {
            return false;
        }
        hooks.push(hook);
        debug!(hooks = hooks.len(), "Hook registered");
        true
    }

    /// Remove a hook by identity. Returns whether it was registered.
    pub fn unregister<H: GovernanceHook + ?Sized>(&self, hook: &Arc<H>) -> bool {
        let mut hooks = self.hooks.write();
        match hooks.iter().position(|h| same_hook(h, hook)) {
            Some(index) => {
                hooks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.hooks.write().clear();
    }

    /// Snapshot of the registered hooks.
    pub fn hooks(&self) -> Vec<Arc<dyn GovernanceHook>> {
        self.hooks.read().clone()
    }

    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    /// Dispatch an event to every hook.
    ///
    /// Dispatch runs over a snapshot taken before the first callback, so a
    /// hook may emit follow-up events or change registrations while it runs.
    pub fn emit(&self, event: &GovernanceEvent) {
        let hooks = self.hooks();
        debug!(
            event_type = %event.event_type,
            use_case = %event.use_case_name,
            hooks = hooks.len(),
            "Emitting governance event"
        );
        for hook in &hooks {
            dispatch(hook.as_ref(), event);
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.len())
            .finish()
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<HookRegistry> = Arc::new(HookRegistry::new());
}

/// Process-wide default registry, for callers that do not wire their own.
pub fn global_registry() -> Arc<HookRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}
