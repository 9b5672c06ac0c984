//! List-refresh service contract and adapters.

use std::cell::RefCell;

/// Host service that asks an external list view to re-fetch after an upload completes.
pub trait ListRefreshService {
    /// Fires `event` at the element identified by `target`.
    fn refresh(&self, target: &str, event: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Refresh service for pages without a list view.
pub struct NoopListRefresh;

impl ListRefreshService for NoopListRefresh {
    fn refresh(&self, _target: &str, _event: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Default)]
/// Recording refresh service for tests.
pub struct MemoryListRefresh {
    calls: RefCell<Vec<(String, String)>>,
}

impl MemoryListRefresh {
    /// Returns `(target, event)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl ListRefreshService for MemoryListRefresh {
    fn refresh(&self, target: &str, event: &str) -> Result<(), String> {
        self.calls
            .borrow_mut()
            .push((target.to_string(), event.to_string()));
        Ok(())
    }
}
