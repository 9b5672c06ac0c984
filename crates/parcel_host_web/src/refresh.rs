//! htmx-backed list refresh.

use parcel_host::ListRefreshService;

use crate::htmx;

#[derive(Debug, Clone, Copy, Default)]
/// Refresh service that triggers an htmx event on the list element.
pub struct HtmxListRefresh;

impl ListRefreshService for HtmxListRefresh {
    fn refresh(&self, target: &str, event: &str) -> Result<(), String> {
        htmx::trigger(target, event)
    }
}
