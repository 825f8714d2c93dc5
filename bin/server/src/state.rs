//! Shared application state.

use crate::service::WorkflowService;
use almanac_core::SiteId;

/// State shared by all request handlers.
pub struct AppState {
    /// Workflow operations.
    pub service: WorkflowService,
    /// Site used when a request does not name one.
    pub default_site_id: SiteId,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(service: WorkflowService, default_site_id: SiteId) -> Self {
        Self {
            service,
            default_site_id,
        }
    }
}
