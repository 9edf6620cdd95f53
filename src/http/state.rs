use crate::session::SessionRegistry;
use crate::storage::Storage;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active session tracking and teardown
    pub registry: SessionRegistry,

    /// Meetings, styles, transcripts
    pub storage: Arc<dyn Storage>,
}
