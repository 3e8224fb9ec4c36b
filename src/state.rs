use std::sync::Arc;

use crate::auth::events::AuthEvents;
use crate::auth::oauth::AuthClient;
use crate::content::aggregator::ContentCatalog;
use crate::db::repository::ContentRepository;
use crate::models::user::AdminList;
use crate::search::history::SearchHistory;
use crate::storage::client::StorageClient;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub content_repo: Arc<dyn ContentRepository>,
    pub storage: Arc<dyn StorageClient>,
    /// Latest aggregate of all four categories.
    pub catalog: Arc<ContentCatalog>,
    pub history: Arc<SearchHistory>,
    /// The admin allow-list, injected from configuration.
    pub admins: Arc<AdminList>,
    pub auth_events: AuthEvents,
    /// `None` when Google sign-in is not configured.
    pub oauth: Option<Arc<AuthClient>>,
    pub demo_mode: bool,
}
