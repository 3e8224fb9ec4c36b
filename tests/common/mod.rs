use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use chrono::{Duration, Utc};

use courseboard::auth::events::AuthEvents;
use courseboard::content::aggregator::ContentCatalog;
use courseboard::db::memory::MemoryContentRepository;
use courseboard::db::repository::ContentRepository;
use courseboard::models::content::{Category, ContentItem};
use courseboard::models::user::AdminList;
use courseboard::search::history::SearchHistory;
use courseboard::state::AppState;
use courseboard::storage::client::StorageClient;
use courseboard::storage::memory::MemoryStorageClient;
use courseboard::{api, auth};

/// Email the test allow-list admits; matches the demo instructor account.
pub const ADMIN_EMAIL: &str = "instructor@demo.courseboard.dev";

/// In-memory application environment for integration tests.
///
/// Routes and state match the production wiring, with the in-memory
/// repository and storage standing in for MongoDB and S3.
pub struct TestEnv {
    pub router: Router,
    pub state: AppState,
    pub repo: Arc<dyn ContentRepository>,
    pub storage: Arc<dyn StorageClient>,
    _history_dir: tempfile::TempDir,
}

impl TestEnv {
    pub async fn start() -> Self {
        let repo: Arc<dyn ContentRepository> = Arc::new(MemoryContentRepository::new());
        let storage: Arc<dyn StorageClient> = Arc::new(MemoryStorageClient::new());
        let history_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let state = AppState {
            content_repo: repo.clone(),
            storage: storage.clone(),
            catalog: Arc::new(ContentCatalog::new()),
            history: Arc::new(SearchHistory::load(history_dir.path().join("history.json"))),
            admins: Arc::new(AdminList::from_csv(ADMIN_EMAIL)),
            auth_events: AuthEvents::new(),
            oauth: None,
            demo_mode: true,
        };

        let router = Router::new()
            .route("/", get(api::content::dashboard_handler))
            .route("/admin", get(api::content::admin_dashboard_handler))
            .route("/api/v1/content", get(api::content::list_content_handler))
            .route(
                "/api/v1/folders/{category}",
                get(api::content::folder_handler),
            )
            .route("/api/v1/upload", post(api::upload::upload_handler))
            .route(
                "/api/v1/files/{category}/{file}",
                get(api::upload::serve_file_handler),
            )
            .route("/api/v1/links", post(api::content::create_link_handler))
            .route(
                "/api/v1/announcements",
                post(api::content::create_announcement_handler),
            )
            .route(
                "/api/v1/content/{category}/{id}",
                delete(api::content::delete_content_handler),
            )
            .route("/api/v1/search", get(api::search::search_handler))
            .route(
                "/api/v1/search/history",
                get(api::search::history_handler).delete(api::search::clear_history_handler),
            )
            .route("/api/auth/login", get(auth::oauth::login_handler))
            .route("/api/auth/callback", get(auth::oauth::callback_handler))
            .route("/api/auth/me", get(auth::oauth::me_handler))
            .route("/api/auth/logout", post(auth::oauth::logout_handler))
            .route("/api/auth/demo-login", post(auth::demo::demo_login_handler))
            .with_state(state.clone());

        Self {
            router,
            state,
            repo,
            storage,
            _history_dir: history_dir,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .build(self.router.clone())
    }

    /// Helper: sign in a demo account; the session cookie sticks to the server.
    pub async fn login(&self, server: &axum_test::TestServer, username: &str) {
        server
            .post("/api/auth/demo-login")
            .json(&serde_json::json!({
                "username": username,
                "password": username,
            }))
            .await
            .assert_status_ok();
    }

    /// Helper: post an announcement via the API.
    pub async fn post_announcement(
        &self,
        server: &axum_test::TestServer,
        title: &str,
        content: &str,
    ) -> axum_test::TestResponse {
        server
            .post("/api/v1/announcements")
            .json(&serde_json::json!({ "title": title, "content": content }))
            .await
    }

    /// Helper: add a link via the API.
    pub async fn add_link(
        &self,
        server: &axum_test::TestServer,
        title: &str,
        url: &str,
    ) -> axum_test::TestResponse {
        server
            .post("/api/v1/links")
            .json(&serde_json::json!({ "title": title, "url": url }))
            .await
    }

    /// Helper: insert an item directly with a controlled date, then
    /// refresh the catalog so search and dashboards see it.
    pub async fn seed_item(&self, category: Category, name: &str, age_days: i64) -> ContentItem {
        let item = ContentItem {
            id: format!(
                "seed-{}-{}-{}",
                category,
                name.replace(' ', "-").to_lowercase(),
                age_days
            ),
            name: Some(name.to_string()),
            title: None,
            content: None,
            url: None,
            uploaded_by: "Prof X".to_string(),
            date: Utc::now() - Duration::days(age_days),
            due_date: None,
            category,
            file_name: None,
            file_url: None,
        };
        self.repo
            .insert(category, item.clone())
            .await
            .expect("Failed to seed item");
        self.refresh().await;
        item
    }

    /// Reload the content catalog from the repository.
    pub async fn refresh(&self) {
        self.state
            .catalog
            .refresh(self.state.content_repo.as_ref())
            .await;
    }
}
