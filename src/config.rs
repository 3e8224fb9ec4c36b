use std::path::PathBuf;

use crate::auth::demo::DEMO_INSTRUCTOR_EMAIL;
use crate::models::user::AdminList;

/// Service configuration, read from the environment at startup.
///
/// S3 and OIDC settings live with their clients (`S3StorageClient::from_env`,
/// `OidcConfig::from_env`); this struct covers the rest.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to (`BIND_ADDR`).
    pub bind_addr: String,
    /// MongoDB connection string (`MONGODB_URI`).
    pub mongodb_uri: String,
    /// MongoDB database name (`MONGODB_DATABASE`).
    pub mongodb_database: String,
    /// Admin allow-list (`ADMIN_EMAILS`, comma-separated). Injected here
    /// at startup; nothing else decides who is an admin.
    pub admins: AdminList,
    /// Where the search history file lives (`SEARCH_HISTORY_PATH`).
    pub history_path: PathBuf,
    /// Run without MongoDB/S3/Google, on seeded in-memory backends
    /// (`DEMO_MODE=true`).
    pub demo_mode: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let demo_mode = std::env::var("DEMO_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let mut admins = AdminList::from_csv(
            &std::env::var("ADMIN_EMAILS").unwrap_or_default(),
        );
        if admins.is_empty() {
            if demo_mode {
                admins = AdminList::from_csv(DEMO_INSTRUCTOR_EMAIL);
            } else {
                tracing::warn!("ADMIN_EMAILS is empty; no account can perform admin operations");
            }
        }

        Self {
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            mongodb_uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongodb_database: std::env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "courseboard".to_string()),
            admins,
            history_path: std::env::var("SEARCH_HISTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("search_history.json")),
            demo_mode,
        }
    }
}
