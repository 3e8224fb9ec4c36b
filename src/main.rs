#[tokio::main]
async fn main() {
    use axum::routing::{delete, get, post};
    use axum::Router;
    use courseboard::auth::config::OidcConfig;
    use courseboard::auth::events::{AuthEvent, AuthEvents};
    use courseboard::auth::oauth::AuthClient;
    use courseboard::config::AppConfig;
    use courseboard::content::aggregator::ContentCatalog;
    use courseboard::db::memory::MemoryContentRepository;
    use courseboard::db::repository::{ContentRepository, MongoContentRepository};
    use courseboard::search::history::SearchHistory;
    use courseboard::storage::client::{S3StorageClient, StorageClient};
    use courseboard::storage::memory::MemoryStorageClient;
    use courseboard::{api, auth, demo_seeder};
    use std::sync::Arc;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courseboard=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Courseboard server...");

    let config = AppConfig::from_env();

    // Content and blob backends
    let (content_repo, storage): (Arc<dyn ContentRepository>, Arc<dyn StorageClient>) =
        if config.demo_mode {
            tracing::info!("Demo mode: using in-memory repository and storage");
            (
                Arc::new(MemoryContentRepository::new()),
                Arc::new(MemoryStorageClient::new()),
            )
        } else {
            let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri)
                .await
                .expect("Failed to connect to MongoDB");
            let mongo_db = mongo_client.database(&config.mongodb_database);
            tracing::info!("Connected to MongoDB at {}", config.mongodb_uri);

            let storage = S3StorageClient::from_env()
                .await
                .expect("Failed to initialize S3 client");
            tracing::info!("S3 storage client initialized");

            (Arc::new(MongoContentRepository::new(mongo_db)), Arc::new(storage))
        };

    // Google sign-in (optional; demo mode uses the demo login instead)
    let oauth = if config.demo_mode || !OidcConfig::is_configured() {
        if !config.demo_mode {
            tracing::warn!("OIDC not configured; Google sign-in is disabled");
        }
        None
    } else {
        let oidc = OidcConfig::from_env().expect("Incomplete OIDC configuration");
        let client = AuthClient::discover(oidc)
            .await
            .expect("OIDC discovery failed");
        tracing::info!("OIDC client initialized");
        Some(Arc::new(client))
    };

    // Auth activity log: the one standing subscription to the event stream
    let auth_events = AuthEvents::new();
    let mut auth_activity = auth_events.subscribe();
    tokio::spawn(async move {
        while let Some(event) = auth_activity.next().await {
            match event {
                AuthEvent::SignedIn(user) => {
                    tracing::info!(email = %user.email, admin = user.is_admin, "user signed in");
                }
                AuthEvent::SignedOut { uid } => {
                    tracing::info!(%uid, "user signed out");
                }
            }
        }
    });

    // Build application state
    let state = courseboard::state::AppState {
        content_repo,
        storage,
        catalog: Arc::new(ContentCatalog::new()),
        history: Arc::new(SearchHistory::load(&config.history_path)),
        admins: Arc::new(config.admins.clone()),
        auth_events,
        oauth,
        demo_mode: config.demo_mode,
    };

    if config.demo_mode {
        demo_seeder::seed_demo_content(state.content_repo.as_ref(), state.storage.as_ref()).await;
    }
    state.catalog.refresh(state.content_repo.as_ref()).await;

    // Build the Axum router
    let app = Router::new()
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
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start the server
    tracing::info!("Listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
