use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::session;
use crate::error::AppError;
use crate::models::content::{Category, ContentItem};
use crate::models::user::User;

/// How many announcements the public dashboard highlights.
const RECENT_ANNOUNCEMENTS: usize = 2;

/// Generic pass/fail payload for mutations without a created id.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response from a successful create operation.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: String,
    pub id: String,
}

fn parse_category(raw: &str) -> Result<Category, AppError> {
    Category::from_str_ci(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown category '{}'. Expected: slides, assignments, links, announcements",
            raw
        ))
    })
}

/// `GET /api/v1/content` — the full aggregate, freshly reloaded.
///
/// A failed reload is logged and the previous aggregate is served.
pub async fn list_content_handler(
    State(state): State<crate::state::AppState>,
) -> Json<Vec<ContentItem>> {
    state.catalog.refresh(state.content_repo.as_ref()).await;
    Json(state.catalog.snapshot().as_ref().clone())
}

/// `GET /api/v1/folders/{category}` — one category, fetched directly.
pub async fn folder_handler(
    State(state): State<crate::state::AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    let category = parse_category(&category)?;

    let mut items = state.content_repo.list_category(category).await?;
    for item in &mut items {
        item.category = category;
    }

    Ok(Json(items))
}

/// The public dashboard payload: everything, grouped by category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub slides: Vec<ContentItem>,
    pub assignments: Vec<ContentItem>,
    pub links: Vec<ContentItem>,
    pub announcements: Vec<ContentItem>,
    /// The latest couple of announcements, for the dashboard banner.
    pub recent_announcements: Vec<ContentItem>,
}

/// `GET /` — public dashboard.
pub async fn dashboard_handler(
    State(state): State<crate::state::AppState>,
) -> Json<DashboardResponse> {
    state.catalog.refresh(state.content_repo.as_ref()).await;
    let snapshot = state.catalog.snapshot();

    let of = |category: Category| -> Vec<ContentItem> {
        snapshot
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect()
    };

    let announcements = of(Category::Announcements);
    let recent_announcements = announcements
        .iter()
        .take(RECENT_ANNOUNCEMENTS)
        .cloned()
        .collect();

    Json(DashboardResponse {
        slides: of(Category::Slides),
        assignments: of(Category::Assignments),
        links: of(Category::Links),
        announcements,
        recent_announcements,
    })
}

/// Item counts per category for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct CategoryCounts {
    pub slides: usize,
    pub assignments: usize,
    pub links: usize,
    pub announcements: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    pub user: User,
    pub total_items: usize,
    pub counts: CategoryCounts,
}

/// `GET /admin` — gated admin summary.
pub async fn admin_dashboard_handler(
    State(state): State<crate::state::AppState>,
    jar: CookieJar,
) -> Result<Json<AdminDashboardResponse>, AppError> {
    let user = session::require_admin(&jar)?;

    state.catalog.refresh(state.content_repo.as_ref()).await;
    let snapshot = state.catalog.snapshot();

    let count = |category: Category| snapshot.iter().filter(|i| i.category == category).count();

    Ok(Json(AdminDashboardResponse {
        user,
        total_items: snapshot.len(),
        counts: CategoryCounts {
            slides: count(Category::Slides),
            assignments: count(Category::Assignments),
            links: count(Category::Links),
            announcements: count(Category::Announcements),
        },
    }))
}

/// Request payload for `POST /api/v1/links`.
#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `POST /api/v1/links` — add an external link (admin).
pub async fn create_link_handler(
    State(state): State<crate::state::AppState>,
    jar: CookieJar,
    Json(req): Json<LinkRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let user = session::require_admin(&jar)?;

    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Link title cannot be empty".into()));
    }

    let parsed = url::Url::parse(&req.url)
        .map_err(|e| AppError::BadRequest(format!("Invalid URL '{}': {}", req.url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::BadRequest(format!(
            "Unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }

    let item = ContentItem {
        id: Uuid::new_v4().to_string(),
        name: Some(req.title.trim().to_string()),
        title: None,
        content: req.description.filter(|d| !d.trim().is_empty()),
        url: Some(parsed.to_string()),
        uploaded_by: user.display_name,
        date: Utc::now(),
        due_date: None,
        category: Category::Links,
        file_name: None,
        file_url: None,
    };
    let id = item.id.clone();

    state.content_repo.insert(Category::Links, item).await?;
    state.catalog.refresh(state.content_repo.as_ref()).await;

    Ok(Json(MutationResponse {
        message: "Link added successfully".to_string(),
        id,
    }))
}

/// Request payload for `POST /api/v1/announcements`.
#[derive(Debug, Deserialize)]
pub struct AnnouncementRequest {
    pub title: String,
    pub content: String,
}

/// `POST /api/v1/announcements` — post an announcement (admin).
pub async fn create_announcement_handler(
    State(state): State<crate::state::AppState>,
    jar: CookieJar,
    Json(req): Json<AnnouncementRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let user = session::require_admin(&jar)?;

    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Announcement title cannot be empty".into(),
        ));
    }
    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Announcement content cannot be empty".into(),
        ));
    }

    let item = ContentItem {
        id: Uuid::new_v4().to_string(),
        name: None,
        title: Some(req.title.trim().to_string()),
        content: Some(req.content.trim().to_string()),
        url: None,
        uploaded_by: user.display_name,
        date: Utc::now(),
        due_date: None,
        category: Category::Announcements,
        file_name: None,
        file_url: None,
    };
    let id = item.id.clone();

    state
        .content_repo
        .insert(Category::Announcements, item)
        .await?;
    state.catalog.refresh(state.content_repo.as_ref()).await;

    Ok(Json(MutationResponse {
        message: "Announcement posted successfully".to_string(),
        id,
    }))
}

/// `DELETE /api/v1/content/{category}/{id}` — remove an item (admin).
///
/// A nonexistent id is a NotFound failure, not a crash. The blob of a
/// deleted upload stays in storage; items are metadata-first.
pub async fn delete_content_handler(
    State(state): State<crate::state::AppState>,
    jar: CookieJar,
    Path((category, id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    session::require_admin(&jar)?;

    let category = parse_category(&category)?;
    state.content_repo.delete(category, &id).await?;
    state.catalog.refresh(state.content_repo.as_ref()).await;

    Ok(Json(MessageResponse {
        message: "Item deleted successfully".to_string(),
    }))
}
