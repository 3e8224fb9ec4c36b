use axum::extract::{Multipart, Path, State};
use axum_extra::extract::CookieJar;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::session;
use crate::error::AppError;
use crate::models::content::{Category, ContentItem};

/// Response from a successful file upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub id: String,
    /// The URL path where the file can be downloaded.
    pub file_url: String,
}

/// Keep blob keys shell- and URL-friendly.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `POST /api/v1/upload` — upload a course file with its metadata (admin).
///
/// Multipart form: `category` (slides or assignments), `title`, `file`,
/// and an optional `dueDate` (`YYYY-MM-DD`). The blob goes to storage
/// first, then the metadata row; there is no transaction across the pair.
pub async fn upload_handler(
    State(state): State<crate::state::AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<axum::Json<UploadResponse>, AppError> {
    let user = session::require_admin(&jar)?;

    let mut category: Option<String> = None;
    let mut title: Option<String> = None;
    let mut due_date: Option<NaiveDate> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "category" => {
                category = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Bad category field: {e}")))?,
                );
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("Bad title field: {e}")))?,
                );
            }
            "dueDate" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Bad dueDate field: {e}")))?;
                if !raw.trim().is_empty() {
                    due_date = Some(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(
                        |e| AppError::BadRequest(format!("Invalid due date '{}': {}", raw, e)),
                    )?);
                }
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((file_name, data.to_vec()));
            }
            _ => {}
        }
    }

    let category = category
        .as_deref()
        .map(|raw| {
            Category::from_str_ci(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown category '{}'", raw)))
        })
        .transpose()?
        .ok_or_else(|| AppError::BadRequest("Missing category field".into()))?;

    if !category.accepts_uploads() {
        return Err(AppError::BadRequest(format!(
            "Files cannot be uploaded to '{}'",
            category
        )));
    }

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing title field".into()))?;

    let (file_name, data) = file.ok_or_else(|| AppError::BadRequest("No file field found".into()))?;

    let now = Utc::now();
    let key = format!(
        "{}/{}_{}",
        category,
        now.timestamp_millis(),
        sanitize_file_name(&file_name)
    );

    state.storage.put_object(&key, data).await?;

    let file_url = format!("/api/v1/files/{}", key);

    let item = ContentItem {
        id: Uuid::new_v4().to_string(),
        name: Some(title),
        title: None,
        content: None,
        url: None,
        uploaded_by: user.display_name,
        date: now,
        due_date,
        category,
        file_name: Some(file_name),
        file_url: Some(file_url.clone()),
    };
    let id = item.id.clone();

    state.content_repo.insert(category, item).await?;
    state.catalog.refresh(state.content_repo.as_ref()).await;

    Ok(axum::Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        id,
        file_url,
    }))
}

/// Infer a download content type from the file extension.
fn content_type_for(file: &str) -> &'static str {
    let lower = file.to_lowercase();
    match lower.rsplit('.').next().unwrap_or("") {
        "pdf" => "application/pdf",
        "ppt" | "pptx" => "application/vnd.ms-powerpoint",
        "doc" | "docx" => "application/msword",
        "xls" | "xlsx" => "application/vnd.ms-excel",
        "zip" => "application/zip",
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// `GET /api/v1/files/{category}/{file}` — serve an uploaded file.
pub async fn serve_file_handler(
    State(state): State<crate::state::AppState>,
    Path((category, file)): Path<(String, String)>,
) -> Result<axum::response::Response, AppError> {
    use axum::response::IntoResponse;

    let category = Category::from_str_ci(&category)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown category '{}'", category)))?;

    let key = format!("{}/{}", category, file);

    let data = state
        .storage
        .get_object(&key)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    Ok((
        [(axum::http::header::CONTENT_TYPE, content_type_for(&file))],
        data,
    )
        .into_response())
}
