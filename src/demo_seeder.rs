use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::db::repository::ContentRepository;
use crate::models::content::{Category, ContentItem};
use crate::storage::client::StorageClient;

/// Seed sample course content for demo mode.
///
/// Uploaded files get a small placeholder blob so the download route
/// works end to end. Failures are logged and skipped; the demo comes up
/// with whatever seeded cleanly.
pub async fn seed_demo_content(repo: &dyn ContentRepository, storage: &dyn StorageClient) {
    tracing::info!("Seeding demo course content...");

    let now = Utc::now();

    let blank = |category: Category, age_days: i64| ContentItem {
        id: Uuid::new_v4().to_string(),
        name: None,
        title: None,
        content: None,
        url: None,
        uploaded_by: "Demo Instructor".to_string(),
        date: now - Duration::days(age_days),
        due_date: None,
        category,
        file_name: None,
        file_url: None,
    };

    let mut items: Vec<ContentItem> = Vec::new();

    // Slides and assignments carry a placeholder file each.
    for (category, title, file_name, age_days, due_date) in [
        (Category::Slides, "Week 1 — Course Introduction", "week1_intro.pdf", 9, None),
        (Category::Slides, "Week 2 — Sorting Algorithms", "week2_sorting.pdf", 2, None),
        (
            Category::Assignments,
            "Problem Set 1",
            "pset1.pdf",
            8,
            NaiveDate::from_ymd_opt(2026, 9, 18),
        ),
        (
            Category::Assignments,
            "Problem Set 2",
            "pset2.pdf",
            1,
            NaiveDate::from_ymd_opt(2026, 10, 2),
        ),
    ] {
        let mut item = blank(category, age_days);
        let key = format!(
            "{}/{}_{}",
            category,
            item.date.timestamp_millis(),
            file_name
        );
        if let Err(e) = storage
            .put_object(&key, b"placeholder course file".to_vec())
            .await
        {
            tracing::error!("Failed to seed blob for '{}': {e}", title);
            continue;
        }
        item.name = Some(title.to_string());
        item.file_name = Some(file_name.to_string());
        item.file_url = Some(format!("/api/v1/files/{}", key));
        item.due_date = due_date;
        items.push(item);
    }

    let mut lecture_link = blank(Category::Links, 5);
    lecture_link.name = Some("Lecture recordings".to_string());
    lecture_link.url = Some("https://video.example.edu/course".to_string());
    lecture_link.content = Some("Recordings of every lecture, updated weekly".to_string());
    items.push(lecture_link);

    let mut textbook_link = blank(Category::Links, 12);
    textbook_link.name = Some("Course textbook (open access)".to_string());
    textbook_link.url = Some("https://books.example.edu/algorithms".to_string());
    items.push(textbook_link);

    let mut welcome = blank(Category::Announcements, 10);
    welcome.title = Some("Welcome to the course".to_string());
    welcome.content =
        Some("Slides, assignments and useful links will show up here each week.".to_string());
    items.push(welcome);

    let mut office_hours = blank(Category::Announcements, 0);
    office_hours.title = Some("Office hours moved".to_string());
    office_hours.content = Some("Office hours are now Thursdays at 15:00.".to_string());
    items.push(office_hours);

    for item in items {
        let label = item.display_name().to_string();
        let category = item.category;
        if let Err(e) = repo.insert(category, item).await {
            tracing::error!("Failed to seed '{}': {e}", label);
        }
    }
}
