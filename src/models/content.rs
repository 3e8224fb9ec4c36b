use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four fixed content buckets of the portal.
///
/// A category doubles as the backing collection name and as the `type`
/// tag on serialized items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Slides,
    Assignments,
    Links,
    Announcements,
}

impl Category {
    /// All categories, in the fixed aggregation order.
    pub const ALL: [Category; 4] = [
        Category::Slides,
        Category::Assignments,
        Category::Links,
        Category::Announcements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Slides => "slides",
            Category::Assignments => "assignments",
            Category::Links => "links",
            Category::Announcements => "announcements",
        }
    }

    /// Parse a category from a string (case-insensitive).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slides" => Some(Category::Slides),
            "assignments" => Some(Category::Assignments),
            "links" => Some(Category::Links),
            "announcements" => Some(Category::Announcements),
            _ => None,
        }
    }

    /// Whether file uploads land in this category.
    ///
    /// Links and announcements are created through their own operations.
    pub fn accepts_uploads(&self) -> bool {
        matches!(self, Category::Slides | Category::Assignments)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One portal entry: an uploaded file, a link, or an announcement.
///
/// The four content kinds share this shape; which optional fields are set
/// depends on the category. Items are immutable once created — an admin
/// replaces them by delete-and-recreate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    /// Display name for files and links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display title for announcements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Announcement body or link description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Target URL for links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub uploaded_by: String,
    pub date: DateTime<Utc>,
    /// Assignment deadline, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// The category this item belongs to. Set from the source collection
    /// during aggregation; every item belongs to exactly one category.
    #[serde(rename = "type")]
    pub category: Category,
    /// Original file name of an upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Public download URL of an upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl ContentItem {
    /// The display name: `name` for files and links, falling back to the
    /// announcement `title`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_from_str_ci() {
        assert_eq!(Category::from_str_ci("slides"), Some(Category::Slides));
        assert_eq!(Category::from_str_ci("Assignments"), Some(Category::Assignments));
        assert_eq!(Category::from_str_ci("LINKS"), Some(Category::Links));
        assert_eq!(
            Category::from_str_ci("announcements"),
            Some(Category::Announcements)
        );
        assert_eq!(Category::from_str_ci("homework"), None);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Announcements).unwrap(),
            "\"announcements\""
        );
    }

    #[test]
    fn test_upload_categories() {
        assert!(Category::Slides.accepts_uploads());
        assert!(Category::Assignments.accepts_uploads());
        assert!(!Category::Links.accepts_uploads());
        assert!(!Category::Announcements.accepts_uploads());
    }

    #[test]
    fn test_content_item_wire_shape() {
        let item = ContentItem {
            id: "abc-123".to_string(),
            name: Some("Week 3 Slides".to_string()),
            title: None,
            content: None,
            url: None,
            uploaded_by: "Prof X".to_string(),
            date: Utc.with_ymd_and_hms(2025, 9, 12, 8, 30, 0).unwrap(),
            due_date: None,
            category: Category::Slides,
            file_name: Some("week3.pdf".to_string()),
            file_url: Some("/api/v1/files/slides/1757665800000_week3.pdf".to_string()),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["uploadedBy"], "Prof X");
        assert_eq!(json["type"], "slides");
        assert_eq!(json["fileName"], "week3.pdf");
        // Unset optionals are omitted entirely
        assert!(json.get("dueDate").is_none());
        assert!(json.get("title").is_none());

        let back: ContentItem = serde_json::from_value(json).unwrap();
        assert_eq!(back.category, Category::Slides);
        assert_eq!(back.display_name(), "Week 3 Slides");
    }

    #[test]
    fn test_display_name_falls_back_to_title() {
        let item = ContentItem {
            id: "a".to_string(),
            name: None,
            title: Some("Midterm moved".to_string()),
            content: Some("Now on Friday.".to_string()),
            url: None,
            uploaded_by: "Prof X".to_string(),
            date: Utc::now(),
            due_date: None,
            category: Category::Announcements,
            file_name: None,
            file_url: None,
        };
        assert_eq!(item.display_name(), "Midterm moved");
    }

    #[test]
    fn test_due_date_roundtrip() {
        let json = serde_json::json!({
            "id": "x",
            "name": "Problem Set 2",
            "uploadedBy": "TA",
            "date": "2025-10-01T12:00:00Z",
            "dueDate": "2025-10-15",
            "type": "assignments"
        });
        let item: ContentItem = serde_json::from_value(json).unwrap();
        assert_eq!(
            item.due_date,
            Some(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap())
        );
        assert_eq!(item.category, Category::Assignments);
    }
}
