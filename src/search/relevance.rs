use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::content::ContentItem;

/// How many suggestions a query may produce.
pub const MAX_SUGGESTIONS: usize = 5;

/// Queries shorter than this produce no suggestions.
const MIN_SUGGESTION_LEN: usize = 2;

/// A content item ranked against a query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub item: ContentItem,
    pub relevance_score: i64,
    /// Field names that matched, in check order, each at most once.
    pub matched_fields: Vec<&'static str>,
}

/// Score one item against a query.
///
/// The query splits on whitespace into distinct lowercase terms — a
/// repeated term counts once. Per term: the display name contributes +10
/// on a prefix match or +5 on a substring match, content +3, uploader +2,
/// category tag +1, file name +4, URL +2. A field lands in
/// `matched_fields` once no matter how many terms hit it. Recent items get
/// a boost independent of the terms: +1 within seven days, and another +2
/// within one day.
pub fn calculate_relevance(
    item: &ContentItem,
    query: &str,
    now: DateTime<Utc>,
) -> (i64, Vec<&'static str>) {
    let mut score = 0i64;
    let mut matched_fields: Vec<&'static str> = Vec::new();

    let mut mark = |fields: &mut Vec<&'static str>, field: &'static str| {
        if !fields.contains(&field) {
            fields.push(field);
        }
    };

    let title = item.display_name().to_lowercase();
    let content = item.content.as_deref().map(str::to_lowercase);
    let uploader = item.uploaded_by.to_lowercase();
    let category = item.category.as_str();
    let file_name = item.file_name.as_deref().map(str::to_lowercase);
    let url = item.url.as_deref().map(str::to_lowercase);

    let lowered = query.to_lowercase();
    let mut terms: Vec<&str> = Vec::new();
    for term in lowered.split_whitespace() {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }

    for term in terms {
        if title.contains(term) {
            score += if title.starts_with(term) { 10 } else { 5 };
            mark(&mut matched_fields, "title");
        }

        if let Some(content) = &content {
            if content.contains(term) {
                score += 3;
                mark(&mut matched_fields, "content");
            }
        }

        if uploader.contains(term) {
            score += 2;
            mark(&mut matched_fields, "uploader");
        }

        if category.contains(term) {
            score += 1;
            mark(&mut matched_fields, "type");
        }

        if let Some(file_name) = &file_name {
            if file_name.contains(term) {
                score += 4;
                mark(&mut matched_fields, "fileName");
            }
        }

        if let Some(url) = &url {
            if url.contains(term) {
                score += 2;
                mark(&mut matched_fields, "url");
            }
        }
    }

    let age = now.signed_duration_since(item.date);
    if age < Duration::days(7) {
        score += 1;
    }
    if age < Duration::days(1) {
        score += 2;
    }

    (score, matched_fields)
}

/// Rank the aggregate against a query.
///
/// Zero-score items drop out; the rest sort by descending score, ties
/// keeping their encounter order. A blank query matches nothing.
pub fn search(items: &[ContentItem], query: &str, now: DateTime<Utc>) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = items
        .iter()
        .filter_map(|item| {
            let (relevance_score, matched_fields) = calculate_relevance(item, query, now);
            (relevance_score > 0).then(|| SearchResult {
                item: item.clone(),
                relevance_score,
                matched_fields,
            })
        })
        .collect();

    // Vec::sort_by is stable, so equal scores keep encounter order.
    results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    results
}

/// Completion suggestions for a partial query.
///
/// Distinct names, uploaders, and category tags containing the query,
/// excluding exact matches, in encounter order, capped at
/// [`MAX_SUGGESTIONS`].
pub fn suggestions(items: &[ContentItem], query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.len() < MIN_SUGGESTION_LEN {
        return Vec::new();
    }

    let mut found: Vec<String> = Vec::new();
    let mut add = |candidate: &str| {
        let lower = candidate.to_lowercase();
        if lower.contains(&query) && lower != query && !found.iter().any(|f| f == candidate) {
            found.push(candidate.to_string());
        }
    };

    for item in items {
        add(item.display_name());
        add(&item.uploaded_by);
        add(item.category.as_str());
    }

    found.truncate(MAX_SUGGESTIONS);
    found
}
