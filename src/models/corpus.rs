// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Corpus data model as delivered by the upstream endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Identifier of a page, or of an index record derived from one.
///
/// Corpora in the wild carry both numeric and string page ids; either form
/// round-trips unchanged into the response. Synthesized child-record ids are
/// always the `Text` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(value) => write!(f, "{value}"),
            RecordId::Text(value) => f.write_str(value),
        }
    }
}

/// One page of the corpus. Source of truth; read-only within a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: RecordId,
    pub url: String,
    pub title: String,
    #[serde(rename = "structuredData")]
    pub structured_data: StructuredData,
}

/// Headings and text segments extracted from a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredData {
    pub headings: Vec<Heading>,
    pub contents: Vec<ContentSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    /// Fragment identifier of the heading within its page.
    pub id: String,
    pub content: String,
}

/// A text segment, optionally anchored to one of the page's headings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSection {
    pub heading: Option<String>,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserializes_numeric_id() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "id": 1,
            "url": "/a",
            "title": "Intro",
            "structuredData": {
                "headings": [{"id": "h1", "content": "Overview"}],
                "contents": [{"heading": "h1", "content": "Welcome text"}]
            }
        }))
        .expect("valid page");

        assert_eq!(page.id, RecordId::Number(1));
        assert_eq!(page.structured_data.headings.len(), 1);
        assert_eq!(
            page.structured_data.contents[0].heading.as_deref(),
            Some("h1")
        );
    }

    #[test]
    fn test_page_deserializes_string_id() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "id": "getting-started",
            "url": "/b",
            "title": "Guide",
            "structuredData": {"headings": [], "contents": [{"content": "No heading here"}]}
        }))
        .expect("valid page");

        assert_eq!(page.id, RecordId::Text("getting-started".to_string()));
        assert!(page.structured_data.contents[0].heading.is_none());
    }

    #[test]
    fn test_record_id_round_trips_as_json() {
        let numeric = serde_json::to_value(RecordId::Number(42)).unwrap();
        assert_eq!(numeric, serde_json::json!(42));

        let text = serde_json::to_value(RecordId::Text("42x".to_string())).unwrap();
        assert_eq!(text, serde_json::json!("42x"));
    }

    #[test]
    fn test_record_id_display_is_key_form() {
        assert_eq!(RecordId::Number(7).to_string(), "7");
        assert_eq!(RecordId::Text("intro".to_string()).to_string(), "intro");
    }

    #[test]
    fn test_page_with_missing_title_is_rejected() {
        let result: Result<Page, _> = serde_json::from_value(serde_json::json!({
            "id": 1,
            "url": "/a",
            "structuredData": {"headings": [], "contents": []}
        }));
        assert!(result.is_err());
    }
}
