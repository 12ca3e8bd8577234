// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search request parameters, index record shapes, and the response model.

use crate::models::corpus::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Type of an index record derived from a page.
///
/// One `page` record exists per page, one `heading` record per heading, and
/// one `text` record per content segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Page,
    Heading,
    Text,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Page => "page",
            RecordKind::Heading => "heading",
            RecordKind::Text => "text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "page" => Some(RecordKind::Page),
            "heading" => Some(RecordKind::Heading),
            "text" => Some(RecordKind::Text),
            _ => None,
        }
    }
}

/// Query-string parameters of the search endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text query. Empty or absent yields an empty result list.
    pub query: Option<String>,
    /// Optional restriction to records of one type (`page`, `heading`, `text`).
    /// Passed through to the index unvalidated.
    pub tag: Option<String>,
}

/// One raw index hit in rank order, enriched with its stored fields.
#[derive(Debug, Clone)]
pub struct MatchedRecord {
    pub id: String,
    pub page_id: String,
    pub kind: RecordKind,
    pub content: String,
    pub url: String,
}

/// Stored page summary, kept for exact-id retrieval during grouping.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: RecordId,
    pub content: String,
    pub url: String,
}

/// One item of the flattened grouped response: a page summary followed by the
/// child records that matched under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchItem {
    pub id: RecordId,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub url: String,
}

/// JSON error body returned on request failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(RecordKind::Heading).unwrap(),
            serde_json::json!("heading")
        );
    }

    #[test]
    fn test_record_kind_parse_round_trip() {
        for kind in [RecordKind::Page, RecordKind::Heading, RecordKind::Text] {
            assert_eq!(RecordKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RecordKind::parse("chapter"), None);
    }

    #[test]
    fn test_search_item_serializes_type_field() {
        let item = SearchItem {
            id: RecordId::Text("11".to_string()),
            content: "Welcome text".to_string(),
            kind: RecordKind::Text,
            url: "/a#h1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            serde_json::json!({
                "id": "11",
                "content": "Welcome text",
                "type": "text",
                "url": "/a#h1"
            })
        );
    }
}
