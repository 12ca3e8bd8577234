// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Query execution and page-block grouping.
//!
//! Raw hits come back from the index as a flat ranked list mixing record
//! types. The response nests matching child records under synthetic page
//! summaries, ordered by the first time each page was referenced in the
//! ranked scan.

use crate::models::corpus::RecordId;
use crate::models::search::{MatchedRecord, RecordKind, SearchItem};
use crate::services::index::SearchIndex;
use anyhow::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Upper bound on raw hits considered per query.
pub const CANDIDATE_LIMIT: usize = 6;

/// Execute one search request against a freshly built index.
///
/// An empty query never touches the index and yields an empty result list.
pub fn run_query(index: &SearchIndex, query: &str, tag: Option<&str>) -> Result<Vec<SearchItem>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let matches = index.search(query, tag, CANDIDATE_LIMIT)?;
    Ok(group_by_page(&matches, index))
}

/// Regroup ranked hits into page blocks.
///
/// A `page`-type hit only marks its page for output; child hits accumulate
/// under their parent page, creating the page entry lazily. Pages are emitted
/// in first-reference order, each as a summary item followed by its children
/// in match rank order. A `page_id` with no page record in the index
/// contributes nothing.
fn group_by_page(matches: &[MatchedRecord], index: &SearchIndex) -> Vec<SearchItem> {
    let mut page_order: Vec<String> = Vec::new();
    let mut children: HashMap<String, Vec<SearchItem>> = HashMap::new();

    for record in matches {
        let items = match children.entry(record.page_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                page_order.push(record.page_id.clone());
                entry.insert(Vec::new())
            }
        };
        if record.kind != RecordKind::Page {
            items.push(SearchItem {
                id: RecordId::Text(record.id.clone()),
                content: record.content.clone(),
                kind: record.kind,
                url: record.url.clone(),
            });
        }
    }

    let mut grouped = Vec::new();
    for page_key in page_order {
        let Some(page) = index.page(&page_key) else {
            // Id consistency is unverified; a dangling reference is dropped.
            continue;
        };
        grouped.push(SearchItem {
            id: page.id.clone(),
            content: page.content.clone(),
            kind: RecordKind::Page,
            url: page.url.clone(),
        });
        if let Some(items) = children.remove(&page_key) {
            grouped.extend(items);
        }
    }
    grouped
}
