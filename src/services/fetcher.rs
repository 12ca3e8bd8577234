// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Corpus retrieval from the configured upstream endpoint.

use crate::models::corpus::Page;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Failure while fetching or decoding the upstream corpus.
///
/// Network errors, non-success statuses and JSON decode errors are a single
/// failure kind: the endpoint is unavailable for the current request.
#[derive(Debug, Error)]
#[error("failed to fetch corpus from {url}: {source}")]
pub struct FetchError {
    url: String,
    #[source]
    source: reqwest::Error,
}

/// HTTP client for the upstream corpus endpoint.
///
/// One instance is shared across requests; only the fetched corpus is
/// request-scoped.
pub struct CorpusClient {
    client: reqwest::Client,
    url: String,
}

impl CorpusClient {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Fetch and decode the full corpus. No retry, no partial results.
    pub async fn fetch(&self) -> Result<Vec<Page>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(CONTENT_TYPE, "application/json;charset=UTF-8")
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| self.fetch_error(source))?;

        response
            .json()
            .await
            .map_err(|source| self.fetch_error(source))
    }

    fn fetch_error(&self, source: reqwest::Error) -> FetchError {
        FetchError {
            url: self.url.clone(),
            source,
        }
    }
}
