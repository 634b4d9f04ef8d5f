use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::FetchError;
use crate::http::{RawResponse, Transport};
use crate::link;
use crate::types::{Comment, FetchResult, Issue, Target};

/// GitHub error payload: `{"message": "Not Found", "documentation_url": ...}`
#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

/// Fetches single pages of GitHub collections and derives the page count
/// from the `link` header.
#[derive(Debug, Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    api_base: String,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, api_base: &str) -> Self {
        Self {
            transport,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn issues_url(&self, target: &Target) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_base,
            urlencoding::encode(&target.owner),
            urlencoding::encode(&target.repo)
        )
    }

    pub fn comments_url(&self, target: &Target, number: u64) -> String {
        format!("{}/{}/comments", self.issues_url(target), number)
    }

    pub async fn fetch_issues(
        &self,
        target: &Target,
        page: u32,
        per_page: u32,
        fallback_total: u32,
    ) -> FetchResult<Issue> {
        self.fetch(&self.issues_url(target), page, per_page, fallback_total)
            .await
    }

    pub async fn fetch_comments(
        &self,
        target: &Target,
        number: u64,
        page: u32,
        per_page: u32,
        fallback_total: u32,
    ) -> FetchResult<Comment> {
        self.fetch(
            &self.comments_url(target, number),
            page,
            per_page,
            fallback_total,
        )
        .await
    }

    /// GET one page of `url`. Never fails outright: errors are reported in
    /// the result with `fallback_total` standing in for the page count.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        page: u32,
        per_page: u32,
        fallback_total: u32,
    ) -> FetchResult<T> {
        tracing::debug!(url, page, per_page, "fetching page");

        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        match self.transport.get(url, &query).await.and_then(decode::<T>) {
            Ok((items, total_pages)) => {
                tracing::debug!(url, page, total_pages, "page fetched");
                FetchResult::ok(items, total_pages)
            }
            Err(e) => {
                tracing::warn!(url, page, error = %e, "fetch failed");
                FetchResult::failed(e, fallback_total)
            }
        }
    }
}

fn decode<T: DeserializeOwned>(
    response: RawResponse,
) -> std::result::Result<(Vec<T>, u32), FetchError> {
    if !response.is_success() {
        return Err(FetchError::Http {
            status: response.status,
            message: error_message(&response),
        });
    }

    let items: Vec<T> = serde_json::from_str(&response.body)
        .map_err(|e| FetchError::Transport(format!("invalid response body: {}", e)))?;
    Ok((items, link::total_pages(response.link.as_deref())))
}

fn error_message(response: &RawResponse) -> String {
    if let Ok(api) = serde_json::from_str::<ApiMessage>(&response.body) {
        return api.message;
    }
    StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}
