use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::error::FetchError;

/// The (owner, repository) pair being browsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub owner: String,
    pub repo: String,
}

impl Target {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub login: String,
}

/// GitHub Issue (the issues endpoint also returns pull requests)
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: IssueState,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn author(&self) -> &str {
        self.user.as_ref().map(|u| u.login.as_str()).unwrap_or("unknown")
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "Open"),
            IssueState::Closed => write!(f, "Closed"),
        }
    }
}

/// Issue comment
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "user", default)]
    pub author: Option<User>,
}

impl Comment {
    pub fn author(&self) -> &str {
        self.author
            .as_ref()
            .map(|u| u.login.as_str())
            .unwrap_or("ghost")
    }
}

/// Outcome of fetching one page of a paginated collection.
///
/// `error` is set whenever the fetch failed; `items` is then empty and
/// `total_pages` holds whatever the caller already knew (or 1).
#[derive(Debug, Clone)]
pub struct FetchResult<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub error: Option<FetchError>,
}

impl<T> FetchResult<T> {
    pub fn ok(items: Vec<T>, total_pages: u32) -> Self {
        Self {
            items,
            total_pages: total_pages.max(1),
            error: None,
        }
    }

    pub fn failed(error: FetchError, fallback_total: u32) -> Self {
        Self {
            items: Vec::new(),
            total_pages: fallback_total.max(1),
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_deserializes_from_github_payload() {
        let json = r#"{
            "number": 1347,
            "title": "Found a bug",
            "body": "I'm having a problem with this.",
            "state": "open",
            "user": {"login": "octocat", "id": 1},
            "comments": 3,
            "created_at": "2011-04-22T13:33:48Z",
            "html_url": "https://github.com/octocat/Hello-World/issues/1347",
            "labels": []
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.number, 1347);
        assert_eq!(issue.author(), "octocat");
        assert_eq!(issue.state, IssueState::Open);
        assert!(!issue.is_pull_request());
    }

    #[test]
    fn issue_tolerates_missing_optional_fields() {
        let issue: Issue = serde_json::from_str(r#"{"number": 1, "title": "t", "body": null}"#).unwrap();
        assert_eq!(issue.body, None);
        assert_eq!(issue.author(), "unknown");
    }

    #[test]
    fn comment_author_comes_from_user_login() {
        let json = r#"{"id": 7, "body": "+1", "created_at": "2020-01-01T00:00:00Z", "user": {"login": "hubot"}}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.author(), "hubot");
    }

    #[test]
    fn failed_result_keeps_fallback_total() {
        let result: FetchResult<Issue> = FetchResult::failed(FetchError::Transport("boom".into()), 0);
        assert_eq!(result.total_pages, 1);
        assert!(result.items.is_empty());
        assert!(result.error.is_some());
    }

    #[test]
    fn target_displays_as_slug() {
        assert_eq!(Target::new("facebook", "react").to_string(), "facebook/react");
    }
}
