//! Issue list state: which repository, which page, what was loaded.
//!
//! Transitions never touch the network. Anything that should trigger a fetch
//! returns an [`IssueRequest`]; the caller runs it and hands the result back
//! to [`IssueBrowser::complete`], which ignores responses that no longer
//! match the current state.

use crate::error::{AppError, Result};
use crate::types::{FetchResult, Issue, Target};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BrowseState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// A fetch the browser wants performed, tagged with the state it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub target: Target,
    pub page: u32,
    pub per_page: u32,
    /// Page count known when the request was issued; reported back on failure.
    pub known_total: u32,
    seq: u64,
}

#[derive(Debug)]
pub struct IssueBrowser {
    per_page: u32,
    target: Option<Target>,
    page: u32,
    total_pages: u32,
    issues: Vec<Issue>,
    state: BrowseState,
    seq: u64,
    pending: Option<u64>,
}

/// Split `owner/repo` into a target. Exactly one slash, both halves non-empty.
pub fn parse_target(input: &str) -> Result<Target> {
    let input = input.trim();
    let parts: Vec<&str> = input.split('/').map(str::trim).collect();
    match parts.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok(Target::new(*owner, *repo)),
        _ => Err(AppError::Format(input.to_string())),
    }
}

impl IssueBrowser {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            target: None,
            page: 1,
            total_pages: 1,
            issues: Vec::new(),
            state: BrowseState::Idle,
            seq: 0,
            pending: None,
        }
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == BrowseState::Loading
    }

    /// Handle the search box. A well-formed `owner/repo` replaces the target
    /// and starts over at page 1; anything else fails without a request.
    pub fn submit(&mut self, input: &str) -> Result<IssueRequest> {
        let target = match parse_target(input) {
            Ok(target) => target,
            Err(e) => {
                self.state = BrowseState::Failed(e.to_string());
                return Err(e);
            }
        };

        if self.target.as_ref() != Some(&target) {
            self.total_pages = 1;
        }
        self.target = Some(target.clone());
        self.page = 1;
        Ok(self.begin(target))
    }

    /// Move to `page`, clamped to the known page range.
    pub fn go_to_page(&mut self, page: u32) -> Option<IssueRequest> {
        let target = self.target.clone()?;
        let page = page.clamp(1, self.total_pages);
        if page == self.page {
            return None;
        }
        self.page = page;
        Some(self.begin(target))
    }

    pub fn next_page(&mut self) -> Option<IssueRequest> {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<IssueRequest> {
        self.go_to_page(self.page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> Option<IssueRequest> {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> Option<IssueRequest> {
        self.go_to_page(self.total_pages)
    }

    /// Re-issue the request for the current target and page.
    pub fn refresh(&mut self) -> Option<IssueRequest> {
        let target = self.target.clone()?;
        Some(self.begin(target))
    }

    /// Apply a finished fetch. Returns `false` if the response was stale and dropped.
    pub fn complete(&mut self, request: &IssueRequest, result: FetchResult<Issue>) -> bool {
        let current = self.pending == Some(request.seq)
            && self.target.as_ref() == Some(&request.target)
            && self.page == request.page;
        if !current {
            tracing::debug!(
                repo = %request.target,
                page = request.page,
                "discarding stale issue response"
            );
            return false;
        }
        self.pending = None;

        match result.error {
            None => {
                // The last page carries no `rel="last"`, so its count never
                // drops below the page just loaded.
                self.issues = result.items;
                self.total_pages = result.total_pages.max(self.page);
                self.state = BrowseState::Loaded;
            }
            Some(e) => {
                self.issues.clear();
                self.total_pages = result.total_pages.max(1);
                self.state = BrowseState::Failed(e.to_string());
            }
        }
        true
    }

    fn begin(&mut self, target: Target) -> IssueRequest {
        self.seq += 1;
        self.pending = Some(self.seq);
        self.state = BrowseState::Loading;

        let request = IssueRequest {
            target,
            page: self.page,
            per_page: self.per_page,
            known_total: self.total_pages,
            seq: self.seq,
        };
        tracing::debug!(repo = %request.target, page = request.page, "issue request");
        request
    }
}
