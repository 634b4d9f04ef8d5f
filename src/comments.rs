//! Comment thread of the issue shown in the detail modal.
//!
//! Pages are fetched one after another and appended. Each page is requested
//! at most once per selected issue.

use crate::error::FetchError;
use crate::types::{Comment, FetchResult, Issue, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadState {
    #[default]
    Closed,
    Loading,
    Ready,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRequest {
    pub target: Target,
    pub issue: u64,
    pub page: u32,
    pub per_page: u32,
    pub known_total: u32,
    seq: u64,
}

#[derive(Debug)]
pub struct CommentThread {
    per_page: u32,
    selected: Option<(Target, Issue)>,
    visible: bool,
    page: u32,
    total_pages: u32,
    comments: Vec<Comment>,
    state: ThreadState,
    seq: u64,
    pending: Option<u64>,
}

impl CommentThread {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            selected: None,
            visible: false,
            page: 1,
            total_pages: 1,
            comments: Vec::new(),
            state: ThreadState::Closed,
            seq: 0,
            pending: None,
        }
    }

    pub fn issue(&self) -> Option<&Issue> {
        self.selected.as_ref().map(|(_, issue)| issue)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn can_load_more(&self) -> bool {
        self.state == ThreadState::Ready && self.pending.is_none() && self.page < self.total_pages
    }

    fn is_selected(&self, target: &Target, number: u64) -> bool {
        matches!(&self.selected, Some((t, i)) if t == target && i.number == number)
    }

    /// Show `issue`. Switching to a different issue starts a fresh thread at
    /// page 1; re-opening the current one only makes it visible again.
    pub fn open(&mut self, target: &Target, issue: &Issue) -> Option<CommentRequest> {
        self.visible = true;
        if self.is_selected(target, issue.number) {
            return None;
        }

        self.selected = Some((target.clone(), issue.clone()));
        self.comments.clear();
        self.page = 1;
        self.total_pages = 1;
        Some(self.begin(target.clone(), issue.number))
    }

    /// Request the next page. `None` when there is nothing left to load or a
    /// page is already in flight.
    pub fn load_more(&mut self) -> Option<CommentRequest> {
        if !self.can_load_more() {
            return None;
        }
        let (target, number) = self
            .selected
            .as_ref()
            .map(|(target, issue)| (target.clone(), issue.number))?;
        self.page += 1;
        Some(self.begin(target, number))
    }

    /// Hide the modal, keeping what was loaded.
    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Forget the selection entirely.
    pub fn reset(&mut self) {
        self.selected = None;
        self.visible = false;
        self.comments.clear();
        self.page = 1;
        self.total_pages = 1;
        self.pending = None;
        self.state = ThreadState::Closed;
    }

    /// Apply a finished fetch. `Ok(false)` means the response was stale and
    /// ignored; a failed fetch closes the thread and hands the error back.
    pub fn complete(
        &mut self,
        request: &CommentRequest,
        result: FetchResult<Comment>,
    ) -> Result<bool, FetchError> {
        let current = self.pending == Some(request.seq)
            && self.is_selected(&request.target, request.issue)
            && self.page == request.page;
        if !current {
            tracing::debug!(
                issue = request.issue,
                page = request.page,
                "discarding stale comment response"
            );
            return Ok(false);
        }
        self.pending = None;

        if let Some(e) = result.error {
            self.reset();
            return Err(e);
        }

        self.comments.extend(result.items);
        self.total_pages = result.total_pages.max(self.page);
        self.state = if self.page >= self.total_pages {
            ThreadState::Exhausted
        } else {
            ThreadState::Ready
        };
        Ok(true)
    }

    fn begin(&mut self, target: Target, issue: u64) -> CommentRequest {
        self.seq += 1;
        self.pending = Some(self.seq);
        self.state = ThreadState::Loading;

        CommentRequest {
            target,
            issue,
            page: self.page,
            per_page: self.per_page,
            known_total: self.total_pages,
            seq: self.seq,
        }
    }
}
