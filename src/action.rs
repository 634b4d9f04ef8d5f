use crate::browse::IssueRequest;
use crate::comments::CommentRequest;
use crate::error::AppError;
use crate::types::{Comment, FetchResult, Issue};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,

    // Search field
    FocusSearch,
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
    SearchCancel,

    // Issue list
    SelectPrev,
    SelectNext,
    OpenIssue,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    Refresh,
    IssuesFetched(IssueRequest, FetchResult<Issue>),

    // Issue modal
    CloseModal,
    ScrollUp,
    ScrollDown,
    LoadMoreComments,
    CommentsFetched(CommentRequest, FetchResult<Comment>),

    OpenInBrowser,
    YankUrl,

    Error(String),
    None,
}

impl Action {
    /// Results of background work, as opposed to something the user did.
    pub fn is_background(&self) -> bool {
        matches!(
            self,
            Action::IssuesFetched(..)
                | Action::CommentsFetched(..)
                | Action::Error(_)
                | Action::None
        )
    }
}

impl From<AppError> for Action {
    fn from(err: AppError) -> Self {
        Action::Error(err.to_string())
    }
}
