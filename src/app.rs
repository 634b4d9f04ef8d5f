use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::browse::{IssueBrowser, IssueRequest};
use crate::comments::{CommentRequest, CommentThread};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::event::Event;
use crate::fetch::Fetcher;
use crate::types::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Search,
    List,
}

pub struct App {
    pub focus: Focus,
    pub search: String,
    pub browser: IssueBrowser,
    pub thread: CommentThread,
    pub issue_index: usize,
    pub scroll_offset: usize,
    /// Furthest `scroll_offset` can go, as measured at the last render.
    scroll_max: usize,
    pub error: Option<String>,
    pub should_quit: bool,
    submit_on_start: bool,
    fetcher: Fetcher,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        fetcher: Fetcher,
        config: &Config,
        search: String,
        submit_on_start: bool,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            focus: Focus::Search,
            search,
            browser: IssueBrowser::new(config.issues_per_page),
            thread: CommentThread::new(config.comments_per_page),
            issue_index: 0,
            scroll_offset: 0,
            scroll_max: 0,
            error: None,
            should_quit: false,
            submit_on_start,
            fetcher,
            action_tx,
        }
    }

    pub fn modal_open(&self) -> bool {
        self.thread.is_visible() && self.thread.issue().is_some()
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.browser.issues().get(self.issue_index)
    }

    pub fn fit_scroll(&mut self, max: usize) {
        self.scroll_max = max;
        self.scroll_offset = self.scroll_offset.min(max);
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init if self.submit_on_start => Action::SearchSubmit,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.focus == Focus::Search {
            return match key.code {
                KeyCode::Enter => Action::SearchSubmit,
                KeyCode::Esc => Action::SearchCancel,
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Char(c) => Action::SearchInput(c),
                _ => Action::None,
            };
        }

        if self.modal_open() {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::CloseModal,
                KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
                KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
                KeyCode::Char('m') => Action::LoadMoreComments,
                KeyCode::Char('o') => Action::OpenInBrowser,
                KeyCode::Char('y') => Action::YankUrl,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('/') => Action::FocusSearch,
            KeyCode::Char('j') | KeyCode::Down => Action::SelectNext,
            KeyCode::Char('k') | KeyCode::Up => Action::SelectPrev,
            KeyCode::Enter => Action::OpenIssue,
            KeyCode::Char('n') | KeyCode::Right => Action::NextPage,
            KeyCode::Char('p') | KeyCode::Left => Action::PrevPage,
            KeyCode::Char('g') | KeyCode::Home => Action::FirstPage,
            KeyCode::Char('G') | KeyCode::End => Action::LastPage,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.error.is_some() && !action.is_background() {
            self.error = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }

            Action::FocusSearch => {
                self.focus = Focus::Search;
            }
            Action::SearchInput(c) => {
                self.search.push(c);
            }
            Action::SearchBackspace => {
                self.search.pop();
            }
            Action::SearchCancel => {
                self.focus = Focus::List;
            }
            Action::SearchSubmit => self.submit(),

            Action::SelectPrev => {
                self.issue_index = self.issue_index.saturating_sub(1);
            }
            Action::SelectNext => {
                let len = self.browser.issues().len();
                if len > 0 && self.issue_index < len - 1 {
                    self.issue_index += 1;
                }
            }
            Action::OpenIssue => {
                let Some(target) = self.browser.target().cloned() else {
                    return;
                };
                let Some(issue) = self.selected_issue().cloned() else {
                    return;
                };
                self.scroll_offset = 0;
                self.scroll_max = 0;
                if let Some(request) = self.thread.open(&target, &issue) {
                    self.spawn_fetch_comments(request);
                }
            }
            Action::NextPage => {
                let request = self.browser.next_page();
                self.request_issues(request);
            }
            Action::PrevPage => {
                let request = self.browser.prev_page();
                self.request_issues(request);
            }
            Action::FirstPage => {
                let request = self.browser.first_page();
                self.request_issues(request);
            }
            Action::LastPage => {
                let request = self.browser.last_page();
                self.request_issues(request);
            }
            Action::Refresh => {
                let request = self.browser.refresh();
                self.request_issues(request);
            }
            Action::IssuesFetched(request, result) => {
                if self.browser.complete(&request, result) {
                    self.issue_index = 0;
                }
            }

            Action::CloseModal => {
                self.thread.close();
            }
            Action::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.scroll_offset = (self.scroll_offset + 1).min(self.scroll_max);
            }
            Action::LoadMoreComments => {
                if let Some(request) = self.thread.load_more() {
                    self.spawn_fetch_comments(request);
                }
            }
            Action::CommentsFetched(request, result) => {
                if let Err(e) = self.thread.complete(&request, result) {
                    self.error = Some(format!("Failed to fetch comments: {}", e));
                }
            }

            Action::OpenInBrowser => {
                if let Some(url) = self.current_url() {
                    if let Err(e) = open::that(&url) {
                        self.action_tx.send(AppError::from(e).into()).ok();
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.current_url() {
                    if let Err(e) = copy_to_clipboard(&url) {
                        self.action_tx.send(e.into()).ok();
                    }
                }
            }

            Action::Error(msg) => {
                self.error = Some(msg);
            }
            Action::None => {}
        }
    }

    fn submit(&mut self) {
        let previous = self.browser.target().cloned();
        match self.browser.submit(&self.search) {
            Ok(request) => {
                if previous.as_ref() != Some(&request.target) {
                    self.thread.reset();
                }
                self.focus = Focus::List;
                self.issue_index = 0;
                self.spawn_fetch_issues(request);
            }
            // shown from the browser's Failed state
            Err(e) => tracing::debug!(error = %e, "search rejected"),
        }
    }

    fn request_issues(&mut self, request: Option<IssueRequest>) {
        if let Some(request) = request {
            self.spawn_fetch_issues(request);
        }
    }

    /// Web URL of the issue in the modal, or of the highlighted one.
    fn current_url(&self) -> Option<String> {
        let issue = if self.modal_open() {
            self.thread.issue()
        } else {
            self.selected_issue()
        }?;
        if let Some(url) = &issue.html_url {
            return Some(url.clone());
        }
        let target = self.browser.target()?;
        Some(format!(
            "https://github.com/{}/{}/issues/{}",
            target.owner, target.repo, issue.number
        ))
    }

    fn spawn_fetch_issues(&self, request: IssueRequest) {
        let tx = self.action_tx.clone();
        let fetcher = self.fetcher.clone();
        tokio::spawn(async move {
            let result = fetcher
                .fetch_issues(
                    &request.target,
                    request.page,
                    request.per_page,
                    request.known_total,
                )
                .await;
            tx.send(Action::IssuesFetched(request, result)).ok();
        });
    }

    fn spawn_fetch_comments(&self, request: CommentRequest) {
        let tx = self.action_tx.clone();
        let fetcher = self.fetcher.clone();
        tokio::spawn(async move {
            let result = fetcher
                .fetch_comments(
                    &request.target,
                    request.issue,
                    request.page,
                    request.per_page,
                    request.known_total,
                )
                .await;
            tx.send(Action::CommentsFetched(request, result)).ok();
        });
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| AppError::Clipboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::browse::BrowseState;
    use crate::comments::ThreadState;
    use crate::http::mock::MockTransport;

    const LINK_5: &str = "<https://api.github.com/repos/facebook/react/issues?page=2&per_page=20>; rel=\"next\", \
         <https://api.github.com/repos/facebook/react/issues?page=5&per_page=20>; rel=\"last\"";

    const THREE_ISSUES: &str = r#"[
        {"number": 3, "title": "c", "body": null},
        {"number": 2, "title": "b", "body": "two"},
        {"number": 1, "title": "a", "body": "one"}
    ]"#;

    fn app_with(transport: Arc<MockTransport>) -> (App, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(transport, "https://api.github.com");
        let app = App::new(
            fetcher,
            &Config::default(),
            "facebook/react".to_string(),
            false,
            tx,
        );
        (app, rx)
    }

    async fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        let action = rx.recv().await.unwrap();
        app.update(action);
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn submit_loads_first_page() {
        let transport = Arc::new(MockTransport::new().respond(200, Some(LINK_5), THREE_ISSUES));
        let (mut app, mut rx) = app_with(transport.clone());

        app.update(Action::SearchSubmit);
        assert_eq!(app.browser.state(), &BrowseState::Loading);
        assert_eq!(app.focus, Focus::List);
        pump(&mut app, &mut rx).await;

        assert_eq!(app.browser.state(), &BrowseState::Loaded);
        assert_eq!(app.browser.issues().len(), 3);
        assert_eq!(app.browser.total_pages(), 5);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn not_found_fails_with_server_message() {
        let transport = Arc::new(MockTransport::new().respond(404, None, r#"{"message":"Not Found"}"#));
        let (mut app, mut rx) = app_with(transport);
        app.search = "nobody/nothing".to_string();

        app.update(Action::SearchSubmit);
        pump(&mut app, &mut rx).await;

        assert_eq!(app.browser.state(), &BrowseState::Failed("Not Found".to_string()));
        assert!(app.browser.issues().is_empty());
    }

    #[tokio::test]
    async fn bad_search_makes_no_request() {
        let transport = Arc::new(MockTransport::new());
        let (mut app, _rx) = app_with(transport.clone());
        app.search = "invalid".to_string();

        app.update(Action::SearchSubmit);

        assert!(matches!(app.browser.state(), BrowseState::Failed(_)));
        assert_eq!(app.focus, Focus::Search);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn comments_accumulate_until_exhausted() {
        let comments_link = "<https://api.github.com/repos/facebook/react/issues/3/comments?page=2&per_page=5>; rel=\"last\"";
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, Some(LINK_5), THREE_ISSUES)
                .respond(
                    200,
                    Some(comments_link),
                    r#"[{"id": 1, "body": "first", "created_at": "2024-01-01T00:00:00Z", "user": {"login": "a"}}]"#,
                )
                .respond(
                    200,
                    Some(comments_link),
                    r#"[{"id": 2, "body": "second", "created_at": "2024-01-02T00:00:00Z", "user": {"login": "b"}}]"#,
                ),
        );
        let (mut app, mut rx) = app_with(transport.clone());

        app.update(Action::SearchSubmit);
        pump(&mut app, &mut rx).await;

        app.update(Action::OpenIssue);
        assert!(app.modal_open());
        pump(&mut app, &mut rx).await;
        assert_eq!(app.thread.state(), ThreadState::Ready);

        app.update(Action::LoadMoreComments);
        pump(&mut app, &mut rx).await;
        assert_eq!(app.thread.comments().len(), 2);
        assert_eq!(app.thread.state(), ThreadState::Exhausted);

        app.update(Action::LoadMoreComments);
        assert_eq!(transport.calls().len(), 3);
        assert_eq!(
            transport.calls()[2].0,
            "https://api.github.com/repos/facebook/react/issues/3/comments"
        );
    }

    #[tokio::test]
    async fn comment_failure_closes_modal() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, None, THREE_ISSUES)
                .respond(500, None, r#"{"message":"Server Error"}"#),
        );
        let (mut app, mut rx) = app_with(transport);

        app.update(Action::SearchSubmit);
        pump(&mut app, &mut rx).await;
        app.update(Action::OpenIssue);
        pump(&mut app, &mut rx).await;

        assert!(!app.modal_open());
        assert_eq!(
            app.error.as_deref(),
            Some("Failed to fetch comments: Server Error")
        );
    }

    #[tokio::test]
    async fn scrolling_stops_at_the_end() {
        let (mut app, _rx) = app_with(Arc::new(MockTransport::new()));
        app.fit_scroll(2);
        for _ in 0..5 {
            app.update(Action::ScrollDown);
        }
        assert_eq!(app.scroll_offset, 2);

        app.update(Action::ScrollUp);
        assert_eq!(app.scroll_offset, 1);

        app.fit_scroll(0);
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn keys_route_by_focus() {
        let (mut app, _rx) = app_with(Arc::new(MockTransport::new()));
        assert!(matches!(app.handle_event(key(KeyCode::Char('q'))), Action::SearchInput('q')));
        assert!(matches!(app.handle_event(key(KeyCode::Enter)), Action::SearchSubmit));

        app.update(Action::SearchCancel);
        assert!(matches!(app.handle_event(key(KeyCode::Char('q'))), Action::Quit));
        assert!(matches!(app.handle_event(key(KeyCode::Char('n'))), Action::NextPage));
        assert!(matches!(app.handle_event(key(KeyCode::Char('/'))), Action::FocusSearch));
    }

    #[tokio::test]
    async fn init_submits_when_repo_given() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(Arc::new(MockTransport::new()), "https://api.github.com");
        let app = App::new(fetcher, &Config::default(), "a/b".to_string(), true, tx);
        assert!(matches!(app.handle_event(Event::Init), Action::SearchSubmit));
    }
}
