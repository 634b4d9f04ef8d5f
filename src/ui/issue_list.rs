use chrono::Utc;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::browse::BrowseState;
use crate::types::IssueState;

use super::{format_age, truncate};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let issues = app.browser.issues();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Issues ({}) ", issues.len()));

    if issues.is_empty() {
        let message = match app.browser.state() {
            BrowseState::Idle => "Type owner/repo and press Enter",
            BrowseState::Loading => "Loading issues...",
            BrowseState::Loaded => "No issues found",
            BrowseState::Failed(_) => "Nothing to show",
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 37; // number(7) + marker(3) + author(16) + age(9) + spaces(2)
    let flex = w.saturating_sub(fixed).max(10);
    let now = Utc::now();

    let items: Vec<ListItem> = issues
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let style = if i == app.issue_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let (marker, marker_color) = match (issue.is_pull_request(), issue.state) {
                (true, _) => ("PR ", Color::Magenta),
                (false, IssueState::Open) => ("●  ", Color::Green),
                (false, IssueState::Closed) => ("●  ", Color::Red),
            };

            let age = issue
                .created_at
                .map(|t| format_age(t, now))
                .unwrap_or_default();

            let line = Line::from(vec![
                Span::styled(format!("#{:<6}", issue.number), Style::default().fg(Color::Cyan)),
                Span::styled(marker, Style::default().fg(marker_color)),
                Span::styled(format!("{:<flex$}", truncate(&issue.title, flex)), style),
                Span::raw(" "),
                Span::styled(
                    format!("@{:<15}", truncate(issue.author(), 15)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(" "),
                Span::styled(format!("{:>9}", age), Style::default().fg(Color::DarkGray)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.issue_index));

    frame.render_stateful_widget(list, area, &mut state);
}
