mod issue_list;
mod issue_modal;
mod popup;

pub use issue_modal::scroll_limit as modal_scroll_limit;

use chrono::{DateTime, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, Focus};
use crate::browse::BrowseState;
use crate::comments::ThreadState;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);
    issue_list::render(frame, app, chunks[2]);
    render_pagination(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    if app.modal_open() {
        issue_modal::render(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.browser.target() {
        Some(target) => format!("issuescope - {}", target),
        None => "issuescope - GitHub Issues".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Search;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![Span::raw(app.search.as_str())];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" owner/repo "),
    );
    frame.render_widget(search, area);
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    if app.browser.target().is_none() {
        return;
    }

    let page = app.browser.page();
    let total = app.browser.total_pages();
    let dim = Style::default().fg(Color::DarkGray);
    let active = Style::default().fg(Color::White);

    let line = Line::from(vec![
        Span::styled("« ", if page > 1 { active } else { dim }),
        Span::styled(
            format!("Page {} of {}", page, total),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" »", if page < total { active } else { dim }),
    ]);

    frame.render_widget(
        Paragraph::new(line).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let failure = match app.browser.state() {
        BrowseState::Failed(msg) => Some(msg.as_str()),
        _ => None,
    };

    let status = if let Some(error) = app.error.as_deref().or(failure) {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if app.browser.is_loading() || app.thread.state() == ThreadState::Loading {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = if app.focus == Focus::Search {
            "Enter: search | Esc: leave search | Ctrl+c: quit"
        } else if app.modal_open() {
            "j/k: scroll | m: more comments | o: open | y: yank url | q: close"
        } else {
            "j/k: nav | Enter: open | n/p: page | g/G: first/last | /: search | r: refresh | q: quit"
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Relative age, e.g. "3d ago".
fn format_age(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Cut `text` to at most `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn age_buckets() {
        let now = Utc::now();
        assert_eq!(format_age(now - Duration::days(3), now), "3d ago");
        assert_eq!(format_age(now - Duration::hours(5), now), "5h ago");
        assert_eq!(format_age(now - Duration::minutes(2), now), "2m ago");
        assert_eq!(format_age(now, now), "just now");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }
}
