use chrono::Utc;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::comments::ThreadState;
use crate::types::{Comment, Issue};

use super::format_age;
use super::popup::centered_rect;

pub fn render(frame: &mut Frame, app: &App) {
    let Some(issue) = app.thread.issue() else {
        return;
    };

    let area = centered_rect(85, 85, frame.area());
    frame.render_widget(Clear, area);

    let (body, footer) = split(area);
    render_body(frame, app, issue, body);
    render_footer(frame, app, footer);
}

/// How far the modal body can scroll on a screen of size `screen`.
pub fn scroll_limit(app: &App, screen: Rect) -> usize {
    let Some(issue) = app.thread.issue() else {
        return 0;
    };
    let (area, _) = split(centered_rect(85, 85, screen));
    let lines = body_lines(app, issue, inner_width(area));
    max_scroll(lines.len(), area)
}

fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

fn inner_width(area: Rect) -> usize {
    area.width.saturating_sub(2).max(1) as usize
}

fn max_scroll(rows: usize, area: Rect) -> usize {
    rows.saturating_sub(area.height.saturating_sub(2) as usize)
}

fn render_body(frame: &mut Frame, app: &App, issue: &Issue, area: Rect) {
    // Lines come pre-wrapped, so one line is one row.
    let lines = body_lines(app, issue, inner_width(area));
    let scroll = app.scroll_offset.min(max_scroll(lines.len(), area)) as u16;

    let title = Span::styled(
        format!(" #{} {} ", issue.number, issue.title),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

fn body_lines(app: &App, issue: &Issue, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(issue.state.to_string(), Style::default().fg(Color::Green)),
        Span::raw(" | "),
        Span::styled(format!("@{}", issue.author()), Style::default().fg(Color::Yellow)),
        Span::raw(format!(" | {} comments", issue.comments)),
    ]));
    lines.push(Line::from(""));

    let body = issue
        .body
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or("No description provided.");
    lines.extend(wrap_text(&body.replace('\t', "    "), width, ""));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Comments:",
        Style::default().add_modifier(Modifier::BOLD),
    )));

    if app.thread.comments().is_empty() && app.thread.state() != ThreadState::Loading {
        lines.push(Line::from(Span::styled(
            "There are no comments on this issue",
            Style::default().fg(Color::Gray),
        )));
    }
    for comment in app.thread.comments() {
        lines.extend(comment_lines(comment, width));
    }
    lines
}

fn comment_lines(comment: &Comment, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("@{}", comment.author()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!(" commented {}", format_age(comment.created_at, Utc::now())),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];
    let body = comment.body.as_deref().unwrap_or("");
    lines.extend(wrap_text(body, width, "  "));
    lines
}

/// Break every line of `text` into rows of at most `width` columns.
fn wrap_text(text: &str, width: usize, indent: &str) -> Vec<Line<'static>> {
    let options = textwrap::Options::new(width)
        .initial_indent(indent)
        .subsequent_indent(indent)
        .break_words(true);
    text.lines()
        .flat_map(|line| textwrap::wrap(line, &options))
        .map(|row| Line::from(row.into_owned()))
        .collect()
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let thread = &app.thread;
    let text = match thread.state() {
        ThreadState::Loading => {
            Span::styled("Loading comments...", Style::default().fg(Color::Yellow))
        }
        _ if thread.can_load_more() => Span::styled(
            format!(
                "[m] Show more ({} of {} pages)",
                thread.page(),
                thread.total_pages()
            ),
            Style::default().fg(Color::Cyan),
        ),
        _ => Span::styled("All comments loaded", Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(
        Paragraph::new(Line::from(text)).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::config::Config;
    use crate::fetch::Fetcher;
    use crate::http::mock::MockTransport;
    use crate::types::Target;

    fn app_showing(body: &str) -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(Arc::new(MockTransport::new()), "https://api.github.com");
        let mut app = App::new(fetcher, &Config::default(), String::new(), false, tx);
        let issue: Issue = serde_json::from_value(serde_json::json!({
            "number": 1,
            "title": "Long",
            "body": body,
        }))
        .unwrap();
        app.thread.open(&Target::new("a", "b"), &issue);
        app
    }

    #[test]
    fn long_line_wraps_into_rows() {
        let rows = wrap_text(&"x".repeat(400), 78, "");
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|row| row.width() <= 78));
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(wrap_text("a\n\nb", 10, "  ").len(), 3);
    }

    #[test]
    fn max_scroll_counts_rows_beyond_viewport() {
        let area = Rect::new(0, 0, 80, 22);
        assert_eq!(max_scroll(26, area), 6);
        assert_eq!(max_scroll(10, area), 0);
    }

    #[test]
    fn scroll_limit_includes_wrapped_rows() {
        let screen = Rect::new(0, 0, 100, 50);
        assert_eq!(scroll_limit(&app_showing("short"), screen), 0);

        let body = vec!["y".repeat(400); 40].join("\n");
        // 40 source lines, each at least 5 rows once wrapped
        assert!(scroll_limit(&app_showing(&body), screen) >= 150);
    }

    #[test]
    fn no_issue_means_no_scroll() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(Arc::new(MockTransport::new()), "https://api.github.com");
        let app = App::new(fetcher, &Config::default(), String::new(), false, tx);
        assert_eq!(scroll_limit(&app, Rect::new(0, 0, 100, 50)), 0);
    }
}
