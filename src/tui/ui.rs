//! UI rendering for the TUI

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use super::app::App;
use super::help;
use super::views;

/// Lines shown in the log popup
const LOG_POPUP_LINES: usize = 200;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: header (1 line) + main content + status bar (1 line)
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), app);
    views::render(frame, main_area, app);

    // The prompt takes over the status line while open.
    match &app.prompt {
        Some(prompt) => {
            frame.render_widget(Clear, status_area);
            prompt
                .input
                .render(frame, status_area, prompt.kind.label(), true);
        }
        None => render_status(status_area, frame.buffer_mut(), app),
    }

    if app.show_log {
        render_log_popup(frame, app);
    }

    // Help goes on top of everything else
    if app.show_help {
        help::render_help_popup(frame);
    }
}

fn render_header(area: Rect, buf: &mut Buffer, app: &App) {
    let title = " ActivityWatch Teams";
    let location = match &app.route {
        Some(route) => format!(" {} ", route.view),
        None => " ... ".to_string(),
    };
    let user = if app.session.is_logged_in {
        if app.session.user_id.is_empty() {
            "logged in".to_string()
        } else {
            format!("user {}", app.session.user_id)
        }
    } else {
        "logged out".to_string()
    };
    let right = format!("[?] Help  {} ", user);

    let used = title.len() + location.len() + right.len();
    let padding = " ".repeat((area.width as usize).saturating_sub(used));

    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(location, Style::default().fg(Color::Yellow)),
        Span::raw(padding),
        Span::styled("[?] Help  ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} ", user),
            Style::default().fg(if app.session.is_logged_in {
                Color::Cyan
            } else {
                Color::Red
            }),
        ),
    ]);

    Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

fn render_status(area: Rect, buf: &mut Buffer, app: &App) {
    // Server messages first, then local errors, then the normal bar.
    let alert = if !app.message.is_empty() {
        Some(app.message.as_str())
    } else {
        app.error.as_deref()
    };
    if let Some(text) = alert {
        let line = Line::from(Span::styled(
            format!(" {} ", text),
            Style::default().fg(Color::Red).bg(Color::DarkGray),
        ));
        Paragraph::new(line)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
        return;
    }

    let sep = Span::styled(" | ", Style::default().fg(Color::Gray));
    let path = app
        .route
        .as_ref()
        .map(|r| r.path.clone())
        .unwrap_or_default();
    let mut spans = vec![Span::styled(
        format!(" {}", path),
        Style::default().fg(Color::Yellow),
    )];
    if let Some(from) = app.route.as_ref().and_then(|r| r.redirected_from.as_deref()) {
        spans.push(Span::styled(
            format!(" (from {})", from),
            Style::default().fg(Color::Gray),
        ));
    }
    if app.loading {
        spans.push(sep.clone());
        spans.push(Span::styled("loading", Style::default().fg(Color::Cyan)));
    }
    spans.push(sep.clone());
    spans.push(Span::styled(":: go  ?: help", Style::default().fg(Color::Gray)));
    if let Some(last) = app.log.last() {
        spans.push(sep);
        spans.push(Span::styled(last, Style::default().fg(Color::Gray)));
    }

    Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray))
        .render(area, buf);
}

fn render_log_popup(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let popup = help::centered_rect(
        area.width.saturating_sub(4),
        area.height.saturating_sub(4),
        area,
    );
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " LOG ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            " Ctrl+D / Esc to close ",
            Style::default().fg(Color::Gray),
        )));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines: Vec<Line> = app
        .log
        .tail(LOG_POPUP_LINES)
        .into_iter()
        .map(|l| {
            let style = log_style_for(&l);
            Line::from(Span::styled(l, style))
        })
        .collect();
    let skip = lines.len().saturating_sub(inner.height as usize);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(visible).wrap(Wrap { trim: false }), inner);
}

fn log_style_for(line: &str) -> Style {
    if line.contains("ERROR") {
        Style::default().fg(Color::Red)
    } else if line.contains("WARN") {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}
