//! Main content area: one renderer per view.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{App, LoginField};
use crate::cli::buckets::{format_duration, format_time};
use crate::router::View;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(route) = &app.route else {
        render_notice(frame, area, "Loading", "Resolving route...");
        return;
    };

    match route.view {
        View::Login => render_login(frame, area, app),
        View::Teams => render_teams(frame, area, app),
        View::TeamDetail => render_team(frame, area, app),
        View::Buckets => render_buckets(frame, area, app),
        View::Bucket => render_events(frame, area, app),
        View::NotFound => render_notice(
            frame,
            area,
            "Not found",
            &format!("Nothing lives at {}. Press : to go somewhere else.", route.path),
        ),
        view => {
            let context = match route.parent {
                Some(parent) => format!("{} / {}", parent, view),
                None => view.to_string(),
            };
            let params = route
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            let mut body = format!(
                "{} is only available in the web dashboard.\n\nRoute: {}",
                context, route.path
            );
            if !params.is_empty() {
                body.push_str(&format!("\nParams: {}", params));
            }
            render_notice(frame, area, view.as_str(), &body);
        }
    }
}

fn pane(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn render_notice(frame: &mut Frame, area: Rect, title: &str, body: &str) {
    let para = Paragraph::new(body.to_string())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: false })
        .block(pane(title));
    frame.render_widget(para, area);
}

/// Renders `items` as a selectable list, or `empty` when there is nothing to show.
fn render_list(frame: &mut Frame, area: Rect, app: &App, title: &str, items: Vec<ListItem>, empty: &str) {
    if items.is_empty() {
        let text = if app.loading { "Loading..." } else { empty };
        render_notice(frame, area, title, text);
        return;
    }
    let list = List::new(items)
        .block(pane(title))
        .highlight_style(highlight())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_login(frame: &mut Frame, area: Rect, app: &App) {
    let block = pane("Log in");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [_, email_area, password_area, _, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner.inner(ratatui::layout::Margin::new(2, 0)));

    app.email
        .render(frame, email_area, "Email:   ", app.login_field == LoginField::Email);
    app.password.render(
        frame,
        password_area,
        "Password:",
        app.login_field == LoginField::Password,
    );

    let hint = if app.loading {
        "Logging in..."
    } else if app.session.is_logged_in {
        "Already logged in. t: teams  b: buckets  :: go  L: log out"
    } else {
        "Tab: switch field  Enter: log in  Esc: quit"
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::Gray)),
        hint_area,
    );
}

fn render_teams(frame: &mut Frame, area: Rect, app: &App) {
    let items = app
        .teams
        .iter()
        .map(|team| {
            let members = team
                .count
                .map(|c| format!("  ({} members)", c))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>4}  ", team.id), Style::default().fg(Color::Gray)),
                Span::raw(team.name.clone()),
                Span::styled(members, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    render_list(
        frame,
        area,
        app,
        "Teams  (Enter: open, n: new)",
        items,
        "You do not own any teams yet. Press n to create one.",
    );
}

fn render_team(frame: &mut Frame, area: Rect, app: &App) {
    let Some(team) = &app.team else {
        let text = if app.loading {
            "Loading..."
        } else {
            "Team could not be loaded."
        };
        render_notice(frame, area, "Team", text);
        return;
    };

    let [info_area, members_area] =
        Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).areas(area);

    let apps = if team.apps.is_empty() {
        "(all)".to_string()
    } else {
        team.apps.join(", ")
    };
    let info = vec![
        Line::from(Span::raw(team.description.clone())),
        Line::from(vec![
            Span::styled("Tracked apps: ", Style::default().fg(Color::Gray)),
            Span::raw(apps),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(info)
            .wrap(Wrap { trim: true })
            .block(pane(&team.name)),
        info_area,
    );

    let items = team
        .members
        .iter()
        .map(|m| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>4}  ", m.user_id), Style::default().fg(Color::Gray)),
                Span::raw(format!("{} {}", m.name, m.lastname)),
                Span::styled(format!("  <{}>", m.email), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    render_list(frame, members_area, app, "Members", items, "No members yet.");
}

fn render_buckets(frame: &mut Frame, area: Rect, app: &App) {
    let items = app
        .buckets
        .iter()
        .map(|(id, bucket)| {
            ListItem::new(Line::from(vec![
                Span::raw(id.clone()),
                Span::styled(
                    format!(
                        "  {}  {}  updated {}",
                        bucket.kind,
                        bucket.hostname.as_deref().unwrap_or("-"),
                        format_time(bucket.last_updated)
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();
    render_list(
        frame,
        area,
        app,
        "Buckets  (Enter: events)",
        items,
        "No buckets for this user.",
    );
}

fn render_events(frame: &mut Frame, area: Rect, app: &App) {
    let title = app
        .route
        .as_ref()
        .and_then(|r| r.param("id"))
        .unwrap_or("Bucket")
        .to_string();
    let items = app
        .events
        .iter()
        .map(|event| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}  ", format_time(Some(event.timestamp))),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("{:>8}  ", format_duration(event.duration)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(event.label()),
            ]))
        })
        .collect();
    render_list(frame, area, app, &title, items, "No events in this bucket.");
}
