//! Shortcut overlay, generated from the key map.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Cell, Clear, Row, Table},
    Frame,
};

use super::keymap::{self, Section};

const KEY_COLUMN: u16 = 10;
const POPUP_WIDTH: u16 = 60;

/// Section headings followed by their bindings, with a gap between sections.
fn rows() -> Vec<Row<'static>> {
    let mut rows = Vec::new();
    for section in Section::ALL {
        if !rows.is_empty() {
            rows.push(Row::new(vec![Cell::from("")]));
        }
        rows.push(
            Row::new(vec![Cell::from(section.title())]).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
        );
        rows.extend(keymap::in_section(section).map(|b| {
            Row::new(vec![
                Cell::from(b.label).style(Style::default().fg(Color::Yellow)),
                Cell::from(b.desc).style(Style::default().fg(Color::Gray)),
            ])
        }));
    }
    rows
}

pub fn render_help_popup(frame: &mut Frame) {
    let rows = rows();
    let area = frame.area();
    // borders take two rows
    let popup = centered_rect(POPUP_WIDTH, rows.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);

    let table = Table::new(rows, [Constraint::Length(KEY_COLUMN), Constraint::Fill(1)])
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Keys ")
                .title_bottom(Line::from(" any key closes ").right_aligned()),
        );
    frame.render_widget(table, popup);
}

/// Return a centered sub-rect of the given size within `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
