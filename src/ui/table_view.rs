//! Table of the plants in the current selection.

use crate::app::{App, Column, Focus};
use crate::plants::hover::format_thousands;
use crate::plants::PowerPlant;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Row, Table, TableState},
    Frame,
};

pub fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(Column::ALL.iter().map(|&column| {
        let indicator = match app.sort {
            Some(sort) if sort.column == column => {
                if sort.ascending {
                    "▲"
                } else {
                    "▼"
                }
            }
            _ => "",
        };
        Span::styled(format!("{}{}", column.header(), indicator), header_style)
    }))
    .height(1);

    // Only build the rows that fit on screen
    let visible = area.height.saturating_sub(3) as usize;
    let offset = window_offset(app.table_cursor, visible);
    let plants = app.table().plants();
    let rows: Vec<Row> = app
        .rows()
        .iter()
        .skip(offset)
        .take(visible)
        .map(|&idx| Row::new(cells(&plants[idx])).height(1))
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Fill(2),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Fill(1),
        Constraint::Length(18),
        Constraint::Fill(2),
    ];

    let border = if app.focus == Focus::Table {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" Plants in current selection ({}) ", app.view().len())),
        )
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    let mut state = TableState::default();
    if app.focus == Focus::Table && !app.rows().is_empty() {
        state.select(Some(app.table_cursor - offset));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

/// First visible row so that `cursor` stays on screen
fn window_offset(cursor: usize, visible: usize) -> usize {
    cursor.saturating_sub(visible.saturating_sub(1))
}

/// Display cells in column order; absent values stay blank
fn cells(plant: &PowerPlant) -> [String; 7] {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        text(&plant.country_long),
        plant.name.clone(),
        plant.capacity_mw.map(format_thousands).unwrap_or_default(),
        text(&plant.primary_fuel),
        text(&plant.other_fuels),
        plant
            .commissioning_year
            .map(|y| y.to_string())
            .unwrap_or_default(),
        text(&plant.owner),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plants::tests::plant;

    #[test]
    fn test_absent_values_render_blank() {
        let mut p = plant("Hoover", Some("USA"), None);
        p.capacity_mw = Some(2080.0);
        p.commissioning_year = Some(1936);

        assert_eq!(
            cells(&p),
            ["USA", "Hoover", "2,080", "", "", "1936", ""].map(String::from)
        );
    }

    #[test]
    fn test_window_keeps_cursor_visible() {
        assert_eq!(window_offset(0, 10), 0);
        assert_eq!(window_offset(9, 10), 0);
        assert_eq!(window_offset(10, 10), 1);
        assert_eq!(window_offset(5, 0), 5);
    }
}
