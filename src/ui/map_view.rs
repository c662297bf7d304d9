use crate::app::{App, Focus};
use crate::braille::BrailleCanvas;
use crate::layout::{map_block, MapTabLayout};
use crate::map::markers::FUEL_COLOR_COUNT;
use crate::map::{FuelPalette, MapLayers, HIGHLIGHT_INK};
use crate::plants::{build_hover_text, HoverText};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use super::{notice, table_view};

const EMPTY_SELECTION: &str = "No plants match the current filters.";

/// Fuel colors by palette slot
const FUEL_COLORS: [Color; FUEL_COLOR_COUNT] = [
    Color::Rgb(0x63, 0x6E, 0xFA),
    Color::Rgb(0xEF, 0x55, 0x3B),
    Color::Rgb(0x00, 0xCC, 0x96),
    Color::Rgb(0xAB, 0x63, 0xFA),
    Color::Rgb(0xFF, 0xA1, 0x5A),
    Color::Rgb(0x19, 0xD3, 0xF3),
    Color::Rgb(0xFF, 0x66, 0x92),
    Color::Rgb(0xB6, 0xE8, 0x80),
    Color::Rgb(0xFF, 0x97, 0xFF),
    Color::Rgb(0xFE, 0xCB, 0x52),
];

fn ink_color(ink: u8) -> Color {
    if ink == HIGHLIGHT_INK {
        Color::White
    } else {
        FUEL_COLORS[ink as usize % FUEL_COLOR_COUNT]
    }
}

pub fn render_map_tab(frame: &mut Frame, app: &App, area: Rect) {
    // Neither map nor table is drawn for an empty selection
    if app.view().is_empty() {
        notice(frame, area, EMPTY_SELECTION, Color::Yellow);
        return;
    }

    let layout = MapTabLayout::new(area);
    render_map(frame, app, &layout);
    table_view::render_table(frame, app, layout.table);
}

fn render_map(frame: &mut Frame, app: &App, layout: &MapTabLayout) {
    let border = if app.focus == Focus::Map {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = map_block()
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" Power plants: {} ", app.filters()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = layout.map_inner();
    frame.render_widget(block, layout.map);

    let mut viewport = app.viewport.clone();
    viewport.resize_cells(inner.width, inner.height);

    let inspected = app.inspected();
    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        Some(app.markers()),
        inspected,
    );
    frame.render_widget(MapWidget { layers }, inner);

    render_legend(frame, app.markers().palette(), inner);

    if let Some(idx) = inspected {
        // Anchor next to the marker, or the top-left corner when it is off-screen
        let anchor = app
            .markers()
            .find(idx)
            .map(|m| viewport.project(m.lon, m.lat))
            .filter(|&(px, py)| viewport.is_visible(px, py))
            .map(|(px, py)| (inner.x + (px / 2) as u16, inner.y + (py / 4) as u16))
            .unwrap_or((inner.x, inner.y));
        if let Some(plant) = app.table().get(idx) {
            render_tooltip(frame, &build_hover_text(plant), anchor, inner);
        }
    }
}

/// Braille map layers, back to front
struct MapWidget {
    layers: MapLayers,
}

impl MapWidget {
    fn render_layer(
        canvas: &BrailleCanvas,
        color: impl Fn(Option<u8>) -> Color,
        area: Rect,
        buf: &mut Buffer,
    ) {
        for cell in canvas.cells() {
            if cell.col >= area.width as usize || cell.row >= area.height as usize {
                continue;
            }
            let x = area.x + cell.col as u16;
            let y = area.y + cell.row as u16;
            buf[(x, y)].set_char(cell.glyph).set_fg(color(cell.ink));
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_layer(&self.layers.coastlines, |_| Color::DarkGray, area, buf);
        Self::render_layer(&self.layers.borders, |_| Color::Rgb(90, 90, 90), area, buf);
        Self::render_layer(
            &self.layers.plants,
            |ink| ink.map_or(Color::White, ink_color),
            area,
            buf,
        );
    }
}

fn render_legend(frame: &mut Frame, palette: &FuelPalette, map: Rect) {
    if palette.is_empty() {
        return;
    }
    let width = palette
        .entries()
        .map(|(fuel, _)| fuel.chars().count() as u16 + 4)
        .max()
        .unwrap_or(0)
        .max(14);
    let height = palette.len() as u16 + 2;
    if width + 2 > map.width || height > map.height {
        return;
    }
    let area = Rect {
        x: map.x + map.width - width - 1,
        y: map.y,
        width: width + 1,
        height,
    };

    let lines: Vec<Line> = palette
        .entries()
        .map(|(fuel, ink)| {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(ink_color(ink))),
                Span::raw(fuel.to_string()),
            ])
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Primary fuel ");
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tooltip(frame: &mut Frame, hover: &HoverText, anchor: (u16, u16), map: Rect) {
    let width = (hover.width() as u16 + 2).min(map.width);
    let height = (hover.len() as u16 + 2).min(map.height);

    // Prefer right of and below the anchor; flip when it would leave the map
    let right = map.x + map.width;
    let bottom = map.y + map.height;
    let x = if anchor.0 + 2 + width <= right {
        anchor.0 + 2
    } else {
        anchor.0.saturating_sub(width + 1).max(map.x)
    };
    let y = if anchor.1 + 1 + height <= bottom {
        anchor.1 + 1
    } else {
        anchor.1.saturating_sub(height).max(map.y)
    };
    let area = Rect { x, y, width, height }.intersection(map);

    let lines: Vec<Line> = hover
        .lines
        .iter()
        .map(|line| {
            let style = if line.bold {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(line.text.clone(), style))
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
