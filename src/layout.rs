//! Screen geometry shared by rendering and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

pub const HEADER_HEIGHT: u16 = 4;
pub const SIDEBAR_WIDTH: u16 = 34;
pub const FOOTER_HEIGHT: u16 = 8;
pub const TABS_HEIGHT: u16 = 2;

/// Top-level regions of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub sidebar: Rect,
    pub tabs: Rect,
    pub content: Rect,
    pub footer: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(6),
                Constraint::Length(FOOTER_HEIGHT),
                Constraint::Length(1),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(rows[1]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(TABS_HEIGHT), Constraint::Min(3)])
            .split(body[1]);

        Self {
            header: rows[0],
            sidebar: body[0],
            tabs: main[0],
            content: main[1],
            footer: rows[2],
            status: rows[3],
        }
    }
}

/// Map and table halves of the map tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapTabLayout {
    pub map: Rect,
    pub table: Rect,
}

impl MapTabLayout {
    pub fn new(content: Rect) -> Self {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(62), Constraint::Min(4)])
            .split(content);
        Self {
            map: parts[0],
            table: parts[1],
        }
    }

    /// Map drawing area inside its border
    pub fn map_inner(&self) -> Rect {
        map_block().inner(self.map)
    }

    /// Table body rows visible below the border and header
    pub fn table_rows(&self) -> usize {
        self.table.height.saturating_sub(3) as usize
    }
}

/// Border around the map; shared so hit-testing matches drawing
pub fn map_block() -> Block<'static> {
    Block::default().borders(Borders::ALL)
}

/// Centered rectangle of at most `width` x `height`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
