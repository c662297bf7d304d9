//! Screen rendering. Everything here reads `App` and draws; no state changes.

mod image_view;
mod map_view;
mod table_view;

use crate::app::{App, FilterAxis, Tab};
use crate::assets::Panel;
use crate::layout::{centered, ScreenLayout};
use crate::plants::filter::{ALL_COUNTRIES, ALL_FUELS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

pub const TITLE: &str = "Global Power Plant Explorer";
const INTRO: &str = "Visualize the Global Power Plant Database on an interactive map. \
Filter by country and primary fuel, then inspect each plant's details.";
const FOOTER_TEXT: &str = "Thanks for exploring!";

/// Render the whole screen. Mutable only so image panels can cache their
/// encoded frames.
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = ScreenLayout::new(frame.area());

    render_header(frame, layout.header);
    render_sidebar(frame, app, layout.sidebar);
    render_tabs(frame, app, layout.tabs);

    match app.tab {
        Tab::Map => map_view::render_map_tab(frame, app, layout.content),
        Tab::Infographic => {
            image_view::render_infographic(frame, &mut app.assets.infographic, layout.content)
        }
        Tab::Estimation => image_view::render_estimation(
            frame,
            &mut app.assets.estimation,
            app.estimation_page,
            layout.content,
        ),
    }

    render_footer(frame, &mut app.assets.logo, layout.footer);
    render_status_bar(frame, app, layout.status);

    if app.dropdown.is_some() {
        render_dropdown(frame, app, layout.sidebar);
    }
}

/// Blocking screen shown when the plant data cannot be loaded
pub fn render_load_error(frame: &mut Frame, message: &str) {
    let area = centered(frame.area(), 72, 9);
    let text = vec![
        Line::from(Span::styled(
            "Could not load power plant data",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press q to exit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" {TITLE} "));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_header(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(INTRO, Style::default().fg(Color::Gray))),
    ];
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Cyan);

    let filters = app.filters();
    let mut lines = Vec::new();
    for (axis, shortcut, current) in [
        (FilterAxis::Country, "c", filters.country.label(ALL_COUNTRIES)),
        (FilterAxis::Fuel, "f", filters.fuel.label(ALL_FUELS)),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("[{shortcut}] "), key),
            Span::styled(axis.label(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(Span::styled(format!("  {current}"), value)));
        lines.push(Line::from(Span::styled(axis.help(), label)));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Showing ", label),
        Span::styled(app.view().len().to_string(), value),
        Span::styled(format!(" of {} plants", app.table().len()), label),
    ]));

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Filters ", Style::default().add_modifier(Modifier::BOLD)));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())));
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(tabs, area);
}

fn render_footer(frame: &mut Frame, logo: &mut Panel, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(inner);

    let thanks = Paragraph::new(Line::from(Span::styled(
        FOOTER_TEXT,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    let text_area = Rect {
        y: parts[0].y + parts[0].height / 2,
        height: 1.min(parts[0].height),
        ..parts[0]
    };
    frame.render_widget(thanks, text_area);

    image_view::render_panel(frame, logo, 0, parts[1], None);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let settings = &app.map_renderer.settings;
    let toggle = |on: bool, on_label: &'static str, off_label: &'static str| {
        Span::styled(
            if on { on_label } else { off_label },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        )
    };

    let lod = crate::map::Lod::from_zoom(app.viewport.zoom);
    let status = Line::from(vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", dim),
        Span::styled(lod.label(), Style::default().fg(Color::Magenta)),
        Span::styled(") ", dim),
        toggle(settings.show_coastlines, "[O]coast ", "[o]coast "),
        toggle(settings.show_borders, "[B]order ", "[b]order "),
        Span::styled("| ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", dim),
        Span::styled(format!("{} plants", app.view().len()), Style::default().fg(Color::Yellow)),
        Span::styled(
            " | c/f:filter t:table s/S:sort 1-3/Tab:view hjkl:pan +/-:zoom r:reset q:quit",
            dim,
        ),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

fn render_dropdown(frame: &mut Frame, app: &App, sidebar: Rect) {
    let Some(dropdown) = &app.dropdown else {
        return;
    };

    let height = (dropdown.options.len() as u16 + 2).min(frame.area().height.saturating_sub(2));
    let area = Rect {
        x: sidebar.x,
        y: sidebar.y,
        width: sidebar.width.max(20).min(frame.area().width),
        height: height.max(3),
    }
    .intersection(frame.area());

    let items: Vec<ListItem> = dropdown
        .options
        .iter()
        .map(|option| ListItem::new(option.as_str()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} (Enter: apply, Esc: cancel) ", dropdown.axis.label())),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(dropdown.cursor));
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

/// Bordered paragraph used for empty states and placeholders
fn notice(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = centered(area, area.width, 3);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text.to_string(), Style::default().fg(color))))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetPanels, FALLBACK_FONT_SIZE};
    use crate::map::MapRenderer;
    use crate::plants::tests::plant;
    use crate::plants::{FilterState, PlantTable, Selection};
    use ratatui::{backend::TestBackend, Terminal};
    use ratatui_image::picker::Picker;
    use std::sync::Arc;

    fn app(width: u16, height: u16) -> App {
        let mut gas = plant("Gas Works", Some("Chile"), Some("Gas"));
        gas.capacity_mw = Some(1200.0);
        gas.longitude = -70.0;
        gas.latitude = -33.0;
        let mut wind = plant("Wind Farm", Some("Chile"), Some("Wind"));
        wind.longitude = -71.0;
        wind.latitude = -30.0;

        let dir = tempfile::tempdir().unwrap();
        App::new(
            Arc::new(PlantTable::new(vec![gas, wind])),
            MapRenderer::new(),
            AssetPanels::discover(dir.path(), &Picker::from_fontsize(FALLBACK_FONT_SIZE)),
            Rect::new(0, 0, width, height),
        )
    }

    fn screen_text(app: &mut App) -> String {
        let backend = TestBackend::new(app.screen.width, app.screen.height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_map_tab_shows_shell_and_table() {
        let mut app = app(160, 48);
        let text = screen_text(&mut app);

        assert!(text.contains(TITLE));
        assert!(text.contains("Map explorer"));
        assert!(text.contains("Showing 2 of 2 plants"));
        assert!(text.contains("Plants in current selection (2)"));
        assert!(text.contains("Gas Works"));
        assert!(text.contains("Primary fuel"));
        assert!(text.contains(FOOTER_TEXT));
    }

    #[test]
    fn test_empty_selection_shows_warning() {
        let mut app = app(160, 48);
        app.apply_filters(FilterState::new(
            Selection::Only("Chile".into()),
            Selection::Only("Coal".into()),
        ));
        let text = screen_text(&mut app);

        assert!(text.contains("No plants match the current filters."));
        assert!(text.contains("Showing 0 of 2 plants"));
        assert!(!text.contains("Plants in current selection"));
        assert!(!text.contains("Commissioning year"));
    }

    #[test]
    fn test_load_error_screen_names_file_and_cause() {
        let error = crate::plants::DataLoadError::NotFound {
            path: std::path::PathBuf::from("/srv/plants.csv"),
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| render_load_error(frame, &error.to_string()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("Could not load power plant data"));
        assert!(text.contains("data file not found: /srv/plants.csv"));
        assert!(text.contains("Press q to exit"));
    }

    #[test]
    fn test_missing_assets_show_placeholders() {
        let mut app = app(160, 48);
        app.select_tab(Tab::Estimation);
        let text = screen_text(&mut app);
        assert!(text.contains("Add 1.jpeg through 8.jpeg"));

        app.select_tab(Tab::Infographic);
        let text = screen_text(&mut app);
        assert!(text.contains("Add infographic.png"));
    }

    #[test]
    fn test_table_focus_shows_tooltip() {
        let mut app = app(160, 48);
        app.toggle_focus();
        let text = screen_text(&mut app);
        assert!(text.contains("Capacity: 1,200 MW"));
    }

    #[test]
    fn test_dropdown_popup_lists_options() {
        let mut app = app(160, 48);
        app.open_dropdown(FilterAxis::Fuel);
        let text = screen_text(&mut app);
        assert!(text.contains("All fuels"));
        assert!(text.contains("Wind"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = app(20, 8);
        screen_text(&mut app);
    }
}
