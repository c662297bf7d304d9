use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use plant_map::app::{App, FilterAxis, Focus, Tab};
use plant_map::assets::{self, AssetPanels};
use plant_map::config::Args;
use plant_map::map::MapRenderer;
use plant_map::plants::TableCache;
use plant_map::{data, logging, ui};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_dir.as_deref())?;

    let data_path = args.data_path()?;
    let assets_dir = args.assets_dir()?;
    let basemap_dir = args.basemap_dir()?;
    let mut cache = TableCache::new();
    let loaded = cache.get_or_load(&data_path);

    // Query graphics support before the terminal enters raw mode
    let picker = assets::detect_picker();

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = match loaded {
        Ok(table) => {
            let size = terminal.size()?;
            let mut renderer = MapRenderer::new();
            data::load_basemap(&mut renderer, &basemap_dir);
            let assets = AssetPanels::discover(&assets_dir, &picker);
            let screen = Rect::new(0, 0, size.width, size.height);
            let app = App::new(table, renderer, assets, screen);
            run(&mut terminal, app)
        }
        Err(e) => {
            tracing::error!(path = %data_path.display(), error = %e, "Failed to load plant data");
            let shown = show_load_error(&mut terminal, &e.to_string());
            shown.and(Err(e.into()))
        }
    };

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Blocking error screen; returns once q or Esc is pressed
fn show_load_error(terminal: &mut DefaultTerminal, message: &str) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render_load_error(frame, message))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(());
            }
        }
    }
}

/// Keys while a filter dropdown is open
fn handle_dropdown_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => return app.close_dropdown(),
        KeyCode::Enter => return app.confirm_dropdown(),
        _ => {}
    }

    let Some(dropdown) = app.dropdown.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Up => dropdown.move_by(-1),
        KeyCode::Down => dropdown.move_by(1),
        KeyCode::PageUp => dropdown.move_by(-10),
        KeyCode::PageDown => dropdown.move_by(10),
        KeyCode::Home => dropdown.first(),
        KeyCode::End => dropdown.last(),
        KeyCode::Char(ch) => dropdown.jump_to(ch),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.dropdown.is_some() {
        handle_dropdown_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Views
        KeyCode::Char('1') => app.select_tab(Tab::Map),
        KeyCode::Char('2') => app.select_tab(Tab::Infographic),
        KeyCode::Char('3') => app.select_tab(Tab::Estimation),
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),

        // Filters
        KeyCode::Char('c') => app.open_dropdown(FilterAxis::Country),
        KeyCode::Char('f') => app.open_dropdown(FilterAxis::Fuel),

        _ => match app.tab {
            Tab::Map => handle_map_key(app, key),
            Tab::Estimation => match key.code {
                KeyCode::Left | KeyCode::Char('h') => app.prev_page(),
                KeyCode::Right | KeyCode::Char('l') => app.next_page(),
                _ => {}
            },
            Tab::Infographic => {}
        },
    }
}

fn handle_map_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('t') => app.toggle_focus(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('S') => app.flip_sort(),

        // Layer toggles
        KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
        KeyCode::Char('o') | KeyCode::Char('O') => app.map_renderer.toggle_coastlines(),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

        _ => match app.focus {
            Focus::Map => match key.code {
                // Pan with hjkl or arrow keys
                KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),
                _ => {}
            },
            Focus::Table => match key.code {
                KeyCode::Up | KeyCode::Char('k') => app.move_table_cursor(-1),
                KeyCode::Down | KeyCode::Char('j') => app.move_table_cursor(1),
                KeyCode::PageUp => app.table_page(-1),
                KeyCode::PageDown => app.table_page(1),
                KeyCode::Home | KeyCode::Char('g') => app.table_home(),
                KeyCode::End | KeyCode::Char('G') => app.table_end(),
                _ => {}
            },
        },
    }
}

/// Handle mouse events for hover, panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved => app.hover_at(mouse.column, mouse.row),
        // Scroll wheel zooms towards the mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click and drag to pan
        MouseEventKind::Down(MouseButton::Left) => {
            if app.map_pixel(mouse.column, mouse.row).is_some() {
                app.last_mouse = Some((mouse.column, mouse.row));
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if app.last_mouse.is_some() => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
            app.hover_at(mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Nothing animates, so block until the next event
        match event::read()? {
            // Only handle key press events (not release)
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
            Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
            Event::Resize(width, height) => app.resize(width, height),
            _ => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
