use std::cmp::Ordering;
use std::sync::Arc;

use ratatui::layout::Rect;

use crate::assets::AssetPanels;
use crate::layout::{MapTabLayout, ScreenLayout};
use crate::map::{MapRenderer, PlantMarkers, Viewport};
use crate::plants::filter::{ALL_COUNTRIES, ALL_FUELS};
use crate::plants::{filter, FilterState, FilteredView, PlantTable, PowerPlant, Selection};

/// View panels, mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Map,
    Infographic,
    Estimation,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Map, Tab::Infographic, Tab::Estimation];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Map => "Map explorer",
            Tab::Infographic => "Infographic",
            Tab::Estimation => "Estimating Power Plant Generation",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Map => 0,
            Tab::Infographic => 1,
            Tab::Estimation => 2,
        }
    }

    fn offset(self, delta: isize) -> Tab {
        let len = Self::ALL.len() as isize;
        Self::ALL[(self.index() as isize + delta).rem_euclid(len) as usize]
    }
}

/// Which half of the map tab receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Map,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAxis {
    Country,
    Fuel,
}

impl FilterAxis {
    pub fn label(self) -> &'static str {
        match self {
            FilterAxis::Country => "Country",
            FilterAxis::Fuel => "Primary fuel",
        }
    }

    pub fn all_label(self) -> &'static str {
        match self {
            FilterAxis::Country => ALL_COUNTRIES,
            FilterAxis::Fuel => ALL_FUELS,
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            FilterAxis::Country => "Choose a country to display (or show all).",
            FilterAxis::Fuel => "Color and filter plants by their primary fuel (or show all).",
        }
    }
}

/// Open dropdown list for one filter axis. Option 0 is the "all" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    pub axis: FilterAxis,
    pub options: Vec<String>,
    pub cursor: usize,
}

impl Dropdown {
    fn open(axis: FilterAxis, values: &[String], current: &Selection) -> Self {
        let mut options = Vec::with_capacity(values.len() + 1);
        options.push(axis.all_label().to_string());
        options.extend(values.iter().cloned());

        let cursor = match current {
            Selection::All => 0,
            Selection::Only(v) => values.iter().position(|o| o == v).map_or(0, |i| i + 1),
        };
        Self {
            axis,
            options,
            cursor,
        }
    }

    pub fn move_by(&mut self, delta: isize) {
        let last = self.options.len().saturating_sub(1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.options.len().saturating_sub(1);
    }

    /// Jump to the next option after the cursor starting with `ch`,
    /// wrapping around; case-insensitive
    pub fn jump_to(&mut self, ch: char) {
        let ch = ch.to_lowercase().next().unwrap_or(ch);
        let len = self.options.len();
        let hit = (1..=len).map(|step| (self.cursor + step) % len).find(|&i| {
            self.options[i]
                .chars()
                .next()
                .and_then(|c| c.to_lowercase().next())
                == Some(ch)
        });
        if let Some(i) = hit {
            self.cursor = i;
        }
    }

    pub fn selection(&self) -> Selection {
        match self.cursor {
            0 => Selection::All,
            i => Selection::Only(self.options[i].clone()),
        }
    }
}

/// Table columns in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Country,
    Name,
    Capacity,
    PrimaryFuel,
    OtherFuels,
    CommissioningYear,
    Owner,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Country,
        Column::Name,
        Column::Capacity,
        Column::PrimaryFuel,
        Column::OtherFuels,
        Column::CommissioningYear,
        Column::Owner,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Country => "Country",
            Column::Name => "Name",
            Column::Capacity => "Capacity (MW)",
            Column::PrimaryFuel => "Primary fuel",
            Column::OtherFuels => "Other fuels",
            Column::CommissioningYear => "Commissioning year",
            Column::Owner => "Owner",
        }
    }

    /// Compare two plants on this column; absent values sort last
    fn compare(self, a: &PowerPlant, b: &PowerPlant) -> Ordering {
        match self {
            Column::Country => absent_last(&a.country_long, &b.country_long, Ord::cmp),
            Column::Name => a.name.cmp(&b.name),
            Column::Capacity => absent_last(&a.capacity_mw, &b.capacity_mw, f64::total_cmp),
            Column::PrimaryFuel => absent_last(&a.primary_fuel, &b.primary_fuel, Ord::cmp),
            Column::OtherFuels => absent_last(&a.other_fuels, &b.other_fuels, Ord::cmp),
            Column::CommissioningYear => {
                absent_last(&a.commissioning_year, &b.commissioning_year, Ord::cmp)
            }
            Column::Owner => absent_last(&a.owner, &b.owner, Ord::cmp),
        }
    }
}

fn absent_last<T>(a: &Option<T>, b: &Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Optional display sort for the table. Only reorders what is shown; the
/// filtered view keeps table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub column: Column,
    pub ascending: bool,
}

/// Application state. The plant table is shared and never mutated; the
/// filter state is replaced wholesale on each change and everything derived
/// from it is rebuilt.
pub struct App {
    table: Arc<PlantTable>,
    countries: Vec<String>,
    fuels: Vec<String>,
    filters: FilterState,
    view: FilteredView,
    markers: PlantMarkers,
    /// Table indices in display order
    rows: Vec<usize>,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub assets: AssetPanels,
    pub tab: Tab,
    pub focus: Focus,
    pub dropdown: Option<Dropdown>,
    pub sort: Option<TableSort>,
    pub table_cursor: usize,
    pub estimation_page: usize,
    /// Plant under the mouse cursor
    pub hovered: Option<usize>,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    pub screen: Rect,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        table: Arc<PlantTable>,
        map_renderer: MapRenderer,
        assets: AssetPanels,
        screen: Rect,
    ) -> Self {
        let countries = table.countries();
        let fuels = table.fuels();
        let filters = FilterState::default();
        let view = filter(&table, &filters);
        let markers = PlantMarkers::build(&view);

        let mut app = Self {
            table,
            countries,
            fuels,
            filters,
            view,
            markers,
            rows: Vec::new(),
            viewport: Viewport::world(0, 0),
            map_renderer,
            assets,
            tab: Tab::Map,
            focus: Focus::Map,
            dropdown: None,
            sort: None,
            table_cursor: 0,
            estimation_page: 0,
            hovered: None,
            last_mouse: None,
            screen,
            should_quit: false,
        };
        app.rebuild_rows();
        app.resize(screen.width, screen.height);
        app.reset_view();
        app
    }

    pub fn table(&self) -> &Arc<PlantTable> {
        &self.table
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn markers(&self) -> &PlantMarkers {
        &self.markers
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn fuels(&self) -> &[String] {
        &self.fuels
    }

    /// Table indices in display order
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn map_layout(&self) -> MapTabLayout {
        MapTabLayout::new(ScreenLayout::new(self.screen).content)
    }

    /// Replace the filter state and re-derive every dependent view
    pub fn apply_filters(&mut self, filters: FilterState) {
        self.view = filter(&self.table, &filters);
        self.markers = PlantMarkers::build(&self.view);
        self.filters = filters;
        self.table_cursor = 0;
        self.hovered = None;
        self.rebuild_rows();
        if let Some((lon, lat)) = self.markers.center() {
            self.viewport.recenter(lon, lat);
        }
        tracing::debug!(
            filters = %self.filters,
            plants = self.view.len(),
            fuels = self.markers.palette().len(),
            "Applied filters"
        );
    }

    fn rebuild_rows(&mut self) {
        self.rows = self.view.indices().to_vec();
        if let Some(sort) = self.sort {
            let plants = self.table.plants();
            self.rows.sort_by(|&a, &b| {
                let ord = sort.column.compare(&plants[a], &plants[b]);
                if sort.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        self.table_cursor = self.table_cursor.min(self.rows.len().saturating_sub(1));
    }

    // Dropdowns

    pub fn open_dropdown(&mut self, axis: FilterAxis) {
        let (values, current) = match axis {
            FilterAxis::Country => (&self.countries, &self.filters.country),
            FilterAxis::Fuel => (&self.fuels, &self.filters.fuel),
        };
        self.dropdown = Some(Dropdown::open(axis, values, current));
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown = None;
    }

    /// Apply the highlighted option of the open dropdown
    pub fn confirm_dropdown(&mut self) {
        if let Some(dropdown) = self.dropdown.take() {
            let selection = dropdown.selection();
            let next = match dropdown.axis {
                FilterAxis::Country => self.filters.with_country(selection),
                FilterAxis::Fuel => self.filters.with_fuel(selection),
            };
            if next != self.filters {
                self.apply_filters(next);
            }
        }
    }

    // Tabs and focus

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.hovered = None;
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.tab.offset(1));
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.tab.offset(-1));
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Map => Focus::Table,
            Focus::Table => Focus::Map,
        };
    }

    // Table

    pub fn move_table_cursor(&mut self, delta: isize) {
        let last = self.rows.len().saturating_sub(1) as isize;
        self.table_cursor = (self.table_cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn table_page(&mut self, pages: isize) {
        let page = self.map_layout().table_rows().max(1) as isize;
        self.move_table_cursor(pages * page);
    }

    pub fn table_home(&mut self) {
        self.table_cursor = 0;
    }

    pub fn table_end(&mut self) {
        self.table_cursor = self.rows.len().saturating_sub(1);
    }

    /// Cycle the sort column: none, then each column in order, then none
    pub fn cycle_sort(&mut self) {
        let next_column = match self.sort {
            None => Some(Column::ALL[0]),
            Some(sort) => {
                let pos = Column::ALL.iter().position(|&c| c == sort.column).unwrap_or(0);
                Column::ALL.get(pos + 1).copied()
            }
        };
        self.sort = next_column.map(|column| TableSort {
            column,
            ascending: true,
        });
        self.rebuild_rows();
    }

    pub fn flip_sort(&mut self) {
        if let Some(sort) = &mut self.sort {
            sort.ascending = !sort.ascending;
            self.rebuild_rows();
        }
    }

    /// Plant whose tooltip is shown: the hovered one, else the table cursor
    /// when the table has focus
    pub fn inspected(&self) -> Option<usize> {
        self.hovered.or_else(|| match self.focus {
            Focus::Table => self.rows.get(self.table_cursor).copied(),
            Focus::Map => None,
        })
    }

    // Estimation pages

    pub fn next_page(&mut self) {
        let last = self.assets.estimation.assets.len().saturating_sub(1);
        self.estimation_page = (self.estimation_page + 1).min(last);
    }

    pub fn prev_page(&mut self) {
        self.estimation_page = self.estimation_page.saturating_sub(1);
    }

    // Map

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        let inner = self.map_layout().map_inner();
        self.viewport.resize_cells(inner.width, inner.height);
    }

    /// World zoom, centered on the current selection
    pub fn reset_view(&mut self) {
        let (lon, lat) = self.markers.center().unwrap_or((0.0, 20.0));
        self.viewport = Viewport::new(lon, lat, 1.0, self.viewport.width, self.viewport.height);
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
        self.hovered = None;
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Terminal cell to map dot coordinates, if the cell is on the map
    pub fn map_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        if self.tab != Tab::Map || self.view.is_empty() {
            return None;
        }
        let inner = self.map_layout().map_inner();
        let inside = col >= inner.x
            && col < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height;
        inside.then(|| (((col - inner.x) as i32) * 2 + 1, ((row - inner.y) as i32) * 4 + 2))
    }

    /// Track the plant under the mouse
    pub fn hover_at(&mut self, col: u16, row: u16) {
        self.hovered = self
            .map_pixel(col, row)
            .and_then(|(px, py)| self.markers.pick(&self.viewport, px, py));
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = (last_col as i32 - col as i32) * 2;
            let dy = (last_row as i32 - row as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((col, row));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plants::tests::plant;
    use crate::assets::FALLBACK_FONT_SIZE;
    use ratatui_image::picker::Picker;

    fn app() -> App {
        let mut rows = vec![
            plant("Zeta", Some("USA"), Some("Gas")),
            plant("Alpha", Some("USA"), Some("Coal")),
            plant("Mid", Some("France"), Some("Nuclear")),
            plant("NoFuel", Some("France"), None),
        ];
        rows[0].capacity_mw = Some(50.0);
        rows[1].capacity_mw = Some(900.0);
        rows[0].longitude = -100.0;
        rows[1].longitude = -80.0;
        rows[2].longitude = 2.0;
        for row in &mut rows {
            row.latitude = 40.0;
        }

        let dir = tempfile::tempdir().unwrap();
        App::new(
            Arc::new(PlantTable::new(rows)),
            MapRenderer::new(),
            AssetPanels::discover(dir.path(), &Picker::from_fontsize(FALLBACK_FONT_SIZE)),
            Rect::new(0, 0, 140, 48),
        )
    }

    #[test]
    fn test_starts_with_all_selected() {
        let app = app();
        assert_eq!(app.filters(), &FilterState::default());
        assert_eq!(app.view().len(), 3);
        assert_eq!(app.countries(), ["France", "USA"]);
    }

    #[test]
    fn test_dropdown_applies_selection() {
        let mut app = app();
        app.open_dropdown(FilterAxis::Country);
        let dropdown = app.dropdown.as_ref().unwrap();
        assert_eq!(dropdown.options, vec!["All countries", "France", "USA"]);

        app.dropdown.as_mut().unwrap().jump_to('u');
        app.confirm_dropdown();

        assert_eq!(app.filters().country, Selection::Only("USA".to_string()));
        assert_eq!(app.rows(), [0, 1]);
        assert!(app.dropdown.is_none());

        // Reopening starts at the current value
        app.open_dropdown(FilterAxis::Country);
        assert_eq!(app.dropdown.as_ref().unwrap().cursor, 2);
    }

    #[test]
    fn test_options_stay_stable_across_selection() {
        let mut app = app();
        app.apply_filters(FilterState::default().with_fuel(Selection::Only("Gas".into())));
        app.open_dropdown(FilterAxis::Country);
        assert_eq!(app.dropdown.as_ref().unwrap().options.len(), 3);
    }

    #[test]
    fn test_empty_selection_is_a_valid_state() {
        let mut app = app();
        app.apply_filters(FilterState::new(
            Selection::Only("France".into()),
            Selection::Only("Coal".into()),
        ));

        assert!(app.view().is_empty());
        assert!(app.markers().is_empty());
        assert_eq!(app.inspected(), None);
        assert_eq!(app.map_pixel(80, 15), None);
    }

    #[test]
    fn test_sort_reorders_display_only() {
        let mut app = app();
        app.cycle_sort(); // Country
        app.cycle_sort(); // Name
        assert_eq!(app.rows(), [1, 2, 0]);
        assert_eq!(app.view().indices(), [0, 1, 2]);

        app.flip_sort();
        assert_eq!(app.rows(), [0, 2, 1]);

        app.cycle_sort(); // Capacity ascending, absent last
        assert_eq!(app.rows(), [0, 1, 2]);
    }

    #[test]
    fn test_sort_cycle_returns_to_file_order() {
        let mut app = app();
        for _ in 0..Column::ALL.len() {
            app.cycle_sort();
        }
        assert_eq!(app.sort.map(|s| s.column), Some(Column::Owner));
        app.cycle_sort();
        assert_eq!(app.sort, None);
        assert_eq!(app.rows(), [0, 1, 2]);
    }

    #[test]
    fn test_table_focus_inspects_cursor_row() {
        let mut app = app();
        assert_eq!(app.inspected(), None);

        app.toggle_focus();
        app.move_table_cursor(1);
        assert_eq!(app.inspected(), Some(1));

        app.move_table_cursor(10);
        assert_eq!(app.table_cursor, 2);
    }

    #[test]
    fn test_hover_picks_marker() {
        let mut app = app();
        let inner = app.map_layout().map_inner();
        let (px, py) = app.viewport.project(2.0, 40.0);
        let col = inner.x + (px / 2) as u16;
        let row = inner.y + (py / 4) as u16;

        app.hover_at(col, row);
        assert_eq!(app.hovered, Some(2));
        assert_eq!(app.inspected(), Some(2));

        app.select_tab(Tab::Infographic);
        assert_eq!(app.hovered, None);
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let mut app = app();
        app.prev_tab();
        assert_eq!(app.tab, Tab::Estimation);
        app.next_tab();
        assert_eq!(app.tab, Tab::Map);
    }

    #[test]
    fn test_dropdown_jump_wraps_and_ignores_case() {
        let values = vec!["Biomass".to_string(), "Coal".to_string(), "Cogeneration".to_string()];
        let mut dropdown = Dropdown::open(FilterAxis::Fuel, &values, &Selection::All);

        dropdown.jump_to('C');
        assert_eq!(dropdown.cursor, 2);
        dropdown.jump_to('c');
        assert_eq!(dropdown.cursor, 3);
        dropdown.jump_to('c');
        assert_eq!(dropdown.cursor, 2);
        dropdown.jump_to('x');
        assert_eq!(dropdown.cursor, 2);
        dropdown.first();
        assert_eq!(dropdown.selection(), Selection::All);
    }
}
