//! Static image panels. Images go through `ratatui-image`, which picks
//! sixel, kitty or iTerm2 graphics when the terminal has them and half
//! blocks otherwise; the encoded frame is cached until the area changes.

use crate::assets::{Asset, Panel, INFOGRAPHIC_CAPTION};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use ratatui_image::{Resize, StatefulImage};

use super::notice;

pub fn render_infographic(frame: &mut Frame, panel: &mut Panel, area: Rect) {
    render_panel(frame, panel, 0, area, Some(INFOGRAPHIC_CAPTION));
}

pub fn render_estimation(frame: &mut Frame, panel: &mut Panel, page: usize, area: Rect) {
    if panel.is_missing() {
        render_panel(frame, panel, 0, area, None);
        return;
    }

    let page = page.min(panel.assets.len() - 1);
    let caption = format!(
        "Image {} of {} ({})   ←/→ to browse",
        page + 1,
        panel.assets.len(),
        panel.assets[page].name()
    );
    render_panel(frame, panel, page, area, Some(caption.as_str()));
}

/// Draw one asset of a panel scaled into `area`, or the panel's placeholder
/// when it has no assets
pub fn render_panel(
    frame: &mut Frame,
    panel: &mut Panel,
    index: usize,
    area: Rect,
    caption: Option<&str>,
) {
    let (image_area, caption_area) = match caption {
        Some(_) if area.height > 2 => (
            Rect {
                height: area.height - 1,
                ..area
            },
            Some(Rect {
                y: area.y + area.height - 1,
                height: 1,
                ..area
            }),
        ),
        _ => (area, None),
    };

    match panel.assets.get_mut(index) {
        None => {
            notice(frame, area, &panel.placeholder, Color::Blue);
            return;
        }
        Some(Asset::Ready { protocol, .. }) => {
            let image = StatefulImage::default().resize(Resize::Scale(None));
            frame.render_stateful_widget(image, image_area, protocol);
        }
        Some(Asset::Unreadable { name, error }) => notice(
            frame,
            image_area,
            &format!("Could not display {name}: {error}"),
            Color::Red,
        ),
    }

    if let (Some(text), Some(caption_area)) = (caption, caption_area) {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                text.to_string(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )))
            .alignment(Alignment::Center),
            caption_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetPanels, FALLBACK_FONT_SIZE, INFOGRAPHIC_FILE};
    use ratatui::{backend::TestBackend, Terminal};
    use ratatui_image::picker::Picker;

    fn draw(panel: &mut Panel, caption: Option<&str>) -> ratatui::buffer::Buffer {
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).unwrap();
        terminal
            .draw(|frame| render_panel(frame, panel, 0, frame.area(), caption))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    #[test]
    fn test_ready_image_fills_cells_and_keeps_caption() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::from_pixel(32, 32, image::Rgb([255, 0, 0]))
            .save(dir.path().join(INFOGRAPHIC_FILE))
            .unwrap();
        let picker = Picker::from_fontsize(FALLBACK_FONT_SIZE);
        let mut panels = AssetPanels::discover(dir.path(), &picker);

        let buf = draw(&mut panels.infographic, Some(INFOGRAPHIC_CAPTION));

        let painted = (0..buf.area.width)
            .flat_map(|x| (0..7).map(move |y| (x, y)))
            .any(|(x, y)| {
                let cell = &buf[(x, y)];
                [cell.fg, cell.bg]
                    .iter()
                    .any(|c| matches!(c, Color::Rgb(r, g, _) if *r > 200 && *g < 50))
            });
        assert!(painted);
        let caption: String = (0..buf.area.width).map(|x| buf[(x, 7)].symbol()).collect();
        assert!(caption.contains("Global Power"));
    }

    #[test]
    fn test_undecodable_image_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INFOGRAPHIC_FILE), b"nope").unwrap();
        let picker = Picker::from_fontsize(FALLBACK_FONT_SIZE);
        let mut panels = AssetPanels::discover(dir.path(), &picker);

        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal
            .draw(|frame| render_panel(frame, &mut panels.infographic, 0, frame.area(), None))
            .unwrap();
        let buf = terminal.backend().buffer();
        let text: String = (0..buf.area.height)
            .flat_map(|y| (0..buf.area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("Could not display infographic.png"));
    }
}
