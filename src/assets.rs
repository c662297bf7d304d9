//! Optional static images shown next to the map: an infographic, up to
//! eight numbered estimation images and a logo.

use std::path::{Path, PathBuf};

use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

pub const INFOGRAPHIC_FILE: &str = "infographic.png";
pub const INFOGRAPHIC_CAPTION: &str = "Global Power Plant Overview";
pub const LOGO_FILE: &str = "logo.png";
/// Estimation images are `1.jpeg` through `8.jpeg`
pub const ESTIMATION_COUNT: usize = 8;

/// Largest edge kept in memory; panels never need more than this
const MAX_EDGE_PX: u32 = 512;
/// Cell size in pixels assumed when the terminal does not report one
pub const FALLBACK_FONT_SIZE: (u16, u16) = (8, 16);

/// Pick the best image protocol the terminal supports. Terminals that do
/// not answer the query get half-block rendering.
pub fn detect_picker() -> Picker {
    match Picker::from_query_stdio() {
        Ok(picker) => picker,
        Err(e) => {
            tracing::info!(error = ?e, "Terminal graphics query failed, using half blocks");
            Picker::from_fontsize(FALLBACK_FONT_SIZE)
        }
    }
}

/// An image file that exists on disk
pub enum Asset {
    Ready {
        name: String,
        /// Pixel size after downscaling
        size: (u32, u32),
        protocol: StatefulProtocol,
    },
    /// Present but not decodable; only its own panel is affected
    Unreadable { name: String, error: String },
}

impl Asset {
    pub fn name(&self) -> &str {
        match self {
            Asset::Ready { name, .. } | Asset::Unreadable { name, .. } => name,
        }
    }
}

/// Contents of one panel: the assets found, or a placeholder when none are
pub struct Panel {
    pub assets: Vec<Asset>,
    pub placeholder: String,
}

impl Panel {
    fn from_paths(paths: Vec<PathBuf>, placeholder: &str, picker: &Picker) -> Self {
        Self {
            assets: paths.iter().map(|p| load_asset(p, picker)).collect(),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.assets.is_empty()
    }
}

/// All static panels, resolved once at startup
pub struct AssetPanels {
    pub infographic: Panel,
    pub estimation: Panel,
    pub logo: Panel,
}

impl AssetPanels {
    /// Look up every asset in `dir`. Missing files are not errors. Images
    /// are encoded for the terminal through `picker`.
    pub fn discover(dir: &Path, picker: &Picker) -> Self {
        let panels = Self {
            infographic: Panel::from_paths(
                existing(dir, [INFOGRAPHIC_FILE]),
                "Add infographic.png next to this app to display it here.",
                picker,
            ),
            estimation: Panel::from_paths(
                estimation_paths(dir),
                "Add 1.jpeg through 8.jpeg next to this app to display the estimation visuals.",
                picker,
            ),
            logo: Panel::from_paths(
                existing(dir, [LOGO_FILE]),
                "Add a logo.png next to this app to display it here.",
                picker,
            ),
        };

        tracing::info!(
            dir = %dir.display(),
            infographic = !panels.infographic.is_missing(),
            estimation_images = panels.estimation.assets.len(),
            logo = !panels.logo.is_missing(),
            "Resolved static assets"
        );
        panels
    }
}

/// Existing `N.jpeg` files for N in 1..=8, ascending; gaps are skipped
pub fn estimation_paths(dir: &Path) -> Vec<PathBuf> {
    existing(dir, (1..=ESTIMATION_COUNT).map(|i| format!("{i}.jpeg")))
}

fn existing<S: AsRef<str>>(dir: &Path, names: impl IntoIterator<Item = S>) -> Vec<PathBuf> {
    names
        .into_iter()
        .map(|name| dir.join(name.as_ref()))
        .filter(|path| path.is_file())
        .collect()
}

fn load_asset(path: &Path, picker: &Picker) -> Asset {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match image::open(path) {
        Ok(img) => {
            let image = if img.width() > MAX_EDGE_PX || img.height() > MAX_EDGE_PX {
                img.thumbnail(MAX_EDGE_PX, MAX_EDGE_PX)
            } else {
                img
            };
            Asset::Ready {
                name,
                size: (image.width(), image.height()),
                protocol: picker.new_resize_protocol(image),
            }
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to decode image");
            Asset::Unreadable {
                name,
                error: e.to_string(),
            }
        }
    }
}
