//! Command-line configuration.
//!
//! Every flag is optional: by default the data file and the images are read
//! from the directory holding the executable, so the app finds its files no
//! matter where it is launched from.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Default CSV name inside the asset directory
pub const DEFAULT_DATA_FILE: &str = "global_power_plant_database.csv";
/// Default GeoJSON directory inside the asset directory
pub const DEFAULT_BASEMAP_DIR: &str = "data";

/// Explore the Global Power Plant Database on a terminal world map.
#[derive(Debug, Parser)]
#[command(name = "plant-map", version, about = "Global Power Plant Explorer")]
pub struct Args {
    /// Power plant CSV. Default: global_power_plant_database.csv in the
    /// asset directory.
    #[arg(short, long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Directory holding logo.png, infographic.png and 1.jpeg..8.jpeg.
    /// Default: the directory of the executable.
    #[arg(short, long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Directory with Natural Earth GeoJSON files for the map background.
    /// Default: `data` inside the asset directory.
    #[arg(short, long, value_name = "DIR")]
    pub basemap: Option<PathBuf>,

    /// Write logs to plant-map.log in this directory (level from RUST_LOG).
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    /// Asset directory after applying the default
    pub fn assets_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.assets {
            Some(dir) => Ok(dir.clone()),
            None => executable_dir(),
        }
    }

    /// Basemap directory after applying the default
    pub fn basemap_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.basemap {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.assets_dir()?.join(DEFAULT_BASEMAP_DIR)),
        }
    }

    /// CSV path after applying the default
    pub fn data_path(&self) -> anyhow::Result<PathBuf> {
        match &self.data {
            Some(path) => Ok(path.clone()),
            None => Ok(self.assets_dir()?.join(DEFAULT_DATA_FILE)),
        }
    }
}

/// Directory containing the running executable
fn executable_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locating the executable")?;
    exe.parent()
        .map(PathBuf::from)
        .with_context(|| format!("{} has no parent directory", exe.display()))
}
