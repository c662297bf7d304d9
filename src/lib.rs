//! Terminal explorer for the Global Power Plant Database: a filtered world
//! map of plants with hover details, a table of the selection and static
//! image panels.

pub mod app;
pub mod assets;
pub mod braille;
pub mod config;
pub mod data;
pub mod layout;
pub mod logging;
pub mod map;
pub mod plants;
pub mod ui;
