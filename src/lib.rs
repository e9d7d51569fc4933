mod board;
mod catalog;
mod config;
mod error;
mod fetch;
mod persistence;
mod refresher;
mod render;
mod schedule;
mod store;
mod types;
mod utils;

pub use board::{load_or_zeroed, Board};
pub use catalog::{Location, LocationCatalog};
pub use config::{default_snapshot_path, read_api_key, RefreshPeriod, Settings};
pub use error::BoardError;
pub use fetch::openweather::OpenWeatherClient;
pub use fetch::{kelvin_to_celsius, TemperatureSource};
pub use persistence::SnapshotFile;
pub use refresher::{Refresher, TickReport};
pub use render::text_chart::TextChart;
pub use render::views::{coldest, sorted_ascending, warmest};
pub use render::{ChartBackend, RenderFrame, Renderer};
pub use schedule::Ticker;
pub use store::ReadingStore;
pub use types::reading::{now_local, Reading, TIMESTAMP_FORMAT};
pub use utils::error_chain;

#[cfg(feature = "chart")]
pub use render::html_chart::HtmlChart;

pub use config::error::ConfigError;
pub use fetch::error::FetchError;
pub use persistence::error::PersistenceError;
pub use refresher::error::RefreshError;
pub use render::error::RenderError;
pub use store::error::StoreError;
