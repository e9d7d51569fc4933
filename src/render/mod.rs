//! Foreground consumer: turns store snapshots into charts on a fixed period.

pub mod error;
#[cfg(feature = "chart")]
pub mod html_chart;
pub mod text_chart;
pub mod views;

use crate::config::RefreshPeriod;
use crate::render::error::RenderError;
use crate::render::views::{coldest, sorted_ascending, warmest};
use crate::schedule::Ticker;
use crate::store::ReadingStore;
use crate::types::reading::{Reading, TIMESTAMP_FORMAT};
use crate::utils::error_chain;
use chrono::NaiveDateTime;
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

/// Everything a chart backend draws for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    /// `(name, °C)` in ascending temperature order.
    pub ordered: Vec<(String, i32)>,
    pub min: Reading,
    pub max: Reading,
    /// Timestamp of the first reading in the snapshot. All readings are refreshed
    /// together, so it stands for the whole frame.
    pub as_of: NaiveDateTime,
}

impl RenderFrame {
    /// `None` for an empty snapshot.
    pub fn from_snapshot(snapshot: &[Reading]) -> Option<Self> {
        let first = snapshot.first()?;
        let min = coldest(snapshot)?.clone();
        let max = warmest(snapshot)?.clone();
        let ordered = sorted_ascending(snapshot)
            .into_iter()
            .map(|r| (r.name, r.temperature))
            .collect();
        Some(Self {
            ordered,
            min,
            max,
            as_of: first.last_updated,
        })
    }

    pub fn title(&self) -> String {
        self.as_of.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Something that can draw a [`RenderFrame`].
pub trait ChartBackend {
    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError>;
}

impl<B: ChartBackend + ?Sized> ChartBackend for Box<B> {
    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        (**self).render(frame)
    }
}

/// Reads the store and hands derived views to a backend. Never writes to the store.
pub struct Renderer<B> {
    store: ReadingStore,
    backend: B,
}

impl<B: ChartBackend> Renderer<B> {
    pub fn new(store: ReadingStore, backend: B) -> Self {
        Self { store, backend }
    }

    /// Renders the current snapshot. Returns `false` when there was nothing to draw.
    pub async fn render_once(&mut self) -> Result<bool, RenderError> {
        let snapshot = self.store.snapshot().await;
        let Some(frame) = RenderFrame::from_snapshot(&snapshot) else {
            warn!("Reading store is empty, nothing to render");
            return Ok(false);
        };
        debug!(
            "Rendering {} readings as of {}",
            frame.ordered.len(),
            frame.title()
        );
        self.backend.render(&frame)?;
        Ok(true)
    }

    /// Renders once per `period` until `cancel` fires. Backend failures are logged
    /// and the next tick tries again.
    pub async fn run(mut self, period: RefreshPeriod, cancel: CancellationToken) -> B {
        let mut ticker = Ticker::new(period, cancel);
        while ticker.tick().await.is_some() {
            if let Err(e) = self.render_once().await {
                error!("Failed to render chart: {}", error_chain(&e));
            }
        }
        info!("Renderer stopped");
        self.backend
    }
}
