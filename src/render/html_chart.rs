use crate::render::error::RenderError;
use crate::render::{ChartBackend, RenderFrame};
use plotlars::{BarPlot, Plot, Text};
use polars::prelude::*;
use std::path::PathBuf;

/// Bar plot of the frame written to an HTML file, replaced on every tick.
pub struct HtmlChart {
    path: PathBuf,
}

impl HtmlChart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChartBackend for HtmlChart {
    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        let names: Vec<&str> = frame.ordered.iter().map(|(name, _)| name.as_str()).collect();
        let temperatures: Vec<i32> = frame.ordered.iter().map(|(_, t)| *t).collect();
        let data = df![
            "city" => names,
            "temperature" => temperatures,
        ]?;

        BarPlot::builder()
            .data(&data)
            .labels("city")
            .values("temperature")
            .plot_title(Text::from(frame.title()).font("Arial").size(18))
            .x_title(Text::from("City"))
            .y_title(Text::from(format!(
                "°C (lowest: {}, highest: {})",
                frame.min, frame.max
            )))
            .build()
            .write_html(self.path.to_string_lossy().to_string());
        Ok(())
    }
}
