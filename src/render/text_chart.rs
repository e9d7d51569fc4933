use crate::render::error::RenderError;
use crate::render::{ChartBackend, RenderFrame};
use std::io::Write;

const DEFAULT_BAR_WIDTH: usize = 40;

/// Horizontal bar chart drawn as plain text, one line per location.
///
/// ```text
/// Temperatures as of 08-03-2025 09:15:00
/// Odesa    ██████████████████████████████ 15 °C
/// Kharkiv  ████████████████████████████████████████ 20 °C
///
/// Lowest:  Odesa, 15 °C
/// Highest: Kharkiv, 20 °C
/// ```
///
/// Bars scale to the largest absolute temperature in the frame; below-zero bars
/// are drawn with a lighter shade.
pub struct TextChart<W> {
    out: W,
    bar_width: usize,
}

impl<W: Write> TextChart<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(&self, temperature: i32, max_abs: usize) -> String {
        let len = temperature.unsigned_abs() as usize * self.bar_width / max_abs;
        let glyph = if temperature < 0 { "░" } else { "█" };
        glyph.repeat(len)
    }
}

impl<W: Write> ChartBackend for TextChart<W> {
    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        let label_width = frame
            .ordered
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0);
        let max_abs = frame
            .ordered
            .iter()
            .map(|(_, t)| t.unsigned_abs() as usize)
            .max()
            .unwrap_or(0)
            .max(1);

        let mut text = format!("Temperatures as of {}\n", frame.title());
        for (name, temperature) in &frame.ordered {
            let bar = self.bar(*temperature, max_abs);
            text.push_str(&format!(
                "{:<label_width$}  {} {} °C\n",
                name, bar, temperature
            ));
        }
        text.push_str(&format!("\nLowest:  {}\nHighest: {}\n\n", frame.min, frame.max));

        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
