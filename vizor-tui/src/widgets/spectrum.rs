//! Spectrum widget - bar and curve rendering of the shared state

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};
use vizor_analysis::{curve, Gradient, Rgb, MAG_CEILING, MAG_FLOOR};
use vizor_audio::Snapshot;

/// Characters for vertical bar rendering (8 levels)
const BAR_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Marker drawn at the decaying peak row.
const PEAK_CHAR: char = '─';

/// Widget for displaying the analyzed spectrum as colored bar columns, or
/// as a continuous curve when curve mode is on.
pub struct SpectrumWidget<'a> {
    snapshot: &'a Snapshot,
    gradient: &'a Gradient,
    phase: f64,
}

impl<'a> SpectrumWidget<'a> {
    pub fn new(snapshot: &'a Snapshot, gradient: &'a Gradient, phase: f64) -> Self {
        Self {
            snapshot,
            gradient,
            phase,
        }
    }

    /// Magnitude mapped through the display clamp onto [0, 1].
    fn normalized(magnitude: f64) -> f64 {
        (magnitude.clamp(MAG_FLOOR, MAG_CEILING) - MAG_FLOOR) / (MAG_CEILING - MAG_FLOOR)
    }

    /// Full-height bar representation, bottom to top.
    fn render_bar(magnitude: f64, height: u16) -> Vec<char> {
        let total_levels = (Self::normalized(magnitude) * 8.0 * height as f64) as usize;
        let full_blocks = total_levels / 8;
        let partial = total_levels % 8;

        let mut bar = Vec::with_capacity(height as usize);
        for row in 0..height as usize {
            let ch = if row < full_blocks {
                '█'
            } else if row == full_blocks && partial > 0 {
                BAR_CHARS[partial]
            } else {
                ' '
            };
            bar.push(ch);
        }
        bar
    }
}

impl Widget for SpectrumWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " SPECTRUM ",
                Style::default().fg(Color::Gray),
            ));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let magnitudes = &self.snapshot.magnitudes;
        if magnitudes.is_empty() {
            return;
        }
        let params = &self.snapshot.params;
        let width = inner.width as usize;
        let height = inner.height;

        for col in 0..width {
            let (magnitude, peak) = if params.curve && magnitudes.len() >= 2 {
                // One resampled magnitude per column; positions are
                // clamped below the exclusive end of the curve domain.
                let max_pos = (magnitudes.len() - 1) as f64;
                let pos = if width > 1 {
                    (col as f64 / (width - 1) as f64 * max_pos).min(max_pos - 1e-9)
                } else {
                    0.0
                };
                let magnitude =
                    curve::sample(magnitudes, pos).unwrap_or(magnitudes[magnitudes.len() - 1]);
                (magnitude, None)
            } else {
                let bar = col * magnitudes.len() / width;
                let peak = params.peaks.then(|| self.snapshot.peaks[bar]);
                (magnitudes[bar], peak)
            };

            let color = to_color(self.gradient.color(
                magnitude,
                self.phase,
                params.color_offset,
                params.color_shading,
            ));
            let style = Style::default().fg(color);

            let x = inner.x + col as u16;
            let bar_chars = Self::render_bar(magnitude, height);
            for (row, &ch) in bar_chars.iter().enumerate() {
                if ch != ' ' {
                    let y = inner.y + height - 1 - row as u16;
                    buf[(x, y)].set_char(ch).set_style(style);
                }
            }

            // Peak marker, floored at the display floor: silent peaks
            // draw nothing.
            if let Some(peak) = peak {
                if peak > MAG_FLOOR {
                    let row = ((Self::normalized(peak) * height as f64) as usize)
                        .min(height as usize - 1);
                    let y = inner.y + height - 1 - row as u16;
                    if bar_chars[row] != '█' {
                        buf[(x, y)].set_char(PEAK_CHAR).set_style(style);
                    }
                }
            }
        }
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
