//! Status bar - parameter readout and transient messages

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use vizor_audio::SpectrumParams;

/// One-line readout of every tunable, with an optional transient message.
pub struct StatusBarWidget<'a> {
    params: &'a SpectrumParams,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(params: &'a SpectrumParams) -> Self {
        Self {
            params,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.params;
        let readout = format!(
            " BARS {}  CEIL {:.0}Hz  SMOOTH {:.2} {}  DECAY {:.1}  PEAKS {}  AGC {}  CURVE {}  LOG {:.2e}  LIN {:.0} ",
            p.bars,
            p.freq_ceiling,
            p.smoothing,
            p.mode.display_name(),
            p.peak_decay,
            on_off(p.peaks),
            on_off(p.auto_gain),
            on_off(p.curve),
            p.calibration.logarithmic,
            p.calibration.linear,
        );

        let mut spans = vec![Span::styled(readout, Style::default().fg(Color::DarkGray))];
        if let Some(message) = self.message {
            spans.push(Span::styled(
                format!(" {message}"),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}
