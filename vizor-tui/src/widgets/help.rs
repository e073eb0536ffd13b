//! Help overlay - key reference

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const KEYS: &[(&str, &str)] = &[
    ("Up/Down", "smoothing factor"),
    ("Shift+Up/Down", "bar count"),
    ("Ctrl+Up/Down", "frequency ceiling"),
    ("Alt+Up/Down", "peak decay rate"),
    ("Left/Right", "color cycle rate"),
    ("[ / ]", "logarithmic scale"),
    ("- / =", "linear scale"),
    ("m", "smoothing mode"),
    ("p", "peak markers"),
    ("a", "auto gain"),
    ("c", "curve mode"),
    ("?", "toggle this help"),
    ("q / Esc", "quit"),
];

/// Overlay listing the key bindings.
pub struct HelpWidget;

impl Widget for HelpWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(Span::styled(" KEYS ", Style::default().fg(Color::White)));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = KEYS
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(format!(" {key:<14}"), Style::default().fg(Color::White)),
                    Span::styled((*what).to_string(), Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
