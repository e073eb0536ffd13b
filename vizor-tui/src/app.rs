//! Render-side application state

use vizor_analysis::{advance_phase, AutoGain, Gradient, MAG_CEILING};
use vizor_audio::Snapshot;

/// Frames a transient status message stays visible.
const MESSAGE_FRAMES: u32 = 90;

/// Everything the render loop owns: the latest state snapshot, the
/// immutable gradient table, the color phase counter, the gain controller,
/// and UI flags.
pub struct App {
    pub snapshot: Snapshot,
    pub gradient: Gradient,
    pub color_phase: f64,
    pub auto_gain: AutoGain,
    pub show_help: bool,
    pub should_quit: bool,
    pub frame_count: u64,
    pub message: Option<String>,
    message_frames: u32,
}

impl App {
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::default(),
            gradient: Gradient::new(),
            color_phase: 0.0,
            auto_gain: AutoGain::new(MAG_CEILING),
            show_help: false,
            should_quit: false,
            frame_count: 0,
            message: None,
            message_frames: 0,
        }
    }

    /// Advance per-frame presentation state: the color phase moves by the
    /// configured rate and wraps at the table length; stale messages fade.
    pub fn advance_frame(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
        self.color_phase = advance_phase(self.color_phase, self.snapshot.params.color_rate);

        if self.message_frames > 0 {
            self.message_frames -= 1;
            if self.message_frames == 0 {
                self.message = None;
            }
        }
    }

    /// Show a transient status message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.message_frames = MESSAGE_FRAMES;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizor_analysis::GRADIENT_LEN;

    #[test]
    fn test_color_phase_wraps() {
        let mut app = App::new();
        app.snapshot.params.set_color_rate(64.0);
        for _ in 0..1000 {
            app.advance_frame();
            assert!(app.color_phase >= 0.0 && app.color_phase < GRADIENT_LEN as f64);
        }
    }

    #[test]
    fn test_message_fades_after_its_frames() {
        let mut app = App::new();
        app.set_message("hello");
        for _ in 0..MESSAGE_FRAMES {
            assert!(app.message.is_some());
            app.advance_frame();
        }
        assert!(app.message.is_none());
    }
}
