//! Key-event decoding into commands

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::commands::{Command, Direction};

/// Decodes modifier-qualified key events into parameter commands.
///
/// Directional adjustments: plain Up/Down for smoothing, Shift for bar
/// count, Ctrl for the frequency ceiling, Alt for the peak decay rate.
/// Left/Right drive the color cycle rate.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Decode one key event. Unbound keys return None.
    pub fn handle_key(&self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                let direction = if key.code == KeyCode::Up {
                    Direction::Up
                } else {
                    Direction::Down
                };
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    Some(Command::AdjustBars(direction))
                } else if key.modifiers.contains(KeyModifiers::CONTROL) {
                    Some(Command::AdjustFreqCeiling(direction))
                } else if key.modifiers.contains(KeyModifiers::ALT) {
                    Some(Command::AdjustPeakDecay(direction))
                } else {
                    Some(Command::AdjustSmoothing(direction))
                }
            }

            KeyCode::Left => Some(Command::AdjustColorRate(Direction::Down)),
            KeyCode::Right => Some(Command::AdjustColorRate(Direction::Up)),

            KeyCode::Char('[') => Some(Command::AdjustLogScale(Direction::Down)),
            KeyCode::Char(']') => Some(Command::AdjustLogScale(Direction::Up)),
            KeyCode::Char('-') => Some(Command::AdjustLinearScale(Direction::Down)),
            KeyCode::Char('=') | KeyCode::Char('+') => {
                Some(Command::AdjustLinearScale(Direction::Up))
            }

            KeyCode::Char('m') => Some(Command::CycleSmoothingMode),
            KeyCode::Char('p') => Some(Command::TogglePeaks),
            KeyCode::Char('a') => Some(Command::ToggleAutoGain),
            KeyCode::Char('c') => Some(Command::ToggleCurve),

            KeyCode::Char('?') => Some(Command::ToggleHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),

            _ => None,
        }
    }
}
