//! Keyboard control surface for VIZOR

mod commands;
mod keymap;

pub use commands::{Command, Direction};
pub use keymap::InputHandler;
