//! # emu8
//! A Chip-8 interpreter core.
//!
//! The embedder owns the window, the speaker and the keyboard. It loads a ROM into a
//! [`Chip8`], feeds it key presses, drives it with a [`Scheduler`] (or calls
//! [`Chip8::step`] and [`Chip8::tick_timers`] itself) and redraws whenever
//! [`Chip8::take_frame`] hands back a frame.

pub use chip8::Chip8;
pub use clock::{Clock, Scheduler};
pub use config::Config;
pub use constants::CLOCK_SPEED;
pub use error::{Chip8Error, Status};
pub use peripherals::Keypad;
pub use state::{FrameBuffer, State};

mod chip8;
mod clock;
mod config;
pub mod constants;
mod error;
mod instruction;
pub mod opcode;
mod operations;
mod peripherals;
pub mod state;
