//! Event-handling layer
//!
//! Routes keyboard and pointer input to the session and the colour pickers,
//! keeps the positioned node tree in step with the session, and hands
//! finished frames to a [`FrameWriter`].

mod demo;
mod events;
mod frame_writer;

#[cfg(test)]
mod tests;

pub use demo::{Control, DemoApp, FONT_SIZE, GAP, GRID, PAD, UNIT};
pub use events::{parse_command, Command, InputEvent, Key};
pub use frame_writer::{write_linear_tiff, FrameWriter, PngFrameWriter};
