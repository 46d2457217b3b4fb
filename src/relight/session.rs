//! Interactive session controller
//!
//! Owns the current scene, the per-illuminant chromaticity overrides and the
//! latest render. Every edit re-renders synchronously before returning.

mod controller;


pub use controller::{Direction, Session};
