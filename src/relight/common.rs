//! Common utilities module
//!
//! This module contains shared utilities used across the relighting pipeline.

pub mod error;

pub use error::{Artifact, RelightError, Result};
