pub mod logger;
pub mod relight;
