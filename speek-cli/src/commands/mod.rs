//! Command implementations for the speek CLI

pub mod serve;

pub use serve::run_serve;
