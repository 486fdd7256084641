// Utility functions module
pub mod config;
pub mod errors;
pub mod formatters;
