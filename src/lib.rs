pub mod aggregate;
pub mod categories;
pub mod clean;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod render;
