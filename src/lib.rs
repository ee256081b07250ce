pub mod acceptance;
pub mod config;
pub mod error;
pub mod loader;
pub mod optimizer;
pub mod partition;
pub mod relationships;
pub mod roster;
// cmd and reports belong to the binary crate (main.rs).
