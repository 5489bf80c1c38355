//! This crate is intended to contain code that is required to provide or
//! improve the observability of the deployer. That includes initialization
//! logic for logging as well as the panic hook that routes panics through it.
pub mod config;
pub mod panic_hook;
pub mod tracing;

pub use config::Config;
