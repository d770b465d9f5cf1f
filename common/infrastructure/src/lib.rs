mod infra;

pub mod app;
pub mod health;
pub mod tracing;

pub use infra::*;
