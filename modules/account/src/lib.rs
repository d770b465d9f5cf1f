pub mod authenticator;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod model;
pub mod password;
pub mod seed;
pub mod service;

#[cfg(test)]
mod test;

pub use endpoints::configure;
pub use error::Error;
