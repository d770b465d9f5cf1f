pub mod asset;
pub mod employee;
pub mod endpoints;
pub mod error;

pub use endpoints::configure;
pub use error::Error;
