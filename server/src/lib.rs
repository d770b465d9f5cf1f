pub mod openapi;
pub mod profile;
