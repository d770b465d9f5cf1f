mod permission;
mod role;

pub use permission::*;
pub use role::*;

pub mod authenticator;
pub mod authorizer;
