pub mod admin;
pub mod asset;
pub mod employee;
pub mod maintenance_document;
pub mod maintenance_report;
pub mod role_permission;
pub mod session;
