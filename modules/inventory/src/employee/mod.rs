pub mod endpoints;
pub mod model;
pub mod service;

#[cfg(test)]
mod test;
