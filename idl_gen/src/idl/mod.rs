pub mod resolved;
pub mod roles;
