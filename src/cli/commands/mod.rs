pub mod catalog;
pub mod roles;
pub mod token;
