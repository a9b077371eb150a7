pub mod fare_rules;
pub mod markups;
pub mod permissions;
pub mod roles;

pub use fare_rules::fare_rules_post;
pub use markups::{markups_get, markups_post};
pub use permissions::permissions_get;
pub use roles::current_role_get;
