pub mod info;

pub use info::{health, root};
