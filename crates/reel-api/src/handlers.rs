//! Request handlers.

pub mod generate;
pub mod health;
pub mod maintenance;

pub use generate::generate_video;
pub use health::{health, ready};
pub use maintenance::cleanup_output;
