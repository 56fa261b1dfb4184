pub mod chapter;
pub mod config;

pub use chapter::*;
pub use config::*;
