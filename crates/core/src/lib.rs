pub mod config;
pub mod error;
pub mod namespace;
pub mod rule;

pub use config::Config;
pub use error::*;
pub use namespace::*;
pub use rule::*;
