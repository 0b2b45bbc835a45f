pub mod config;
pub mod error;

pub use config::LexaidConfig;
pub use error::{LexaidError, Result};
