//! Configuration
//!
//! Board-agnostic configuration structures and the text parser that
//! fills them from `mirror.toml`.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ConfigError};
pub use types::*;
