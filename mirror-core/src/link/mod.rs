//! Link lifecycle
//!
//! The wireless link advertises, accepts one peer, and re-advertises a
//! short delay after that peer goes away. There is no terminal state.

pub mod hm10;
pub mod machine;
pub mod monitor;
pub mod state_line;

pub use machine::{LinkEvent, LinkState};
pub use monitor::{LinkAction, LinkMonitor, Transition};
pub use state_line::StateLine;
