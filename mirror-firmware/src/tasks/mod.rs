//! Embassy async tasks
//!
//! Each task runs concurrently and communicates via channels.

mod button;
mod link_rx;
mod link_status;
mod link_tx;

pub use button::button_task;
pub use link_rx::link_rx_task;
pub use link_status::link_status_task;
pub use link_tx::link_tx_task;
