//! Board-agnostic core logic for the mirror firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (display, clock)
//! - Event store for the current day
//! - Link state machine with re-advertise timing, STATE-line filtering
//!   and HM-10 module commands
//! - Sync engine tying the framer, codec and store together
//! - Render scheduler
//! - Button debouncing
//! - Configuration type definitions and parser

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod device;
pub mod input;
pub mod link;
pub mod render;
pub mod store;
pub mod sync;
pub mod traits;
