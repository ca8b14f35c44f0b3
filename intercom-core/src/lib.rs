//! Board-side logic for the intercom serial link
//!
//! This crate contains everything between the USART interrupt vectors and
//! the application code of a board:
//!
//! - Link configuration (board role, baud rate, settling delay)
//! - Link status flags shared between application and interrupt handlers
//! - Receive and transmit state machines
//! - The link context that owns the frame buffers and drives the hardware
//!
//! # Exchange
//!
//! The host fills its outbound frame and calls
//! [`Link::begin_transmission`](link::Link::begin_transmission). Every board
//! receives the frame; the peripheral whose id matches answers immediately
//! from its receive interrupt with its own prepared frame. The host sees the
//! reply as a new ready frame.
//!
//! ```text
//!  host                         peripheral #2
//!   │  [0x55 dio 2 t0 t1 t2 e c]  │
//!   │ ──────────────────────────▶ │ frame ready, id matches
//!   │                             │ begin_transmission()
//!   │  [0x55 dio 2 t0 t1 t2 e c]  │
//!   │ ◀────────────────────────── │
//!   │ frame ready                 │
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the macros are visible to the other modules
mod fmt;

pub mod config;
pub mod link;

pub use config::{LinkConfig, Role};
pub use link::{Link, LinkEvent, LinkState, LinkStatus, SharedLink, StatusFlags};
