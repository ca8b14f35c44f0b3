//! Intercom Frame Codec
//!
//! This crate defines the packet exchanged between the host controller and
//! its peripheral boards (extruder, heater controllers) over a shared
//! half-duplex serial bus. Every frame has the same fixed size, so there is
//! no length byte and no escaping; a receiver finds frame boundaries by
//! waiting for the start marker while idle.
//!
//! # Frame Layout
//!
//! ```text
//! ┌───────┬─────┬─────────┬──────────────────┬───────┬──────────┐
//! │ START │ DIO │ CTRL ID │ TELEMETRY        │ ERROR │ CHECKSUM │
//! │ 0x55  │ 1B  │ 1B      │ 3 × u16 LE (6B)  │ 1B    │ 1B       │
//! └───────┴─────┴─────────┴──────────────────┴───────┴──────────┘
//! ```
//!
//! The checksum is the XOR of every byte before it. It catches any single
//! bit error but not two flips in the same bit position, nor reordered
//! bytes.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod dio;
pub mod error;
pub mod frame;

pub use dio::{Dio, DIO_LINES};
pub use error::ErrorCode;
pub use frame::{checksum, validate, Frame, FrameError, FRAME_LEN, FRAME_START, TELEMETRY_SLOTS};
