//! Intercom Hardware Abstraction Layer
//!
//! This crate defines the capabilities the link core needs from a board:
//! an interrupt-driven USART and a way to switch a half-duplex transceiver
//! between driving and listening. Chip-specific code implements these traits
//! and wires its interrupt vectors to the link.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Board firmware (interrupt vectors)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  intercom-core (link state machine)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  intercom-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UsartIrq`] - Byte-level USART with switchable interrupt sources
//! - [`direction::DirectionControl`] - Transceiver driver enable
//!
//! Busy-wait delays come from [`embedded_hal::delay::DelayNs`].

#![no_std]
#![deny(unsafe_code)]

pub mod direction;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use direction::{AutoDirection, DirectionControl, PinDirection};
pub use uart::{BaudDivisor, UartConfig, UsartInterrupt, UsartIrq};
