//! Configuration type definitions

use intercom_hal::UartConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Baud rate of the inter-board bus
pub const DEFAULT_BAUDRATE: u32 = 57600;

/// Time the transceiver needs to switch to transmit before the first byte
pub const DEFAULT_SETTLE_US: u32 = 15;

/// Board role on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    /// Main controller; initiates every exchange and never auto-replies
    Host,
    /// Numbered peripheral; replies to frames carrying its id
    Peripheral(u8),
}

impl Role {
    /// Controller id of a peripheral, `None` for the host
    pub const fn controller_id(&self) -> Option<u8> {
        match self {
            Role::Host => None,
            Role::Peripheral(id) => Some(*id),
        }
    }

    pub const fn is_host(&self) -> bool {
        matches!(self, Role::Host)
    }

    /// Whether a received frame for `controller_id` needs a reply from us
    pub const fn answers(&self, controller_id: u8) -> bool {
        match self {
            Role::Host => false,
            Role::Peripheral(id) => *id == controller_id,
        }
    }
}

/// Link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Board role
    pub role: Role,
    /// Bus baud rate
    pub baudrate: u32,
    /// Direction-control settling delay before transmitting (microseconds)
    pub settle_us: u32,
}

impl LinkConfig {
    /// Host board with default line settings
    pub const fn host() -> Self {
        Self {
            role: Role::Host,
            baudrate: DEFAULT_BAUDRATE,
            settle_us: DEFAULT_SETTLE_US,
        }
    }

    /// Peripheral board `id` with default line settings
    pub const fn peripheral(id: u8) -> Self {
        Self {
            role: Role::Peripheral(id),
            baudrate: DEFAULT_BAUDRATE,
            settle_us: DEFAULT_SETTLE_US,
        }
    }

    pub const fn with_baudrate(mut self, baudrate: u32) -> Self {
        self.baudrate = baudrate;
        self
    }

    pub const fn with_settle_us(mut self, settle_us: u32) -> Self {
        self.settle_us = settle_us;
        self
    }

    /// USART settings for this link (8N1)
    pub const fn uart_config(&self) -> UartConfig {
        UartConfig::with_baudrate(self.baudrate)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::host()
    }
}
