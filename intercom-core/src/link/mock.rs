//! Test doubles for the link hardware

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use intercom_hal::{DirectionControl, UsartInterrupt, UsartIrq};

/// USART that records writes and interrupt enables
#[derive(Debug, Default)]
pub struct MockUsart {
    /// Bytes returned by `read_data`
    pub incoming: VecDeque<u8>,
    /// Bytes placed into the data register
    pub written: Vec<u8>,
    interrupts: [bool; 3],
}

impl MockUsart {
    fn slot(irq: UsartInterrupt) -> usize {
        match irq {
            UsartInterrupt::ReceiveComplete => 0,
            UsartInterrupt::DataRegisterEmpty => 1,
            UsartInterrupt::TransmitComplete => 2,
        }
    }

    pub fn enabled(&self, irq: UsartInterrupt) -> bool {
        self.interrupts[Self::slot(irq)]
    }

    pub fn take_written(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.written)
    }
}

impl UsartIrq for MockUsart {
    fn read_data(&mut self) -> u8 {
        self.incoming.pop_front().unwrap_or(0)
    }

    fn write_data(&mut self, byte: u8) {
        self.written.push(byte);
    }

    fn set_interrupt(&mut self, irq: UsartInterrupt, enabled: bool) {
        self.interrupts[Self::slot(irq)] = enabled;
    }
}

/// Driver-enable line
#[derive(Debug, Default)]
pub struct MockDirection {
    pub transmitting: bool,
    pub enables: usize,
    pub disables: usize,
}

impl DirectionControl for MockDirection {
    fn enable_transmit(&mut self) {
        self.transmitting = true;
        self.enables += 1;
    }

    fn disable_transmit(&mut self) {
        self.transmitting = false;
        self.disables += 1;
    }
}

/// Delay that only adds up the requested time
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }
}
