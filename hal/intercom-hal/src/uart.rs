//! USART abstractions
//!
//! The link is driven from three USART interrupt sources rather than from
//! buffered reads and writes, so the trait exposes the data register and the
//! interrupt enables directly.

/// Interrupt sources of a USART that the link switches on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsartInterrupt {
    /// A byte has been received
    ReceiveComplete,
    /// The transmit data register can accept another byte
    DataRegisterEmpty,
    /// The last byte has fully left the shift register
    TransmitComplete,
}

/// Interrupt-driven USART
///
/// Implementations are called from interrupt context and must not block.
pub trait UsartIrq {
    /// Read the received byte from the data register
    ///
    /// Implementations clear any framing, overrun or parity error flags as
    /// part of the read; the link does not report line errors.
    fn read_data(&mut self) -> u8;

    /// Place a byte into the transmit data register
    fn write_data(&mut self, byte: u8);

    /// Enable or disable an interrupt source
    fn set_interrupt(&mut self, irq: UsartInterrupt, enabled: bool);
}

impl<T: UsartIrq + ?Sized> UsartIrq for &mut T {
    fn read_data(&mut self) -> u8 {
        T::read_data(self)
    }

    fn write_data(&mut self, byte: u8) {
        T::write_data(self, byte)
    }

    fn set_interrupt(&mut self, irq: UsartInterrupt, enabled: bool) {
        T::set_interrupt(self, irq, enabled)
    }
}

/// Highest baud rate served with 16x oversampling
const SINGLE_SPEED_MAX_BAUD: u32 = 38401;

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 57600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// 8N1 at the given baud rate
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }

    /// Compute the baud-rate register setting for a peripheral clock
    ///
    /// Rates above 38401 baud use double-speed mode (8x oversampling).
    /// Matches the AVR setup `UBRR = ((clock / k) / baud) - 0.5` with
    /// `k` = 8 or 16: both divisions are integer, and the half is
    /// truncated away on assignment, so the result is the quotient minus
    /// one, never below zero.
    pub fn divisor(&self, clock_hz: u32) -> BaudDivisor {
        let double_speed = self.baudrate > SINGLE_SPEED_MAX_BAUD;
        let oversampling = if double_speed { 8 } else { 16 };

        let quotient = (clock_hz / oversampling) / self.baudrate.max(1);
        let value = quotient.saturating_sub(1);

        BaudDivisor {
            double_speed,
            value: value.min(u32::from(u16::MAX)) as u16,
        }
    }
}

/// Baud-rate register setting computed by [`UartConfig::divisor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudDivisor {
    /// Use 8x oversampling
    pub double_speed: bool,
    /// Divisor register value
    pub value: u16,
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
