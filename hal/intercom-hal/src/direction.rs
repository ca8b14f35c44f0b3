//! Half-duplex direction control
//!
//! RS-485 style transceivers share one pair of wires for both directions.
//! The board must enable the line driver before clocking bytes out and
//! release it once the last stop bit has left, otherwise it would hold the
//! bus and block replies.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

/// Transceiver driver enable
pub trait DirectionControl {
    /// Drive the bus (transmit mode)
    fn enable_transmit(&mut self);

    /// Release the bus (receive mode)
    fn disable_transmit(&mut self);
}

impl<T: DirectionControl + ?Sized> DirectionControl for &mut T {
    fn enable_transmit(&mut self) {
        T::enable_transmit(self)
    }

    fn disable_transmit(&mut self) {
        T::disable_transmit(self)
    }
}

/// Direction control through a driver-enable GPIO
///
/// The pin can be configured as active-high (default) or active-low.
pub struct PinDirection<P> {
    pin: P,
    /// If true, transmit = pin LOW
    inverted: bool,
}

impl<P: OutputPin<Error = Infallible>> PinDirection<P> {
    /// Create a new direction control, starting in receive mode
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut dir = Self { pin, inverted };
        dir.disable_transmit();
        dir
    }

    /// Driver enable is active-high
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Driver enable is active-low
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }

    fn drive(&mut self, transmit: bool) {
        let high = transmit != self.inverted;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.unwrap_or_else(|never| match never {});
    }
}

impl<P: OutputPin<Error = Infallible>> DirectionControl for PinDirection<P> {
    fn enable_transmit(&mut self) {
        self.drive(true);
    }

    fn disable_transmit(&mut self) {
        self.drive(false);
    }
}

/// Transceivers that switch direction on their own
///
/// Some RS-485 modules sense the TX line and need no enable pin.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDirection;

impl DirectionControl for AutoDirection {
    fn enable_transmit(&mut self) {}

    fn disable_transmit(&mut self) {}
}
