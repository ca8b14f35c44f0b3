//! Interrupt events that drive the link

/// USART interrupt events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// A byte arrived
    ByteReceived(u8),
    /// The transmit data register can take another byte
    DataRegisterEmpty,
    /// The last byte has left the wire
    TransmitComplete,
}

