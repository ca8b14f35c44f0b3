//! Receive and transmit state machines
//!
//! Both directions are pure functions of their current state and an
//! interrupt event. They return the next state and an action describing
//! what the link context must do with its buffers and the hardware, so the
//! protocol can be exercised without any peripheral.
//!
//! Receive and transmit progress are tracked separately: the USART is full
//! duplex even though the exchange on top of it is request/response.

use intercom_protocol::{FRAME_LEN, FRAME_START};

/// Receiver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxState {
    /// Waiting for a start byte
    #[default]
    Idle,
    /// Inside a frame
    Receiving {
        /// Index the next byte is stored at
        pos: u8,
        /// Running XOR of the bytes so far, checksum byte excluded
        checksum: u8,
    },
}

/// What the link must do with a received byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxAction {
    /// Byte outside a frame, dropped
    Ignored,
    /// Start byte seen, store it at index 0
    Started,
    /// Store `byte` at `index`
    Stored { index: u8, byte: u8 },
    /// Store the final byte; the frame is complete
    Completed {
        index: u8,
        byte: u8,
        /// Checksum computed over the received bytes
        checksum: u8,
    },
}

impl RxState {
    /// Feed one received byte
    ///
    /// Once a frame has started every byte is taken as frame content, a
    /// start byte included; there is no rescan inside a frame.
    pub fn on_byte(self, byte: u8) -> (RxState, RxAction) {
        match self {
            RxState::Idle if byte == FRAME_START => (
                RxState::Receiving {
                    pos: 1,
                    checksum: FRAME_START,
                },
                RxAction::Started,
            ),
            RxState::Idle => (RxState::Idle, RxAction::Ignored),
            RxState::Receiving { pos, checksum } => {
                let index = pos;
                let next = usize::from(pos) + 1;

                if next >= FRAME_LEN {
                    // Last byte is the checksum itself
                    return (
                        RxState::Idle,
                        RxAction::Completed {
                            index,
                            byte,
                            checksum,
                        },
                    );
                }

                (
                    RxState::Receiving {
                        pos: pos + 1,
                        checksum: checksum ^ byte,
                    },
                    RxAction::Stored { index, byte },
                )
            }
        }
    }

    /// Bytes of the current frame received so far
    pub fn received(&self) -> Option<usize> {
        match self {
            RxState::Idle => None,
            RxState::Receiving { pos, .. } => Some(usize::from(*pos)),
        }
    }
}

/// Transmitter state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxState {
    /// Nothing sent since startup
    #[default]
    Idle,
    /// Feeding the data register
    Sending {
        /// Index of the next byte to write
        pos: u8,
    },
    /// Last byte written, waiting for it to leave the shift register
    Draining,
    /// Transmission complete, bus released
    Finished,
}

/// What the link must do for a transmit interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxAction {
    /// Write the byte at `index`
    Write { index: u8 },
    /// Write the final byte, then switch from data-register-empty to
    /// transmit-complete interrupts
    WriteLast { index: u8 },
    /// Release the bus and disable the transmit-complete interrupt
    Release,
    /// Interrupt with nothing to do
    Spurious,
}

impl TxState {
    /// Start sending from the first byte
    pub const fn start() -> Self {
        TxState::Sending { pos: 0 }
    }

    /// Data register empty
    pub fn on_data_register_empty(self) -> (TxState, TxAction) {
        match self {
            TxState::Sending { pos } => {
                let index = pos;
                if usize::from(pos) + 1 >= FRAME_LEN {
                    (TxState::Draining, TxAction::WriteLast { index })
                } else {
                    (TxState::Sending { pos: pos + 1 }, TxAction::Write { index })
                }
            }
            other => (other, TxAction::Spurious),
        }
    }

    /// Transmission complete
    ///
    /// Only acted upon after the last byte has been written.
    pub fn on_transmit_complete(self) -> (TxState, TxAction) {
        match self {
            TxState::Draining => (TxState::Finished, TxAction::Release),
            other => (other, TxAction::Spurious),
        }
    }

    /// Bytes handed to the USART so far, while a transfer is running
    pub fn sent(&self) -> Option<usize> {
        match self {
            TxState::Sending { pos } => Some(usize::from(*pos)),
            TxState::Draining => Some(FRAME_LEN),
            TxState::Idle | TxState::Finished => None,
        }
    }
}

/// Overall link activity, as reported to application code
///
/// Receive and transmit may overlap; the more urgent activity is reported:
/// transmitting, then receiving, then a ready frame, then a finished
/// transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Idle,
    /// Bytes of the inbound frame received so far
    ReceivingFrame(usize),
    /// An inbound frame is waiting to be consumed
    FrameReady,
    /// Bytes of the outbound frame sent so far
    Transmitting(usize),
    TransmitComplete,
}
