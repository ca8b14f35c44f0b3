//! Link context
//!
//! Owns both frame buffers, the status flags and the hardware handles.
//! Application code fills the outbound frame and reads the inbound one;
//! the three USART interrupt vectors call [`Link::on_receive`],
//! [`Link::on_data_register_empty`] and [`Link::on_transmit_complete`].

use embedded_hal::delay::DelayNs;
use intercom_hal::{DirectionControl, UsartInterrupt, UsartIrq};
use intercom_protocol::{ErrorCode, Frame, FrameError, FRAME_LEN, FRAME_START};

use super::events::LinkEvent;
use super::machine::{LinkState, RxAction, RxState, TxAction, TxState};
use super::status::{LinkStatus, StatusFlags};
use crate::config::LinkConfig;

/// One board's end of the link
pub struct Link<U, D, T> {
    config: LinkConfig,
    status: LinkStatus,
    /// Application-owned frame sent by the next transmission
    outbound: Frame,
    /// Last completed inbound frame
    inbound: Frame,
    inbound_checksum_ok: bool,
    /// Snapshot of `outbound` taken when a transmission starts
    tx_buf: [u8; FRAME_LEN],
    rx_buf: [u8; FRAME_LEN],
    rx: RxState,
    tx: TxState,
    usart: U,
    direction: D,
    delay: T,
}

impl<U, D, T> Link<U, D, T>
where
    U: UsartIrq,
    D: DirectionControl,
    T: DelayNs,
{
    /// Take over the USART and transceiver
    ///
    /// Releases the bus, enables the receive interrupt and leaves both
    /// transmit interrupts off until the first transmission. A peripheral's
    /// outbound frame carries its own controller id from the start.
    pub fn new(config: LinkConfig, mut usart: U, mut direction: D, delay: T) -> Self {
        direction.disable_transmit();
        usart.set_interrupt(UsartInterrupt::DataRegisterEmpty, false);
        usart.set_interrupt(UsartInterrupt::TransmitComplete, false);
        usart.set_interrupt(UsartInterrupt::ReceiveComplete, true);

        debug!("link up: {}", config);

        Self {
            config,
            status: LinkStatus::new(),
            outbound: Frame::new(config.role.controller_id().unwrap_or(0)),
            inbound: Frame::default(),
            inbound_checksum_ok: false,
            tx_buf: [0; FRAME_LEN],
            rx_buf: [0; FRAME_LEN],
            rx: RxState::Idle,
            tx: TxState::Idle,
            usart,
            direction,
            delay,
        }
    }

    /// Give back the hardware handles
    pub fn release(self) -> (U, D, T) {
        (self.usart, self.direction, self.delay)
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn flags(&self) -> StatusFlags {
        self.status.flags()
    }

    /// Current activity
    pub fn state(&self) -> LinkState {
        let flags = self.flags();
        if let Some(sent) = self.tx.sent() {
            LinkState::Transmitting(sent)
        } else if let Some(received) = self.rx.received() {
            LinkState::ReceivingFrame(received)
        } else if flags.new_frame() {
            LinkState::FrameReady
        } else if flags.tx_finished() {
            LinkState::TransmitComplete
        } else {
            LinkState::Idle
        }
    }

    // ---- Application side ----

    pub fn outbound(&self) -> &Frame {
        &self.outbound
    }

    pub fn outbound_mut(&mut self) -> &mut Frame {
        &mut self.outbound
    }

    /// Last completed inbound frame
    pub fn inbound(&self) -> &Frame {
        &self.inbound
    }

    /// Address the next outbound frame (host side)
    pub fn set_target(&mut self, controller_id: u8) {
        self.outbound.controller_id = controller_id;
    }

    pub fn set_telemetry(&mut self, index: usize, value: u16) -> Result<(), FrameError> {
        self.outbound.set_telemetry(index, value)
    }

    /// Telemetry slot of the last inbound frame
    pub fn telemetry(&self, index: usize) -> Result<u16, FrameError> {
        self.inbound.telemetry(index)
    }

    pub fn set_dio(&mut self, line: u8, high: bool) -> Result<(), FrameError> {
        self.outbound.dio.set(line, high)
    }

    /// DIO line of the last inbound frame
    pub fn dio(&self, line: u8) -> Result<bool, FrameError> {
        self.inbound.dio.get(line)
    }

    /// Error code sent with the next frame
    ///
    /// A checksum error recorded by the receive path stays here until it is
    /// overwritten.
    pub fn set_error(&mut self, error: ErrorCode) {
        self.outbound.error = error;
    }

    /// Error code reported by the other side
    pub fn error(&self) -> ErrorCode {
        self.inbound.error
    }

    pub fn new_frame_ready(&self) -> bool {
        self.flags().new_frame()
    }

    pub fn transmit_finished(&self) -> bool {
        self.flags().tx_finished()
    }

    /// Whether the last completed inbound frame passed its checksum
    pub fn inbound_checksum_ok(&self) -> bool {
        self.inbound_checksum_ok
    }

    /// Consume the ready inbound frame
    pub fn take_frame(&mut self) -> Option<Frame> {
        if self.status.take(StatusFlags::NEW_FRAME) {
            Some(self.inbound)
        } else {
            None
        }
    }

    /// Send the outbound frame
    ///
    /// The start marker and checksum are filled in here. Returns once the
    /// transceiver has settled; the bytes go out from the interrupt
    /// handlers. Calling this again before [`Link::transmit_finished`]
    /// restarts the transfer and the partly sent frame is lost.
    pub fn begin_transmission(&mut self) {
        self.status
            .update(StatusFlags::TX_FINISHED, StatusFlags::TX_IN_PROGRESS);

        self.tx_buf = self.outbound.encode();
        trace!(
            "tx start: id={} err={}",
            self.outbound.controller_id,
            self.outbound.error
        );

        self.direction.enable_transmit();
        self.delay.delay_us(self.config.settle_us);

        self.tx = TxState::start();
        self.usart
            .set_interrupt(UsartInterrupt::DataRegisterEmpty, true);
    }

    // ---- Interrupt side ----

    /// Dispatch one interrupt event
    pub fn handle(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::ByteReceived(byte) => self.receive_byte(byte),
            LinkEvent::DataRegisterEmpty => self.on_data_register_empty(),
            LinkEvent::TransmitComplete => self.on_transmit_complete(),
        }
    }

    /// Receive-complete interrupt
    pub fn on_receive(&mut self) {
        let byte = self.usart.read_data();
        self.receive_byte(byte);
    }

    /// Run one received byte through the receiver
    pub fn receive_byte(&mut self, byte: u8) {
        let (next, action) = self.rx.on_byte(byte);
        self.rx = next;

        match action {
            RxAction::Ignored => {}
            RxAction::Started => {
                self.rx_buf[0] = FRAME_START;
                self.status.set(StatusFlags::RX_IN_PROGRESS);
            }
            RxAction::Stored { index, byte } => {
                self.rx_buf[usize::from(index)] = byte;
            }
            RxAction::Completed {
                index,
                byte,
                checksum,
            } => {
                self.rx_buf[usize::from(index)] = byte;
                self.complete_frame(checksum == byte);
            }
        }
    }

    fn complete_frame(&mut self, checksum_ok: bool) {
        self.inbound = Frame::from_bytes(&self.rx_buf);
        self.inbound_checksum_ok = checksum_ok;
        self.status
            .update(StatusFlags::RX_IN_PROGRESS, StatusFlags::NEW_FRAME);

        if checksum_ok {
            trace!("rx frame: {}", self.inbound);
        } else {
            warn!(
                "rx frame for {=u8:#x}: bad checksum",
                self.inbound.controller_id
            );
        }

        if self.config.role.answers(self.inbound.controller_id) {
            if !checksum_ok {
                self.outbound.error = ErrorCode::BadChecksum;
            }
            self.begin_transmission();
        }
    }

    /// Data-register-empty interrupt
    pub fn on_data_register_empty(&mut self) {
        let (next, action) = self.tx.on_data_register_empty();
        self.tx = next;

        match action {
            TxAction::Write { index } => {
                self.usart.write_data(self.tx_buf[usize::from(index)]);
            }
            TxAction::WriteLast { index } => {
                self.usart.write_data(self.tx_buf[usize::from(index)]);
                self.usart
                    .set_interrupt(UsartInterrupt::DataRegisterEmpty, false);
                self.usart
                    .set_interrupt(UsartInterrupt::TransmitComplete, true);
            }
            TxAction::Release | TxAction::Spurious => {
                warn!("spurious data-register-empty in {}", self.tx);
                self.usart
                    .set_interrupt(UsartInterrupt::DataRegisterEmpty, false);
            }
        }
    }

    /// Transmit-complete interrupt
    pub fn on_transmit_complete(&mut self) {
        let (next, action) = self.tx.on_transmit_complete();
        self.tx = next;

        match action {
            TxAction::Release => {
                self.direction.disable_transmit();
                self.usart
                    .set_interrupt(UsartInterrupt::TransmitComplete, false);
                self.status
                    .update(StatusFlags::TX_IN_PROGRESS, StatusFlags::TX_FINISHED);
                trace!("tx finished");
            }
            TxAction::Spurious => {
                self.usart
                    .set_interrupt(UsartInterrupt::TransmitComplete, false);
            }
            TxAction::Write { .. } | TxAction::WriteLast { .. } => {}
        }
    }
}
