//! Single owner for a link shared with interrupt handlers
//!
//! Firmware keeps the link in a `static` and reaches it from both the main
//! loop and the USART vectors:
//!
//! ```ignore
//! static LINK: SharedLink<Usart0, PinDirection<Output<'static>>, Delay> = SharedLink::new();
//!
//! LINK.install(Link::new(LinkConfig::peripheral(1), usart, direction, delay));
//!
//! #[interrupt]
//! fn USART0_RX() {
//!     LINK.on_receive();
//! }
//! ```
//!
//! Every access runs inside a critical section, so application code and the
//! handlers never see the link half-updated.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use intercom_hal::{DirectionControl, UsartIrq};

use super::context::Link;
use super::status::StatusFlags;

/// Link guarded by a critical-section mutex
pub struct SharedLink<U, D, T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<Link<U, D, T>>>>,
}

impl<U, D, T> SharedLink<U, D, T> {
    /// Empty slot; interrupt calls are ignored until a link is installed
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Install the link, returning the previous one
    pub fn install(&self, link: Link<U, D, T>) -> Option<Link<U, D, T>> {
        self.inner.lock(|cell| cell.replace(Some(link)))
    }

    /// Remove the link
    pub fn take(&self) -> Option<Link<U, D, T>> {
        self.inner.lock(|cell| cell.take())
    }

    /// Run `f` on the installed link
    ///
    /// Returns `None` if no link is installed, or if called from inside
    /// another `with` closure.
    pub fn with<R>(&self, f: impl FnOnce(&mut Link<U, D, T>) -> R) -> Option<R> {
        self.inner.lock(|cell| {
            let mut slot = cell.try_borrow_mut().ok()?;
            slot.as_mut().map(f)
        })
    }
}

impl<U, D, T> Default for SharedLink<U, D, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U, D, T> SharedLink<U, D, T>
where
    U: UsartIrq,
    D: DirectionControl,
    T: DelayNs,
{
    /// Status flags
    ///
    /// `None` if no link is installed, or if called from inside a `with`
    /// closure (use the link passed to the closure instead).
    pub fn flags(&self) -> Option<StatusFlags> {
        self.with(|link| link.flags())
    }

    /// Receive-complete vector
    pub fn on_receive(&self) {
        self.with(|link| link.on_receive());
    }

    /// Data-register-empty vector
    pub fn on_data_register_empty(&self) {
        self.with(|link| link.on_data_register_empty());
    }

    /// Transmit-complete vector
    pub fn on_transmit_complete(&self) {
        self.with(|link| link.on_transmit_complete());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;
    use crate::link::mock::{MockDelay, MockDirection, MockUsart};
    use intercom_hal::UsartInterrupt;
    use intercom_protocol::{Frame, FRAME_LEN};

    type TestShared = SharedLink<MockUsart, MockDirection, MockDelay>;

    static EMPTY: TestShared = SharedLink::new();

    fn install(shared: &TestShared, config: LinkConfig) {
        let link = Link::new(
            config,
            MockUsart::default(),
            MockDirection::default(),
            MockDelay::default(),
        );
        assert!(shared.install(link).is_none());
    }

    #[test]
    fn test_handlers_ignored_before_install() {
        EMPTY.on_receive();
        EMPTY.on_data_register_empty();
        EMPTY.on_transmit_complete();
        assert_eq!(EMPTY.flags(), None);
        assert_eq!(EMPTY.with(|_| ()), None);
    }

    #[test]
    fn test_interrupt_driven_reply() {
        let shared = TestShared::new();
        install(&shared, LinkConfig::peripheral(2));

        shared.with(|link| {
            link.set_telemetry(1, 321).unwrap();
        });

        // Feed a request through the receive vector
        let request = Frame::new(2).encode();
        for byte in request {
            shared.with(|link| link.receive_byte(byte));
        }
        assert!(shared.flags().unwrap().new_frame());
        assert!(shared.flags().unwrap().tx_in_progress());

        for _ in 0..FRAME_LEN {
            shared.on_data_register_empty();
        }
        shared.on_transmit_complete();
        assert!(shared.flags().unwrap().tx_finished());

        let (usart, direction, _) = shared.take().unwrap().release();
        assert!(!direction.transmitting);
        assert!(!usart.enabled(UsartInterrupt::TransmitComplete));
        let reply = Frame::decode(&usart.written).unwrap();
        assert_eq!(reply.telemetry(1), Ok(321));
    }

    #[test]
    fn test_on_receive_reads_from_usart() {
        let shared = TestShared::new();
        let mut usart = MockUsart::default();
        usart.incoming.extend(Frame::new(5).encode());
        let link = Link::new(
            LinkConfig::host(),
            usart,
            MockDirection::default(),
            MockDelay::default(),
        );
        shared.install(link);

        for _ in 0..FRAME_LEN {
            shared.on_receive();
        }
        let frame = shared.with(|link| link.take_frame()).flatten();
        assert_eq!(frame.map(|f| f.controller_id), Some(5));
    }

    #[test]
    fn test_nested_access_is_refused() {
        let shared = TestShared::new();
        install(&shared, LinkConfig::host());
        let nested = shared.with(|_| shared.with(|_| ()));
        assert_eq!(nested, Some(None));

        let nested_flags = shared.with(|_| shared.flags());
        assert_eq!(nested_flags, Some(None));
        assert_eq!(shared.flags(), Some(StatusFlags::empty()));
    }
}
