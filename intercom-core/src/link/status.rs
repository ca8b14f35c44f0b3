//! Link status flags
//!
//! The flags live in one atomic byte so application code can poll them
//! without locking. Updates that touch more than one bit run inside a
//! critical section, so an interrupt never sees half of a transition.
//!
//! Only the link changes the flags; application code reads snapshots
//! through [`StatusFlags`].

use portable_atomic::{AtomicU8, Ordering};

/// Snapshot of the link status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags(u8);

impl StatusFlags {
    /// A frame is being received
    pub const RX_IN_PROGRESS: u8 = 1 << 0;
    /// A complete frame is waiting to be consumed
    pub const NEW_FRAME: u8 = 1 << 1;
    /// A frame is being transmitted
    pub const TX_IN_PROGRESS: u8 = 1 << 2;
    /// The last transmission has left the wire
    pub const TX_FINISHED: u8 = 1 << 3;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    pub const fn rx_in_progress(self) -> bool {
        self.contains(Self::RX_IN_PROGRESS)
    }

    pub const fn new_frame(self) -> bool {
        self.contains(Self::NEW_FRAME)
    }

    pub const fn tx_in_progress(self) -> bool {
        self.contains(Self::TX_IN_PROGRESS)
    }

    pub const fn tx_finished(self) -> bool {
        self.contains(Self::TX_FINISHED)
    }
}

/// Process-wide link status
#[derive(Debug)]
pub struct LinkStatus {
    flags: AtomicU8,
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkStatus {
    /// Idle link, no flags set
    pub const fn new() -> Self {
        Self {
            flags: AtomicU8::new(0),
        }
    }

    /// Current flags
    pub fn flags(&self) -> StatusFlags {
        StatusFlags(self.flags.load(Ordering::Acquire))
    }

    /// Clear `clear` and set `set` as one transition
    ///
    /// Runs with interrupts masked and restores the previous interrupt
    /// state afterwards; safe to call from inside a handler.
    pub(crate) fn update(&self, clear: u8, set: u8) -> StatusFlags {
        critical_section::with(|_| {
            let old = self.flags.load(Ordering::Acquire);
            let new = (old & !clear) | set;
            self.flags.store(new, Ordering::Release);
            StatusFlags(new)
        })
    }

    pub(crate) fn set(&self, mask: u8) -> StatusFlags {
        StatusFlags(self.flags.fetch_or(mask, Ordering::AcqRel) | mask)
    }

    /// Clear `mask`, returning whether all of it was set before
    pub(crate) fn take(&self, mask: u8) -> bool {
        StatusFlags(self.flags.fetch_and(!mask, Ordering::AcqRel)).contains(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let status = LinkStatus::new();
        assert_eq!(status.flags(), StatusFlags::empty());
    }

    #[test]
    fn test_update_clears_and_sets_together() {
        let status = LinkStatus::new();
        status.set(StatusFlags::TX_FINISHED | StatusFlags::NEW_FRAME);

        let flags = status.update(StatusFlags::TX_FINISHED, StatusFlags::TX_IN_PROGRESS);
        assert!(flags.tx_in_progress());
        assert!(!flags.tx_finished());
        // Unrelated bits untouched
        assert!(flags.new_frame());
        assert_eq!(status.flags(), flags);
    }

    #[test]
    fn test_take() {
        let status = LinkStatus::new();
        assert!(!status.take(StatusFlags::NEW_FRAME));

        status.set(StatusFlags::NEW_FRAME | StatusFlags::RX_IN_PROGRESS);
        assert!(status.take(StatusFlags::NEW_FRAME));
        assert!(!status.flags().new_frame());
        assert!(status.flags().rx_in_progress());
    }
}
