//! Link state machine
//!
//! Moves frames between the wire and the two frame buffers from interrupt
//! context, with explicit receive and transmit state machines.
//!
//! There is no timeout: a receiver that loses a byte mid-frame stays in the
//! frame until enough further bytes arrive to complete it, and the result
//! is garbage (normally caught by the checksum).

pub mod context;
pub mod events;
pub mod machine;
pub mod shared;
pub mod status;

#[cfg(test)]
mod mock;

pub use context::Link;
pub use events::LinkEvent;
pub use machine::{LinkState, RxAction, RxState, TxAction, TxState};
pub use shared::SharedLink;
pub use status::{LinkStatus, StatusFlags};
