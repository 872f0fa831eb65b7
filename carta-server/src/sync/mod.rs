//! Live synchronization
//!
//! - [`SyncBus`] - broadcast channel for change events
//! - [`Subscription`] - RAII receiver handle
//! - [`LiveView`] - snapshot reconciler applying pushed events
//! - [`tcp`] - newline-delimited JSON feed for external clients

mod bus;
mod live;
pub mod tcp;

pub use bus::{Subscription, SyncBus};
pub use live::LiveView;
