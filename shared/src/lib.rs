//! Shared types and pure domain logic for the Carta menu system.
//!
//! Everything in this crate is usable by both the server and clients:
//! embedded sub-entity models, the keyed-array mutation helpers, aggregate
//! recomputation, raw-document normalization and sync message types.

pub mod aggregate;
pub mod keyed;
pub mod models;
pub mod normalize;
pub mod sync;
pub mod util;

pub use keyed::Keyed;
pub use sync::{SyncAction, SyncEvent};
