//! Embedded sub-entity models shared across the wire.

mod category;
mod product;
mod waiter;

pub use category::*;
pub use product::*;
pub use waiter::*;
