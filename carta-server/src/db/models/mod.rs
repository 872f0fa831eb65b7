//! Server-side database models

pub mod serde_helpers;

mod category;
mod product;
mod settings;
mod user;
mod waiter;

pub use category::*;
pub use product::*;
pub use settings::*;
pub use user::*;
pub use waiter::*;
