//! Types and helpers shared by every crate in the Shop Sync workspace.
mod money;

pub mod helpers;
pub mod op;
mod secret;

pub use money::{Money, MoneyConversionError};
pub use secret::Secret;
