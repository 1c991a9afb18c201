//! Reactive in-memory state.
//!
//! Each store is a single source of truth behind a `tokio::sync::watch`
//! channel: mutations go through `send_if_modified`, so observers are only
//! woken for actual changes, and derived values are recomputed from the
//! current state on every read.

mod cart;
mod search;
mod toast;
mod transient;

pub use cart::{CartItem, CartStore};
pub use search::{SearchStore, matches_product};
pub use toast::{Toast, ToastLevel, ToastStore};
pub use transient::TransientMessage;
