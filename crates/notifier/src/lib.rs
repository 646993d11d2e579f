//! Notification delivery.
//!
//! - `Notifier` trait for the delivery seam used by the poller
//! - `TelegramNotifier` posting Markdown messages to a single chat

pub mod telegram;
pub mod traits;

pub use telegram::TelegramNotifier;
pub use traits::{Notifier, NotifyError};
