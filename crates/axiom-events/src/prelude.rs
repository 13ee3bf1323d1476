//! Prelude module - commonly used types for convenient import.
//!
//! Use `use axiom_events::prelude::*;` to import all essential types.

pub use crate::{EventBus, EventReceiver, SubscriberId, DEFAULT_CHANNEL_CAPACITY};
