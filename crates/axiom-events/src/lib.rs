//! Axiom Events - the Journal's in-process subscription bus.
//!
//! Implements the `on(listener)` contract from `spec.md` §4.A: subscribers
//! receive events in `append` order, and a full subscriber channel blocks
//! further delivery (see [`bus`] module docs for the documented
//! drop-or-block choice).
//!
//! # Example
//!
//! ```rust
//! use axiom_events::EventBus;
//! use axiom_core::{Event, EventPayload, EventType, SessionId, Timestamp};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let bus = EventBus::new();
//! let (_id, mut receiver) = bus.subscribe();
//!
//! let event = Arc::new(Event {
//!     seq: 1,
//!     session_id: SessionId::new(),
//!     event_type: EventType::new("session.created"),
//!     timestamp: Timestamp::now(),
//!     payload: EventPayload::Raw(serde_json::json!({})),
//!     prev_hash: "0".repeat(64),
//!     hash: "a".repeat(64),
//! });
//! bus.publish(event).await;
//! let received = receiver.recv().await.unwrap();
//! assert_eq!(received.seq, 1);
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod prelude;

mod bus;

pub use bus::{EventBus, EventReceiver, SubscriberId, DEFAULT_CHANNEL_CAPACITY};
