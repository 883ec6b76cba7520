//! # Event Bus
//!
//! A type-indexed, asynchronous event bus used to notify listeners about
//! registry changes without coupling them to the producer.
//!
//! ## Overview
//!
//! A single [`EventBus`] carries any number of event types. Each type gets
//! its own channel, created lazily by the first subscriber or publisher.
//! Two kinds are supported: `broadcast` (fan-out to every subscriber) and
//! `watch` (latest value only).
//!
//! Events are delivered as `Arc<T>`, so publishing to many subscribers never
//! clones the payload.
//!
//! # Example
//!
//! ```rust
//! use hearth_events::{EventBus, EventBusError};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct ItemChanged { name: String }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!
//!     let mut rx = bus.subscribe::<ItemChanged>()?;
//!     bus.publish(ItemChanged { name: "Kitchen_Light".into() })?;
//!
//!     if let Ok(event) = rx.recv().await {
//!         assert_eq!(event.name, "Kitchen_Light");
//!     }
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
