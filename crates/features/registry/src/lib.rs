//! # Managed Item Registry
//!
//! The write path of the hub: durable item records, a live cache of
//! constructed items, deferred construction for records whose factories are
//! not registered yet, and change events for everything that commits.
//!
//! ## Architecture
//!
//! * **Records**: every mutation is persisted as a [`PersistedItem`]
//!   (names and strings only) before the live cache changes.
//! * **Factories ([`factory`]):** construction is pluggable; records whose
//!   type no factory handles wait in the deferred table and materialize the
//!   moment a capable factory is registered.
//! * **Events ([`events`]):** one [`ItemEvent`] per committed mutation,
//!   published after store and cache agree.
//!
//! [`PersistedItem`]: hearth_domain::PersistedItem

mod error;
pub mod events;
pub mod factory;
mod registry;

pub use crate::error::{RegistryError, RegistryErrorExt};
pub use crate::events::{ItemEvent, ItemEventKind};
pub use crate::factory::{CoreItemFactory, ItemFactory};
pub use crate::registry::ItemRegistry;
