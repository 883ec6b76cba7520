//! Facade crate for the hearth item registry.
//! Re-exports the domain/kernel primitives and composes the infrastructure
//! into a ready-to-use [`Hub`]. Keep this crate thin: it wires other crates
//! together, it does not implement registry logic.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hearth::domain::{HubConfig, Item, ItemName, State};
//! use hearth::registry::ItemEvent;
//! use hearth::Hub;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = Hub::init(&HubConfig::default()).await?;
//!     let mut changes = hub.events().subscribe::<ItemEvent>()?;
//!
//!     let name = ItemName::parse("Porch_Light")?;
//!     let item = Item::simple(name, "Switch").with_state(State::Switch(true));
//!     hub.registry().add(item).await?;
//!
//!     if let Ok(event) = changes.recv().await {
//!         println!("{:?} {}", event.kind, event.name);
//!     }
//!     Ok(())
//! }
//! ```

pub use hearth_domain as domain;
pub use hearth_events::{EventBus, EventReceiverExt};
pub use hearth_groups as groups;
pub use hearth_kernel as kernel;
pub use hearth_logger as logger;
pub use hearth_registry as registry;
pub use hearth_store as store;

use hearth_domain::config::CompressionKind;
use hearth_domain::{HubConfig, PersistedItem};
use hearth_registry::{CoreItemFactory, ItemRegistry};
use hearth_store::{Compression, Store};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::info;

/// Store namespace holding the item records.
const ITEMS_NAMESPACE: &str = "items";

/// Errors raised while initializing the hub.
#[hearth_derive::hearth_error]
pub enum HubError {
    #[error("Store error{}: {source}", format_context(.context))]
    Store { source: hearth_store::StoreError, context: Option<Cow<'static, str>> },

    #[error("Registry error{}: {source}", format_context(.context))]
    Registry { source: hearth_registry::RegistryError, context: Option<Cow<'static, str>> },
}

/// A fully wired hub: persistent store, event bus, and item registry.
#[derive(Debug)]
pub struct Hub {
    store: Store,
    events: EventBus,
    registry: Arc<ItemRegistry>,
}

impl Hub {
    /// Connects the store, builds the registry with the core item factory,
    /// and replays every persisted item.
    ///
    /// # Errors
    /// Returns [`HubError::Store`] when the store root cannot be opened and
    /// [`HubError::Registry`] when the startup replay fails.
    pub async fn init(config: &HubConfig) -> Result<Self, HubError> {
        let compression = match config.store.compression {
            CompressionKind::None => Compression::None,
            CompressionKind::Lz4 => Compression::Lz4,
        };
        let store = Store::builder()
            .root(&config.store.root)
            .create(config.store.create)
            .compression(compression)
            .connect()
            .await?;

        let events = EventBus::new();
        let records = store.records::<PersistedItem>(ITEMS_NAMESPACE)?;
        let registry = Arc::new(ItemRegistry::new(records, events.clone()));

        registry.add_factory(Arc::new(CoreItemFactory)).await;
        registry.load().await?;

        info!(items = registry.len(), "Hub initialized");
        Ok(Self { store, events, registry })
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<ItemRegistry> {
        &self.registry
    }

    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }
}
