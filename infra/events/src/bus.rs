use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{trace, warn};

/// A safe default for channel buffers.
/// 128 is usually enough for registry notifications.
const DEFAULT_CAPACITY: usize = 128;
const MIN_CAPACITY: usize = 1;

/// Supported channel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Broadcast (fan-out) semantics.
    Broadcast { capacity: usize },
    /// Watch (latest-value) semantics.
    Watch,
}

/// Marker trait for types that can be sent across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct ChannelState {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

#[derive(Debug)]
enum ChannelHandle<T> {
    Broadcast(broadcast::Sender<Arc<T>>),
    Watch(watch::Sender<Arc<T>>),
}

impl<T: Event> ChannelHandle<T> {
    fn from_state(state: &ChannelState) -> Result<Self, EventBusError> {
        match state.kind {
            ChannelKind::Broadcast { .. } => state
                .sender
                .downcast_ref::<broadcast::Sender<Arc<T>>>()
                .map(|tx| Self::Broadcast(tx.clone()))
                .ok_or_else(|| type_mismatch::<T>()),
            ChannelKind::Watch => state
                .sender
                .downcast_ref::<watch::Sender<Arc<T>>>()
                .map(|tx| Self::Watch(tx.clone()))
                .ok_or_else(|| type_mismatch::<T>()),
        }
    }
}

/// A thread-safe, type-indexed event bus.
///
/// Channels are keyed by the [`TypeId`] of the event. The first subscriber or
/// publisher of a type fixes the channel kind; later calls requesting a
/// different kind fail with [`EventBusError::ChannelKindMismatch`].
///
/// Delivery is synchronous with the publishing call: `publish` hands the event
/// to the underlying tokio channel before returning, so a publisher that runs
/// after a state commit gives listeners an ordering consistent with commits.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, ChannelState>>>,
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to an event of type `T` using broadcast with default capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if a different channel
    /// kind was already registered for `T`.
    ///
    /// # Examples
    /// ```rust
    /// use hearth_events::EventBus;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct ItemAdded(u64);
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), hearth_events::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut rx = bus.subscribe::<ItemAdded>()?;
    /// bus.publish(ItemAdded(1))?;
    /// assert_eq!(rx.recv().await.unwrap().0, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to an event of type `T` with a specific broadcast buffer capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if a different channel
    /// kind was already registered for `T`, or
    /// [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        let capacity = validate_capacity(capacity)?;
        match self.ensure_channel::<T>(ChannelKind::Broadcast { capacity }, None)? {
            ChannelHandle::Broadcast(tx) => Ok(tx.subscribe()),
            ChannelHandle::Watch(_) => Err(type_mismatch::<T>()),
        }
    }

    /// Subscribes to a watch channel (latest-value semantics).
    /// Initializes the channel with the provided value if absent.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if a different channel
    /// kind was already registered for `T`.
    pub fn subscribe_watch<T: Event>(
        &self,
        initial: T,
    ) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        match self.ensure_channel::<T>(ChannelKind::Watch, Some(Arc::new(initial)))? {
            ChannelHandle::Watch(tx) => Ok(tx.subscribe()),
            ChannelHandle::Broadcast(_) => Err(type_mismatch::<T>()),
        }
    }

    /// Publishes an event via broadcast, returning the number of receivers.
    ///
    /// An event nobody listens to is dropped with a `trace!` and `Ok(0)`.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if a different channel
    /// kind was already registered for `T`.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Publishes a shared event instance via broadcast without re-wrapping.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if a different channel
    /// kind was already registered for `T`.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let handle =
            self.ensure_channel::<T>(ChannelKind::Broadcast { capacity: DEFAULT_CAPACITY }, None)?;
        let ChannelHandle::Broadcast(tx) = handle else {
            return Err(type_mismatch::<T>());
        };

        match tx.send(event) {
            Ok(count) => {
                trace!(event = std::any::type_name::<T>(), count, "Event dispatched");
                Ok(count)
            },
            Err(_) => {
                trace!(event = std::any::type_name::<T>(), "Event dropped: no active subscribers");
                Ok(0)
            },
        }
    }

    /// Publishes to a watch channel (latest-value semantics). Creates the channel if missing.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if a different channel
    /// kind was already registered for `T`.
    pub fn publish_watch<T: Event>(&self, event: T) -> Result<(), EventBusError> {
        let arc = Arc::new(event);
        let handle = self.ensure_channel::<T>(ChannelKind::Watch, Some(arc.clone()))?;
        let ChannelHandle::Watch(tx) = handle else {
            return Err(type_mismatch::<T>());
        };
        tx.send_replace(arc);
        Ok(())
    }

    /// Gracefully shuts down the bus by dropping all underlying channels.
    ///
    /// Returns the number of event channels that were closed.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn ensure_channel<T: Event>(
        &self,
        kind: ChannelKind,
        watch_initial: Option<Arc<T>>,
    ) -> Result<ChannelHandle<T>, EventBusError> {
        let id = TypeId::of::<T>();

        // Fast path: channel already exists.
        {
            let channels = self.channels.read();
            if let Some(existing) = channels.get(&id) {
                return checked_handle::<T>(kind, existing);
            }
        }

        let mut channels = self.channels.write();
        if let Some(existing) = channels.get(&id) {
            // Lost the race to another creator.
            return checked_handle::<T>(kind, existing);
        }

        trace!(event = std::any::type_name::<T>(), ?kind, "Initializing new event channel");
        let sender: Box<dyn Any + Send + Sync> = match kind {
            ChannelKind::Broadcast { capacity } => {
                let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
                Box::new(tx)
            },
            ChannelKind::Watch => {
                let initial = watch_initial.ok_or_else(|| EventBusError::TypeMismatch {
                    message: "Watch channel requires an initial value".into(),
                    context: Some(std::any::type_name::<T>().into()),
                })?;
                let (tx, _) = watch::channel::<Arc<T>>(initial);
                Box::new(tx)
            },
        };

        let entry = channels.entry(id).or_insert(ChannelState { kind, sender });
        ChannelHandle::from_state(entry)
    }
}

fn checked_handle<T: Event>(
    requested: ChannelKind,
    existing: &ChannelState,
) -> Result<ChannelHandle<T>, EventBusError> {
    match (existing.kind, requested) {
        (
            ChannelKind::Broadcast { capacity: existing_capacity },
            ChannelKind::Broadcast { capacity },
        ) => {
            if existing_capacity != capacity {
                warn!(
                    event = std::any::type_name::<T>(),
                    existing_capacity,
                    requested_capacity = capacity,
                    "Broadcast channel already initialized with a different capacity"
                );
            }
            ChannelHandle::from_state(existing)
        },
        (ChannelKind::Watch, ChannelKind::Watch) => ChannelHandle::from_state(existing),
        (found, requested) => Err(EventBusError::ChannelKindMismatch {
            message: format!(
                "Expected {requested:?} but found {found:?} for {}",
                std::any::type_name::<T>()
            )
            .into(),
            context: None,
        }),
    }
}

fn type_mismatch<T>() -> EventBusError {
    EventBusError::TypeMismatch {
        message: std::any::type_name::<T>().into(),
        context: Some("Unexpected event type".into()),
    }
}

fn validate_capacity(capacity: usize) -> Result<usize, EventBusError> {
    if capacity < MIN_CAPACITY {
        return Err(EventBusError::InvalidCapacity {
            message: format!("capacity must be >= {MIN_CAPACITY}").into(),
            context: None,
        });
    }
    Ok(capacity)
}
