use crate::error::RegistryError;
use crate::events::{ItemEvent, ItemEventKind};
use crate::factory::ItemFactory;
use fxhash::FxHashMap;
use hearth_domain::{Command, GroupFunctionSpec, Item, ItemName, PersistedItem, State};
use hearth_events::EventBus;
use hearth_groups::FunctionRegistry;
use hearth_store::RecordStore;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// The managed item registry.
///
/// Three views are kept in step: the durable records in the store, the live
/// cache of constructed items, and the deferred table of records no current
/// factory can construct yet. Mutations are serialized by a commit lock and
/// follow a strict order: store write first, cache second, event last. The
/// cache never reflects a write the store did not accept.
///
/// Reads (`get`, `get_all`, the aggregation helpers) never touch the store
/// or the commit lock.
pub struct ItemRegistry {
    records: RecordStore<PersistedItem>,
    bus: EventBus,
    functions: Arc<FunctionRegistry>,
    items: RwLock<FxHashMap<ItemName, Arc<Item>>>,
    deferred: RwLock<FxHashMap<ItemName, PersistedItem>>,
    factories: RwLock<Vec<Arc<dyn ItemFactory>>>,
    commit: Mutex<()>,
}

impl fmt::Debug for ItemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRegistry")
            .field("items", &self.items.read().len())
            .field("deferred", &self.deferred.read().len())
            .field("factories", &self.factories.read().len())
            .finish_non_exhaustive()
    }
}

impl ItemRegistry {
    /// Creates a registry over the given record store and event bus, with
    /// the built-in group functions.
    #[must_use]
    pub fn new(records: RecordStore<PersistedItem>, bus: EventBus) -> Self {
        Self {
            records,
            bus,
            functions: Arc::new(FunctionRegistry::with_builtins()),
            items: RwLock::new(FxHashMap::default()),
            deferred: RwLock::new(FxHashMap::default()),
            factories: RwLock::new(Vec::new()),
            commit: Mutex::new(()),
        }
    }

    /// Replaces the group function registry.
    #[must_use]
    pub fn with_functions(mut self, functions: Arc<FunctionRegistry>) -> Self {
        self.functions = functions;
        self
    }

    /// The group function registry in use.
    #[must_use]
    pub const fn functions(&self) -> &Arc<FunctionRegistry> {
        &self.functions
    }

    /// Registers a new item.
    ///
    /// # Errors
    /// [`RegistryError::InvalidName`] when the name fails the identifier
    /// grammar, [`RegistryError::AlreadyExists`] when the name is taken
    /// (including by a deferred record), [`RegistryError::Store`] when
    /// persisting fails, in which case nothing is applied.
    pub async fn add(&self, item: Item) -> Result<(), RegistryError> {
        ItemName::parse(item.name.as_str())?;

        let _commit = self.commit.lock().await;
        if self.items.read().contains_key(&item.name) || self.deferred.read().contains_key(&item.name)
        {
            return Err(RegistryError::AlreadyExists {
                message: item.name.to_string().into(),
                context: None,
            });
        }

        let record = PersistedItem::from_item(&item);
        self.records.put(item.name.as_str(), &record).await?;

        let item = Arc::new(item);
        self.items.write().insert(item.name.clone(), item.clone());
        self.emit(ItemEventKind::Added, item.name.clone(), Some(item));
        Ok(())
    }

    /// Removes an item, returning it. Removing an absent name is a normal
    /// outcome (`Ok(None)`), not an error.
    ///
    /// Removing a group leaves its members registered: the group's name is
    /// stripped from each member's memberships and the member re-persisted.
    ///
    /// # Errors
    /// [`RegistryError::Store`] when a store write fails.
    pub async fn remove(&self, name: &str) -> Result<Option<Item>, RegistryError> {
        let _commit = self.commit.lock().await;
        self.remove_locked(name).await
    }

    /// Removes a group and every transitive member, leaves first, then the
    /// group itself. On simple items this behaves like [`Self::remove`].
    ///
    /// # Errors
    /// [`RegistryError::Store`] when a store write fails; items removed
    /// before the failure stay removed.
    pub async fn remove_recursive(&self, name: &str) -> Result<Option<Item>, RegistryError> {
        let _commit = self.commit.lock().await;

        let members = {
            let items = self.items.read();
            let all: Vec<Arc<Item>> = items.values().cloned().collect();
            hearth_groups::transitive_members_of(name, &all)
        };

        // Reverse discovery order puts members of nested groups before the
        // groups themselves, avoiding membership churn on doomed items.
        for member in members.iter().rev() {
            self.remove_locked(member.as_str()).await?;
        }
        self.remove_locked(name).await
    }

    /// Replaces a registered item, returning the previous one.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] when no item with this name is live,
    /// [`RegistryError::Store`] when persisting fails, in which case the
    /// previous item stays in place.
    pub async fn update(&self, item: Item) -> Result<Item, RegistryError> {
        let _commit = self.commit.lock().await;

        let previous = self.items.read().get(item.name.as_str()).cloned().ok_or_else(|| {
            RegistryError::NotFound { message: item.name.to_string().into(), context: None }
        })?;

        let record = PersistedItem::from_item(&item);
        self.records.put(item.name.as_str(), &record).await?;

        let item = Arc::new(item);
        self.items.write().insert(item.name.clone(), item.clone());
        self.emit(ItemEventKind::Updated, item.name.clone(), Some(item));
        Ok((*previous).clone())
    }

    /// Looks up a live item. Pure cache read.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Item>> {
        self.items.read().get(name).cloned()
    }

    /// Snapshot of every live item. Pure cache read, unordered.
    #[must_use]
    pub fn get_all(&self) -> Vec<Arc<Item>> {
        self.items.read().values().cloned().collect()
    }

    /// Number of live items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Replays every persisted record into the live cache.
    ///
    /// Records no factory can construct are parked in the deferred table;
    /// that is a normal outcome, logged at debug, never an error. Stored
    /// names are accepted as-is, even when they predate the current grammar.
    ///
    /// # Errors
    /// [`RegistryError::Store`] when the record enumeration itself fails.
    pub async fn load(&self) -> Result<(), RegistryError> {
        let _commit = self.commit.lock().await;

        let records = self.records.get_all().await?;
        let mut constructed = 0_usize;
        let mut parked = 0_usize;

        for (key, record) in records {
            let name = ItemName::from_stored(key);
            if let Some(item) = self.construct(&name, &record) {
                let item = Arc::new(item);
                self.items.write().insert(name.clone(), item.clone());
                self.emit(ItemEventKind::Added, name, Some(item));
                constructed += 1;
            } else {
                debug!(item = %name, item_type = %record.item_type,
                    "No factory for stored item yet, deferring construction");
                self.deferred.write().insert(name, record);
                parked += 1;
            }
        }

        info!(constructed, deferred = parked, "Item registry loaded");
        Ok(())
    }

    /// Registers an item factory and retries every deferred record against
    /// the full factory set. Each record that now constructs is promoted to
    /// the live cache with exactly one `Added` event.
    pub async fn add_factory(&self, factory: Arc<dyn ItemFactory>) {
        self.factories.write().push(factory);

        let _commit = self.commit.lock().await;
        let pending: Vec<(ItemName, PersistedItem)> =
            self.deferred.read().iter().map(|(k, v)| (k.clone(), v.clone())).collect();

        for (name, record) in pending {
            if let Some(item) = self.construct(&name, &record) {
                let item = Arc::new(item);
                self.items.write().insert(name.clone(), item.clone());
                self.deferred.write().remove(&name);
                info!(item = %name, "Deferred item constructed");
                self.emit(ItemEventKind::Added, name, Some(item));
            }
        }
    }

    /// Deregisters a factory. Already-constructed items stay live.
    pub fn remove_factory(&self, factory: &Arc<dyn ItemFactory>) {
        self.factories.write().retain(|f| !Arc::ptr_eq(f, factory));
    }

    /// Names currently parked in the deferred table.
    #[must_use]
    pub fn deferred_names(&self) -> Vec<ItemName> {
        self.deferred.read().keys().cloned().collect()
    }

    /// Computed aggregation state of a group, from the live cache.
    #[must_use]
    pub fn computed_state(&self, name: &str) -> Option<State> {
        let group = self.get(name)?;
        let all = self.get_all();
        Some(hearth_groups::compute_state(&group, &all, &self.functions))
    }

    /// Routes a command sent to a group into per-member commands.
    #[must_use]
    pub fn route_command(&self, name: &str, command: &Command) -> Vec<(ItemName, Command)> {
        self.get(name).map_or_else(Vec::new, |group| {
            let all = self.get_all();
            hearth_groups::route_command(&group, &all, command, &self.functions)
        })
    }

    async fn remove_locked(&self, name: &str) -> Result<Option<Item>, RegistryError> {
        let existing = self.items.read().get(name).cloned();
        let Some(existing) = existing else {
            // A deferred record has no live item but still owns its store key.
            if self.deferred.write().remove(name).is_some() {
                self.records.remove(name).await?;
            }
            return Ok(None);
        };

        if existing.is_group() {
            self.detach_members(name).await?;
        }

        self.records.remove(name).await?;
        self.items.write().remove(name);
        self.emit(ItemEventKind::Removed, existing.name.clone(), Some(existing.clone()));
        Ok(Some((*existing).clone()))
    }

    async fn detach_members(&self, group: &str) -> Result<(), RegistryError> {
        let members: Vec<Arc<Item>> =
            self.items.read().values().filter(|i| i.is_member_of(group)).cloned().collect();

        for member in members {
            let mut updated = (*member).clone();
            updated.group_names.retain(|g| g != group);

            let record = PersistedItem::from_item(&updated);
            self.records.put(updated.name.as_str(), &record).await?;

            let updated = Arc::new(updated);
            self.items.write().insert(updated.name.clone(), updated.clone());
            self.emit(ItemEventKind::Updated, updated.name.clone(), Some(updated));
        }
        Ok(())
    }

    /// Rebuilds a live item from its durable record.
    ///
    /// Group records with a base type need a factory for the base item;
    /// simple records need a factory for their own type. `None` means no
    /// registered factory handles the required type yet.
    fn construct(&self, name: &ItemName, record: &PersistedItem) -> Option<Item> {
        let mut item = if record.is_group() {
            let base = match &record.base_item_type {
                Some(base_type) => Some(self.create_from_factories(base_type, name)?),
                None => None,
            };

            let function = record.function_name.as_ref().map(|fname| {
                GroupFunctionSpec::new(fname.clone(), record.function_params.clone())
            });
            if let Some(spec) = &function {
                if let Err(err) = self.functions.resolve(spec) {
                    warn!(item = %name, %err, "Stored group function does not resolve cleanly");
                }
            }

            let mut group = Item::group(name.clone());
            if let Some(base) = base {
                group = group.with_base(base);
            }
            if let Some(spec) = function {
                group = group.with_function(spec);
            }
            group
        } else {
            self.create_from_factories(&record.full_item_type(), name)?
        };

        item.label = record.label.clone();
        item.category = record.category.clone();
        item.tags = record.tags.clone();
        item.group_names = record.group_names.clone();
        Some(item)
    }

    fn create_from_factories(&self, item_type: &str, name: &ItemName) -> Option<Item> {
        self.factories.read().iter().find_map(|f| f.create(item_type, name))
    }

    /// Events are best-effort once the commit is durable; a bus refusal is
    /// logged, never propagated.
    fn emit(&self, kind: ItemEventKind, name: ItemName, item: Option<Arc<Item>>) {
        if let Err(err) = self.bus.publish(ItemEvent::new(kind, name, item)) {
            warn!(%err, "Failed to publish item event");
        }
    }
}
