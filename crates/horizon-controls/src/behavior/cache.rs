//! Per-installation controller sharing.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use horizon_controls_core::logging::targets;
use parking_lot::Mutex;

use crate::behavior::controller::{Controller, ControllerFactory, ControllerKind, downcast, is_instance_of};

/// Creates and shares controllers during one behavior installation.
///
/// The cache maps every controller kind named by the configuration to the
/// factory chosen for it. When a kind is requested for the first time the
/// factory runs, and the new instance is recorded under every registered
/// kind it is an instance of. A later request for any of those kinds
/// returns the same instance, so each factory runs at most once per
/// installation.
pub struct ControllerCache<N> {
    factories: HashMap<TypeId, ControllerFactory<N>>,
    instances: HashMap<TypeId, Arc<dyn Controller>>,
}

impl<N: 'static> ControllerCache<N> {
    /// Create an empty cache over a resolved factory table.
    pub fn new(factories: HashMap<TypeId, ControllerFactory<N>>) -> Self {
        Self {
            factories,
            instances: HashMap::new(),
        }
    }

    /// The controller serving `kind` for `control`, creating it if needed.
    ///
    /// Returns `None` if no factory is registered for `kind`.
    pub fn get(&mut self, control: &N, kind: &ControllerKind) -> Option<Arc<dyn Controller>> {
        match self.lookup(kind)? {
            Lookup::Cached(instance) => Some(instance),
            Lookup::Create(factory) => {
                let instance = factory.create(control);
                Some(self.insert(kind, &factory, instance))
            }
        }
    }

    /// The cached instance for `kind`, or the factory that has to run.
    fn lookup(&self, kind: &ControllerKind) -> Option<Lookup<N>> {
        if let Some(instance) = self.instances.get(&kind.type_id()) {
            return Some(Lookup::Cached(instance.clone()));
        }
        self.factories.get(&kind.type_id()).cloned().map(Lookup::Create)
    }

    /// Record a freshly created instance under every kind it serves.
    ///
    /// If another instance was recorded for `kind` while the factory ran,
    /// that one is kept and returned.
    fn insert(
        &mut self,
        kind: &ControllerKind,
        factory: &ControllerFactory<N>,
        instance: Arc<dyn Controller>,
    ) -> Arc<dyn Controller> {
        if let Some(existing) = self.instances.get(&kind.type_id()) {
            return existing.clone();
        }
        tracing::debug!(
            target: targets::BEHAVIOR,
            requested = kind.name(),
            created = factory.kind().name(),
            "created controller"
        );

        let served: Vec<TypeId> = self
            .factories
            .keys()
            .copied()
            .filter(|type_id| is_instance_of(instance.as_ref(), *type_id))
            .collect();
        for type_id in served {
            self.instances.entry(type_id).or_insert_with(|| instance.clone());
        }
        self.instances
            .entry(kind.type_id())
            .or_insert_with(|| instance.clone())
            .clone()
    }

    /// Number of kinds that currently resolve to an instance.
    pub fn resolved_kinds(&self) -> usize {
        self.instances.len()
    }
}

impl<N> fmt::Debug for ControllerCache<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerCache")
            .field("factories", &self.factories.len())
            .field("instances", &self.instances.len())
            .finish()
    }
}

enum Lookup<N> {
    Cached(Arc<dyn Controller>),
    Create(ControllerFactory<N>),
}

/// Lazily resolved controller for one aspect on one control.
///
/// Handlers installed by an aspect hold this handle instead of the
/// controller itself. The controller is looked up in the installation's
/// cache on first use; after that the handle keeps the instance and lets go
/// of the cache.
pub struct ControllerHandle<N> {
    control: Weak<N>,
    kind: ControllerKind,
    cache: Mutex<Option<Arc<Mutex<ControllerCache<N>>>>>,
    resolved: OnceLock<Arc<dyn Controller>>,
}

impl<N: Send + Sync + 'static> ControllerHandle<N> {
    pub(crate) fn new(control: &Arc<N>, kind: ControllerKind, cache: Arc<Mutex<ControllerCache<N>>>) -> Self {
        Self {
            control: Arc::downgrade(control),
            kind,
            cache: Mutex::new(Some(cache)),
            resolved: OnceLock::new(),
        }
    }

    /// The kind this handle resolves to.
    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    /// Check if the controller has been created or looked up yet.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// The controller instance, resolving it on first call.
    ///
    /// Returns `None` if the control has been dropped before the first
    /// resolution. The cache is not locked while the factory runs, so a
    /// factory may dispatch events to the control.
    pub fn resolve(&self) -> Option<Arc<dyn Controller>> {
        if let Some(instance) = self.resolved.get() {
            return Some(instance.clone());
        }

        let cache = self.cache.lock().take()?;
        let control = self.control.upgrade()?;
        let lookup = cache.lock().lookup(&self.kind)?;
        let instance = match lookup {
            Lookup::Cached(instance) => instance,
            Lookup::Create(factory) => {
                let created = factory.create(&control);
                cache.lock().insert(&self.kind, &factory, created)
            }
        };
        Some(self.resolved.get_or_init(|| instance).clone())
    }

    /// Run `f` with the controller viewed as `C`.
    ///
    /// Returns `None` if the controller cannot be resolved or is not a `C`.
    pub fn with<C: Controller, R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        let instance = self.resolve()?;
        let controller = downcast::<C>(instance.as_ref())?;
        Some(f(controller))
    }
}

impl<N> fmt::Debug for ControllerHandle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("kind", &self.kind)
            .field("resolved", &self.resolved.get().is_some())
            .finish()
    }
}
