//! Behavior configurations: sets of aspects installed together.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use horizon_controls_core::logging::{PerfSpan, targets};
use horizon_controls_core::{Subscription, controls_warn};
use parking_lot::Mutex;

use crate::behavior::BehaviorInstaller;
use crate::behavior::aspect::BehaviorAspect;
use crate::behavior::cache::ControllerCache;
use crate::behavior::controller::{Controller, ControllerFactory, ControllerKind};
use crate::control::Control;
use crate::error::ConfigurationError;

/// An ordered set of behavior aspects and the factory chosen for each
/// controller kind they request.
///
/// Aspects that request related controller kinds share one controller per
/// installation. When several aspects request kinds along one inheritance
/// chain, every kind on the chain is served by the factory of the most
/// derived registered kind. Two registered kinds that derive from a common
/// kind without one deriving from the other cannot be served by a single
/// controller, and building the configuration fails with
/// [`ConfigurationError::DivergentControllers`].
///
/// Building a configuration does all validation up front; installing it
/// on a control cannot fail.
pub struct BehaviorConfiguration<N> {
    aspects: Vec<Arc<BehaviorAspect<N>>>,
    factories: HashMap<TypeId, ControllerFactory<N>>,
}

impl<N: Control> BehaviorConfiguration<N> {
    /// Build a configuration from aspects, in installation order.
    pub fn new<I, A>(aspects: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arc<BehaviorAspect<N>>>,
    {
        let aspects: Vec<Arc<BehaviorAspect<N>>> = aspects.into_iter().map(Into::into).collect();
        let factories = resolve_factories(&aspects)?;
        tracing::debug!(
            target: targets::BEHAVIOR,
            aspects = aspects.len(),
            kinds = factories.len(),
            "behavior configuration built"
        );
        Ok(Self { aspects, factories })
    }

    /// Start a configuration builder.
    pub fn builder() -> BehaviorConfigurationBuilder<N> {
        BehaviorConfigurationBuilder {
            aspects: Vec::new(),
        }
    }

    /// The aspects, in installation order.
    pub fn aspects(&self) -> &[Arc<BehaviorAspect<N>>] {
        &self.aspects
    }

    /// The factory chosen for a controller kind.
    pub fn factory(&self, kind: &ControllerKind) -> Option<&ControllerFactory<N>> {
        self.factories.get(&kind.type_id())
    }

    /// The factory chosen for controller type `C`.
    pub fn factory_of<C: Controller>(&self) -> Option<&ControllerFactory<N>> {
        self.factories.get(&TypeId::of::<C>())
    }

    /// Install every aspect on `control`, in order.
    ///
    /// Controllers are created through a cache private to this
    /// installation, so each control gets its own controllers and related
    /// aspects share one.
    pub fn install(&self, control: &Arc<N>) -> Subscription {
        let _span = PerfSpan::new("install_behavior_configuration");
        let cache = Arc::new(Mutex::new(ControllerCache::new(self.factories.clone())));
        tracing::debug!(
            target: targets::BEHAVIOR,
            control = std::any::type_name::<N>(),
            aspects = self.aspects.len(),
            "installing behavior"
        );
        Subscription::all(self.aspects.iter().map(|aspect| aspect.install(control, &cache)))
    }
}

impl<N: Control> BehaviorInstaller<N> for BehaviorConfiguration<N> {
    fn install(&self, control: &Arc<N>) -> Subscription {
        BehaviorConfiguration::install(self, control)
    }
}

impl<N> Clone for BehaviorConfiguration<N> {
    fn clone(&self) -> Self {
        Self {
            aspects: self.aspects.clone(),
            factories: self.factories.clone(),
        }
    }
}

impl<N> fmt::Debug for BehaviorConfiguration<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorConfiguration")
            .field("aspects", &self.aspects.len())
            .field("kinds", &self.factories.len())
            .finish()
    }
}

/// Builder for a [`BehaviorConfiguration`].
pub struct BehaviorConfigurationBuilder<N> {
    aspects: Vec<Arc<BehaviorAspect<N>>>,
}

impl<N: Control> BehaviorConfigurationBuilder<N> {
    /// Append an aspect.
    pub fn aspect(mut self, aspect: impl Into<Arc<BehaviorAspect<N>>>) -> Self {
        self.aspects.push(aspect.into());
        self
    }

    /// Append several aspects in order.
    pub fn aspects<I, A>(mut self, aspects: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arc<BehaviorAspect<N>>>,
    {
        self.aspects.extend(aspects.into_iter().map(Into::into));
        self
    }

    /// Append every aspect of another configuration.
    pub fn include(mut self, other: &BehaviorConfiguration<N>) -> Self {
        self.aspects.extend(other.aspects.iter().cloned());
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<BehaviorConfiguration<N>, ConfigurationError> {
        BehaviorConfiguration::new(self.aspects)
    }
}

impl<N> fmt::Debug for BehaviorConfigurationBuilder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorConfigurationBuilder")
            .field("aspects", &self.aspects.len())
            .finish()
    }
}

/// Choose the factory serving each requested controller kind.
fn resolve_factories<N: Control>(
    aspects: &[Arc<BehaviorAspect<N>>],
) -> Result<HashMap<TypeId, ControllerFactory<N>>, ConfigurationError> {
    // Registered kinds in first-registration order. A kind requested by
    // several aspects keeps the first aspect's factory.
    let mut registered: Vec<(ControllerKind, ControllerFactory<N>)> = Vec::new();
    for aspect in aspects {
        let kind = aspect.controller_kind();
        if kind.ancestors().is_none() {
            controls_warn!(kind = kind.name(), "controller kind is its own ancestor");
            return Err(ConfigurationError::CyclicControllerKind { kind: kind.name() });
        }
        if registered.iter().all(|(existing, _)| *existing != kind) {
            registered.push((kind, aspect.factory().clone()));
        }
    }

    let mut factories = HashMap::with_capacity(registered.len());
    for (kind, own_factory) in &registered {
        let descendants: Vec<&(ControllerKind, ControllerFactory<N>)> = registered
            .iter()
            .filter(|(other, _)| kind.is_ancestor_of(other))
            .collect();
        let leaves: Vec<&(ControllerKind, ControllerFactory<N>)> = descendants
            .iter()
            .copied()
            .filter(|(candidate, _)| !descendants.iter().any(|(other, _)| candidate.is_ancestor_of(other)))
            .collect();

        let factory = match leaves.as_slice() {
            [] => own_factory.clone(),
            [(_, leaf_factory)] => leaf_factory.clone(),
            _ => {
                let mut names: Vec<&'static str> = descendants.iter().map(|(other, _)| other.name()).collect();
                names.sort_unstable();
                tracing::warn!(
                    target: targets::BEHAVIOR,
                    kind = kind.name(),
                    descendants = ?names,
                    "divergent controller kinds"
                );
                return Err(ConfigurationError::DivergentControllers {
                    kind: kind.name(),
                    descendants: names,
                });
            }
        };
        factories.insert(kind.type_id(), factory);
    }
    Ok(factories)
}
