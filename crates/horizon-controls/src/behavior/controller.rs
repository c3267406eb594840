//! Controller kinds and the type relationships between them.
//!
//! A controller is the per-control object a behavior aspect routes its
//! events to. Controllers form single-parent hierarchies: a derived
//! controller embeds its parent and exposes it through
//! [`Controller::as_parent`], while [`Controller::parent_kind`] describes the
//! same relationship at the type level. A behavior configuration uses the
//! type-level view to decide which factory serves each requested kind; the
//! instance-level view lets an aspect that asked for the parent kind work
//! with an instance of a derived kind.
//!
//! ```
//! use horizon_controls::behavior::{Controller, ControllerKind};
//!
//! #[derive(Default)]
//! struct Pointer;
//! impl Controller for Pointer {}
//!
//! #[derive(Default)]
//! struct Dragger {
//!     pointer: Pointer,
//! }
//!
//! impl Controller for Dragger {
//!     fn parent_kind() -> Option<ControllerKind> {
//!         Some(ControllerKind::of::<Pointer>())
//!     }
//!
//!     fn as_parent(&self) -> Option<&dyn Controller> {
//!         Some(&self.pointer)
//!     }
//! }
//!
//! let pointer = ControllerKind::of::<Pointer>();
//! let dragger = ControllerKind::of::<Dragger>();
//! assert!(pointer.is_ancestor_of(&dragger));
//! assert!(!dragger.is_ancestor_of(&pointer));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Access to a value as [`Any`] for downcasting.
///
/// Implemented for every `'static` type; it exists so that a
/// `&dyn Controller` can be downcast to its concrete type.
pub trait AsAny: Any {
    /// The value as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A behavior controller.
pub trait Controller: AsAny + Send + Sync {
    /// The kind this controller type derives from, if any.
    fn parent_kind() -> Option<ControllerKind>
    where
        Self: Sized,
    {
        None
    }

    /// The embedded parent controller, matching [`parent_kind`](Self::parent_kind).
    fn as_parent(&self) -> Option<&dyn Controller> {
        None
    }
}

/// Longest parent chain followed when projecting an instance.
const MAX_DEPTH: usize = 64;

/// The view of `instance` as the controller of type `kind`, found by walking
/// its parent chain.
pub fn project(instance: &dyn Controller, kind: TypeId) -> Option<&dyn Controller> {
    let mut current = Some(instance);
    for _ in 0..MAX_DEPTH {
        let controller = current?;
        if controller.as_any().type_id() == kind {
            return Some(controller);
        }
        current = controller.as_parent();
    }
    None
}

/// Check if `instance` is of type `kind` or derives from it.
pub fn is_instance_of(instance: &dyn Controller, kind: TypeId) -> bool {
    project(instance, kind).is_some()
}

/// Downcast `instance`, or one of its embedded parents, to `C`.
pub fn downcast<C: Controller>(instance: &dyn Controller) -> Option<&C> {
    project(instance, TypeId::of::<C>())?.as_any().downcast_ref::<C>()
}

/// Runtime description of a controller type and its ancestry.
#[derive(Clone, Copy)]
pub struct ControllerKind {
    type_id: TypeId,
    name: &'static str,
    parent: fn() -> Option<ControllerKind>,
}

impl ControllerKind {
    /// The kind of controller type `C`.
    pub fn of<C: Controller>() -> Self {
        Self {
            type_id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
            parent: C::parent_kind,
        }
    }

    /// The controller type's id.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The controller type's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The kind this one derives from.
    pub fn parent(&self) -> Option<ControllerKind> {
        (self.parent)()
    }

    /// Ancestors from the direct parent upwards.
    ///
    /// Returns `None` if the chain loops back on itself.
    pub fn ancestors(&self) -> Option<Vec<ControllerKind>> {
        let mut seen = HashSet::from([self.type_id]);
        let mut ancestors = Vec::new();
        let mut next = self.parent();
        while let Some(kind) = next {
            if !seen.insert(kind.type_id) {
                return None;
            }
            ancestors.push(kind);
            next = kind.parent();
        }
        Some(ancestors)
    }

    /// Check if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &ControllerKind) -> bool {
        other
            .ancestors()
            .is_some_and(|ancestors| ancestors.iter().any(|kind| kind == self))
    }

    /// Check if an instance of `other` can serve where `self` is requested.
    pub fn is_assignable_from(&self, other: &ControllerKind) -> bool {
        self == other || self.is_ancestor_of(other)
    }
}

impl PartialEq for ControllerKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ControllerKind {}

impl Hash for ControllerKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ControllerKind").field(&self.name).finish()
    }
}

type CreateFn<N> = Arc<dyn Fn(&N) -> Arc<dyn Controller> + Send + Sync>;

/// A type-erased function creating a controller for a control.
///
/// Two factories are equal only if they are clones of the same function.
pub struct ControllerFactory<N> {
    kind: ControllerKind,
    create: CreateFn<N>,
}

impl<N: 'static> ControllerFactory<N> {
    /// Wrap a factory producing controllers of type `C`.
    pub fn new<C, F>(factory: F) -> Self
    where
        C: Controller,
        F: Fn(&N) -> C + Send + Sync + 'static,
    {
        Self {
            kind: ControllerKind::of::<C>(),
            create: Arc::new(move |control: &N| Arc::new(factory(control)) as Arc<dyn Controller>),
        }
    }

    /// The kind of controller this factory produces.
    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    /// Create a controller for `control`.
    pub fn create(&self, control: &N) -> Arc<dyn Controller> {
        (self.create)(control)
    }
}

impl<N> Clone for ControllerFactory<N> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            create: self.create.clone(),
        }
    }
}

impl<N> PartialEq for ControllerFactory<N> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.create, &other.create)
    }
}

impl<N> fmt::Debug for ControllerFactory<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerFactory")
            .field("kind", &self.kind)
            .finish()
    }
}
