//! A minimal typed service locator.
//!
//! The container stands in for a host application's dependency-injection
//! framework. It holds two things:
//!
//! - **Providers**: one shared instance per type, looked up by type. Trait
//!   objects are provided as `Arc<dyn Trait>` and resolved the same way.
//! - **Components**: every registered [`Component`], in registration order.
//!   Discovery walks this list.
//!
//! ```rust,ignore
//! let container = Container::new();
//! container.component(Greeter::default());
//! container.provide(Arc::new(Database::connect()?))?;
//!
//! let db = container.resolve::<Database>()?;
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use slackmod_core::Component;
use tracing::trace;

use crate::error::ContainerError;

/// A provider slot. Always holds an `Arc<T>` for the `T` it is keyed by.
type Provider = Box<dyn Any + Send + Sync>;

#[derive(Default)]
struct ContainerInner {
    providers: RwLock<HashMap<TypeId, Provider>>,
    components: RwLock<Vec<Arc<dyn Component>>>,
}

/// Singletons staged for [`Container::provide_all`].
#[derive(Default)]
pub struct Providers {
    entries: Vec<(TypeId, &'static str, Provider)>,
}

impl Providers {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages the singleton for `T`.
    pub fn with<T>(mut self, service: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.entries
            .push((TypeId::of::<T>(), type_name::<T>(), Box::new(service)));
        self
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(_, name, _)| name))
            .finish()
    }
}

/// Shared registry of providers and components.
///
/// Cloning is cheap; all clones see the same registrations.
#[derive(Clone, Default)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the singleton for `T`.
    pub fn provide<T>(&self, service: Arc<T>) -> Result<(), ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let mut providers = self.inner.providers.write();
        let key = TypeId::of::<T>();
        if providers.contains_key(&key) {
            return Err(ContainerError::AlreadyProvided {
                type_name: type_name::<T>(),
            });
        }
        trace!(service = type_name::<T>(), "Provider registered");
        providers.insert(key, Box::new(service));
        Ok(())
    }

    /// Registers every singleton in `batch`, or none of them.
    ///
    /// Fails if any type is already provided or staged twice.
    pub fn provide_all(&self, batch: Providers) -> Result<(), ContainerError> {
        let mut providers = self.inner.providers.write();
        for (i, (key, name, _)) in batch.entries.iter().enumerate() {
            let staged_twice = batch.entries[..i].iter().any(|(k, _, _)| k == key);
            if staged_twice || providers.contains_key(key) {
                return Err(ContainerError::AlreadyProvided { type_name: *name });
            }
        }
        for (key, name, service) in batch.entries {
            trace!(service = name, "Provider registered");
            providers.insert(key, service);
        }
        Ok(())
    }

    /// Returns the singleton for `T`, if one was provided.
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.inner
            .providers
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|p| p.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// Returns the singleton for `T`, or an error naming the missing type.
    pub fn resolve<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get::<T>().ok_or(ContainerError::Missing {
            type_name: type_name::<T>(),
        })
    }

    /// Returns whether a singleton for `T` was provided.
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.inner.providers.read().contains_key(&TypeId::of::<T>())
    }

    /// Registers a component and returns the shared instance.
    ///
    /// The instance is also provided as `Arc<C>` unless a provider for `C`
    /// already exists, so other code can resolve it.
    pub fn component<C: Component>(&self, component: C) -> Arc<C> {
        let component = Arc::new(component);
        self.component_arc(Arc::clone(&component));
        component
    }

    /// Registers an already shared component.
    pub fn component_arc<C: Component>(&self, component: Arc<C>) {
        if let Entry::Vacant(slot) = self.inner.providers.write().entry(TypeId::of::<C>()) {
            slot.insert(Box::new(Arc::clone(&component)));
        }
        trace!(component = component.component_name(), "Component registered");
        self.inner.components.write().push(component);
    }

    /// Returns the registered components in registration order.
    pub fn components(&self) -> Vec<Arc<dyn Component>> {
        self.inner.components.read().clone()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("providers", &self.inner.providers.read().len())
            .field("components", &self.inner.components.read().len())
            .finish()
    }
}
