//! Per-type shared state handed to step callbacks.
//!
//! [`Contexts`] maps a type to a single, lazily created instance. Step
//! definitions registered with a context parameter receive `&mut T` for the
//! instance of their declared type, so every callback naming the same type
//! shares one value for as long as the engine keeps it.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

/// Typed store of context instances, at most one per type.
///
/// # Examples
///
/// ```
/// use pepino::Contexts;
///
/// #[derive(Default)]
/// struct Basket(Vec<String>);
///
/// let mut contexts = Contexts::new();
/// contexts.get_or_create::<Basket>().0.push("apple".into());
/// assert_eq!(contexts.get::<Basket>().map(|b| b.0.len()), Some(1));
///
/// contexts.reset();
/// assert!(contexts.get::<Basket>().is_none());
/// ```
#[derive(Default)]
pub struct Contexts {
    instances: HashMap<TypeId, Box<dyn Any>>,
    names: HashMap<TypeId, &'static str>,
}

impl Contexts {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the instance for `T`, creating it with `T::default()` on first
    /// access.
    pub fn get_or_create<T: Default + 'static>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        if !self.instances.contains_key(&id) {
            log::debug!("creating context {}", type_name::<T>());
            self.names.insert(id, type_name::<T>());
        }
        let slot = self
            .instances
            .entry(id)
            .or_insert_with(|| Box::new(T::default()));
        slot.downcast_mut::<T>()
            .unwrap_or_else(|| unreachable!("context slot for {} holds another type", type_name::<T>()))
    }

    /// Borrow the instance for `T` if it has been created.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.instances.get(&TypeId::of::<T>())?.downcast_ref()
    }

    /// Mutably borrow the instance for `T` if it has been created.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.instances.get_mut(&TypeId::of::<T>())?.downcast_mut()
    }

    /// Store `value` as the instance for `T`, returning the previous one.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        let id = TypeId::of::<T>();
        self.names.insert(id, type_name::<T>());
        self.instances
            .insert(id, Box::new(value))
            .and_then(|old| old.downcast().ok())
            .map(|old| *old)
    }

    /// Remove and return the instance for `T`.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        let id = TypeId::of::<T>();
        self.names.remove(&id);
        self.instances
            .remove(&id)
            .and_then(|old| old.downcast().ok())
            .map(|old| *old)
    }

    /// Drop every instance so the next access starts from defaults.
    pub fn reset(&mut self) {
        self.instances.clear();
        self.names.clear();
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl fmt::Debug for Contexts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names.values().collect();
        names.sort();
        f.debug_struct("Contexts").field("types", &names).finish()
    }
}

#[cfg(test)]
mod tests;
