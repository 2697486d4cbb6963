//! Typed capability slots.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// One value per type, installed once at startup and read afterwards.
#[derive(Default)]
pub struct Capabilities {
    slots: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `value`, returning whatever was installed under the same type.
    pub fn install<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        let previous = self.slots.insert(TypeId::of::<T>(), Box::new(value))?;
        previous.downcast::<T>().ok().map(|b| *b)
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.slots.get(&TypeId::of::<T>())?.downcast_ref::<T>()
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").field("installed", &self.slots.len()).finish()
    }
}
