//! Where rendering looks up argument values.

use core::hash::BuildHasher;
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A name → value lookup for rendering.
pub trait Arguments {
    /// The value supplied for `name`, if any.
    fn argument(&self, name: &str) -> Option<&Value>;
}

impl<T: Arguments + ?Sized> Arguments for &T {
    fn argument(&self, name: &str) -> Option<&Value> {
        (**self).argument(name)
    }
}

impl Arguments for Map<String, Value> {
    fn argument(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Only objects supply arguments.
impl Arguments for Value {
    fn argument(&self, name: &str) -> Option<&Value> {
        self.as_object()?.get(name)
    }
}

impl<S: BuildHasher> Arguments for HashMap<String, Value, S> {
    fn argument(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: BuildHasher> Arguments for IndexMap<String, Value, S> {
    fn argument(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Arguments for BTreeMap<String, Value> {
    fn argument(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}
