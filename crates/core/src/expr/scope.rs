use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

/// A source of known variable values for expression evaluation.
pub trait Scope {
    /// Returns the value bound to `name`, if any.
    fn value(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Scope for HashMap<String, f64, S> {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Scope for BTreeMap<String, f64> {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: Scope + ?Sized> Scope for &S {
    fn value(&self, name: &str) -> Option<f64> {
        (**self).value(name)
    }
}

/// A scope that binds one extra name on top of a base scope.
///
/// The root finder uses this to try candidate values for the unknown without
/// copying the known bindings on every evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a, S: ?Sized> {
    base: &'a S,
    name: &'a str,
    value: f64,
}

impl<'a, S: Scope + ?Sized> Overlay<'a, S> {
    /// Creates an overlay binding `name` to `value` over `base`.
    pub fn new(base: &'a S, name: &'a str, value: f64) -> Self {
        Self { base, name, value }
    }
}

impl<S: Scope + ?Sized> Scope for Overlay<'_, S> {
    fn value(&self, name: &str) -> Option<f64> {
        if name == self.name {
            Some(self.value)
        } else {
            self.base.value(name)
        }
    }
}
