// ABOUTME: Scoped template context holding variables and filter bindings
// ABOUTME: Contexts chain to a borrowed parent; lookups walk from innermost to outermost scope

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::{clip, truncate_to, Tuple, Value};

/// Transform applied to a filter's argument text
pub type FilterFn = dyn Fn(&str) -> String + Send + Sync;

/// Called with a transform's result once it has been spliced into the line
pub type CleanupFn = dyn Fn(String) + Send + Sync;

/// Maximum byte lengths for names and string values. Longer input is truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextLimits {
    pub max_name_len: usize,
    pub max_value_len: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_name_len: 32,
            max_value_len: 1024,
        }
    }
}

pub struct FilterBinding {
    pub name: String,
    transform: Box<FilterFn>,
    cleanup: Option<Box<CleanupFn>>,
}

impl FilterBinding {
    pub fn apply(&self, argument: &str) -> String {
        (self.transform)(argument)
    }

    /// Hand the spliced result to the cleanup hook, or drop it
    pub fn release(&self, result: String) {
        if let Some(cleanup) = &self.cleanup {
            cleanup(result);
        }
    }

    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }
}

impl fmt::Debug for FilterBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBinding")
            .field("name", &self.name)
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}

/// A variable scope. The root is built by the caller before rendering; loop
/// iterations render against short-lived children that borrow it.
#[derive(Default)]
pub struct Context<'p> {
    limits: ContextLimits,
    values: Vec<Tuple>,
    filters: Vec<FilterBinding>,
    parent: Option<&'p Context<'p>>,
}

/// Handle returned by [`Context::add_array`] for appending elements
pub struct ArrayHandle<'a> {
    tuple: &'a mut Tuple,
    max_value_len: usize,
}

impl ArrayHandle<'_> {
    pub fn push_string(&mut self, value: &str) -> &mut Self {
        let value = Value::String(truncate_to(value.to_string(), self.max_value_len));
        self.push(value)
    }

    pub fn push_int(&mut self, value: i64) -> &mut Self {
        self.push_string(&value.to_string())
    }

    pub fn len(&self) -> usize {
        self.tuple.value.as_array().map_or(0, |items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, value: Value) -> &mut Self {
        if let Value::Array(items) = &mut self.tuple.value {
            items.push(value);
        }
        self
    }
}

impl<'p> Context<'p> {
    /// Create an empty root context with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ContextLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Create a child scope. It sees everything visible here and is released
    /// when it goes out of scope.
    pub fn child(&self) -> Context<'_> {
        Context {
            limits: self.limits,
            values: Vec::new(),
            filters: Vec::new(),
            parent: Some(self),
        }
    }

    pub fn limits(&self) -> ContextLimits {
        self.limits
    }

    pub fn parent(&self) -> Option<&Context<'_>> {
        self.parent
    }

    /// Add a string variable
    pub fn add_string(&mut self, name: &str, value: &str) {
        let value = Value::String(value.to_string());
        self.add_value(name, value);
    }

    /// Add an integer variable, stored as its decimal string
    pub fn add_int(&mut self, name: &str, value: i64) {
        self.add_string(name, &value.to_string());
    }

    /// Add any value. Strings, including array elements, are truncated.
    pub fn add_value(&mut self, name: &str, value: Value) {
        let name = self.bound_name(name);
        let value = self.bound_value(value);
        self.values.push(Tuple::new(name, value));
    }

    /// Add an empty array variable and return a handle for filling it
    pub fn add_array(&mut self, name: &str) -> ArrayHandle<'_> {
        let name = self.bound_name(name);
        let index = self.values.len();
        self.values.push(Tuple::new(name, Value::Array(Vec::new())));
        ArrayHandle {
            tuple: &mut self.values[index],
            max_value_len: self.limits.max_value_len,
        }
    }

    /// Register a filter whose result is simply dropped after use
    pub fn add_filter<F>(&mut self, name: &str, transform: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.push_filter(name, Box::new(transform), None);
    }

    pub fn add_filter_with_cleanup<F, C>(&mut self, name: &str, transform: F, cleanup: C)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
        C: Fn(String) + Send + Sync + 'static,
    {
        self.push_filter(name, Box::new(transform), Some(Box::new(cleanup)));
    }

    /// Find the nearest value bound to `name`
    pub fn lookup_value(&self, name: &str) -> Option<&Value> {
        let needle = clip(name, self.limits.max_name_len);
        let mut scope: Option<&Context<'_>> = Some(self);
        while let Some(current) = scope {
            if let Some(tuple) = current.values.iter().find(|t| t.name == needle) {
                return Some(&tuple.value);
            }
            scope = current.parent;
        }
        None
    }

    /// Find the nearest filter bound to `name`
    pub fn lookup_filter(&self, name: &str) -> Option<&FilterBinding> {
        let needle = clip(name, self.limits.max_name_len);
        let mut scope: Option<&Context<'_>> = Some(self);
        while let Some(current) = scope {
            if let Some(filter) = current.filters.iter().find(|f| f.name == needle) {
                return Some(filter);
            }
            scope = current.parent;
        }
        None
    }

    /// Tuples bound directly in this scope, in insertion order
    pub fn tuples(&self) -> &[Tuple] {
        &self.values
    }

    /// Names of filters bound directly in this scope
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name.as_str()).collect()
    }

    /// Number of tuples bound directly in this scope
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push_filter(&mut self, name: &str, transform: Box<FilterFn>, cleanup: Option<Box<CleanupFn>>) {
        let name = self.bound_name(name);
        self.filters.push(FilterBinding {
            name,
            transform,
            cleanup,
        });
    }

    fn bound_name(&self, name: &str) -> String {
        clip(name, self.limits.max_name_len).to_string()
    }

    fn bound_value(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(truncate_to(s, self.limits.max_value_len)),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.bound_value(v)).collect())
            }
        }
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.values)
            .field("filters", &self.filters)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
