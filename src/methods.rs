//! Registration-time method table, property discovery, and accessor
//! resolution.
//!
//! A [`MethodTable`] records the target type's named methods with boxed
//! invokers. Discovery operates purely on the recorded names and shapes:
//! a one-parameter method named `set_*` is a candidate mutator, and its
//! read method is looked up by the `get_`/`is_` convention with an exact
//! type-equivalence check. Registration order is the enumeration order.

use std::any::Any;
use std::fmt::Debug;

use log::debug;

use crate::typekey::TypeKey;

/// Mutator method name prefix.
pub const WRITE_PREFIX: &str = "set_";
/// Primary accessor method name prefix.
pub const READ_PREFIX: &str = "get_";
/// Fallback accessor prefix for boolean properties.
pub const BOOL_READ_PREFIX: &str = "is_";

type WriteFn<T> = Box<dyn Fn(&mut T, Box<dyn Any>)>;
type ReadFn<T> = Box<dyn Fn(&T) -> Box<dyn Any>>;

/// Value operations captured at registration time, when the parameter
/// type is still concrete.
pub(crate) struct ValueOps {
    pub eq: fn(&dyn Any, &dyn Any) -> bool,
    pub duplicate: fn(&dyn Any) -> Box<dyn Any>,
    pub describe: fn(&dyn Any) -> String,
}

fn eq_impl<V: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<V>(), b.downcast_ref::<V>()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn duplicate_impl<V: Clone + 'static>(value: &dyn Any) -> Box<dyn Any> {
    match value.downcast_ref::<V>() {
        Some(v) => Box::new(v.clone()),
        None => panic!("value type mismatch"),
    }
}

fn describe_impl<V: Debug + 'static>(value: &dyn Any) -> String {
    match value.downcast_ref::<V>() {
        Some(v) => format!("{:?}", v),
        None => "<opaque>".to_string(),
    }
}

pub(crate) enum Shape<T> {
    /// One parameter: a candidate mutator when the name matches.
    Unary {
        param: TypeKey,
        invoke: WriteFn<T>,
        ops: ValueOps,
    },
    /// Zero parameters with a return value: a candidate accessor.
    Nullary { ret: TypeKey, invoke: ReadFn<T> },
    /// Any other shape; recorded but never a candidate.
    Opaque { params: usize },
}

/// A single registered method of the target type.
pub struct Method<T> {
    name: String,
    pub(crate) shape: Shape<T>,
}

impl<T> Method<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_count(&self) -> usize {
        match &self.shape {
            Shape::Unary { .. } => 1,
            Shape::Nullary { .. } => 0,
            Shape::Opaque { params } => *params,
        }
    }

    pub(crate) fn write(&self, target: &mut T, value: Box<dyn Any>) {
        match &self.shape {
            Shape::Unary { invoke, .. } => invoke(target, value),
            _ => panic!("{} is not a write method", self.name),
        }
    }

    pub(crate) fn read(&self, target: &T) -> Box<dyn Any> {
        match &self.shape {
            Shape::Nullary { invoke, .. } => invoke(target),
            _ => panic!("{} is not a read method", self.name),
        }
    }

    pub(crate) fn ops(&self) -> Option<&ValueOps> {
        match &self.shape {
            Shape::Unary { ops, .. } => Some(ops),
            _ => None,
        }
    }
}

/// Ordered method registrations for a target type.
///
/// Registration order is the order in which discovery enumerates
/// candidates, standing in for declaration order.
pub struct MethodTable<T> {
    methods: Vec<Method<T>>,
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self {
            methods: Vec::new(),
        }
    }

    /// Record a one-parameter method.
    pub fn unary<V, F>(mut self, name: impl Into<String>, invoke: F) -> Self
    where
        V: Clone + PartialEq + Debug + 'static,
        F: Fn(&mut T, V) + 'static,
    {
        let invoke: WriteFn<T> = Box::new(move |target, value| match value.downcast::<V>() {
            Ok(v) => invoke(target, *v),
            Err(_) => panic!("write method invoked with a value of the wrong type"),
        });
        self.methods.push(Method {
            name: name.into(),
            shape: Shape::Unary {
                param: TypeKey::of::<V>(),
                invoke,
                ops: ValueOps {
                    eq: eq_impl::<V>,
                    duplicate: duplicate_impl::<V>,
                    describe: describe_impl::<V>,
                },
            },
        });
        self
    }

    /// Record a zero-parameter method with a return value.
    pub fn nullary<V, F>(mut self, name: impl Into<String>, invoke: F) -> Self
    where
        V: 'static,
        F: Fn(&T) -> V + 'static,
    {
        let invoke: ReadFn<T> = Box::new(move |target| Box::new(invoke(target)));
        self.methods.push(Method {
            name: name.into(),
            shape: Shape::Nullary {
                ret: TypeKey::of::<V>(),
                invoke,
            },
        });
        self
    }

    /// Record a method of any other shape, such as a two-parameter setter.
    /// These are never mutator or accessor candidates.
    pub fn opaque(mut self, name: impl Into<String>, params: usize) -> Self {
        self.methods.push(Method {
            name: name.into(),
            shape: Shape::Opaque { params },
        });
        self
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub(crate) fn methods(&self) -> &[Method<T>] {
        &self.methods
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A property surfaced by a mutator registration.
pub struct Property<'t, T> {
    /// The mutator name with the `set_` prefix stripped.
    pub name: String,
    /// The mutator's declared parameter type.
    pub declared: TypeKey,
    pub(crate) write: &'t Method<T>,
    pub(crate) read: Option<&'t Method<T>>,
}

/// Enumerate candidate properties: one-parameter methods whose name
/// starts with `set_`, in registration order.
pub fn discover<'t, T>(table: &'t MethodTable<T>) -> Vec<Property<'t, T>> {
    let mut found = Vec::new();
    for method in table.methods() {
        let Shape::Unary { param, .. } = &method.shape else {
            continue;
        };
        let Some(name) = method.name().strip_prefix(WRITE_PREFIX) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        found.push(Property {
            name: name.to_string(),
            declared: *param,
            write: method,
            read: None,
        });
    }
    found
}

/// Find the matching read method for a property: `get_` + name with zero
/// parameters and an equivalent return type, falling back to `is_` + name
/// for boolean properties. `None` means "no accessor", a non-fatal
/// condition for the caller.
pub fn resolve_accessor<'t, T>(
    table: &'t MethodTable<T>,
    property: &str,
    expected: &TypeKey,
) -> Option<&'t Method<T>> {
    if let Some(method) = find_reader(table, READ_PREFIX, property, expected) {
        return Some(method);
    }
    if expected.is_bool() {
        debug!(
            "property {} is a bool, trying the {} prefix",
            property, BOOL_READ_PREFIX
        );
        return find_reader(table, BOOL_READ_PREFIX, property, expected);
    }
    None
}

fn find_reader<'t, T>(
    table: &'t MethodTable<T>,
    prefix: &str,
    property: &str,
    expected: &TypeKey,
) -> Option<&'t Method<T>> {
    let wanted = format!("{}{}", prefix, property);
    let found = table.methods().iter().find(|method| {
        method.name() == wanted
            && matches!(&method.shape, Shape::Nullary { ret, .. } if ret.equivalent(expected))
    });
    if found.is_none() {
        debug!("no appropriate read method {} for {}", wanted, property);
    }
    found
}
