//! Type-keyed random value provider backed by a [`SeedableSource`].
//!
//! The registry is the registration-time stand-in for looking up a
//! `next_*` method by name: each entry records the conventional method
//! name, its declared output type, and an erased generator closure.
//! Lookup misses, declared-type mismatches, and generator panics are all
//! non-fatal [`GenerationError`]s; nothing escapes as a panic.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::{DateTime, Utc};
use num_bigint::BigUint;

use crate::error::{GenerationError, panic_message};
use crate::source::SeedableSource;
use crate::typekey::{TypeKey, generator_name};

type GeneratorFn = Box<dyn Fn(&mut SeedableSource) -> Box<dyn Any> + Send + Sync>;

struct GeneratorEntry {
    name: String,
    output: TypeKey,
    call: GeneratorFn,
}

/// Registry mapping a requested type to the generator that produces it.
pub struct ValueProvider {
    generators: HashMap<TypeId, GeneratorEntry>,
}

impl ValueProvider {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// A registry pre-populated with every scalar kind plus `String`,
    /// `Vec<u8>`, `BigUint`, and `DateTime<Utc>`.
    ///
    /// Unparameterized defaults: strings are 10 printable characters,
    /// byte vectors are 16 bytes, big integers use 128 bits.
    pub fn standard() -> Self {
        let mut provider = Self::new();
        provider.register(|s| s.next_bool());
        provider.register(|s| s.next_char());
        provider.register(|s| s.next_i8());
        provider.register(|s| s.next_i16());
        provider.register(|s| s.next_i32());
        provider.register(|s| s.next_i64());
        provider.register(|s| s.next_u8());
        provider.register(|s| s.next_u16());
        provider.register(|s| s.next_u32());
        provider.register(|s| s.next_u64());
        provider.register(|s| s.next_f32());
        provider.register(|s| s.next_f64());
        provider.register(|s| s.next_string(10));
        provider.register_named("next_bytes", |s| s.next_bytes(16));
        provider.register_named("next_biguint", |s| s.next_big_uint(128));
        provider.register(|s| s.next_date_time());
        provider
    }

    /// Register a generator for `V` under the conventional name derived
    /// from the type (`next_` + simple name). Replaces any prior entry.
    pub fn register<V, F>(&mut self, generator: F)
    where
        V: 'static,
        F: Fn(&mut SeedableSource) -> V + Send + Sync + 'static,
    {
        let key = TypeKey::of::<V>();
        self.register_named(generator_name(&key), generator);
    }

    /// Register a generator for `V` under an explicit method name.
    pub fn register_named<V, F>(&mut self, name: impl Into<String>, generator: F)
    where
        V: 'static,
        F: Fn(&mut SeedableSource) -> V + Send + Sync + 'static,
    {
        let key = TypeKey::of::<V>();
        self.generators.insert(
            key.id(),
            GeneratorEntry {
                name: name.into(),
                output: key,
                call: Box::new(move |source| Box::new(generator(source))),
            },
        );
    }

    /// Whether a generator is registered for the given type.
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.generators.contains_key(&key.id())
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Produce a random value of the requested type.
    pub fn value_for(
        &self,
        source: &mut SeedableSource,
        requested: &TypeKey,
    ) -> Result<Box<dyn Any>, GenerationError> {
        let entry = self
            .generators
            .get(&requested.id())
            .ok_or_else(|| GenerationError::NoGenerator {
                method: generator_name(requested),
                type_name: requested.name(),
            })?;

        if !entry.output.equivalent(requested) {
            return Err(GenerationError::TypeMismatch {
                method: entry.name.clone(),
                expected: requested.name(),
                actual: entry.output.name(),
            });
        }

        catch_unwind(AssertUnwindSafe(|| (entry.call)(source))).map_err(|payload| {
            GenerationError::Panicked {
                method: entry.name.clone(),
                cause: panic_message(payload),
            }
        })
    }
}

impl Default for ValueProvider {
    fn default() -> Self {
        Self::new()
    }
}
