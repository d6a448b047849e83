//! The round-trip assertion pass: for each discovered property, resolve
//! its accessor, generate a random value, write it, read it back, and
//! compare.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::behavior::Behavior;
use crate::error::{AssertionError, BuildError, panic_message};
use crate::methods::{MethodTable, discover, resolve_accessor};
use crate::provider::ValueProvider;
use crate::source::SeedableSource;

/// Runs write-then-read round trips over a target's registered properties.
///
/// Built via [`PropertyAsserter::builder`]. Each property moves through a
/// strictly sequential pipeline: accessor resolution, value generation,
/// write, read, compare. Missing accessors and ungeneratable values are
/// routed to their behaviors and skip the property without touching the
/// target; only a resolved, generated property ever has its mutator
/// invoked.
pub struct PropertyAsserter<'a, T> {
    target: &'a mut T,
    table: MethodTable<T>,
    source: SeedableSource,
    provider: ValueProvider,
    no_accessor: Behavior,
    generation_failure: Behavior,
    round_trip_failure: Behavior,
}

impl<'a, T> PropertyAsserter<'a, T> {
    pub fn builder() -> PropertyAsserterBuilder<'a, T> {
        PropertyAsserterBuilder::new()
    }

    /// The seed of the source in use, for reproducing a failing pass.
    pub fn seed(&self) -> u64 {
        self.source.seed()
    }

    /// Consume the asserter and hand back its random source, so a later
    /// pass over another target can continue the same value stream.
    pub fn into_source(self) -> SeedableSource {
        self.source
    }

    /// Run one assertion pass over every discovered property, in
    /// registration order.
    ///
    /// Returns `Err` only when a `Raise` behavior fires; the default
    /// round-trip failure behavior is `Fail`, which panics like any other
    /// test assertion. Under default behaviors a missing accessor or an
    /// ungeneratable type is logged and skipped, which can mask genuinely
    /// untested properties.
    pub fn assert_properties(&mut self) -> Result<(), AssertionError> {
        let properties = discover(&self.table);
        for mut property in properties {
            property.read = resolve_accessor(&self.table, &property.name, &property.declared);
            let Some(reader) = property.read else {
                self.no_accessor.behave(
                    &format!(
                        "cannot find a matching read method for property {}",
                        property.name
                    ),
                    None,
                )?;
                continue;
            };

            let value = match self.provider.value_for(&mut self.source, &property.declared) {
                Ok(value) => value,
                Err(err) => {
                    self.generation_failure.behave(
                        &format!(
                            "cannot generate a random value for property {}",
                            property.name
                        ),
                        Some(&err.to_string()),
                    )?;
                    continue;
                }
            };

            let ops = property
                .write
                .ops()
                .expect("discovered property always has a unary write method");
            let expected = (ops.duplicate)(value.as_ref());

            let writer = property.write;
            let target = &mut *self.target;
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                writer.write(target, value);
                reader.read(target)
            }));

            match outcome {
                Err(payload) => {
                    let cause = panic_message(payload);
                    self.round_trip_failure.behave(
                        &format!("can't test property {}", property.name),
                        cause.as_deref(),
                    )?;
                }
                Ok(actual) => {
                    if !(ops.eq)(expected.as_ref(), actual.as_ref()) {
                        self.round_trip_failure.behave(
                            &format!(
                                "wrong value for property {}: wrote {}, read {}",
                                property.name,
                                (ops.describe)(expected.as_ref()),
                                (ops.describe)(actual.as_ref())
                            ),
                            None,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Fluent construction for [`PropertyAsserter`].
///
/// The target and method table are required; everything else defaults:
/// a `SeedableSource` seeded from [`crate::config::DEFAULT_SEED`] (or the
/// `ROUNDCHECK_SEED` override), the standard [`ValueProvider`], logging
/// behaviors for missing accessors and generation failures, and the
/// failing behavior for round-trip failures.
pub struct PropertyAsserterBuilder<'a, T> {
    target: Option<&'a mut T>,
    table: Option<MethodTable<T>>,
    source: Option<SeedableSource>,
    provider: Option<ValueProvider>,
    no_accessor: Option<Behavior>,
    generation_failure: Option<Behavior>,
    round_trip_failure: Option<Behavior>,
}

impl<'a, T> PropertyAsserterBuilder<'a, T> {
    pub fn new() -> Self {
        Self {
            target: None,
            table: None,
            source: None,
            provider: None,
            no_accessor: None,
            generation_failure: None,
            round_trip_failure: None,
        }
    }

    /// The object whose properties are asserted. Required.
    pub fn for_target(mut self, target: &'a mut T) -> Self {
        self.target = Some(target);
        self
    }

    /// The target's registered methods. Required.
    pub fn methods(mut self, table: MethodTable<T>) -> Self {
        self.table = Some(table);
        self
    }

    /// The random source to draw property values from.
    pub fn with_source(mut self, source: SeedableSource) -> Self {
        self.source = Some(source);
        self
    }

    /// The generator registry used to produce values by type.
    pub fn with_provider(mut self, provider: ValueProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Reaction when a property has no matching read method.
    pub fn with_no_accessor_behavior(mut self, behavior: Behavior) -> Self {
        self.no_accessor = Some(behavior);
        self
    }

    /// Reaction when a random value cannot be generated.
    pub fn with_generation_failure_behavior(mut self, behavior: Behavior) -> Self {
        self.generation_failure = Some(behavior);
        self
    }

    /// Reaction when a round trip fails or its invocation panics.
    pub fn with_round_trip_failure_behavior(mut self, behavior: Behavior) -> Self {
        self.round_trip_failure = Some(behavior);
        self
    }

    pub fn build(self) -> Result<PropertyAsserter<'a, T>, BuildError> {
        let target = self.target.ok_or(BuildError::MissingTarget)?;
        let table = self.table.ok_or(BuildError::MissingMethods)?;
        let source = match self.source {
            Some(source) => source,
            None => SeedableSource::from_env().map_err(BuildError::Seed)?,
        };
        Ok(PropertyAsserter {
            target,
            table,
            source,
            provider: self.provider.unwrap_or_else(ValueProvider::standard),
            no_accessor: self.no_accessor.unwrap_or(Behavior::Log {
                include_cause: false,
            }),
            generation_failure: self.generation_failure.unwrap_or(Behavior::Log {
                include_cause: false,
            }),
            round_trip_failure: self.round_trip_failure.unwrap_or(Behavior::Fail),
        })
    }
}

impl<'a, T> Default for PropertyAsserterBuilder<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}
