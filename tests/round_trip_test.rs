//! End-to-end assertion passes over realistic fixture objects.

use chrono::{DateTime, Utc};
use roundcheck::{
    Behavior, MethodTable, PropertyAsserter, SeedableSource, check_properties_with,
};
use std::sync::{Arc, Mutex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A well-behaved object: four properties, one of them boolean with only
/// an `is_` accessor.
#[derive(Debug, Clone, PartialEq)]
struct Widget {
    count: i32,
    label: String,
    flag: bool,
    when_created: DateTime<Utc>,
}

impl Widget {
    fn new() -> Self {
        Self {
            count: 0,
            label: String::new(),
            flag: false,
            when_created: DateTime::from_timestamp_millis(0).unwrap(),
        }
    }

    fn set_count(&mut self, count: i32) {
        self.count = count;
    }
    fn count(&self) -> i32 {
        self.count
    }
    fn set_label(&mut self, label: String) {
        self.label = label;
    }
    fn label(&self) -> String {
        self.label.clone()
    }
    fn set_flag(&mut self, flag: bool) {
        self.flag = flag;
    }
    fn flag(&self) -> bool {
        self.flag
    }
    fn set_when_created(&mut self, when: DateTime<Utc>) {
        self.when_created = when;
    }
    fn when_created(&self) -> DateTime<Utc> {
        self.when_created
    }
}

fn widget_table() -> MethodTable<Widget> {
    MethodTable::new()
        .unary("set_count", Widget::set_count)
        .nullary("get_count", Widget::count)
        .unary("set_label", Widget::set_label)
        .nullary("get_label", Widget::label)
        .unary("set_flag", Widget::set_flag)
        .nullary("is_flag", Widget::flag)
        .unary("set_when_created", Widget::set_when_created)
        .nullary("get_when_created", Widget::when_created)
}

#[test]
fn test_all_properties_round_trip_with_a_fixed_seed() {
    init_logging();
    let mut widget = Widget::new();
    check_properties_with(&mut widget, widget_table(), SeedableSource::new(42)).unwrap();

    // Replay the value stream in discovery order: count, label, flag,
    // when_created.
    let mut replay = SeedableSource::new(42);
    assert_eq!(widget.count, replay.next_i32());
    assert_eq!(widget.label, replay.next_string(10));
    assert_eq!(widget.flag, replay.next_bool());
    assert_eq!(widget.when_created, replay.next_date_time());
}

#[test]
fn test_boolean_property_with_is_accessor_is_exercised() {
    init_logging();
    let mut widget = Widget::new();
    let mut replay = SeedableSource::new(42);
    let _ = replay.next_i32();
    let _ = replay.next_string(10);
    let expected_flag = replay.next_bool();

    check_properties_with(&mut widget, widget_table(), SeedableSource::new(42)).unwrap();
    assert_eq!(widget.flag, expected_flag);
}

#[test]
fn test_identical_seeds_give_identical_targets() {
    let mut a = Widget::new();
    let mut b = Widget::new();
    check_properties_with(&mut a, widget_table(), SeedableSource::new(9000)).unwrap();
    check_properties_with(&mut b, widget_table(), SeedableSource::new(9000)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_shared_source_continues_across_passes() {
    let mut first = Widget::new();
    let mut asserter = PropertyAsserter::builder()
        .for_target(&mut first)
        .methods(widget_table())
        .with_source(SeedableSource::new(31))
        .build()
        .unwrap();
    asserter.assert_properties().unwrap();
    let source = asserter.into_source();

    let mut second = Widget::new();
    check_properties_with(&mut second, widget_table(), source).unwrap();

    // The second pass consumed a later segment of the stream, so the two
    // targets must differ.
    assert_ne!(first, second);
}

/// A mutator with no matching accessor anywhere.
#[derive(Default)]
struct WriteOnly {
    count: i32,
}

#[test]
fn test_missing_accessor_skips_without_touching_the_target() {
    init_logging();
    let mut target = WriteOnly { count: 17 };
    let table = MethodTable::new().unary("set_count", |t: &mut WriteOnly, v: i32| t.count = v);
    check_properties_with(&mut target, table, SeedableSource::new(1)).unwrap();
    // The mutator is only invoked after an accessor resolves.
    assert_eq!(target.count, 17);
}

#[test]
fn test_missing_accessor_invokes_the_behavior_exactly_once() {
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);

    let mut target = WriteOnly::default();
    let table = MethodTable::new().unary("set_count", |t: &mut WriteOnly, v: i32| t.count = v);
    let mut asserter = PropertyAsserter::builder()
        .for_target(&mut target)
        .methods(table)
        .with_source(SeedableSource::new(1))
        .with_no_accessor_behavior(Behavior::Custom(Arc::new(move |message, _| {
            sink.lock().unwrap().push(message.to_string());
        })))
        .build()
        .unwrap();
    asserter.assert_properties().unwrap();

    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("count"));
}

#[test]
fn test_accessor_with_wrong_type_counts_as_missing() {
    let mut target = WriteOnly { count: 3 };
    let table = MethodTable::new()
        .unary("set_count", |t: &mut WriteOnly, v: i32| t.count = v)
        .nullary("get_count", |t: &WriteOnly| t.count as i64);
    check_properties_with(&mut target, table, SeedableSource::new(1)).unwrap();
    assert_eq!(target.count, 3);
}

/// A type the standard provider knows nothing about.
#[derive(Debug, Clone, PartialEq, Default)]
struct Exotic(Vec<String>);

#[derive(Default)]
struct HasExotic {
    inner: Exotic,
}

#[test]
fn test_ungeneratable_type_is_skipped_not_failed() {
    init_logging();
    let mut target = HasExotic::default();
    let table = MethodTable::new()
        .unary("set_inner", |t: &mut HasExotic, v: Exotic| t.inner = v)
        .nullary("get_inner", |t: &HasExotic| t.inner.clone());
    check_properties_with(&mut target, table, SeedableSource::new(1)).unwrap();
    assert_eq!(target.inner, Exotic::default());
}

#[test]
fn test_generation_failure_behavior_sees_the_cause() {
    let causes: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&causes);

    let mut target = HasExotic::default();
    let table = MethodTable::new()
        .unary("set_inner", |t: &mut HasExotic, v: Exotic| t.inner = v)
        .nullary("get_inner", |t: &HasExotic| t.inner.clone());
    let mut asserter = PropertyAsserter::builder()
        .for_target(&mut target)
        .methods(table)
        .with_source(SeedableSource::new(1))
        .with_generation_failure_behavior(Behavior::Custom(Arc::new(move |_, cause| {
            sink.lock().unwrap().push(cause.map(str::to_string));
        })))
        .build()
        .unwrap();
    asserter.assert_properties().unwrap();

    let causes = causes.lock().unwrap();
    assert_eq!(causes.len(), 1);
    let cause = causes[0].as_deref().unwrap();
    assert!(cause.contains("next_exotic"), "cause was: {}", cause);
}

/// An accessor that panics on every call.
#[derive(Default)]
struct Flaky {
    flaky: i32,
}

fn flaky_table() -> MethodTable<Flaky> {
    MethodTable::new()
        .unary("set_flaky", |t: &mut Flaky, v: i32| t.flaky = v)
        .nullary("get_flaky", |_: &Flaky| -> i32 { panic!("getter exploded") })
}

#[test]
#[should_panic(expected = "can't test property flaky")]
fn test_panicking_accessor_fails_the_pass_by_default() {
    let mut target = Flaky::default();
    let _ = check_properties_with(&mut target, flaky_table(), SeedableSource::new(1));
}

#[test]
fn test_panicking_accessor_with_raise_returns_the_error() {
    let mut target = Flaky::default();
    let mut asserter = PropertyAsserter::builder()
        .for_target(&mut target)
        .methods(flaky_table())
        .with_source(SeedableSource::new(1))
        .with_round_trip_failure_behavior(Behavior::Raise)
        .build()
        .unwrap();
    let err = asserter.assert_properties().unwrap_err();
    assert!(err.message().contains("flaky"));
    assert!(err.message().contains("getter exploded"));
}

/// A getter that returns something other than what was written.
#[derive(Default)]
struct Lying {
    stored: i32,
}

fn lying_table() -> MethodTable<Lying> {
    MethodTable::new()
        .unary("set_stored", |t: &mut Lying, v: i32| t.stored = v)
        .nullary("get_stored", |t: &Lying| t.stored.wrapping_add(1))
}

#[test]
#[should_panic(expected = "wrong value for property stored")]
fn test_mismatched_read_back_fails_the_pass() {
    let mut target = Lying::default();
    let _ = check_properties_with(&mut target, lying_table(), SeedableSource::new(1));
}

#[test]
fn test_mismatch_downgraded_to_logging_continues_the_pass() {
    init_logging();
    let mut target = Lying::default();
    let mut asserter = PropertyAsserter::builder()
        .for_target(&mut target)
        .methods(lying_table())
        .with_source(SeedableSource::new(1))
        .with_round_trip_failure_behavior(Behavior::Log {
            include_cause: true,
        })
        .build()
        .unwrap();
    asserter.assert_properties().unwrap();
}

#[test]
fn test_failure_continues_with_remaining_properties_when_downgraded() {
    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);

    #[derive(Default)]
    struct TwoProps {
        bad: i32,
        good: i32,
    }

    let table = MethodTable::new()
        .unary("set_bad", |t: &mut TwoProps, v: i32| t.bad = v)
        .nullary("get_bad", |t: &TwoProps| t.bad.wrapping_add(1))
        .unary("set_good", |t: &mut TwoProps, v: i32| t.good = v)
        .nullary("get_good", |t: &TwoProps| t.good);

    let mut target = TwoProps::default();
    let mut asserter = PropertyAsserter::builder()
        .for_target(&mut target)
        .methods(table)
        .with_source(SeedableSource::new(8))
        .with_round_trip_failure_behavior(Behavior::Custom(Arc::new(move |message, _| {
            sink.lock().unwrap().push(message.to_string());
        })))
        .build()
        .unwrap();
    asserter.assert_properties().unwrap();

    // The bad property was reported, and the good one was still written.
    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("bad"));

    let mut replay = SeedableSource::new(8);
    let _ = replay.next_i32();
    assert_eq!(target.good, replay.next_i32());
}
