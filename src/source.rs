//! A seedable, extensible source of typed random values.
//!
//! Every bounded generator is defined in terms of uniform sampling over a
//! single seeded `StdRng` stream, so a fixed seed fully determines the
//! output sequence for a fixed sequence of calls. Two-argument range forms
//! are inclusive on both ends; one-argument forms are `[0, bound)`.
//!
//! Range misuse (empty range, non-positive bound, empty alphabet or
//! collection) panics with a fixed message, the same convention as
//! `rand::Rng::gen_range`.

use chrono::{DateTime, Utc};
use log::info;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::config::{self, ConfigError};

/// Printable ASCII band used by the printable string generators.
const FIRST_PRINTABLE: u8 = 0x20;
const LAST_PRINTABLE: u8 = 0x7E;

/// Legal characters for identifier-safe property strings.
const PROPERTY_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890_";

const MIN_MAX_ERROR: &str = "min must be less than or equal to max";
const BOUND_ERROR: &str = "bound must be greater than 0";

/// Types with a finite, statically known set of values, eligible for
/// [`SeedableSource::next_enum`].
pub trait Enumerable: Sized + Copy + 'static {
    /// All values of the type, in declaration order.
    fn variants() -> &'static [Self];
}

macro_rules! scalar_methods {
    ($($ty:ty => $unbounded:ident, $below:ident, $in_range:ident;)*) => {
        $(
            /// Uniform value over the type's full domain.
            pub fn $unbounded(&mut self) -> $ty {
                self.rng.r#gen()
            }

            /// Uniform value in `[0, bound)`; panics unless `bound > 0`.
            pub fn $below(&mut self, bound: $ty) -> $ty {
                self.below(bound)
            }

            /// Uniform value in `[min, max]`; panics when `min > max`.
            pub fn $in_range(&mut self, min: $ty, max: $ty) -> $ty {
                self.between(min, max)
            }
        )*
    };
}

/// A stateful random generator with typed convenience methods and an
/// exact-roundtrip seed.
#[derive(Debug, Clone)]
pub struct SeedableSource {
    seed: u64,
    rng: StdRng,
}

impl SeedableSource {
    /// Create a source with the given seed.
    pub fn new(seed: u64) -> Self {
        info!("SeedableSource using seed {}", seed);
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source with the process-default seed, honoring the
    /// `ROUNDCHECK_SEED` environment override.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(config::seed_from_env()?))
    }

    /// Reset the generator state deterministically and record the seed.
    pub fn set_seed(&mut self, seed: u64) {
        info!("SeedableSource reseeded with {}", seed);
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// The seed that was set last.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /* --- Internal uniform helpers --- */

    /// Uniform value in `[0, bound)`; panics unless `bound > 0`.
    fn below<X>(&mut self, bound: X) -> X
    where
        X: SampleUniform + PartialOrd + Zero + Copy,
    {
        if bound <= X::zero() {
            panic!("{}", BOUND_ERROR);
        }
        self.rng.gen_range(X::zero()..bound)
    }

    /// Uniform value in `[min, max]`; panics when `min > max`.
    fn between<X>(&mut self, min: X, max: X) -> X
    where
        X: SampleUniform + PartialOrd + Copy,
    {
        if min > max {
            panic!("{}", MIN_MAX_ERROR);
        }
        self.rng.gen_range(min..=max)
    }

    /* --- Integer methods --- */

    scalar_methods! {
        i8 => next_i8, next_i8_below, next_i8_in;
        i16 => next_i16, next_i16_below, next_i16_in;
        i32 => next_i32, next_i32_below, next_i32_in;
        i64 => next_i64, next_i64_below, next_i64_in;
        u8 => next_u8, next_u8_below, next_u8_in;
        u16 => next_u16, next_u16_below, next_u16_in;
        u32 => next_u32, next_u32_below, next_u32_in;
        u64 => next_u64, next_u64_below, next_u64_in;
    }

    /* --- Float methods --- */

    /// Uniform `f32` in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.rng.r#gen()
    }

    /// Uniform `f32` in `[0, bound)`; panics unless `bound > 0`.
    pub fn next_f32_below(&mut self, bound: f32) -> f32 {
        self.below(bound)
    }

    /// Uniform `f32` in `[min, max]`; panics when `min > max`.
    pub fn next_f32_in(&mut self, min: f32, max: f32) -> f32 {
        self.between(min, max)
    }

    /// Uniform `f64` in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.r#gen()
    }

    /// Uniform `f64` in `[0, bound)`; panics unless `bound > 0`.
    pub fn next_f64_below(&mut self, bound: f64) -> f64 {
        self.below(bound)
    }

    /// Uniform `f64` in `[min, max]`; panics when `min > max`.
    pub fn next_f64_in(&mut self, min: f64, max: f64) -> f64 {
        self.between(min, max)
    }

    /* --- Bool and char methods --- */

    pub fn next_bool(&mut self) -> bool {
        self.rng.r#gen()
    }

    /// Uniform over all valid Unicode scalar values.
    pub fn next_char(&mut self) -> char {
        self.rng.r#gen()
    }

    /// Uniform `char` in `[min, max]`, skipping the surrogate gap;
    /// panics when `min > max`.
    pub fn next_char_in(&mut self, min: char, max: char) -> char {
        if min > max {
            panic!("{}", MIN_MAX_ERROR);
        }
        loop {
            let candidate = self.between(min as u32, max as u32);
            if let Some(c) = char::from_u32(candidate) {
                return c;
            }
        }
    }

    /* --- String methods --- */

    /// A printable-ASCII string of exactly `len` characters.
    pub fn next_string(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| self.between(FIRST_PRINTABLE, LAST_PRINTABLE) as char)
            .collect()
    }

    /// A string of exactly `len` arbitrary Unicode characters.
    pub fn next_string_any(&mut self, len: usize) -> String {
        (0..len).map(|_| self.next_char()).collect()
    }

    /// A string of exactly `len` characters drawn from `alphabet`;
    /// panics when the alphabet is empty.
    pub fn next_string_from(&mut self, len: usize, alphabet: &str) -> String {
        let chars: Vec<char> = alphabet.chars().collect();
        if chars.is_empty() {
            panic!("alphabet must not be empty");
        }
        (0..len).map(|_| chars[self.below(chars.len())]).collect()
    }

    /// A printable string whose length is drawn uniformly from `[min, max)`;
    /// panics unless `min < max`.
    pub fn next_string_in(&mut self, min: usize, max: usize) -> String {
        let len = self.string_length(min, max);
        self.next_string(len)
    }

    /// Like [`Self::next_string_in`] with arbitrary Unicode characters.
    pub fn next_string_in_any(&mut self, min: usize, max: usize) -> String {
        let len = self.string_length(min, max);
        self.next_string_any(len)
    }

    fn string_length(&mut self, min: usize, max: usize) -> usize {
        if min >= max {
            panic!("max must be greater than min");
        }
        self.between(min, max - 1)
    }

    /// An identifier-safe string over `[A-Za-z0-9_]` of exactly `len`
    /// characters.
    pub fn next_property_string(&mut self, len: usize) -> String {
        self.next_string_from(len, PROPERTY_CHARS)
    }

    /// An uppercase `A`-`Z` string of exactly `len` characters, usable as
    /// an XML element name.
    pub fn next_xml_string(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| self.between(b'A', b'Z') as char)
            .collect()
    }

    /// A digit string of exactly `len` characters with no leading zero;
    /// panics when `len` is zero.
    pub fn next_numeric_string(&mut self, len: usize) -> String {
        if len == 0 {
            panic!("numeric string length must be at least 1");
        }
        let mut digits = String::with_capacity(len);
        digits.push((b'1' + self.below(9u8)) as char);
        for _ in 1..len {
            digits.push((b'0' + self.below(10u8)) as char);
        }
        digits
    }

    /* --- Byte and big-integer methods --- */

    /// `size` uniformly random bytes.
    pub fn next_bytes(&mut self, size: usize) -> Vec<u8> {
        let mut buf = vec![0u8; size];
        self.rng.fill_bytes(&mut buf);
        buf
    }

    /// A non-negative integer in `[0, 2^bits)`.
    pub fn next_big_uint(&mut self, bits: usize) -> BigUint {
        if bits == 0 {
            return BigUint::zero();
        }
        let mut bytes = self.next_bytes(bits.div_ceil(8));
        let excess = bytes.len() * 8 - bits;
        bytes[0] &= 0xFF >> excess;
        BigUint::from_bytes_be(&bytes)
    }

    /* --- Collection methods --- */

    /// A uniformly picked element of `items`; panics when `items` is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        if items.is_empty() {
            panic!("cannot pick from an empty slice");
        }
        let index = self.below(items.len());
        &items[index]
    }

    /// A uniformly picked element of an ordered collection; panics when the
    /// collection is empty.
    pub fn pick_from<I>(&mut self, items: I) -> I::Item
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
    {
        let mut iter = items.into_iter();
        let len = iter.len();
        if len == 0 {
            panic!("cannot pick from an empty collection");
        }
        let index = self.below(len);
        iter.nth(index).expect("index within collection bounds")
    }

    /// A uniformly picked value of an [`Enumerable`] type.
    pub fn next_enum<E: Enumerable>(&mut self) -> E {
        *self.pick(E::variants())
    }

    /* --- Date methods --- */

    /// A date-time uniform over chrono's representable millisecond range;
    /// may precede the Unix epoch.
    pub fn next_date_time(&mut self) -> DateTime<Utc> {
        let min = DateTime::<Utc>::MIN_UTC.timestamp_millis();
        let max = DateTime::<Utc>::MAX_UTC.timestamp_millis();
        date_from_millis(self.between(min, max))
    }

    /// A date-time uniform in `[epoch, max]`; panics when `max` precedes
    /// the epoch.
    pub fn next_date_time_before(&mut self, max: DateTime<Utc>) -> DateTime<Utc> {
        let max_millis = max.timestamp_millis();
        if max_millis < 0 {
            panic!("max must not precede the Unix epoch");
        }
        date_from_millis(self.between(0, max_millis))
    }

    /// A date-time uniform in `[min, max]`; panics when `min > max`.
    pub fn next_date_time_in(&mut self, min: DateTime<Utc>, max: DateTime<Utc>) -> DateTime<Utc> {
        if min > max {
            panic!("{}", MIN_MAX_ERROR);
        }
        date_from_millis(self.between(min.timestamp_millis(), max.timestamp_millis()))
    }
}

fn date_from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).expect("millisecond timestamp within chrono range")
}
