//! Fixed-size maps keyed by [`Fraction`] and [`Pathway`].
//!
//! Both are thin wrappers around arrays indexed by the enum's storage
//! index, so every key is always present and lookups cannot fail.

use crate::kind::{Fraction, Pathway};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

macro_rules! keyed_map {
    ($(#[$meta:meta])* $name:ident, $key:ty, $n:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name<T>(pub [T; $n]);

        impl<T> $name<T> {
            /// Build a map by evaluating `f` for every key in storage order.
            pub fn from_fn(mut f: impl FnMut($key) -> T) -> Self {
                Self(<$key>::ALL.map(|k| f(k)))
            }

            /// Iterate over `(key, &value)` pairs in storage order.
            pub fn iter(&self) -> impl Iterator<Item = ($key, &T)> + '_ {
                <$key>::ALL.into_iter().zip(self.0.iter())
            }

            /// Iterate over values in storage order.
            pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
                self.0.iter()
            }

            /// Apply `f` to every value, producing a new map.
            pub fn map<U>(&self, mut f: impl FnMut($key, &T) -> U) -> $name<U> {
                $name::from_fn(|k| f(k, &self.0[k.index()]))
            }
        }

        impl<T: Copy> $name<T> {
            /// A map with every key set to `value`.
            pub fn splat(value: T) -> Self {
                Self([value; $n])
            }
        }

        impl $name<f64> {
            /// Sum of all values.
            pub fn sum(&self) -> f64 {
                self.0.iter().sum()
            }

            /// Whether every value is finite.
            pub fn all_finite(&self) -> bool {
                self.0.iter().all(|v| v.is_finite())
            }
        }

        impl<T> Index<$key> for $name<T> {
            type Output = T;

            fn index(&self, key: $key) -> &T {
                &self.0[key.index()]
            }
        }

        impl<T> IndexMut<$key> for $name<T> {
            fn index_mut(&mut self, key: $key) -> &mut T {
                &mut self.0[key.index()]
            }
        }
    };
}

keyed_map!(
    /// A value for each of the three chemical fractions.
    FractionMap,
    Fraction,
    3
);

keyed_map!(
    /// A value for each of the five transport pathways.
    PathwayMap,
    Pathway,
    5
);
