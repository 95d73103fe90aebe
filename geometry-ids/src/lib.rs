//! Nominal identifiers and dense indexes used across the instrument geometry
//! crates. Ids (`ComponentId`, `DetectorId`) are stable handles assigned by
//! the caller when a component is built; indexes (`ComponentIndex`, ...) are
//! positions into the flattened, structure-of-arrays representation and are
//! only meaningful relative to one `FlatTree`.
use std::fmt;

macro_rules! nominal_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw handle value.
            pub fn new(raw: u64) -> Self {
                $name(raw)
            }

            /// The underlying raw handle.
            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                $name(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }
    };
}

nominal_id!(
    ComponentId,
    "Stable handle assigned to a component at construction time."
);
nominal_id!(
    DetectorId,
    "Stable handle assigned to a detector at construction time."
);

macro_rules! dense_index {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            /// Wraps a raw `usize` index.
            #[inline]
            pub fn new(raw: usize) -> Self {
                $name(raw)
            }

            /// The underlying raw index.
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(raw: usize) -> Self {
                $name(raw)
            }
        }

        impl From<$name> for usize {
            fn from(i: $name) -> usize {
                i.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }
    };
}

dense_index!(
    ComponentIndex,
    "Position into the flattened per-component SOA arrays. Tied to the `FlatTree` that produced it."
);
dense_index!(
    DetectorIndex,
    "Position into the detector-only overlay arrays owned by a `DetectorInfo` view."
);
dense_index!(
    PathIndex,
    "Position into the path-component overlay arrays owned by a `PathComponentInfo` view."
);
dense_index!(
    TimeIndex,
    "Position into a scan, local to one component's `timeIndexMap` row."
);
dense_index!(
    SpectrumIndex,
    "Position into the spectrum list owned by a `SpectrumInfo` view."
);
dense_index!(
    AssemblyIndex,
    "Position into the assembly (branch component) list owned by an `AssemblyInfo` view."
);

/// Helper trait that cleans up conversions between index newtypes and plain
/// `usize`s at call sites that juggle several kinds of index.
pub trait IndexesToVec {
    fn to_raw_indexes(&self) -> Vec<usize>;
}

impl IndexesToVec for [ComponentIndex] {
    fn to_raw_indexes(&self) -> Vec<usize> {
        self.iter().map(|i| i.index()).collect()
    }
}

impl IndexesToVec for [DetectorIndex] {
    fn to_raw_indexes(&self) -> Vec<usize> {
        self.iter().map(|i| i.index()).collect()
    }
}

/// Helper trait for building index newtype vectors back up from raw
/// `usize`s, e.g. when reading a deserialized SOA payload.
pub trait SliceToIndexes<T> {
    fn to_indexes(&self) -> Vec<T>;
}

impl SliceToIndexes<ComponentIndex> for [usize] {
    fn to_indexes(&self) -> Vec<ComponentIndex> {
        self.iter().map(|&i| ComponentIndex::new(i)).collect()
    }
}

impl SliceToIndexes<DetectorIndex> for [usize] {
    fn to_indexes(&self) -> Vec<DetectorIndex> {
        self.iter().map(|&i| DetectorIndex::new(i)).collect()
    }
}
