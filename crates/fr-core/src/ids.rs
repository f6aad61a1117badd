//! Strongly typed graph identifiers.
//!
//! Both IDs are dense `u32` indices into the graph's structure-of-arrays
//! storage.  The inner integer is `pub` for direct indexing, but callers
//! should prefer `.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel for "no such element".
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road-graph node.  Assigned in the order coordinates are
    /// first seen, which is also the nearest-node tie-break order.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of an undirected road-graph edge.
    pub struct EdgeId(u32);
}
