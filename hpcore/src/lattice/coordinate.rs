use std::fmt::{Display, Formatter};

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeTuple, Serializer};

/// An integer coordinate on a `D`-dimensional cubic lattice, with `D` 2 or 3.
///
/// Equality and hashing are structural. Two coordinates are adjacent when their ℓ₁ distance
/// is exactly one, meaning exactly one axis differs by exactly one step.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Coord<const D: usize>([i32; D]);

// `serde`'s derive macros only implement `Serialize`/`Deserialize` for arrays of
// macro-enumerated fixed lengths, not for an array whose length is a const generic
// parameter, so `Coord<D>` needs a manual implementation serializing the same
// transparent sequence-of-`D`-ints shape the derive would have produced.
impl<const D: usize> Serialize for Coord<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(D)?;
        for value in &self.0 {
            tuple.serialize_element(value)?;
        }
        tuple.end()
    }
}

impl<'de, const D: usize> Deserialize<'de> for Coord<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        struct CoordVisitor<const D: usize>;

        impl<'de, const D: usize> Visitor<'de> for CoordVisitor<D> {
            type Value = Coord<D>;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "a sequence of {D} integers")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = [0i32; D];
                for (index, value) in values.iter_mut().enumerate() {
                    *value = seq.next_element()?.ok_or_else(|| {
                        serde::de::Error::invalid_length(index, &self)
                    })?;
                }
                Ok(Coord(values))
            }
        }

        deserializer.deserialize_tuple(D, CoordVisitor)
    }
}

impl<const D: usize> Coord<D> {
    /// Create a coordinate from its axis values.
    pub const fn new(values: [i32; D]) -> Self {
        Self(values)
    }

    /// The axis values of this coordinate.
    pub const fn values(self) -> [i32; D] {
        self.0
    }

    /// The axis values as a slice, for dimension-erased consumers.
    pub const fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// The ℓ₁ (Manhattan) distance to another coordinate.
    pub fn l1_distance(self, other: Self) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.abs_diff(*b))
            .sum()
    }

    /// Check if the other coordinate is a lattice neighbour of this one.
    ///
    /// Symmetric and irreflexive: true exactly when the ℓ₁ distance is one.
    /// ```rust
    /// use hpcore::lattice::Coord;
    /// assert!(Coord::new([0, 0]).is_adjacent(Coord::new([0, 1])));
    /// assert!(!Coord::new([0, 0]).is_adjacent(Coord::new([1, 1])));
    /// ```
    pub fn is_adjacent(self, other: Self) -> bool {
        self.l1_distance(other) == 1
    }

    /// All 2·`D` neighbouring coordinates, bounds ignored, in the fixed enumeration order
    /// −x, +x, −y, +y (then −z, +z in three dimensions).
    pub fn neighbours(self) -> impl Iterator<Item = Self> {
        (0..D).flat_map(move |axis| {
            [-1, 1].into_iter().map(move |step| {
                let mut values = self.0;
                values[axis] += step;
                Self(values)
            })
        })
    }
}

impl<const D: usize> Display for Coord<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::Coord;

    #[test]
    fn adjacency_is_symmetric_and_irreflexive() {
        let a = Coord::new([2, 3]);
        let b = Coord::new([2, 4]);
        let c = Coord::new([3, 4]);
        assert!(a.is_adjacent(b));
        assert!(b.is_adjacent(a));
        assert!(!a.is_adjacent(a));
        assert!(!a.is_adjacent(c));
        assert_eq!(a.l1_distance(c), 2);
    }

    #[test]
    fn neighbours_follow_the_fixed_enumeration_order() {
        let order: Vec<_> = Coord::new([1, 1, 1]).neighbours().collect();
        assert_eq!(
            order,
            [
                Coord::new([0, 1, 1]),
                Coord::new([2, 1, 1]),
                Coord::new([1, 0, 1]),
                Coord::new([1, 2, 1]),
                Coord::new([1, 1, 0]),
                Coord::new([1, 1, 2]),
            ]
        );
    }

    #[test]
    fn diagonal_cells_are_not_adjacent() {
        assert!(!Coord::new([0, 0]).is_adjacent(Coord::new([1, 1])));
        assert!(!Coord::new([0, 0, 0]).is_adjacent(Coord::new([1, 1, 0])));
        assert!(Coord::new([0, 0, 0]).is_adjacent(Coord::new([0, 0, 1])));
    }
}
