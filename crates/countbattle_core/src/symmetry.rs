//! Board symmetries used to disguise a position before it is shown.
//!
//! A [`Symmetry`] combines the eight geometric symmetries of a rectangle
//! (two flips and a transpose) with an optional color swap. The same value
//! is applied to a board and to its dead-stone mask, which is what keeps the
//! two in registration.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Orientation and color transform applied to a position.
///
/// Flips are applied before the transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symmetry {
    /// Mirror left to right.
    pub flip_x: bool,
    /// Mirror top to bottom.
    pub flip_y: bool,
    /// Swap rows and columns.
    pub transpose: bool,
    /// Swap black and white stones. Ignored by dead-stone masks.
    pub invert: bool,
}

impl Symmetry {
    /// The transform that leaves everything in place.
    pub const IDENTITY: Symmetry = Symmetry {
        flip_x: false,
        flip_y: false,
        transpose: false,
        invert: false,
    };

    /// Creates a symmetry from its four flags.
    pub fn new(flip_x: bool, flip_y: bool, transpose: bool, invert: bool) -> Self {
        Self {
            flip_x,
            flip_y,
            transpose,
            invert,
        }
    }

    /// All sixteen combinations, identity first.
    pub fn all() -> impl Iterator<Item = Symmetry> {
        (0u8..16).map(|bits| Symmetry {
            flip_x: bits & 1 != 0,
            flip_y: bits & 2 != 0,
            transpose: bits & 4 != 0,
            invert: bits & 8 != 0,
        })
    }

    /// Draws each flag with probability one half.
    #[instrument(skip(rng))]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            flip_x: rng.random_bool(0.5),
            flip_y: rng.random_bool(0.5),
            transpose: rng.random_bool(0.5),
            invert: rng.random_bool(0.5),
        }
    }

    /// Returns the transform that undoes this one.
    ///
    /// Flips, transpose and color swap are each self-inverse. When the
    /// transpose is set, undoing it moves each flip onto the other axis.
    #[instrument]
    pub fn inverse(self) -> Self {
        if self.transpose {
            Self {
                flip_x: self.flip_y,
                flip_y: self.flip_x,
                ..self
            }
        } else {
            self
        }
    }

    /// The geometric part of the transform, with the color swap cleared.
    pub fn geometric(self) -> Self {
        Self {
            invert: false,
            ..self
        }
    }

    /// Size of the transformed grid for a `width` x `height` source.
    pub fn destination_size(&self, width: usize, height: usize) -> (usize, usize) {
        if self.transpose {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Source cell shown at destination `(x, y)`.
    ///
    /// `width` and `height` are the destination dimensions. The flips are
    /// resolved first, then the coordinates are swapped when transposing.
    pub fn source_of(&self, x: usize, y: usize, width: usize, height: usize) -> (usize, usize) {
        let a = if self.flip_x { width - 1 - x } else { x };
        let b = if self.flip_y { height - 1 - y } else { y };
        if self.transpose { (b, a) } else { (a, b) }
    }
}

impl std::fmt::Display for Symmetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (self.flip_x, "flip-x"),
            (self.flip_y, "flip-y"),
            (self.transpose, "transpose"),
            (self.invert, "invert"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();

        if names.is_empty() {
            write!(f, "identity")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn all_yields_sixteen_distinct_transforms() {
        let all: std::collections::HashSet<_> = Symmetry::all().collect();
        assert_eq!(all.len(), 16);
        assert_eq!(Symmetry::all().next(), Some(Symmetry::IDENTITY));
    }

    #[test]
    fn transpose_swaps_flip_axes_in_inverse() {
        let sym = Symmetry::new(true, false, true, true);
        assert_eq!(sym.inverse(), Symmetry::new(false, true, true, true));
        assert_eq!(sym.inverse().inverse(), sym);
    }

    #[test]
    fn source_of_flips_before_transposing() {
        // 3 wide, 2 tall source; transposed destination is 2 wide, 3 tall.
        let sym = Symmetry::new(true, false, true, false);
        let (w, h) = sym.destination_size(3, 2);
        assert_eq!((w, h), (2, 3));
        // Destination (0, 0): flip_x gives a = 1, b = 0, swap gives column 0, row 1.
        assert_eq!(sym.source_of(0, 0, w, h), (0, 1));
    }

    #[test]
    fn random_is_reproducible_with_seed() {
        let a = Symmetry::random(&mut StdRng::seed_from_u64(7));
        let b = Symmetry::random(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn display_names_active_flags() {
        assert_eq!(Symmetry::IDENTITY.to_string(), "identity");
        assert_eq!(
            Symmetry::new(true, false, true, false).to_string(),
            "flip-x+transpose"
        );
    }
}
