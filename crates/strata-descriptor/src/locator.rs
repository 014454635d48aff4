//! Placement strategies deciding where a feature may be placed.
//!
//! Locators only describe the strategy. The engine does the actual
//! searching and sampling, so nothing here consumes randomness.

use crate::emit::{Emit, Emitter};
use crate::error::Result;
use crate::pattern::Pattern;
use crate::range::Range;

/// Where a feature looks for placement candidates.
#[derive(Clone, Debug, PartialEq)]
pub enum Locator {
    /// Uniform pick inside the horizontal bounds, reproducible from `seed`.
    Random {
        x_range: Range,
        z_range: Range,
        seed: u64,
    },
    /// Topmost eligible cell of the column within the vertical range.
    Top { range: Range },
    /// Cells within `range` whose neighbourhood satisfies `pattern`; with
    /// `match_all` every block in range must match, otherwise any one.
    AdjacentPattern {
        pattern: Pattern,
        range: Range,
        match_all: bool,
    },
}

impl Locator {
    /// Descriptor token for the strategy.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Locator::Random { .. } => "RANDOM",
            Locator::Top { .. } => "TOP",
            Locator::AdjacentPattern { .. } => "ADJACENT_PATTERN",
        }
    }
}

impl Emit for Locator {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        out.scalar("type", self.type_name());
        match self {
            Locator::Random {
                x_range,
                z_range,
                seed,
            } => {
                out.map("x-range", |e| e.node(x_range))?;
                out.map("z-range", |e| e.node(z_range))?;
                out.scalar("seed", *seed);
            }
            Locator::Top { range } => {
                out.map("range", |e| e.node(range))?;
            }
            Locator::AdjacentPattern {
                pattern,
                range,
                match_all,
            } => {
                out.map("range", |e| e.node(range))?;
                out.scalar("match-all", *match_all);
                out.map("pattern", |e| e.node(pattern))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_locator() {
        let top = Locator::Top {
            range: Range::new(2, 5).unwrap(),
        };
        assert_eq!(
            top.to_fragment().unwrap(),
            "type: TOP\nrange:\n  min: 2\n  max: 5\n"
        );
    }

    #[test]
    fn test_random_locator_only_describes_bounds_and_seed() {
        let random = Locator::Random {
            x_range: Range::new(0, 15).unwrap(),
            z_range: Range::new(-8, 8).unwrap(),
            seed: 1337,
        };
        let expected = "\
type: RANDOM
x-range:
  min: 0
  max: 15
z-range:
  min: -8
  max: 8
seed: 1337
";
        assert_eq!(random.to_fragment().unwrap(), expected);
        // Emitting twice gives identical text: nothing is sampled.
        assert_eq!(random.to_fragment().unwrap(), expected);
    }

    #[test]
    fn test_random_locator_keeps_full_u64_seed() {
        let random = Locator::Random {
            x_range: Range::new(0, 0).unwrap(),
            z_range: Range::new(0, 0).unwrap(),
            seed: u64::MAX,
        };
        assert!(
            random
                .to_fragment()
                .unwrap()
                .ends_with("seed: 18446744073709551615\n")
        );
    }

    #[test]
    fn test_adjacent_pattern_locator() {
        let locator = Locator::AdjacentPattern {
            pattern: Pattern::matching([("minecraft:water", -1)]).unwrap(),
            range: Range::new(40, 64).unwrap(),
            match_all: false,
        };
        let expected = "\
type: ADJACENT_PATTERN
range:
  min: 40
  max: 64
match-all: false
pattern:
  type: MATCH
  patterns:
    - type: MATCH
      block: minecraft:water
      offset: -1
";
        assert_eq!(locator.to_fragment().unwrap(), expected);
    }
}
