//! Rarity tiers and the cumulative-weight walk shared by every weighted
//! choice in the descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named weight tier. Weights are fixed and never configurable per use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    VeryCommon,
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
    GodTier,
}

impl Rarity {
    /// Every tier, most common first.
    pub const ALL: [Rarity; 7] = [
        Rarity::VeryCommon,
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
        Rarity::GodTier,
    ];

    /// Selection weight of this tier. Always positive.
    pub const fn weight(self) -> u32 {
        match self {
            Rarity::VeryCommon => 20,
            Rarity::Common => 15,
            Rarity::Rare => 10,
            Rarity::Epic => 7,
            Rarity::Legendary => 5,
            Rarity::Mythic => 3,
            Rarity::GodTier => 2,
        }
    }

    /// Descriptor token, e.g. `VERY_COMMON`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Rarity::VeryCommon => "VERY_COMMON",
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
            Rarity::Mythic => "MYTHIC",
            Rarity::GodTier => "GOD_TIER",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks one element with probability `weight(e) / Σ weight`.
///
/// `roll` is expected in `[0, 1)`; values outside are clamped and NaN counts
/// as 0. Elements are walked in slice order, so among equal weights the
/// earlier one owns the lower part of the interval. Zero-weight elements are
/// never chosen. Returns `None` for an empty slice or when every weight is 0.
pub fn weighted_pick<T, F>(items: &[T], weight: F, roll: f64) -> Option<&T>
where
    F: Fn(&T) -> u32,
{
    let total: u64 = items.iter().map(|i| u64::from(weight(i))).sum();
    if total == 0 {
        return None;
    }

    let roll = if roll.is_nan() {
        0.0
    } else {
        roll.clamp(0.0, 1.0 - f64::EPSILON)
    };
    // Integer target keeps the walk exact for any total.
    let target = ((roll * total as f64) as u64).min(total - 1);

    let mut accumulated = 0u64;
    for item in items {
        accumulated += u64::from(weight(item));
        if target < accumulated {
            return Some(item);
        }
    }
    items.last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_strictly_decrease() {
        for pair in Rarity::ALL.windows(2) {
            assert!(pair[0].weight() > pair[1].weight());
        }
        assert_eq!(Rarity::VeryCommon.weight(), 20);
        assert_eq!(Rarity::GodTier.weight(), 2);
    }

    #[test]
    fn test_tokens() {
        assert_eq!(Rarity::GodTier.to_string(), "GOD_TIER");
        assert_eq!(Rarity::VeryCommon.as_str(), "VERY_COMMON");
    }

    #[test]
    fn test_pick_boundaries() {
        let items = [("a", 1u32), ("b", 3)];
        let w = |i: &(&str, u32)| i.1;
        assert_eq!(weighted_pick(&items, w, 0.0).unwrap().0, "a");
        assert_eq!(weighted_pick(&items, w, 0.24).unwrap().0, "a");
        assert_eq!(weighted_pick(&items, w, 0.25).unwrap().0, "b");
        assert_eq!(weighted_pick(&items, w, 0.999).unwrap().0, "b");
    }

    #[test]
    fn test_pick_clamps_out_of_range_rolls() {
        let items = [("a", 1u32), ("b", 1)];
        let w = |i: &(&str, u32)| i.1;
        assert_eq!(weighted_pick(&items, w, -4.0).unwrap().0, "a");
        assert_eq!(weighted_pick(&items, w, 1.0).unwrap().0, "b");
        assert_eq!(weighted_pick(&items, w, f64::NAN).unwrap().0, "a");
    }

    #[test]
    fn test_pick_skips_zero_weights_and_empty() {
        let items = [("zero", 0u32), ("one", 1)];
        assert_eq!(weighted_pick(&items, |i| i.1, 0.0).unwrap().0, "one");
        let empty: [(&str, u32); 0] = [];
        assert!(weighted_pick(&empty, |i| i.1, 0.5).is_none());
        assert!(weighted_pick(&[("z", 0u32)], |i| i.1, 0.5).is_none());
    }

    #[test]
    fn test_rarity_serde_tokens() {
        let r: Rarity = ron::from_str("GOD_TIER").unwrap();
        assert_eq!(r, Rarity::GodTier);
    }
}
