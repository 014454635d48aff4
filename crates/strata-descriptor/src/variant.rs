//! Rarity-weighted alternatives of a biome along its biome and climate axes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::emit::{Emit, Emitter};
use crate::error::Result;
use crate::rarity::{Rarity, weighted_pick};

/// Terrain family a variant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiomeAxis {
    Land,
    Coast,
    Ocean,
    DeepOcean,
    River,
    Mountain,
    Cave,
}

impl BiomeAxis {
    /// Descriptor token.
    pub const fn as_str(self) -> &'static str {
        match self {
            BiomeAxis::Land => "LAND",
            BiomeAxis::Coast => "COAST",
            BiomeAxis::Ocean => "OCEAN",
            BiomeAxis::DeepOcean => "DEEP_OCEAN",
            BiomeAxis::River => "RIVER",
            BiomeAxis::Mountain => "MOUNTAIN",
            BiomeAxis::Cave => "CAVE",
        }
    }
}

/// Temperature band a variant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClimateAxis {
    Frozen,
    Cold,
    Temperate,
    Warm,
    Hot,
}

impl ClimateAxis {
    /// Descriptor token.
    pub const fn as_str(self) -> &'static str {
        match self {
            ClimateAxis::Frozen => "FROZEN",
            ClimateAxis::Cold => "COLD",
            ClimateAxis::Temperate => "TEMPERATE",
            ClimateAxis::Warm => "WARM",
            ClimateAxis::Hot => "HOT",
        }
    }
}

/// A named alternative with a shared, immutable rarity tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant name, unique within its owner by convention.
    pub name: String,
    /// Tier deciding how often this variant is chosen.
    pub rarity: Rarity,
    /// Terrain family.
    pub biome: BiomeAxis,
    /// Temperature band.
    pub climate: ClimateAxis,
}

impl Variant {
    pub fn new(
        name: impl Into<String>,
        rarity: Rarity,
        biome: BiomeAxis,
        climate: ClimateAxis,
    ) -> Self {
        Self {
            name: name.into(),
            rarity,
            biome,
            climate,
        }
    }

    /// Selection weight, taken from the rarity tier.
    pub fn weight(&self) -> u32 {
        self.rarity.weight()
    }
}

impl Emit for Variant {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        out.scalar("name", &self.name);
        out.scalar("rarity", self.rarity.as_str());
        out.scalar("weight", self.weight());
        out.scalar("biome", self.biome.as_str());
        out.scalar("climate", self.climate.as_str());
        Ok(())
    }
}

/// Chooses one variant with probability proportional to its rarity weight.
///
/// Equal weights resolve in declaration order. `None` only for an empty set.
pub fn select_weighted(variants: &[Variant], roll: f64) -> Option<&Variant> {
    weighted_pick(variants, Variant::weight, roll)
}

/// [`select_weighted`] with the roll drawn from `rng`.
pub fn pick_variant<'a, R: Rng + ?Sized>(
    variants: &'a [Variant],
    rng: &mut R,
) -> Option<&'a Variant> {
    select_weighted(variants, rng.random::<f64>())
}
