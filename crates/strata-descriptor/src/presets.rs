//! Named biomes, features and structures shipped with the builder.
//!
//! Each preset is a plain factory function; there is no type per biome.

use crate::biome::Biome;
use crate::error::Result;
use crate::extendible::Extendible;
use crate::feature::{Feature, Featureable};
use crate::generator::Generator;
use crate::locator::Locator;
use crate::pattern::Pattern;
use crate::range::Range;
use crate::rarity::Rarity;
use crate::sampler::{ArithmeticOperation, BuiltSampler, NoiseSampler, SamplerNode};
use crate::structure::{DirectionFacet, ShapePrimitive, Structure};
use crate::variant::{BiomeAxis, ClimateAxis, Variant};

/// Preprocessor every default generator runs before the biome pass.
pub const CARVING_PREPROCESSOR: &str = "carving";

fn seafloor(depth: f32) -> Result<BuiltSampler> {
    let mut sampler = NoiseSampler::new(SamplerNode::constant(0.0).with_param("depth", depth));
    sampler
        .attach(
            ArithmeticOperation::Subtract,
            SamplerNode::function("seafloor", "simplex(x, z) * amp - depth", ["amp", "depth"]),
        )
        .bind_global("amp", 4.0)
        .bind_global("depth", depth);
    sampler.build()
}

/// Abstract template every ocean biome derives from.
///
/// # Errors
///
/// Propagates sampler build errors.
pub fn ocean_template() -> Result<Biome> {
    let mut ocean = Biome::template("ocean");
    ocean.add_extendible(Extendible::new(
        "water_fill",
        "fill:\n  block: minecraft:water\n  below: ocean-level",
    ));
    ocean.set_terrain(&seafloor(16.0)?)?;
    ocean.add_variant(Variant::new(
        "ocean",
        Rarity::VeryCommon,
        BiomeAxis::Ocean,
        ClimateAxis::Temperate,
    ));
    Ok(ocean)
}

/// # Errors
///
/// Propagates sampler build errors.
pub fn deep_ocean() -> Result<Biome> {
    let mut deep = Biome::derive(&ocean_template()?, "deep_ocean");
    deep.set_terrain(&seafloor(32.0)?)?;
    deep.add_variant(Variant::new(
        "deep_ocean",
        Rarity::Common,
        BiomeAxis::DeepOcean,
        ClimateAxis::Temperate,
    ));
    Ok(deep)
}

/// # Errors
///
/// Propagates sampler build errors.
pub fn frozen_ocean() -> Result<Biome> {
    let mut frozen = Biome::derive(&ocean_template()?, "frozen_ocean");
    frozen.add_extendible(Extendible::new(
        "ice_cap",
        "surface:\n  block: minecraft:ice\n  at: ocean-level",
    ));
    frozen.add_variant(Variant::new(
        "frozen_ocean",
        Rarity::Rare,
        BiomeAxis::Ocean,
        ClimateAxis::Frozen,
    ));
    Ok(frozen)
}

/// Grey boulder used by surface deposit features.
///
/// # Errors
///
/// Never fails for the built-in palette; the signature follows the
/// palette builder.
pub fn boulder() -> Result<Structure> {
    Ok(Structure::new("boulder")
        .with_block(DirectionFacet::All, "minecraft:stone", 6)?
        .with_block(DirectionFacet::All, "minecraft:andesite", 3)?
        .with_block(DirectionFacet::Top, "minecraft:mossy_cobblestone", 1)?
        .with_shape(ShapePrimitive::Sphere { radius: 2.5 }))
}

/// Iron ore veins placed next to stone between y=0 and y=64.
///
/// # Errors
///
/// Propagates range, pattern or sampler errors.
pub fn iron_deposits() -> Result<Feature> {
    let mut feature = Feature::new("iron_deposits", Featureable::Ores);
    feature.set_locator(Locator::AdjacentPattern {
        pattern: Pattern::matching([("minecraft:stone", 0)])?,
        range: Range::new(0, 64)?,
        match_all: false,
    })?;
    feature.set_distributor(
        NoiseSampler::new(
            SamplerNode::function("white_noise", "hash(x, y, z) < chance", ["chance"])
                .with_param("chance", 0.02),
        )
        .build()?,
    )?;
    let vein = Structure::new("iron_vein")
        .with_block(DirectionFacet::All, "minecraft:iron_ore", 1)?
        .with_shape(ShapePrimitive::Sphere { radius: 1.5 });
    feature.add_structure(vein, 1)?;
    Ok(feature)
}

/// Boulders scattered on the surface.
///
/// # Errors
///
/// Propagates range or sampler errors.
pub fn surface_boulders() -> Result<Feature> {
    let mut feature = Feature::new("surface_boulders", Featureable::Deposits);
    feature.set_locator(Locator::Top {
        range: Range::new(40, 200)?,
    })?;
    feature.set_distributor(NoiseSampler::new(SamplerNode::constant(0.01)).build()?)?;
    feature.add_structure(boulder()?, 10)?;
    Ok(feature)
}

/// Moss-lined cave biome with its own carving palette.
///
/// # Errors
///
/// Propagates feature or sampler errors.
pub fn lush_caves() -> Result<Biome> {
    let mut caves = Biome::new("lush_caves");
    caves.add_extendible(Extendible::new(
        "cave_moss",
        "carving:\n  floor: minecraft:moss_block\n  ceiling: minecraft:glow_lichen",
    ));
    let mut terrain = NoiseSampler::new(
        SamplerNode::function("cavern", "worley(x, y, z) * scale", ["scale"])
            .with_param("scale", 0.75),
    );
    terrain.attach(ArithmeticOperation::Add, SamplerNode::constant_int(-40.0));
    caves.set_terrain(&terrain.build()?)?;
    caves.set_updates_carving_palette(true);
    caves.add_variant(Variant::new(
        "lush_caves",
        Rarity::Epic,
        BiomeAxis::Cave,
        ClimateAxis::Warm,
    ));
    caves.add_feature(iron_deposits()?);
    Ok(caves)
}

/// Rolling grassland carrying the boulder and iron features.
///
/// # Errors
///
/// Propagates feature or sampler errors.
pub fn plains() -> Result<Biome> {
    let mut plains = Biome::new("plains");
    let mut terrain = NoiseSampler::new(SamplerNode::constant(64.0));
    terrain
        .attach(
            ArithmeticOperation::Add,
            SamplerNode::function("hills", "simplex(x, z) * amp", ["amp"]),
        )
        .bind_global("amp", 8.0);
    plains.set_terrain(&terrain.build()?)?;
    plains.add_variant(Variant::new(
        "plains",
        Rarity::VeryCommon,
        BiomeAxis::Land,
        ClimateAxis::Temperate,
    ));
    plains.add_variant(Variant::new(
        "sunflower_plains",
        Rarity::Legendary,
        BiomeAxis::Land,
        ClimateAxis::Warm,
    ));
    plains.add_feature(iron_deposits()?);
    plains.add_feature(surface_boulders()?);
    Ok(plains)
}

/// A generator with every built-in concrete biome.
///
/// # Errors
///
/// Propagates preset construction errors.
pub fn default_generator(
    id: impl Into<String>,
    version: impl Into<String>,
    source: impl Into<String>,
    ocean_level: i32,
) -> Result<Generator> {
    let mut generator = Generator::new(id, version, source);
    generator.add_preprocessor(CARVING_PREPROCESSOR);
    generator.set_ocean_level(ocean_level);
    for biome in [plains()?, deep_ocean()?, frozen_ocean()?, lush_caves()?] {
        generator.add_biome(biome)?;
    }
    Ok(generator)
}
