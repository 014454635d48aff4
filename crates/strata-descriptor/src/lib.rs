//! World-generation descriptor builder: biomes, samplers, features and
//! structures assembled through validating builders and serialized to the
//! text descriptor the generation engine consumes.

mod biome;
mod error;
mod extendible;
mod feature;
mod generator;
mod locator;
mod pattern;
mod range;
mod rarity;
mod registry;
mod structure;
mod variant;

pub mod emit;
pub mod manifest;
pub mod presets;
pub mod progress;
pub mod sampler;

pub use biome::Biome;
pub use emit::{Emit, EmitOptions, Emitter};
pub use error::{DescriptorError, Result};
pub use extendible::Extendible;
pub use feature::{Feature, Featureable};
pub use generator::{DEFAULT_OCEAN_LEVEL, Generator, GeneratorMeta};
pub use locator::Locator;
pub use manifest::{GeneratorManifest, ManifestError};
pub use pattern::{Pattern, PatternType};
pub use progress::{ProgressListener, TracingProgress};
pub use range::Range;
pub use rarity::{Rarity, weighted_pick};
pub use registry::GeneratorRegistry;
pub use sampler::{
    ArithmeticOperation, BuiltSampler, NoiseSampler, SamplerKind, SamplerNode, SamplerValue,
};
pub use structure::{DirectionFacet, ShapePrimitive, Structure};
pub use variant::{BiomeAxis, ClimateAxis, Variant, pick_variant, select_weighted};
