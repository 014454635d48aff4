//! RON manifests describing a whole generator.
//!
//! A manifest is plain data. [`GeneratorManifest::into_generator`] replays it
//! through the same validating builders used from code, so a manifest can
//! never produce a generator the builder API would have rejected.
//!
//! ```ron
//! (
//!     id: "overworld",
//!     version: "1.0.0",
//!     source: "strata",
//!     preprocessors: ["carving"],
//!     biomes: [
//!         (
//!             id: "plains",
//!             terrain: Some((root: Constant(64.0))),
//!         ),
//!     ],
//! )
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::biome::Biome;
use crate::error::DescriptorError;
use crate::extendible::Extendible;
use crate::feature::{Feature, Featureable};
use crate::generator::{DEFAULT_OCEAN_LEVEL, Generator};
use crate::locator::Locator;
use crate::pattern::{Pattern, PatternType};
use crate::range::Range;
use crate::sampler::{ArithmeticOperation, BuiltSampler, NoiseSampler, SamplerNode};
use crate::structure::{DirectionFacet, ShapePrimitive, Structure};
use crate::variant::Variant;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned while loading or converting a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("ron parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("biome `{biome}` derives from unknown template `{template}`")]
    UnknownTemplate { biome: String, template: String },

    /// The id is listed twice, or is already inherited from the template.
    #[error("biome `{biome}` already has {kind} `{id}`")]
    DuplicateEntry {
        biome: String,
        kind: &'static str,
        id: String,
    },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

// ---------------------------------------------------------------------------
// Manifest types
// ---------------------------------------------------------------------------

/// One sampler tree node.
#[derive(Clone, Debug, Deserialize)]
pub enum SamplerNodeManifest {
    Constant(f32),
    /// Truncated toward zero like [`SamplerNode::constant_int`].
    ConstantInt(f32),
    Function {
        name: String,
        expression: String,
        #[serde(default)]
        arguments: Vec<String>,
        #[serde(default)]
        params: BTreeMap<String, f32>,
    },
    Arithmetic {
        operator: ArithmeticOperation,
        left: Box<SamplerNodeManifest>,
        right: Box<SamplerNodeManifest>,
    },
}

impl SamplerNodeManifest {
    fn into_node(self) -> SamplerNode {
        match self {
            SamplerNodeManifest::Constant(v) => SamplerNode::constant(v),
            SamplerNodeManifest::ConstantInt(v) => SamplerNode::constant_int(v),
            SamplerNodeManifest::Function {
                name,
                expression,
                arguments,
                params,
            } => params.into_iter().fold(
                SamplerNode::function(name, expression, arguments),
                |node, (key, value)| node.with_param(key, value),
            ),
            SamplerNodeManifest::Arithmetic {
                operator,
                left,
                right,
            } => SamplerNode::combine(operator, left.into_node(), right.into_node()),
        }
    }
}

/// A full sampler: the tree plus globals bound once the tree is complete.
#[derive(Clone, Debug, Deserialize)]
pub struct SamplerManifest {
    pub root: SamplerNodeManifest,
    #[serde(default)]
    pub globals: BTreeMap<String, f32>,
}

impl SamplerManifest {
    fn build(self) -> Result<BuiltSampler, DescriptorError> {
        let mut sampler = NoiseSampler::new(self.root.into_node());
        for (name, value) in &self.globals {
            sampler.bind_global(name, *value);
        }
        sampler.build()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PatternManifest {
    pub kind: PatternType,
    pub block_type: PatternType,
    #[serde(default)]
    pub blocks: Vec<(String, i32)>,
}

#[derive(Clone, Debug, Deserialize)]
pub enum LocatorManifest {
    Random {
        x_range: Range,
        z_range: Range,
        seed: u64,
    },
    Top {
        range: Range,
    },
    AdjacentPattern {
        pattern: PatternManifest,
        range: Range,
        #[serde(default)]
        match_all: bool,
    },
}

impl LocatorManifest {
    fn build(self) -> Result<Locator, DescriptorError> {
        Ok(match self {
            LocatorManifest::Random {
                x_range,
                z_range,
                seed,
            } => Locator::Random {
                x_range,
                z_range,
                seed,
            },
            LocatorManifest::Top { range } => Locator::Top { range },
            LocatorManifest::AdjacentPattern {
                pattern,
                range,
                match_all,
            } => Locator::AdjacentPattern {
                pattern: Pattern::new(pattern.kind, pattern.block_type, pattern.blocks)?,
                range,
                match_all,
            },
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct StructureManifest {
    pub id: String,
    #[serde(default)]
    pub palette: BTreeMap<DirectionFacet, Vec<(String, u32)>>,
    #[serde(default)]
    pub shapes: Vec<ShapePrimitive>,
}

impl StructureManifest {
    fn build(self) -> Result<Structure, DescriptorError> {
        let mut structure = Structure::new(self.id);
        for (facet, entries) in self.palette {
            for (block, weight) in entries {
                structure = structure.with_block(facet, block, weight)?;
            }
        }
        Ok(self
            .shapes
            .into_iter()
            .fold(structure, Structure::with_shape))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WeightedStructureManifest {
    pub weight: u32,
    pub structure: StructureManifest,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeatureManifest {
    pub id: String,
    pub category: Featureable,
    #[serde(default)]
    pub locator: Option<LocatorManifest>,
    #[serde(default)]
    pub distributor: Option<SamplerManifest>,
    #[serde(default)]
    pub structures_distributor: Option<SamplerManifest>,
    #[serde(default)]
    pub structures: Vec<WeightedStructureManifest>,
}

impl FeatureManifest {
    fn build(self) -> Result<Feature, DescriptorError> {
        let mut feature = Feature::new(self.id, self.category);
        if let Some(locator) = self.locator {
            feature.set_locator(locator.build()?)?;
        }
        if let Some(distributor) = self.distributor {
            feature.set_distributor(distributor.build()?)?;
        }
        if let Some(distributor) = self.structures_distributor {
            feature.set_structures_distributor(distributor.build()?)?;
        }
        for entry in self.structures {
            feature.add_structure(entry.structure.build()?, entry.weight)?;
        }
        Ok(feature)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct BiomeManifest {
    pub id: String,
    /// Template id from [`GeneratorManifest::templates`] to start from.
    #[serde(default)]
    pub derive_from: Option<String>,
    #[serde(default)]
    pub extendibles: Vec<Extendible>,
    #[serde(default)]
    pub terrain: Option<SamplerManifest>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub carving_palette: bool,
    #[serde(default)]
    pub features: Vec<FeatureManifest>,
}

impl BiomeManifest {
    /// Applies this manifest's contents on top of `biome`.
    fn apply(self, mut biome: Biome) -> Result<Biome, ManifestError> {
        let duplicate = |biome: &Biome, kind: &'static str, id: String| {
            ManifestError::DuplicateEntry {
                biome: biome.id().to_string(),
                kind,
                id,
            }
        };
        for extendible in self.extendibles {
            let id = extendible.id.clone();
            if !biome.add_extendible(extendible) {
                return Err(duplicate(&biome, "extendible", id));
            }
        }
        if let Some(terrain) = self.terrain {
            biome.set_terrain(&terrain.build()?)?;
        }
        for variant in self.variants {
            let name = variant.name.clone();
            if !biome.add_variant(variant) {
                return Err(duplicate(&biome, "variant", name));
            }
        }
        if self.carving_palette {
            biome.set_updates_carving_palette(true);
        }
        for feature in self.features {
            biome.add_feature(feature.build()?);
        }
        Ok(biome)
    }
}

fn default_ocean_level() -> i32 {
    DEFAULT_OCEAN_LEVEL
}

/// Top-level manifest.
#[derive(Clone, Debug, Deserialize)]
pub struct GeneratorManifest {
    pub id: String,
    pub version: String,
    pub source: String,
    #[serde(default = "default_ocean_level")]
    pub ocean_level: i32,
    #[serde(default)]
    pub preprocessors: Vec<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Abstract biomes that concrete biomes may derive from.
    #[serde(default)]
    pub templates: Vec<BiomeManifest>,
    #[serde(default)]
    pub biomes: Vec<BiomeManifest>,
}

impl GeneratorManifest {
    /// Parses a manifest from RON text.
    ///
    /// # Errors
    ///
    /// [`ManifestError::Ron`] on malformed input, including inverted ranges.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ManifestError> {
        Ok(ron::from_str(ron_str)?)
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// [`ManifestError::Io`] or [`ManifestError::Ron`].
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)?;
        let manifest = Self::from_ron_str(&contents)?;
        info!(path = %path.display(), generator = %manifest.id, "manifest loaded");
        Ok(manifest)
    }

    /// Builds the generator through the validating builder API.
    ///
    /// # Errors
    ///
    /// The first builder error, or [`ManifestError::UnknownTemplate`].
    pub fn into_generator(self) -> Result<Generator, ManifestError> {
        let mut templates: BTreeMap<String, Biome> = BTreeMap::new();
        for template in self.templates {
            let id = template.id.clone();
            let biome = template.apply(Biome::template(id.clone()))?;
            templates.insert(id, biome);
        }

        let mut generator = Generator::new(self.id, self.version, self.source);
        generator.set_ocean_level(self.ocean_level);
        for name in self.preprocessors {
            generator.add_preprocessor(name);
        }
        for (key, value) in self.meta {
            generator.set_meta(key, value);
        }

        for manifest in self.biomes {
            let base = match &manifest.derive_from {
                Some(template) => {
                    let parent = templates.get(template).ok_or_else(|| {
                        ManifestError::UnknownTemplate {
                            biome: manifest.id.clone(),
                            template: template.clone(),
                        }
                    })?;
                    Biome::derive(parent, manifest.id.clone())
                }
                None => Biome::new(manifest.id.clone()),
            };
            let biome = manifest.apply(base)?;
            debug!(biome = %biome.id(), "manifest biome built");
            generator.add_biome(biome)?;
        }
        Ok(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rarity::Rarity;

    const MANIFEST: &str = r#"
(
    id: "overworld",
    version: "1.0.0",
    source: "manifest",
    ocean_level: 48,
    preprocessors: ["carving", "carving"],
    meta: { "seed-salt": "7x" },
    templates: [
        (
            id: "ocean",
            extendibles: [(id: "water_fill", terrain_data: "fill: water")],
            terrain: Some((root: Constant(30.0))),
        ),
    ],
    biomes: [
        (
            id: "plains",
            terrain: Some((
                root: Arithmetic(
                    operator: Add,
                    left: Constant(64.0),
                    right: Function(name: "hills", expression: "simplex(x, z) * amp", arguments: ["amp"]),
                ),
                globals: { "amp": 8.0 },
            )),
            variants: [(name: "plains", rarity: VERY_COMMON, biome: LAND, climate: TEMPERATE)],
            features: [
                (
                    id: "boulders",
                    category: deposits,
                    locator: Some(Top(range: (min: 2, max: 5))),
                    distributor: Some((root: Constant(0.5))),
                    structures: [
                        (
                            weight: 10,
                            structure: (
                                id: "boulder",
                                palette: { all: [("minecraft:stone", 1)] },
                                shapes: [sphere(radius: 2.0)],
                            ),
                        ),
                    ],
                ),
            ],
        ),
        (id: "deep_ocean", derive_from: Some("ocean")),
    ],
)
"#;

    #[test]
    fn test_manifest_builds_generator() {
        let generator = GeneratorManifest::from_ron_str(MANIFEST)
            .unwrap()
            .into_generator()
            .unwrap();
        assert_eq!(generator.id(), "overworld");
        assert_eq!(generator.meta().ocean_level, 48);
        assert_eq!(generator.preprocessors().len(), 1);

        let plains = generator.biome("plains").unwrap();
        assert_eq!(plains.variants()[0].rarity, Rarity::VeryCommon);
        assert_eq!(plains.features()[0].structures()[0].1, 10);

        let deep = generator.biome("deep_ocean").unwrap();
        assert!(!deep.is_abstract());
        assert_eq!(deep.extendibles()[0].id, "water_fill");

        let text = generator.serialize().unwrap();
        assert!(text.contains("  seed-salt: 7x\n"));
        assert!(text.contains("      amp: 8.0\n"));
    }

    #[test]
    fn test_inverted_range_rejected_at_parse() {
        let bad = MANIFEST.replace("(min: 2, max: 5)", "(min: 5, max: 2)");
        assert!(matches!(
            GeneratorManifest::from_ron_str(&bad),
            Err(ManifestError::Ron(_))
        ));
    }

    #[test]
    fn test_unknown_template() {
        let bad = MANIFEST.replace("derive_from: Some(\"ocean\")", "derive_from: Some(\"lava\")");
        let err = GeneratorManifest::from_ron_str(&bad)
            .unwrap()
            .into_generator()
            .unwrap_err();
        assert!(matches!(
            err,
            ManifestError::UnknownTemplate { template, .. } if template == "lava"
        ));
    }

    #[test]
    fn test_builder_errors_surface() {
        let bad = MANIFEST.replace(r#"globals: { "amp": 8.0 },"#, "");
        let err = GeneratorManifest::from_ron_str(&bad)
            .unwrap()
            .into_generator()
            .unwrap_err();
        assert!(matches!(
            err,
            ManifestError::Descriptor(DescriptorError::InvalidSamplerConfiguration { .. })
        ));
    }

    #[test]
    fn test_duplicate_biome_in_manifest() {
        let bad = MANIFEST.replace(r#"(id: "deep_ocean""#, r#"(id: "plains""#);
        let err = GeneratorManifest::from_ron_str(&bad)
            .unwrap()
            .into_generator()
            .unwrap_err();
        assert!(matches!(
            err,
            ManifestError::Descriptor(DescriptorError::DuplicateBiomeIdError(id)) if id == "plains"
        ));
    }

    #[test]
    fn test_duplicate_extendible_rejected() {
        let bad = MANIFEST.replace(
            r#"(id: "deep_ocean", derive_from: Some("ocean"))"#,
            r#"(
            id: "deep_ocean",
            derive_from: Some("ocean"),
            extendibles: [(id: "water_fill", terrain_data: "fill: lava")],
        )"#,
        );
        let err = GeneratorManifest::from_ron_str(&bad)
            .unwrap()
            .into_generator()
            .unwrap_err();
        assert!(matches!(
            err,
            ManifestError::DuplicateEntry { biome, kind: "extendible", id }
                if biome == "deep_ocean" && id == "water_fill"
        ));
    }

    #[test]
    fn test_duplicate_variant_rejected() {
        let variant = r#"(name: "plains", rarity: VERY_COMMON, biome: LAND, climate: TEMPERATE)"#;
        let bad = MANIFEST.replace(variant, &format!("{variant}, {variant}"));
        let err = GeneratorManifest::from_ron_str(&bad)
            .unwrap()
            .into_generator()
            .unwrap_err();
        assert!(matches!(
            err,
            ManifestError::DuplicateEntry { kind: "variant", .. }
        ));
    }
}
