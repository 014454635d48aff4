//! Biomes: extendibles, a terrain sampler, variants and features under one id.
//!
//! There is a single `Biome` type. Named biomes are produced by factory
//! functions (see [`crate::presets`]) and templates are ordinary biomes with
//! the abstract flag set, composed into concrete ones via [`Biome::derive`].

use tracing::debug;

use crate::emit::{Emit, Emitter};
use crate::error::{DescriptorError, Result};
use crate::extendible::Extendible;
use crate::feature::{Feature, Featureable};
use crate::sampler::BuiltSampler;
use crate::variant::{Variant, select_weighted};

#[derive(Clone, Debug, PartialEq)]
pub struct Biome {
    id: String,
    is_abstract: bool,
    extendibles: Vec<Extendible>,
    /// Pre-serialized sampler fragment.
    terrain: Option<String>,
    variants: Vec<Variant>,
    updates_carving_palette: bool,
    features: Vec<Feature>,
}

impl Biome {
    /// A concrete biome that can be added to a generator.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_abstract: false,
            extendibles: Vec::new(),
            terrain: None,
            variants: Vec::new(),
            updates_carving_palette: false,
            features: Vec::new(),
        }
    }

    /// An abstract template. Generators reject it; derive from it instead.
    pub fn template(id: impl Into<String>) -> Self {
        Self {
            is_abstract: true,
            ..Self::new(id)
        }
    }

    /// A concrete biome starting from everything `template` carries.
    pub fn derive(template: &Biome, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_abstract: false,
            ..template.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Attaches a terrain trait. Returns `false` (and changes nothing) if an
    /// extendible with the same id is already attached.
    pub fn add_extendible(&mut self, extendible: Extendible) -> bool {
        if self.extendibles.iter().any(|e| e.id == extendible.id) {
            debug!(biome = %self.id, extendible = %extendible.id, "extendible already attached");
            return false;
        }
        self.extendibles.push(extendible);
        true
    }

    pub fn extendibles(&self) -> &[Extendible] {
        &self.extendibles
    }

    /// Terrain data of every attached extendible, in attach order.
    pub fn composed_terrain_data(&self) -> String {
        self.extendibles
            .iter()
            .map(|e| e.terrain_data.trim_end())
            .filter(|d| !d.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Stores the serialized fragment of a built sampler as the terrain.
    ///
    /// # Errors
    ///
    /// Propagates serialization errors from the sampler.
    pub fn set_terrain(&mut self, sampler: &BuiltSampler) -> Result<()> {
        self.terrain = Some(sampler.to_fragment()?);
        Ok(())
    }

    /// Stores an already-serialized terrain fragment as-is.
    pub fn set_terrain_fragment(&mut self, fragment: impl Into<String>) {
        self.terrain = Some(fragment.into());
    }

    pub fn terrain(&self) -> Option<&str> {
        self.terrain.as_deref()
    }

    /// Adds a variant. Returns `false` if one with the same name exists.
    pub fn add_variant(&mut self, variant: Variant) -> bool {
        if self.variants.iter().any(|v| v.name == variant.name) {
            return false;
        }
        self.variants.push(variant);
        true
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Weighted pick among this biome's variants.
    pub fn select_variant(&self, roll: f64) -> Option<&Variant> {
        select_weighted(&self.variants, roll)
    }

    pub fn set_updates_carving_palette(&mut self, updates: bool) {
        self.updates_carving_palette = updates;
    }

    pub fn updates_carving_palette(&self) -> bool {
        self.updates_carving_palette
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl Emit for Biome {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        if self.is_abstract {
            out.scalar("abstract", true);
        }
        out.list("extendibles", &self.extendibles, |e, ext| e.node(ext))?;

        match (&self.terrain, self.is_abstract) {
            (Some(terrain), _) => out.fragment("terrain", terrain),
            (None, true) => {}
            (None, false) => {
                return Err(DescriptorError::MissingConfiguration {
                    owner: format!("biome `{}`", self.id),
                    field: "terrain",
                });
            }
        }

        out.scalar("carving-palette", self.updates_carving_palette);
        out.list("variants", &self.variants, |e, v| e.node(v))?;
        out.map("features", |stages| {
            for stage in Featureable::ALL {
                let in_stage: Vec<&Feature> =
                    self.features.iter().filter(|f| f.category() == stage).collect();
                if in_stage.is_empty() {
                    continue;
                }
                stages.list(stage.key(), in_stage, |e, f| e.node(f))?;
            }
            Ok(())
        })
    }
}
