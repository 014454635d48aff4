//! Generator: the top-level aggregate and the single entry point that turns
//! a whole biome set into descriptor text.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use tracing::{debug, info};

use crate::biome::Biome;
use crate::emit::{Emit, EmitOptions, Emitter};
use crate::error::{DescriptorError, Result};

/// Sea level used when nothing else is configured.
pub const DEFAULT_OCEAN_LEVEL: i32 = 62;

/// World-wide settings emitted under `meta:`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorMeta {
    /// Height of the water surface.
    pub ocean_level: i32,
    /// Free-form extra keys, emitted sorted by key after `ocean-level`.
    pub extra: BTreeMap<String, String>,
}

impl Default for GeneratorMeta {
    fn default() -> Self {
        Self {
            ocean_level: DEFAULT_OCEAN_LEVEL,
            extra: BTreeMap::new(),
        }
    }
}

/// Ordered, id-unique set of concrete biomes plus the generator header.
#[derive(Clone, Debug)]
pub struct Generator {
    id: String,
    version: String,
    source: String,
    /// Insertion order is emission order.
    biomes: Vec<Biome>,
    /// Biome id -> index into `biomes`.
    index: HashMap<String, usize>,
    preprocessors: Vec<String>,
    meta: GeneratorMeta,
}

impl Generator {
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            source: source.into(),
            biomes: Vec::new(),
            index: HashMap::new(),
            preprocessors: Vec::new(),
            meta: GeneratorMeta::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Adds a concrete biome. A rejected biome is dropped and the generator
    /// is left as it was.
    ///
    /// # Errors
    ///
    /// - [`DescriptorError::AbstractBiomeError`] for template biomes.
    /// - [`DescriptorError::DuplicateBiomeIdError`] if the id is taken, even
    ///   when both biomes are otherwise identical.
    pub fn add_biome(&mut self, biome: Biome) -> Result<()> {
        if biome.is_abstract() {
            return Err(DescriptorError::AbstractBiomeError(biome.id().to_string()));
        }
        if self.index.contains_key(biome.id()) {
            return Err(DescriptorError::DuplicateBiomeIdError(biome.id().to_string()));
        }
        debug!(generator = %self.id, biome = %biome.id(), "biome added");
        self.index.insert(biome.id().to_string(), self.biomes.len());
        self.biomes.push(biome);
        Ok(())
    }

    pub fn biome(&self, id: &str) -> Option<&Biome> {
        self.index.get(id).map(|&i| &self.biomes[i])
    }

    /// Biomes in insertion order.
    pub fn biomes(&self) -> &[Biome] {
        &self.biomes
    }

    /// Adds a global preprocessor. Returns `false` if it was already present.
    pub fn add_preprocessor(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.preprocessors.contains(&name) {
            return false;
        }
        self.preprocessors.push(name);
        true
    }

    pub fn preprocessors(&self) -> &[String] {
        &self.preprocessors
    }

    pub fn meta(&self) -> &GeneratorMeta {
        &self.meta
    }

    pub fn set_ocean_level(&mut self, level: i32) {
        self.meta.ocean_level = level;
    }

    /// Sets a free-form meta key (`ocean-level` itself is not overridable).
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.extra.insert(key.into(), value.into());
    }

    /// The full descriptor text with default options.
    ///
    /// # Errors
    ///
    /// The first configuration error found while walking the tree, e.g.
    /// [`DescriptorError::MissingConfiguration`].
    pub fn serialize(&self) -> Result<String> {
        self.serialize_with(EmitOptions::default())
    }

    /// The full descriptor text.
    ///
    /// # Errors
    ///
    /// See [`Generator::serialize`].
    pub fn serialize_with(&self, options: EmitOptions) -> Result<String> {
        let text = self.to_fragment_with(options)?;
        info!(
            generator = %self.id,
            biomes = self.biomes.len(),
            bytes = text.len(),
            "descriptor serialized"
        );
        Ok(text)
    }
}

impl Emit for Generator {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        out.scalar("id", &self.id);
        out.scalar("version", &self.version);
        out.scalar("source", &self.source);
        out.list("preprocessors", &self.preprocessors, |e, p| {
            e.value(p);
            Ok(())
        })?;
        out.map("meta", |m| {
            m.scalar("ocean-level", self.meta.ocean_level);
            for (key, value) in &self.meta.extra {
                if key != "ocean-level" {
                    m.scalar(key, value);
                }
            }
            Ok(())
        })?;
        out.map("biomes", |b| {
            for biome in &self.biomes {
                b.map(biome.id(), |e| e.node(biome))?;
            }
            Ok(())
        })
    }
}
