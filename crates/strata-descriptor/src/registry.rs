//! Caller-owned registry of generators and the worlds bound to them.

use hashbrown::HashMap;
use tracing::debug;

use crate::biome::Biome;
use crate::error::{DescriptorError, Result};
use crate::generator::Generator;

/// Stores generators by unique id and resolves world names to them.
///
/// Owned and passed around by the caller; there is no global instance.
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: Vec<Generator>,
    by_id: HashMap<String, usize>,
    /// World name -> generator id.
    worlds: HashMap<String, String>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a finished generator.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::DuplicateGeneratorId`] if the id is taken.
    pub fn register(&mut self, generator: Generator) -> Result<()> {
        if self.by_id.contains_key(generator.id()) {
            return Err(DescriptorError::DuplicateGeneratorId(generator.id().to_string()));
        }
        debug!(generator = %generator.id(), "generator registered");
        self.by_id.insert(generator.id().to_string(), self.generators.len());
        self.generators.push(generator);
        Ok(())
    }

    /// # Errors
    ///
    /// [`DescriptorError::NoGenerator`] for an unknown id.
    pub fn generator(&self, id: &str) -> Result<&Generator> {
        self.by_id
            .get(id)
            .map(|&i| &self.generators[i])
            .ok_or_else(|| DescriptorError::NoGenerator(id.to_string()))
    }

    /// Binds (or re-binds) `world` to a registered generator.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::NoGenerator`] if `generator_id` is unknown.
    pub fn bind_world(&mut self, world: impl Into<String>, generator_id: &str) -> Result<()> {
        self.generator(generator_id)?;
        self.worlds.insert(world.into(), generator_id.to_string());
        Ok(())
    }

    /// # Errors
    ///
    /// [`DescriptorError::WorldNotExists`] if `world` was never bound.
    pub fn generator_for_world(&self, world: &str) -> Result<&Generator> {
        let id = self
            .worlds
            .get(world)
            .ok_or_else(|| DescriptorError::WorldNotExists(world.to_string()))?;
        self.generator(id)
    }

    /// # Errors
    ///
    /// [`DescriptorError::NoGenerator`] or [`DescriptorError::NoSuitableBiome`].
    pub fn biome(&self, generator_id: &str, biome_id: &str) -> Result<&Biome> {
        self.generator(generator_id)?
            .biome(biome_id)
            .ok_or_else(|| DescriptorError::NoSuitableBiome {
                generator: generator_id.to_string(),
                biome: biome_id.to_string(),
            })
    }

    /// Registered generator ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.generators.iter().map(Generator::id)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
