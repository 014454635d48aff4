//! Descriptor build and lookup errors.

use thiserror::Error;

/// Errors raised while assembling or serializing a descriptor tree.
///
/// All of these are configuration errors detected at build time. None of
/// them is retried or recovered internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DescriptorError {
    /// A required field was never set before serialization.
    #[error("{owner} is missing required field `{field}`")]
    MissingConfiguration {
        /// Id of the node missing the field.
        owner: String,
        /// Name of the missing field (e.g. "terrain", "locator").
        field: &'static str,
    },

    /// No generator is registered under the given id.
    #[error("no generator registered as `{0}`")]
    NoGenerator(String),

    /// The generator has no biome with the given id.
    #[error("generator `{generator}` has no biome `{biome}`")]
    NoSuitableBiome {
        /// Generator that was searched.
        generator: String,
        /// Biome id that was requested.
        biome: String,
    },

    /// No generator is bound to the given world name.
    #[error("world `{0}` does not exist")]
    WorldNotExists(String),

    /// A sampler node failed validation during `build()`.
    #[error("invalid sampler `{node}`: {reason}")]
    InvalidSamplerConfiguration {
        /// Name of the offending node.
        node: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A block-matching pattern was declared without any blocks.
    #[error("pattern with block type {0} needs at least one block")]
    EmptyPatternError(&'static str),

    /// A one-shot feature setter was called a second time.
    #[error("feature `{feature}` already has `{field}` configured")]
    ReconfigurationError {
        /// Feature id.
        feature: String,
        /// Setter that was called twice.
        field: &'static str,
    },

    /// An abstract (template) biome was added directly to a generator.
    #[error("biome `{0}` is abstract and cannot be added to a generator")]
    AbstractBiomeError(String),

    /// A biome with the same id is already part of the generator.
    #[error("duplicate biome id `{0}`")]
    DuplicateBiomeIdError(String),

    /// A generator with the same id is already registered.
    #[error("duplicate generator id `{0}`")]
    DuplicateGeneratorId(String),

    /// `min` is greater than `max`.
    #[error("invalid range: min {min} > max {max}")]
    InvalidRange {
        /// Lower bound that was supplied.
        min: i32,
        /// Upper bound that was supplied.
        max: i32,
    },

    /// A selection weight must be strictly positive.
    #[error("{owner} has a non-positive weight ({weight})")]
    InvalidWeight {
        /// What carried the weight (structure or palette entry).
        owner: String,
        /// The rejected weight.
        weight: u32,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DescriptorError>;
