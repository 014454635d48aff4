//! Seeded preview of which variant each biome would resolve to.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strata_descriptor::{Generator, pick_variant};
use tracing::info;

/// Picks one variant per biome from a single seeded stream, in biome order.
/// Biomes without variants map to `None`.
pub fn preview_variants(generator: &Generator, seed: u64) -> Vec<(String, Option<String>)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generator
        .biomes()
        .iter()
        .map(|biome| {
            let picked = pick_variant(biome.variants(), &mut rng).map(|v| v.name.clone());
            info!(
                seed,
                biome = %biome.id(),
                variant = picked.as_deref().unwrap_or("-"),
                "variant preview"
            );
            (biome.id().to_string(), picked)
        })
        .collect()
}
