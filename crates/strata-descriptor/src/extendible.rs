//! Named terrain-trait fragments a biome can attach.

use serde::{Deserialize, Serialize};

use crate::emit::{Emit, Emitter};
use crate::error::Result;

/// A reusable terrain behaviour (carving rules, surface layers, ...).
///
/// `terrain_data` is opaque to this crate and passed through verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extendible {
    pub id: String,
    pub terrain_data: String,
}

impl Extendible {
    pub fn new(id: impl Into<String>, terrain_data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            terrain_data: terrain_data.into(),
        }
    }
}

impl Emit for Extendible {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        out.scalar("id", &self.id);
        out.literal("terrain", &self.terrain_data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_data_is_a_literal_block() {
        let e = Extendible::new("carving_land", "carving:\n  update-palette: true");
        assert_eq!(
            e.to_fragment().unwrap(),
            "id: carving_land\nterrain: |-\n  carving:\n    update-palette: true\n"
        );
    }

    #[test]
    fn test_indented_terrain_data_reads_back_verbatim() {
        let e = Extendible::new("x", "  indented: 1\nflat: 2\n");
        assert_eq!(
            e.to_fragment().unwrap(),
            "id: x\nterrain: |2\n    indented: 1\n  flat: 2\n"
        );
    }
}
