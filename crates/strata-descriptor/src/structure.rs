//! Placeable multi-block templates with a weighted material palette.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::emit::{Emit, Emitter, format_float};
use crate::error::{DescriptorError, Result};

/// Which faces of a shape a palette entry applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionFacet {
    All,
    Top,
    Bottom,
    North,
    South,
    East,
    West,
}

impl DirectionFacet {
    pub const fn as_str(self) -> &'static str {
        match self {
            DirectionFacet::All => "all",
            DirectionFacet::Top => "top",
            DirectionFacet::Bottom => "bottom",
            DirectionFacet::North => "north",
            DirectionFacet::South => "south",
            DirectionFacet::East => "east",
            DirectionFacet::West => "west",
        }
    }
}

/// Geometric building block of a structure, anchored at the placement point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePrimitive {
    Sphere { radius: f32 },
    Cuboid { x: u32, y: u32, z: u32 },
    Cylinder { radius: f32, height: u32 },
    /// Vertical column, e.g. a trunk or stalactite.
    Column { height: u32 },
}

impl Emit for ShapePrimitive {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        match *self {
            ShapePrimitive::Sphere { radius } => {
                out.scalar("type", "SPHERE");
                out.scalar("radius", radius);
            }
            ShapePrimitive::Cuboid { x, y, z } => {
                out.scalar("type", "CUBOID");
                out.scalar("x", x);
                out.scalar("y", y);
                out.scalar("z", z);
            }
            ShapePrimitive::Cylinder { radius, height } => {
                out.scalar("type", "CYLINDER");
                out.scalar("radius", radius);
                out.scalar("height", height);
            }
            ShapePrimitive::Column { height } => {
                out.scalar("type", "COLUMN");
                out.scalar("height", height);
            }
        }
        Ok(())
    }
}

/// A named template: shapes filled from a per-facet weighted palette.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    id: String,
    palette: BTreeMap<DirectionFacet, Vec<(String, u32)>>,
    shapes: Vec<ShapePrimitive>,
}

impl Structure {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            palette: BTreeMap::new(),
            shapes: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adds `block` to the palette of `facet`. Re-adding a block replaces its
    /// weight in place.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::InvalidWeight`] for a zero weight.
    pub fn with_block(
        mut self,
        facet: DirectionFacet,
        block: impl Into<String>,
        weight: u32,
    ) -> Result<Self> {
        let block = block.into();
        if weight == 0 {
            return Err(DescriptorError::InvalidWeight {
                owner: format!("structure `{}` palette entry `{block}`", self.id),
                weight,
            });
        }
        let entries = self.palette.entry(facet).or_default();
        match entries.iter_mut().find(|(b, _)| *b == block) {
            Some(existing) => existing.1 = weight,
            None => entries.push((block, weight)),
        }
        Ok(self)
    }

    pub fn with_shape(mut self, shape: ShapePrimitive) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Palette entries for `facet`, in insertion order.
    pub fn palette(&self, facet: DirectionFacet) -> &[(String, u32)] {
        self.palette.get(&facet).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn shapes(&self) -> &[ShapePrimitive] {
        &self.shapes
    }

    /// Share of `facet`'s palette weight taken by `block`, in `[0, 1]`.
    pub fn block_share(&self, facet: DirectionFacet, block: &str) -> f32 {
        let entries = self.palette(facet);
        let total: u32 = entries.iter().map(|(_, w)| *w).sum();
        if total == 0 {
            return 0.0;
        }
        entries
            .iter()
            .find(|(b, _)| b == block)
            .map_or(0.0, |(_, w)| *w as f32 / total as f32)
    }
}

impl Emit for Structure {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        out.scalar("id", &self.id);
        out.map("palette", |p| {
            for (facet, entries) in &self.palette {
                p.map(facet.as_str(), |f| {
                    for (block, weight) in entries {
                        f.scalar(block, *weight);
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })?;
        out.list("shapes", &self.shapes, |e, shape| e.node(shape))
    }
}

/// Human-readable summary used in logs, e.g. `boulder (sphere r=3.0)`.
pub(crate) fn describe_shapes(structure: &Structure) -> String {
    let shapes: Vec<String> = structure
        .shapes
        .iter()
        .map(|s| match s {
            ShapePrimitive::Sphere { radius } => format!("sphere r={}", format_float(*radius)),
            ShapePrimitive::Cuboid { x, y, z } => format!("cuboid {x}x{y}x{z}"),
            ShapePrimitive::Cylinder { radius, height } => {
                format!("cylinder r={} h={height}", format_float(*radius))
            }
            ShapePrimitive::Column { height } => format!("column h={height}"),
        })
        .collect();
    format!("{} ({})", structure.id, shapes.join(", "))
}
