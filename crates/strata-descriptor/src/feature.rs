//! Features: a locator, a distributor sampler and a weighted set of
//! structures, filed under a generation stage.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::emit::{Emit, Emitter};
use crate::error::{DescriptorError, Result};
use crate::locator::Locator;
use crate::rarity::weighted_pick;
use crate::sampler::BuiltSampler;
use crate::structure::{Structure, describe_shapes};

/// Generation stage a feature belongs to. Declaration order is the order
/// in which the engine runs the stages and the order they are emitted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Featureable {
    Preprocessors,
    Landforms,
    Slabs,
    Ores,
    Deposits,
    Trees,
    Flora,
    Postprocessors,
}

impl Featureable {
    pub const ALL: [Featureable; 8] = [
        Featureable::Preprocessors,
        Featureable::Landforms,
        Featureable::Slabs,
        Featureable::Ores,
        Featureable::Deposits,
        Featureable::Trees,
        Featureable::Flora,
        Featureable::Postprocessors,
    ];

    /// Descriptor key for the stage.
    pub const fn key(self) -> &'static str {
        match self {
            Featureable::Preprocessors => "preprocessors",
            Featureable::Landforms => "landforms",
            Featureable::Slabs => "slabs",
            Featureable::Ores => "ores",
            Featureable::Deposits => "deposits",
            Featureable::Trees => "trees",
            Featureable::Flora => "flora",
            Featureable::Postprocessors => "postprocessors",
        }
    }
}

/// A placeable feature. Build-once: each setter accepts exactly one call.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    id: String,
    category: Featureable,
    locator: Option<Locator>,
    distributor: Option<BuiltSampler>,
    structures_distributor: Option<BuiltSampler>,
    structures: Vec<(Structure, u32)>,
}

impl Feature {
    pub fn new(id: impl Into<String>, category: Featureable) -> Self {
        Self {
            id: id.into(),
            category,
            locator: None,
            distributor: None,
            structures_distributor: None,
            structures: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> Featureable {
        self.category
    }

    pub fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }

    pub fn distributor(&self) -> Option<&BuiltSampler> {
        self.distributor.as_ref()
    }

    pub fn structures_distributor(&self) -> Option<&BuiltSampler> {
        self.structures_distributor.as_ref()
    }

    /// Weighted structures in declaration order.
    pub fn structures(&self) -> &[(Structure, u32)] {
        &self.structures
    }

    fn set_once<T>(
        slot: &mut Option<T>,
        value: T,
        feature: &str,
        field: &'static str,
    ) -> Result<()> {
        if slot.is_some() {
            return Err(DescriptorError::ReconfigurationError {
                feature: feature.to_string(),
                field,
            });
        }
        *slot = Some(value);
        Ok(())
    }

    /// Sets the placement strategy.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::ReconfigurationError`] if a locator is already set;
    /// the existing one is kept.
    pub fn set_locator(&mut self, locator: Locator) -> Result<()> {
        Self::set_once(&mut self.locator, locator, &self.id, "locator")
    }

    /// Sets the sampler governing placement density.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::ReconfigurationError`] on a second call.
    pub fn set_distributor(&mut self, sampler: BuiltSampler) -> Result<()> {
        Self::set_once(&mut self.distributor, sampler, &self.id, "distributor")
    }

    /// Sets the sampler the engine uses to choose between structures.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::ReconfigurationError`] on a second call.
    pub fn set_structures_distributor(&mut self, sampler: BuiltSampler) -> Result<()> {
        Self::set_once(
            &mut self.structures_distributor,
            sampler,
            &self.id,
            "structures-distributor",
        )
    }

    /// Appends a structure with a selection weight.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::InvalidWeight`] when `weight` is zero.
    pub fn add_structure(&mut self, structure: Structure, weight: u32) -> Result<()> {
        if weight == 0 {
            return Err(DescriptorError::InvalidWeight {
                owner: format!("feature `{}` structure `{}`", self.id, structure.id()),
                weight,
            });
        }
        debug!(
            feature = %self.id,
            weight,
            structure = %describe_shapes(&structure),
            "structure added"
        );
        self.structures.push((structure, weight));
        Ok(())
    }

    /// Picks a structure with probability proportional to its weight.
    pub fn pick_structure(&self, roll: f64) -> Option<&Structure> {
        weighted_pick(&self.structures, |(_, w)| *w, roll).map(|(s, _)| s)
    }
}

impl Emit for Feature {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        let missing = |field| DescriptorError::MissingConfiguration {
            owner: format!("feature `{}`", self.id),
            field,
        };
        let locator = self.locator.as_ref().ok_or_else(|| missing("locator"))?;
        let distributor = self
            .distributor
            .as_ref()
            .ok_or_else(|| missing("distributor"))?;

        out.scalar("id", &self.id);
        out.map("locator", |e| e.node(locator))?;
        out.map("distributor", |e| e.node(distributor))?;
        if let Some(structures_distributor) = &self.structures_distributor {
            out.map("structures-distributor", |e| e.node(structures_distributor))?;
        }
        out.list("structures", &self.structures, |e, (structure, weight)| {
            e.node(structure)?;
            e.scalar("weight", *weight);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;
    use crate::sampler::{NoiseSampler, SamplerNode};
    use crate::structure::{DirectionFacet, ShapePrimitive};

    fn constant(v: f32) -> BuiltSampler {
        NoiseSampler::new(SamplerNode::constant(v)).build().unwrap()
    }

    fn top(min: i32, max: i32) -> Locator {
        Locator::Top {
            range: Range::new(min, max).unwrap(),
        }
    }

    fn rock(id: &str) -> Structure {
        Structure::new(id)
            .with_block(DirectionFacet::All, "minecraft:stone", 1)
            .unwrap()
            .with_shape(ShapePrimitive::Sphere { radius: 2.0 })
    }

    #[test]
    fn test_second_locator_rejected_first_kept() {
        let mut f = Feature::new("rocks", Featureable::Deposits);
        f.set_locator(top(2, 5)).unwrap();
        let err = f.set_locator(top(0, 1)).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::ReconfigurationError {
                feature: "rocks".into(),
                field: "locator",
            }
        );
        assert_eq!(f.locator(), Some(&top(2, 5)));
    }

    #[test]
    fn test_second_distributors_rejected() {
        let mut f = Feature::new("rocks", Featureable::Deposits);
        f.set_distributor(constant(1.0)).unwrap();
        assert!(f.set_distributor(constant(2.0)).is_err());
        assert_eq!(f.distributor(), Some(&constant(1.0)));

        f.set_structures_distributor(constant(3.0)).unwrap();
        assert!(matches!(
            f.set_structures_distributor(constant(4.0)),
            Err(DescriptorError::ReconfigurationError {
                field: "structures-distributor",
                ..
            })
        ));
        assert_eq!(f.structures_distributor(), Some(&constant(3.0)));
    }

    #[test]
    fn test_zero_weight_structure_rejected() {
        let mut f = Feature::new("rocks", Featureable::Deposits);
        assert!(matches!(
            f.add_structure(rock("a"), 0),
            Err(DescriptorError::InvalidWeight { .. })
        ));
        assert!(f.structures().is_empty());
    }

    #[test]
    fn test_pick_structure_by_weight() {
        let mut f = Feature::new("rocks", Featureable::Deposits);
        f.add_structure(rock("small"), 3).unwrap();
        f.add_structure(rock("large"), 1).unwrap();
        assert_eq!(f.pick_structure(0.5).unwrap().id(), "small");
        assert_eq!(f.pick_structure(0.8).unwrap().id(), "large");
    }

    #[test]
    fn test_missing_locator_fails_serialization() {
        let mut f = Feature::new("rocks", Featureable::Deposits);
        f.set_distributor(constant(1.0)).unwrap();
        assert_eq!(
            f.to_fragment().unwrap_err(),
            DescriptorError::MissingConfiguration {
                owner: "feature `rocks`".into(),
                field: "locator",
            }
        );
    }

    #[test]
    fn test_serialization_order() {
        let mut f = Feature::new("rocks", Featureable::Deposits);
        f.add_structure(rock("a"), 10).unwrap();
        f.set_distributor(constant(0.5)).unwrap();
        f.set_locator(top(2, 5)).unwrap();

        let expected = "\
id: rocks
locator:
  type: TOP
  range:
    min: 2
    max: 5
distributor:
  type: CONSTANT
  value: 0.5
structures:
  - id: a
    palette:
      all:
        minecraft:stone: 1
    shapes:
      - type: SPHERE
        radius: 2.0
    weight: 10
";
        assert_eq!(f.to_fragment().unwrap(), expected);
    }
}
