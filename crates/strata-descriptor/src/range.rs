//! Inclusive integer bounds used by locators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::emit::{Emit, Emitter};
use crate::error::{DescriptorError, Result};

/// Inclusive `[min, max]` range in block coordinates.
///
/// Always satisfies `min <= max`; the only way to build one is through
/// [`Range::new`], which rejects inverted bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    min: i32,
    max: i32,
}

impl Range {
    /// Creates a range, failing when `min > max`.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::InvalidRange`] for inverted bounds.
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if min > max {
            return Err(DescriptorError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// A range covering exactly one value.
    pub fn single(value: i32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Lower bound (inclusive).
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound (inclusive).
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Number of values covered. Never zero.
    pub fn span(&self) -> u64 {
        (i64::from(self.max) - i64::from(self.min) + 1) as u64
    }

    /// Whether `value` lies inside the bounds.
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

impl Emit for Range {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        out.scalar("min", self.min);
        out.scalar("max", self.max);
        Ok(())
    }
}

// Deserialization goes through `new` so manifests cannot smuggle in
// inverted bounds.
impl<'de> Deserialize<'de> for Range {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            min: i32,
            max: i32,
        }

        let raw = Raw::deserialize(deserializer)?;
        Range::new(raw.min, raw.max).map_err(serde::de::Error::custom)
    }
}
