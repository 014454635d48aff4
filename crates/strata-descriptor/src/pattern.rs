//! Block-matching predicates evaluated by the engine around a candidate
//! position.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::emit::{Emit, Emitter};
use crate::error::{DescriptorError, Result};

/// Pattern kinds understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    And,
    Or,
    Xor,
    Not,
    MatchSet,
    Match,
    MatchSolid,
    MatchAir,
}

impl PatternType {
    /// Descriptor token.
    pub const fn as_str(self) -> &'static str {
        match self {
            PatternType::And => "AND",
            PatternType::Or => "OR",
            PatternType::Xor => "XOR",
            PatternType::Not => "NOT",
            PatternType::MatchSet => "MATCH_SET",
            PatternType::Match => "MATCH",
            PatternType::MatchSolid => "MATCH_SOLID",
            PatternType::MatchAir => "MATCH_AIR",
        }
    }

    /// Kinds that carry an explicit block list.
    pub const fn needs_blocks(self) -> bool {
        matches!(self, PatternType::Match | PatternType::MatchSet)
    }
}

/// A block-match predicate: an outer combinator plus the block entries it
/// applies to, each paired with a vertical offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    kind: PatternType,
    block_type: PatternType,
    /// Insertion-ordered `block id -> offset`.
    blocks: Vec<(String, i32)>,
}

impl Pattern {
    /// Builds a pattern. A block id given twice keeps its first position and
    /// takes the last offset.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::EmptyPatternError`] when `block_type` is `MATCH` or
    /// `MATCH_SET` and no blocks were supplied.
    pub fn new<I, S>(kind: PatternType, block_type: PatternType, blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, i32)> = Vec::new();
        for (block, offset) in blocks {
            let block = block.into();
            match entries.iter_mut().find(|(b, _)| *b == block) {
                Some(existing) => existing.1 = offset,
                None => entries.push((block, offset)),
            }
        }

        if block_type.needs_blocks() && entries.is_empty() {
            return Err(DescriptorError::EmptyPatternError(block_type.as_str()));
        }

        Ok(Self {
            kind,
            block_type,
            blocks: entries,
        })
    }

    /// A plain `MATCH` pattern over the given blocks.
    pub fn matching<I, S>(blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self::new(PatternType::Match, PatternType::Match, blocks)
    }

    /// A `MATCH_SET` pattern over the given blocks.
    pub fn matching_set<I, S>(blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self::new(PatternType::And, PatternType::MatchSet, blocks)
    }

    pub fn kind(&self) -> PatternType {
        self.kind
    }

    pub fn block_type(&self) -> PatternType {
        self.block_type
    }

    /// Block entries in insertion order.
    pub fn blocks(&self) -> &[(String, i32)] {
        &self.blocks
    }

    /// Offset registered for `block`, if any.
    pub fn offset_of(&self, block: &str) -> Option<i32> {
        self.blocks
            .iter()
            .find(|(b, _)| b == block)
            .map(|(_, o)| *o)
    }
}

enum Entry<'a> {
    SetHeader,
    Block {
        tagged: bool,
        block: &'a str,
        offset: i32,
    },
    Sentinel,
}

impl Emit for Pattern {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        out.scalar("type", self.kind.as_str());

        let entries: Vec<Entry<'_>> = match self.block_type {
            PatternType::Match => self
                .blocks
                .iter()
                .map(|(block, offset)| Entry::Block {
                    tagged: true,
                    block,
                    offset: *offset,
                })
                .collect(),
            PatternType::MatchSet => {
                let mut entries = vec![Entry::SetHeader];
                entries.extend(self.blocks.iter().map(|(block, offset)| Entry::Block {
                    tagged: false,
                    block,
                    offset: *offset,
                }));
                if out.options().legacy_match_set_sentinel {
                    entries.push(Entry::Sentinel);
                }
                entries
            }
            other => {
                warn!(
                    block_type = other.as_str(),
                    "pattern block type has no serialized form; emitting header only"
                );
                return Ok(());
            }
        };

        out.list("patterns", entries, |e, entry| {
            match entry {
                Entry::SetHeader => e.scalar("type", PatternType::MatchSet.as_str()),
                Entry::Block {
                    tagged,
                    block,
                    offset,
                } => {
                    if tagged {
                        e.scalar("type", PatternType::Match.as_str());
                    }
                    e.scalar("block", block);
                    e.scalar("offset", offset);
                }
                Entry::Sentinel => e.scalar("block", 1),
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::EmitOptions;

    #[test]
    fn test_empty_match_rejected() {
        let err = Pattern::matching(Vec::<(String, i32)>::new()).unwrap_err();
        assert_eq!(err, DescriptorError::EmptyPatternError("MATCH"));
        let err = Pattern::matching_set(Vec::<(String, i32)>::new()).unwrap_err();
        assert_eq!(err, DescriptorError::EmptyPatternError("MATCH_SET"));
    }

    #[test]
    fn test_blockless_kinds_allowed_empty() {
        let p = Pattern::new(PatternType::Not, PatternType::MatchAir, Vec::<(&str, i32)>::new());
        assert!(p.is_ok());
    }

    #[test]
    fn test_duplicate_block_keeps_position() {
        let p = Pattern::matching([("a", 0), ("b", 1), ("a", 5)]).unwrap();
        assert_eq!(p.blocks(), &[("a".to_string(), 5), ("b".to_string(), 1)]);
        assert_eq!(p.offset_of("a"), Some(5));
        assert_eq!(p.offset_of("zzz"), None);
    }

    #[test]
    fn test_match_entries_in_insertion_order() {
        let p = Pattern::matching([("minecraft:stone", 0), ("minecraft:dirt", 1)]).unwrap();
        let expected = "\
type: MATCH
patterns:
  - type: MATCH
    block: minecraft:stone
    offset: 0
  - type: MATCH
    block: minecraft:dirt
    offset: 1
";
        assert_eq!(p.to_fragment().unwrap(), expected);
    }

    #[test]
    fn test_match_set_without_sentinel() {
        let p = Pattern::matching_set([("minecraft:sand", -1)]).unwrap();
        let expected = "\
type: AND
patterns:
  - type: MATCH_SET
  - block: minecraft:sand
    offset: -1
";
        assert_eq!(p.to_fragment().unwrap(), expected);
    }

    #[test]
    fn test_match_set_legacy_sentinel() {
        let p = Pattern::matching_set([("minecraft:sand", -1)]).unwrap();
        let text = p
            .to_fragment_with(EmitOptions {
                legacy_match_set_sentinel: true,
            })
            .unwrap();
        assert!(text.ends_with("    offset: -1\n  - block: 1\n"));
    }

    #[test]
    fn test_undefined_block_types_emit_header_only() {
        for block_type in [
            PatternType::And,
            PatternType::Or,
            PatternType::Xor,
            PatternType::Not,
            PatternType::MatchSolid,
            PatternType::MatchAir,
        ] {
            let p = Pattern::new(PatternType::Or, block_type, [("minecraft:stone", 0)]).unwrap();
            assert_eq!(p.to_fragment().unwrap(), "type: OR\n");
        }
    }
}
