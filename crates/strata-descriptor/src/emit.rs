//! Descriptor emitter: the single place that decides indentation, list
//! markers, quoting and number formatting.
//!
//! Every node type implements [`Emit`] and only ever talks to an
//! [`Emitter`] in terms of keys, scalars, maps and lists. Nodes never build
//! indentation strings themselves.

use std::borrow::Cow;
use std::fmt;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Switches that change the emitted text without changing the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Append the `- block: 1` trailer after every `MATCH_SET` pattern list.
    ///
    /// Older engine builds expect it; everything else should leave it off.
    pub legacy_match_set_sentinel: bool,
}

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// A leaf value in the descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Text. Quoted only when a plain scalar would be misread.
    Str(String),
    /// Whole number.
    Int(i64),
    /// Unsigned whole number, for seeds past `i64::MAX`.
    UInt(u64),
    /// 32-bit float. Always printed with a fractional part.
    Float(f32),
    /// Boolean.
    Bool(bool),
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&String> for Scalar {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) if needs_quotes(s) => write!(f, "\"{}\"", escape(s)),
            Self::Str(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Formats a float so it can never be mistaken for an integer.
pub fn format_float(v: f32) -> String {
    if v.is_nan() {
        ".nan".to_string()
    } else if v.is_infinite() {
        let inf = if v > 0.0 { ".inf" } else { "-.inf" };
        inf.to_string()
    } else if v.fract() != 0.0 {
        format!("{v}")
    } else if v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        // `{:e}` drops the fraction and the exponent sign: 1e16 -> 1.0e+16.
        let exp = format!("{v:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) => {
                let dot = if mantissa.contains('.') { "" } else { ".0" };
                let sign = if power.starts_with('-') { "" } else { "+" };
                format!("{mantissa}{dot}e{sign}{power}")
            }
            None => exp,
        }
    }
}

/// Renders a mapping key, quoting it under the same rules as string values.
pub fn key(k: &str) -> Cow<'_, str> {
    if needs_quotes(k) {
        Cow::Owned(format!("\"{}\"", escape(k)))
    } else {
        Cow::Borrowed(k)
    }
}

fn is_radix_int(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s).to_ascii_lowercase();
    ["0x", "0o", "0b"].iter().any(|prefix| {
        unsigned.strip_prefix(prefix).is_some_and(|digits| {
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit() || c == '_')
        })
    })
}

fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') || s.contains(['\n', '"']) {
        return true;
    }
    if matches!(
        first,
        '?' | ':' | ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '%'
            | '@' | '`'
    ) {
        return true;
    }
    if first == '-' && (s.len() == 1 || s[1..].starts_with(' ')) {
        return true;
    }
    if matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "y" | "n" | "on" | "off" | "null" | "~"
            | ".inf" | "+.inf" | "-.inf" | ".nan"
    ) {
        return true;
    }
    // YAML 1.1 also reads digit groups (`1_000`) and radix prefixes as numbers.
    is_radix_int(s) || s.parse::<f64>().is_ok() || s.replace('_', "").parse::<f64>().is_ok()
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Indentation-aware writer for the YAML-flavoured descriptor.
#[derive(Debug, Default)]
pub struct Emitter {
    out: String,
    indent: usize,
    /// The next line opens a list item and gets the `- ` marker.
    pending_item: bool,
    options: EmitOptions,
}

impl Emitter {
    /// Creates an emitter writing at column zero.
    pub fn new(options: EmitOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Options this emitter was created with.
    pub fn options(&self) -> EmitOptions {
        self.options
    }

    /// Consumes the emitter and returns the text written so far.
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, content: &str) {
        if self.pending_item {
            self.pending_item = false;
            self.out.push_str(&" ".repeat(self.indent - 2));
            self.out.push_str("- ");
        } else if !content.is_empty() {
            self.out.push_str(&" ".repeat(self.indent));
        }
        self.out.push_str(content);
        self.out.push('\n');
    }

    /// Writes `key: value`.
    pub fn scalar(&mut self, k: &str, value: impl Into<Scalar>) {
        let value = value.into();
        self.line(&format!("{}: {value}", key(k)));
    }

    /// Writes a bare value. Inside [`Emitter::list`] this becomes `- value`.
    pub fn value(&mut self, value: impl Into<Scalar>) {
        let value = value.into();
        self.line(&value.to_string());
    }

    /// Writes `key:` followed by a nested mapping. An empty body collapses
    /// to `key: {}`.
    pub fn map<F>(&mut self, k: &str, body: F) -> Result<()>
    where
        F: FnOnce(&mut Emitter) -> Result<()>,
    {
        let key = key(k);
        let start = self.out.len();
        let was_pending = self.pending_item;
        self.line(&format!("{key}:"));
        let mark = self.out.len();

        self.indent += 2;
        let result = body(self);
        self.indent -= 2;
        result?;

        if self.out.len() == mark {
            self.out.truncate(start);
            self.pending_item = was_pending;
            self.line(&format!("{key}: {{}}"));
        }
        Ok(())
    }

    /// Writes `key:` followed by one list item per element. Each call of
    /// `each` renders one item; an empty list collapses to `key: []`.
    pub fn list<I, F>(&mut self, k: &str, items: I, mut each: F) -> Result<()>
    where
        I: IntoIterator,
        F: FnMut(&mut Emitter, I::Item) -> Result<()>,
    {
        let key = key(k);
        let start = self.out.len();
        let was_pending = self.pending_item;
        self.line(&format!("{key}:"));
        let mark = self.out.len();

        self.indent += 4;
        for item in items {
            self.pending_item = true;
            if let Err(e) = each(self, item) {
                self.indent -= 4;
                self.pending_item = false;
                return Err(e);
            }
            if self.pending_item {
                self.line("{}");
            }
        }
        self.indent -= 4;

        if self.out.len() == mark {
            self.out.truncate(start);
            self.pending_item = was_pending;
            self.line(&format!("{key}: []"));
        }
        Ok(())
    }

    /// Embeds an already-serialized fragment under `key`, re-indenting it
    /// to the current depth.
    pub fn fragment(&mut self, k: &str, text: &str) {
        let key = key(k);
        if text.trim().is_empty() {
            self.line(&format!("{key}: {{}}"));
            return;
        }
        self.line(&format!("{key}:"));
        self.indent += 2;
        for l in text.lines().filter(|l| !l.trim().is_empty()) {
            self.line(l);
        }
        self.indent -= 2;
    }

    /// Writes a literal block scalar (`key: |`) that reads back as exactly
    /// `text`.
    ///
    /// The header carries an indentation indicator when the first non-blank
    /// line starts with a space, and a chomping indicator matching the
    /// number of trailing newlines.
    pub fn literal(&mut self, k: &str, text: &str) {
        let key = key(k);
        if text.is_empty() {
            self.line(&format!("{key}: \"\""));
            return;
        }
        let indent = match text.lines().find(|l| !l.is_empty()) {
            Some(first) if first.starts_with(' ') => "2",
            _ => "",
        };
        let chomp = match text.len() - text.trim_end_matches('\n').len() {
            0 => "-",
            1 => "",
            _ => "+",
        };
        self.line(&format!("{key}: |{indent}{chomp}"));
        self.indent += 2;
        for l in text.lines() {
            self.line(l);
        }
        self.indent -= 2;
    }

    /// Renders a nested node in place.
    pub fn node<T: Emit + ?Sized>(&mut self, node: &T) -> Result<()> {
        node.emit(self)
    }
}

// ---------------------------------------------------------------------------
// Emit
// ---------------------------------------------------------------------------

/// Capability shared by every descriptor node: write its own fragment.
pub trait Emit {
    /// Writes this node's keys at the emitter's current depth.
    fn emit(&self, out: &mut Emitter) -> Result<()>;

    /// Serializes this node on its own, starting at column zero.
    fn to_fragment(&self) -> Result<String> {
        self.to_fragment_with(EmitOptions::default())
    }

    /// Like [`Emit::to_fragment`] with explicit options.
    fn to_fragment_with(&self, options: EmitOptions) -> Result<String> {
        let mut out = Emitter::new(options);
        self.emit(&mut out)?;
        Ok(out.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_quoting() {
        assert_eq!(Scalar::from("minecraft:stone").to_string(), "minecraft:stone");
        assert_eq!(Scalar::from("a: b").to_string(), "\"a: b\"");
        assert_eq!(Scalar::from("").to_string(), "\"\"");
        assert_eq!(Scalar::from("true").to_string(), "\"true\"");
        assert_eq!(Scalar::from("42").to_string(), "\"42\"");
        assert_eq!(Scalar::from("-").to_string(), "\"-\"");
        assert_eq!(Scalar::from("*").to_string(), "\"*\"");
        assert_eq!(Scalar::from("+").to_string(), "+");
        assert_eq!(Scalar::from("1.0.0").to_string(), "1.0.0");
    }

    #[test]
    fn test_yaml_number_and_bool_lookalikes_are_quoted() {
        for s in [".inf", "-.inf", ".NaN", "0x1F", "0o17", "0b101", "-0x1f", "1_000", "y", "N"] {
            assert_eq!(Scalar::from(s).to_string(), format!("\"{s}\""), "{s}");
        }
        for s in ["0xcafe_block", "yard", "no_caves", "0x"] {
            assert_eq!(Scalar::from(s).to_string(), s, "{s}");
        }
    }

    #[test]
    fn test_unsigned_values_keep_their_value() {
        assert_eq!(Scalar::from(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(Scalar::from(7u64), Scalar::UInt(7));
    }

    #[test]
    fn test_keys_are_quoted_like_values() {
        let mut out = Emitter::default();
        out.scalar("a # b", "x");
        out.scalar("plain-key", 1);
        out.map("cold: tundra", |m| {
            m.scalar("", true);
            Ok(())
        })
        .unwrap();
        out.list("- item", [1], |e, v| {
            e.value(v);
            Ok(())
        })
        .unwrap();
        out.map("42", |_| Ok(())).unwrap();
        out.fragment("on", "type: CONSTANT\n");
        out.literal("key: x", "a");

        let expected = "\
\"a # b\": x
plain-key: 1
\"cold: tundra\":
  \"\": true
\"- item\":
  - 1
\"42\": {}
\"on\":
  type: CONSTANT
\"key: x\": |-
  a
";
        assert_eq!(out.finish(), expected);
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(f32::INFINITY), ".inf");
        assert_eq!(format_float(1e16), "1.0e+16");
        assert_eq!(format_float(-1.5e20), "-1.5e+20");
        assert_eq!(format_float(1_048_576.0), "1048576.0");
    }

    #[test]
    fn test_nested_map_and_list_indentation() {
        let mut out = Emitter::default();
        out.scalar("id", "overworld");
        out.map("meta", |m| {
            m.scalar("ocean-level", 62);
            Ok(())
        })
        .unwrap();
        out.list("entries", [("a", 1), ("b", 2)], |e, (name, n)| {
            e.scalar("name", name);
            e.scalar("n", n);
            Ok(())
        })
        .unwrap();
        out.list("tags", ["x", "y"], |e, t| {
            e.value(t);
            Ok(())
        })
        .unwrap();

        let expected = "\
id: overworld
meta:
  ocean-level: 62
entries:
  - name: a
    n: 1
  - name: b
    n: 2
tags:
  - x
  - y
";
        assert_eq!(out.finish(), expected);
    }

    #[test]
    fn test_empty_collections_collapse() {
        let mut out = Emitter::default();
        out.map("meta", |_| Ok(())).unwrap();
        out.list("items", Vec::<u32>::new(), |e, v| {
            e.value(v);
            Ok(())
        })
        .unwrap();
        assert_eq!(out.finish(), "meta: {}\nitems: []\n");
    }

    #[test]
    fn test_map_inside_list_item() {
        let mut out = Emitter::default();
        out.list("items", [1], |e, v| {
            e.map("range", |r| {
                r.scalar("min", v);
                r.scalar("max", v + 1);
                Ok(())
            })
        })
        .unwrap();
        assert_eq!(out.finish(), "items:\n  - range:\n      min: 1\n      max: 2\n");
    }

    #[test]
    fn test_fragment_is_reindented() {
        let mut out = Emitter::default();
        out.map("biome", |b| {
            b.fragment("terrain", "type: CONSTANT\nvalue: 1.0\n");
            Ok(())
        })
        .unwrap();
        assert_eq!(
            out.finish(),
            "biome:\n  terrain:\n    type: CONSTANT\n    value: 1.0\n"
        );
    }

    #[test]
    fn test_literal_block() {
        let mut out = Emitter::default();
        out.literal("terrain", "a\nb");
        out.literal("empty", "");
        assert_eq!(out.finish(), "terrain: |-\n  a\n  b\nempty: \"\"\n");
    }

    #[test]
    fn test_literal_block_chomping_follows_trailing_newlines() {
        let mut out = Emitter::default();
        out.literal("one", "a\n");
        out.literal("two", "a\n\n");
        assert_eq!(out.finish(), "one: |\n  a\ntwo: |+\n  a\n\n");
    }

    #[test]
    fn test_literal_block_with_indented_first_line() {
        let mut out = Emitter::default();
        out.map("biome", |b| {
            b.literal("terrain", "  indented: 1\nflat: 2");
            Ok(())
        })
        .unwrap();
        assert_eq!(
            out.finish(),
            "biome:\n  terrain: |2-\n      indented: 1\n    flat: 2\n"
        );
    }
}
