//! Noise sampler expression trees.
//!
//! A [`NoiseSampler`] is a mutable builder around a tree of [`SamplerNode`]s:
//! constants, named functions and arithmetic combinators. Each node carries
//! a parameter bag. `build()` validates the tree and freezes it into a
//! [`BuiltSampler`], whose serialized fragment is what biomes and features
//! embed.
//!
//! Parameter binding has two flavours:
//! - `bind` sets a local value on exactly one node, and always wins.
//! - `bind_global` pushes a value into every node that is part of the tree
//!   *at the time of the call*. Nodes attached afterwards do not inherit it,
//!   so attach children first, then bind globals.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::emit::{Emit, Emitter, format_float};
use crate::error::{DescriptorError, Result};

// ---------------------------------------------------------------------------
// Operators and values
// ---------------------------------------------------------------------------

/// Binary operator joining two sampler sub-trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperation {
    /// Infix token (`+`, `-`, `*`, `/`).
    pub const fn token(self) -> &'static str {
        match self {
            ArithmeticOperation::Add => "+",
            ArithmeticOperation::Subtract => "-",
            ArithmeticOperation::Multiply => "*",
            ArithmeticOperation::Divide => "/",
        }
    }
}

impl fmt::Display for ArithmeticOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Value held by a constant node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplerValue {
    Float(f32),
    /// Integer constants; built from floats by truncating toward zero.
    Integer(i32),
}

impl fmt::Display for SamplerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplerValue::Float(v) => f.write_str(&format_float(*v)),
            SamplerValue::Integer(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// The three node shapes of a sampler tree.
#[derive(Clone, Debug, PartialEq)]
pub enum SamplerKind {
    Constant(SamplerValue),
    Function {
        name: String,
        expression: String,
        /// Names that must resolve to a bound parameter before `build()`.
        arguments: Vec<String>,
    },
    Combinator {
        operator: ArithmeticOperation,
        left: Box<SamplerNode>,
        right: Box<SamplerNode>,
    },
}

/// One node of a sampler tree together with its parameter bag.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerNode {
    kind: SamplerKind,
    local: BTreeMap<String, f32>,
    inherited: BTreeMap<String, f32>,
}

impl SamplerNode {
    fn from_kind(kind: SamplerKind) -> Self {
        Self {
            kind,
            local: BTreeMap::new(),
            inherited: BTreeMap::new(),
        }
    }

    /// A floating-point constant.
    pub fn constant(value: f32) -> Self {
        Self::from_kind(SamplerKind::Constant(SamplerValue::Float(value)))
    }

    /// An integer constant. The fractional part is dropped toward zero.
    pub fn constant_int(value: f32) -> Self {
        Self::from_kind(SamplerKind::Constant(SamplerValue::Integer(value.trunc() as i32)))
    }

    /// A named function of the given arguments.
    pub fn function<I, S>(
        name: impl Into<String>,
        expression: impl Into<String>,
        arguments: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_kind(SamplerKind::Function {
            name: name.into(),
            expression: expression.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        })
    }

    /// `left <operator> right`.
    pub fn combine(operator: ArithmeticOperation, left: SamplerNode, right: SamplerNode) -> Self {
        Self::from_kind(SamplerKind::Combinator {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Builder form of [`SamplerNode::bind`].
    pub fn with_param(mut self, name: impl Into<String>, value: f32) -> Self {
        self.bind(name, value);
        self
    }

    /// Sets a local parameter on this node only.
    pub fn bind(&mut self, name: impl Into<String>, value: f32) {
        self.local.insert(name.into(), value);
    }

    fn bind_global(&mut self, name: &str, value: f32) {
        self.inherited.insert(name.to_string(), value);
        if let SamplerKind::Combinator { left, right, .. } = &mut self.kind {
            left.bind_global(name, value);
            right.bind_global(name, value);
        }
    }

    pub fn kind(&self) -> &SamplerKind {
        &self.kind
    }

    /// Effective value of `name`: local binding first, then inherited.
    pub fn parameter(&self, name: &str) -> Option<f32> {
        self.local
            .get(name)
            .or_else(|| self.inherited.get(name))
            .copied()
    }

    /// Effective parameter bag, sorted by name.
    pub fn parameters(&self) -> BTreeMap<String, f32> {
        let mut merged = self.inherited.clone();
        merged.extend(self.local.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }

    /// Number of nodes in this sub-tree.
    pub fn node_count(&self) -> usize {
        match &self.kind {
            SamplerKind::Combinator { left, right, .. } => {
                1 + left.node_count() + right.node_count()
            }
            _ => 1,
        }
    }

    fn label(&self) -> String {
        match &self.kind {
            SamplerKind::Constant(v) => format!("constant({v})"),
            SamplerKind::Function { name, .. } => name.clone(),
            SamplerKind::Combinator { operator, .. } => format!("arithmetic({operator})"),
        }
    }

    fn validate(&self) -> Result<()> {
        match &self.kind {
            SamplerKind::Constant(_) => Ok(()),
            SamplerKind::Function { arguments, .. } => {
                match arguments.iter().find(|a| self.parameter(a).is_none()) {
                    Some(missing) => Err(DescriptorError::InvalidSamplerConfiguration {
                        node: self.label(),
                        reason: format!("argument `{missing}` has no bound value"),
                    }),
                    None => Ok(()),
                }
            }
            SamplerKind::Combinator { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
        }
    }

    /// Infix rendering of the sub-tree, e.g. `(ridge(x, amp) + 2.0)`.
    pub fn expression(&self) -> String {
        match &self.kind {
            SamplerKind::Constant(v) => v.to_string(),
            SamplerKind::Function {
                name, arguments, ..
            } => format!("{name}({})", arguments.join(", ")),
            SamplerKind::Combinator {
                operator,
                left,
                right,
            } => format!("({} {operator} {})", left.expression(), right.expression()),
        }
    }
}

impl Emit for SamplerNode {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        match &self.kind {
            SamplerKind::Constant(value) => {
                out.scalar("type", "CONSTANT");
                match value {
                    SamplerValue::Float(v) => out.scalar("value", *v),
                    SamplerValue::Integer(v) => out.scalar("value", *v),
                }
            }
            SamplerKind::Function {
                name,
                expression,
                arguments,
            } => {
                out.scalar("type", "FUNCTION");
                out.scalar("name", name);
                out.scalar("expression", expression);
                out.list("arguments", arguments, |e, a| {
                    e.value(a);
                    Ok(())
                })?;
            }
            SamplerKind::Combinator {
                operator,
                left,
                right,
            } => {
                out.scalar("type", "ARITHMETIC");
                out.map("left", |e| e.node(left.as_ref()))?;
                out.scalar("operator", operator.token());
                out.map("right", |e| e.node(right.as_ref()))?;
            }
        }

        let parameters = self.parameters();
        if !parameters.is_empty() {
            out.map("parameters", |e| {
                for (name, value) in &parameters {
                    e.scalar(name, *value);
                }
                Ok(())
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Mutable sampler under construction.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseSampler {
    root: SamplerNode,
}

impl NoiseSampler {
    /// Starts a sampler whose tree is just `root`.
    pub fn new(root: SamplerNode) -> Self {
        Self { root }
    }

    /// Grows the tree: the current root becomes the left operand of a new
    /// combinator and `node` the right one.
    pub fn attach(&mut self, operator: ArithmeticOperation, node: SamplerNode) -> &mut Self {
        let left = std::mem::replace(&mut self.root, SamplerNode::constant(0.0));
        self.root = SamplerNode::combine(operator, left, node);
        self
    }

    /// Binds a local parameter on the root node.
    pub fn bind(&mut self, name: impl Into<String>, value: f32) -> &mut Self {
        self.root.bind(name, value);
        self
    }

    /// Binds `name` on every node currently in the tree.
    pub fn bind_global(&mut self, name: impl AsRef<str>, value: f32) -> &mut Self {
        self.root.bind_global(name.as_ref(), value);
        self
    }

    pub fn root(&self) -> &SamplerNode {
        &self.root
    }

    /// Validates the tree and freezes it.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::InvalidSamplerConfiguration`] if any function node
    /// has an argument without a bound value.
    pub fn build(self) -> Result<BuiltSampler> {
        self.root.validate()?;
        debug!(
            nodes = self.root.node_count(),
            expression = %self.root.expression(),
            "sampler built"
        );
        Ok(BuiltSampler { root: self.root })
    }
}

impl Emit for NoiseSampler {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        self.root.emit(out)
    }
}

/// Validated, immutable sampler tree.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltSampler {
    root: SamplerNode,
}

impl BuiltSampler {
    pub fn root(&self) -> &SamplerNode {
        &self.root
    }

    /// Infix rendering of the whole tree.
    pub fn expression(&self) -> String {
        self.root.expression()
    }
}

impl Emit for BuiltSampler {
    fn emit(&self, out: &mut Emitter) -> Result<()> {
        self.root.emit(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ridge() -> SamplerNode {
        SamplerNode::function("ridge", "abs(x) * amp", ["x", "amp"])
    }

    #[test]
    fn test_operator_tokens() {
        let tokens: Vec<_> = [
            ArithmeticOperation::Add,
            ArithmeticOperation::Subtract,
            ArithmeticOperation::Multiply,
            ArithmeticOperation::Divide,
        ]
        .iter()
        .map(|o| o.token())
        .collect();
        assert_eq!(tokens, ["+", "-", "*", "/"]);
    }

    #[test]
    fn test_constant_int_truncates_toward_zero() {
        assert_eq!(
            SamplerNode::constant_int(2.9).kind(),
            &SamplerKind::Constant(SamplerValue::Integer(2))
        );
        assert_eq!(
            SamplerNode::constant_int(-2.9).kind(),
            &SamplerKind::Constant(SamplerValue::Integer(-2))
        );
        assert_eq!(
            SamplerNode::constant_int(7.0).to_fragment().unwrap(),
            "type: CONSTANT\nvalue: 7\n"
        );
    }

    #[test]
    fn test_large_whole_float_keeps_float_form() {
        assert_eq!(
            SamplerNode::constant(1e16).to_fragment().unwrap(),
            "type: CONSTANT\nvalue: 1.0e+16\n"
        );
    }

    #[test]
    fn test_missing_argument_fails_build() {
        let sampler = NoiseSampler::new(ridge().with_param("x", 1.0));
        let err = sampler.build().unwrap_err();
        assert_eq!(
            err,
            DescriptorError::InvalidSamplerConfiguration {
                node: "ridge".into(),
                reason: "argument `amp` has no bound value".into(),
            }
        );
    }

    #[test]
    fn test_missing_argument_deep_in_tree_fails_build() {
        let mut sampler = NoiseSampler::new(SamplerNode::constant(1.0));
        sampler.attach(ArithmeticOperation::Add, ridge());
        assert!(sampler.build().is_err());
    }

    #[test]
    fn test_global_binding_satisfies_arguments() {
        let mut sampler = NoiseSampler::new(SamplerNode::constant(1.0));
        sampler
            .attach(ArithmeticOperation::Multiply, ridge())
            .bind_global("x", 0.5)
            .bind_global("amp", 2.0);
        let built = sampler.build().unwrap();
        assert_eq!(built.expression(), "(1.0 * ridge(x, amp))");
    }

    #[test]
    fn test_local_overrides_global_regardless_of_order() {
        let mut sampler = NoiseSampler::new(SamplerNode::constant(1.0).with_param("amp", 9.0));
        sampler.attach(ArithmeticOperation::Add, SamplerNode::constant(2.0));
        sampler.bind_global("amp", 2.0);

        let SamplerKind::Combinator { left, right, .. } = sampler.root().kind() else {
            panic!("root should be a combinator");
        };
        assert_eq!(left.parameter("amp"), Some(9.0));
        assert_eq!(right.parameter("amp"), Some(2.0));
    }

    #[test]
    fn test_attached_after_global_does_not_inherit() {
        let mut sampler = NoiseSampler::new(SamplerNode::constant(1.0));
        sampler.attach(ArithmeticOperation::Add, SamplerNode::constant(2.0));
        sampler.bind_global("amp", 3.0);
        sampler.attach(ArithmeticOperation::Subtract, SamplerNode::constant(4.0));

        let root = sampler.root();
        assert_eq!(root.parameter("amp"), None);
        let SamplerKind::Combinator { left, right, .. } = root.kind() else {
            panic!("root should be a combinator");
        };
        assert_eq!(left.parameter("amp"), Some(3.0));
        assert_eq!(right.parameter("amp"), None);
    }

    #[test]
    fn test_combinator_fragment_layout() {
        let mut sampler = NoiseSampler::new(SamplerNode::constant(1.5));
        sampler.attach(ArithmeticOperation::Divide, SamplerNode::constant_int(4.0));
        let expected = "\
type: ARITHMETIC
left:
  type: CONSTANT
  value: 1.5
operator: /
right:
  type: CONSTANT
  value: 4
";
        assert_eq!(sampler.build().unwrap().to_fragment().unwrap(), expected);
    }

    #[test]
    fn test_function_fragment_lists_sorted_parameters() {
        let node = ridge().with_param("x", 1.0).with_param("amp", 2.0);
        let expected = "\
type: FUNCTION
name: ridge
expression: abs(x) * amp
arguments:
  - x
  - amp
parameters:
  amp: 2.0
  x: 1.0
";
        assert_eq!(node.to_fragment().unwrap(), expected);
    }

    #[test]
    fn test_subtract_token_is_quoted() {
        let node = SamplerNode::combine(
            ArithmeticOperation::Subtract,
            SamplerNode::constant(1.0),
            SamplerNode::constant(1.0),
        );
        assert!(node.to_fragment().unwrap().contains("operator: \"-\"\n"));
    }
}
