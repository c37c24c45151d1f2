use frost_core::{FrostError, FrostResult, Vec2, Vec3};

use crate::node::{ArgValue, Node, NodeKind, NodeTree, SpecialKind};
use crate::registry::Registry;

/// A builder for constructing scene nodes programmatically.
/// Useful for SDKs, generated scenes, and unit testing.
pub struct NodeBuilder<'r> {
    registry: &'r Registry,
    node: Node,
}

impl<'r> NodeBuilder<'r> {
    /// Start a registry-backed node from its `<CATEGORY>:<name>` symbol.
    pub fn def(registry: &'r Registry, symbol: &str) -> FrostResult<Self> {
        let node = registry
            .resolve_symbol(symbol)
            .and_then(|idx| Node::from_def(idx, registry))
            .ok_or_else(|| FrostError::InvalidArgument(format!("unknown node kind '{}'", symbol)))?;
        Ok(Self { registry, node })
    }

    /// Start a special (non-registry) node.
    pub fn special(registry: &'r Registry, kind: SpecialKind) -> Self {
        Self {
            registry,
            node: Node::special(kind),
        }
    }

    /// Set an argument slot by name.
    pub fn arg(mut self, slot: &str, value: ArgValue) -> FrostResult<Self> {
        let NodeKind::Def(idx) = self.node.kind else {
            return Err(FrostError::InvalidArgument(format!(
                "'{}' takes no arguments",
                self.node.kind.symbol(self.registry)
            )));
        };
        let def = self
            .registry
            .get(idx)
            .ok_or_else(|| FrostError::InvalidArgument(format!("unknown definition {}", idx)))?;
        let index = def.arg_index(slot).ok_or_else(|| {
            FrostError::InvalidArgument(format!("'{}' has no argument '{}'", def.symbol(), slot))
        })?;
        if !value.matches(def.args[index].ty) {
            return Err(FrostError::InvalidArgument(format!(
                "argument '{}' of '{}' expects {} component(s)",
                slot,
                def.symbol(),
                def.args[index].ty.arity()
            )));
        }
        self.node.args[index] = value;
        Ok(self)
    }

    pub fn scalar(self, slot: &str, value: f32) -> FrostResult<Self> {
        self.arg(slot, ArgValue::Scalar(value))
    }

    pub fn vec2(self, slot: &str, x: f32, y: f32) -> FrostResult<Self> {
        self.arg(slot, ArgValue::Vec2(Vec2::new(x, y)))
    }

    pub fn vec3(self, slot: &str, x: f32, y: f32, z: f32) -> FrostResult<Self> {
        self.arg(slot, ArgValue::Vec3(Vec3::new(x, y, z)))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.node.name = Some(name.into());
        self
    }

    pub fn inline_child(mut self, inline: bool) -> Self {
        self.node.inline_child = inline;
        self
    }

    /// Append a child. First added is combined first.
    pub fn child(mut self, child: Node) -> Self {
        self.node.add_child(child);
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

/// A builder for a whole tree: collects the root's children.
#[derive(Default)]
pub struct TreeBuilder {
    tree: NodeTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) -> &mut Self {
        self.tree.root.add_child(node);
        self
    }

    pub fn build(self) -> NodeTree {
        self.tree
    }
}
