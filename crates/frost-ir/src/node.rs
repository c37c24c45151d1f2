use serde::{Deserialize, Serialize};
use serde_json::json;

use frost_core::{Vec2, Vec3};

use crate::nodedef::{ArgType, DefIndex};
use crate::registry::Registry;

/// Node kinds that live outside the registry.
///
/// They belong to the editor, scripting and render layers; the code
/// generator either groups their children or skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Subtree produced by script code.
    Procedure,
    View3d,
    View2d,
    /// Sets the material of its subtree.
    Material,
    RaymarchView,
    WorkLight,
    PathmarchRender,
    /// Bounding-volume optimization: `(subject, bound)`.
    Optimize,
    NavmeshGen,
    Entity,
}

/// How the code generator treats a special kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialRole {
    /// Contributes no geometry; children are not combined.
    Opaque,
    /// Organizational; children are combined with the implicit union.
    Group,
    /// Subject gated by a bounding volume.
    Bounded,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 10] = [
        SpecialKind::Procedure,
        SpecialKind::View3d,
        SpecialKind::View2d,
        SpecialKind::Material,
        SpecialKind::RaymarchView,
        SpecialKind::WorkLight,
        SpecialKind::PathmarchRender,
        SpecialKind::Optimize,
        SpecialKind::NavmeshGen,
        SpecialKind::Entity,
    ];

    /// DSL spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialKind::Procedure => "procedure",
            SpecialKind::View3d => "view3d",
            SpecialKind::View2d => "view2d",
            SpecialKind::Material => "material",
            SpecialKind::RaymarchView => "raymarch_view",
            SpecialKind::WorkLight => "work_light",
            SpecialKind::PathmarchRender => "pathmarch_render",
            SpecialKind::Optimize => "optimize",
            SpecialKind::NavmeshGen => "navmesh_gen",
            SpecialKind::Entity => "entity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub fn role(self) -> SpecialRole {
        match self {
            SpecialKind::Procedure
            | SpecialKind::WorkLight
            | SpecialKind::NavmeshGen
            | SpecialKind::Entity => SpecialRole::Opaque,
            SpecialKind::View3d
            | SpecialKind::View2d
            | SpecialKind::Material
            | SpecialKind::RaymarchView
            | SpecialKind::PathmarchRender => SpecialRole::Group,
            SpecialKind::Optimize => SpecialRole::Bounded,
        }
    }
}

/// What a node instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// The tree root; never written in the DSL.
    Root,
    Def(DefIndex),
    Special(SpecialKind),
}

impl NodeKind {
    /// DSL spelling of the kind (`root` for the root).
    pub fn symbol(&self, registry: &Registry) -> String {
        match self {
            NodeKind::Root => "root".to_string(),
            NodeKind::Def(idx) => registry
                .get(*idx)
                .map(|d| d.symbol())
                .unwrap_or_else(|| format!("<unknown {}>", idx)),
            NodeKind::Special(kind) => kind.as_str().to_string(),
        }
    }
}

/// An argument value, shaped by its slot's [`ArgType`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl ArgValue {
    /// Zero value for a slot type.
    pub fn zeroed(ty: ArgType) -> Self {
        match ty.arity() {
            1 => ArgValue::Scalar(0.0),
            2 => ArgValue::Vec2(Vec2::zero()),
            _ => ArgValue::Vec3(Vec3::zero()),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            ArgValue::Scalar(_) => 1,
            ArgValue::Vec2(_) => 2,
            ArgValue::Vec3(_) => 3,
        }
    }

    pub fn matches(&self, ty: ArgType) -> bool {
        self.arity() == ty.arity()
    }

    /// Overwrite component `index`; returns false when out of range.
    pub fn set_component(&mut self, index: usize, value: f32) -> bool {
        let slot = match self {
            ArgValue::Scalar(v) => (index == 0).then_some(v),
            ArgValue::Vec2(v) => v.component_mut(index),
            ArgValue::Vec3(v) => v.component_mut(index),
        };
        match slot {
            Some(dst) => {
                *dst = value;
                true
            }
            None => false,
        }
    }

    pub fn components(&self) -> Vec<f32> {
        match self {
            ArgValue::Scalar(v) => vec![*v],
            ArgValue::Vec2(v) => v.components().to_vec(),
            ArgValue::Vec3(v) => v.components().to_vec(),
        }
    }
}

/// A node in the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// One value per argument slot of the referenced definition.
    pub args: Vec<ArgValue>,
    pub name: Option<String>,
    /// Present the single child as an alias of this node.
    pub inline_child: bool,
    pub children: Vec<Node>,
}

impl Node {
    /// An empty root.
    pub fn root() -> Self {
        Self::bare(NodeKind::Root)
    }

    /// A registry-backed node with zeroed arguments.
    ///
    /// Returns `None` if `index` does not belong to `registry`.
    pub fn from_def(index: DefIndex, registry: &Registry) -> Option<Self> {
        let def = registry.get(index)?;
        let mut node = Self::bare(NodeKind::Def(index));
        node.args = def.args.iter().map(|a| ArgValue::zeroed(a.ty)).collect();
        Some(node)
    }

    pub fn special(kind: SpecialKind) -> Self {
        Self::bare(NodeKind::Special(kind))
    }

    fn bare(kind: NodeKind) -> Self {
        Self {
            kind,
            args: Vec::new(),
            name: None,
            inline_child: false,
            children: Vec::new(),
        }
    }

    pub fn def_index(&self) -> Option<DefIndex> {
        match self.kind {
            NodeKind::Def(idx) => Some(idx),
            _ => None,
        }
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Follow inline-child aliases down to the node that decides whether
    /// this entry presents as a leaf or a composite.
    pub fn effective(&self) -> &Node {
        match self.children.as_slice() {
            [only] if self.inline_child => only.effective(),
            _ => self,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.effective().children.is_empty()
    }

    /// This node plus all descendants.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Depth-first pre-order visit.
    pub fn walk<'a>(&'a self, depth: usize, f: &mut impl FnMut(&'a Node, usize)) {
        f(self, depth);
        for child in &self.children {
            child.walk(depth + 1, f);
        }
    }
}

/// The parsed scene: a single root that always exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTree {
    pub root: Node,
}

impl NodeTree {
    pub fn new() -> Self {
        Self { root: Node::root() }
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.root.count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// JSON view with kinds spelled as DSL symbols.
    pub fn to_json(&self, registry: &Registry) -> serde_json::Value {
        node_json(&self.root, registry)
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

fn node_json(node: &Node, registry: &Registry) -> serde_json::Value {
    let args: serde_json::Map<String, serde_json::Value> = match node.kind {
        NodeKind::Def(idx) => registry
            .get(idx)
            .map(|def| {
                def.args
                    .iter()
                    .zip(&node.args)
                    .map(|(slot, value)| (slot.name.clone(), json!(value.components())))
                    .collect()
            })
            .unwrap_or_default(),
        _ => serde_json::Map::new(),
    };
    json!({
        "kind": node.kind.symbol(registry),
        "name": node.name,
        "inline": node.inline_child,
        "args": args,
        "children": node.children.iter().map(|c| node_json(c, registry)).collect::<Vec<_>>(),
    })
}
