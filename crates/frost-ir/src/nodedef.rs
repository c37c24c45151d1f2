//! Node definitions: the catalog entries describing each buildable node kind.

use serde::{Deserialize, Serialize};

use frost_core::{Dimension, FrostError};

/// Marker standing in for a template's function name. Every template holds
/// exactly one.
pub const PLACEHOLDER: &str = "$FN";

/// Maximum number of argument slots a definition may declare.
pub const MAX_NODEDEF_ARGS: usize = 4;

/// Node definition category.
///
/// The declaration order is the registry's primary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Sdf3d,
    Sdf2d,
    Tx3d,
    Tx2d,
    Volumize,
    D1,
    D2,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Sdf3d,
        Category::Sdf2d,
        Category::Tx3d,
        Category::Tx2d,
        Category::Volumize,
        Category::D1,
        Category::D2,
    ];

    /// DSL spelling, also used as the generated function name prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Sdf3d => "SDF3D",
            Category::Sdf2d => "SDF2D",
            Category::Tx3d => "TX3D",
            Category::Tx2d => "TX2D",
            Category::Volumize => "VOLUMIZE",
            Category::D1 => "D1",
            Category::D2 => "D2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// The role every definition of this category must provide.
    pub fn primary_role(self) -> FnRole {
        match self {
            Category::Sdf3d | Category::Sdf2d => FnRole::Sdf,
            Category::Tx3d | Category::Tx2d | Category::Volumize => FnRole::Tx,
            Category::D1 => FnRole::D1,
            Category::D2 => FnRole::D2,
        }
    }

    /// Whether a template of `role` may be attached to this category.
    pub fn allows_role(self, role: FnRole) -> bool {
        if role == self.primary_role() {
            return true;
        }
        matches!(
            (self, role),
            (Category::Tx3d | Category::Tx2d | Category::Volumize, FnRole::D1)
        )
    }

    /// Dimension a node of this category must be evaluated in, if fixed.
    pub fn input_dimension(self) -> Option<Dimension> {
        match self {
            Category::Sdf3d | Category::Tx3d | Category::Volumize => Some(Dimension::Three),
            Category::Sdf2d | Category::Tx2d => Some(Dimension::Two),
            Category::D1 | Category::D2 => None,
        }
    }

    /// Dimension children are evaluated in, given the node's own dimension.
    pub fn child_dimension(self, dim: Dimension) -> Dimension {
        match self {
            Category::Volumize => Dimension::Two,
            _ => dim,
        }
    }

    /// Leaves produce a distance directly and take no children.
    pub fn is_leaf(self) -> bool {
        matches!(self, Category::Sdf3d | Category::Sdf2d)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = FrostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s)
            .ok_or_else(|| FrostError::InvalidArgument(format!("unknown category '{}'", s)))
    }
}

/// Value type of an argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgType {
    Radius,
    Scalar,
    Dim2,
    Pos2,
    Dim3,
    Pos3,
}

impl ArgType {
    /// Number of floats a value of this type takes.
    pub fn arity(self) -> usize {
        match self {
            ArgType::Radius | ArgType::Scalar => 1,
            ArgType::Dim2 | ArgType::Pos2 => 2,
            ArgType::Dim3 | ArgType::Pos3 => 3,
        }
    }

    pub fn glsl_type(self) -> &'static str {
        match self.arity() {
            1 => "float",
            2 => "vec2",
            _ => "vec3",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArgType::Radius => "radius",
            ArgType::Scalar => "scalar",
            ArgType::Dim2 => "dim2",
            ArgType::Pos2 => "pos2",
            ArgType::Dim3 => "dim3",
            ArgType::Pos3 => "pos3",
        }
    }
}

/// A named, typed argument slot of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgSlot {
    pub name: String,
    pub ty: ArgType,
}

/// The signature a shader template fills for its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FnRole {
    /// `float f(vecN p, args..)`
    Sdf,
    /// `vecM f(vecN p, args..)`
    Tx,
    /// `float f(float d, args..)`, or `float f(vecN p, float d, args..)` as
    /// the post-processor of a transform.
    D1,
    /// `float f(float d0, float d1, args..)`
    D2,
}

impl FnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            FnRole::Sdf => "sdf",
            FnRole::Tx => "tx",
            FnRole::D1 => "d1",
            FnRole::D2 => "d2",
        }
    }
}

/// Globally unique function name for a template of `role`.
///
/// The category's primary role gets the bare `<CATEGORY>_<name>` form; other
/// roles append the role suffix.
pub fn unique_fn_name(category: Category, name: &str, role: FnRole) -> String {
    if role == category.primary_role() {
        format!("{}_{}", category.as_str(), name)
    } else {
        format!("{}_{}_{}", category.as_str(), name, role.as_str())
    }
}

/// A shader function with its placeholder already bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlslFn {
    pub role: FnRole,
    pub name: String,
    pub source: String,
}

/// Position of a definition inside a finalized [`crate::Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefIndex(pub(crate) usize);

impl DefIndex {
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for DefIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node kind descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDef {
    pub category: Category,
    pub name: String,
    pub args: Vec<ArgSlot>,
    pub fns: Vec<GlslFn>,
}

impl NodeDef {
    /// `<CATEGORY>:<name>`, the spelling used by `node` statements.
    pub fn symbol(&self) -> String {
        format!("{}:{}", self.category.as_str(), self.name)
    }

    pub fn arg_index(&self, name: &str) -> Option<usize> {
        self.args.iter().position(|a| a.name == name)
    }

    pub fn glsl_fn(&self, role: FnRole) -> Option<&GlslFn> {
        self.fns.iter().find(|f| f.role == role)
    }

    pub fn fn_name(&self, role: FnRole) -> Option<&str> {
        self.glsl_fn(role).map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::parse("sdf3d"), None);
        assert!("BOGUS".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_order_is_declaration_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_allowed_roles() {
        assert!(Category::Tx3d.allows_role(FnRole::Tx));
        assert!(Category::Tx3d.allows_role(FnRole::D1));
        assert!(Category::Volumize.allows_role(FnRole::D1));
        assert!(!Category::Sdf3d.allows_role(FnRole::D1));
        assert!(!Category::D2.allows_role(FnRole::D1));
        assert!(Category::D1.allows_role(FnRole::D1));
    }

    #[test]
    fn test_unique_fn_name() {
        assert_eq!(unique_fn_name(Category::Sdf3d, "sphere", FnRole::Sdf), "SDF3D_sphere");
        assert_eq!(unique_fn_name(Category::Tx3d, "scale", FnRole::Tx), "TX3D_scale");
        assert_eq!(unique_fn_name(Category::Tx3d, "scale", FnRole::D1), "TX3D_scale_d1");
        assert_eq!(unique_fn_name(Category::D2, "union", FnRole::D2), "D2_union");
    }

    #[test]
    fn test_arg_type_arity() {
        assert_eq!(ArgType::Radius.arity(), 1);
        assert_eq!(ArgType::Pos2.arity(), 2);
        assert_eq!(ArgType::Dim3.arity(), 3);
        assert_eq!(ArgType::Dim2.glsl_type(), "vec2");
    }

    #[test]
    fn test_volumize_reduces_dimension() {
        assert_eq!(Category::Volumize.child_dimension(Dimension::Three), Dimension::Two);
        assert_eq!(Category::Tx3d.child_dimension(Dimension::Three), Dimension::Three);
    }
}
