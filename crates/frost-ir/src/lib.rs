//! # frost-ir
//!
//! The node definition registry and the scene tree.
//!
//! The registry is built once, finalized into an immutable sorted catalog,
//! and shared by reference with the parser and the code generator. The
//! tree is what the parser produces and the generator consumes.

pub mod builder;
pub mod catalog;
pub mod node;
pub mod nodedef;
pub mod registry;
pub mod validate;

pub use builder::{NodeBuilder, TreeBuilder};
pub use node::{ArgValue, Node, NodeKind, NodeTree, SpecialKind, SpecialRole};
pub use nodedef::{ArgSlot, ArgType, Category, DefIndex, FnRole, GlslFn, NodeDef};
pub use registry::{Registry, RegistryBuilder};
pub use validate::validate_tree;
