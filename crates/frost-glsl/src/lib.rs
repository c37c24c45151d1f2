//! # frost-glsl
//!
//! Turns a scene tree into a GLSL distance function. Function bodies of the
//! node kinds in use are emitted once each, followed by a single entry point
//! that composes them.

pub mod codegen;
pub mod source;

pub use codegen::{Codegen, CodegenOptions, EMPTY_DISTANCE};
pub use source::GeneratedSource;

use frost_core::FrostResult;
use frost_ir::{NodeTree, Registry};

/// Generate GLSL for `tree` with the given options.
pub fn generate(
    tree: &NodeTree,
    registry: &Registry,
    options: &CodegenOptions,
) -> FrostResult<GeneratedSource> {
    Codegen::new(registry, options.clone()).generate(tree)
}
