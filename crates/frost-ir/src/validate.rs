use frost_core::{Dimension, FrostError};

use crate::node::{Node, NodeKind, NodeTree, SpecialRole};
use crate::nodedef::Category;
use crate::registry::Registry;

/// Validate a scene tree for structural correctness.
///
/// Applies the same dimension and arity rules the code generator enforces,
/// but collects every problem instead of stopping at the first.
pub fn validate_tree(
    tree: &NodeTree,
    registry: &Registry,
    dimension: Dimension,
) -> Result<(), Vec<FrostError>> {
    let mut errors = Vec::new();
    check_node(&tree.root, registry, dimension, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn describe(node: &Node, registry: &Registry) -> String {
    let symbol = node.kind.symbol(registry);
    match &node.name {
        Some(name) => format!("{} '{}'", symbol, name),
        None => symbol,
    }
}

fn check_node(node: &Node, registry: &Registry, dim: Dimension, errors: &mut Vec<FrostError>) {
    if node.inline_child && node.children.len() != 1 {
        errors.push(FrostError::Validation(format!(
            "{} is marked inline but has {} children",
            describe(node, registry),
            node.children.len()
        )));
    }

    let child_dim = match node.kind {
        NodeKind::Root => dim,
        NodeKind::Special(kind) => match kind.role() {
            // children belong to another subsystem
            SpecialRole::Opaque => return,
            SpecialRole::Group => dim,
            SpecialRole::Bounded => {
                if node.children.len() != 2 {
                    errors.push(FrostError::Validation(format!(
                        "{} needs exactly 2 children (subject, bound), found {}",
                        describe(node, registry),
                        node.children.len()
                    )));
                }
                dim
            }
        },
        NodeKind::Def(idx) => {
            let Some(def) = registry.get(idx) else {
                errors.push(FrostError::Validation(format!(
                    "node references unknown definition {}",
                    idx
                )));
                return;
            };
            if node.args.len() != def.args.len()
                || node.args.iter().zip(&def.args).any(|(v, s)| !v.matches(s.ty))
            {
                errors.push(FrostError::Validation(format!(
                    "{} has arguments that do not match its definition",
                    describe(node, registry)
                )));
            }
            if let Some(required) = def.category.input_dimension() {
                if required != dim {
                    errors.push(FrostError::Validation(format!(
                        "{} needs a {} context but is used in {}",
                        describe(node, registry),
                        required,
                        dim
                    )));
                }
            }
            if def.category.is_leaf() && !node.children.is_empty() {
                errors.push(FrostError::Validation(format!(
                    "{} is a primitive and cannot have children",
                    describe(node, registry)
                )));
            }
            if def.category == Category::Volumize && dim != Dimension::Three {
                // children would be checked against a wrong reduced dimension
                return;
            }
            def.category.child_dimension(dim)
        }
    };

    for child in &node.children {
        check_node(child, registry, child_dim, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{NodeBuilder, TreeBuilder};
    use crate::node::SpecialKind;

    fn tree_of(nodes: Vec<Node>) -> NodeTree {
        let mut tb = TreeBuilder::new();
        for n in nodes {
            tb.add(n);
        }
        tb.build()
    }

    #[test]
    fn test_valid_extrusion() {
        let reg = Registry::builtin().unwrap();
        let circle = NodeBuilder::def(&reg, "SDF2D:circle").unwrap().build();
        let extrude = NodeBuilder::def(&reg, "VOLUMIZE:extrude")
            .unwrap()
            .child(circle)
            .build();
        let tree = tree_of(vec![extrude]);
        assert!(validate_tree(&tree, &reg, Dimension::Three).is_ok());
    }

    #[test]
    fn test_3d_leaf_in_2d_context() {
        let reg = Registry::builtin().unwrap();
        let sphere = NodeBuilder::def(&reg, "SDF3D:sphere").unwrap().build();
        let extrude = NodeBuilder::def(&reg, "VOLUMIZE:extrude")
            .unwrap()
            .child(sphere)
            .build();
        let errors = validate_tree(&tree_of(vec![extrude]), &reg, Dimension::Three).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("SDF3D:sphere needs a 3D context"));
    }

    #[test]
    fn test_collects_all_errors() {
        let reg = Registry::builtin().unwrap();
        let circle = NodeBuilder::def(&reg, "SDF2D:circle").unwrap().build();
        let sphere = NodeBuilder::def(&reg, "SDF3D:sphere")
            .unwrap()
            .child(NodeBuilder::def(&reg, "SDF3D:box").unwrap().build())
            .build();
        let optimize = NodeBuilder::special(&reg, SpecialKind::Optimize)
            .child(NodeBuilder::def(&reg, "SDF3D:box").unwrap().build())
            .build();
        let errors =
            validate_tree(&tree_of(vec![circle, sphere, optimize]), &reg, Dimension::Three)
                .unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_opaque_subtrees_are_skipped() {
        let reg = Registry::builtin().unwrap();
        let procedure = NodeBuilder::special(&reg, SpecialKind::Procedure)
            .child(NodeBuilder::def(&reg, "SDF2D:circle").unwrap().build())
            .build();
        assert!(validate_tree(&tree_of(vec![procedure]), &reg, Dimension::Three).is_ok());
    }

    #[test]
    fn test_inline_flag_needs_one_child() {
        let reg = Registry::builtin().unwrap();
        let group = NodeBuilder::special(&reg, SpecialKind::Material)
            .inline_child(true)
            .build();
        let errors = validate_tree(&tree_of(vec![group]), &reg, Dimension::Three).unwrap_err();
        assert!(errors[0].to_string().contains("marked inline"));
    }
}
