use frost_ir::{Node, NodeKind, NodeTree, Registry};

/// Writes a tree back out as canonical DSL.
pub struct Formatter<'r> {
    registry: &'r Registry,
    indent_level: usize,
    output: String,
}

impl<'r> Formatter<'r> {
    pub fn format(tree: &NodeTree, registry: &'r Registry) -> String {
        let mut formatter = Formatter {
            registry,
            indent_level: 0,
            output: String::new(),
        };
        for (i, node) in tree.root.children.iter().enumerate() {
            if i > 0 {
                formatter.output.push('\n');
            }
            formatter.format_node(node);
        }
        formatter.output
    }

    fn push_line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.output.push('\t');
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn format_node(&mut self, node: &Node) {
        self.push_line(&format!("node {}", node.kind.symbol(self.registry)));
        self.indent_level += 1;

        if let Some(name) = &node.name {
            self.push_line(&format!("set name \"{}\"", name));
        }
        if node.inline_child {
            self.push_line("set inline 1");
        }
        if let NodeKind::Def(idx) = node.kind {
            if let Some(def) = self.registry.get(idx) {
                for (slot, value) in def.args.iter().zip(&node.args) {
                    let parts: Vec<String> =
                        value.components().iter().map(|c| c.to_string()).collect();
                    self.push_line(&format!("arg {} {}", slot.name, parts.join(" ")));
                }
            }
        }
        for child in &node.children {
            self.format_node(child);
        }

        self.indent_level -= 1;
        self.push_line("endnode");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_ir::{NodeBuilder, SpecialKind, TreeBuilder};

    #[test]
    fn test_format_nested() {
        let reg = Registry::builtin().unwrap();
        let sphere = NodeBuilder::def(&reg, "SDF3D:sphere")
            .unwrap()
            .scalar("radius", 2.5)
            .unwrap()
            .build();
        let translate = NodeBuilder::def(&reg, "TX3D:translate")
            .unwrap()
            .vec3("translation", 1.0, 0.0, -0.5)
            .unwrap()
            .name("offset")
            .child(sphere)
            .build();
        let mut tb = TreeBuilder::new();
        tb.add(translate);

        let text = Formatter::format(&tb.build(), &reg);
        assert_eq!(
            text,
            "node TX3D:translate\n\
             \tset name \"offset\"\n\
             \targ translation 1 0 -0.5\n\
             \tnode SDF3D:sphere\n\
             \t\targ radius 2.5\n\
             \tendnode\n\
             endnode\n"
        );
    }

    #[test]
    fn test_format_special_with_inline() {
        let reg = Registry::builtin().unwrap();
        let view = NodeBuilder::special(&reg, SpecialKind::View3d)
            .inline_child(true)
            .child(NodeBuilder::special(&reg, SpecialKind::Entity).build())
            .build();
        let mut tb = TreeBuilder::new();
        tb.add(view);
        let text = Formatter::format(&tb.build(), &reg);
        assert!(text.starts_with("node view3d\n\tset inline 1\n\tnode entity\n"));
    }

    #[test]
    fn test_empty_tree_formats_empty() {
        let reg = Registry::builtin().unwrap();
        assert_eq!(Formatter::format(&NodeTree::new(), &reg), "");
    }
}
