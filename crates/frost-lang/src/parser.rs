//! Statement parser: a state machine fed one lexical item at a time.
//!
//! Every accepted item advances exactly one state. The parser builds into
//! its own tree, so a failed parse never touches a tree the caller holds.

use frost_core::{FrostError, FrostResult};
use frost_ir::{Node, NodeKind, NodeTree, Registry, SpecialKind};

/// Deepest node nesting a scene file may use.
pub const MAX_DEPTH: usize = 256;

/// What the parser accepts next. The driver uses it to decide how to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Symbol,
    SymbolOrEol,
    /// Raw text up to the end of the line.
    RestOfLine,
    Float,
    Eol,
    /// The parser failed; nothing is accepted.
    Nothing,
}

/// One lexical item handed to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Word(&'a str),
    Text(&'a str),
    Eol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetKey {
    Name,
    Inline,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    NodeHeader,
    ArgHeader,
    ArgValue {
        slot: usize,
        arity: usize,
        filled: usize,
    },
    SetHeader,
    SetValue(SetKey),
    EndOfStatement,
    Failed {
        message: String,
        line: usize,
    },
}

pub struct Parser<'r> {
    registry: &'r Registry,
    file: String,
    state: State,
    stack: Vec<Node>,
    tree: NodeTree,
    line: usize,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r Registry, file: impl Into<String>) -> Self {
        Self {
            registry,
            file: file.into(),
            state: State::Idle,
            stack: Vec::new(),
            tree: NodeTree::new(),
            line: 1,
        }
    }

    pub fn expect(&self) -> Expect {
        match self.state {
            State::Idle => Expect::SymbolOrEol,
            State::NodeHeader | State::ArgHeader | State::SetHeader => Expect::Symbol,
            State::SetValue(SetKey::Name) => Expect::RestOfLine,
            State::SetValue(SetKey::Inline) => Expect::Symbol,
            State::ArgValue { .. } => Expect::Float,
            State::EndOfStatement => Expect::Eol,
            State::Failed { .. } => Expect::Nothing,
        }
    }

    /// Number of nodes opened but not yet closed.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Feed one item. After an error every call returns the same error.
    pub fn push(&mut self, input: Input<'_>, line: usize) -> FrostResult<()> {
        if let State::Failed { message, line } = &self.state {
            return Err(FrostError::parse(message.clone(), &self.file, *line));
        }
        self.line = line;
        let current = std::mem::replace(&mut self.state, State::Idle);
        match self.step(current, input) {
            Ok(next) => {
                tracing::trace!("{}:{} {:?} -> {:?}", self.file, line, input, next);
                self.state = next;
                Ok(())
            }
            Err(message) => {
                self.state = State::Failed {
                    message: message.clone(),
                    line,
                };
                Err(FrostError::parse(message, &self.file, line))
            }
        }
    }

    /// Close out the parse once input is exhausted.
    pub fn finish(self) -> FrostResult<NodeTree> {
        match self.state {
            State::Failed { message, line } => Err(FrostError::parse(message, &self.file, line)),
            State::Idle if self.stack.is_empty() => {
                tracing::debug!("parsed {}: {} nodes", self.file, self.tree.node_count());
                Ok(self.tree)
            }
            State::Idle => Err(FrostError::parse(
                format!("{} unclosed node(s) at end of input", self.stack.len()),
                &self.file,
                self.line,
            )),
            _ => Err(FrostError::parse(
                "unexpected end of input",
                &self.file,
                self.line,
            )),
        }
    }

    fn step(&mut self, state: State, input: Input<'_>) -> Result<State, String> {
        match (state, input) {
            (State::Idle, Input::Eol) => Ok(State::Idle),
            (State::Idle, Input::Word(word)) => self.statement(word),

            (State::NodeHeader, Input::Word(symbol)) => {
                let node = self.resolve_kind(symbol)?;
                self.stack.push(node);
                Ok(State::EndOfStatement)
            }

            (State::ArgHeader, Input::Word(slot)) => self.arg_slot(slot),

            (State::ArgValue { slot, arity, filled }, Input::Word(text)) => {
                let value = text
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| format!("expected float, found '{}'", text))?;
                let node = self.top()?;
                if !node
                    .args
                    .get_mut(slot)
                    .is_some_and(|a| a.set_component(filled, value))
                {
                    return Err(format!("argument slot {} cannot take component {}", slot, filled));
                }
                if filled + 1 == arity {
                    Ok(State::EndOfStatement)
                } else {
                    Ok(State::ArgValue {
                        slot,
                        arity,
                        filled: filled + 1,
                    })
                }
            }
            (State::ArgValue { .. }, Input::Eol) => {
                Err("expected float, found end of line".to_string())
            }

            (State::SetHeader, Input::Word(key)) => match key {
                "name" => Ok(State::SetValue(SetKey::Name)),
                "inline" => Ok(State::SetValue(SetKey::Inline)),
                other => Err(format!("unknown set key '{}'", other)),
            },
            (State::SetValue(SetKey::Name), Input::Text(text)) => {
                let name = text
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .unwrap_or(text);
                if name.is_empty() {
                    return Err("node name must not be empty".to_string());
                }
                self.top()?.name = Some(name.to_string());
                Ok(State::EndOfStatement)
            }
            (State::SetValue(SetKey::Inline), Input::Word(flag)) => {
                let inline = match flag {
                    "1" | "true" => true,
                    "0" | "false" => false,
                    other => {
                        return Err(format!("expected 0, 1, false or true, found '{}'", other))
                    }
                };
                self.top()?.inline_child = inline;
                Ok(State::EndOfStatement)
            }

            (State::EndOfStatement, Input::Eol) => Ok(State::Idle),
            (State::EndOfStatement, Input::Word(extra) | Input::Text(extra)) => {
                Err(format!("expected end of line, found '{}'", extra))
            }

            (_, Input::Eol) => Err("unexpected end of line".to_string()),
            (state, input) => Err(format!("unexpected {:?} in state {:?}", input, state)),
        }
    }

    fn statement(&mut self, keyword: &str) -> Result<State, String> {
        match keyword {
            "node" if self.stack.len() >= MAX_DEPTH => {
                Err(format!("nodes nested deeper than {}", MAX_DEPTH))
            }
            "node" => Ok(State::NodeHeader),
            "endnode" => {
                let node = self
                    .stack
                    .pop()
                    .ok_or_else(|| "endnode without node".to_string())?;
                if node.inline_child && node.children.len() != 1 {
                    return Err(format!(
                        "{} is marked inline but has {} children",
                        node.kind.symbol(self.registry),
                        node.children.len()
                    ));
                }
                match self.stack.last_mut() {
                    Some(parent) => parent.add_child(node),
                    None => self.tree.root.add_child(node),
                }
                Ok(State::EndOfStatement)
            }
            "arg" => {
                self.top()?;
                Ok(State::ArgHeader)
            }
            "set" => {
                self.top()?;
                Ok(State::SetHeader)
            }
            other => Err(format!("unknown statement '{}'", other)),
        }
    }

    fn resolve_kind(&self, symbol: &str) -> Result<Node, String> {
        let node = if symbol.contains(':') {
            self.registry
                .resolve_symbol(symbol)
                .and_then(|idx| Node::from_def(idx, self.registry))
        } else {
            SpecialKind::parse(symbol).map(Node::special)
        };
        node.ok_or_else(|| format!("unknown node kind '{}'", symbol))
    }

    fn arg_slot(&mut self, slot: &str) -> Result<State, String> {
        let registry = self.registry;
        let node = self.top()?;
        let NodeKind::Def(idx) = node.kind else {
            return Err(format!("'{}' takes no arguments", node.kind.symbol(registry)));
        };
        let def = registry
            .get(idx)
            .ok_or_else(|| format!("unknown definition {}", idx))?;
        let index = def
            .arg_index(slot)
            .ok_or_else(|| format!("{} has no argument '{}'", def.symbol(), slot))?;
        Ok(State::ArgValue {
            slot: index,
            arity: def.args[index].ty.arity(),
            filled: 0,
        })
    }

    fn top(&mut self) -> Result<&mut Node, String> {
        self.stack
            .last_mut()
            .ok_or_else(|| "statement outside of node".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::Vec3;
    use frost_ir::ArgValue;

    fn feed(parser: &mut Parser<'_>, items: &[Input<'_>]) -> FrostResult<()> {
        for item in items {
            parser.push(*item, 1)?;
        }
        Ok(())
    }

    #[test]
    fn test_expectations_follow_states() {
        let reg = Registry::builtin().unwrap();
        let mut p = Parser::new(&reg, "t.frost");
        assert_eq!(p.expect(), Expect::SymbolOrEol);
        p.push(Input::Word("node"), 1).unwrap();
        assert_eq!(p.expect(), Expect::Symbol);
        p.push(Input::Word("TX3D:translate"), 1).unwrap();
        assert_eq!(p.expect(), Expect::Eol);
        p.push(Input::Eol, 1).unwrap();
        p.push(Input::Word("arg"), 2).unwrap();
        p.push(Input::Word("translation"), 2).unwrap();
        assert_eq!(p.expect(), Expect::Float);
        p.push(Input::Word("1"), 2).unwrap();
        p.push(Input::Word("2"), 2).unwrap();
        assert_eq!(p.expect(), Expect::Float);
        p.push(Input::Word("3"), 2).unwrap();
        assert_eq!(p.expect(), Expect::Eol);
        p.push(Input::Eol, 2).unwrap();
        p.push(Input::Word("set"), 3).unwrap();
        p.push(Input::Word("name"), 3).unwrap();
        assert_eq!(p.expect(), Expect::RestOfLine);
        p.push(Input::Text("\"offset\""), 3).unwrap();
        p.push(Input::Eol, 3).unwrap();
        p.push(Input::Word("endnode"), 4).unwrap();
        p.push(Input::Eol, 4).unwrap();

        let tree = p.finish().unwrap();
        let node = &tree.root.children[0];
        assert_eq!(node.name.as_deref(), Some("offset"));
        assert_eq!(node.args[0], ArgValue::Vec3(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_error_state_is_sticky() {
        let reg = Registry::builtin().unwrap();
        let mut p = Parser::new(&reg, "t.frost");
        let first = p.push(Input::Word("endnode"), 7).unwrap_err();
        assert_eq!(p.expect(), Expect::Nothing);
        let second = p.push(Input::Eol, 8).unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(second.line(), Some(7));
    }

    #[test]
    fn test_unknown_kind_quotes_text() {
        let reg = Registry::builtin().unwrap();
        let mut p = Parser::new(&reg, "t.frost");
        let err = feed(&mut p, &[Input::Word("node"), Input::Word("SDF3D:blob")]).unwrap_err();
        assert!(err.to_string().contains("'SDF3D:blob'"));
    }

    #[test]
    fn test_arg_on_special_kind() {
        let reg = Registry::builtin().unwrap();
        let mut p = Parser::new(&reg, "t.frost");
        let err = feed(
            &mut p,
            &[
                Input::Word("node"),
                Input::Word("material"),
                Input::Eol,
                Input::Word("arg"),
                Input::Word("radius"),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("takes no arguments"));
    }

    #[test]
    fn test_set_outside_node() {
        let reg = Registry::builtin().unwrap();
        let mut p = Parser::new(&reg, "t.frost");
        assert!(p.push(Input::Word("set"), 1).is_err());
    }

    #[test]
    fn test_inline_flag_values() {
        let reg = Registry::builtin().unwrap();
        let mut p = Parser::new(&reg, "t.frost");
        let err = feed(
            &mut p,
            &[
                Input::Word("node"),
                Input::Word("view3d"),
                Input::Eol,
                Input::Word("set"),
                Input::Word("inline"),
                Input::Word("yes"),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("found 'yes'"));
    }

    #[test]
    fn test_unclosed_nodes_at_finish() {
        let reg = Registry::builtin().unwrap();
        let mut p = Parser::new(&reg, "t.frost");
        feed(
            &mut p,
            &[
                Input::Word("node"),
                Input::Word("view3d"),
                Input::Eol,
                Input::Word("node"),
                Input::Word("material"),
                Input::Eol,
            ],
        )
        .unwrap();
        assert_eq!(p.depth(), 2);
        let err = p.finish().unwrap_err();
        assert!(err.to_string().contains("2 unclosed node(s) at end of input"));
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        let reg = Registry::builtin().unwrap();
        for text in ["inf", "-inf", "NaN", "1e39"] {
            let mut p = Parser::new(&reg, "t.frost");
            feed(&mut p, &[Input::Word("node"), Input::Word("SDF3D:sphere"), Input::Eol]).unwrap();
            p.push(Input::Word("arg"), 2).unwrap();
            p.push(Input::Word("radius"), 2).unwrap();
            let err = p.push(Input::Word(text), 2).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("parse error: expected float, found '{}' at t.frost:2", text)
            );
        }
    }

    #[test]
    fn test_nesting_depth_is_limited() {
        let reg = Registry::builtin().unwrap();
        let mut p = Parser::new(&reg, "t.frost");
        for line in 1..=MAX_DEPTH {
            p.push(Input::Word("node"), line).unwrap();
            p.push(Input::Word("view3d"), line).unwrap();
            p.push(Input::Eol, line).unwrap();
        }
        assert_eq!(p.depth(), MAX_DEPTH);
        let err = p.push(Input::Word("node"), MAX_DEPTH + 1).unwrap_err();
        assert_eq!(err.line(), Some(MAX_DEPTH + 1));
        assert!(err.to_string().contains("nested deeper than 256"));
    }
}
