//! # frost-lang
//!
//! The scene DSL front end. Source text is lexed into words and line breaks
//! and fed through a statement state machine that builds a node tree.

pub mod formatter;
pub mod lexer;
pub mod parser;
pub mod session;

pub use formatter::Formatter;
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{Expect, Input, Parser, MAX_DEPTH};
pub use session::Session;

use std::path::Path;

use frost_core::FrostResult;
use frost_ir::{NodeTree, Registry};

/// Parse DSL source into a fresh tree. `file` is only used in diagnostics.
pub fn parse_str(source: &str, file: &str, registry: &Registry) -> FrostResult<NodeTree> {
    let mut lexer = Lexer::new(source);
    let mut parser = Parser::new(registry, file);

    loop {
        if parser.expect() == Expect::RestOfLine {
            let line = lexer.line();
            let span = lexer.rest_of_line();
            parser.push(Input::Text(lexer.text(span)), line)?;
            continue;
        }
        let token = lexer.next_token();
        match token.kind {
            TokenKind::Word => parser.push(Input::Word(lexer.text(token.span)), token.line)?,
            TokenKind::Eol => parser.push(Input::Eol, token.line)?,
            TokenKind::Eof => {
                // end of input terminates the last statement
                parser.push(Input::Eol, token.line)?;
                break;
            }
        }
    }

    parser.finish()
}

/// Read a whole file and parse it.
pub fn parse_file(path: &Path, registry: &Registry) -> FrostResult<NodeTree> {
    let source = std::fs::read_to_string(path)?;
    parse_str(&source, &path.display().to_string(), registry)
}
