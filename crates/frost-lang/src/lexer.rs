//! Streaming lexer for the scene DSL.
//!
//! Tokens are whitespace-delimited words. Runs of line breaks collapse into
//! one end-of-line token; end of input is its own token and never an error.

/// Byte range of a token in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Eol,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line the token starts on.
    pub line: usize,
}

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_newline(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
        }
    }

    /// Current 1-based line.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn text(&self, span: Span) -> &'a str {
        &self.source[span.start..span.end]
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    fn skip_blanks(&mut self) {
        while self.peek().is_some_and(is_blank) {
            self.pos += 1;
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_blanks();
        let start = self.pos;
        let line = self.line;

        match self.peek() {
            None => Token {
                kind: TokenKind::Eof,
                span: Span::new(start, start),
                line,
            },
            Some(b) if is_newline(b) => {
                // blank lines and indentation between them fold into one token
                while let Some(b) = self.peek() {
                    if b == b'\n' || (b == b'\r' && self.peek_at(1) != Some(b'\n')) {
                        self.line += 1;
                    } else if !is_newline(b) && !is_blank(b) {
                        break;
                    }
                    self.pos += 1;
                }
                Token {
                    kind: TokenKind::Eol,
                    span: Span::new(start, self.pos),
                    line,
                }
            }
            Some(_) => {
                while self
                    .peek()
                    .is_some_and(|b| !is_blank(b) && !is_newline(b))
                {
                    self.pos += 1;
                }
                Token {
                    kind: TokenKind::Word,
                    span: Span::new(start, self.pos),
                    line,
                }
            }
        }
    }

    /// Everything up to the next line break, without surrounding blanks.
    /// The line break itself is left for [`Lexer::next_token`].
    pub fn rest_of_line(&mut self) -> Span {
        self.skip_blanks();
        let start = self.pos;
        while self.peek().is_some_and(|b| !is_newline(b)) {
            self.pos += 1;
        }
        let mut end = self.pos;
        while end > start && is_blank(self.source.as_bytes()[end - 1]) {
            end -= 1;
        }
        Span::new(start, end)
    }
}
