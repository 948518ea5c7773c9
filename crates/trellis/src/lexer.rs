//! The lexer.
//!
//! Classifies raw text into symbols, separators and list open/close tokens,
//! counting leading tabs into an indent counter the tree builder reads after
//! every token. Indentation is tabs-only; a space at the start of a line is
//! an unknown character. Classification is ASCII; anything else only passes
//! through inside strings and comments.
//!
//! Quoted strings run through a three-state sub-lexer: the opening quote is
//! returned as a string-list open token, the entire body as one string
//! symbol, and the closing quote as a list close. While gobbling a body, a
//! backslash before a newline drops both, and every continuation line must
//! start with exactly `stop_indent` tabs (fixed by the tree builder when the
//! string list was opened), which are stripped from the body.

use std::borrow::Cow;

use common::SourceLoc;

use crate::error::Error;
use crate::node::{ListKind, SymbolKind};

/// Characters an operator symbol may be spelled from.
const OPERATOR_MASK: &str = ".~!@#$%^&*+-=<>/?|";

#[derive(Debug, PartialEq)]
pub(crate) enum TokenKind<'s> {
    Eof,
    /// End of a logical line.
    Commit,
    Comma,
    Symbol {
        sym: SymbolKind,
        text: Cow<'s, str>,
    },
    ListOpen(ListKind),
    ListClose(ListKind),
}

#[derive(Debug)]
pub(crate) struct Token<'s> {
    pub kind: TokenKind<'s>,
    pub loc: SourceLoc,
}

/// String sub-lexer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stringer {
    Idle,
    /// An opening quote was seen; the next token is the whole body.
    Gobble,
    /// The body was returned; the next quote closes the list.
    Closing,
}

pub(crate) struct Lexer<'s> {
    text: &'s str,
    pos: usize,
    line: u32,
    col: u32,
    line_start: u32,
    indent: u32,
    stringer: Stringer,
    stop_indent: u32,
}

impl<'s> Lexer<'s> {
    pub fn new(text: &'s str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            col: 1,
            line_start: 0,
            indent: 0,
            stringer: Stringer::Idle,
            stop_indent: 0,
        }
    }

    /// Indent (leading tab count) of the line the last token was read from.
    pub fn indent(&self) -> u32 {
        self.indent
    }

    /// Fix the continuation indent for the string body about to be gobbled.
    /// Called by the tree builder right after a string list opens.
    pub fn set_string_stop_indent(&mut self, stop: u32) {
        self.stop_indent = stop;
    }

    pub fn cur_loc(&self) -> SourceLoc {
        SourceLoc::new(self.line, self.col, self.line_start)
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self) {
        if let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
                self.line_start = self.pos as u32;
            } else {
                self.col += 1;
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token<'s>, Error> {
        if self.stringer == Stringer::Gobble {
            return self.gobble_string();
        }

        if self.col == 1 {
            self.indent = 0;
            while self.peek() == Some(b'\t') {
                self.indent += 1;
                self.advance();
            }
        } else {
            while matches!(self.peek(), Some(b' ') | Some(b'\t') | Some(b'\r')) {
                self.advance();
            }
        }

        if self.peek() == Some(b'`') {
            while !matches!(self.peek(), None | Some(b'\n')) {
                self.advance();
            }
        }

        let loc = self.cur_loc();
        let kind = match self.peek() {
            None => TokenKind::Eof,
            Some(b'\n') => {
                self.advance();
                self.indent = 0;
                TokenKind::Commit
            }
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                let text = self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
                TokenKind::Symbol {
                    sym: SymbolKind::Identifier,
                    text: Cow::Borrowed(text),
                }
            }
            Some(b) if b.is_ascii_digit() => {
                let text =
                    self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
                TokenKind::Symbol {
                    sym: SymbolKind::Number,
                    text: Cow::Borrowed(text),
                }
            }
            Some(b) if OPERATOR_MASK.as_bytes().contains(&b) => {
                let text = self.take_while(|b| OPERATOR_MASK.as_bytes().contains(&b));
                TokenKind::Symbol {
                    sym: SymbolKind::Operator,
                    text: Cow::Borrowed(text),
                }
            }
            Some(b'(') => self.open(ListKind::Round),
            Some(b'[') => self.open(ListKind::Square),
            Some(b'{') => self.open(ListKind::Curly),
            Some(b':') => self.open(ListKind::Colon),
            Some(b')') => self.close(ListKind::Round),
            Some(b']') => self.close(ListKind::Square),
            Some(b'}') => self.close(ListKind::Curly),
            Some(b';') => self.close(ListKind::Colon),
            Some(b'"') | Some(b'\'') => {
                self.advance();
                if self.stringer == Stringer::Closing {
                    self.stringer = Stringer::Idle;
                    TokenKind::ListClose(ListKind::Str)
                } else {
                    self.stringer = Stringer::Gobble;
                    TokenKind::ListOpen(ListKind::Str)
                }
            }
            Some(b',') => {
                self.advance();
                TokenKind::Comma
            }
            Some(_) => return Err(Error::UnknownToken { loc }),
        };

        Ok(Token { kind, loc })
    }

    fn open(&mut self, kind: ListKind) -> TokenKind<'s> {
        self.advance();
        TokenKind::ListOpen(kind)
    }

    fn close(&mut self, kind: ListKind) -> TokenKind<'s> {
        self.advance();
        TokenKind::ListClose(kind)
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'s str {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if pred(b)) {
            self.advance();
        }
        &self.text[start..self.pos]
    }

    /// Consume an entire string body up to (not including) its closing
    /// quote or end of input.
    fn gobble_string(&mut self) -> Result<Token<'s>, Error> {
        let loc = self.cur_loc();
        let mut escape = false;
        // Borrow as long as the body stays on one line; switch to an owned
        // buffer once continuation handling rewrites it.
        let mut owned: Option<String> = None;
        let mut seg_start = self.pos;

        loop {
            match self.peek() {
                None => break,
                Some(b'"') | Some(b'\'') if !escape => break,
                Some(b'\n') => {
                    let buf = owned.get_or_insert_with(String::new);
                    if escape {
                        // Drop the backslash and the newline.
                        escape = false;
                        buf.push_str(&self.text[seg_start..self.pos - 1]);
                    } else {
                        buf.push_str(&self.text[seg_start..self.pos + 1]);
                    }
                    self.advance();

                    let mut indent = 0;
                    while self.peek() == Some(b'\t') && indent != self.stop_indent {
                        indent += 1;
                        self.advance();
                    }
                    seg_start = self.pos;

                    match self.peek() {
                        // Blank line: keep its newline, no indent demanded.
                        Some(b'\n') => continue,
                        None | Some(b'"') | Some(b'\'') => break,
                        _ => {
                            if indent != self.stop_indent {
                                return Err(Error::BadIndent {
                                    loc: self.cur_loc(),
                                    expected: self.stop_indent,
                                    actual: indent,
                                });
                            }
                        }
                    }
                }
                Some(b) => {
                    escape = !escape && b == b'\\';
                    self.advance();
                }
            }
        }

        let text = match owned {
            Some(mut buf) => {
                buf.push_str(&self.text[seg_start..self.pos]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(&self.text[seg_start..self.pos]),
        };

        self.stringer = Stringer::Closing;
        Ok(Token {
            kind: TokenKind::Symbol {
                sym: SymbolKind::Str,
                text,
            },
            loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind<'_>> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let t = lexer.next_token().expect("lex");
            let done = t.kind == TokenKind::Eof;
            out.push(t.kind);
            if done {
                return out;
            }
        }
    }

    fn sym(sym: SymbolKind, text: &str) -> TokenKind<'_> {
        TokenKind::Symbol {
            sym,
            text: Cow::Borrowed(text),
        }
    }

    #[test]
    fn symbols_and_brackets() {
        assert_eq!(
            kinds("f(x1, 2.5)"),
            vec![
                sym(SymbolKind::Identifier, "f"),
                TokenKind::ListOpen(ListKind::Round),
                sym(SymbolKind::Identifier, "x1"),
                TokenKind::Comma,
                sym(SymbolKind::Number, "2.5"),
                TokenKind::ListClose(ListKind::Round),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operator_runs_are_maximal() {
        assert_eq!(
            kinds("a+-b"),
            vec![
                sym(SymbolKind::Identifier, "a"),
                sym(SymbolKind::Operator, "+-"),
                sym(SymbolKind::Identifier, "b"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(
            kinds("a ` rest is ignored\nb"),
            vec![
                sym(SymbolKind::Identifier, "a"),
                TokenKind::Commit,
                sym(SymbolKind::Identifier, "b"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn indent_counts_tabs() {
        let mut lexer = Lexer::new("a\n\t\tb\n");
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Symbol { .. }
        ));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Commit);
        let t = lexer.next_token().unwrap();
        assert_eq!(t.kind, sym(SymbolKind::Identifier, "b"));
        assert_eq!(lexer.indent(), 2);
        assert_eq!(t.loc.line, 2);
        assert_eq!(t.loc.col, 3);
    }

    #[test]
    fn space_indent_is_unknown() {
        let mut lexer = Lexer::new("a\n x");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        assert!(matches!(
            lexer.next_token(),
            Err(Error::UnknownToken { .. })
        ));
    }

    #[test]
    fn string_tokens() {
        assert_eq!(
            kinds("\"hi there\""),
            vec![
                TokenKind::ListOpen(ListKind::Str),
                sym(SymbolKind::Str, "hi there"),
                TokenKind::ListClose(ListKind::Str),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_keeps_escapes_raw() {
        assert_eq!(
            kinds(r#"'a\tb\''"#),
            vec![
                TokenKind::ListOpen(ListKind::Str),
                sym(SymbolKind::Str, r"a\tb\'"),
                TokenKind::ListClose(ListKind::Str),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn multiline_string_strips_stop_indent() {
        let mut lexer = Lexer::new("\"one\n\ttwo\"");
        assert_eq!(
            lexer.next_token().unwrap().kind,
            TokenKind::ListOpen(ListKind::Str)
        );
        lexer.set_string_stop_indent(1);
        let t = lexer.next_token().unwrap();
        assert_eq!(t.kind, sym(SymbolKind::Str, "one\ntwo"));
    }

    #[test]
    fn multiline_string_continuation_joins_lines() {
        let mut lexer = Lexer::new("\"one\\\n\ttwo\"");
        lexer.next_token().unwrap();
        lexer.set_string_stop_indent(1);
        let t = lexer.next_token().unwrap();
        assert_eq!(t.kind, sym(SymbolKind::Str, "onetwo"));
    }

    #[test]
    fn multiline_string_bad_indent() {
        let mut lexer = Lexer::new("\"one\ntwo\"");
        lexer.next_token().unwrap();
        lexer.set_string_stop_indent(1);
        match lexer.next_token() {
            Err(Error::BadIndent { expected, actual, .. }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            other => panic!("expected bad indent, got {:?}", other),
        }
    }
}
