//! The tree builder.
//!
//! Consumes the token stream and folds three kinds of structure into one
//! tree: block structure from indentation, call structure from
//! bracket-after-atom adjacency, and expression structure from operator
//! precedence climbing. The whole input becomes exactly one root colon-list.
//!
//! Construction keeps a stack of open lists (innermost last). Children of an
//! open list accumulate in a bump vector and are frozen into an arena slice
//! when the list closes; synthesized operator lists are opened around already
//! frozen subtrees by popping the tail of the innermost open list. A failed
//! parse simply unwinds - every node lives in the caller's arena.

use bumpalo::{collections::Vec as BumpVec, Bump};
use common::{create_logger, log, log_detail, Logger, SourceLoc, SourceModule, StringInterner};

use crate::error::Error;
use crate::lexer::{Lexer, TokenKind};
use crate::node::{AstNode, ListKind, ListOp, NodeKind, SymbolKind};
use crate::optable::{OpRole, OperatorTable};

/// Parse `module` into a tree rooted at the implicit top-level colon-list.
pub fn parse<'a>(
    arena: &'a Bump,
    module: &SourceModule<'_>,
    operators: &OperatorTable,
) -> Result<&'a AstNode<'a>, Error> {
    TreeBuilder::new(arena, module.text).run(operators)
}

/// A list that is still receiving children.
struct OpenList<'a> {
    kind: ListKind,
    op: ListOp,
    /// Binding priority; meaningful for operator lists only.
    prio: u32,
    indent: u32,
    multiline: bool,
    loc: SourceLoc,
    children: BumpVec<'a, &'a AstNode<'a>>,
}

struct TreeBuilder<'a, 's> {
    arena: &'a Bump,
    lexer: Lexer<'s>,
    strings: StringInterner<'a>,
    stack: Vec<OpenList<'a>>,
    log: Logger,
}

impl<'a, 's> TreeBuilder<'a, 's> {
    fn new(arena: &'a Bump, text: &'s str) -> Self {
        Self {
            arena,
            lexer: Lexer::new(text),
            strings: StringInterner::new(arena),
            stack: Vec::new(),
            log: create_logger("parser"),
        }
    }

    fn cur(&mut self) -> &mut OpenList<'a> {
        self.stack.last_mut().expect("no open list")
    }

    fn cur_kind(&self) -> ListKind {
        self.stack.last().expect("no open list").kind
    }

    fn open_list(&mut self, kind: ListKind, op: ListOp, prio: u32, loc: SourceLoc) {
        // Operator lists synthesized inside operator lists stay at the same
        // block depth; everything else nests one deeper.
        let parent = self.stack.last().expect("no open list");
        let indent = if kind == ListKind::Operator && parent.kind == ListKind::Operator {
            parent.indent
        } else {
            parent.indent + 1
        };
        self.stack.push(OpenList {
            kind,
            op,
            prio,
            indent,
            multiline: false,
            loc,
            children: BumpVec::new_in(self.arena),
        });
    }

    fn append(&mut self, node: &'a AstNode<'a>) {
        self.cur().children.push(node);
    }

    fn alloc_symbol(&mut self, sym: SymbolKind, text: &str, loc: SourceLoc) -> &'a AstNode<'a> {
        let value = self.strings.intern(text);
        self.arena.alloc(AstNode::symbol(sym, value, loc))
    }

    /// Close the innermost open list. Errors if its kind is not in
    /// `allowed` or a synthesized operator list has the wrong arity.
    /// Returns the finished root when the last list closes.
    fn close_top(&mut self, allowed: &[ListKind]) -> Result<Option<&'a AstNode<'a>>, Error> {
        let top = self.stack.pop().expect("close with no open list");

        if !allowed.contains(&top.kind) {
            return Err(Error::Unbalanced { loc: top.loc });
        }
        if top.kind == ListKind::Operator {
            match top.op {
                ListOp::Binary if top.children.len() != 3 => {
                    return Err(Error::BinaryArity { loc: top.loc });
                }
                ListOp::Unary if top.children.len() != 2 => {
                    return Err(Error::UnaryArity { loc: top.loc });
                }
                _ => {}
            }
        }

        log_detail!(self.log, "close {:?}/{:?} ({} children)", top.kind, top.op, top.children.len());

        if let Some(parent) = self.stack.last_mut() {
            parent.multiline |= top.multiline;
            // A plain quoted string holds exactly the gobbled body; unwrap it
            // so string literals stay leaves.
            if top.kind == ListKind::Str && top.op == ListOp::None {
                debug_assert_eq!(top.children.len(), 1);
                parent.children.push(top.children[0]);
            } else {
                let node = self.arena.alloc(AstNode::list(
                    top.kind,
                    top.op,
                    top.children.into_bump_slice(),
                    top.indent,
                    top.multiline,
                    top.loc,
                ));
                parent.children.push(node);
            }
            Ok(None)
        } else {
            let node = self.arena.alloc(AstNode::list(
                top.kind,
                top.op,
                top.children.into_bump_slice(),
                top.indent,
                top.multiline,
                top.loc,
            ));
            Ok(Some(node))
        }
    }

    /// Close lists that a drop in indentation at the start of a new logical
    /// line implies, innermost first.
    fn close_for_indent(&mut self, indent: u32, colon_close: bool, loc: SourceLoc) -> Result<(), Error> {
        if indent < self.cur().indent {
            while matches!(self.cur_kind(), ListKind::Colon | ListKind::Operator)
                && self.cur().indent > indent + 1
            {
                self.close_top(&[ListKind::Colon, ListKind::Operator])?;
            }

            // The block whose body just ended closes too, unless an explicit
            // `;` is about to close it.
            if !colon_close && self.cur_kind() == ListKind::Colon {
                self.close_top(&[ListKind::Colon])?;
            }

            // Operator lists left complete by the previous line are done.
            loop {
                let cur = self.cur();
                if cur.kind != ListKind::Operator {
                    break;
                }
                let complete = match cur.op {
                    ListOp::Unary => cur.children.len() == 2,
                    ListOp::Binary => cur.children.len() == 3,
                    _ => false,
                };
                if !complete {
                    break;
                }
                self.close_top(&[ListKind::Operator])?;
            }
        } else if indent > self.cur().indent {
            return Err(Error::BadIndent {
                loc,
                expected: self.cur().indent,
                actual: indent,
            });
        }
        Ok(())
    }

    /// Bind an operator token, shortening the spelling one trailing character
    /// at a time until a table entry matches; a bound prefix leaves the rest
    /// of the run to be processed as a further operator.
    fn operator_symbol(
        &mut self,
        spelling: &str,
        loc: SourceLoc,
        operators: &OperatorTable,
        new_line: bool,
        comma: bool,
    ) -> Result<(), Error> {
        let mut rest = spelling;
        let mut loc = loc;
        let mut new_line = new_line;
        let mut comma = comma;

        loop {
            let unary_pos = if new_line || comma {
                true
            } else {
                match self.cur().children.last() {
                    None => true,
                    Some(tail) => matches!(
                        tail.kind,
                        NodeKind::Symbol { sym: SymbolKind::Operator, .. }
                    ),
                }
            };

            let mut len = rest.len();
            let (prio, role) = loop {
                let candidate = &rest[..len];
                let found = if unary_pos {
                    operators.find_unary(candidate)
                } else {
                    operators.find_binary(candidate)
                };
                if let Some(op) = found {
                    break (op.prio, op.role);
                }
                if len > 1 {
                    len -= 1;
                    continue;
                }
                return Err(if unary_pos {
                    Error::UnknownUnary { loc, spelling: rest.to_string() }
                } else {
                    Error::UnknownBinary { loc, spelling: rest.to_string() }
                });
            };

            let op_node = self.alloc_symbol(SymbolKind::Operator, &rest[..len], loc);

            if unary_pos {
                log_detail!(self.log, "unary '{}' prio {}", &rest[..len], prio);
                self.open_list(ListKind::Operator, ListOp::Unary, prio, loc);
                self.append(op_node);
            } else {
                log_detail!(self.log, "binary '{}' prio {} ({:?})", &rest[..len], prio, role);
                // Anything binding at least as tight as the new operator is
                // finished; equal priority stays open under right
                // associativity.
                loop {
                    let cur = self.cur();
                    if cur.kind != ListKind::Operator {
                        break;
                    }
                    if cur.prio > prio {
                        break;
                    }
                    if cur.prio == prio && role == OpRole::Rtl {
                        break;
                    }
                    self.close_top(&[ListKind::Operator])?;
                }
                let lhs = self.cur().children.pop().expect("binary operator with no left operand");
                self.open_list(ListKind::Operator, ListOp::Binary, prio, loc);
                self.append(op_node);
                self.append(lhs);
            }

            if len == rest.len() {
                return Ok(());
            }
            rest = &rest[len..];
            loc.col += len as u32;
            new_line = false;
            comma = true;
        }
    }

    fn run(mut self, operators: &OperatorTable) -> Result<&'a AstNode<'a>, Error> {
        self.stack.push(OpenList {
            kind: ListKind::Colon,
            op: ListOp::None,
            prio: 0,
            indent: 0,
            multiline: false,
            loc: SourceLoc::start(),
            children: BumpVec::new_in(self.arena),
        });

        let mut new_line = true;
        let mut no_symbol = false;
        let mut comma = false;
        let mut has_atom = false;

        loop {
            let token = self.lexer.next_token()?;
            let indent = self.lexer.indent();
            log!(self.log, "token {:?} at {}:{} (indent {})", token.kind, token.loc.line, token.loc.col, indent);

            match token.kind {
                TokenKind::Eof => loop {
                    if let Some(root) = self.close_top(&[ListKind::Colon, ListKind::Operator])? {
                        return Ok(root);
                    }
                },
                TokenKind::Commit => {
                    self.cur().multiline = true;
                    new_line = true;
                    no_symbol = false;
                    comma = false;
                    has_atom = false;
                    continue;
                }
                TokenKind::Comma => {
                    if self.cur_kind() != ListKind::Operator && !has_atom {
                        let nil = self.alloc_symbol(SymbolKind::Nil, "", token.loc);
                        self.append(nil);
                    }
                    while self.cur_kind() == ListKind::Operator {
                        self.close_top(&[ListKind::Operator])?;
                    }
                    new_line = false;
                    no_symbol = false;
                    comma = true;
                    has_atom = false;
                    continue;
                }
                _ => {}
            }

            if new_line {
                let colon_close = token.kind == TokenKind::ListClose(ListKind::Colon);
                self.close_for_indent(indent, colon_close, token.loc)?;
            }

            match token.kind {
                TokenKind::Symbol { sym, text } => {
                    if new_line && indent != self.cur().indent {
                        return Err(Error::BadIndent {
                            loc: token.loc,
                            expected: self.cur().indent,
                            actual: indent,
                        });
                    }
                    if sym != SymbolKind::Operator && no_symbol {
                        return Err(Error::MissingSeparator { loc: token.loc });
                    }

                    if sym == SymbolKind::Operator {
                        self.operator_symbol(&text, token.loc, operators, new_line, comma)?;
                        no_symbol = false;
                        comma = true;
                        has_atom = false;
                    } else {
                        let node = self.alloc_symbol(sym, &text, token.loc);
                        self.append(node);
                        no_symbol = true;
                        comma = false;
                        has_atom = true;
                    }
                    new_line = false;
                }
                TokenKind::ListOpen(kind) => {
                    if new_line && indent != self.cur().indent {
                        return Err(Error::BadIndent {
                            loc: token.loc,
                            expected: self.cur().indent,
                            actual: indent,
                        });
                    }

                    let adjacent = !self.cur().children.is_empty() && !(new_line || comma);
                    if adjacent {
                        // Call syntax: the atom just built becomes the
                        // callee. Priority-0 operator lists bind tighter
                        // than the call and close first.
                        while self.cur_kind() == ListKind::Operator && self.cur().prio == 0 {
                            self.close_top(&[ListKind::Operator])?;
                        }
                        let callee = self.cur().children.pop().expect("call with no callee");
                        self.open_list(kind, ListOp::Call, 0, token.loc);
                        self.append(callee);
                        comma = true;
                    } else {
                        self.open_list(kind, ListOp::None, 0, token.loc);
                        comma = false;
                    }

                    if kind == ListKind::Str {
                        let stop = self.cur().indent;
                        self.lexer.set_string_stop_indent(stop);
                    }

                    new_line = false;
                    no_symbol = false;
                    has_atom = false;
                }
                TokenKind::ListClose(kind) => {
                    loop {
                        let cur = self.cur();
                        if !matches!(cur.kind, ListKind::Colon | ListKind::Operator) {
                            break;
                        }
                        if kind == ListKind::Colon
                            && cur.kind == ListKind::Colon
                            && (!cur.multiline || indent + 1 == cur.indent)
                        {
                            break;
                        }
                        if self.close_top(&[ListKind::Colon, ListKind::Operator])?.is_some() {
                            return Err(Error::Unbalanced { loc: token.loc });
                        }
                    }

                    {
                        let cur = self.cur();
                        if cur.multiline && indent + 1 != cur.indent {
                            return Err(Error::BadIndentClose {
                                loc: token.loc,
                                expected: cur.indent - 1,
                                actual: indent,
                            });
                        }
                    }

                    if self.close_top(&[kind])?.is_some() {
                        return Err(Error::Unbalanced { loc: token.loc });
                    }

                    new_line = false;
                    no_symbol = true;
                    comma = false;
                    has_atom = true;
                }
                TokenKind::Eof | TokenKind::Commit | TokenKind::Comma => unreachable!(),
            }
        }
    }
}
