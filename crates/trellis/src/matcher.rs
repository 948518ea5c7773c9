//! The backtracking schema matcher.
//!
//! Walks a schema tree against a run of AST siblings, growing a handler tree
//! on the way. Failure is cheap: the cursor snaps back to where the attempt
//! started and the partial handler growth is dropped, so a caller observes
//! no consumption from a failed child.
//!
//! The matcher keeps the sibling following the most recently consumed node
//! as a best-effort anchor for "the match failed here" diagnostics.

use common::{create_logger, log_detail, log_fail, Logger};

use crate::node::{AstNode, NodeKind};
use crate::schema::{HandlerNode, Schema, SchemaKind, SchemaNodeId};

/// Position in a run of AST siblings.
pub(crate) struct Cursor<'c, 'a> {
    nodes: &'c [&'a AstNode<'a>],
    pos: usize,
}

impl<'c, 'a> Cursor<'c, 'a> {
    pub fn new(nodes: &'c [&'a AstNode<'a>]) -> Self {
        Self { nodes, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a AstNode<'a>> {
        self.nodes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn rewind(&mut self, pos: usize) {
        self.pos = pos;
    }
}

pub(crate) struct Matcher<'s, 'a, C> {
    schema: &'s Schema<C>,
    furthest: Option<&'a AstNode<'a>>,
    log: Logger,
}

impl<'s, 'a, C> Matcher<'s, 'a, C> {
    pub fn new(schema: &'s Schema<C>) -> Self {
        Self {
            schema,
            furthest: None,
            log: create_logger("matcher"),
        }
    }

    /// The node after the last consumed one, if the match got anywhere.
    pub fn furthest(&self) -> Option<&'a AstNode<'a>> {
        self.furthest
    }

    fn node(&self, id: SchemaNodeId) -> &'s crate::schema::SchemaNode<C> {
        &self.schema.nodes[id]
    }

    /// Note the cursor position after consuming an AST node.
    fn mark(&mut self, cur: &Cursor<'_, 'a>) {
        if let Some(next) = cur.peek() {
            self.furthest = Some(next);
        }
    }

    /// Match one schema node at the cursor. On success, exactly one handler
    /// is appended to `hl` and the cursor stands after whatever was
    /// consumed; on failure both are untouched.
    pub fn check_entry(
        &mut self,
        hl: &mut Vec<HandlerNode<'a>>,
        cur: &mut Cursor<'_, 'a>,
        id: SchemaNodeId,
    ) -> bool {
        let Some(ast) = cur.peek() else {
            return false;
        };
        let saved = cur.pos();
        let mut handler = HandlerNode {
            sn: Some(id),
            ast: Some(ast),
            children: Vec::new(),
        };

        self.log.push_indent();
        let sn = self.node(id);
        let mut ok = match &sn.kind {
            SchemaKind::OneOf => self.check_oneof(&mut handler.children, cur, id),
            SchemaKind::ListOf => self.check_listof(&mut handler.children, cur, id),
            SchemaKind::SeqOf => self.check_seqof(&mut handler.children, cur, id),
            SchemaKind::Ref(rule) => match self.schema.registry.node_of(*rule) {
                Some(target) => {
                    log_detail!(self.log, "ref ${}", self.schema.registry.name_of(*rule));
                    self.check_entry(&mut handler.children, cur, target)
                }
                None => false,
            },
            SchemaKind::Symbol { sym, value } => {
                let hit = match ast.kind {
                    NodeKind::Symbol { sym: nsym, value: nval } => {
                        nsym == *sym && value.as_deref().map_or(true, |v| v == nval)
                    }
                    NodeKind::List { .. } => false,
                };
                if hit {
                    cur.advance();
                    self.mark(cur);
                }
                hit
            }
            SchemaKind::List { list, op } => match ast.kind {
                NodeKind::List {
                    list: nlist,
                    op: nop,
                    children,
                    ..
                } if nlist == *list && nop == *op => {
                    // The schema children must consume the list's children
                    // exactly; leftovers are a mismatch, not a partial hit.
                    let mut inner = Cursor::new(children);
                    let consumed = self.check_seqof(&mut handler.children, &mut inner, id)
                        && inner.peek().is_none();
                    if consumed {
                        cur.advance();
                        self.mark(cur);
                    }
                    consumed
                }
                _ => false,
            },
        };

        if ok && sn.last && cur.peek().is_some() {
            log_fail!(self.log, "siblings remain after #last node");
            ok = false;
        }
        self.log.pop_indent();

        if ok {
            hl.push(handler);
            true
        } else {
            cur.rewind(saved);
            false
        }
    }

    /// First matching alternative wins; no attempt to find a better one.
    fn check_oneof(
        &mut self,
        hl: &mut Vec<HandlerNode<'a>>,
        cur: &mut Cursor<'_, 'a>,
        id: SchemaNodeId,
    ) -> bool {
        for i in 0..self.node(id).children.len() {
            let child = self.node(id).children[i];
            if self.check_entry(hl, cur, child) {
                return true;
            }
        }
        false
    }

    /// Repeat the alternation until it stops matching. Zero repetitions
    /// report "not found"; the enclosing slot decides what that means.
    fn check_listof(
        &mut self,
        hl: &mut Vec<HandlerNode<'a>>,
        cur: &mut Cursor<'_, 'a>,
        id: SchemaNodeId,
    ) -> bool {
        let mut found = false;
        while self.check_oneof(hl, cur, id) {
            found = true;
        }
        found
    }

    /// Children in declared order. A failed optional child leaves a
    /// placeholder so later slots keep their positional index; a failed
    /// required child fails the sequence. Once input runs out, every
    /// unvisited child must be optional.
    fn check_seqof(
        &mut self,
        hl: &mut Vec<HandlerNode<'a>>,
        cur: &mut Cursor<'_, 'a>,
        id: SchemaNodeId,
    ) -> bool {
        let children_len = self.node(id).children.len();
        let mut i = 0;
        while i < children_len {
            let ci = self.node(id).children[i];
            if self.check_entry(hl, cur, ci) {
                if cur.peek().is_none() {
                    i += 1;
                    break;
                }
            } else if self.node(ci).optional {
                hl.push(HandlerNode::placeholder());
            } else {
                return false;
            }
            i += 1;
        }

        if cur.peek().is_none() {
            for idx in i..children_len {
                let ci = self.node(id).children[idx];
                if !self.node(ci).optional {
                    return false;
                }
            }
        }
        true
    }
}
