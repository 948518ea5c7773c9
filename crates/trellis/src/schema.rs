//! Schema nodes, the rule registry, and handler dispatch.
//!
//! A schema is a tree of match-descriptors over AST shapes. Nodes live in one
//! vector and refer to each other by index, so recursive and forward rule
//! references never form ownership cycles: a [`SchemaKind::Ref`] holds a
//! registry slot that is resolved while matching, not a pointer.
//!
//! Matching a schema against an AST (see [`crate::matcher`]) yields a handler
//! tree; [`Handlers`] is the view of one level of that tree a callback
//! receives, letting it evaluate its matched children by index, in any order,
//! or not at all.

use std::rc::Rc;

use bumpalo::Bump;
use common::SourceModule;
use hashbrown::HashMap;

use crate::error::Error;
use crate::matcher::{Cursor, Matcher};
use crate::node::{AstNode, ListKind, ListOp, SymbolKind};
use crate::optable::OperatorTable;
use crate::parser;

pub(crate) type SchemaNodeId = usize;
pub(crate) type RuleId = usize;

/// A consumer callback. Receives the handler list of the matched children,
/// the AST node the schema node matched, and the opaque dispatch context.
pub type HandlerFn<C> =
    dyn for<'t, 'a> Fn(Handlers<'t, 'a, C>, &'a AstNode<'a>, &mut C) -> Result<(), Error>;

pub type HandlerRc<C> = Rc<HandlerFn<C>>;

/// Wrap a function as a handler. Plain `fn` items coerce cleanly; closures
/// must own their captures.
pub fn handler<C, F>(f: F) -> HandlerRc<C>
where
    F: for<'t, 'a> Fn(Handlers<'t, 'a, C>, &'a AstNode<'a>, &mut C) -> Result<(), Error>
        + 'static,
{
    Rc::new(f)
}

/// Maps `@name` handler bindings to callbacks while a schema is built.
pub trait HandlerResolver<C> {
    fn resolve(&mut self, name: &str) -> Option<HandlerRc<C>>;
}

impl<C, F> HandlerResolver<C> for F
where
    F: FnMut(&str) -> Option<HandlerRc<C>>,
{
    fn resolve(&mut self, name: &str) -> Option<HandlerRc<C>> {
        self(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemaKind {
    /// First matching child wins; no backtracking across a success.
    OneOf,
    /// Greedy repetition of the one-of alternation over the children;
    /// zero repetitions report "not found" to the enclosing slot.
    ListOf,
    /// Children in order; optional children leave a placeholder handler.
    SeqOf,
    /// Named indirection through the registry, resolved at match time.
    Ref(RuleId),
    /// A leaf of the given kind, optionally with pinned text.
    Symbol {
        sym: SymbolKind,
        value: Option<String>,
    },
    /// A list of the given bracket kind and grouping; the schema children
    /// must consume the list's children exactly.
    List { list: ListKind, op: ListOp },
}

pub(crate) struct SchemaNode<C> {
    pub kind: SchemaKind,
    pub optional: bool,
    pub last: bool,
    pub children: Vec<SchemaNodeId>,
    /// None means the default pass-through callback.
    pub cb: Option<HandlerRc<C>>,
}

// ---------------------------------------------------------------------------
// Rule registry
// ---------------------------------------------------------------------------

struct RuleEntry {
    name: String,
    node: Option<SchemaNodeId>,
}

/// Ordered name -> schema slot map. Slots may sit empty while rules
/// forward-reference each other; completeness is checked once after the
/// whole registry is built.
pub(crate) struct Registry {
    entries: Vec<RuleEntry>,
    index: HashMap<String, RuleId>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Slot for `name`, created empty on first sight.
    pub fn slot(&mut self, name: &str) -> RuleId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.entries.len();
        self.entries.push(RuleEntry {
            name: name.to_string(),
            node: None,
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Fill `name`'s slot. A slot may be filled once.
    pub fn define(&mut self, name: &str, node: SchemaNodeId) -> Result<RuleId, Error> {
        let id = self.slot(name);
        if self.entries[id].node.is_some() {
            return Err(Error::DuplicateRule(name.to_string()));
        }
        self.entries[id].node = Some(node);
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    pub fn node_of(&self, id: RuleId) -> Option<SchemaNodeId> {
        self.entries.get(id).and_then(|e| e.node)
    }

    pub fn name_of(&self, id: RuleId) -> &str {
        &self.entries[id].name
    }

    /// Error on the first slot (registration order) still empty.
    pub fn check_complete(&self) -> Result<(), Error> {
        for entry in &self.entries {
            if entry.node.is_none() {
                return Err(Error::MissingRule(entry.name.clone()));
            }
        }
        Ok(())
    }

    fn iter(&self) -> impl Iterator<Item = (&str, Option<SchemaNodeId>)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.node))
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Constructor surface for schema trees.
///
/// The bootstrap grammar is built through this once at schema-init time, and
/// the bootstrap's own callbacks keep using it to grow the consumer's schema
/// while the schema text is dispatched.
pub(crate) struct SchemaBuilder<C> {
    pub(crate) nodes: Vec<SchemaNode<C>>,
    pub(crate) registry: Registry,
}

impl<C> SchemaBuilder<C> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            registry: Registry::new(),
        }
    }

    pub fn add(&mut self, kind: SchemaKind, children: Vec<SchemaNodeId>) -> SchemaNodeId {
        let id = self.nodes.len();
        self.nodes.push(SchemaNode {
            kind,
            optional: false,
            last: false,
            children,
            cb: None,
        });
        id
    }

    pub fn oneof(&mut self, children: Vec<SchemaNodeId>) -> SchemaNodeId {
        self.add(SchemaKind::OneOf, children)
    }

    pub fn listof(&mut self, children: Vec<SchemaNodeId>) -> SchemaNodeId {
        self.add(SchemaKind::ListOf, children)
    }

    pub fn seqof(&mut self, children: Vec<SchemaNodeId>) -> SchemaNodeId {
        self.add(SchemaKind::SeqOf, children)
    }

    pub fn rule_ref(&mut self, name: &str) -> SchemaNodeId {
        let rule = self.registry.slot(name);
        self.add(SchemaKind::Ref(rule), Vec::new())
    }

    pub fn symbol(&mut self, sym: SymbolKind) -> SchemaNodeId {
        self.add(SchemaKind::Symbol { sym, value: None }, Vec::new())
    }

    pub fn symbol_value(&mut self, sym: SymbolKind, value: &str) -> SchemaNodeId {
        self.add(
            SchemaKind::Symbol {
                sym,
                value: Some(value.to_string()),
            },
            Vec::new(),
        )
    }

    pub fn list(
        &mut self,
        list: ListKind,
        op: ListOp,
        children: Vec<SchemaNodeId>,
    ) -> SchemaNodeId {
        self.add(SchemaKind::List { list, op }, children)
    }

    pub fn set_kind(&mut self, id: SchemaNodeId, kind: SchemaKind) {
        self.nodes[id].kind = kind;
    }

    pub fn set_symbol_value(&mut self, id: SchemaNodeId, text: &str) {
        match &mut self.nodes[id].kind {
            SchemaKind::Symbol { value, .. } => *value = Some(text.to_string()),
            _ => {}
        }
    }

    pub fn set_optional(&mut self, id: SchemaNodeId) -> SchemaNodeId {
        self.nodes[id].optional = true;
        id
    }

    pub fn set_last(&mut self, id: SchemaNodeId) -> SchemaNodeId {
        self.nodes[id].last = true;
        id
    }

    pub fn set_cb(&mut self, id: SchemaNodeId, cb: HandlerRc<C>) -> SchemaNodeId {
        self.nodes[id].cb = Some(cb);
        id
    }

    pub fn append_child(&mut self, parent: SchemaNodeId, child: SchemaNodeId) {
        self.nodes[parent].children.push(child);
    }

    pub fn define(&mut self, name: &str, root: SchemaNodeId) -> Result<RuleId, Error> {
        self.registry.define(name, root)
    }

    pub fn finish(self, operators: OperatorTable) -> Result<Schema<C>, Error> {
        self.registry.check_complete()?;
        Ok(Schema {
            nodes: self.nodes,
            registry: self.registry,
            operators,
        })
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// A built schema: rule registry, operator table, and callback bindings,
/// ready to drive [`Schema::parse_source`] any number of times. Everything
/// it owns is released on drop.
pub struct Schema<C> {
    pub(crate) nodes: Vec<SchemaNode<C>>,
    pub(crate) registry: Registry,
    pub(crate) operators: OperatorTable,
}

impl<C> Schema<C> {
    /// The operator table this schema parses source text with.
    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    /// Parse `module`, match `top_rule` against the root colon-list, and
    /// evaluate the resulting root handler with `ctx`.
    pub fn parse_source(
        &self,
        module: &SourceModule<'_>,
        top_rule: &str,
        ctx: &mut C,
    ) -> Result<(), Error> {
        let rule = self
            .registry
            .get(top_rule)
            .and_then(|id| self.registry.node_of(id))
            .ok_or_else(|| Error::MissingTopRule(top_rule.to_string()))?;

        let arena = Bump::new();
        let root = parser::parse(&arena, module, &self.operators)?;
        self.match_and_eval(root, rule, ctx)
    }

    pub(crate) fn match_and_eval<'a>(
        &self,
        root: &'a AstNode<'a>,
        rule: SchemaNodeId,
        ctx: &mut C,
    ) -> Result<(), Error> {
        let mut matcher = Matcher::new(self);
        let top = [root];
        let mut cursor = Cursor::new(&top);
        let mut list: Vec<HandlerNode<'a>> = Vec::new();

        if matcher.check_entry(&mut list, &mut cursor, rule) {
            debug_assert_eq!(list.len(), 1);
            Handlers { schema: self, list: &list }.eval(0, ctx)
        } else {
            let anchor = matcher
                .furthest()
                .or_else(|| root.children().first().copied());
            Err(Error::SchemaSyntax {
                loc: anchor.map(|n| n.loc),
            })
        }
    }

    fn eval_node(&self, h: &HandlerNode<'_>, ctx: &mut C) -> Result<(), Error> {
        let id = h.sn.expect("placeholder handler evaluated");
        let node = h.ast.expect("matched handler without a node");
        let hl = Handlers {
            schema: self,
            list: &h.children,
        };
        match &self.nodes[id].cb {
            Some(cb) => cb(hl, node, ctx),
            None => hl.eval_all(ctx),
        }
    }

    /// Dump the rule registry to stderr.
    pub fn dump_rules(&self) {
        eprintln!("=== registered rules ===");
        for (name, node) in self.registry.iter() {
            match node {
                Some(id) => eprintln!(
                    "  {} -> {} ({} children)",
                    name,
                    kind_label(&self.nodes[id].kind),
                    self.nodes[id].children.len()
                ),
                None => eprintln!("  {} -> <empty>", name),
            }
        }
    }
}

fn kind_label(kind: &SchemaKind) -> &'static str {
    match kind {
        SchemaKind::OneOf => "oneof",
        SchemaKind::ListOf => "listof",
        SchemaKind::SeqOf => "seqof",
        SchemaKind::Ref(_) => "ref",
        SchemaKind::Symbol { .. } => "symbol",
        SchemaKind::List { .. } => "list",
    }
}

// ---------------------------------------------------------------------------
// Handler tree
// ---------------------------------------------------------------------------

/// One node of the handler tree: which schema node matched which AST node.
/// Both absent for the placeholder left by a missed optional slot.
pub(crate) struct HandlerNode<'a> {
    pub sn: Option<SchemaNodeId>,
    pub ast: Option<&'a AstNode<'a>>,
    pub children: Vec<HandlerNode<'a>>,
}

impl<'a> HandlerNode<'a> {
    pub fn placeholder() -> Self {
        Self {
            sn: None,
            ast: None,
            children: Vec::new(),
        }
    }
}

/// A callback's view of its matched children.
pub struct Handlers<'t, 'a, C> {
    pub(crate) schema: &'t Schema<C>,
    pub(crate) list: &'t [HandlerNode<'a>],
}

impl<C> Clone for Handlers<'_, '_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Handlers<'_, '_, C> {}

impl<'t, 'a, C> Handlers<'t, 'a, C> {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Whether slot `child` actually matched something. False for the
    /// placeholder of a missed optional slot and for indices past the end.
    pub fn evalable(&self, child: usize) -> bool {
        self.list.get(child).map_or(false, |h| h.sn.is_some())
    }

    /// Evaluate slot `child`: run its callback (or the default, which
    /// evaluates all evaluable grandchildren left to right). A no-op on
    /// non-evaluable slots.
    pub fn eval(&self, child: usize, ctx: &mut C) -> Result<(), Error> {
        match self.list.get(child) {
            Some(h) if h.sn.is_some() => self.schema.eval_node(h, ctx),
            _ => Ok(()),
        }
    }

    /// The default callback: every evaluable child in order, stopping at the
    /// first error.
    pub fn eval_all(&self, ctx: &mut C) -> Result<(), Error> {
        for i in 0..self.list.len() {
            if self.evalable(i) {
                self.eval(i, ctx)?;
            }
        }
        Ok(())
    }
}
