//! The bootstrap grammar: the schema language described in its own schema
//! primitives.
//!
//! One fixed schema tree, built here through [`SchemaBuilder`] in ordinary
//! code, describes the textual schema language. [`Schema::init`] runs it over
//! the consumer's schema text; the callbacks below react to the matched
//! declarations by growing the consumer's registry, operator table and
//! handler bindings inside a [`BuildState`]. Every real grammar in the system
//! comes into existence through this one.

use common::SourceModule;

use crate::constants::*;
use crate::error::Error;
use crate::node::{AstNode, ListKind, ListOp, SymbolKind};
use crate::optable::{OpRole, OperatorTable};
use crate::schema::{
    handler, HandlerRc, HandlerResolver, Handlers, Schema, SchemaBuilder, SchemaKind,
    SchemaNodeId,
};

/// Build context the bootstrap callbacks work on: the consumer's schema
/// under construction.
pub(crate) struct BuildState<C> {
    builder: SchemaBuilder<C>,
    operators: OperatorTable,
    /// Priority for the operator group being declared; groups earlier in the
    /// block bind tighter.
    prio: u32,
    /// Name of the rule being defined.
    key: Option<String>,
    /// Rule-level `@name`, parked until the rule's root node exists.
    rule_cb: Option<String>,
    /// Schema nodes under construction, innermost last.
    stack: Vec<SchemaNodeId>,
    /// `@name` bindings to resolve once the whole schema is built.
    pending: Vec<(SchemaNodeId, String)>,
}

impl<C> BuildState<C> {
    fn new() -> Self {
        Self {
            builder: SchemaBuilder::new(),
            operators: OperatorTable::new(),
            prio: 0,
            key: None,
            rule_cb: None,
            stack: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn cur(&self) -> SchemaNodeId {
        *self.stack.last().expect("schema node construction stack is empty")
    }
}

impl<C: 'static> Schema<C> {
    /// Build a schema from schema text: parse it with the bootstrap grammar,
    /// let the bootstrap callbacks assemble registry, operator table and
    /// bindings, resolve every `@name` through `resolver`, and check the
    /// registry complete.
    pub fn init(
        module: &SourceModule<'_>,
        resolver: &mut dyn HandlerResolver<C>,
    ) -> Result<Schema<C>, Error> {
        let boot = bootstrap_schema::<C>();
        let mut state = BuildState::new();
        boot.parse_source(module, RULE_ROOT, &mut state)?;
        debug_assert!(state.stack.is_empty());

        let BuildState {
            mut builder,
            operators,
            pending,
            ..
        } = state;

        for (id, name) in pending {
            match resolver.resolve(&name) {
                Some(cb) => {
                    builder.set_cb(id, cb);
                }
                None => return Err(Error::MissingHandler(name)),
            }
        }

        builder.finish(operators)
    }
}

// ============================================================================
// Build callbacks
// ============================================================================

fn cb_dec_prio<C>(
    hl: Handlers<'_, '_, BuildState<C>>,
    _n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    hl.eval_all(ctx)?;
    ctx.prio += 1;
    Ok(())
}

fn cb_op_unary<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    let prio = ctx.prio;
    ctx.operators.add(n.value(), prio, OpRole::Unary);
    Ok(())
}

fn cb_op_ltr<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    let prio = ctx.prio;
    ctx.operators.add(n.value(), prio, OpRole::Ltr);
    Ok(())
}

fn cb_op_rtl<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    let prio = ctx.prio;
    ctx.operators.add(n.value(), prio, OpRole::Rtl);
    Ok(())
}

fn cb_rule_key<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    ctx.key = Some(n.value().to_string());
    Ok(())
}

fn cb_rule_handler<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    ctx.rule_cb = Some(n.value().to_string());
    Ok(())
}

/// On every matched snode: create the node, attach it (child of the node
/// under construction, or the current rule's root), and dispatch the matched
/// form with the new node on the stack.
fn cb_sn_create<C>(
    hl: Handlers<'_, '_, BuildState<C>>,
    _n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    // The matched form's callback overwrites the kind.
    let id = ctx.builder.add(SchemaKind::SeqOf, Vec::new());
    match ctx.stack.last().copied() {
        Some(parent) => ctx.builder.append_child(parent, id),
        None => {
            let key = ctx.key.take().expect("rule name precedes its schema node");
            ctx.builder.define(&key, id)?;
            if let Some(name) = ctx.rule_cb.take() {
                ctx.pending.push((id, name));
            }
        }
    }
    ctx.stack.push(id);
    let result = hl.eval_all(ctx);
    ctx.stack.pop();
    result
}

fn cb_sn_set_symbol<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    let id = ctx.cur();
    ctx.builder.set_symbol_value(id, n.value());
    Ok(())
}

fn cb_sn_set_cb<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    let id = ctx.cur();
    ctx.pending.push((id, n.value().to_string()));
    Ok(())
}

fn cb_sn_set_optional<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    _n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    let id = ctx.cur();
    ctx.builder.set_optional(id);
    Ok(())
}

fn cb_sn_set_last<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    _n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    let id = ctx.cur();
    ctx.builder.set_last(id);
    Ok(())
}

fn cb_sn_set_ref<C>(
    _hl: Handlers<'_, '_, BuildState<C>>,
    n: &AstNode<'_>,
    ctx: &mut BuildState<C>,
) -> Result<(), Error> {
    let id = ctx.cur();
    let rule = ctx.builder.registry.slot(n.value());
    ctx.builder.set_kind(id, SchemaKind::Ref(rule));
    Ok(())
}

fn set_kind_then_children<C>(
    hl: Handlers<'_, '_, BuildState<C>>,
    ctx: &mut BuildState<C>,
    kind: SchemaKind,
) -> Result<(), Error> {
    let id = ctx.cur();
    ctx.builder.set_kind(id, kind);
    hl.eval_all(ctx)
}

macro_rules! kind_callback {
    ($name:ident, $kind:expr) => {
        fn $name<C>(
            hl: Handlers<'_, '_, BuildState<C>>,
            _n: &AstNode<'_>,
            ctx: &mut BuildState<C>,
        ) -> Result<(), Error> {
            set_kind_then_children(hl, ctx, $kind)
        }
    };
}

kind_callback!(cb_sn_oneof, SchemaKind::OneOf);
kind_callback!(cb_sn_listof, SchemaKind::ListOf);
kind_callback!(cb_sn_seqof, SchemaKind::SeqOf);
kind_callback!(cb_sn_identifier, SchemaKind::Symbol { sym: SymbolKind::Identifier, value: None });
kind_callback!(cb_sn_number, SchemaKind::Symbol { sym: SymbolKind::Number, value: None });
kind_callback!(cb_sn_string, SchemaKind::Symbol { sym: SymbolKind::Str, value: None });
kind_callback!(cb_sn_operator, SchemaKind::Symbol { sym: SymbolKind::Operator, value: None });
kind_callback!(cb_sn_nil, SchemaKind::Symbol { sym: SymbolKind::Nil, value: None });
kind_callback!(cb_sn_tree, SchemaKind::List { list: ListKind::Colon, op: ListOp::Call });
kind_callback!(cb_sn_call, SchemaKind::List { list: ListKind::Round, op: ListOp::Call });
kind_callback!(cb_sn_aref, SchemaKind::List { list: ListKind::Square, op: ListOp::Call });
kind_callback!(cb_sn_struct, SchemaKind::List { list: ListKind::Curly, op: ListOp::Call });
kind_callback!(cb_sn_fstring, SchemaKind::List { list: ListKind::Str, op: ListOp::Call });
kind_callback!(cb_sn_list, SchemaKind::List { list: ListKind::Round, op: ListOp::None });
kind_callback!(cb_sn_tlist, SchemaKind::List { list: ListKind::Colon, op: ListOp::None });
kind_callback!(cb_sn_alist, SchemaKind::List { list: ListKind::Square, op: ListOp::None });
kind_callback!(cb_sn_slist, SchemaKind::List { list: ListKind::Curly, op: ListOp::None });
kind_callback!(cb_sn_binary, SchemaKind::List { list: ListKind::Operator, op: ListOp::Binary });
kind_callback!(cb_sn_unary, SchemaKind::List { list: ListKind::Operator, op: ListOp::Unary });

// ============================================================================
// Grammar construction
// ============================================================================

type Builder<C> = SchemaBuilder<BuildState<C>>;
type Cb<C> = HandlerRc<BuildState<C>>;

/// `kw: <option>? <snode>...` - container forms with any number of children.
fn arm_container<C>(b: &mut Builder<C>, kw: &str, cb: Cb<C>, may_be_empty: bool) -> SchemaNodeId {
    let kw_node = b.symbol_value(SymbolKind::Identifier, kw);
    let opt = b.rule_ref(RULE_OPTION);
    b.set_optional(opt);
    let child = b.rule_ref(RULE_SNODE);
    let children = b.listof(vec![child]);
    if may_be_empty {
        b.set_optional(children);
    }
    let tree = b.list(ListKind::Colon, ListOp::Call, vec![kw_node, opt, children]);
    b.set_cb(tree, cb);
    tree
}

/// Bare `kw`, or `kw: <option>? <snode>...` allowed empty.
fn arm_plain_list<C>(b: &mut Builder<C>, kw: &str, cb: Cb<C>) -> SchemaNodeId {
    let bare = b.symbol_value(SymbolKind::Identifier, kw);
    let kw_node = b.symbol_value(SymbolKind::Identifier, kw);
    let opt = b.rule_ref(RULE_OPTION);
    b.set_optional(opt);
    let child = b.rule_ref(RULE_SNODE);
    let children = b.listof(vec![child]);
    b.set_optional(children);
    let tree = b.list(ListKind::Colon, ListOp::Call, vec![kw_node, opt, children]);
    let arm = b.oneof(vec![bare, tree]);
    b.set_cb(arm, cb);
    arm
}

/// Bare `kw`, or `kw: <option>? "text"?` - leaf matchers.
fn arm_leaf<C: 'static>(b: &mut Builder<C>, kw: &str, cb: Cb<C>) -> SchemaNodeId {
    let bare = b.symbol_value(SymbolKind::Identifier, kw);
    let kw_node = b.symbol_value(SymbolKind::Identifier, kw);
    let opt = b.rule_ref(RULE_OPTION);
    b.set_optional(opt);
    let value = b.symbol(SymbolKind::Str);
    b.set_optional(value);
    b.set_cb(value, handler(cb_sn_set_symbol::<C>));
    let tree = b.list(ListKind::Colon, ListOp::Call, vec![kw_node, opt, value]);
    let arm = b.oneof(vec![bare, tree]);
    b.set_cb(arm, cb);
    arm
}

/// `kw: <option>? <snode>{arity}` - forms with a fixed child count.
fn arm_fixed<C>(b: &mut Builder<C>, kw: &str, cb: Cb<C>, arity: usize) -> SchemaNodeId {
    let kw_node = b.symbol_value(SymbolKind::Identifier, kw);
    let opt = b.rule_ref(RULE_OPTION);
    b.set_optional(opt);
    let mut children = vec![kw_node, opt];
    for _ in 0..arity {
        children.push(b.rule_ref(RULE_SNODE));
    }
    let tree = b.list(ListKind::Colon, ListOp::Call, children);
    b.set_cb(tree, cb);
    tree
}

pub(crate) fn bootstrap_schema<C: 'static>() -> Schema<BuildState<C>> {
    let mut b: Builder<C> = SchemaBuilder::new();

    // root: an optional operator block, then any number of rules.
    {
        let optable = b.rule_ref(RULE_OPTABLE);
        let head = b.oneof(vec![optable]);
        b.set_optional(head);
        let rule = b.rule_ref(RULE_RULE);
        let rules = b.listof(vec![rule]);
        b.set_optional(rules);
        let root = b.list(ListKind::Colon, ListOp::None, vec![head, rules]);
        b.define(RULE_ROOT, root).expect("bootstrap rule");
    }

    // optable: a plain colon-block opening with `#operators`, holding
    // priority groups. Each `{...}` group (or lone declaration) finishes one
    // priority level.
    {
        let hash = b.symbol_value(SymbolKind::Operator, "#");
        let kw = b.symbol_value(SymbolKind::Identifier, KW_OPERATORS);
        let head = b.list(ListKind::Operator, ListOp::Unary, vec![hash, kw]);

        let desc = b.rule_ref(RULE_OPDESC);
        let descs = b.listof(vec![desc]);
        b.set_optional(descs);
        let first_group = b.list(ListKind::Curly, ListOp::None, vec![descs]);
        b.set_cb(first_group, handler(cb_dec_prio::<C>));

        let lone = b.rule_ref(RULE_OPDESC);
        b.set_cb(lone, handler(cb_dec_prio::<C>));
        let desc = b.rule_ref(RULE_OPDESC);
        let descs = b.listof(vec![desc]);
        b.set_optional(descs);
        let group = b.list(ListKind::Curly, ListOp::None, vec![descs]);
        b.set_cb(group, handler(cb_dec_prio::<C>));
        let more = b.listof(vec![lone, group]);
        b.set_optional(more);

        let optable = b.list(ListKind::Colon, ListOp::None, vec![head, first_group, more]);
        b.define(RULE_OPTABLE, optable).expect("bootstrap rule");
    }

    // opdesc: `unary: '...', ...` / `binary_left_to_right: ...` /
    // `binary_right_to_left: ...`
    {
        let kw = b.symbol_value(SymbolKind::Identifier, KW_UNARY);
        let s = b.symbol(SymbolKind::Str);
        b.set_cb(s, handler(cb_op_unary::<C>));
        let strings = b.listof(vec![s]);
        let t_unary = b.list(ListKind::Colon, ListOp::Call, vec![kw, strings]);

        let kw = b.symbol_value(SymbolKind::Identifier, KW_BINARY_LTR);
        let s = b.symbol(SymbolKind::Str);
        b.set_cb(s, handler(cb_op_ltr::<C>));
        let strings = b.listof(vec![s]);
        let t_ltr = b.list(ListKind::Colon, ListOp::Call, vec![kw, strings]);

        let kw = b.symbol_value(SymbolKind::Identifier, KW_BINARY_RTL);
        let s = b.symbol(SymbolKind::Str);
        b.set_cb(s, handler(cb_op_rtl::<C>));
        let strings = b.listof(vec![s]);
        let t_rtl = b.list(ListKind::Colon, ListOp::Call, vec![kw, strings]);

        let opdesc = b.oneof(vec![t_unary, t_ltr, t_rtl]);
        b.define(RULE_OPDESC, opdesc).expect("bootstrap rule");
    }

    // rule: `name: @handler? snode`
    {
        let name = b.symbol(SymbolKind::Identifier);
        b.set_cb(name, handler(cb_rule_key::<C>));
        let h = b.rule_ref(RULE_RULE_HANDLER);
        b.set_optional(h);
        let snode = b.rule_ref(RULE_SNODE);
        let rule = b.list(ListKind::Colon, ListOp::Call, vec![name, h, snode]);
        b.define(RULE_RULE, rule).expect("bootstrap rule");
    }

    // rule_handler / handler: `@name`, differing in where the binding lands.
    {
        let at = b.symbol_value(SymbolKind::Operator, "@");
        let name = b.symbol(SymbolKind::Identifier);
        b.set_cb(name, handler(cb_rule_handler::<C>));
        let u = b.list(ListKind::Operator, ListOp::Unary, vec![at, name]);
        b.define(RULE_RULE_HANDLER, u).expect("bootstrap rule");

        let at = b.symbol_value(SymbolKind::Operator, "@");
        let name = b.symbol(SymbolKind::Identifier);
        b.set_cb(name, handler(cb_sn_set_cb::<C>));
        let u = b.list(ListKind::Operator, ListOp::Unary, vec![at, name]);
        b.define(RULE_HANDLER, u).expect("bootstrap rule");
    }

    // option: `#optional`? `#last`? `@handler`?
    {
        let hash = b.symbol_value(SymbolKind::Operator, "#");
        let kw = b.symbol_value(SymbolKind::Identifier, KW_OPTIONAL);
        let u_optional = b.list(ListKind::Operator, ListOp::Unary, vec![hash, kw]);
        b.set_optional(u_optional);
        b.set_cb(u_optional, handler(cb_sn_set_optional::<C>));

        let hash = b.symbol_value(SymbolKind::Operator, "#");
        let kw = b.symbol_value(SymbolKind::Identifier, KW_LAST);
        let u_last = b.list(ListKind::Operator, ListOp::Unary, vec![hash, kw]);
        b.set_optional(u_last);
        b.set_cb(u_last, handler(cb_sn_set_last::<C>));

        let h = b.rule_ref(RULE_HANDLER);
        b.set_optional(h);

        let option = b.seqof(vec![u_optional, u_last, h]);
        b.define(RULE_OPTION, option).expect("bootstrap rule");
    }

    // ref_one: `$name`
    {
        let dollar = b.symbol_value(SymbolKind::Operator, "$");
        let name = b.symbol(SymbolKind::Identifier);
        b.set_cb(name, handler(cb_sn_set_ref::<C>));
        let u = b.list(ListKind::Operator, ListOp::Unary, vec![dollar, name]);
        b.define(RULE_REF_ONE, u).expect("bootstrap rule");
    }

    // snode: every schema node form, most specific first.
    {
        let arm_oneof = arm_container(&mut b, KW_ONEOF, handler(cb_sn_oneof::<C>), false);
        let arm_listof = arm_container(&mut b, KW_LISTOF, handler(cb_sn_listof::<C>), false);
        let arm_seqof = arm_container(&mut b, KW_SEQOF, handler(cb_sn_seqof::<C>), false);

        // `$name`, optionally `$name: <options>`.
        let bare_ref = b.rule_ref(RULE_REF_ONE);
        let with_opts = b.rule_ref(RULE_REF_ONE);
        let opt = b.rule_ref(RULE_OPTION);
        b.set_optional(opt);
        let ref_tree = b.list(ListKind::Colon, ListOp::Call, vec![with_opts, opt]);
        let arm_ref = b.oneof(vec![bare_ref, ref_tree]);

        let arm_identifier = arm_leaf(&mut b, KW_IDENTIFIER, handler(cb_sn_identifier::<C>));
        let arm_number = arm_leaf(&mut b, KW_NUMBER, handler(cb_sn_number::<C>));
        let arm_string = arm_leaf(&mut b, KW_STRING, handler(cb_sn_string::<C>));
        let arm_operator = arm_leaf(&mut b, KW_OPERATOR, handler(cb_sn_operator::<C>));

        // `nil`, optionally `nil: <options>` - no text to pin.
        let bare_nil = b.symbol_value(SymbolKind::Identifier, KW_NIL);
        let kw_node = b.symbol_value(SymbolKind::Identifier, KW_NIL);
        let opt = b.rule_ref(RULE_OPTION);
        b.set_optional(opt);
        let nil_tree = b.list(ListKind::Colon, ListOp::Call, vec![kw_node, opt]);
        let arm_nil = b.oneof(vec![bare_nil, nil_tree]);
        b.set_cb(arm_nil, handler(cb_sn_nil::<C>));

        let arm_tree = arm_container(&mut b, KW_TREE, handler(cb_sn_tree::<C>), false);
        let arm_call = arm_container(&mut b, KW_CALL, handler(cb_sn_call::<C>), false);
        let arm_aref = arm_container(&mut b, KW_AREF, handler(cb_sn_aref::<C>), false);
        let arm_struct = arm_container(&mut b, KW_STRUCT, handler(cb_sn_struct::<C>), false);
        let arm_fstring = arm_fixed(&mut b, KW_FSTRING, handler(cb_sn_fstring::<C>), 2);

        let arm_list = arm_plain_list(&mut b, KW_LIST, handler(cb_sn_list::<C>));
        let arm_tlist = arm_plain_list(&mut b, KW_TLIST, handler(cb_sn_tlist::<C>));
        let arm_alist = arm_plain_list(&mut b, KW_ALIST, handler(cb_sn_alist::<C>));
        let arm_slist = arm_plain_list(&mut b, KW_SLIST, handler(cb_sn_slist::<C>));

        let arm_binary = arm_fixed(&mut b, KW_BINARY, handler(cb_sn_binary::<C>), 3);
        let arm_unary = arm_fixed(&mut b, KW_UNARY, handler(cb_sn_unary::<C>), 2);

        let snode = b.oneof(vec![
            arm_oneof,
            arm_listof,
            arm_seqof,
            arm_ref,
            arm_identifier,
            arm_number,
            arm_string,
            arm_operator,
            arm_nil,
            arm_tree,
            arm_call,
            arm_aref,
            arm_struct,
            arm_fstring,
            arm_list,
            arm_tlist,
            arm_alist,
            arm_slist,
            arm_binary,
            arm_unary,
        ]);
        b.set_cb(snode, handler(cb_sn_create::<C>));
        b.define(RULE_SNODE, snode).expect("bootstrap rule");
    }

    let operators = OperatorTable::from_entries(&[
        ("$", 0, OpRole::Unary),
        ("@", 0, OpRole::Unary),
        ("#", 0, OpRole::Unary),
    ]);

    b.finish(operators).expect("bootstrap registry is closed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::HandlerRc;

    #[test]
    fn bootstrap_grammar_is_complete() {
        let schema = bootstrap_schema::<()>();
        assert!(schema.registry.get(RULE_ROOT).is_some());
        assert!(schema.registry.get(RULE_SNODE).is_some());
        assert_eq!(schema.operators.len(), 3);
    }

    fn no_handlers(_name: &str) -> Option<HandlerRc<i32>> {
        None
    }

    #[test]
    fn init_builds_rules_and_operators() {
        let text = ":\n\t#operators\n\t{unary: '-'}\n\t{binary_left_to_right: '+'}\n\ntop: tlist: $x\nx: number\n";
        let module = SourceModule::synthetic(text, "schema");
        let mut resolver = no_handlers;
        let schema = Schema::<i32>::init(&module, &mut resolver).expect("init");

        assert_eq!(schema.operators.find_unary("-").unwrap().prio, 0);
        let plus = schema.operators.find_binary("+").unwrap();
        assert_eq!(plus.prio, 1);
        assert_eq!(plus.role, OpRole::Ltr);

        let mut ctx = 0;
        let source = SourceModule::synthetic("42", "src");
        schema.parse_source(&source, "top", &mut ctx).expect("match");
    }

    #[test]
    fn missing_rule_reports_the_name() {
        let text = "top: tlist: $other\n";
        let module = SourceModule::synthetic(text, "schema");
        let mut resolver = no_handlers;
        match Schema::<i32>::init(&module, &mut resolver) {
            Err(Error::MissingRule(name)) => assert_eq!(name, "other"),
            other => panic!("expected missing rule, got {:?}", other.err()),
        }
    }

    #[test]
    fn missing_handler_reports_the_name() {
        let text = "top: @nope, tlist: number\n";
        let module = SourceModule::synthetic(text, "schema");
        let mut resolver = no_handlers;
        match Schema::<i32>::init(&module, &mut resolver) {
            Err(Error::MissingHandler(name)) => assert_eq!(name, "nope"),
            other => panic!("expected missing handler, got {:?}", other.err()),
        }
    }

    #[test]
    fn duplicate_rule_is_rejected() {
        let text = "top: number\ntop: string\n";
        let module = SourceModule::synthetic(text, "schema");
        let mut resolver = no_handlers;
        match Schema::<i32>::init(&module, &mut resolver) {
            Err(Error::DuplicateRule(name)) => assert_eq!(name, "top"),
            other => panic!("expected duplicate rule, got {:?}", other.err()),
        }
    }

    #[test]
    fn schema_syntax_error_on_malformed_schema() {
        let text = "top: 12\n";
        let module = SourceModule::synthetic(text, "schema");
        let mut resolver = no_handlers;
        assert!(matches!(
            Schema::<i32>::init(&module, &mut resolver),
            Err(Error::SchemaSyntax { .. })
        ));
    }
}
