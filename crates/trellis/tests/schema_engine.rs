//! End-to-end schema engine tests: schema text in, callbacks out.

use indoc::indoc;
use trellis::{
    handler, AstNode, Error, HandlerRc, Handlers, Schema, SourceLoc, SourceModule,
};

fn init<C: 'static>(
    schema_text: &str,
    mut resolver: impl FnMut(&str) -> Option<HandlerRc<C>>,
) -> Result<Schema<C>, Error> {
    let module = SourceModule::synthetic(schema_text, "schema");
    Schema::init(&module, &mut resolver)
}

fn run<C>(schema: &Schema<C>, source: &str, top: &str, ctx: &mut C) -> Result<(), Error> {
    let module = SourceModule::synthetic(source, "source");
    schema.parse_source(&module, top, ctx)
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

const CALC_SCHEMA: &str = indoc! {"
    ` integer expression grammar
    :
    \t#operators
    \t{unary: '+', '-'}
    \t{binary_left_to_right: '*', '/'}
    \t{binary_left_to_right: '+', '-'}

    top: tlist: $expr
    expr: oneof:
    \t\tnumber: @num
    \t\tlist: $expr
    \t\tunary: @neg
    \t\t\toperator: \"-\"
    \t\t\t$expr
    \t\tunary: @pos
    \t\t\toperator: \"+\"
    \t\t\t$expr
    \t\tbinary: @add
    \t\t\toperator: \"+\"
    \t\t\t$expr
    \t\t\t$expr
    \t\tbinary: @sub
    \t\t\toperator: \"-\"
    \t\t\t$expr
    \t\t\t$expr
    \t\tbinary: @mul
    \t\t\toperator: \"*\"
    \t\t\t$expr
    \t\t\t$expr
    \t\tbinary: @div
    \t\t\toperator: \"/\"
    \t\t\t$expr
    \t\t\t$expr
"};

fn cb_num(_hl: Handlers<'_, '_, i32>, n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    *ctx = n
        .value()
        .parse()
        .map_err(|_| Error::handler("not an integer"))?;
    Ok(())
}

fn binary_operands(hl: Handlers<'_, '_, i32>) -> Result<(i32, i32), Error> {
    let mut a = 0;
    let mut b = 0;
    hl.eval(1, &mut a)?;
    hl.eval(2, &mut b)?;
    Ok((a, b))
}

fn cb_add(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let (a, b) = binary_operands(hl)?;
    *ctx = a + b;
    Ok(())
}

fn cb_sub(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let (a, b) = binary_operands(hl)?;
    *ctx = a - b;
    Ok(())
}

fn cb_mul(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let (a, b) = binary_operands(hl)?;
    *ctx = a * b;
    Ok(())
}

fn cb_div(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let (a, b) = binary_operands(hl)?;
    if b == 0 {
        return Err(Error::handler("division by zero"));
    }
    *ctx = a / b;
    Ok(())
}

fn cb_neg(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let mut a = 0;
    hl.eval(1, &mut a)?;
    *ctx = -a;
    Ok(())
}

fn cb_pos(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let mut a = 0;
    hl.eval(1, &mut a)?;
    *ctx = a;
    Ok(())
}

fn calc_resolver(name: &str) -> Option<HandlerRc<i32>> {
    match name {
        "num" => Some(handler(cb_num)),
        "add" => Some(handler(cb_add)),
        "sub" => Some(handler(cb_sub)),
        "mul" => Some(handler(cb_mul)),
        "div" => Some(handler(cb_div)),
        "neg" => Some(handler(cb_neg)),
        "pos" => Some(handler(cb_pos)),
        _ => None,
    }
}

fn calc(source: &str) -> Result<i32, Error> {
    let schema = init(CALC_SCHEMA, calc_resolver)?;
    let mut result = 0;
    run(&schema, source, "top", &mut result)?;
    Ok(result)
}

#[test]
fn precedence_drives_evaluation() {
    assert_eq!(calc("1 + 2 * 3").unwrap(), 7);
    assert_eq!(calc("2 * 3 + 1").unwrap(), 7);
    assert_eq!(calc("10 - 2 - 3").unwrap(), 5);
}

#[test]
fn parenthesized_subexpressions() {
    assert_eq!(calc("(1 + 2) * 3").unwrap(), 9);
}

#[test]
fn unary_operators_evaluate() {
    assert_eq!(calc("-4 + 10").unwrap(), 6);
    assert_eq!(calc("+4").unwrap(), 4);
    assert_eq!(calc("2 * -3").unwrap(), -6);
}

#[test]
fn callback_failure_propagates_unchanged() {
    match calc("1 / 0") {
        Err(Error::Handler(msg)) => assert_eq!(msg, "division by zero"),
        other => panic!("expected handler error, got {other:?}"),
    }
}

#[test]
fn undeclared_operator_fails_the_parse() {
    assert!(matches!(calc("1 % 2"), Err(Error::UnknownBinary { .. })));
}

#[test]
fn missing_top_rule_is_reported() {
    let schema = init(CALC_SCHEMA, calc_resolver).unwrap();
    let mut ctx = 0;
    match run(&schema, "1", "nope", &mut ctx) {
        Err(Error::MissingTopRule(name)) => assert_eq!(name, "nope"),
        other => panic!("expected missing top rule, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Call syntax vs. plain lists
// ---------------------------------------------------------------------------

const SHAPE_SCHEMA: &str = indoc! {"
    as_call: tlist: call: identifier, identifier, identifier
    as_list: tlist: list: identifier, identifier
"};

#[test]
fn call_and_plain_lists_are_distinct_shapes() {
    let schema = init::<()>(SHAPE_SCHEMA, |_| None).unwrap();
    let mut ctx = ();

    assert!(run(&schema, "f(x, y)", "as_call", &mut ctx).is_ok());
    assert!(run(&schema, "(x, y)", "as_list", &mut ctx).is_ok());

    // A plain list has no callee slot and vice versa.
    assert!(matches!(
        run(&schema, "(x, y)", "as_call", &mut ctx),
        Err(Error::SchemaSyntax { .. })
    ));
    assert!(matches!(
        run(&schema, "f(x, y)", "as_list", &mut ctx),
        Err(Error::SchemaSyntax { .. })
    ));
}

// ---------------------------------------------------------------------------
// Colon blocks
// ---------------------------------------------------------------------------

const BLOCK_SCHEMA: &str = indoc! {"
    top: tlist: $block
    block: tree: listof: identifier: @name
"};

fn cb_name(
    _hl: Handlers<'_, '_, Vec<String>>,
    n: &AstNode<'_>,
    ctx: &mut Vec<String>,
) -> Result<(), Error> {
    ctx.push(n.value().to_string());
    Ok(())
}

#[test]
fn colon_block_nests_by_indentation() {
    let schema = init(BLOCK_SCHEMA, |name| match name {
        "name" => Some(handler(cb_name)),
        _ => None,
    })
    .unwrap();

    let mut names = Vec::new();
    run(&schema, "a:\n\tb\n\tc", "top", &mut names).unwrap();
    assert_eq!(names, ["a", "b", "c"]);
}

// ---------------------------------------------------------------------------
// Optional slots and evaluability
// ---------------------------------------------------------------------------

const ENTRY_SCHEMA: &str = indoc! {"
    top: tlist: listof: $entry
    entry: @entry, tree:
    \t\tidentifier
    \t\tnumber: #optional
    \t\tstring: #optional
"};

fn cb_entry(
    hl: Handlers<'_, '_, Vec<(bool, bool)>>,
    _n: &AstNode<'_>,
    ctx: &mut Vec<(bool, bool)>,
) -> Result<(), Error> {
    ctx.push((hl.evalable(1), hl.evalable(2)));
    Ok(())
}

#[test]
fn optional_misses_are_not_evalable() {
    let schema = init(ENTRY_SCHEMA, |name| match name {
        "entry" => Some(handler(cb_entry)),
        _ => None,
    })
    .unwrap();

    let mut seen = Vec::new();
    run(
        &schema,
        "a: 1\nb: 'x'\nc: 2, 'y'",
        "top",
        &mut seen,
    )
    .unwrap();
    assert_eq!(seen, [(true, false), (false, true), (true, true)]);
}

// ---------------------------------------------------------------------------
// Nil placeholders from bare commas
// ---------------------------------------------------------------------------

const CELLS_SCHEMA: &str = indoc! {"
    top: tlist: list: $cell, $cell, $cell
    cell: oneof:
    \t\tnumber: @cell_num
    \t\tnil: @cell_blank
"};

fn cb_cell_num(
    _hl: Handlers<'_, '_, Vec<Option<i32>>>,
    n: &AstNode<'_>,
    ctx: &mut Vec<Option<i32>>,
) -> Result<(), Error> {
    let v = n.value().parse().map_err(|_| Error::handler("bad cell"))?;
    ctx.push(Some(v));
    Ok(())
}

fn cb_cell_blank(
    _hl: Handlers<'_, '_, Vec<Option<i32>>>,
    _n: &AstNode<'_>,
    ctx: &mut Vec<Option<i32>>,
) -> Result<(), Error> {
    ctx.push(None);
    Ok(())
}

#[test]
fn bare_comma_slots_match_and_evaluate() {
    let schema = init(CELLS_SCHEMA, |name| match name {
        "cell_num" => Some(handler(cb_cell_num)),
        "cell_blank" => Some(handler(cb_cell_blank)),
        _ => None,
    })
    .unwrap();

    let mut cells = Vec::new();
    run(&schema, "(1,,2)", "top", &mut cells).unwrap();
    assert_eq!(cells, [Some(1), None, Some(2)]);
}

// ---------------------------------------------------------------------------
// Schema-build failures
// ---------------------------------------------------------------------------

fn cb_pass(hl: Handlers<'_, '_, ()>, _n: &AstNode<'_>, ctx: &mut ()) -> Result<(), Error> {
    hl.eval_all(ctx)
}

#[test]
fn rule_level_handler_with_undefined_reference() {
    // `rule: @handler $other` - the handler resolves, the rule does not.
    let text = "rule: @handle_it, $other\n";
    let result = init::<()>(text, |name| match name {
        "handle_it" => Some(handler(cb_pass)),
        _ => None,
    });
    match result {
        Err(Error::MissingRule(name)) => assert_eq!(name, "other"),
        other => panic!("expected missing rule, got {:?}", other.err()),
    }
}

#[test]
fn unresolved_handler_name_fails_the_build() {
    let text = "rule: @foo, number\n";
    match init::<()>(text, |_| None) {
        Err(Error::MissingHandler(name)) => assert_eq!(name, "foo"),
        other => panic!("expected missing handler, got {:?}", other.err()),
    }
}

// ---------------------------------------------------------------------------
// Required elements vs. empty input
// ---------------------------------------------------------------------------

const REQUIRED_SCHEMA: &str = indoc! {"
    top: tlist: list: $item
    item: number
"};

#[test]
fn empty_list_fails_a_required_sequence() {
    let schema = init::<()>(REQUIRED_SCHEMA, |_| None).unwrap();
    let mut ctx = ();
    match run(&schema, "( )", "top", &mut ctx) {
        Err(Error::SchemaSyntax { loc: Some(loc) }) => {
            // Anchored at the offending list itself.
            assert_eq!((loc.line, loc.col), (1, 1));
        }
        other => panic!("expected anchored syntax error, got {other:?}"),
    }
}

#[test]
fn zero_repetitions_of_an_optional_list_are_fine() {
    let text = indoc! {"
        top: tlist: listof: #optional, $item
        item: number
    "};
    let schema = init::<()>(text, |_| None).unwrap();
    let mut ctx = ();
    assert!(run(&schema, "", "top", &mut ctx).is_ok());
    assert!(run(&schema, "1, 2, 3", "top", &mut ctx).is_ok());
}

#[test]
fn match_failure_without_progress_is_anchored_at_the_first_node() {
    let schema = init::<()>(REQUIRED_SCHEMA, |_| None).unwrap();
    let mut ctx = ();
    match run(&schema, "x", "top", &mut ctx) {
        Err(Error::SchemaSyntax { loc }) => {
            assert_eq!(loc, Some(SourceLoc::new(1, 1, 0)));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}
