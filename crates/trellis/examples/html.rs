//! HTML construction DSL: nested colon-blocks become nested elements.
//!
//! ```text
//! html:
//!     body:
//!         div: {class = 'box'}
//!             p 'hello'
//! ```
//!
//! Element callbacks own the traversal order: the tag prints twice (open and
//! close), attributes and children only if their slots matched.

use trellis::{handler, AstNode, Error, HandlerRc, Handlers, Schema, SourceModule};

const SCHEMA: &str = "\
:
\t#operators
\t{binary_right_to_left: '='}

top: tlist: $elem
elem: oneof:
\t\tfstring: @textnode
\t\t\tidentifier: @print
\t\t\tstring: @print
\t\ttree: @node
\t\t\tidentifier: @print
\t\t\tslist: #optional
\t\t\t\tlistof:
\t\t\t\t\t$attr: @attr_sep
\t\t\tlistof: #optional
\t\t\t\t$elem
attr: binary: @attr_assign
\t\toperator: \"=\"
\t\tidentifier: @print
\t\tstring: @print
";

const DEFAULT_SOURCE: &str = "\
html:
\thead:
\t\ttitle 'A page'
\tbody: {class = 'wide'}
\t\tdiv: {class = 'box', id = 'main'}
\t\t\tp 'hello'
\t\tp 'bye'
";

#[derive(Default)]
struct Doc {
    out: String,
    level: usize,
}

impl Doc {
    fn indent(&mut self) {
        for _ in 0..self.level {
            self.out.push('\t');
        }
    }
}

fn cb_print(_hl: Handlers<'_, '_, Doc>, n: &AstNode<'_>, ctx: &mut Doc) -> Result<(), Error> {
    ctx.out.push_str(n.value());
    Ok(())
}

/// `tag 'text'` - a one-line element.
fn cb_textnode(hl: Handlers<'_, '_, Doc>, _n: &AstNode<'_>, ctx: &mut Doc) -> Result<(), Error> {
    ctx.indent();
    ctx.out.push('<');
    hl.eval(0, ctx)?;
    ctx.out.push('>');
    hl.eval(1, ctx)?;
    ctx.out.push_str("</");
    hl.eval(0, ctx)?;
    ctx.out.push_str(">\n");
    Ok(())
}

/// `tag: {attrs}? children...` - a block element.
fn cb_node(hl: Handlers<'_, '_, Doc>, _n: &AstNode<'_>, ctx: &mut Doc) -> Result<(), Error> {
    ctx.indent();
    ctx.out.push('<');
    hl.eval(0, ctx)?;
    if hl.evalable(1) {
        hl.eval(1, ctx)?;
    }
    if hl.evalable(2) {
        ctx.out.push_str(">\n");
        ctx.level += 1;
        hl.eval(2, ctx)?;
        ctx.level -= 1;
        ctx.indent();
        ctx.out.push_str("</");
        hl.eval(0, ctx)?;
        ctx.out.push_str(">\n");
    } else {
        ctx.out.push_str(" />\n");
    }
    Ok(())
}

fn cb_attr_sep(hl: Handlers<'_, '_, Doc>, _n: &AstNode<'_>, ctx: &mut Doc) -> Result<(), Error> {
    ctx.out.push(' ');
    hl.eval_all(ctx)
}

fn cb_attr_assign(hl: Handlers<'_, '_, Doc>, _n: &AstNode<'_>, ctx: &mut Doc) -> Result<(), Error> {
    hl.eval(1, ctx)?;
    ctx.out.push_str("=\"");
    hl.eval(2, ctx)?;
    ctx.out.push('"');
    Ok(())
}

fn resolve(name: &str) -> Option<HandlerRc<Doc>> {
    match name {
        "print" => Some(handler(cb_print)),
        "textnode" => Some(handler(cb_textnode)),
        "node" => Some(handler(cb_node)),
        "attr_sep" => Some(handler(cb_attr_sep)),
        "attr_assign" => Some(handler(cb_attr_assign)),
        _ => None,
    }
}

fn main() {
    let source = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("{path}: {err}");
                std::process::exit(1);
            }
        },
        None => DEFAULT_SOURCE.to_string(),
    };

    let schema_module = SourceModule::synthetic(SCHEMA, "<html schema>");
    let mut resolver = resolve;
    let schema = match Schema::init(&schema_module, &mut resolver) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("{}", trellis::format_error(&err, &schema_module));
            std::process::exit(1);
        }
    };

    let module = SourceModule::synthetic(&source, "<document>");
    let mut doc = Doc::default();
    if let Err(err) = schema.parse_source(&module, "top", &mut doc) {
        eprintln!("{}", trellis::format_error(&err, &module));
        std::process::exit(1);
    }

    print!("{}", doc.out);
}
