//! Integer calculator: the smallest complete consumer.
//!
//! The schema declares the operator table and one expression rule; the
//! callbacks evaluate into an `i32` context threaded through dispatch.
//!
//! Run with an expression argument, or let it evaluate the default:
//!
//! ```text
//! cargo run --example calc -- "2 * (3 + 4)"
//! ```

use trellis::{handler, AstNode, Error, HandlerRc, Handlers, Schema, SourceModule};

const SCHEMA: &str = "\
:
\t#operators
\t{unary: '+', '-'}
\t{binary_left_to_right: '*', '/'}
\t{binary_left_to_right: '+', '-'}

top: @print, tlist: $expr
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
";

fn cb_num(_hl: Handlers<'_, '_, i32>, n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    *ctx = n
        .value()
        .parse()
        .map_err(|_| Error::handler(format!("not an integer: {}", n.value())))?;
    Ok(())
}

fn operands(hl: Handlers<'_, '_, i32>) -> Result<(i32, i32), Error> {
    let mut a = 0;
    let mut b = 0;
    hl.eval(1, &mut a)?;
    hl.eval(2, &mut b)?;
    Ok((a, b))
}

fn cb_add(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let (a, b) = operands(hl)?;
    *ctx = a + b;
    Ok(())
}

fn cb_sub(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let (a, b) = operands(hl)?;
    *ctx = a - b;
    Ok(())
}

fn cb_mul(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let (a, b) = operands(hl)?;
    *ctx = a * b;
    Ok(())
}

fn cb_div(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let (a, b) = operands(hl)?;
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

fn cb_print(hl: Handlers<'_, '_, i32>, _n: &AstNode<'_>, ctx: &mut i32) -> Result<(), Error> {
    let mut value = 0;
    hl.eval(0, &mut value)?;
    println!("{value}");
    *ctx = value;
    Ok(())
}

fn resolve(name: &str) -> Option<HandlerRc<i32>> {
    match name {
        "num" => Some(handler(cb_num)),
        "add" => Some(handler(cb_add)),
        "sub" => Some(handler(cb_sub)),
        "mul" => Some(handler(cb_mul)),
        "div" => Some(handler(cb_div)),
        "neg" => Some(handler(cb_neg)),
        "pos" => Some(handler(cb_pos)),
        "print" => Some(handler(cb_print)),
        _ => None,
    }
}

fn main() {
    let input = std::env::args().nth(1).unwrap_or_else(|| "1 + 2 * 3".to_string());

    let schema_module = SourceModule::synthetic(SCHEMA, "<calc schema>");
    let mut resolver = resolve;
    let schema = match Schema::init(&schema_module, &mut resolver) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("{}", trellis::format_error(&err, &schema_module));
            std::process::exit(1);
        }
    };

    let module = SourceModule::synthetic(&input, "<input>");
    let mut result = 0;
    if let Err(err) = schema.parse_source(&module, "top", &mut result) {
        eprintln!("{}", trellis::format_error(&err, &module));
        std::process::exit(1);
    }
}
