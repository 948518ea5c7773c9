//! Structured config loader: callbacks that fill a plain data structure.
//!
//! Each `item:` line carries an id, a value, an optional `selected` marker
//! and an optional text. The dispatch context is the list under
//! construction; the optional slots show up as non-evaluable handler
//! positions and simply leave the defaults in place.

use trellis::{handler, AstNode, Error, HandlerRc, Handlers, Schema, SourceModule};

const SCHEMA: &str = "\
top: tlist: listof: $item
item: @item, tree:
\t\tidentifier: \"item\"
\t\tnumber: @id
\t\tnumber: @value
\t\tidentifier: #optional, @selected, \"selected\"
\t\tstring: #optional, @text
";

const DEFAULT_SOURCE: &str = "\
item: 1, 100, selected, 'first entry'
item: 2, 30
item: 3, 250, 'unselected but described'
";

#[derive(Debug, Default)]
struct Item {
    id: i64,
    value: i64,
    selected: bool,
    text: String,
}

type Items = Vec<Item>;

fn last_item(ctx: &mut Items) -> Result<&mut Item, Error> {
    ctx.last_mut()
        .ok_or_else(|| Error::handler("field outside of an item"))
}

fn cb_item(hl: Handlers<'_, '_, Items>, _n: &AstNode<'_>, ctx: &mut Items) -> Result<(), Error> {
    ctx.push(Item::default());
    hl.eval_all(ctx)
}

fn cb_id(_hl: Handlers<'_, '_, Items>, n: &AstNode<'_>, ctx: &mut Items) -> Result<(), Error> {
    last_item(ctx)?.id = n
        .value()
        .parse()
        .map_err(|_| Error::handler("id is not an integer"))?;
    Ok(())
}

fn cb_value(_hl: Handlers<'_, '_, Items>, n: &AstNode<'_>, ctx: &mut Items) -> Result<(), Error> {
    last_item(ctx)?.value = n
        .value()
        .parse()
        .map_err(|_| Error::handler("value is not an integer"))?;
    Ok(())
}

fn cb_selected(
    _hl: Handlers<'_, '_, Items>,
    _n: &AstNode<'_>,
    ctx: &mut Items,
) -> Result<(), Error> {
    last_item(ctx)?.selected = true;
    Ok(())
}

fn cb_text(_hl: Handlers<'_, '_, Items>, n: &AstNode<'_>, ctx: &mut Items) -> Result<(), Error> {
    last_item(ctx)?.text = n.value().to_string();
    Ok(())
}

fn resolve(name: &str) -> Option<HandlerRc<Items>> {
    match name {
        "item" => Some(handler(cb_item)),
        "id" => Some(handler(cb_id)),
        "value" => Some(handler(cb_value)),
        "selected" => Some(handler(cb_selected)),
        "text" => Some(handler(cb_text)),
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

    let schema_module = SourceModule::synthetic(SCHEMA, "<config schema>");
    let mut resolver = resolve;
    let schema = match Schema::init(&schema_module, &mut resolver) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("{}", trellis::format_error(&err, &schema_module));
            std::process::exit(1);
        }
    };

    let module = SourceModule::synthetic(&source, "<config>");
    let mut items = Items::new();
    if let Err(err) = schema.parse_source(&module, "top", &mut items) {
        eprintln!("{}", trellis::format_error(&err, &module));
        std::process::exit(1);
    }

    for item in &items {
        println!(
            "id: {}, value: {}, selected: {}, text: {}",
            item.id, item.value, item.selected, item.text
        );
    }
}
