//! Parse-tree tests over `tests/ast/*.tl` fixtures.
//!
//! Each fixture is parsed with a fixed operator table; the compact
//! s-expression dump (or the caret-formatted error) must equal the
//! `.expected` file next to it.

use std::path::Path;

use bumpalo::Bump;
use datatest_stable::harness;
use trellis::{format_error, node_to_string, parse, OpRole, OperatorTable, SourceModule};

fn table() -> OperatorTable {
    OperatorTable::from_entries(&[
        (".", 0, OpRole::Unary),
        ("$", 0, OpRole::Unary),
        ("@", 0, OpRole::Unary),
        (".", 0, OpRole::Ltr),
        ("->", 0, OpRole::Ltr),
        ("!", 2, OpRole::Unary),
        ("~", 2, OpRole::Unary),
        ("+", 2, OpRole::Unary),
        ("-", 2, OpRole::Unary),
        ("*", 3, OpRole::Ltr),
        ("/", 3, OpRole::Ltr),
        ("%", 3, OpRole::Ltr),
        ("+", 4, OpRole::Ltr),
        ("-", 4, OpRole::Ltr),
        ("<<", 5, OpRole::Ltr),
        (">>", 5, OpRole::Ltr),
        ("<", 6, OpRole::Ltr),
        (">", 6, OpRole::Ltr),
        ("<=", 6, OpRole::Ltr),
        (">=", 6, OpRole::Ltr),
        ("==", 7, OpRole::Ltr),
        ("!=", 7, OpRole::Ltr),
        ("&&", 11, OpRole::Ltr),
        ("||", 12, OpRole::Ltr),
        ("=", 13, OpRole::Rtl),
        ("+=", 13, OpRole::Rtl),
    ])
}

fn run_test(path: &Path) -> datatest_stable::Result<()> {
    let input = std::fs::read_to_string(path)?;
    let expected_path = format!("{}.expected", path.display());
    let expected = std::fs::read_to_string(&expected_path)?.trim_end().to_string();
    let name = path.file_name().unwrap().to_str().unwrap();

    let arena = Bump::new();
    let module = SourceModule::file(&input, name);
    let actual = match parse(&arena, &module, &table()) {
        Ok(root) => node_to_string(root),
        Err(err) => format_error(&err, &module),
    };

    if actual != expected {
        return Err(format!(
            "mismatch for {:?}\n\nExpected:\n{}\n\nActual:\n{}",
            path, expected, actual
        )
        .into());
    }
    Ok(())
}

harness!(run_test, "tests/ast", r"\.tl$");
