//! Output formatting for trees and errors.
//!
//! Diagnostic conveniences, not load-bearing: the compact s-expression dump
//! is what the tree tests compare against, the pretty dump is for eyeballing,
//! and the caret renderer turns an [`Error`] plus its source module into a
//! three-line report.

use common::SourceModule;

use crate::constants::*;
use crate::error::Error;
use crate::node::{AstNode, ListKind, ListOp, NodeKind, SymbolKind};

/// Tag for a list node, spelled like the schema language keyword that
/// matches it.
fn list_tag(list: ListKind, op: ListOp) -> &'static str {
    match (list, op) {
        (ListKind::Colon, ListOp::Call) => KW_TREE,
        (ListKind::Colon, _) => KW_TLIST,
        (ListKind::Round, ListOp::Call) => KW_CALL,
        (ListKind::Round, _) => KW_LIST,
        (ListKind::Square, ListOp::Call) => KW_AREF,
        (ListKind::Square, _) => KW_ALIST,
        (ListKind::Curly, ListOp::Call) => KW_STRUCT,
        (ListKind::Curly, _) => KW_SLIST,
        (ListKind::Str, _) => KW_FSTRING,
        (ListKind::Operator, ListOp::Binary) => KW_BINARY,
        (ListKind::Operator, _) => KW_UNARY,
    }
}

fn sym_tag(sym: SymbolKind) -> &'static str {
    match sym {
        SymbolKind::Identifier => KW_IDENTIFIER,
        SymbolKind::Number => KW_NUMBER,
        SymbolKind::Str => KW_STRING,
        SymbolKind::Operator => KW_OPERATOR,
        SymbolKind::Nil => KW_NIL,
    }
}

/// Compact one-line s-expression dump.
///
/// Symbols print as their text (strings quoted, nil as `nil`); lists print
/// as `(tag child ...)`.
pub fn node_to_string(node: &AstNode<'_>) -> String {
    match node.kind {
        NodeKind::Symbol { sym, value } => match sym {
            SymbolKind::Str => format!("\"{}\"", value),
            SymbolKind::Nil => KW_NIL.to_string(),
            _ => value.to_string(),
        },
        NodeKind::List { list, op, children, .. } => {
            let mut out = String::new();
            out.push('(');
            out.push_str(list_tag(list, op));
            for child in children {
                out.push(' ');
                out.push_str(&node_to_string(child));
            }
            out.push(')');
            out
        }
    }
}

/// Pretty multi-line dump, one node per line, children indented.
pub fn format_node(node: &AstNode<'_>, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    match node.kind {
        NodeKind::Symbol { sym, value } => {
            if sym == SymbolKind::Nil {
                format!("{}nil @{}:{}\n", prefix, node.loc.line, node.loc.col)
            } else {
                format!(
                    "{}{} \"{}\" @{}:{}\n",
                    prefix,
                    sym_tag(sym),
                    value,
                    node.loc.line,
                    node.loc.col
                )
            }
        }
        NodeKind::List { list, op, children, .. } => {
            let mut out = format!(
                "{}{} @{}:{}\n",
                prefix,
                list_tag(list, op),
                node.loc.line,
                node.loc.col
            );
            for child in children {
                out.push_str(&format_node(child, indent + 1));
            }
            out
        }
    }
}

/// Caret-style error report:
///
/// ```text
/// file.tl:2:5: separator expected
///   some source line
///       ^
/// ```
///
/// The caret line copies the source line's whitespace so tabs keep their
/// width. Errors with no location get the one-line form.
pub fn format_error(err: &Error, module: &SourceModule<'_>) -> String {
    match err.location() {
        Some(loc) => {
            let line = module.line_at(loc.line_start);
            let mut pad = String::new();
            for ch in line.chars().take(loc.col.saturating_sub(1) as usize) {
                pad.push(if ch.is_whitespace() { ch } else { ' ' });
            }
            format!(
                "{}:{}:{}: {}\n  {}\n  {}^",
                module.id, loc.line, loc.col, err, line, pad
            )
        }
        None => format!("{}: {}", module.id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::SourceLoc;

    #[test]
    fn caret_alignment_preserves_tabs() {
        let module = SourceModule::synthetic("a\n\tx ?", "t.tl");
        let err = Error::UnknownToken {
            loc: SourceLoc::new(2, 4, 2),
        };
        let report = format_error(&err, &module);
        assert_eq!(report, "t.tl:2:4: unknown character\n  \tx ?\n  \t  ^");
    }

    #[test]
    fn errors_without_location() {
        let module = SourceModule::synthetic("", "t.tl");
        let err = Error::MissingRule("expr".to_string());
        assert_eq!(format_error(&err, &module), "t.tl: rule 'expr' not found");
    }
}
