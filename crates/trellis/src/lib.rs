//! trellis - an embeddable parsing toolkit.
//!
//! Two coupled halves:
//!
//! - **Text to tree**: a lexer plus an indentation- and operator-sensitive
//!   tree builder that turns a character stream into a typed AST
//!   ([`parse`]).
//! - **Schema engine**: a tree-shaped grammar description with a named-rule
//!   registry, a backtracking matcher that aligns a schema against an AST,
//!   and dispatch of consumer callbacks over the matched structure
//!   ([`Schema`]).
//!
//! The schema language is self-hosted: the grammar describing schema text is
//! itself a fixed schema tree, run by the same matcher over whatever schema
//! the consumer supplies. A consumer brings only schema text and a resolver
//! from `@name` bindings to callbacks.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use trellis::{parse, OperatorTable, OpRole, SourceModule};
//!
//! let ops = OperatorTable::from_entries(&[
//!     ("*", 3, OpRole::Ltr),
//!     ("+", 4, OpRole::Ltr),
//! ]);
//! let arena = Bump::new();
//! let module = SourceModule::synthetic("1 + 2 * 3", "example");
//! let root = parse(&arena, &module, &ops).unwrap();
//! assert_eq!(trellis::node_to_string(root), "(tlist (binary + 1 (binary * 2 3)))");
//! ```

pub mod constants;
mod bootstrap;
mod error;
mod format;
mod lexer;
mod matcher;
mod node;
mod optable;
mod parser;
mod schema;

pub use error::Error;
pub use format::{format_error, format_node, node_to_string};
pub use node::{AstNode, ListKind, ListOp, NodeKind, SymbolKind};
pub use optable::{OpRole, Operator, OperatorTable};
pub use parser::parse;
pub use schema::{handler, HandlerFn, HandlerRc, HandlerResolver, Handlers, Schema};

// Re-export the shared infrastructure consumers interact with.
pub use common::{SourceLoc, SourceModule};
