//! Keywords and rule names of the schema language.
//!
//! Only names referenced from more than one module live here; the bootstrap
//! grammar, the formatter and the tests all spell these the same way.

// ============================================================================
// Bootstrap rule names
// ============================================================================

/// Top rule matched against a whole schema file.
pub const RULE_ROOT: &str = "root";
/// The `#operators` block.
pub const RULE_OPTABLE: &str = "optable";
/// One operator declaration inside the block.
pub const RULE_OPDESC: &str = "opdesc";
/// One `name: ...` rule definition.
pub const RULE_RULE: &str = "rule";
/// A rule-level `@name` binding.
pub const RULE_RULE_HANDLER: &str = "rule_handler";
/// An `@name` binding inside a schema node's options.
pub const RULE_HANDLER: &str = "handler";
/// The `#optional` / `#last` / `@handler` option run.
pub const RULE_OPTION: &str = "option";
/// A `$name` rule reference.
pub const RULE_REF_ONE: &str = "ref_one";
/// One schema node form.
pub const RULE_SNODE: &str = "snode";

// ============================================================================
// Schema language keywords
// ============================================================================

pub const KW_OPERATORS: &str = "operators";
/// Role keyword in the operator block, and the unary list matcher.
pub const KW_UNARY: &str = "unary";
pub const KW_BINARY_LTR: &str = "binary_left_to_right";
pub const KW_BINARY_RTL: &str = "binary_right_to_left";

pub const KW_ONEOF: &str = "oneof";
pub const KW_LISTOF: &str = "listof";
pub const KW_SEQOF: &str = "seqof";

pub const KW_IDENTIFIER: &str = "identifier";
pub const KW_NUMBER: &str = "number";
pub const KW_STRING: &str = "string";
pub const KW_OPERATOR: &str = "operator";
pub const KW_NIL: &str = "nil";

pub const KW_TREE: &str = "tree";
pub const KW_CALL: &str = "call";
pub const KW_AREF: &str = "aref";
pub const KW_STRUCT: &str = "struct";
pub const KW_FSTRING: &str = "fstring";
pub const KW_LIST: &str = "list";
pub const KW_TLIST: &str = "tlist";
pub const KW_ALIST: &str = "alist";
pub const KW_SLIST: &str = "slist";
pub const KW_BINARY: &str = "binary";

pub const KW_OPTIONAL: &str = "optional";
pub const KW_LAST: &str = "last";
