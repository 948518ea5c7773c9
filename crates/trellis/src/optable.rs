//! Operator tables.
//!
//! An operator table is an ordered list of spellings with a binding priority
//! and a role. Lower priority binds tighter. The same spelling may appear
//! once per role class (unary vs. binary); lookup scans in table order and
//! the first hit wins.

/// How an operator combines operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpRole {
    /// Prefix operator, one operand.
    Unary,
    /// Left-to-right associative binary operator.
    Ltr,
    /// Right-to-left associative binary operator.
    Rtl,
}

impl OpRole {
    pub fn is_binary(self) -> bool {
        matches!(self, OpRole::Ltr | OpRole::Rtl)
    }
}

/// One declared operator.
#[derive(Debug, Clone)]
pub struct Operator {
    pub spelling: String,
    pub prio: u32,
    pub role: OpRole,
}

/// Ordered operator registry consulted by the AST builder.
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    ops: Vec<Operator>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(spelling, prio, role)` triples, in order.
    pub fn from_entries(entries: &[(&str, u32, OpRole)]) -> Self {
        let mut table = Self::new();
        for &(spelling, prio, role) in entries {
            table.add(spelling, prio, role);
        }
        table
    }

    pub fn add(&mut self, spelling: &str, prio: u32, role: OpRole) {
        self.ops.push(Operator {
            spelling: spelling.to_string(),
            prio,
            role,
        });
    }

    /// Look up `spelling` as a unary operator.
    pub fn find_unary(&self, spelling: &str) -> Option<&Operator> {
        self.ops
            .iter()
            .find(|op| op.role == OpRole::Unary && op.spelling == spelling)
    }

    /// Look up `spelling` as a binary operator (either associativity).
    pub fn find_binary(&self, spelling: &str) -> Option<&Operator> {
        self.ops
            .iter()
            .find(|op| op.role.is_binary() && op.spelling == spelling)
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_role_class() {
        let table = OperatorTable::from_entries(&[
            ("-", 2, OpRole::Unary),
            ("-", 4, OpRole::Ltr),
            ("=", 13, OpRole::Rtl),
        ]);
        assert_eq!(table.find_unary("-").unwrap().prio, 2);
        assert_eq!(table.find_binary("-").unwrap().prio, 4);
        assert_eq!(table.find_binary("=").unwrap().role, OpRole::Rtl);
        assert!(table.find_unary("=").is_none());
        assert!(table.find_binary("?").is_none());
    }

    #[test]
    fn first_match_wins() {
        let table = OperatorTable::from_entries(&[
            ("+", 1, OpRole::Ltr),
            ("+", 9, OpRole::Ltr),
        ]);
        assert_eq!(table.find_binary("+").unwrap().prio, 1);
    }
}
