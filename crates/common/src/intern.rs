//! Arena-backed string interning.

use bumpalo::Bump;
use std::collections::HashMap;

/// Deduplicating string store over a borrowed arena.
///
/// Interned strings live as long as the arena, so tree nodes can hold plain
/// `&'a str` values with no ownership bookkeeping. Repeated spellings (the
/// common case for identifiers and operators) share one allocation.
pub struct StringInterner<'a> {
    arena: &'a Bump,
    known: HashMap<&'a str, ()>,
}

impl<'a> StringInterner<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            arena,
            known: HashMap::new(),
        }
    }

    /// Return the interned copy of `s`, allocating it on first sight.
    pub fn intern(&mut self, s: &str) -> &'a str {
        if let Some((&hit, _)) = self.known.get_key_value(s) {
            return hit;
        }
        let copy = self.arena.alloc_str(s);
        self.known.insert(copy, ());
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedups() {
        let arena = Bump::new();
        let mut strings = StringInterner::new(&arena);
        let a = strings.intern("foo");
        let b = strings.intern("foo");
        let c = strings.intern("bar");
        assert_eq!(a, "foo");
        assert!(std::ptr::eq(a, b));
        assert_eq!(c, "bar");
    }
}
