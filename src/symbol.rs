//! Identifiers used throughout the sentence and term algebra.
//!
//! A plain [`Symbol`] is a cheaply-cloneable interned-style string, the same
//! role `Predicate(String)` and `IRTerm::Constant(String)` play in a Datalog
//! IR, generalised here to also carry the provenance a full FOL pipeline
//! needs: a standardised-apart variable remembers the name it was renamed
//! from, and a Skolem function remembers the existential it replaces. Both
//! back-pointers are identity-only: they are never consulted by `Eq`/`Hash`,
//! only by the explanation formatter.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::sentence::SentenceRef;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Returns a process-wide fresh id, used to mint standardised variables,
/// Skolem functions, and auxiliary variable declarations.
pub fn fresh_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::SeqCst)
}

#[derive(Clone, Debug)]
pub struct StandardisedVariableSymbol {
    id: u64,
    pub original: Symbol,
    pub source: SentenceRef,
}

impl StandardisedVariableSymbol {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for StandardisedVariableSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for StandardisedVariableSymbol {}
impl Hash for StandardisedVariableSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Clone, Debug)]
pub struct SkolemFunctionSymbol {
    id: u64,
    pub replaces: Symbol,
    pub source: SentenceRef,
}

impl SkolemFunctionSymbol {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for SkolemFunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for SkolemFunctionSymbol {}
impl Hash for SkolemFunctionSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An identifier: a predicate/function/constant name, or a variable
/// declaration's tag. Equality and hashing are structural for `Plain`
/// symbols and identity-based (fresh id) for the two normalisation kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Symbol {
    Plain(Rc<str>),
    Standardised(Rc<StandardisedVariableSymbol>),
    Skolem(Rc<SkolemFunctionSymbol>),
}

/// A total order used only for trie/map keys (the feature-vector index);
/// not a semantic ordering. Plain symbols sort lexicographically, the two
/// normalisation kinds sort by fresh id after their display name, so the
/// order is stable and cheap without claiming any linguistic meaning.
impl Symbol {
    fn sort_key(&self) -> (u8, &str, u64) {
        match self {
            Symbol::Plain(s) => (0, s, 0),
            Symbol::Standardised(sym) => (1, "", sym.id),
            Symbol::Skolem(sym) => (2, "", sym.id),
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Symbol {
    pub fn plain(s: impl Into<String>) -> Self {
        Symbol::Plain(Rc::from(s.into()))
    }

    pub fn standardised(original: Symbol, source: SentenceRef) -> Self {
        Symbol::Standardised(Rc::new(StandardisedVariableSymbol {
            id: fresh_id(),
            original,
            source,
        }))
    }

    pub fn skolem(replaces: Symbol, source: SentenceRef) -> Self {
        Symbol::Skolem(Rc::new(SkolemFunctionSymbol {
            id: fresh_id(),
            replaces,
            source,
        }))
    }

    pub fn auxiliary() -> Self {
        Symbol::plain(format!("__aux_{}", fresh_id()))
    }

    /// A short, stable textual rendering, used for diagnostics. Does not
    /// attempt to produce fresh human labels; see `crate::format::Formatter`
    /// for that.
    pub fn display_name(&self) -> String {
        match self {
            Symbol::Plain(s) => s.to_string(),
            Symbol::Standardised(sym) => format!("{}#{}", sym.original.display_name(), sym.id),
            Symbol::Skolem(sym) => format!("sk_{}#{}", sym.replaces.display_name(), sym.id),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::plain(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::plain(s)
    }
}

/// A declaration site for a variable. Two declarations are equal iff they
/// carry the same fresh id, regardless of how their tag renders — this is
/// what makes standardisation-apart produce genuinely distinct variables
/// even when the original source symbol repeats.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct VariableDeclaration {
    id: u64,
    pub tag: Symbol,
}

impl VariableDeclaration {
    pub fn new(tag: Symbol) -> Self {
        VariableDeclaration {
            id: fresh_id(),
            tag,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for VariableDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_symbols_compare_structurally() {
        assert_eq!(Symbol::plain("west"), Symbol::plain("west"));
        assert_ne!(Symbol::plain("west"), Symbol::plain("john"));
    }

    #[test]
    fn distinct_declarations_never_equal_even_with_same_tag() {
        let a = VariableDeclaration::new(Symbol::plain("x"));
        let b = VariableDeclaration::new(Symbol::plain("x"));
        assert_ne!(a, b);
    }
}
