//! Predicates and literals: the atoms clauses are built from post-CNF.
//!
//! Distinct from [`crate::sentence::Sentence::Predicate`] because once a
//! sentence has been reduced to CNF, the only sentence shape left standing
//! is "a disjunction of (possibly negated) predicate applications" — giving
//! that shape its own small, non-recursive type lets [`crate::cnf`] and
//! [`crate::unify`] avoid re-deriving it from the general sentence AST on
//! every operation.

use std::fmt;

use crate::symbol::Symbol;
use crate::term::TermRef;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Predicate {
    pub id: Symbol,
    pub args: Vec<TermRef>,
}

impl Predicate {
    pub fn new(id: impl Into<Symbol>, args: Vec<TermRef>) -> Self {
        Predicate { id: id.into(), args }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}(", self.id)?;
            for (i, a) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", a)?;
            }
            write!(f, ")")
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Literal {
    pub is_negated: bool,
    pub predicate: Predicate,
}

impl Literal {
    pub fn positive(predicate: Predicate) -> Self {
        Literal {
            is_negated: false,
            predicate,
        }
    }

    pub fn negative(predicate: Predicate) -> Self {
        Literal {
            is_negated: true,
            predicate,
        }
    }

    pub fn negate(&self) -> Literal {
        Literal {
            is_negated: !self.is_negated,
            predicate: self.predicate.clone(),
        }
    }

    /// Two literals are "complementary" iff they share a predicate
    /// identifier and arity, have opposite sign, and are not necessarily
    /// identical in arguments (unifiability is checked separately).
    pub fn is_opposite_sign_same_signature(&self, other: &Literal) -> bool {
        self.is_negated != other.is_negated
            && self.predicate.id == other.predicate.id
            && self.predicate.arity() == other.predicate.arity()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated {
            write!(f, "\u{00ac}{}", self.predicate)
        } else {
            write!(f, "{}", self.predicate)
        }
    }
}
