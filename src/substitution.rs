//! Variable substitution (C4): an immutable map from variable declaration
//! to term, plus a mutable builder for the engine hot paths.
//!
//! Grounded on the teacher's `Substitution<IRTerm>` / `compose_extend` /
//! `Substitute<IRTerm>` trio in `sld.rs`: there, a substitution is a thin
//! `HashMap` wrapper threaded through SLD resolution and applied to goals
//! with a `Substitute` trait. Here the same shape is split into a
//! cheaply-`Clone`-able read-only snapshot (`VariableSubstitution`, an
//! `Rc<HashMap<..>>`) and an exclusively-owned `SubstitutionBuilder` used
//! while a unification or resolution step is still in flight, matching the
//! "mutable builder inside an otherwise-immutable map" design note.

use std::collections::HashMap;
use std::rc::Rc;

use crate::literal::{Literal, Predicate};
use crate::symbol::VariableDeclaration;
use crate::term::{Term, TermRef};

/// A read-only, freely-cloneable (by reference) substitution.
#[derive(Clone, Debug)]
pub struct VariableSubstitution {
    bindings: Rc<HashMap<VariableDeclaration, TermRef>>,
}

impl VariableSubstitution {
    pub fn empty() -> Self {
        VariableSubstitution {
            bindings: Rc::new(HashMap::new()),
        }
    }

    pub fn get(&self, decl: &VariableDeclaration) -> Option<&TermRef> {
        self.bindings.get(decl)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VariableDeclaration, &TermRef)> {
        self.bindings.iter()
    }

    /// Applies this substitution to a term, recursively resolving chains of
    /// bindings (`alpha -> beta`, `beta -> C` collapses to `alpha -> C`).
    pub fn apply_to_term(&self, term: &TermRef) -> TermRef {
        match &**term {
            Term::Constant(_) => term.clone(),
            Term::VariableReference(decl) => match self.bindings.get(decl) {
                Some(bound) => self.apply_to_term(bound),
                None => term.clone(),
            },
            Term::Function(id, args) => {
                let new_args: Vec<TermRef> = args.iter().map(|a| self.apply_to_term(a)).collect();
                let changed = args
                    .iter()
                    .zip(new_args.iter())
                    .any(|(a, b)| !Rc::ptr_eq(a, b));
                if changed {
                    Term::function(id.clone(), new_args)
                } else {
                    term.clone()
                }
            }
        }
    }

    pub fn apply_to_predicate(&self, predicate: &Predicate) -> Predicate {
        Predicate {
            id: predicate.id.clone(),
            args: predicate
                .args
                .iter()
                .map(|a| self.apply_to_term(a))
                .collect(),
        }
    }

    pub fn apply_to_literal(&self, literal: &Literal) -> Literal {
        Literal {
            is_negated: literal.is_negated,
            predicate: self.apply_to_predicate(&literal.predicate),
        }
    }

    pub fn apply_to_clause(&self, literals: &[Literal]) -> Vec<Literal> {
        literals.iter().map(|l| self.apply_to_literal(l)).collect()
    }

    pub fn to_builder(&self) -> SubstitutionBuilder {
        SubstitutionBuilder {
            bindings: (*self.bindings).clone(),
        }
    }
}

impl Default for VariableSubstitution {
    fn default() -> Self {
        Self::empty()
    }
}

/// A mutable, exclusively-owned substitution under construction. Must be
/// snapshotted with [`SubstitutionBuilder::freeze`] before being shared
/// outside the engine building it.
#[derive(Clone, Debug, Default)]
pub struct SubstitutionBuilder {
    bindings: HashMap<VariableDeclaration, TermRef>,
}

impl SubstitutionBuilder {
    pub fn new() -> Self {
        SubstitutionBuilder {
            bindings: HashMap::new(),
        }
    }

    pub fn get(&self, decl: &VariableDeclaration) -> Option<&TermRef> {
        self.bindings.get(decl)
    }

    /// Binds `decl` to `term` in place. Callers are expected to have already
    /// applied the existing bindings to `term` (the unifier does this) so
    /// that chains stay collapsed without a second substitution pass.
    pub fn bind_in_place(&mut self, decl: VariableDeclaration, term: TermRef) {
        self.bindings.insert(decl, term);
    }

    pub fn apply_to_term(&self, term: &TermRef) -> TermRef {
        match &**term {
            Term::Constant(_) => term.clone(),
            Term::VariableReference(decl) => match self.bindings.get(decl) {
                Some(bound) => self.apply_to_term(bound),
                None => term.clone(),
            },
            Term::Function(id, args) => {
                let new_args: Vec<TermRef> = args.iter().map(|a| self.apply_to_term(a)).collect();
                let changed = args
                    .iter()
                    .zip(new_args.iter())
                    .any(|(a, b)| !Rc::ptr_eq(a, b));
                if changed {
                    Term::function(id.clone(), new_args)
                } else {
                    term.clone()
                }
            }
        }
    }

    pub fn freeze(self) -> VariableSubstitution {
        VariableSubstitution {
            bindings: Rc::new(self.bindings),
        }
    }
}

/// Composes `outer` after `inner`: applies `outer` to every binding's
/// right-hand side and adds any binding from `outer` whose variable is not
/// already bound by `inner`. Grounded on the teacher's `compose_extend`.
pub fn compose_extend(
    outer: &VariableSubstitution,
    inner: &VariableSubstitution,
) -> VariableSubstitution {
    let mut builder = SubstitutionBuilder::new();
    for (decl, term) in inner.iter() {
        builder.bind_in_place(decl.clone(), outer.apply_to_term(term));
    }
    for (decl, term) in outer.iter() {
        if builder.get(decl).is_none() {
            builder.bind_in_place(decl.clone(), term.clone());
        }
    }
    builder.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;

    #[test]
    fn chained_bindings_collapse() {
        let a = VariableDeclaration::new(Symbol::plain("a"));
        let b = VariableDeclaration::new(Symbol::plain("b"));
        let mut builder = SubstitutionBuilder::new();
        builder.bind_in_place(b.clone(), Term::constant("C"));
        builder.bind_in_place(a.clone(), Term::variable(b.clone()));
        let sub = builder.freeze();
        let result = sub.apply_to_term(&Term::variable(a));
        assert_eq!(*result, Term::Constant(Symbol::plain("C")));
    }
}
