//! The most-general unifier (C5): classic Robinson unification with an
//! occurs check, over terms, predicates, and literals.
//!
//! Grounded on the teacher's unification usage in `sld.rs` (`c.head.unify(&l.literal)`,
//! `mgu.clone()`, threading a `Substitution` through resolution) — the
//! teacher's own `unification` module was not part of the retrieved pack,
//! so the algorithm below is the standard Robinson procedure described in
//! AIMA, written the way the teacher threads substitutions: build on a
//! `SubstitutionBuilder`, freeze once, hand the read-only snapshot back to
//! the caller.

use crate::literal::{Literal, Predicate};
use crate::substitution::{SubstitutionBuilder, VariableSubstitution};
use crate::symbol::VariableDeclaration;
use crate::term::{Term, TermRef};

/// Attempts to unify two terms, returning a fresh MGU on success.
pub fn try_create_terms(a: &TermRef, b: &TermRef) -> Option<VariableSubstitution> {
    let mut builder = SubstitutionBuilder::new();
    if unify_terms_in_place(a, b, &mut builder) {
        Some(builder.freeze())
    } else {
        None
    }
}

pub fn try_create_predicates(a: &Predicate, b: &Predicate) -> Option<VariableSubstitution> {
    let mut builder = SubstitutionBuilder::new();
    if unify_predicates_in_place(a, b, &mut builder) {
        Some(builder.freeze())
    } else {
        None
    }
}

pub fn try_create_literals(a: &Literal, b: &Literal) -> Option<VariableSubstitution> {
    let mut builder = SubstitutionBuilder::new();
    if unify_literals_in_place(a, b, &mut builder) {
        Some(builder.freeze())
    } else {
        None
    }
}

/// Extends an existing substitution with the bindings needed to unify `a`
/// and `b`, without disturbing bindings already present. Returns `None`
/// (existing substitution untouched) on failure.
pub fn try_update_terms(
    a: &TermRef,
    b: &TermRef,
    existing: &VariableSubstitution,
) -> Option<VariableSubstitution> {
    let mut builder = existing.to_builder();
    let a = builder.apply_to_term(a);
    let b = builder.apply_to_term(b);
    if unify_terms_in_place(&a, &b, &mut builder) {
        Some(builder.freeze())
    } else {
        None
    }
}

pub fn try_update_predicates(
    a: &Predicate,
    b: &Predicate,
    existing: &VariableSubstitution,
) -> Option<VariableSubstitution> {
    let mut builder = existing.to_builder();
    if try_update_predicates_in_place(a, b, &mut builder) {
        Some(builder.freeze())
    } else {
        None
    }
}

/// In-place variant for hot paths (the resolution engine tries many
/// candidate pairs and wants to discard failed attempts cheaply): mutates
/// `builder` directly, returning `false` (builder left in a possibly
/// partially-extended but harmless state — callers that need transactional
/// semantics should clone the builder first) on failure.
pub fn try_update_in_place(a: &TermRef, b: &TermRef, builder: &mut SubstitutionBuilder) -> bool {
    let a = builder.apply_to_term(a);
    let b = builder.apply_to_term(b);
    unify_terms_in_place(&a, &b, builder)
}

fn try_update_predicates_in_place(
    a: &Predicate,
    b: &Predicate,
    builder: &mut SubstitutionBuilder,
) -> bool {
    if a.id != b.id || a.args.len() != b.args.len() {
        return false;
    }
    for (x, y) in a.args.iter().zip(b.args.iter()) {
        if !try_update_in_place(x, y, builder) {
            return false;
        }
    }
    true
}

fn unify_predicates_in_place(
    a: &Predicate,
    b: &Predicate,
    builder: &mut SubstitutionBuilder,
) -> bool {
    try_update_predicates_in_place(a, b, builder)
}

fn unify_literals_in_place(a: &Literal, b: &Literal, builder: &mut SubstitutionBuilder) -> bool {
    if a.is_negated != b.is_negated {
        return false;
    }
    unify_predicates_in_place(&a.predicate, &b.predicate, builder)
}

/// Core term unification: classic Robinson with an occurs check performed
/// after applying the builder's current bindings, so an already-bound
/// alias cannot hide a would-be cycle.
fn unify_terms_in_place(a: &TermRef, b: &TermRef, builder: &mut SubstitutionBuilder) -> bool {
    let a = builder.apply_to_term(a);
    let b = builder.apply_to_term(b);

    match (&*a, &*b) {
        (Term::VariableReference(v), _) if matches!(&*b, Term::VariableReference(w) if w == v) => {
            true
        }
        (Term::VariableReference(v), _) => bind_variable(v.clone(), b.clone(), builder),
        (_, Term::VariableReference(w)) => bind_variable(w.clone(), a.clone(), builder),
        (Term::Function(f, fargs), Term::Function(g, gargs)) => {
            if f != g || fargs.len() != gargs.len() {
                return false;
            }
            for (x, y) in fargs.iter().zip(gargs.iter()) {
                if !unify_terms_in_place(x, y, builder) {
                    return false;
                }
            }
            true
        }
        (Term::Constant(x), Term::Constant(y)) => x == y,
        _ => false,
    }
}

/// One-directional matching, used by clause subsumption: binds only
/// `pattern`'s variables, treating every variable appearing in `instance` as
/// an opaque, never-bound value. Unlike [`try_update_predicates`], this
/// never unifies in the other direction, so a matching substitution never
/// instantiates the clause being subsumed.
pub fn try_match_predicates(
    pattern: &Predicate,
    instance: &Predicate,
    existing: &VariableSubstitution,
) -> Option<VariableSubstitution> {
    let mut builder = existing.to_builder();
    if match_predicates_in_place(pattern, instance, &mut builder) {
        Some(builder.freeze())
    } else {
        None
    }
}

fn match_predicates_in_place(
    pattern: &Predicate,
    instance: &Predicate,
    builder: &mut SubstitutionBuilder,
) -> bool {
    if pattern.id != instance.id || pattern.args.len() != instance.args.len() {
        return false;
    }
    pattern
        .args
        .iter()
        .zip(instance.args.iter())
        .all(|(p, i)| match_terms_in_place(p, i, builder))
}

fn match_terms_in_place(pattern: &TermRef, instance: &TermRef, builder: &mut SubstitutionBuilder) -> bool {
    let resolved_pattern = builder.apply_to_term(pattern);
    match &*resolved_pattern {
        Term::VariableReference(v) => {
            builder.bind_in_place(v.clone(), instance.clone());
            true
        }
        Term::Constant(x) => matches!(&**instance, Term::Constant(y) if x == y),
        Term::Function(f, fargs) => match &**instance {
            Term::Function(g, gargs) if f == g && fargs.len() == gargs.len() => fargs
                .iter()
                .zip(gargs.iter())
                .all(|(a, b)| match_terms_in_place(a, b, builder)),
            _ => false,
        },
    }
}

fn bind_variable(v: VariableDeclaration, term: TermRef, builder: &mut SubstitutionBuilder) -> bool {
    if let Term::VariableReference(w) = &*term {
        if *w == v {
            return true;
        }
    }
    if term.occurs(&v) {
        return false;
    }
    builder.bind_in_place(v, term);
    true
}
