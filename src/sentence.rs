//! The sentence algebra (C1): the eight-variant tagged sum every CNF
//! transformation folds over.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::symbol::{Symbol, VariableDeclaration};
use crate::term::{Term, TermRef};

pub type SentenceRef = Rc<Sentence>;

#[derive(Eq, PartialEq, Hash, Debug)]
pub enum Sentence {
    Predicate(Symbol, Vec<TermRef>),
    Negation(SentenceRef),
    Conjunction(SentenceRef, SentenceRef),
    Disjunction(SentenceRef, SentenceRef),
    Equivalence(SentenceRef, SentenceRef),
    Implication(SentenceRef, SentenceRef),
    UniversalQuantification(VariableDeclaration, SentenceRef),
    ExistentialQuantification(VariableDeclaration, SentenceRef),
}

impl Sentence {
    pub fn predicate(id: impl Into<Symbol>, args: Vec<TermRef>) -> SentenceRef {
        Rc::new(Sentence::Predicate(id.into(), args))
    }

    pub fn not(s: SentenceRef) -> SentenceRef {
        Rc::new(Sentence::Negation(s))
    }

    pub fn and(l: SentenceRef, r: SentenceRef) -> SentenceRef {
        Rc::new(Sentence::Conjunction(l, r))
    }

    pub fn or(l: SentenceRef, r: SentenceRef) -> SentenceRef {
        Rc::new(Sentence::Disjunction(l, r))
    }

    pub fn iff(l: SentenceRef, r: SentenceRef) -> SentenceRef {
        Rc::new(Sentence::Equivalence(l, r))
    }

    pub fn implies(antecedent: SentenceRef, consequent: SentenceRef) -> SentenceRef {
        Rc::new(Sentence::Implication(antecedent, consequent))
    }

    pub fn forall(decl: VariableDeclaration, body: SentenceRef) -> SentenceRef {
        Rc::new(Sentence::UniversalQuantification(decl, body))
    }

    pub fn exists(decl: VariableDeclaration, body: SentenceRef) -> SentenceRef {
        Rc::new(Sentence::ExistentialQuantification(decl, body))
    }

    /// Free variable declarations: those not bound by an enclosing
    /// quantifier within this sentence.
    pub fn free_variables(&self) -> HashSet<VariableDeclaration> {
        let mut bound = HashSet::new();
        let mut free = HashSet::new();
        self.collect_free_variables(&mut bound, &mut free);
        free
    }

    fn collect_free_variables(
        &self,
        bound: &mut HashSet<VariableDeclaration>,
        free: &mut HashSet<VariableDeclaration>,
    ) {
        match self {
            Sentence::Predicate(_, args) => {
                for a in args {
                    for v in a.variables() {
                        if !bound.contains(&v) {
                            free.insert(v);
                        }
                    }
                }
            }
            Sentence::Negation(s) => s.collect_free_variables(bound, free),
            Sentence::Conjunction(l, r)
            | Sentence::Disjunction(l, r)
            | Sentence::Equivalence(l, r)
            | Sentence::Implication(l, r) => {
                l.collect_free_variables(bound, free);
                r.collect_free_variables(bound, free);
            }
            Sentence::UniversalQuantification(decl, body)
            | Sentence::ExistentialQuantification(decl, body) => {
                let inserted = bound.insert(decl.clone());
                body.collect_free_variables(bound, free);
                if inserted {
                    bound.remove(decl);
                }
            }
        }
    }
}

/// Rebuilds a binary node only if either child actually changed.
pub fn rebuild_binary_if_changed<F: Fn(SentenceRef, SentenceRef) -> SentenceRef>(
    original: &SentenceRef,
    old_l: &SentenceRef,
    old_r: &SentenceRef,
    new_l: SentenceRef,
    new_r: SentenceRef,
    make: F,
) -> SentenceRef {
    if Rc::ptr_eq(old_l, &new_l) && Rc::ptr_eq(old_r, &new_r) {
        original.clone()
    } else {
        make(new_l, new_r)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentence::Predicate(id, args) => {
                if args.is_empty() {
                    write!(f, "{}", id)
                } else {
                    write!(f, "{}(", id)?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a)?;
                    }
                    write!(f, ")")
                }
            }
            Sentence::Negation(s) => write!(f, "\u{00ac}{}", s),
            Sentence::Conjunction(l, r) => write!(f, "({} \u{2227} {})", l, r),
            Sentence::Disjunction(l, r) => write!(f, "({} \u{2228} {})", l, r),
            Sentence::Equivalence(l, r) => write!(f, "({} \u{21d4} {})", l, r),
            Sentence::Implication(l, r) => write!(f, "({} \u{21d2} {})", l, r),
            Sentence::UniversalQuantification(decl, body) => {
                write!(f, "\u{2200}{}.{}", decl, body)
            }
            Sentence::ExistentialQuantification(decl, body) => {
                write!(f, "\u{2203}{}.{}", decl, body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    #[test]
    fn equal_sentences_hash_equal() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = Sentence::predicate("P", vec![Term::constant("a")]);
        let b = Sentence::predicate("P", vec![Term::constant("a")]);
        assert_eq!(a, b);
        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn free_variables_excludes_bound() {
        let x = VariableDeclaration::new(Symbol::plain("x"));
        let body = Sentence::predicate("P", vec![Term::variable(x.clone())]);
        let quantified = Sentence::forall(x.clone(), body);
        assert!(quantified.free_variables().is_empty());
    }
}
