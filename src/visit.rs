//! Structural recursion framework (C2): a transformation contract for each
//! AST (terms, sentences). Implementers override only the variants they
//! care about; the default recursion shares the original `Rc` whenever
//! every recursive call returned something pointer-identical to its input.
//!
//! This plays the role deep visitor-class inheritance plays in an
//! object-oriented IR: here it is two small traits instead, since Rust has
//! no open-class dispatch and pattern matching already gives us exhaustive
//! case analysis "for free".

use std::rc::Rc;

use crate::sentence::{rebuild_binary_if_changed, Sentence, SentenceRef};
use crate::symbol::{Symbol, VariableDeclaration};
use crate::term::{rebuild_function_if_changed, Term, TermRef};

/// A transformation over terms. The default for every variant performs
/// pure structural recursion and shares the input when nothing changed.
pub trait TermTransform {
    fn transform_term(&mut self, term: &TermRef) -> TermRef {
        match &**term {
            Term::Constant(_) => term.clone(),
            Term::VariableReference(_) => term.clone(),
            Term::Function(id, args) => {
                let new_args: Vec<TermRef> =
                    args.iter().map(|a| self.transform_term(a)).collect();
                rebuild_function_if_changed(term, id, args, new_args)
            }
        }
    }
}

/// A transformation over sentences. CNF pipeline stages are each a small
/// struct implementing just the hook(s) relevant to that stage; every other
/// case falls through to the default recursive walk.
pub trait SentenceTransform {
    fn transform_predicate(&mut self, original: &SentenceRef, _id: &Symbol, _args: &[TermRef]) -> SentenceRef {
        original.clone()
    }

    fn transform_negation(&mut self, original: &SentenceRef, child: &SentenceRef) -> SentenceRef {
        let new_child = self.transform_sentence(child);
        if Rc::ptr_eq(child, &new_child) {
            original.clone()
        } else {
            Sentence::not(new_child)
        }
    }

    fn transform_conjunction(
        &mut self,
        original: &SentenceRef,
        l: &SentenceRef,
        r: &SentenceRef,
    ) -> SentenceRef {
        let nl = self.transform_sentence(l);
        let nr = self.transform_sentence(r);
        rebuild_binary_if_changed(original, l, r, nl, nr, Sentence::and)
    }

    fn transform_disjunction(
        &mut self,
        original: &SentenceRef,
        l: &SentenceRef,
        r: &SentenceRef,
    ) -> SentenceRef {
        let nl = self.transform_sentence(l);
        let nr = self.transform_sentence(r);
        rebuild_binary_if_changed(original, l, r, nl, nr, Sentence::or)
    }

    fn transform_equivalence(
        &mut self,
        original: &SentenceRef,
        l: &SentenceRef,
        r: &SentenceRef,
    ) -> SentenceRef {
        let nl = self.transform_sentence(l);
        let nr = self.transform_sentence(r);
        rebuild_binary_if_changed(original, l, r, nl, nr, Sentence::iff)
    }

    fn transform_implication(
        &mut self,
        original: &SentenceRef,
        antecedent: &SentenceRef,
        consequent: &SentenceRef,
    ) -> SentenceRef {
        let na = self.transform_sentence(antecedent);
        let nc = self.transform_sentence(consequent);
        rebuild_binary_if_changed(original, antecedent, consequent, na, nc, Sentence::implies)
    }

    fn transform_universal(
        &mut self,
        original: &SentenceRef,
        decl: &VariableDeclaration,
        body: &SentenceRef,
    ) -> SentenceRef {
        let new_body = self.transform_sentence(body);
        if Rc::ptr_eq(body, &new_body) {
            original.clone()
        } else {
            Sentence::forall(decl.clone(), new_body)
        }
    }

    fn transform_existential(
        &mut self,
        original: &SentenceRef,
        decl: &VariableDeclaration,
        body: &SentenceRef,
    ) -> SentenceRef {
        let new_body = self.transform_sentence(body);
        if Rc::ptr_eq(body, &new_body) {
            original.clone()
        } else {
            Sentence::exists(decl.clone(), new_body)
        }
    }

    fn transform_sentence(&mut self, sentence: &SentenceRef) -> SentenceRef {
        match &**sentence {
            Sentence::Predicate(id, args) => self.transform_predicate(sentence, id, args),
            Sentence::Negation(c) => self.transform_negation(sentence, c),
            Sentence::Conjunction(l, r) => self.transform_conjunction(sentence, l, r),
            Sentence::Disjunction(l, r) => self.transform_disjunction(sentence, l, r),
            Sentence::Equivalence(l, r) => self.transform_equivalence(sentence, l, r),
            Sentence::Implication(a, c) => self.transform_implication(sentence, a, c),
            Sentence::UniversalQuantification(decl, body) => {
                self.transform_universal(sentence, decl, body)
            }
            Sentence::ExistentialQuantification(decl, body) => {
                self.transform_existential(sentence, decl, body)
            }
        }
    }
}

/// A read-only structural walk over sentences, used by collectors (e.g. "do
/// any quantifiers remain below this point?").
pub trait SentenceVisitor {
    fn visit_predicate(&mut self, _id: &Symbol, _args: &[TermRef]) {}

    fn visit_sentence(&mut self, sentence: &Sentence) {
        match sentence {
            Sentence::Predicate(id, args) => self.visit_predicate(id, args),
            Sentence::Negation(c) => self.visit_sentence(c),
            Sentence::Conjunction(l, r)
            | Sentence::Disjunction(l, r)
            | Sentence::Equivalence(l, r)
            | Sentence::Implication(l, r) => {
                self.visit_sentence(l);
                self.visit_sentence(r);
            }
            Sentence::UniversalQuantification(_, body)
            | Sentence::ExistentialQuantification(_, body) => self.visit_sentence(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountPredicates(usize);
    impl SentenceVisitor for CountPredicates {
        fn visit_predicate(&mut self, _id: &Symbol, _args: &[TermRef]) {
            self.0 += 1;
        }
    }

    #[test]
    fn visitor_counts_predicates() {
        let p = Sentence::predicate("P", vec![]);
        let q = Sentence::predicate("Q", vec![]);
        let s = Sentence::and(p, q);
        let mut counter = CountPredicates(0);
        counter.visit_sentence(&s);
        assert_eq!(counter.0, 2);
    }

    struct Identity;
    impl SentenceTransform for Identity {}

    #[test]
    fn identity_transform_shares_everything() {
        let p = Sentence::predicate("P", vec![]);
        let q = Sentence::predicate("Q", vec![]);
        let s = Sentence::and(p, q);
        let mut id = Identity;
        let out = id.transform_sentence(&s);
        assert!(Rc::ptr_eq(&s, &out));
    }
}
