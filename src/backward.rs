//! Backward chaining over definite clauses (C9): SLD-style resolution
//! restricted to Horn clauses with exactly one positive literal, producing
//! every substitution that closes a conjunctive goal along with the proof
//! forest that justifies it.
//!
//! Grounded on the teacher's `sld` module: [`DefiniteClauseBase::prove`]
//! mirrors `sld::sld`'s shape (select leftmost goal literal, try every rule
//! whose head could match, recurse on the extended goal, bounded by a
//! maximum depth) and `proofs()`'s after-the-fact tree reconstruction. Like
//! the teacher, this is an eager "build every proof up to the depth bound,
//! then hand back the results" engine rather than a true streaming
//! generator — the teacher's own `sld()` builds its whole `Tree` before
//! `solutions()`/`proofs()` ever walk it, so there is no teacher precedent
//! for incremental laziness to imitate here.

use std::collections::HashMap;

use crate::cnf::{CNFClause, CNFDefiniteClause};
use crate::error::{Error, Result};
use crate::literal::Predicate;
use crate::substitution::VariableSubstitution;
use crate::symbol::Symbol;
use crate::unify::try_update_predicates;

pub type RuleId = usize;

/// One node of a backward-chaining proof: which rule closed `head`, and the
/// proofs for each of that rule's antecedents, in the same order the rule's
/// body listed them.
#[derive(Clone, Debug)]
pub struct BackwardProofStep {
    pub head: Predicate,
    pub rule: RuleId,
    pub children: Vec<BackwardProofStep>,
}

/// A set of definite clauses, indexed by the predicate identifier of each
/// rule's consequent so that goal resolution does not scan every stored
/// rule.
#[derive(Default)]
pub struct DefiniteClauseBase {
    rules: Vec<CNFClause>,
    by_consequent: HashMap<Symbol, Vec<RuleId>>,
}

impl DefiniteClauseBase {
    pub fn new() -> Self {
        DefiniteClauseBase {
            rules: Vec::new(),
            by_consequent: HashMap::new(),
        }
    }

    /// Adds a definite clause (rule or ground fact). Rejects any clause
    /// that is not definite (not exactly one positive literal).
    pub fn insert(&mut self, clause: CNFClause) -> Result<RuleId> {
        let consequent_id = CNFDefiniteClause::try_from_clause(&clause)
            .ok_or_else(|| {
                Error::InvalidArgument("only definite clauses can be added to a rule base".to_string())
            })?
            .consequent()
            .id
            .clone();
        let rid = self.rules.len();
        self.by_consequent.entry(consequent_id).or_default().push(rid);
        self.rules.push(clause);
        Ok(rid)
    }

    pub fn rule(&self, rid: RuleId) -> &CNFClause {
        &self.rules[rid]
    }

    fn candidates_for(&self, id: &Symbol) -> &[RuleId] {
        self.by_consequent.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Proves the conjunctive goal `goals`, depth-bounded by `max_depth`
    /// (one unit of depth per rule application). Returns every distinct
    /// closing substitution together with the proof that justifies it.
    pub fn prove(
        &self,
        goals: &[Predicate],
        max_depth: usize,
    ) -> Vec<(VariableSubstitution, Vec<BackwardProofStep>)> {
        self.prove_rec(goals, &VariableSubstitution::empty(), 0, max_depth)
    }

    fn prove_rec(
        &self,
        goals: &[Predicate],
        substitution: &VariableSubstitution,
        depth: usize,
        max_depth: usize,
    ) -> Vec<(VariableSubstitution, Vec<BackwardProofStep>)> {
        let (first, rest) = match goals.split_first() {
            None => return vec![(substitution.clone(), Vec::new())],
            Some(pair) => pair,
        };
        if depth >= max_depth {
            return Vec::new();
        }
        let goal_applied = substitution.apply_to_predicate(first);
        let mut out = Vec::new();
        for &rid in self.candidates_for(&goal_applied.id) {
            let rule = self.rule(rid);
            let renamed = rule.standardise_apart();
            let renamed_definite = CNFDefiniteClause::try_from_clause(&renamed)
                .expect("indexed rules are always definite");
            if renamed_definite.consequent().arity() != goal_applied.arity() {
                continue;
            }
            let theta = match try_update_predicates(renamed_definite.consequent(), &goal_applied, substitution)
            {
                Some(theta) => theta,
                None => continue,
            };
            let antecedents: Vec<Predicate> = renamed_definite.conjuncts().cloned().collect();
            let mut extended: Vec<Predicate> = antecedents.clone();
            extended.extend(rest.iter().cloned());

            for (final_sub, mut children) in self.prove_rec(&extended, &theta, depth + 1, max_depth) {
                let own_children: Vec<BackwardProofStep> = children.drain(0..antecedents.len()).collect();
                let step = BackwardProofStep {
                    head: final_sub.apply_to_predicate(&goal_applied),
                    rule: rid,
                    children: own_children,
                };
                let mut combined = vec![step];
                combined.extend(children);
                out.push((final_sub, combined));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Sentence;
    use crate::symbol::{Symbol, VariableDeclaration};
    use crate::term::Term;

    fn clause_of(sentence: crate::sentence::SentenceRef) -> CNFClause {
        crate::cnf::to_cnf(&sentence).clauses()[0].clone()
    }

    #[test]
    fn s6_greedy_king_has_multiple_backward_proofs() {
        // King(x) is a fact for john and richard; prove King(x) should find
        // two proofs (and two distinct substitutions for x).
        let mut kb = DefiniteClauseBase::new();
        kb.insert(clause_of(Sentence::predicate("King", vec![Term::constant("john")])))
            .unwrap();
        kb.insert(clause_of(Sentence::predicate("King", vec![Term::constant("richard")])))
            .unwrap();

        let x = VariableDeclaration::new(Symbol::plain("x"));
        let goal = Predicate::new("King", vec![Term::variable(x.clone())]);
        let proofs = kb.prove(&[goal], 5);
        assert_eq!(proofs.len(), 2);
    }

    #[test]
    fn backward_chaining_through_a_rule_body() {
        // evil(x) :- king(x), greedy(x). king(john). greedy(john).
        let x = VariableDeclaration::new(Symbol::plain("x"));
        let xt = Term::variable(x.clone());
        let rule = Sentence::forall(
            x,
            Sentence::implies(
                Sentence::and(
                    Sentence::predicate("King", vec![xt.clone()]),
                    Sentence::predicate("Greedy", vec![xt.clone()]),
                ),
                Sentence::predicate("Evil", vec![xt]),
            ),
        );
        let mut kb = DefiniteClauseBase::new();
        kb.insert(clause_of(rule)).unwrap();
        kb.insert(clause_of(Sentence::predicate("King", vec![Term::constant("john")])))
            .unwrap();
        kb.insert(clause_of(Sentence::predicate(
            "Greedy",
            vec![Term::constant("john")],
        )))
        .unwrap();

        let y = VariableDeclaration::new(Symbol::plain("y"));
        let goal = Predicate::new("Evil", vec![Term::variable(y)]);
        let proofs = kb.prove(&[goal], 5);
        assert_eq!(proofs.len(), 1);
        assert_eq!(proofs[0].1[0].children.len(), 2);
    }

    #[test]
    fn depth_bound_stops_infinite_recursion() {
        // p(x) :- p(x). with no base case: must terminate via max_depth.
        let x = VariableDeclaration::new(Symbol::plain("x"));
        let xt = Term::variable(x.clone());
        let rule = Sentence::forall(
            x,
            Sentence::implies(Sentence::predicate("P", vec![xt.clone()]), Sentence::predicate("P", vec![xt])),
        );
        let mut kb = DefiniteClauseBase::new();
        kb.insert(clause_of(rule)).unwrap();
        let y = VariableDeclaration::new(Symbol::plain("y"));
        let goal = Predicate::new("P", vec![Term::variable(y)]);
        let proofs = kb.prove(&[goal], 8);
        assert!(proofs.is_empty());
    }
}
