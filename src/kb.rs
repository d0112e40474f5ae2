//! The external interface (C1/C7/C9 tied together): a [`KnowledgeBase`]
//! that accepts arbitrary sentences, and a [`Query`] handle over an
//! in-flight resolution refutation.
//!
//! Grounded on the teacher's top-level entry points (`sld::sld` plus
//! `Clause`/`Literal` parsing feeding straight into it from `main.rs`):
//! there, the caller hands over rules and a goal and gets back a tree; here
//! `tell`/`ask` plays the same role but the tree is built incrementally
//! behind a `Query` handle instead of all at once, since a resolution
//! search (unlike bounded SLD) has no guaranteed termination and a caller
//! may want to step it, inspect partial progress, or cancel it.

use crate::backward::{BackwardProofStep, DefiniteClauseBase};
use crate::cnf::to_cnf;
use crate::error::{Error, Result};
use crate::literal::Predicate;
use crate::resolution::{
    ClauseSet, ClauseStore, PairFilter, PairPriority, QueryState, ResolutionQuery, ResolutionStep,
};
use crate::sentence::{Sentence, SentenceRef};
use crate::substitution::VariableSubstitution;

/// A set of first-order sentences, available for resolution-refutation
/// queries and, when every stored clause happens to be definite, backward
/// chaining.
#[derive(Default)]
pub struct KnowledgeBase {
    sentences: Vec<SentenceRef>,
    clauses: ClauseSet,
    rules: DefiniteClauseBase,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        KnowledgeBase {
            sentences: Vec::new(),
            clauses: ClauseSet::new(),
            rules: DefiniteClauseBase::new(),
        }
    }

    /// Adds a sentence to the knowledge base, converting it to CNF and
    /// storing each resulting clause.
    pub fn tell(&mut self, sentence: SentenceRef) -> Result<()> {
        let cnf = to_cnf(&sentence);
        for clause in cnf.clauses() {
            self.clauses.add(clause.clone());
            if clause.is_definite() {
                // insert() only fails for non-definite clauses, already excluded above
                self.rules.insert(clause.clone())?;
            }
        }
        self.sentences.push(sentence);
        Ok(())
    }

    pub fn tell_many(&mut self, sentences: impl IntoIterator<Item = SentenceRef>) -> Result<()> {
        for s in sentences {
            self.tell(s)?;
        }
        Ok(())
    }

    pub fn sentences(&self) -> &[SentenceRef] {
        &self.sentences
    }

    /// Creates a fresh resolution query for `goal`, seeded with a private
    /// copy of this base's clauses plus the negated goal — the query never
    /// mutates the knowledge base it was created from.
    pub fn create_query(&self, goal: SentenceRef, max_iterations: usize) -> Query {
        self.create_query_with(goal, max_iterations, None, None)
    }

    /// As [`Self::create_query`], but lets the caller inject a custom pair
    /// filter and/or pair priority, instead of the engine's defaults — the
    /// strategy-selection knobs [`ResolutionQuery`] exposes, surfaced at
    /// the knowledge-base boundary so a caller never has to reach past
    /// `KnowledgeBase` to tune a search.
    pub fn create_query_with(
        &self,
        goal: SentenceRef,
        max_iterations: usize,
        pair_filter: Option<PairFilter>,
        pair_priority: Option<PairPriority>,
    ) -> Query {
        let store = self.clauses.create_query_store();
        let negated_goal_cnf = to_cnf(&Sentence::not(goal));
        let mut seed = store.snapshot();
        // If the negated goal reduces to zero clauses (the goal's negation
        // was a tautology), no seed clause is added for it: the query then
        // correctly reports "entailed" only if the base's own axioms are
        // already inconsistent.
        seed.extend(negated_goal_cnf.clauses().iter().cloned());
        let mut inner = ResolutionQuery::new(seed, max_iterations);
        if let Some(filter) = pair_filter {
            inner = inner.with_pair_filter(filter);
        }
        if let Some(priority) = pair_priority {
            inner = inner.with_pair_priority(priority);
        }
        Query { inner }
    }

    /// Runs a query for `goal` to completion and reports whether it was
    /// entailed.
    pub fn ask(&self, goal: SentenceRef, max_iterations: usize) -> Result<bool> {
        let mut query = self.create_query(goal, max_iterations);
        query.complete()?;
        query.result()
    }

    /// Backward-chains `goals` (a conjunction) against the definite-clause
    /// subset of this base.
    pub fn prove(
        &self,
        goals: &[Predicate],
        max_depth: usize,
    ) -> Vec<(VariableSubstitution, Vec<BackwardProofStep>)> {
        self.rules.prove(goals, max_depth)
    }
}

/// A handle over a single in-flight resolution refutation attempt.
pub struct Query {
    inner: ResolutionQuery,
}

impl Query {
    pub fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    /// `true` iff the goal was proven (the search completed having found
    /// the empty clause). Fails with `Error::InvalidState` if the query
    /// has not yet completed — there is no meaningful result to report
    /// before then.
    pub fn result(&self) -> Result<bool> {
        if !self.inner.is_complete() {
            return Err(Error::InvalidState(
                "query result requested before the search completed".to_string(),
            ));
        }
        Ok(self.inner.is_refuted())
    }

    pub fn step(&mut self) -> Result<QueryState> {
        self.inner.step()
    }

    /// Runs the query to completion.
    pub fn complete(&mut self) -> Result<QueryState> {
        self.inner.run()
    }

    /// The proof of the empty clause, as an ordered list of resolution
    /// steps. Fails with `Error::InvalidState` before the query completes.
    pub fn explain(&self) -> Result<Vec<ResolutionStep>> {
        if !self.inner.is_complete() {
            return Err(Error::InvalidState(
                "query explanation requested before the search completed".to_string(),
            ));
        }
        Ok(self.inner.explain())
    }

    pub fn proof_steps(&self) -> Result<std::vec::IntoIter<ResolutionStep>> {
        Ok(self.explain()?.into_iter())
    }

    pub fn cancel_handle(&self) -> std::sync::Arc<std::sync::atomic::AtomicBool> {
        self.inner.cancel_handle()
    }

    /// Releases the query's proof graph and working set. Plain `Drop`
    /// already does this; `dispose` exists so a caller doesn't have to
    /// remember that — an explicit name at the call site reads better than
    /// relying on scope-exit.
    pub fn dispose(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Symbol, VariableDeclaration};
    use crate::term::Term;

    fn king(x: crate::term::TermRef) -> SentenceRef {
        Sentence::predicate("King", vec![x])
    }

    fn greedy(x: crate::term::TermRef) -> SentenceRef {
        Sentence::predicate("Greedy", vec![x])
    }

    fn evil(x: crate::term::TermRef) -> SentenceRef {
        Sentence::predicate("Evil", vec![x])
    }

    #[test]
    fn s2_greedy_kings_ask_resolves() {
        let mut kb = KnowledgeBase::new();
        let x = VariableDeclaration::new(Symbol::plain("x"));
        let xt = Term::variable(x.clone());
        kb.tell(Sentence::forall(
            x,
            Sentence::implies(Sentence::and(king(xt.clone()), greedy(xt.clone())), evil(xt)),
        ))
        .unwrap();
        kb.tell(king(Term::constant("john"))).unwrap();
        kb.tell(greedy(Term::constant("john"))).unwrap();

        let proven = kb.ask(evil(Term::constant("john")), 100).unwrap();
        assert!(proven);
    }

    #[test]
    fn ask_for_unentailed_goal_does_not_refute() {
        let mut kb = KnowledgeBase::new();
        kb.tell(king(Term::constant("john"))).unwrap();
        let proven = kb.ask(evil(Term::constant("john")), 50).unwrap();
        assert!(!proven);
    }

    #[test]
    fn query_can_be_stepped_incrementally() {
        let mut kb = KnowledgeBase::new();
        kb.tell(Sentence::predicate("P", vec![Term::constant("a")])).unwrap();
        let mut query = kb.create_query(Sentence::predicate("P", vec![Term::constant("a")]), 50);
        while !query.is_complete() {
            query.step().unwrap();
        }
        assert!(query.result().unwrap());
        assert!(!query.explain().unwrap().is_empty());
    }
}
