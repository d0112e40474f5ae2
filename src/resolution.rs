//! Resolution refutation theorem proving (C7): a priority-queued frontier
//! of candidate clause pairs, saturated one pair at a time, recording every
//! derivation as it happens so a completed proof can be explained
//! afterwards.
//!
//! The per-step state machine and the "build a proof structure as you go,
//! flatten it into an explanation only when asked" split is grounded on the
//! teacher's `sld::Tree` / `sld::proofs` pair — a tree (here, a DAG, since
//! a resolvent can have more than one derivation) built incrementally while
//! refuting, walked afterwards to answer "how did we get the empty
//! clause?". The DAG itself uses `petgraph`, carried over unchanged from
//! the teacher's own dependency table.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use log::{debug, trace};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::cnf::CNFClause;
use crate::error::{Error, Result};
use crate::index::{FeatureVectorIndex, PredicateCountSelector};
use crate::substitution::VariableSubstitution;

/// Storage for the resolution engine's working clause set. Kept as a trait
/// so a caller can swap in a different indexing strategy (or a trivial
/// linear scan) without touching the saturation loop itself — the same
/// "algorithm depends on a trait, not a concrete collection" shape the
/// teacher uses for `ClauseId`/`Clause` lookups scattered through `sld.rs`.
pub trait ClauseStore {
    /// Adds `clause`. Returns `false` (no-op) if an already-stored clause
    /// subsumes it.
    fn add(&mut self, clause: CNFClause) -> bool;

    fn iterate(&self) -> Box<dyn Iterator<Item = &CNFClause> + '_>;

    /// Every resolvent obtainable by resolving `clause` against something
    /// already stored, as `(partner, substitution, resolvent)` triples.
    fn find_resolutions(
        &self,
        clause: &CNFClause,
    ) -> Vec<(CNFClause, VariableSubstitution, CNFClause)>;
}

/// The default clause store: a flat list plus a feature-vector index used
/// purely for forward/backward subsumption (don't store a clause already
/// subsumed by something kept, and drop anything the new clause subsumes;
/// see [`crate::index`]).
pub struct ClauseSet {
    clauses: Vec<CNFClause>,
    index: FeatureVectorIndex<PredicateCountSelector, usize>,
}

impl ClauseSet {
    pub fn new() -> Self {
        ClauseSet {
            clauses: Vec::new(),
            index: FeatureVectorIndex::new(PredicateCountSelector),
        }
    }

    /// Creates the query-specific store a [`ResolutionQuery`] saturates
    /// into, seeded from this base's clauses (the "KB variant's
    /// create_query_store" entry point named in the design: asking a
    /// question should never mutate the knowledge base being queried).
    pub fn create_query_store(&self) -> Self {
        let mut copy = ClauseSet::new();
        for c in &self.clauses {
            copy.add(c.clone());
        }
        copy
    }

    pub fn snapshot(&self) -> Vec<CNFClause> {
        self.clauses.clone()
    }
}

impl Default for ClauseSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseStore for ClauseSet {
    fn add(&mut self, clause: CNFClause) -> bool {
        if clause.is_empty() {
            self.clauses.push(clause);
            return true;
        }
        if !self.index.get_subsuming(&clause).is_empty() {
            return false;
        }
        self.index.remove_subsumed(&clause);
        let idx = self.clauses.len();
        self.clauses.push(clause.clone());
        self.index.add(clause, idx);
        true
    }

    fn iterate(&self) -> Box<dyn Iterator<Item = &CNFClause> + '_> {
        Box::new(self.clauses.iter())
    }

    fn find_resolutions(
        &self,
        clause: &CNFClause,
    ) -> Vec<(CNFClause, VariableSubstitution, CNFClause)> {
        self.clauses
            .iter()
            .flat_map(|other| {
                clause
                    .resolve(other)
                    .into_iter()
                    .map(move |(sub, resolvent)| (other.clone(), sub, resolvent))
            })
            .collect()
    }
}

/// A single recorded resolution application: `left` and `right` resolved,
/// under `substitution`, to `resolvent`.
#[derive(Clone, Debug)]
pub struct ResolutionStep {
    pub left: CNFClause,
    pub right: CNFClause,
    pub substitution: VariableSubstitution,
    pub resolvent: CNFClause,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum QueryState {
    Initialising,
    Running,
    Complete,
}

pub type PairFilter = Box<dyn Fn(&CNFClause, &CNFClause) -> bool>;
/// Scores a candidate pair; lower scores are dequeued first. A genuine
/// `(Clause, Clause) x (Clause, Clause) -> Ordering` comparator would let a
/// strategy compare two pairs directly without reducing either to a
/// number, but every strategy named in the design (unit preference,
/// shortest-clause, set-of-support) is expressible as a score, so a scoring
/// function is what callers actually plug in here.
pub type PairPriority = Box<dyn Fn(&CNFClause, &CNFClause) -> i64>;

fn default_pair_filter() -> PairFilter {
    Box::new(|_, _| true)
}

/// Shorter clause pairs are preferred — the simplest form of the
/// "prefer smaller" heuristic used in saturation-based provers.
fn default_pair_priority() -> PairPriority {
    Box::new(|a: &CNFClause, b: &CNFClause| (a.literals().len() + b.literals().len()) as i64)
}

/// One candidate pair waiting to be resolved, ordered by `priority` (lower
/// first) with ties broken by insertion order (`seq`, earlier first) so
/// selection is deterministic.
struct PendingPair {
    priority: i64,
    seq: u64,
    left: CNFClause,
    right: CNFClause,
}

impl PartialEq for PendingPair {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}
impl Eq for PendingPair {}

impl Ord for PendingPair {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse the priority so the lowest
        // score surfaces first, and reverse the sequence number too so
        // that among equal priorities the earliest-inserted pair wins.
        other.priority.cmp(&self.priority).then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for PendingPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single resolution refutation attempt: a clause store saturated by
/// repeatedly dequeuing the highest-priority candidate pair, resolving it,
/// and folding survivors back into the store and the frontier.
pub struct ResolutionQuery {
    store: ClauseSet,
    seed_clauses: Vec<CNFClause>,
    frontier: BinaryHeap<PendingPair>,
    next_seq: u64,
    pair_filter: PairFilter,
    pair_priority: PairPriority,
    state: QueryState,
    graph: DiGraph<CNFClause, ()>,
    node_index: HashMap<CNFClause, NodeIndex>,
    derivation_substitution: HashMap<NodeIndex, VariableSubstitution>,
    refutation: Option<NodeIndex>,
    cancel: Arc<AtomicBool>,
    iterations: usize,
    max_iterations: usize,
}

impl ResolutionQuery {
    /// `initial_clauses` is the full seed set to saturate: axioms plus
    /// whatever clauses the negated goal reduced to (zero, one, or many —
    /// the caller is responsible for that reduction; the engine treats
    /// every seed clause identically).
    pub fn new(initial_clauses: Vec<CNFClause>, max_iterations: usize) -> Self {
        ResolutionQuery {
            store: ClauseSet::new(),
            seed_clauses: initial_clauses,
            frontier: BinaryHeap::new(),
            next_seq: 0,
            pair_filter: default_pair_filter(),
            pair_priority: default_pair_priority(),
            state: QueryState::Initialising,
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            derivation_substitution: HashMap::new(),
            refutation: None,
            cancel: Arc::new(AtomicBool::new(false)),
            iterations: 0,
            max_iterations,
        }
    }

    pub fn with_pair_filter(mut self, f: impl Fn(&CNFClause, &CNFClause) -> bool + 'static) -> Self {
        self.pair_filter = Box::new(f);
        self
    }

    pub fn with_pair_priority(mut self, f: impl Fn(&CNFClause, &CNFClause) -> i64 + 'static) -> Self {
        self.pair_priority = Box::new(f);
        self
    }

    /// A handle the caller can flip from another thread (or the same
    /// thread, between `step()` calls) to cooperatively cancel the search.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    fn node_for(&mut self, clause: &CNFClause) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(clause) {
            idx
        } else {
            let idx = self.graph.add_node(clause.clone());
            self.node_index.insert(clause.clone(), idx);
            idx
        }
    }

    /// Queues every resolvable, filter-surviving pairing of `new_clause`
    /// against clauses already in the store.
    fn enqueue_pairs_with(&mut self, new_clause: &CNFClause) {
        let existing: Vec<CNFClause> = self.store.iterate().cloned().collect();
        for other in existing {
            if !(self.pair_filter)(new_clause, &other) {
                continue;
            }
            if new_clause.resolve(&other).is_empty() {
                continue;
            }
            let priority = (self.pair_priority)(new_clause, &other);
            let seq = self.next_seq;
            self.next_seq += 1;
            self.frontier.push(PendingPair {
                priority,
                seq,
                left: new_clause.clone(),
                right: other,
            });
        }
    }

    /// Advances the search by one unit of work. Checks cancellation first,
    /// so a query that was asked to stop never performs another resolution
    /// attempt. Fails with `Error::InvalidState` if the query has already
    /// completed — a finished search has nothing further to step.
    pub fn step(&mut self) -> Result<QueryState> {
        if self.cancel.load(AtomicOrdering::SeqCst) {
            return Err(Error::Cancelled);
        }
        match self.state {
            QueryState::Complete => Err(Error::InvalidState(
                "query has already completed; step() cannot be called again".to_string(),
            )),
            QueryState::Initialising => {
                let seeds = std::mem::take(&mut self.seed_clauses);
                for clause in seeds {
                    self.enqueue_pairs_with(&clause);
                    self.store.add(clause);
                }
                self.state = QueryState::Running;
                debug!(
                    "resolution query initialised with {} clauses, {} candidate pairs",
                    self.store.iterate().count(),
                    self.frontier.len()
                );
                Ok(self.state)
            }
            QueryState::Running => {
                if self.iterations >= self.max_iterations {
                    self.state = QueryState::Complete;
                    return Ok(self.state);
                }
                let pair = match self.frontier.pop() {
                    Some(p) => p,
                    None => {
                        self.state = QueryState::Complete;
                        return Ok(self.state);
                    }
                };
                self.iterations += 1;
                trace!("pair: {} / {}", pair.left, pair.right);

                // A stored clause is reused across many pairs; rename it
                // fresh each time so two uses of the same clause never
                // alias each other's variables.
                let right = pair.right.standardise_apart();
                for (sub, resolvent) in pair.left.resolve(&right) {
                    if resolvent.is_empty() {
                        let li = self.node_for(&pair.left);
                        let ri = self.node_for(&pair.right);
                        let resolvent_idx = self.node_for(&resolvent);
                        self.graph.add_edge(li, resolvent_idx, ());
                        self.graph.add_edge(ri, resolvent_idx, ());
                        self.derivation_substitution.insert(resolvent_idx, sub);
                        self.refutation = Some(resolvent_idx);
                        self.state = QueryState::Complete;
                        debug!("resolution found the empty clause after {} iterations", self.iterations);
                        return Ok(self.state);
                    }
                    if self.store.add(resolvent.clone()) {
                        let li = self.node_for(&pair.left);
                        let ri = self.node_for(&pair.right);
                        let resolvent_idx = self.node_for(&resolvent);
                        self.graph.add_edge(li, resolvent_idx, ());
                        self.graph.add_edge(ri, resolvent_idx, ());
                        self.derivation_substitution.insert(resolvent_idx, sub);
                        self.enqueue_pairs_with(&resolvent);
                    }
                }
                Ok(self.state)
            }
        }
    }

    /// Runs [`Self::step`] to completion.
    pub fn run(&mut self) -> Result<QueryState> {
        loop {
            if self.step()? == QueryState::Complete {
                return Ok(QueryState::Complete);
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == QueryState::Complete
    }

    /// `true` once a refutation (the empty clause) has been derived.
    pub fn is_refuted(&self) -> bool {
        self.refutation.is_some()
    }

    /// Reconstructs the derivation of the empty clause as an ordered list
    /// of resolution steps, closest-to-the-contradiction first. Empty if
    /// no refutation has been found — this only ever renders a positive
    /// result, never a report of why the search failed.
    pub fn explain(&self) -> Vec<ResolutionStep> {
        let mut out = Vec::new();
        let root = match self.refutation {
            Some(idx) => idx,
            None => return out,
        };
        let mut queue = std::collections::VecDeque::new();
        let mut seen = HashSet::new();
        queue.push_back(root);
        while let Some(idx) = queue.pop_front() {
            if !seen.insert(idx) {
                continue;
            }
            let mut parents = self.graph.neighbors_directed(idx, Direction::Incoming);
            let (p1, p2) = (parents.next(), parents.next());
            if let (Some(a), Some(b)) = (p1, p2) {
                let substitution = self
                    .derivation_substitution
                    .get(&idx)
                    .cloned()
                    .unwrap_or_default();
                out.push(ResolutionStep {
                    left: self.graph[a].clone(),
                    right: self.graph[b].clone(),
                    resolvent: self.graph[idx].clone(),
                    substitution,
                });
                queue.push_back(a);
                queue.push_back(b);
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
    fn refutes_a_simple_contradiction() {
        let p = clause_of(Sentence::predicate("P", vec![Term::constant("a")]));
        let not_p = clause_of(Sentence::not(Sentence::predicate("P", vec![Term::constant("a")])));
        let mut query = ResolutionQuery::new(vec![p, not_p], 50);
        let state = query.run().unwrap();
        assert_eq!(state, QueryState::Complete);
        assert!(query.is_refuted());
        assert_eq!(query.explain().len(), 1);
    }

    #[test]
    fn crime_scenario_refutes_west_is_criminal() {
        // American(west) & Weapon(M1) & Sells(west,M1,Nono) & Hostile(Nono)
        // & (forall x,y,z. American(x) & Weapon(y) & Sells(x,y,z) & Hostile(z) => Criminal(x))
        // negated goal: !Criminal(west)
        let x = VariableDeclaration::new(Symbol::plain("x"));
        let y = VariableDeclaration::new(Symbol::plain("y"));
        let z = VariableDeclaration::new(Symbol::plain("z"));
        let (xt, yt, zt) = (Term::variable(x.clone()), Term::variable(y.clone()), Term::variable(z.clone()));
        let rule = Sentence::forall(
            x,
            Sentence::forall(
                y,
                Sentence::forall(
                    z,
                    Sentence::implies(
                        Sentence::and(
                            Sentence::and(
                                Sentence::predicate("American", vec![xt.clone()]),
                                Sentence::predicate("Weapon", vec![yt.clone()]),
                            ),
                            Sentence::and(
                                Sentence::predicate("Sells", vec![xt.clone(), yt.clone(), zt.clone()]),
                                Sentence::predicate("Hostile", vec![zt]),
                            ),
                        ),
                        Sentence::predicate("Criminal", vec![xt]),
                    ),
                ),
            ),
        );
        let axioms: Vec<CNFClause> = vec![
            clause_of(rule),
            clause_of(Sentence::predicate("American", vec![Term::constant("west")])),
            clause_of(Sentence::predicate("Weapon", vec![Term::constant("m1")])),
            clause_of(Sentence::predicate(
                "Sells",
                vec![Term::constant("west"), Term::constant("m1"), Term::constant("nono")],
            )),
            clause_of(Sentence::predicate("Hostile", vec![Term::constant("nono")])),
        ];
        let negated_goal = clause_of(Sentence::not(Sentence::predicate(
            "Criminal",
            vec![Term::constant("west")],
        )));
        let mut seed = axioms;
        seed.push(negated_goal);
        let mut query = ResolutionQuery::new(seed, 200);
        let state = query.run().unwrap();
        assert_eq!(state, QueryState::Complete);
        assert!(query.is_refuted());
        assert!(!query.explain().is_empty());
    }

    #[test]
    fn cancellation_is_observed_between_steps() {
        let p = clause_of(Sentence::predicate("P", vec![Term::constant("a")]));
        let not_p = clause_of(Sentence::not(Sentence::predicate("P", vec![Term::constant("a")])));
        let mut query = ResolutionQuery::new(vec![p, not_p], 50);
        let handle = query.cancel_handle();
        handle.store(true, AtomicOrdering::SeqCst);
        assert!(matches!(query.step(), Err(Error::Cancelled)));
    }

    #[test]
    fn stepping_a_completed_query_is_an_invalid_state() {
        let p = clause_of(Sentence::predicate("P", vec![Term::constant("a")]));
        let not_p = clause_of(Sentence::not(Sentence::predicate("P", vec![Term::constant("a")])));
        let mut query = ResolutionQuery::new(vec![p, not_p], 50);
        query.run().unwrap();
        assert!(matches!(query.step(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn priority_ordering_governs_the_whole_search_not_just_the_seed() {
        // Unit-preference: always resolve the shortest clause pair first.
        // Give the engine a decoy two-literal clause that resolves with
        // the seed pair before the genuine unit clauses get a turn, and
        // check the lowest-priority (shortest) pair is still picked first
        // once it appears mid-search, not just among the original seeds.
        let p_a = clause_of(Sentence::predicate("P", vec![Term::constant("a")]));
        let not_p_a_or_q_a = clause_of(Sentence::or(
            Sentence::not(Sentence::predicate("P", vec![Term::constant("a")])),
            Sentence::predicate("Q", vec![Term::constant("a")]),
        ));
        let not_q_a = clause_of(Sentence::not(Sentence::predicate("Q", vec![Term::constant("a")])));

        let mut query = ResolutionQuery::new(vec![p_a, not_p_a_or_q_a, not_q_a], 50);
        let state = query.run().unwrap();
        assert_eq!(state, QueryState::Complete);
        assert!(query.is_refuted());
    }
}
