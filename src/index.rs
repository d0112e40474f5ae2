//! The feature-vector subsumption index (C8): a trie keyed by a sorted
//! `(feature, magnitude)` vector, answering "which stored clauses subsume
//! (or are subsumed by) this clause?" without a full linear scan.
//!
//! There is no direct teacher precedent for a subsumption trie in the
//! retrieval pack (the closest the teacher gets is its by-signature
//! `HashMap<Signature, Vec<bool>>` groundness table in `sld.rs`, a much
//! flatter index); this module instead follows the general shape the pack's
//! other tree/graph structures use — `petgraph`-free, hand-rolled recursive
//! node types with `BTreeMap` children, in the style of `chalk-engine`'s
//! `search_graph` module (a recursive, mutation-tracking lookup structure
//! keyed by a canonicalised value).

use std::collections::{BTreeMap, HashSet};

use log::trace;

use crate::cnf::CNFClause;
use crate::symbol::Symbol;

/// A `(feature, magnitude)` component. Magnitude zero is never stored
/// explicitly (the "open feature universe" invariant): absence of a
/// feature in a vector means magnitude zero.
pub type FeatureVector = Vec<(Symbol, u32)>;

/// Derives the feature vector for a clause. The canonical selector (see
/// [`PredicateCountSelector`]) uses predicate identifiers as features and
/// occurrence counts as magnitudes; the index itself is agnostic to the
/// choice.
pub trait FeatureSelector {
    fn select(&self, clause: &CNFClause) -> FeatureVector;
}

/// The canonical feature selector named in the design: one feature per
/// distinct predicate identifier appearing in the clause, magnitude is the
/// literal count for that identifier (sign-insensitive).
pub struct PredicateCountSelector;

impl FeatureSelector for PredicateCountSelector {
    fn select(&self, clause: &CNFClause) -> FeatureVector {
        let mut counts: BTreeMap<Symbol, u32> = BTreeMap::new();
        for l in clause.literals() {
            *counts.entry(l.predicate.id.clone()).or_insert(0) += 1;
        }
        counts.into_iter().filter(|(_, m)| *m > 0).collect()
    }
}

struct Node<V> {
    children: BTreeMap<(Symbol, u32), Node<V>>,
    entries: Vec<(CNFClause, V)>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Node {
            children: BTreeMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> Node<V> {
    fn is_empty(&self) -> bool {
        self.children.is_empty() && self.entries.is_empty()
    }
}

type KeyAddedHook<V> = Box<dyn FnMut(&CNFClause, &V)>;
type KeyRemovedHook = Box<dyn FnMut(&CNFClause)>;

/// A feature-vector subsumption index over stored `(CNFClause, V)` pairs.
pub struct FeatureVectorIndex<S: FeatureSelector, V> {
    selector: S,
    root: Node<V>,
    on_key_added: Vec<KeyAddedHook<V>>,
    on_key_removed: Vec<KeyRemovedHook>,
}

impl<S: FeatureSelector, V> FeatureVectorIndex<S, V> {
    pub fn new(selector: S) -> Self {
        FeatureVectorIndex {
            selector,
            root: Node::default(),
            on_key_added: Vec::new(),
            on_key_removed: Vec::new(),
        }
    }

    pub fn on_key_added(&mut self, hook: impl FnMut(&CNFClause, &V) + 'static) {
        self.on_key_added.push(Box::new(hook));
    }

    pub fn on_key_removed(&mut self, hook: impl FnMut(&CNFClause) + 'static) {
        self.on_key_removed.push(Box::new(hook));
    }

    /// Inserts `clause -> value`. Returns `false` (no-op) for the empty
    /// clause, which is rejected as a key because it trivially subsumes
    /// everything and has an empty feature vector.
    pub fn add(&mut self, clause: CNFClause, value: V) -> bool {
        if clause.is_empty() {
            return false;
        }
        let vector = self.selector.select(&clause);
        let node = Self::descend_create(&mut self.root, &vector);
        if node.entries.iter().any(|(c, _)| c == &clause) {
            return false;
        }
        node.entries.push((clause.clone(), value));
        for hook in self.on_key_added.iter_mut() {
            let (c, v) = node.entries.last().unwrap();
            hook(c, v);
        }
        true
    }

    fn descend_create<'a>(node: &'a mut Node<V>, vector: &[(Symbol, u32)]) -> &'a mut Node<V> {
        match vector.split_first() {
            None => node,
            Some((head, rest)) => {
                let child = node.children.entry(head.clone()).or_insert_with(Node::default);
                Self::descend_create(child, rest)
            }
        }
    }

    pub fn try_get(&self, clause: &CNFClause) -> Option<&V> {
        if clause.is_empty() {
            return None;
        }
        let vector = self.selector.select(clause);
        let node = Self::descend_find(&self.root, &vector)?;
        node.entries
            .iter()
            .find(|(c, _)| c == clause)
            .map(|(_, v)| v)
    }

    fn descend_find<'a>(node: &'a Node<V>, vector: &[(Symbol, u32)]) -> Option<&'a Node<V>> {
        match vector.split_first() {
            None => Some(node),
            Some((head, rest)) => Self::descend_find(node.children.get(head)?, rest),
        }
    }

    /// Every stored clause `s` with `s.subsumes(query)`.
    pub fn get_subsuming(&self, query: &CNFClause) -> Vec<(&CNFClause, &V)> {
        let vector = self.selector.select(query);
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        Self::collect_subsuming(&self.root, &vector, 0, query, &mut seen, &mut out);
        out
    }

    fn collect_subsuming<'a>(
        node: &'a Node<V>,
        query_vector: &[(Symbol, u32)],
        qi: usize,
        query: &CNFClause,
        seen: &mut HashSet<CNFClause>,
        out: &mut Vec<(&'a CNFClause, &'a V)>,
    ) {
        for (clause, value) in &node.entries {
            if seen.insert(clause.clone()) && clause.subsumes(query) {
                out.push((clause, value));
            }
        }
        if qi >= query_vector.len() {
            // Any stored feature beyond this point is unmatched and would
            // need magnitude <= 0, which zero-omission makes impossible.
            return;
        }
        let (qf, qm) = &query_vector[qi];
        for ((f, m), child) in node
            .children
            .range((qf.clone(), 0)..=(qf.clone(), *qm))
        {
            if f == qf {
                Self::collect_subsuming(child, query_vector, qi + 1, query, seen, out);
            }
        }
        // The stored vector may simply lack this query feature (acts as 0,
        // which trivially satisfies `<=`); try the remaining query suffix
        // from the same node.
        Self::collect_subsuming(node, query_vector, qi + 1, query, seen, out);
    }

    /// Every stored clause `s` with `query.subsumes(s)`.
    pub fn get_subsumed(&self, query: &CNFClause) -> Vec<(&CNFClause, &V)> {
        let vector = self.selector.select(query);
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        Self::collect_subsumed(&self.root, &vector, 0, query, &mut seen, &mut out);
        out
    }

    fn collect_subsumed<'a>(
        node: &'a Node<V>,
        query_vector: &[(Symbol, u32)],
        qi: usize,
        query: &CNFClause,
        seen: &mut HashSet<CNFClause>,
        out: &mut Vec<(&'a CNFClause, &'a V)>,
    ) {
        if qi >= query_vector.len() {
            for (clause, value) in &node.entries {
                if seen.insert(clause.clone()) && query.subsumes(clause) {
                    out.push((clause, value));
                }
            }
            for child in node.children.values() {
                Self::collect_subsumed(child, query_vector, qi, query, seen, out);
            }
            return;
        }
        let (qf, qm) = &query_vector[qi];
        for ((f, m), child) in &node.children {
            if f == qf {
                if m >= qm {
                    Self::collect_subsumed(child, query_vector, qi + 1, query, seen, out);
                }
            } else {
                // Extra stored feature with no counterpart at this query
                // position: unconstrained, query index stays put.
                Self::collect_subsumed(child, query_vector, qi, query, seen, out);
            }
        }
    }

    /// Removes every stored clause subsumed by `query`, pruning emptied
    /// sub-tries on the way out. Returns the removed entries.
    pub fn remove_subsumed(&mut self, query: &CNFClause) -> Vec<(CNFClause, V)> {
        let vector = self.selector.select(query);
        let mut removed = Vec::new();
        Self::remove_subsumed_rec(&mut self.root, &vector, 0, query, &mut removed);
        for (clause, _) in &removed {
            for hook in self.on_key_removed.iter_mut() {
                hook(clause);
            }
        }
        removed
    }

    fn remove_subsumed_rec(
        node: &mut Node<V>,
        query_vector: &[(Symbol, u32)],
        qi: usize,
        query: &CNFClause,
        removed: &mut Vec<(CNFClause, V)>,
    ) {
        if qi >= query_vector.len() {
            let mut kept = Vec::new();
            for (clause, value) in node.entries.drain(..) {
                if query.subsumes(&clause) {
                    removed.push((clause, value));
                } else {
                    kept.push((clause, value));
                }
            }
            node.entries = kept;
            let mut empty_children = Vec::new();
            for (key, child) in node.children.iter_mut() {
                Self::remove_subsumed_rec(child, query_vector, qi, query, removed);
                if child.is_empty() {
                    empty_children.push(key.clone());
                }
            }
            for key in empty_children {
                node.children.remove(&key);
            }
            return;
        }
        let (qf, qm) = query_vector[qi].clone();
        let mut empty_children = Vec::new();
        for (key, child) in node.children.iter_mut() {
            let (f, m) = key;
            if *f == qf {
                if *m >= qm {
                    Self::remove_subsumed_rec(child, query_vector, qi + 1, query, removed);
                }
            } else {
                Self::remove_subsumed_rec(child, query_vector, qi, query, removed);
            }
            if child.is_empty() {
                empty_children.push(key.clone());
            }
        }
        for key in empty_children {
            node.children.remove(&key);
        }
    }

    /// If any stored clause subsumes `clause`, does nothing and returns
    /// `false`. Otherwise removes every stored clause subsumed by `clause`,
    /// inserts `clause -> value`, and returns `true`.
    pub fn try_replace_subsumed(&mut self, clause: CNFClause, value: V) -> bool {
        if clause.is_empty() {
            return false;
        }
        if !self.get_subsuming(&clause).is_empty() {
            trace!("try_replace_subsumed: already subsumed, no-op");
            return false;
        }
        self.remove_subsumed(&clause);
        self.add(clause, value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::{Literal, Predicate};
    use crate::term::Term;

    fn clause_p_a() -> CNFClause {
        CNFClause::new(vec![Literal::positive(Predicate::new("P", vec![Term::constant("a")]))])
    }

    fn clause_p_a_q_b() -> CNFClause {
        CNFClause::new(vec![
            Literal::positive(Predicate::new("P", vec![Term::constant("a")])),
            Literal::positive(Predicate::new("Q", vec![Term::constant("b")])),
        ])
    }

    #[test]
    fn s5_fv_index_subsumption_scenario() {
        let mut index = FeatureVectorIndex::new(PredicateCountSelector);
        index.add(clause_p_a(), 1u32);
        index.add(clause_p_a_q_b(), 2u32);

        let query = clause_p_a_q_b();
        let subsuming = index.get_subsuming(&query);
        assert_eq!(subsuming.len(), 2);

        let query2 = clause_p_a();
        let subsumed = index.get_subsumed(&query2);
        assert_eq!(subsumed.len(), 2);

        let replaced = index.try_replace_subsumed(clause_p_a(), 3u32);
        assert!(!replaced); // clause_p_a() already present (exact match counts as "subsuming")

        let removed = index.try_replace_subsumed(clause_p_a_q_b(), 4u32);
        // get_subsuming({P(a),Q(b)}) included {P(a)} which subsumes it, so no-op
        assert!(!removed);
        assert!(index.try_get(&clause_p_a_q_b()).is_some());
    }
}
