//! End-to-end scenarios, driven only through the crate's public surface
//! (`KnowledgeBase`/`Query` plus the standalone `unify`/`index` entry
//! points) rather than any module's internals. Each test corresponds to
//! one of the concrete scenarios the representation/CNF/unification/
//! resolution/subsumption pipeline is expected to handle end to end.

use first_order_logic::cnf::to_cnf;
use first_order_logic::index::{FeatureVectorIndex, PredicateCountSelector};
use first_order_logic::sentence::Sentence;
use first_order_logic::symbol::{Symbol, VariableDeclaration};
use first_order_logic::term::Term;
use first_order_logic::unify;
use first_order_logic::{KnowledgeBase, Predicate};

fn var(name: &str) -> VariableDeclaration {
    VariableDeclaration::new(Symbol::plain(name))
}

/// S1: the Colonel West crime scenario. American(west), a weapon sold to a
/// hostile nation, and the general rule that makes such a seller a
/// criminal, together entail Criminal(west) by resolution refutation.
#[test]
fn s1_colonel_west_is_a_criminal() {
    let mut kb = KnowledgeBase::new();

    let x = var("x");
    let y = var("y");
    let z = var("z");
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

    kb.tell(rule).unwrap();
    kb.tell(Sentence::predicate("American", vec![Term::constant("west")]))
        .unwrap();
    kb.tell(Sentence::predicate("Weapon", vec![Term::constant("m1")]))
        .unwrap();
    kb.tell(Sentence::predicate(
        "Sells",
        vec![Term::constant("west"), Term::constant("m1"), Term::constant("nono")],
    ))
    .unwrap();
    kb.tell(Sentence::predicate("Hostile", vec![Term::constant("nono")]))
        .unwrap();

    let proven = kb
        .ask(Sentence::predicate("Criminal", vec![Term::constant("west")]), 200)
        .unwrap();
    assert!(proven);

    let mut query = kb.create_query(Sentence::predicate("Criminal", vec![Term::constant("west")]), 200);
    query.complete().unwrap();
    assert!(!query.explain().unwrap().is_empty());
}

/// S2: greedy kings are evil. A single ground fact pair plus a universally
/// quantified rule entails the instance.
#[test]
fn s2_greedy_king_is_evil() {
    let mut kb = KnowledgeBase::new();
    let x = var("x");
    let xt = Term::variable(x.clone());
    kb.tell(Sentence::forall(
        x,
        Sentence::implies(
            Sentence::and(
                Sentence::predicate("King", vec![xt.clone()]),
                Sentence::predicate("Greedy", vec![xt.clone()]),
            ),
            Sentence::predicate("Evil", vec![xt]),
        ),
    ))
    .unwrap();
    kb.tell(Sentence::predicate("King", vec![Term::constant("john")]))
        .unwrap();
    kb.tell(Sentence::predicate("Greedy", vec![Term::constant("john")]))
        .unwrap();

    assert!(kb
        .ask(Sentence::predicate("Evil", vec![Term::constant("john")]), 100)
        .unwrap());
    assert!(!kb
        .ask(Sentence::predicate("Evil", vec![Term::constant("richard")]), 100)
        .unwrap());
}

/// S3: unifying two terms each containing unbound variables produces an
/// MGU whose composition resolves both sides to the same ground term.
#[test]
fn s3_unification_composes_a_most_general_unifier() {
    let x = var("x");
    let y = var("y");
    let left = Term::function("f", vec![Term::variable(x.clone()), Term::constant("b")]);
    let right = Term::function("f", vec![Term::constant("a"), Term::variable(y.clone())]);

    let mgu = unify::try_create_terms(&left, &right).expect("f(x,b) and f(a,y) unify");
    assert_eq!(mgu.apply_to_term(&left), mgu.apply_to_term(&right));
    assert_eq!(mgu.apply_to_term(&left), Term::function("f", vec![Term::constant("a"), Term::constant("b")]));
}

/// S4: a variable occurring inside the term it would be bound to must
/// never unify — the occurs check rejects x =?= f(x).
#[test]
fn s4_occurs_check_rejects_a_cyclic_binding() {
    let x = var("x");
    let xt = Term::variable(x.clone());
    let cyclic = Term::function("f", vec![xt.clone()]);
    assert!(unify::try_create_terms(&xt, &cyclic).is_none());
}

/// S5: a feature-vector index correctly answers subsumption queries — a
/// unit clause subsumes a two-literal clause sharing its predicate, and is
/// itself found among what that larger clause's subsumers would be.
#[test]
fn s5_feature_vector_index_answers_subsumption_queries() {
    let clause_of = |s| to_cnf(&s).clauses()[0].clone();

    let x = var("x");
    let p_x = clause_of(Sentence::predicate("P", vec![Term::variable(x)]));
    let p_a_or_q_b = clause_of(Sentence::or(
        Sentence::predicate("P", vec![Term::constant("a")]),
        Sentence::predicate("Q", vec![Term::constant("b")]),
    ));

    let mut index = FeatureVectorIndex::new(PredicateCountSelector);
    assert!(index.add(p_x.clone(), "unit-P"));

    let subsumers = index.get_subsuming(&p_a_or_q_b);
    assert_eq!(subsumers.len(), 1);
    assert_eq!(subsumers[0].0, &p_x);

    assert!(index.add(p_a_or_q_b.clone(), "p-or-q"));
    let subsumed = index.get_subsumed(&p_x);
    assert!(subsumed.iter().any(|(c, _)| *c == &p_a_or_q_b));
}

/// S6: with two ground facts for the same predicate, backward chaining
/// over the definite-clause subset finds both proofs of the open goal.
#[test]
fn s6_backward_chaining_finds_every_proof() {
    let mut kb = KnowledgeBase::new();
    kb.tell(Sentence::predicate("King", vec![Term::constant("john")]))
        .unwrap();
    kb.tell(Sentence::predicate("King", vec![Term::constant("richard")]))
        .unwrap();

    let x = var("x");
    let goal = Predicate::new("King", vec![Term::variable(x)]);
    let proofs = kb.prove(&[goal], 5);
    assert_eq!(proofs.len(), 2);
}
