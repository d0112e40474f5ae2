//! Terms: the non-logical vocabulary FOL sentences are built over.
//!
//! Mirrors the shape of a Datalog `IRTerm` (`Constant`/`UserVariable`/
//! `AuxiliaryVariable`/`RenamedVariable`) but generalised to full
//! first-order terms: functions of arbitrary arity, and variable
//! *references* to a shared [`VariableDeclaration`] rather than bare name
//! strings, so standardisation-apart can mint fresh declarations without
//! renaming strings.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::symbol::{Symbol, VariableDeclaration};

pub type TermRef = Rc<Term>;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Term {
    Constant(Symbol),
    Function(Symbol, Vec<TermRef>),
    VariableReference(VariableDeclaration),
}

impl Term {
    pub fn constant(id: impl Into<Symbol>) -> TermRef {
        Rc::new(Term::Constant(id.into()))
    }

    pub fn function(id: impl Into<Symbol>, args: Vec<TermRef>) -> TermRef {
        Rc::new(Term::Function(id.into(), args))
    }

    pub fn variable(decl: VariableDeclaration) -> TermRef {
        Rc::new(Term::VariableReference(decl))
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Constant(_) => true,
            Term::VariableReference(_) => false,
            Term::Function(_, args) => args.iter().all(|a| a.is_ground()),
        }
    }

    /// Collects every distinct variable declaration occurring in this term.
    pub fn variables(&self) -> HashSet<VariableDeclaration> {
        let mut out = HashSet::new();
        self.collect_variables(&mut out);
        out
    }

    pub(crate) fn collect_variables(&self, out: &mut HashSet<VariableDeclaration>) {
        match self {
            Term::Constant(_) => {}
            Term::VariableReference(decl) => {
                out.insert(decl.clone());
            }
            Term::Function(_, args) => {
                for a in args {
                    a.collect_variables(out);
                }
            }
        }
    }

    /// True iff `decl` occurs anywhere within this term.
    pub fn occurs(&self, decl: &VariableDeclaration) -> bool {
        match self {
            Term::Constant(_) => false,
            Term::VariableReference(d) => d == decl,
            Term::Function(_, args) => args.iter().any(|a| a.occurs(decl)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(id) => write!(f, "{}", id),
            Term::VariableReference(decl) => write!(f, "{}", decl),
            Term::Function(id, args) => {
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
    }
}

/// Rebuilds a `Function` only if at least one argument actually changed,
/// otherwise returns the original `Rc` unchanged (the "share on no change"
/// rule that makes substitution and CNF conversion cheap on large, mostly
/// untouched trees).
pub fn rebuild_function_if_changed(
    original: &TermRef,
    id: &Symbol,
    old_args: &[TermRef],
    new_args: Vec<TermRef>,
) -> TermRef {
    let changed = old_args
        .iter()
        .zip(new_args.iter())
        .any(|(a, b)| !Rc::ptr_eq(a, b));
    if changed {
        Term::function(id.clone(), new_args)
    } else {
        original.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_detection() {
        let c = Term::constant("a");
        assert!(c.is_ground());
        let v = Term::variable(VariableDeclaration::new(Symbol::plain("x")));
        assert!(!v.is_ground());
        let f = Term::function("f", vec![v.clone()]);
        assert!(!f.is_ground());
        let f2 = Term::function("f", vec![c.clone()]);
        assert!(f2.is_ground());
    }

    #[test]
    fn occurs_check_walks_function_args() {
        let decl = VariableDeclaration::new(Symbol::plain("x"));
        let v = Term::variable(decl.clone());
        let f = Term::function("f", vec![v.clone()]);
        assert!(f.occurs(&decl));
        let other = VariableDeclaration::new(Symbol::plain("y"));
        assert!(!f.occurs(&other));
    }

    #[test]
    fn sharing_is_preserved_when_unchanged() {
        let a = Term::constant("a");
        let f = Term::function("f", vec![a.clone()]);
        if let Term::Function(id, args) = &*f {
            let rebuilt = rebuild_function_if_changed(&f, id, args, args.clone());
            assert!(Rc::ptr_eq(&f, &rebuilt));
        } else {
            unreachable!()
        }
    }
}
