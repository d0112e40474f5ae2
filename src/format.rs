//! Explanation-facing rendering (C12): turns the identity-carrying internal
//! symbols minted by standardisation-apart and Skolemisation into stable,
//! short human labels instead of their `Symbol::display_name` debug form
//! (`x#17`, `sk_y#18`).
//!
//! This is deliberately a thin, standalone surface — surface syntax and
//! label-set policy are out of scope for the reasoning core itself, but a
//! caller printing a proof still needs *something* other than raw fresh
//! ids, so a minimal two-sequence labeler lives here, grounded on the
//! teacher's own small formatting helpers in `display.rs` (render-as-you-go,
//! no surface grammar).

use std::cell::RefCell;
use std::collections::HashMap;

use crate::cnf::CNFClause;
use crate::error::{Error, Result};
use crate::literal::{Literal, Predicate};
use crate::symbol::{Symbol, VariableDeclaration};
use crate::term::Term;

fn default_variable_labels() -> Vec<String> {
    "αβγδεζηθικλμνξοπρστυφχψω".chars().map(|c| c.to_string()).collect()
}

fn default_function_labels() -> Vec<String> {
    ('A'..='Z').map(|c| c.to_string()).collect()
}

/// Assigns stable labels to standardised variables and Skolem functions on
/// first encounter, drawing from two fixed label sequences. Exhausting a
/// sequence is a [`Error::ResourceExhausted`], not a panic or a silent
/// wraparound — callers that expect unboundedly many distinct symbols
/// should supply a longer sequence via [`Formatter::with_label_sets`].
pub struct Formatter {
    variable_labels: Vec<String>,
    function_labels: Vec<String>,
    assigned_variables: RefCell<HashMap<u64, String>>,
    assigned_functions: RefCell<HashMap<u64, String>>,
}

impl Formatter {
    pub fn new() -> Self {
        Formatter::with_label_sets(default_variable_labels(), default_function_labels())
    }

    pub fn with_label_sets(variable_labels: Vec<String>, function_labels: Vec<String>) -> Self {
        Formatter {
            variable_labels,
            function_labels,
            assigned_variables: RefCell::new(HashMap::new()),
            assigned_functions: RefCell::new(HashMap::new()),
        }
    }

    fn label_for(id: u64, labels: &[String], assigned: &RefCell<HashMap<u64, String>>) -> Result<String> {
        if let Some(existing) = assigned.borrow().get(&id) {
            return Ok(existing.clone());
        }
        let index = assigned.borrow().len();
        let label = labels
            .get(index)
            .cloned()
            .ok_or_else(|| Error::ResourceExhausted("label sequence exhausted".to_string()))?;
        assigned.borrow_mut().insert(id, label.clone());
        Ok(label)
    }

    fn render_symbol_as_name(&self, sym: &Symbol) -> Result<String> {
        match sym {
            Symbol::Plain(s) => Ok(s.to_string()),
            Symbol::Skolem(sk) => Self::label_for(sk.id(), &self.function_labels, &self.assigned_functions),
            Symbol::Standardised(_) => Ok(sym.display_name()),
        }
    }

    fn render_variable(&self, decl: &VariableDeclaration) -> Result<String> {
        match &decl.tag {
            Symbol::Standardised(sv) => {
                Self::label_for(sv.id(), &self.variable_labels, &self.assigned_variables)
            }
            other => self.render_symbol_as_name(other),
        }
    }

    pub fn format_term(&self, term: &Term) -> Result<String> {
        match term {
            Term::Constant(sym) => self.render_symbol_as_name(sym),
            Term::VariableReference(decl) => self.render_variable(decl),
            Term::Function(sym, args) => {
                let mut out = self.render_symbol_as_name(sym)?;
                out.push('(');
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.format_term(a)?);
                }
                out.push(')');
                Ok(out)
            }
        }
    }

    pub fn format_predicate(&self, predicate: &Predicate) -> Result<String> {
        let mut out = self.render_symbol_as_name(&predicate.id)?;
        if !predicate.args.is_empty() {
            out.push('(');
            for (i, a) in predicate.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&self.format_term(a)?);
            }
            out.push(')');
        }
        Ok(out)
    }

    pub fn format_literal(&self, literal: &Literal) -> Result<String> {
        let rendered = self.format_predicate(&literal.predicate)?;
        Ok(if literal.is_negated {
            format!("\u{ac}{}", rendered)
        } else {
            rendered
        })
    }

    pub fn format_clause(&self, clause: &CNFClause) -> Result<String> {
        if clause.is_empty() {
            return Ok("\u{22a5}".to_string());
        }
        let mut parts = Vec::with_capacity(clause.literals().len());
        for l in clause.literals() {
            parts.push(self.format_literal(l)?);
        }
        Ok(parts.join(" \u{2228} "))
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Sentence;
    use crate::symbol::VariableDeclaration as VD;

    #[test]
    fn standardised_variables_get_stable_greek_labels() {
        let source = Sentence::predicate("P", vec![]);
        let original = VD::new(Symbol::plain("x"));
        let fresh = VD::new(Symbol::standardised(original.tag.clone(), source));
        let f = Formatter::new();
        let first = f.format_term(&Term::VariableReference(fresh.clone())).unwrap();
        let second = f.format_term(&Term::VariableReference(fresh)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "\u{3b1}"); // alpha
    }

    #[test]
    fn exhausting_labels_is_resource_exhausted() {
        let source = Sentence::predicate("P", vec![]);
        let f = Formatter::with_label_sets(vec![], default_function_labels());
        let original = VD::new(Symbol::plain("x"));
        let fresh = VD::new(Symbol::standardised(original.tag, source));
        let err = f.format_term(&Term::VariableReference(fresh)).unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted(_)));
    }
}
