//! The TaintSummary grammar for tree-sitter.
//!
//! This crate ships the generated grammar artifact for TaintSummary, a small
//! language describing how taint flows through a function call
//! (`{ setSink(<0>), transitive(<1>, <-1>) }`), together with the runtime
//! pieces needed to check that the artifact loads.
//!
//! ```
//! let language = tree_sitter_taint_summary::Language::new(tree_sitter_taint_summary::language())
//!     .expect("Error loading TaintSummary grammar");
//! assert_eq!(language.name(), "TaintSummary");
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Structures and parsing logic for Tree-sitter grammar artifacts.
///
/// This module defines how the JSON emitted by `tree-sitter generate` is
/// understood: the grammar itself and the rules it is built from.
pub mod grammar;

/// Structural consistency checks for grammars.
///
/// Validation protects the language constructor from artifacts that parse as
/// JSON but could never be loaded, such as dangling symbol references.
pub mod validate;

/// Grammar handles and the language constructor.
pub mod language;

/// The binding loader check.
pub mod check;

/// Heuristic checks over TaintSummary source text.
pub mod lint;

/// Formatted reports for lint diagnostics.
pub mod report;

pub use check::{verify_grammar_loadable, IntoGrammarHandle, LoadFailure};
pub use grammar::{parse_grammar, Grammar, GrammarError, Rule};
pub use language::{GrammarHandle, Language, LoadError};
pub use lint::{lint, Diagnostic, DiagnosticKind, Position};
pub use report::{render_report, Report};
pub use validate::{validate, ValidationError};

/// The name the grammar declares for itself.
pub const GRAMMAR_NAME: &str = "TaintSummary";

/// The generated grammar artifact.
pub const GRAMMAR_JSON: &str = include_str!("grammar.json");

/// Returns the [`GrammarHandle`] for the TaintSummary grammar.
#[must_use]
pub const fn language() -> GrammarHandle {
    GrammarHandle::new(GRAMMAR_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_load_grammar() {
        if let Err(failure) = verify_grammar_loadable(GRAMMAR_NAME, language) {
            panic!("{failure}: {}", failure.reason());
        }
    }

    #[test]
    fn test_grammar_shape() {
        let language = Language::new(language()).unwrap();
        assert_eq!(language.name(), GRAMMAR_NAME);
        assert_eq!(language.start_rule(), "taint_summary");
        assert_eq!(language.rule_count(), 28);
        assert_eq!(
            language.field_names(),
            [
                "close_angle",
                "closing_brace",
                "comma",
                "error_parts",
                "number",
                "open_angle",
                "operation_name",
                "unknown_operation",
            ]
        );
        for rule in ["set_sink", "transitive", "sanitize", "swap_taint"] {
            assert!(language.grammar().rule(rule).is_some(), "{rule}");
        }
    }

    #[test]
    fn test_grammar_precedences_and_conflicts() {
        let grammar = parse_grammar(GRAMMAR_JSON).unwrap();
        assert_eq!(
            grammar.declared_precedences().into_iter().collect::<Vec<_>>(),
            ["error", "operation", "token"]
        );
        assert_eq!(grammar.conflicts.len(), 9);
        assert_eq!(grammar.extras.len(), 1);
    }
}
