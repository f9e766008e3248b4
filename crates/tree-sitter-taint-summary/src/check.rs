//! The binding loader check.
//!
//! [`verify_grammar_loadable`] runs a grammar accessor, hands the result to
//! [`Language::new`] and folds every failure into a single [`LoadFailure`].
//! Panics are not caught: they are programming errors, not load failures.

use crate::language::{GrammarHandle, Language};
use std::fmt;

/// The single failure reported when a grammar cannot be loaded.
///
/// Its message is always `Error loading <GrammarName> grammar`; the cause is
/// kept separately in [`LoadFailure::reason`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error loading {grammar} grammar")]
pub struct LoadFailure {
    grammar: String,
    reason: String,
}

impl LoadFailure {
    /// The grammar that failed to load.
    #[must_use]
    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    /// Description of the underlying error.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Values a grammar accessor may return.
///
/// Plain accessors return a [`GrammarHandle`]; fallible ones return a
/// `Result` whose error is reported as the failure reason.
pub trait IntoGrammarHandle {
    /// Converts into a handle, or a description of why none was produced.
    ///
    /// # Errors
    ///
    /// Returns the accessor's own error, rendered as text.
    fn into_grammar_handle(self) -> Result<GrammarHandle, String>;
}

impl IntoGrammarHandle for GrammarHandle {
    fn into_grammar_handle(self) -> Result<GrammarHandle, String> {
        Ok(self)
    }
}

impl<E: fmt::Display> IntoGrammarHandle for Result<GrammarHandle, E> {
    fn into_grammar_handle(self) -> Result<GrammarHandle, String> {
        self.map_err(|e| format!("grammar accessor failed: {e}"))
    }
}

/// Checks that the handle produced by `accessor` is accepted by
/// [`Language::new`].
///
/// The constructed language is dropped before returning, so repeated calls
/// are independent of each other.
///
/// # Errors
///
/// Returns a [`LoadFailure`] naming `grammar_name` if the accessor fails or
/// the runtime refuses the handle.
pub fn verify_grammar_loadable<F, R>(grammar_name: &str, accessor: F) -> Result<(), LoadFailure>
where
    F: FnOnce() -> R,
    R: IntoGrammarHandle,
{
    let loaded = accessor()
        .into_grammar_handle()
        .and_then(|handle| Language::new(handle).map_err(|e| e.to_string()));

    match loaded {
        Ok(language) => {
            tracing::debug!(grammar = grammar_name, rules = language.rule_count(), "grammar loaded");
            Ok(())
        }
        Err(reason) => {
            tracing::warn!(grammar = grammar_name, %reason, "grammar failed to load");
            Err(LoadFailure {
                grammar: grammar_name.to_string(),
                reason,
            })
        }
    }
}
