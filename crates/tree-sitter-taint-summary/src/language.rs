//! Grammar handles and the language constructor that accepts them.
//!
//! A [`GrammarHandle`] is what a grammar crate hands out from its `language()`
//! accessor. [`Language::new`] is the only way to turn one into a usable
//! [`Language`], and it is where a malformed or incompatible artifact is
//! rejected.

use crate::grammar::{self, Grammar, GrammarError};
use crate::validate::{self, ValidationError};

/// The newest language ABI version this runtime can load.
pub const LANGUAGE_VERSION: u32 = 15;

/// The oldest language ABI version this runtime can load.
pub const MIN_COMPATIBLE_LANGUAGE_VERSION: u32 = 13;

/// An opaque reference to a compiled grammar artifact.
///
/// The handle only carries the generated `grammar.json` text and the ABI
/// version it was generated for. Nothing is parsed until the handle is given
/// to [`Language::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarHandle {
    abi_version: u32,
    source: &'static str,
}

impl GrammarHandle {
    /// Wraps a `grammar.json` artifact generated for [`LANGUAGE_VERSION`].
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self {
            abi_version: LANGUAGE_VERSION,
            source,
        }
    }

    /// Returns the same artifact tagged with a different ABI version.
    #[must_use]
    pub const fn with_abi_version(self, abi_version: u32) -> Self {
        Self {
            abi_version,
            source: self.source,
        }
    }

    /// The ABI version the artifact was generated for.
    #[must_use]
    pub const fn abi_version(&self) -> u32 {
        self.abi_version
    }
}

/// Reasons a [`GrammarHandle`] can be refused by [`Language::new`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The handle points at no grammar data.
    #[error("grammar artifact is empty")]
    Empty,

    /// The artifact was generated for an ABI this runtime cannot load.
    #[error("incompatible language version {version}; expected {min} through {max}")]
    IncompatibleVersion {
        /// The version carried by the handle.
        version: u32,
        /// Oldest supported version.
        min: u32,
        /// Newest supported version.
        max: u32,
    },

    /// The artifact is not a well-formed grammar definition.
    #[error(transparent)]
    Parse(#[from] GrammarError),

    /// The grammar defines no rules, so it has no start rule.
    #[error("grammar defines no rules")]
    NoRules,

    /// The grammar is structurally inconsistent.
    #[error("invalid grammar: {0}")]
    Invalid(#[from] ValidationError),
}

/// A grammar that has been accepted by the runtime.
#[derive(Debug, Clone)]
pub struct Language {
    grammar: Grammar,
    start_rule: String,
    abi_version: u32,
}

impl Language {
    /// Constructs a language from a grammar handle.
    ///
    /// Only structural loadability is checked; the grammar is never run
    /// against source text.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the artifact is empty, was generated for an
    /// unsupported ABI version, fails to deserialize, has no rules, or does
    /// not pass [`validate`](crate::validate::validate).
    pub fn new(handle: GrammarHandle) -> Result<Self, LoadError> {
        if handle.source.trim().is_empty() {
            return Err(LoadError::Empty);
        }

        let version = handle.abi_version;
        if !(MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION).contains(&version) {
            return Err(LoadError::IncompatibleVersion {
                version,
                min: MIN_COMPATIBLE_LANGUAGE_VERSION,
                max: LANGUAGE_VERSION,
            });
        }

        let grammar = grammar::parse_grammar(handle.source)?;
        let start_rule = grammar::start_rule_name(handle.source)
            .filter(|name| grammar.rules.contains_key(name))
            .ok_or(LoadError::NoRules)?;
        validate::validate(&grammar, &start_rule)?;

        tracing::debug!(
            grammar = %grammar.name,
            start_rule = %start_rule,
            rules = grammar.rules.len(),
            "language constructed"
        );

        Ok(Self {
            grammar,
            start_rule,
            abi_version: version,
        })
    }

    /// The grammar's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.grammar.name
    }

    /// The rule parsing begins from.
    #[must_use]
    pub fn start_rule(&self) -> &str {
        &self.start_rule
    }

    /// The ABI version this language was loaded with.
    #[must_use]
    pub fn abi_version(&self) -> u32 {
        self.abi_version
    }

    /// Number of rules in the grammar.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.grammar.rules.len()
    }

    /// Rule names in sorted order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.grammar.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Field names used by the grammar, sorted.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.grammar.field_names().into_iter().collect()
    }

    /// The underlying grammar definition.
    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"name": "Minimal", "rules": {"start": {"type": "STRING", "value": "{}"}}}"#;

    #[test]
    fn test_minimal_grammar_loads() {
        let language = Language::new(GrammarHandle::new(MINIMAL)).unwrap();
        assert_eq!(language.name(), "Minimal");
        assert_eq!(language.start_rule(), "start");
        assert_eq!(language.rule_count(), 1);
        assert_eq!(language.abi_version(), LANGUAGE_VERSION);
    }

    #[test]
    fn test_empty_artifact() {
        for source in ["", "   \n"] {
            let err = Language::new(GrammarHandle::new(source)).unwrap_err();
            assert!(matches!(err, LoadError::Empty), "{err}");
        }
    }

    #[test]
    fn test_version_window() {
        let handle = GrammarHandle::new(MINIMAL);
        assert!(Language::new(handle.with_abi_version(MIN_COMPATIBLE_LANGUAGE_VERSION)).is_ok());

        let err = Language::new(handle.with_abi_version(LANGUAGE_VERSION + 1)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IncompatibleVersion { version: 16, min: 13, max: 15 }
        ));
        assert_eq!(
            err.to_string(),
            "incompatible language version 16; expected 13 through 15"
        );

        let err = Language::new(handle.with_abi_version(12)).unwrap_err();
        assert!(matches!(err, LoadError::IncompatibleVersion { version: 12, .. }));
    }

    #[test]
    fn test_corrupted_artifact() {
        let err = Language::new(GrammarHandle::new("{\"name\": \"Broken\", \"rules\": ")).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_no_rules() {
        let err = Language::new(GrammarHandle::new(r#"{"name": "Empty", "rules": {}}"#)).unwrap_err();
        assert!(matches!(err, LoadError::NoRules));
    }

    #[test]
    fn test_structurally_invalid() {
        let source = r#"{"name": "Bad", "rules": {"start": {"type": "SYMBOL", "name": "nowhere"}}}"#;
        let err = Language::new(GrammarHandle::new(source)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid(ValidationError::UndefinedSymbol { .. })
        ));
    }

    #[test]
    fn test_numeric_and_named_precedences_load() {
        let source = r#"{
            "name": "Prec",
            "precedences": [[{"type": "STRING", "value": "operation"}]],
            "rules": {
                "start": {"type": "PREC", "value": 1, "content": {"type": "SYMBOL", "name": "op"}},
                "op": {"type": "PREC", "value": "operation", "content": {"type": "STRING", "value": "x"}}
            }
        }"#;
        let language = Language::new(GrammarHandle::new(source)).unwrap();
        assert_eq!(language.start_rule(), "start");
        assert_eq!(language.rule_names(), ["op", "start"]);
    }

    #[test]
    fn test_escaped_start_rule_loads() {
        let source = r#"{"name": "Escaped", "rules": {"d\u00e9but": {"type": "BLANK"}}}"#;
        let language = Language::new(GrammarHandle::new(source)).unwrap();
        assert_eq!(language.start_rule(), "début");
    }

    #[test]
    fn test_parse_failure_message_is_plain() {
        let err = Language::new(GrammarHandle::new("{\"name\": 1")).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert!(!err.to_string().contains('\u{1b}'), "{err:?}");
    }
}
