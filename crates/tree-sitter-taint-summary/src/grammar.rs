//! Core structures and parsing logic for Tree-sitter grammars.
//!
//! This module defines the internal representation of a grammar as parsed from
//! Tree-sitter's JSON format. It uses [`serde_json`] for deserialization and
//! provides ergonomic accessors for inspecting rule properties and structure.

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Rule types and accessors.
pub mod rules;

pub use rules::{Rule, RuleType, RuleValue};

/// Represents a full Tree-sitter grammar definition.
///
/// This structure directly mirrors the serialized JSON format produced by
/// `tree-sitter generate`. It captures the complete rule set along with
/// auxiliary metadata such as precedences, conflicts, and supertypes.
///
/// See <https://tree-sitter.github.io/tree-sitter/assets/schemas/grammar.schema.json>
#[derive(Debug, Clone, Deserialize)]
pub struct Grammar {
    /// Optional `$schema` field from the JSON, typically used for schema
    /// validation or editor integration.
    #[serde(rename = "$schema", default)]
    pub schema: Option<String>,

    /// The name of the grammar (e.g. `"TaintSummary"`).
    pub name: String,

    /// Optional name of a base grammar that this one inherits from.
    #[serde(default)]
    pub inherits: Option<String>,

    /// Map of all rule identifiers to their corresponding definitions.
    ///
    /// Map order is not preserved; see [`start_rule_name`] for the entry rule.
    pub rules: HashMap<String, Rule>,

    /// Tokens that may appear between other tokens, such as whitespace.
    #[serde(default)]
    pub extras: Vec<Rule>,

    /// Rules implemented externally via a scanner.
    #[serde(default)]
    pub externals: Vec<Rule>,

    /// Names of rules that should be inlined into other rules.
    #[serde(default)]
    pub inline: Vec<String>,

    /// Ordered groups of named precedence levels, highest first.
    ///
    /// Each entry is a `STRING` rule naming a level or a `SYMBOL` rule.
    #[serde(default)]
    pub precedences: Vec<Vec<Rule>>,

    /// Explicit conflict groups expected during parsing.
    #[serde(default)]
    pub conflicts: Vec<Vec<String>>,

    /// Context-specific reserved word definitions.
    #[serde(default)]
    pub reserved: HashMap<String, Vec<Rule>>,

    /// The special rule name used to identify word tokens (keywords, identifiers, etc.).
    #[serde(default)]
    pub word: Option<String>,

    /// A list of node supertypes, grouping related syntactic forms.
    #[serde(default)]
    pub supertypes: Vec<String>,
}

/// Possible errors raised during grammar parsing.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// The input JSON was syntactically invalid or structurally mismatched.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

/// Parse a JSON grammar definition into a strongly typed [`Grammar`] structure.
///
/// # Errors
///
/// Returns [`GrammarError::JsonParse`] if the provided string is not valid JSON
/// or fails schema deserialization.
pub fn parse_grammar(json: &str) -> Result<Grammar, GrammarError> {
    serde_json::from_str(json).map_err(|e| GrammarError::JsonParse(e.to_string()))
}

/// Returns the first key of the top-level `rules` object.
///
/// Tree-sitter treats the first rule as the start rule, but a [`HashMap`]
/// forgets insertion order, so the keys are read again in document order.
#[must_use]
pub fn start_rule_name(json: &str) -> Option<String> {
    serde_json::from_str::<RuleOrder>(json).ok()?.rules.0
}

#[derive(Deserialize)]
struct RuleOrder {
    rules: FirstKey,
}

/// The first key of a JSON object; the remaining entries are skipped.
struct FirstKey(Option<String>);

impl<'de> Deserialize<'de> for FirstKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FirstKeyVisitor;

        impl<'de> Visitor<'de> for FirstKeyVisitor {
            type Value = FirstKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of rules")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FirstKey, A::Error> {
                let first = map.next_key::<String>()?;
                if first.is_some() {
                    map.next_value::<IgnoredAny>()?;
                    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                }
                Ok(FirstKey(first))
            }
        }

        deserializer.deserialize_map(FirstKeyVisitor)
    }
}

impl Grammar {
    /// Looks up a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Names of the externally scanned tokens.
    pub fn external_names(&self) -> impl Iterator<Item = &str> {
        self.externals.iter().filter_map(|r| r.name.as_deref())
    }

    /// Names of every level declared in [`Grammar::precedences`].
    #[must_use]
    pub fn declared_precedences(&self) -> BTreeSet<&str> {
        self.precedences
            .iter()
            .flatten()
            .filter_map(|entry| entry.string_value().or(entry.symbol_name()))
            .collect()
    }

    /// Every distinct field name used anywhere in the grammar, sorted.
    #[must_use]
    pub fn field_names(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        for rule in self.rules.values() {
            rule.walk(&mut |r| {
                if let Some(name) = r.field_name() {
                    fields.insert(name);
                }
            });
        }
        fields
    }
}
