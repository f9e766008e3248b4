//! Core types for representing Tree-sitter grammar rules.
//!
//! This module contains the types used to model grammar rules and their
//! structure according to the Tree-sitter JSON schema.

use serde::Deserialize;

/// Represents a grammar rule in the Tree-sitter format.
///
/// Each rule corresponds to a node in the grammar's rule graph, identified by a
/// [`RuleType`] and containing type-specific fields such as `members` or
/// `content`.
///
/// A `Rule` can be atomic (like a literal or regex) or composite
/// (like a sequence, choice, or precedence group). Together, they
/// form a self-describing syntax graph.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    /// The discriminant identifying what kind of rule this is.
    #[serde(rename = "type")]
    pub rule_type: RuleType,

    /// Optional literal or numeric value, depending on rule kind.
    ///
    /// `STRING`, `PATTERN` and `ALIAS` carry text; `PREC*` carries either a
    /// numeric level or the name of a declared precedence.
    #[serde(default)]
    pub value: Option<RuleValue>,

    /// Optional name used by `SYMBOL` and `FIELD` rules.
    #[serde(default)]
    pub name: Option<String>,

    /// Optional nested rule for unary constructs such as `REPEAT` or `PREC`.
    #[serde(default)]
    pub content: Option<Box<Rule>>,

    /// List of child rules for compound constructs (`SEQ`, `CHOICE`).
    #[serde(default)]
    pub members: Vec<Rule>,

    /// Whether the node produced by an `ALIAS` rule is named.
    #[serde(default)]
    pub named: Option<bool>,

    /// Regex flags attached to a `PATTERN` rule.
    #[serde(default)]
    pub flags: Option<String>,

    /// Optional context label used for reserved-word handling.
    #[serde(default)]
    pub context_name: Option<String>,
}

/// A literal or numeric value attached to a rule node.
///
/// Tree-sitter writes these as bare JSON scalars, so the enum is untagged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// An integer numeric value (used by precedence modifiers).
    Integer(i32),

    /// A string value: literal text, a pattern, an alias or a precedence name.
    String(String),
}

/// The enumeration of all recognized Tree-sitter rule types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RuleType {
    /// An empty production.
    #[serde(rename = "BLANK")]
    Blank,
    /// A literal string token.
    #[serde(rename = "STRING")]
    String,
    /// A regular-expression pattern token.
    #[serde(rename = "PATTERN")]
    Pattern,
    /// A reference to another named rule.
    #[serde(rename = "SYMBOL")]
    Symbol,
    /// A rule that matches one of several alternatives.
    #[serde(rename = "CHOICE")]
    Choice,
    /// A sequential composition of member rules.
    #[serde(rename = "SEQ")]
    Seq,
    /// A zero-or-more repetition of a rule.
    #[serde(rename = "REPEAT")]
    Repeat,
    /// A one-or-more repetition of a rule.
    #[serde(rename = "REPEAT1")]
    Repeat1,
    /// A generic precedence wrapper.
    #[serde(rename = "PREC")]
    Prec,
    /// A left-associative precedence wrapper.
    #[serde(rename = "PREC_LEFT")]
    PrecLeft,
    /// A right-associative precedence wrapper.
    #[serde(rename = "PREC_RIGHT")]
    PrecRight,
    /// A dynamic (runtime) precedence wrapper.
    #[serde(rename = "PREC_DYNAMIC")]
    PrecDynamic,
    /// A named field applied to a subrule.
    #[serde(rename = "FIELD")]
    Field,
    /// An alias providing an alternate node name.
    #[serde(rename = "ALIAS")]
    Alias,
    /// A tokenization wrapper.
    #[serde(rename = "TOKEN")]
    Token,
    /// A token that must appear immediately without leading trivia.
    #[serde(rename = "IMMEDIATE_TOKEN")]
    ImmediateToken,
    /// A reserved-word context wrapper.
    #[serde(rename = "RESERVED")]
    Reserved,
}

impl RuleType {
    /// Returns `true` for the `PREC`, `PREC_LEFT`, `PREC_RIGHT` and
    /// `PREC_DYNAMIC` wrappers.
    #[must_use]
    pub fn is_precedence(self) -> bool {
        matches!(
            self,
            RuleType::Prec | RuleType::PrecLeft | RuleType::PrecRight | RuleType::PrecDynamic
        )
    }
}

impl Rule {
    /// Returns the referenced symbol name, if this is a `SYMBOL` rule.
    #[must_use]
    pub fn symbol_name(&self) -> Option<&str> {
        if self.rule_type == RuleType::Symbol {
            self.name.as_deref()
        } else {
            None
        }
    }

    /// Returns the field name, if this is a `FIELD` rule.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        if self.rule_type == RuleType::Field {
            self.name.as_deref()
        } else {
            None
        }
    }

    /// Returns the numeric precedence value if this rule is a precedence wrapper.
    #[must_use]
    pub fn precedence(&self) -> Option<i32> {
        if !self.rule_type.is_precedence() {
            return None;
        }
        match self.value.as_ref()? {
            RuleValue::Integer(i) => Some(*i),
            RuleValue::String(_) => None,
        }
    }

    /// Returns the named precedence if this wrapper refers to a declared level
    /// by name, as in `prec('operation', ...)`.
    #[must_use]
    pub fn precedence_name(&self) -> Option<&str> {
        if !self.rule_type.is_precedence() {
            return None;
        }
        self.text_value()
    }

    /// Returns the literal string value if this is a `STRING` rule.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        if self.rule_type == RuleType::String {
            self.text_value()
        } else {
            None
        }
    }

    /// Returns the pattern source if this is a `PATTERN` rule.
    #[must_use]
    pub fn pattern_value(&self) -> Option<&str> {
        if self.rule_type == RuleType::Pattern {
            self.text_value()
        } else {
            None
        }
    }

    /// Iterates over the direct children of this rule: its `content` followed
    /// by its `members`.
    pub fn children(&self) -> impl Iterator<Item = &Rule> {
        self.content.as_deref().into_iter().chain(self.members.iter())
    }

    /// Visits this rule and every rule nested below it, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Rule)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    fn text_value(&self) -> Option<&str> {
        match self.value.as_ref()? {
            RuleValue::String(s) => Some(s.as_str()),
            RuleValue::Integer(_) => None,
        }
    }
}
