//! Validation routines for Tree-sitter grammars.
//!
//! This module performs structural checks over parsed [`Grammar`](crate::grammar::Grammar)
//! definitions, such as verifying symbol references, named precedences and
//! conflict groups. Findings that tree-sitter itself only warns about, like
//! unreachable rules, are logged rather than returned.

use crate::grammar::{Grammar, Rule, RuleType};
use std::collections::{BTreeMap, HashSet};

/// Represents a validation failure encountered when checking a grammar.
///
/// Each variant is a structural defect that would stop a grammar from being
/// loaded as a language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The requested start rule is not defined.
    #[error("start rule '{0}' is not defined")]
    MissingStartRule(String),

    /// A `SYMBOL` refers to neither a rule nor an external token.
    #[error("undefined symbol '{symbol}' referenced in rule '{rule}'")]
    UndefinedSymbol {
        /// The unresolved symbol.
        symbol: String,
        /// The rule containing the reference.
        rule: String,
    },

    /// A named precedence is used but never declared in `precedences`.
    #[error("undeclared precedence '{precedence}' used in rule '{rule}'")]
    UndeclaredPrecedence {
        /// The precedence name.
        precedence: String,
        /// The rule using it.
        rule: String,
    },

    /// A conflict group names a rule that does not exist.
    #[error("conflict group {group:?} references undefined rule '{symbol}'")]
    UndefinedConflictMember {
        /// The unresolved rule name.
        symbol: String,
        /// The full conflict group.
        group: Vec<String>,
    },
}

/// Performs structural validation of a parsed [`Grammar`](crate::grammar::Grammar).
///
/// This function runs several consistency passes over the grammar:
///
/// - Checks that the start rule and all referenced symbols are defined.
/// - Checks that named precedences are declared.
/// - Checks that conflict groups only name defined rules.
/// - Warns about unreachable rules.
/// - Notes immediate left recursion.
/// - Warns about rules mixing numeric precedence levels.
///
/// # Errors
///
/// Returns a [`ValidationError`] for the first structural violation found.
pub fn validate(grammar: &Grammar, start_rule: &str) -> Result<(), ValidationError> {
    if !grammar.rules.contains_key(start_rule) {
        return Err(ValidationError::MissingStartRule(start_rule.to_string()));
    }

    check_undefined_symbols(grammar)?;
    check_named_precedences(grammar)?;
    check_conflicts(grammar)?;

    check_unreachable_rules(grammar, start_rule);
    check_left_recursion(grammar);
    check_precedence_levels(grammar);

    Ok(())
}

/// Rule names in sorted order, so the first reported error is deterministic.
fn sorted_rules(grammar: &Grammar) -> Vec<(&String, &Rule)> {
    let mut rules: Vec<_> = grammar.rules.iter().collect();
    rules.sort_by(|a, b| a.0.cmp(b.0));
    rules
}

fn check_undefined_symbols(grammar: &Grammar) -> Result<(), ValidationError> {
    let defined: HashSet<&str> = grammar
        .rules
        .keys()
        .map(String::as_str)
        .chain(grammar.external_names())
        .collect();

    for (rule_name, rule) in sorted_rules(grammar) {
        let mut undefined = None;
        rule.walk(&mut |r| {
            if let Some(name) = r.symbol_name() {
                if undefined.is_none() && !defined.contains(name) {
                    undefined = Some(name.to_string());
                }
            }
        });
        if let Some(symbol) = undefined {
            return Err(ValidationError::UndefinedSymbol {
                symbol,
                rule: rule_name.clone(),
            });
        }
    }

    Ok(())
}

fn check_named_precedences(grammar: &Grammar) -> Result<(), ValidationError> {
    let declared = grammar.declared_precedences();

    for (rule_name, rule) in sorted_rules(grammar) {
        let mut undeclared = None;
        rule.walk(&mut |r| {
            if let Some(name) = r.precedence_name() {
                if undeclared.is_none() && !declared.contains(name) {
                    undeclared = Some(name.to_string());
                }
            }
        });
        if let Some(precedence) = undeclared {
            return Err(ValidationError::UndeclaredPrecedence {
                precedence,
                rule: rule_name.clone(),
            });
        }
    }

    Ok(())
}

fn check_conflicts(grammar: &Grammar) -> Result<(), ValidationError> {
    for group in &grammar.conflicts {
        if let Some(symbol) = group.iter().find(|s| !grammar.rules.contains_key(*s)) {
            return Err(ValidationError::UndefinedConflictMember {
                symbol: symbol.clone(),
                group: group.clone(),
            });
        }
    }
    Ok(())
}

fn check_unreachable_rules(grammar: &Grammar, start_rule: &str) {
    let mut reachable = HashSet::new();
    let mut to_visit = vec![start_rule.to_string()];

    // Extras, externals and supertypes are roots of their own.
    for rule in grammar.extras.iter().chain(&grammar.externals) {
        collect_referenced_symbols(rule, &mut to_visit);
    }
    to_visit.extend(grammar.supertypes.iter().cloned());

    while let Some(rule_name) = to_visit.pop() {
        if !reachable.insert(rule_name.clone()) {
            continue;
        }

        if let Some(rule) = grammar.rules.get(&rule_name) {
            collect_referenced_symbols(rule, &mut to_visit);
        }
    }

    for (rule_name, _) in sorted_rules(grammar) {
        if !reachable.contains(rule_name) && !grammar.inline.contains(rule_name) {
            tracing::warn!(grammar = %grammar.name, rule = %rule_name, "unreachable rule");
        }
    }
}

fn collect_referenced_symbols(rule: &Rule, symbols: &mut Vec<String>) {
    rule.walk(&mut |r| {
        if let Some(name) = r.symbol_name() {
            symbols.push(name.to_string());
        }
    });
}

fn check_left_recursion(grammar: &Grammar) {
    for (rule_name, rule) in sorted_rules(grammar) {
        if has_immediate_left_recursion(rule, rule_name) {
            tracing::debug!(grammar = %grammar.name, rule = %rule_name, "left-recursive rule");
        }
    }
}

fn has_immediate_left_recursion(rule: &Rule, target: &str) -> bool {
    match rule.rule_type {
        RuleType::Symbol => rule.name.as_deref() == Some(target),
        RuleType::Seq => rule
            .members
            .first()
            .is_some_and(|first| has_immediate_left_recursion(first, target)),
        RuleType::Choice => rule
            .members
            .iter()
            .any(|member| has_immediate_left_recursion(member, target)),
        RuleType::Prec
        | RuleType::PrecLeft
        | RuleType::PrecRight
        | RuleType::PrecDynamic
        | RuleType::Field
        | RuleType::Alias
        | RuleType::Repeat
        | RuleType::Repeat1 => rule
            .content
            .as_deref()
            .is_some_and(|content| has_immediate_left_recursion(content, target)),
        _ => false,
    }
}

fn check_precedence_levels(grammar: &Grammar) {
    let mut prec_levels: BTreeMap<&str, Vec<i32>> = BTreeMap::new();

    for (rule_name, rule) in &grammar.rules {
        rule.walk(&mut |r| {
            if let Some(p) = r.precedence() {
                let levels = prec_levels.entry(rule_name.as_str()).or_default();
                if !levels.contains(&p) {
                    levels.push(p);
                }
            }
        });
    }

    for (rule, levels) in &prec_levels {
        if levels.len() > 1 {
            tracing::warn!(grammar = %grammar.name, rule = %rule, ?levels, "multiple precedence levels");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_grammar;

    fn grammar(json: &str) -> Grammar {
        parse_grammar(json).unwrap()
    }

    #[test]
    fn test_valid_grammar_passes() {
        let g = grammar(
            r#"{
                "name": "test",
                "precedences": [[{"type": "STRING", "value": "operation"}]],
                "conflicts": [["op"]],
                "rules": {
                    "root": {"type": "REPEAT", "content": {"type": "SYMBOL", "name": "op"}},
                    "op": {"type": "PREC", "value": "operation", "content": {"type": "STRING", "value": "x"}}
                }
            }"#,
        );
        assert_eq!(validate(&g, "root"), Ok(()));
    }

    #[test]
    fn test_missing_start_rule() {
        let g = grammar(r#"{"name": "test", "rules": {"a": {"type": "BLANK"}}}"#);
        assert_eq!(
            validate(&g, "root"),
            Err(ValidationError::MissingStartRule("root".into()))
        );
    }

    #[test]
    fn test_undefined_symbol_in_nested_rule() {
        let g = grammar(
            r#"{
                "name": "test",
                "rules": {
                    "root": {
                        "type": "PREC_DYNAMIC",
                        "value": -1,
                        "content": {"type": "SEQ", "members": [{"type": "SYMBOL", "name": "ghost"}]}
                    }
                }
            }"#,
        );
        assert_eq!(
            validate(&g, "root"),
            Err(ValidationError::UndefinedSymbol {
                symbol: "ghost".into(),
                rule: "root".into(),
            })
        );
    }

    #[test]
    fn test_external_symbols_are_defined() {
        let g = grammar(
            r#"{
                "name": "test",
                "externals": [{"type": "SYMBOL", "name": "heredoc"}],
                "rules": {"root": {"type": "SYMBOL", "name": "heredoc"}}
            }"#,
        );
        assert_eq!(validate(&g, "root"), Ok(()));
    }

    #[test]
    fn test_undeclared_precedence() {
        let g = grammar(
            r#"{
                "name": "test",
                "rules": {
                    "root": {"type": "PREC", "value": "error", "content": {"type": "BLANK"}}
                }
            }"#,
        );
        assert_eq!(
            validate(&g, "root"),
            Err(ValidationError::UndeclaredPrecedence {
                precedence: "error".into(),
                rule: "root".into(),
            })
        );
    }

    #[test]
    fn test_undefined_conflict_member() {
        let g = grammar(
            r#"{
                "name": "test",
                "conflicts": [["root", "missing"]],
                "rules": {"root": {"type": "BLANK"}}
            }"#,
        );
        assert_eq!(
            validate(&g, "root"),
            Err(ValidationError::UndefinedConflictMember {
                symbol: "missing".into(),
                group: vec!["root".into(), "missing".into()],
            })
        );
    }

    #[test]
    fn test_unreachable_rules_only_warn() {
        let g = grammar(
            r#"{
                "name": "test",
                "rules": {"root": {"type": "BLANK"}, "orphan": {"type": "STRING", "value": "x"}}
            }"#,
        );
        assert_eq!(validate(&g, "root"), Ok(()));
    }

    #[test]
    fn test_left_recursion_detection() {
        let g = grammar(
            r#"{
                "name": "test",
                "rules": {
                    "list": {
                        "type": "PREC_LEFT",
                        "value": 1,
                        "content": {
                            "type": "SEQ",
                            "members": [
                                {"type": "SYMBOL", "name": "list"},
                                {"type": "STRING", "value": ","}
                            ]
                        }
                    }
                }
            }"#,
        );
        let rule = g.rule("list").unwrap();
        assert!(has_immediate_left_recursion(rule, "list"));
        assert_eq!(validate(&g, "list"), Ok(()));
    }
}
