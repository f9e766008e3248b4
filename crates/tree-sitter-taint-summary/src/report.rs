//! Human-readable reports for [`lint`](crate::lint::lint) diagnostics.

use crate::lint::{Diagnostic, DiagnosticKind, OPERATIONS};
use std::fmt;

/// A formatted error report over one source file.
///
/// Renders each diagnostic with its location, the offending line, a caret
/// indicator under the span and a fix suggestion.
pub struct Report<'a> {
    diagnostics: &'a [Diagnostic],
    source: &'a str,
    path: &'a str,
}

impl<'a> Report<'a> {
    /// Creates a report; `path` defaults to `<unknown>`.
    #[must_use]
    pub fn new(diagnostics: &'a [Diagnostic], source: &'a str, path: Option<&'a str>) -> Self {
        Self {
            diagnostics,
            source,
            path: path.unwrap_or("<unknown>"),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return write!(f, "No syntax errors found");
        }

        let lines: Vec<&str> = self.source.split('\n').collect();
        writeln!(
            f,
            "Found {} error(s) in {}:",
            self.diagnostics.len(),
            self.path
        )?;
        writeln!(f)?;

        for (index, diagnostic) in self.diagnostics.iter().enumerate() {
            let (start, end) = (diagnostic.start, diagnostic.end);
            let code_line = lines.get(start.row).copied().unwrap_or_default();

            let mut indicator = " ".repeat(start.column);
            indicator.push('^');
            if start.row == end.row && end.column > start.column + 1 {
                indicator.push_str(&"~".repeat(end.column - start.column - 1));
            }

            writeln!(f, "Error #{}: {}", index + 1, diagnostic.message)?;
            writeln!(
                f,
                "Location: line {}, column {}",
                start.row + 1,
                start.column + 1
            )?;
            writeln!(f, "Code: {code_line}")?;
            writeln!(f, "      {indicator}")?;
            writeln!(f, "Suggestion: {}", suggestion(diagnostic))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Renders the report for `diagnostics` over `source`.
#[must_use]
pub fn render_report(diagnostics: &[Diagnostic], source: &str, path: Option<&str>) -> String {
    Report::new(diagnostics, source, path).to_string()
}

/// The fix suggestion shown for a diagnostic.
#[must_use]
pub fn suggestion(diagnostic: &Diagnostic) -> String {
    match diagnostic.kind {
        DiagnosticKind::MissingComma => r#"add a comma ",""#.to_string(),
        DiagnosticKind::MissingCloseParen => r#"add a closing parenthesis ")""#.to_string(),
        DiagnosticKind::MissingOpenParen => r#"add an opening parenthesis "(""#.to_string(),
        DiagnosticKind::InvalidKey => {
            "keys must be integers from -1 to 9, written as <n>".to_string()
        }
        DiagnosticKind::UnknownOperation => {
            let closest = most_similar(&diagnostic.code, &OPERATIONS);
            format!(
                r#"unknown operation name "{}", did you mean "{closest}"?"#,
                diagnostic.code
            )
        }
        DiagnosticKind::MissingOpenBrace => r#"add an opening brace "{""#.to_string(),
        DiagnosticKind::MissingClosingBrace => r#"add a closing brace "}""#.to_string(),
    }
}

/// Returns the candidate closest to `target` by edit distance; the earliest
/// candidate wins a tie.
fn most_similar<'a>(target: &str, candidates: &[&'a str]) -> &'a str {
    let mut best = candidates[0];
    let mut best_score = levenshtein(target, best);
    for &candidate in &candidates[1..] {
        let score = levenshtein(target, candidate);
        if score < best_score {
            best = candidate;
            best_score = score;
        }
    }
    best
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == *cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::lint;

    #[test]
    fn test_clean_report() {
        assert_eq!(render_report(&[], "{}", Some("a.taint")), "No syntax errors found");
    }

    #[test]
    fn test_report_layout() {
        let source = "{\n  transitive(<12>, <1>)\n}";
        let diagnostics = lint(source);
        let report = render_report(&diagnostics, source, Some("summary.taint"));
        let expected = "\
Found 1 error(s) in summary.taint:

Error #1: invalid key value <12>
Location: line 2, column 14
Code:   transitive(<12>, <1>)
                   ^~~~
Suggestion: keys must be integers from -1 to 9, written as <n>

";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_unknown_operation_suggestion() {
        let source = "{ swapTaunt(<1>, <2>) }";
        let diagnostics = lint(source);
        assert_eq!(
            suggestion(&diagnostics[0]),
            r#"unknown operation name "swapTaunt", did you mean "swapTaint"?"#
        );
        assert!(render_report(&diagnostics, source, None).contains("in <unknown>:"));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("setSink", "setSink"), 0);
        assert_eq!(most_similar("sanitise", &OPERATIONS), "sanitize");
    }
}
