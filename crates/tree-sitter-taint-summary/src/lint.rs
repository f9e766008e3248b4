//! Line-based checks for TaintSummary source text.
//!
//! These heuristics do not use the grammar. They catch the mistakes people
//! make most often when writing summaries by hand: a missing comma between
//! operations, unbalanced parentheses, out-of-range keys and misspelled
//! operation names.

use regex::Regex;
use std::sync::LazyLock;

/// The operation keywords of the language.
pub const OPERATIONS: [&str; 4] = ["setSink", "transitive", "sanitize", "swapTaint"];

static KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^>]+)>").expect("valid regex"));
static VALID_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]$").expect("valid regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]+").expect("valid regex"));

/// Fragments that mark a word as an attempted operation name.
const OPERATION_FRAGMENTS: [&str; 4] = ["Sink", "transitive", "sanitize", "swap"];

/// A zero-based location in the source text; columns count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Line index.
    pub row: usize,
    /// Character index within the line.
    pub column: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// The kinds of problem [`lint`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Two operations on consecutive lines without a `,` between them.
    MissingComma,
    /// More `(` than `)` on a line.
    MissingCloseParen,
    /// More `)` than `(` on a line.
    MissingOpenParen,
    /// A `<...>` key that is not an integer from -1 to 9.
    InvalidKey,
    /// A word that looks like a misspelled operation.
    UnknownOperation,
    /// The source never opens the summary with `{`.
    MissingOpenBrace,
    /// The source never closes the summary with `}`.
    MissingClosingBrace,
}

impl DiagnosticKind {
    /// Stable identifier, matching the grammar's error token names.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::MissingComma => "ERROR_MISSING_COMMA",
            DiagnosticKind::MissingCloseParen => "ERROR_MISSING_CLOSE_PAREN",
            DiagnosticKind::MissingOpenParen => "ERROR_MISSING_OPEN_PAREN",
            DiagnosticKind::InvalidKey => "ERROR_INVALID_KEY",
            DiagnosticKind::UnknownOperation => "ERROR_UNKNOWN_OPERATION",
            DiagnosticKind::MissingOpenBrace => "ERROR_MISSING_OPEN_BRACE",
            DiagnosticKind::MissingClosingBrace => "ERROR_MISSING_CLOSING_BRACE",
        }
    }
}

/// A single problem found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
    /// Start of the offending span.
    pub start: Position,
    /// End of the offending span.
    pub end: Position,
    /// The offending text, if any.
    pub code: String,
}

/// Runs every check over `source` and returns the problems in line order,
/// followed by any missing-brace problems.
#[must_use]
pub fn lint(source: &str) -> Vec<Diagnostic> {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut diagnostics = Vec::new();
    let mut open_brace = false;
    let mut close_brace = false;

    for (row, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        let indent = raw.len() - raw.trim_start().len();
        // Columns are reported against the untrimmed line.
        let column = |offset: usize| raw[..indent + offset].chars().count();
        let end_of_line = Position::new(row, column(line.len()));

        open_brace |= line.contains('{');
        close_brace |= line.contains('}');

        if line.contains(')') && !line.contains(',') && !line.contains('}') {
            let next = lines.get(row + 1).copied().map(str::trim).unwrap_or_default();
            if OPERATIONS.iter().any(|op| next.starts_with(op)) {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::MissingComma,
                    message: r#"missing comma ",""#.to_string(),
                    start: end_of_line,
                    end: end_of_line,
                    code: line.to_string(),
                });
            }
        }

        let opens = line.matches('(').count();
        let closes = line.matches(')').count();
        if opens > closes {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::MissingCloseParen,
                message: r#"missing closing parenthesis ")""#.to_string(),
                start: end_of_line,
                end: end_of_line,
                code: line.to_string(),
            });
        } else if closes > opens {
            let at = line.find(')').unwrap_or_default();
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::MissingOpenParen,
                message: r#"missing opening parenthesis "(""#.to_string(),
                start: Position::new(row, column(at)),
                end: Position::new(row, column(at + 1)),
                code: line.to_string(),
            });
        }

        for key in KEY.find_iter(line) {
            let content = &key.as_str()[1..key.as_str().len() - 1];
            if !VALID_KEY.is_match(content) {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::InvalidKey,
                    message: format!("invalid key value {}", key.as_str()),
                    start: Position::new(row, column(key.start())),
                    end: Position::new(row, column(key.end())),
                    code: key.as_str().to_string(),
                });
            }
        }

        for word in WORD.find_iter(line) {
            let text = word.as_str();
            let attempted = OPERATION_FRAGMENTS.iter().any(|f| text.contains(f));
            if attempted && !OPERATIONS.contains(&text) {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::UnknownOperation,
                    message: format!(r#"unknown operation name "{text}""#),
                    start: Position::new(row, column(word.start())),
                    end: Position::new(row, column(word.end())),
                    code: text.to_string(),
                });
            }
        }
    }

    if !open_brace {
        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::MissingOpenBrace,
            message: r#"missing opening brace "{""#.to_string(),
            start: Position::new(0, 0),
            end: Position::new(0, 0),
            code: String::new(),
        });
    }

    if !close_brace {
        let row = lines.len() - 1;
        let end = Position::new(row, lines[row].chars().count());
        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::MissingClosingBrace,
            message: r#"missing closing brace "}""#.to_string(),
            start: end,
            end,
            code: String::new(),
        });
    }

    diagnostics
}
