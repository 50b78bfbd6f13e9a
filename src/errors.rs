//! Lsys Error Handling
//!
//! Every fallible operation in the crate reports through [`LsysError`], a single
//! `miette`-based diagnostic type. Grammar problems are detected when a grammar is
//! built and never deferred to validation time.
//!
//! Validation outcomes are *not* errors: a candidate that fails to match the
//! automaton produces a [`Verdict::Rejected`](crate::automaton::Verdict) carrying
//! the reason, so rejection stays an ordinary value the caller can inspect.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::grammar::Symbol;

/// Crate-wide result alias.
pub type LsysResult<T> = Result<T, LsysError>;

/// Unified error type for grammar construction, definition loading and drawing.
#[derive(Debug, Error, Diagnostic)]
pub enum LsysError {
    /// A string contains a symbol the grammar never declared.
    #[error("invalid symbol '{symbol}' at position {position}")]
    #[diagnostic(
        code(lsys::grammar::invalid_symbol),
        help("declare the symbol as a variable or a constant of the grammar")
    )]
    InvalidSymbol { symbol: Symbol, position: usize },

    /// A production rule references an undeclared symbol, is defined twice,
    /// or rewrites a constant.
    #[error("malformed rule for '{head}': {reason}")]
    #[diagnostic(code(lsys::grammar::malformed_rule))]
    MalformedRule { head: Symbol, reason: String },

    /// A symbol was declared both as a variable and as a constant.
    #[error("symbol '{symbol}' is declared both as a variable and as a constant")]
    #[diagnostic(code(lsys::grammar::conflicting_classification))]
    ConflictingClassification { symbol: Symbol },

    /// Rule-list or axiom text that does not match the definition syntax.
    #[error("syntax error: {message}")]
    #[diagnostic(
        code(lsys::syntax::error),
        help("rules are written as `F:F+F,G:GG`: one symbol, a colon, then the replacement")
    )]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    /// A YAML or JSON definition file that could not be decoded.
    #[error("invalid definition: {message}")]
    #[diagnostic(code(lsys::config::invalid))]
    Config { message: String },

    /// The turtle was asked to restore a position it never saved.
    #[error("unbalanced pop at position {position}: no saved turtle state")]
    #[diagnostic(code(lsys::render::unbalanced_pop))]
    UnbalancedPop { position: usize },

    #[error(transparent)]
    #[diagnostic(code(lsys::io))]
    Io(#[from] std::io::Error),
}

impl LsysError {
    /// Builds a syntax error pointing at `span` inside `text`.
    pub fn syntax(
        name: &str,
        text: &str,
        message: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Self {
        LsysError::Syntax {
            message: message.into(),
            src: NamedSource::new(name, text.to_string()),
            span: span.into(),
        }
    }

    pub fn malformed_rule(head: Symbol, reason: impl Into<String>) -> Self {
        LsysError::MalformedRule {
            head,
            reason: reason.into(),
        }
    }
}

impl From<serde_yaml::Error> for LsysError {
    fn from(err: serde_yaml::Error) -> Self {
        LsysError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LsysError {
    fn from(err: serde_json::Error) -> Self {
        LsysError::Config {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: LsysError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_symbol_carries_code_and_position() {
        let err = LsysError::InvalidSymbol {
            symbol: '#',
            position: 3,
        };
        assert_eq!(err.to_string(), "invalid symbol '#' at position 3");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("lsys::grammar::invalid_symbol"));
    }

    #[test]
    fn syntax_error_keeps_source_and_label() {
        let err = LsysError::syntax("rules", "F:F,,", "expected rule", (4usize, 1usize));
        assert!(err.source_code().is_some());
        let labels: Vec<_> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 4);
    }

    #[test]
    fn yaml_errors_become_config_errors() {
        let yaml_err = serde_yaml::from_str::<u32>("[not a number").unwrap_err();
        assert!(matches!(LsysError::from(yaml_err), LsysError::Config { .. }));
    }
}
