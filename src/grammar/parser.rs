//! Parser for textual L-system definitions.
//!
//! Converts rule lists such as `F:F[-G][+G],G:F[-R][+R]` and axiom strings into
//! symbol sequences. This parser is purely syntactic: classifying symbols and
//! checking rules against an alphabet is left to
//! [`GrammarBuilder`](crate::grammar::GrammarBuilder).

use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{LsysError, LsysResult};
use crate::grammar::Symbol;

#[derive(Parser)]
#[grammar = "grammar/rules.pest"]
struct DefinitionParser;

/// One `head:replacement` entry of a rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub head: Symbol,
    pub body: Vec<Symbol>,
    /// Byte offset of the entry within the parsed text.
    pub offset: usize,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses a comma-separated rule list. An empty list is allowed.
///
/// A head that appears twice is a [`LsysError::MalformedRule`], the same error
/// [`GrammarBuilder`](crate::grammar::GrammarBuilder) gives for duplicate rules.
pub fn parse_rules(text: &str) -> LsysResult<Vec<RuleEntry>> {
    let mut pairs = DefinitionParser::parse(Rule::rule_list, text)
        .map_err(|e| convert_parse_error(e, "rules", text))?;

    let Some(list) = pairs.next() else {
        return Ok(Vec::new());
    };

    let mut entries: Vec<RuleEntry> = Vec::new();
    for pair in list.into_inner().filter(|p| p.as_rule() == Rule::rule) {
        let entry = build_rule(pair, text)?;
        if entries.iter().any(|e| e.head == entry.head) {
            return Err(LsysError::malformed_rule(
                entry.head,
                "rule is defined more than once",
            ));
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Parses an axiom or a symbol declaration list, ignoring whitespace.
pub fn parse_symbols(name: &str, text: &str) -> LsysResult<Vec<Symbol>> {
    let mut pairs = DefinitionParser::parse(Rule::symbols, text)
        .map_err(|e| convert_parse_error(e, name, text))?;

    let Some(list) = pairs.next() else {
        return Ok(Vec::new());
    };

    list.into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| single_symbol(&p, name, text))
        .collect()
}

// ============================================================================
// BUILDERS
// ============================================================================

fn build_rule(pair: Pair<Rule>, text: &str) -> LsysResult<RuleEntry> {
    let offset = pair.as_span().start();
    let mut inner = pair.into_inner();

    let (Some(head), Some(body)) = (inner.next(), inner.next()) else {
        return Err(LsysError::syntax(
            "rules",
            text,
            "rule needs a head and a replacement",
            (offset, 1usize),
        ));
    };

    let head = single_symbol(&head, "rules", text)?;
    let body = body
        .into_inner()
        .map(|p| single_symbol(&p, "rules", text))
        .collect::<LsysResult<Vec<_>>>()?;

    Ok(RuleEntry { head, body, offset })
}

fn single_symbol(pair: &Pair<Rule>, name: &str, text: &str) -> LsysResult<Symbol> {
    let mut chars = pair.as_str().chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => {
            let span = pair.as_span();
            Err(LsysError::syntax(
                name,
                text,
                "expected a single symbol",
                (span.start(), span.end() - span.start()),
            ))
        }
    }
}

fn convert_parse_error(err: pest::error::Error<Rule>, name: &str, text: &str) -> LsysError {
    let (offset, len) = match err.location {
        InputLocation::Pos(pos) => (pos, 0),
        InputLocation::Span((start, end)) => (start, end.saturating_sub(start)),
    };
    LsysError::syntax(name, text, err.variant.message().into_owned(), (offset, len))
}
