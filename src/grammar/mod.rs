//! L-system grammars: symbol classification, axiom and production rules.
//!
//! A [`Grammar`] is immutable once built. All consistency checks happen in
//! [`GrammarBuilder::build`], so every later consumer (the string rewriter, the
//! automaton builder, the turtle) can rely on a well-formed alphabet.
//!
//! ```
//! use lsys::grammar::Grammar;
//!
//! let koch = Grammar::builder()
//!     .variables("F")
//!     .constants("+-")
//!     .axiom("F")
//!     .rule('F', "F+F-F-F+F")
//!     .build()
//!     .unwrap();
//! assert_eq!(koch.generate(1), "F+F-F-F+F");
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::errors::{LsysError, LsysResult};

pub mod definition;
pub mod parser;

/// An atomic grammar character.
pub type Symbol = char;

/// Whether a symbol is subject to rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    /// Rewritten by its rule each round (or by itself when it has none).
    Variable,
    /// Passed through unchanged.
    Constant,
}

// =====================
// Core Data Structures
// =====================

/// An L-system: a classified alphabet, an axiom and one rule per variable at most.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    alphabet: BTreeMap<Symbol, Classification>,
    axiom: Vec<Symbol>,
    rules: BTreeMap<Symbol, Vec<Symbol>>,
}

/// Incremental constructor for [`Grammar`]; see the module docs for an example.
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    variables: BTreeSet<Symbol>,
    constants: BTreeSet<Symbol>,
    axiom: Vec<Symbol>,
    rules: Vec<(Symbol, Vec<Symbol>)>,
}

// =====================
// Public API
// =====================

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn axiom(&self) -> &[Symbol] {
        &self.axiom
    }

    pub fn alphabet(&self) -> &BTreeMap<Symbol, Classification> {
        &self.alphabet
    }

    pub fn rules(&self) -> &BTreeMap<Symbol, Vec<Symbol>> {
        &self.rules
    }

    pub fn classify(&self, symbol: Symbol) -> Option<Classification> {
        self.alphabet.get(&symbol).copied()
    }

    pub fn is_variable(&self, symbol: Symbol) -> bool {
        self.classify(symbol) == Some(Classification::Variable)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.alphabet.contains_key(&symbol)
    }

    /// Variables in alphabet order.
    pub fn variables(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols_of(Classification::Variable)
    }

    /// Constants in alphabet order.
    pub fn constants(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols_of(Classification::Constant)
    }

    /// The replacement for one occurrence of `symbol` in a single round.
    ///
    /// Symbols without a rule, variables included, rewrite to themselves.
    pub fn successor<'a>(&'a self, symbol: &'a Symbol) -> &'a [Symbol] {
        self.rules
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or(std::slice::from_ref(symbol))
    }

    /// Checks that every symbol of `input` belongs to the alphabet.
    ///
    /// Positions are counted in characters.
    pub fn check_symbols(&self, input: &str) -> LsysResult<()> {
        match input.chars().enumerate().find(|(_, c)| !self.contains(*c)) {
            Some((position, symbol)) => Err(LsysError::InvalidSymbol { symbol, position }),
            None => Ok(()),
        }
    }

    /// Applies one round of rewriting to an arbitrary string.
    pub fn rewrite_once(&self, input: &str) -> LsysResult<String> {
        self.check_symbols(input)?;
        let symbols: Vec<Symbol> = input.chars().collect();
        Ok(self.rewrite_symbols(&symbols).into_iter().collect())
    }

    /// Rewrites the axiom `rounds` times.
    pub fn generate(&self, rounds: u32) -> String {
        let mut current = self.axiom.clone();
        for _ in 0..rounds {
            current = self.rewrite_symbols(&current);
        }
        current.into_iter().collect()
    }

    /// Number of symbols in `generate(rounds)`, computed without building it.
    ///
    /// Saturates at `u64::MAX` for derivations too long to count.
    pub fn generated_len(&self, rounds: u32) -> u64 {
        let mut lengths: BTreeMap<Symbol, u64> = self.alphabet.keys().map(|s| (*s, 1)).collect();
        for _ in 0..rounds {
            let next = self
                .alphabet
                .keys()
                .map(|s| (*s, self.successors_len(s, &lengths)))
                .collect();
            lengths = next;
        }
        self.axiom
            .iter()
            .fold(0u64, |total, s| total.saturating_add(lengths[s]))
    }

    /// The rules rendered back into `F:F+F,G:GG` form.
    pub fn rules_text(&self) -> String {
        self.rules
            .iter()
            .map(|(head, body)| format!("{}:{}", head, body.iter().collect::<String>()))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn symbols_of(&self, class: Classification) -> impl Iterator<Item = Symbol> + '_ {
        self.alphabet
            .iter()
            .filter(move |(_, c)| **c == class)
            .map(|(s, _)| *s)
    }

    fn successors_len(&self, symbol: &Symbol, lengths: &BTreeMap<Symbol, u64>) -> u64 {
        self.successor(symbol)
            .iter()
            .fold(0u64, |total, s| total.saturating_add(lengths[s]))
    }

    fn rewrite_symbols(&self, input: &[Symbol]) -> Vec<Symbol> {
        let mut output = Vec::with_capacity(input.len());
        for symbol in input {
            output.extend_from_slice(self.successor(symbol));
        }
        output
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axiom: String = self.axiom.iter().collect();
        write!(f, "axiom {} rules {}", axiom, self.rules_text())
    }
}

impl GrammarBuilder {
    pub fn variable(mut self, symbol: Symbol) -> Self {
        self.variables.insert(symbol);
        self
    }

    /// Declares every character of `symbols` as a variable.
    pub fn variables(mut self, symbols: &str) -> Self {
        self.variables.extend(symbols.chars());
        self
    }

    pub fn constant(mut self, symbol: Symbol) -> Self {
        self.constants.insert(symbol);
        self
    }

    /// Declares every character of `symbols` as a constant.
    pub fn constants(mut self, symbols: &str) -> Self {
        self.constants.extend(symbols.chars());
        self
    }

    pub fn axiom(mut self, axiom: &str) -> Self {
        self.axiom = axiom.chars().collect();
        self
    }

    pub fn axiom_symbols(mut self, axiom: Vec<Symbol>) -> Self {
        self.axiom = axiom;
        self
    }

    pub fn rule(mut self, head: Symbol, body: &str) -> Self {
        self.rules.push((head, body.chars().collect()));
        self
    }

    pub fn rule_symbols(mut self, head: Symbol, body: Vec<Symbol>) -> Self {
        self.rules.push((head, body));
        self
    }

    /// Validates the declarations and freezes them into a [`Grammar`].
    ///
    /// # Errors
    ///
    /// - [`LsysError::ConflictingClassification`] when a symbol is both a variable and a constant
    /// - [`LsysError::MalformedRule`] for rules on constants or undeclared heads,
    ///   duplicate rules, and replacements that use undeclared symbols
    /// - [`LsysError::InvalidSymbol`] when the axiom uses an undeclared symbol
    pub fn build(self) -> LsysResult<Grammar> {
        if let Some(symbol) = self.variables.intersection(&self.constants).next() {
            return Err(LsysError::ConflictingClassification { symbol: *symbol });
        }

        let mut alphabet = BTreeMap::new();
        alphabet.extend(self.variables.iter().map(|s| (*s, Classification::Variable)));
        alphabet.extend(self.constants.iter().map(|s| (*s, Classification::Constant)));

        let mut rules = BTreeMap::new();
        for (head, body) in self.rules {
            check_rule(&alphabet, head, &body)?;
            if rules.insert(head, body).is_some() {
                return Err(LsysError::malformed_rule(head, "rule is defined more than once"));
            }
        }

        if let Some((position, symbol)) = self
            .axiom
            .iter()
            .enumerate()
            .find(|(_, s)| !alphabet.contains_key(s))
        {
            return Err(LsysError::InvalidSymbol {
                symbol: *symbol,
                position,
            });
        }

        Ok(Grammar {
            alphabet,
            axiom: self.axiom,
            rules,
        })
    }
}

// =====================
// Internal validators
// =====================

fn check_rule(
    alphabet: &BTreeMap<Symbol, Classification>,
    head: Symbol,
    body: &[Symbol],
) -> LsysResult<()> {
    match alphabet.get(&head) {
        Some(Classification::Variable) => {}
        Some(Classification::Constant) => {
            return Err(LsysError::malformed_rule(head, "constants cannot be rewritten"));
        }
        None => {
            return Err(LsysError::malformed_rule(head, "rule head is not a declared variable"));
        }
    }

    let Some(undeclared) = body.iter().find(|s| !alphabet.contains_key(s)) else {
        return Ok(());
    };
    Err(LsysError::malformed_rule(
        head,
        format!("replacement uses undeclared symbol '{}'", undeclared),
    ))
}
