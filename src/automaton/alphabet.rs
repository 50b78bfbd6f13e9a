//! Stack alphabet of leveled symbol occurrences.

use std::collections::BTreeSet;

use crate::automaton::StackSymbol;
use crate::grammar::{Grammar, Symbol};

/// The stack symbols available to an automaton built for a depth bound.
///
/// The pending part is every variable paired with every level in
/// `1..=max_depth`: occurrences that still owe expansion rounds. Level 0 holds
/// ready occurrences (leaves and anchored constants) for every alphabet symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeveledStackAlphabet {
    variables: Vec<Symbol>,
    symbols: BTreeSet<Symbol>,
    max_depth: u32,
}

impl LeveledStackAlphabet {
    pub fn build(grammar: &Grammar, max_depth: u32) -> Self {
        Self {
            variables: grammar.variables().collect(),
            symbols: grammar.alphabet().keys().copied().collect(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Pending occurrences, variable-major with levels ascending.
    pub fn pending(&self) -> impl Iterator<Item = StackSymbol> + '_ {
        self.variables.iter().flat_map(move |symbol| {
            (1..=self.max_depth).map(move |level| StackSymbol::leveled(*symbol, level))
        })
    }

    /// The pending occurrences as a set.
    pub fn to_set(&self) -> BTreeSet<StackSymbol> {
        self.pending().collect()
    }

    /// Number of pending occurrences.
    pub fn len(&self) -> usize {
        self.variables.len() * self.max_depth as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `symbol` can ever appear on a stack of this automaton.
    pub fn contains(&self, symbol: &StackSymbol) -> bool {
        match *symbol {
            StackSymbol::Bottom => true,
            StackSymbol::Leveled { symbol, level: 0 } => self.symbols.contains(&symbol),
            StackSymbol::Leveled { symbol, level } => {
                level <= self.max_depth && self.variables.contains(&symbol)
            }
        }
    }
}
