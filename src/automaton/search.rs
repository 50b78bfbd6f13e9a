//! Finds the rewriting depth at which a grammar derives a candidate.

use std::collections::BTreeMap;

use crate::automaton::builder::{AutomatonBuilder, ConstantMatching, TransitionTable};
use crate::automaton::validator::PdaValidator;
use crate::errors::LsysResult;
use crate::grammar::Grammar;

/// Tries depths in increasing order, building and caching one table per depth.
#[derive(Debug, Clone)]
pub struct DepthSearch<'g> {
    grammar: &'g Grammar,
    constant_matching: ConstantMatching,
    tables: BTreeMap<u32, TransitionTable>,
}

impl<'g> DepthSearch<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            constant_matching: ConstantMatching::default(),
            tables: BTreeMap::new(),
        }
    }

    pub fn constant_matching(mut self, mode: ConstantMatching) -> Self {
        if mode != self.constant_matching {
            self.tables.clear();
        }
        self.constant_matching = mode;
        self
    }

    /// The table for `depth`, built on first use.
    pub fn table(&mut self, depth: u32) -> &TransitionTable {
        let grammar = self.grammar;
        let mode = self.constant_matching;
        self.tables.entry(depth).or_insert_with(|| {
            AutomatonBuilder::new(grammar, depth)
                .constant_matching(mode)
                .build()
        })
    }

    /// The smallest depth in `0..=limit` whose automaton accepts `candidate`.
    ///
    /// # Errors
    ///
    /// [`LsysError::InvalidSymbol`](crate::errors::LsysError::InvalidSymbol) when
    /// the candidate uses a symbol outside the alphabet, since no depth could
    /// accept it.
    pub fn find(&mut self, candidate: &str, limit: u32) -> LsysResult<Option<u32>> {
        Ok(self.accepting_depths(candidate, limit)?.into_iter().next())
    }

    /// Every depth in `0..=limit` whose automaton accepts `candidate`.
    ///
    /// Free constant matching can accept one candidate at several depths when
    /// the grammar has rules that do not grow the string.
    pub fn accepting_depths(&mut self, candidate: &str, limit: u32) -> LsysResult<Vec<u32>> {
        self.grammar.check_symbols(candidate)?;

        let mut found = Vec::new();
        for depth in 0..=limit {
            let accepted = PdaValidator::new(self.table(depth))
                .validate(candidate)
                .is_accepted();
            log::trace!("depth {}: {}", depth, if accepted { "accepted" } else { "rejected" });
            if accepted {
                found.push(depth);
                if self.constant_matching == ConstantMatching::Anchored {
                    break;
                }
            }
        }
        log::debug!("accepting depths up to {}: {:?}", limit, found);
        Ok(found)
    }
}

/// The smallest depth up to `limit` at which `grammar` derives `candidate`.
pub fn find_derivation_depth(
    grammar: &Grammar,
    candidate: &str,
    limit: u32,
) -> LsysResult<Option<u32>> {
    DepthSearch::new(grammar).find(candidate, limit)
}
