//! Compiles a grammar and a depth bound into a transition table.
//!
//! Transitions are emitted family by family, and that order is the order the
//! validator scans them in:
//!
//! 1. seed: `q0, ε, $ → q1, <axiom at max_depth> $`
//! 2. expansion: `q1, ε, Xl → q1, <production of X at l-1>` for every pending `Xl`
//! 3. terminal consumption: `q1, c, c0 → q1, ε` (`q1, c, ε → q1, ε` when constants are free)
//! 4. leaf consumption: `q1, X, X0 → q1, ε`
//! 5. accept: `q1, ε, $ → q2, ε`
//!
//! With anchored constants the stack top alone selects the family, so at most
//! one transition is ever eligible. With free constants, expansion and terminal
//! consumption may both be eligible; they touch disjoint resources and commute.
//! The single non-commuting overlap, a constant under the cursor with `$` on
//! top, is settled by terminal consumption being declared before accept.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::automaton::alphabet::LeveledStackAlphabet;
use crate::automaton::{Pop, Read, StackSymbol, State, Transition};
use crate::grammar::{Classification, Grammar, Symbol};

/// How constants of the grammar are matched against input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstantMatching {
    /// Constants are pushed in place as ready symbols and matched off the stack.
    /// The automaton accepts exactly the string generated at the depth bound.
    #[default]
    Anchored,
    /// Constants are never pushed and match wherever they appear in the input.
    /// Only the order of variables is checked.
    Free,
}

// ============================================================================
// TRANSITION TABLE
// ============================================================================

/// An immutable, ordered set of transitions plus the input alphabet it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
    input_alphabet: BTreeSet<Symbol>,
    max_depth: u32,
    constant_matching: ConstantMatching,
    unfold_steps: u64,
}

impl TransitionTable {
    /// Builds the anchored table for `grammar` at `max_depth`.
    pub fn build(grammar: &Grammar, max_depth: u32) -> Self {
        AutomatonBuilder::new(grammar, max_depth).build()
    }

    /// Wraps hand-assembled transitions.
    ///
    /// Without a grammar to measure, the expansion budget is estimated as one
    /// pass over the table per level.
    pub fn from_transitions(
        transitions: Vec<Transition>,
        input_alphabet: BTreeSet<Symbol>,
        max_depth: u32,
    ) -> Self {
        let unfold_steps = (max_depth as u64 + 1).saturating_mul(transitions.len() as u64);
        Self {
            transitions,
            input_alphabet,
            max_depth,
            constant_matching: ConstantMatching::Anchored,
            unfold_steps,
        }
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn constant_matching(&self) -> ConstantMatching {
        self.constant_matching
    }

    pub fn input_alphabet(&self) -> &BTreeSet<Symbol> {
        &self.input_alphabet
    }

    pub fn reads(&self, symbol: Symbol) -> bool {
        self.input_alphabet.contains(&symbol)
    }

    /// Expansion moves needed to unfold the seed completely, saturating.
    pub fn unfold_steps(&self) -> u64 {
        self.unfold_steps
    }

    /// The first transition, in declared order, that may fire.
    pub fn first_eligible(
        &self,
        state: State,
        top: Option<&StackSymbol>,
        next: Option<Symbol>,
    ) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.is_eligible(state, top, next))
    }
}

impl<'a> IntoIterator for &'a TransitionTable {
    type Item = &'a Transition;
    type IntoIter = std::slice::Iter<'a, Transition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, transition) in self.transitions.iter().enumerate() {
            writeln!(f, "{:>4}  {}", i, transition)?;
        }
        Ok(())
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builds a [`TransitionTable`] from a grammar and a depth bound.
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<'g> {
    grammar: &'g Grammar,
    max_depth: u32,
    constant_matching: ConstantMatching,
}

impl<'g> AutomatonBuilder<'g> {
    pub fn new(grammar: &'g Grammar, max_depth: u32) -> Self {
        Self {
            grammar,
            max_depth,
            constant_matching: ConstantMatching::default(),
        }
    }

    pub fn constant_matching(mut self, mode: ConstantMatching) -> Self {
        self.constant_matching = mode;
        self
    }

    pub fn build(&self) -> TransitionTable {
        let alphabet = LeveledStackAlphabet::build(self.grammar, self.max_depth);
        let mut transitions =
            Vec::with_capacity(alphabet.len() + self.grammar.alphabet().len() + 2);

        transitions.push(self.seed());
        transitions.extend(alphabet.pending().filter_map(|pending| self.expansion(pending)));
        transitions.extend(self.grammar.constants().map(|c| self.terminal_consumption(c)));
        transitions.extend(self.grammar.variables().map(leaf_consumption));
        transitions.push(accept());

        debug_assert!(transitions
            .iter()
            .flat_map(|t| t.push.iter())
            .all(|s| alphabet.contains(s)));

        let table = TransitionTable {
            transitions,
            input_alphabet: self.grammar.alphabet().keys().copied().collect(),
            max_depth: self.max_depth,
            constant_matching: self.constant_matching,
            unfold_steps: self.unfold_steps(),
        };
        log::debug!(
            "built {:?} table for depth {}: {} transitions, {} pending stack symbols",
            self.constant_matching,
            self.max_depth,
            table.len(),
            alphabet.len()
        );
        table
    }

    /// The stack form of one occurrence of `symbol` owing `level` rounds, or
    /// `None` for a constant that is not pushed.
    fn occurrence(&self, symbol: Symbol, level: u32) -> Option<StackSymbol> {
        match (self.grammar.classify(symbol)?, self.constant_matching) {
            (Classification::Variable, _) => Some(StackSymbol::leveled(symbol, level)),
            (Classification::Constant, ConstantMatching::Anchored) => {
                Some(StackSymbol::ready(symbol))
            }
            (Classification::Constant, ConstantMatching::Free) => None,
        }
    }

    fn occurrences(&self, symbols: &[Symbol], level: u32) -> Vec<StackSymbol> {
        symbols
            .iter()
            .filter_map(|s| self.occurrence(*s, level))
            .collect()
    }

    fn seed(&self) -> Transition {
        let mut push = self.occurrences(self.grammar.axiom(), self.max_depth);
        push.push(StackSymbol::Bottom);
        Transition {
            from: State::Start,
            to: State::Working,
            read: Read::Epsilon,
            pop: Pop::Top(StackSymbol::Bottom),
            push,
        }
    }

    fn expansion(&self, pending: StackSymbol) -> Option<Transition> {
        let StackSymbol::Leveled { symbol, level } = pending else {
            return None;
        };
        let next_level = level.checked_sub(1)?;
        Some(Transition {
            from: State::Working,
            to: State::Working,
            read: Read::Epsilon,
            pop: Pop::Top(pending),
            push: self.occurrences(self.grammar.successor(&symbol), next_level),
        })
    }

    fn terminal_consumption(&self, constant: Symbol) -> Transition {
        let pop = match self.constant_matching {
            ConstantMatching::Anchored => Pop::Top(StackSymbol::ready(constant)),
            ConstantMatching::Free => Pop::Epsilon,
        };
        Transition {
            from: State::Working,
            to: State::Working,
            read: Read::Symbol(constant),
            pop,
            push: Vec::new(),
        }
    }

    /// Expansion moves in a full unfolding of the seed.
    ///
    /// `owed[X]` at level `l` counts the expansions performed under one
    /// occurrence of `X` owing `l` rounds: itself plus those of every variable
    /// in its production at `l - 1`.
    fn unfold_steps(&self) -> u64 {
        let variables: Vec<Symbol> = self.grammar.variables().collect();
        let mut owed: BTreeMap<Symbol, u64> = variables.iter().map(|v| (*v, 0)).collect();

        for _ in 0..self.max_depth {
            let below = owed.clone();
            for variable in &variables {
                let children = self
                    .grammar
                    .successor(variable)
                    .iter()
                    .filter_map(|s| below.get(s))
                    .fold(0u64, |acc, n| acc.saturating_add(*n));
                owed.insert(*variable, children.saturating_add(1));
            }
        }

        self.grammar
            .axiom()
            .iter()
            .filter_map(|s| owed.get(s))
            .fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

fn leaf_consumption(variable: Symbol) -> Transition {
    Transition {
        from: State::Working,
        to: State::Working,
        read: Read::Symbol(variable),
        pop: Pop::Top(StackSymbol::ready(variable)),
        push: Vec::new(),
    }
}

fn accept() -> Transition {
    Transition {
        from: State::Working,
        to: State::Accept,
        read: Read::Epsilon,
        pop: Pop::Top(StackSymbol::Bottom),
        push: Vec::new(),
    }
}
