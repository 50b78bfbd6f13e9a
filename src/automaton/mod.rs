//! Pushdown automaton for bounded-depth L-system derivations.
//!
//! ## Model
//!
//! A pending occurrence of a variable sits on the stack tagged with the number
//! of rewriting rounds it still owes. Expanding it replaces it with its
//! production, one level lower; an occurrence at level 0 is fully expanded and
//! can only be matched against input. Keeping the level inside the stack symbol
//! keeps the automaton at three states whatever the depth bound.
//!
//! ## Pipeline
//!
//! [`Grammar`](crate::grammar::Grammar) + depth → [`AutomatonBuilder`] →
//! [`TransitionTable`] → [`PdaValidator`] → [`Verdict`].
//!
//! Tables are immutable and can be shared by any number of validation runs;
//! each run owns its own [`Configuration`].

use std::fmt;

use crate::grammar::Symbol;

pub mod alphabet;
pub mod builder;
pub mod search;
pub mod validator;

pub use alphabet::LeveledStackAlphabet;
pub use builder::{AutomatonBuilder, ConstantMatching, TransitionTable};
pub use search::{find_derivation_depth, DepthSearch};
pub use validator::{
    accepts, validate, Configuration, PdaValidator, Rejection, Run, ValidatorConfig, Verdict,
};

// ============================================================================
// STATES AND STACK SYMBOLS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    Working,
    Accept,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Start => write!(f, "q0"),
            State::Working => write!(f, "q1"),
            State::Accept => write!(f, "q2"),
        }
    }
}

/// A stack entry: the bottom marker or a symbol occurrence tagged with the
/// rounds it still owes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StackSymbol {
    /// The `$` marker delimiting the base of the stack.
    Bottom,
    Leveled { symbol: Symbol, level: u32 },
}

impl StackSymbol {
    pub fn leveled(symbol: Symbol, level: u32) -> Self {
        StackSymbol::Leveled { symbol, level }
    }

    /// An occurrence that owes no further rounds.
    pub fn ready(symbol: Symbol) -> Self {
        StackSymbol::Leveled { symbol, level: 0 }
    }

    pub fn level(&self) -> Option<u32> {
        match self {
            StackSymbol::Bottom => None,
            StackSymbol::Leveled { level, .. } => Some(*level),
        }
    }
}

impl fmt::Display for StackSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackSymbol::Bottom => write!(f, "$"),
            StackSymbol::Leveled { symbol, level } => write!(f, "{}{}", symbol, level),
        }
    }
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Input requirement of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Read {
    Epsilon,
    Symbol(Symbol),
}

/// Stack-top requirement of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pop {
    /// No requirement; nothing is popped.
    Epsilon,
    /// The top must equal this symbol, which is then popped.
    Top(StackSymbol),
}

/// One PDA move. `push` is listed top-first: its first element ends on top.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: State,
    pub to: State,
    pub read: Read,
    pub pop: Pop,
    pub push: Vec<StackSymbol>,
}

impl Transition {
    /// Whether this transition may fire from `state` with `top` on the stack and
    /// `next` under the cursor (`None` past the end of input).
    ///
    /// An epsilon read matches regardless of the cursor.
    pub fn is_eligible(
        &self,
        state: State,
        top: Option<&StackSymbol>,
        next: Option<Symbol>,
    ) -> bool {
        if self.from != state {
            return false;
        }
        let pop_ok = match &self.pop {
            Pop::Epsilon => true,
            Pop::Top(required) => top == Some(required),
        };
        let read_ok = match self.read {
            Read::Epsilon => true,
            Read::Symbol(symbol) => next == Some(symbol),
        };
        pop_ok && read_ok
    }

    pub fn consumes_input(&self) -> bool {
        matches!(self.read, Read::Symbol(_))
    }

    /// Applies the stack effect. The caller has checked eligibility, so a
    /// required top is present and equal.
    pub fn apply(&self, stack: &mut Vec<StackSymbol>) {
        if let Pop::Top(required) = &self.pop {
            let popped = stack.pop();
            debug_assert_eq!(popped.as_ref(), Some(required));
        }
        stack.extend(self.push.iter().rev().copied());
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let read = match self.read {
            Read::Epsilon => "ε".to_string(),
            Read::Symbol(s) => s.to_string(),
        };
        let pop = match self.pop {
            Pop::Epsilon => "ε".to_string(),
            Pop::Top(s) => s.to_string(),
        };
        let push = if self.push.is_empty() {
            "ε".to_string()
        } else {
            self.push
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(f, "{}, {}, {} → {}, {}", self.from, read, pop, self.to, push)
    }
}
