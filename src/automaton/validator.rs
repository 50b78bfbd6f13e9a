//! Drives a transition table over a candidate string.
//!
//! The simulation is deterministic: at every step the first eligible
//! transition in declared order fires, and nothing is ever retried. "No
//! eligible transition" is an ordinary outcome that rejects the candidate.

use std::fmt;

use crate::automaton::builder::TransitionTable;
use crate::automaton::{StackSymbol, State};
use crate::grammar::Symbol;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// The outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The candidate contains a symbol outside the grammar alphabet.
    InvalidSymbol { symbol: Symbol, position: usize },
    /// No transition could fire from this configuration.
    NoTransition {
        state: State,
        cursor: usize,
        top: Option<StackSymbol>,
    },
    /// The automaton reached its accepting state before consuming everything.
    Incomplete { cursor: usize, stack_len: usize },
    /// The run took more steps than a well-formed table can need.
    StepLimitExceeded { limit: u64 },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::Rejected(reason) => write!(f, "rejected: {}", reason),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidSymbol { symbol, position } => {
                write!(f, "symbol '{}' at position {} is not in the alphabet", symbol, position)
            }
            Rejection::NoTransition { state, cursor, top } => {
                let top = top.map_or_else(|| "empty".to_string(), |s| s.to_string());
                write!(
                    f,
                    "no transition from {} at position {} with stack top {}",
                    state, cursor, top
                )
            }
            Rejection::Incomplete { cursor, stack_len } => write!(
                f,
                "derivation finished at position {} with {} stack symbols left",
                cursor, stack_len
            ),
            Rejection::StepLimitExceeded { limit } => {
                write!(f, "step limit of {} exceeded", limit)
            }
        }
    }
}

/// Instantaneous description of the automaton during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub state: State,
    pub cursor: usize,
    /// Bottom first; the last element is the top.
    pub stack: Vec<StackSymbol>,
}

impl Configuration {
    fn initial() -> Self {
        Self {
            state: State::Start,
            cursor: 0,
            stack: vec![StackSymbol::Bottom],
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack: Vec<String> = self.stack.iter().rev().map(|s| s.to_string()).collect();
        write!(f, "({}, {}, [{}])", self.state, self.cursor, stack.join(" "))
    }
}

/// A verdict with run statistics and, when requested, the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub verdict: Verdict,
    pub steps: u64,
    /// Every configuration visited, the initial one included.
    pub trace: Option<Vec<Configuration>>,
}

// ============================================================================
// VALIDATOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// Overrides the step cap derived from the table and the candidate.
    pub step_limit: Option<u64>,
    pub record_trace: bool,
}

/// Runs candidates against one shared table.
#[derive(Debug, Clone)]
pub struct PdaValidator<'t> {
    table: &'t TransitionTable,
    config: ValidatorConfig,
}

impl<'t> PdaValidator<'t> {
    pub fn new(table: &'t TransitionTable) -> Self {
        Self::with_config(table, ValidatorConfig::default())
    }

    pub fn with_config(table: &'t TransitionTable, config: ValidatorConfig) -> Self {
        Self { table, config }
    }

    pub fn validate(&self, candidate: &str) -> Verdict {
        self.run(candidate).verdict
    }

    /// The largest number of moves an accepting run on `len` symbols can take:
    /// seed, every expansion of the unfolding, one move per symbol, accept.
    pub fn step_limit(&self, len: usize) -> u64 {
        self.config.step_limit.unwrap_or_else(|| {
            (len as u64)
                .saturating_add(self.table.unfold_steps())
                .saturating_add(2)
        })
    }

    pub fn run(&self, candidate: &str) -> Run {
        let input: Vec<Symbol> = candidate.chars().collect();

        if let Some((position, symbol)) = input
            .iter()
            .enumerate()
            .find(|(_, s)| !self.table.reads(**s))
        {
            let verdict = Verdict::Rejected(Rejection::InvalidSymbol {
                symbol: *symbol,
                position,
            });
            log::debug!("{}", verdict);
            return Run {
                verdict,
                steps: 0,
                trace: None,
            };
        }

        let limit = self.step_limit(input.len());
        let mut config = Configuration::initial();
        let mut trace = self.config.record_trace.then(|| vec![config.clone()]);
        let mut steps = 0u64;

        let verdict = loop {
            if config.state == State::Accept {
                break if config.cursor == input.len() && config.stack.is_empty() {
                    Verdict::Accepted
                } else {
                    Verdict::Rejected(Rejection::Incomplete {
                        cursor: config.cursor,
                        stack_len: config.stack.len(),
                    })
                };
            }
            if steps >= limit {
                break Verdict::Rejected(Rejection::StepLimitExceeded { limit });
            }

            let next = input.get(config.cursor).copied();
            let Some(transition) = self
                .table
                .first_eligible(config.state, config.stack.last(), next)
            else {
                break Verdict::Rejected(Rejection::NoTransition {
                    state: config.state,
                    cursor: config.cursor,
                    top: config.stack.last().copied(),
                });
            };

            log::trace!("{} via {}", config, transition);
            transition.apply(&mut config.stack);
            if transition.consumes_input() {
                config.cursor += 1;
            }
            config.state = transition.to;
            steps += 1;

            if let Some(trace) = trace.as_mut() {
                trace.push(config.clone());
            }
        };

        log::debug!("{} symbols, {} steps: {}", input.len(), steps, verdict);
        Run {
            verdict,
            steps,
            trace,
        }
    }
}

/// Validates `candidate` against `table` with default settings.
pub fn validate(table: &TransitionTable, candidate: &str) -> Verdict {
    PdaValidator::new(table).validate(candidate)
}

pub fn accepts(table: &TransitionTable, candidate: &str) -> bool {
    validate(table, candidate).is_accepted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::builder::{AutomatonBuilder, ConstantMatching};
    use crate::automaton::{Pop, Read, Transition};
    use crate::grammar::Grammar;

    fn koch() -> Grammar {
        Grammar::builder()
            .variables("F")
            .constants("+-")
            .axiom("F")
            .rule('F', "F+F-F-F+F")
            .build()
            .unwrap()
    }

    #[test]
    fn accepts_depth_one_string() {
        let table = TransitionTable::build(&koch(), 1);
        assert_eq!(validate(&table, "F+F-F-F+F"), Verdict::Accepted);
    }

    #[test]
    fn depth_zero_accepts_only_the_axiom() {
        let table = TransitionTable::build(&koch(), 0);
        assert!(accepts(&table, "F"));
        assert!(!accepts(&table, "F+F-F-F+F"));
        assert!(!accepts(&table, ""));
    }

    #[test]
    fn unknown_symbol_is_reported_before_simulation() {
        let table = TransitionTable::build(&koch(), 1);
        let run = PdaValidator::new(&table).run("F+F*F");
        assert_eq!(
            run.verdict,
            Verdict::Rejected(Rejection::InvalidSymbol {
                symbol: '*',
                position: 3
            })
        );
        assert_eq!(run.steps, 0);
    }

    #[test]
    fn leftover_input_is_incomplete() {
        let table = TransitionTable::build(&koch(), 0);
        let verdict = validate(&table, "FF");
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::Incomplete {
                cursor: 1,
                stack_len: 0
            })
        );
    }

    #[test]
    fn truncated_input_has_no_transition() {
        let table = TransitionTable::build(&koch(), 1);
        let verdict = validate(&table, "F+F-F");
        assert!(matches!(
            verdict,
            Verdict::Rejected(Rejection::NoTransition {
                state: State::Working,
                cursor: 5,
                ..
            })
        ));
    }

    #[test]
    fn accepting_run_uses_exactly_the_default_limit() {
        let table = TransitionTable::build(&koch(), 2);
        let candidate = koch().generate(2);
        let validator = PdaValidator::new(&table);
        let run = validator.run(&candidate);
        assert!(run.verdict.is_accepted());
        assert_eq!(run.steps, validator.step_limit(candidate.chars().count()));
    }

    #[test]
    fn explicit_step_limit_is_reported() {
        let table = TransitionTable::build(&koch(), 2);
        let config = ValidatorConfig {
            step_limit: Some(3),
            record_trace: false,
        };
        let verdict = PdaValidator::with_config(&table, config).validate(&koch().generate(2));
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::StepLimitExceeded { limit: 3 })
        );
    }

    #[test]
    fn looping_table_hits_the_cap() {
        let looping = Transition {
            from: State::Start,
            to: State::Start,
            read: Read::Epsilon,
            pop: Pop::Epsilon,
            push: vec![],
        };
        let table = TransitionTable::from_transitions(vec![looping], ['F'].into(), 2);
        let verdict = validate(&table, "F");
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::StepLimitExceeded { limit: 6 })
        );
    }

    #[test]
    fn trace_records_every_configuration() {
        let table = TransitionTable::build(&koch(), 1);
        let config = ValidatorConfig {
            step_limit: None,
            record_trace: true,
        };
        let run = PdaValidator::with_config(&table, config).run("F+F-F-F+F");
        let trace = run.trace.unwrap();
        assert_eq!(trace.len() as u64, run.steps + 1);
        assert_eq!(trace[0].to_string(), "(q0, 0, [$])");
        assert_eq!(trace[1].to_string(), "(q1, 0, [F1 $])");
        let last = trace.last().unwrap();
        assert_eq!(last.state, State::Accept);
        assert!(last.stack.is_empty());
    }

    #[test]
    fn free_constants_ignore_their_position() {
        let table = AutomatonBuilder::new(&koch(), 1)
            .constant_matching(ConstantMatching::Free)
            .build();
        assert!(accepts(&table, "F+F-F-F+F"));
        assert!(accepts(&table, "FFFFF++--"));
        assert!(!accepts(&table, "FFFF"));
    }
}
