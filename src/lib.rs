//! # lsys
//!
//! Checks whether a string is a bounded-depth derivation of an L-system by
//! compiling the grammar into a pushdown automaton and running the string
//! through it. Also generates derivations and draws them as SVG.
//!
//! Modules, leaves first:
//!
//! - [`grammar`]: alphabets, rules, rewriting and definition files
//! - [`automaton`]: automaton construction, validation and depth search
//! - [`render`]: turtle interpretation and SVG output
//! - [`cli`]: the `lsys` binary

pub mod automaton;
pub mod cli;
pub mod errors;
pub mod grammar;
pub mod render;

pub use crate::automaton::{accepts, validate, TransitionTable, Verdict};
pub use crate::errors::{LsysError, LsysResult};
pub use crate::grammar::{Classification, Grammar, Symbol};
