//! Handles all user-facing output for the CLI.
//!
//! Verdicts, traces, tables and diffs are printed here so every subcommand
//! shares the same colors and layout.

use std::io;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::automaton::{Configuration, TransitionTable, Verdict};

// ============================================================================
// STREAMS
// ============================================================================

/// Colors only when stdout is a terminal.
pub fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice())
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints `ACCEPTED` or `REJECTED: <reason>`.
pub fn print_verdict(out: &mut impl WriteColor, verdict: &Verdict) -> io::Result<()> {
    match verdict {
        Verdict::Accepted => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(out, "ACCEPTED")?;
            out.reset()?;
            writeln!(out)
        }
        Verdict::Rejected(reason) => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "REJECTED")?;
            out.reset()?;
            writeln!(out, ": {}", reason)
        }
    }
}

/// Prints one numbered line per configuration.
pub fn print_trace(out: &mut impl WriteColor, trace: &[Configuration]) -> io::Result<()> {
    for (step, config) in trace.iter().enumerate() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, "{:>5}", step)?;
        out.reset()?;
        writeln!(out, "  {}", config)?;
    }
    Ok(())
}

pub fn print_table(out: &mut impl WriteColor, table: &TransitionTable) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(
        out,
        "{} transitions, depth {}, {:?} constants",
        table.len(),
        table.max_depth(),
        table.constant_matching()
    )?;
    out.reset()?;
    write!(out, "{}", table)
}

/// Prints a character diff from `expected` to `candidate`: removed text in red
/// brackets, added text in green braces.
pub fn print_diff(out: &mut impl WriteColor, expected: &str, candidate: &str) -> io::Result<()> {
    let changeset = Changeset::new(expected, candidate, "");
    writeln!(out, "expected vs. candidate:")?;
    for diff in &changeset.diffs {
        match diff {
            Difference::Same(x) => {
                out.reset()?;
                write!(out, "{}", x)?;
            }
            Difference::Rem(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                write!(out, "[-{}]", x)?;
            }
            Difference::Add(x) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                write!(out, "{{+{}}}", x)?;
            }
        }
    }
    out.reset()?;
    writeln!(out)
}

/// Stands in for a diff whose expected side is too long to print.
pub fn print_diff_skipped(out: &mut impl WriteColor, expected_len: u64) -> io::Result<()> {
    let bound = if expected_len == u64::MAX { "at least " } else { "" };
    writeln!(
        out,
        "expected derivation has {}{} symbols; diff skipped",
        bound, expected_len
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Rejection;
    use termcolor::NoColor;

    fn render(f: impl FnOnce(&mut NoColor<Vec<u8>>) -> io::Result<()>) -> String {
        let mut out = NoColor::new(Vec::new());
        f(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn verdict_lines() {
        assert_eq!(render(|o| print_verdict(o, &Verdict::Accepted)), "ACCEPTED\n");
        let rejected = Verdict::Rejected(Rejection::StepLimitExceeded { limit: 9 });
        assert_eq!(
            render(|o| print_verdict(o, &rejected)),
            "REJECTED: step limit of 9 exceeded\n"
        );
    }

    #[test]
    fn diff_marks_removed_and_added_text() {
        let text = render(|o| print_diff(o, "F+F", "F-F"));
        assert!(text.contains("[-+]"));
        assert!(text.contains("{+-}"));
    }

    #[test]
    fn skipped_diff_names_the_expected_length() {
        assert_eq!(
            render(|o| print_diff_skipped(o, 5000)),
            "expected derivation has 5000 symbols; diff skipped
"
        );
        assert!(render(|o| print_diff_skipped(o, u64::MAX)).contains("at least"));
    }
}
