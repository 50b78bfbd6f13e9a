//! The lsys Command-Line Interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! library: loading a definition, building automata and reporting results.
//! Exit codes: 0 success or accepted, 1 rejected, 2 error.

use std::io::{self, Read};
use std::{fs, process};

use clap::Parser;

use crate::automaton::{
    AutomatonBuilder, ConstantMatching, DepthSearch, PdaValidator, Rejection, ValidatorConfig,
    Verdict,
};
use crate::cli::args::{CandidateArgs, Command, DefinitionArgs, LsysArgs};
use crate::errors::{print_error, LsysResult};
use crate::grammar::definition::LsystemDefinition;
use crate::render::{Svg, Turtle};

pub mod args;
pub mod output;

/// Longest expected derivation `validate` will diff against a candidate.
const DIFF_SYMBOL_LIMIT: u64 = 4096;

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Rejected,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Rejected => 1,
        }
    }
}

/// The main entry point for the CLI.
pub fn run() {
    let args = LsysArgs::parse();
    init_logging(args.verbose);

    let code = match dispatch(args.command) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            print_error(e);
            2
        }
    };
    process::exit(code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Runs one subcommand.
pub fn dispatch(command: Command) -> LsysResult<Outcome> {
    match command {
        Command::Generate { definition, depth } => handle_generate(&definition, depth),
        Command::Validate {
            definition,
            depth,
            candidate,
            trace,
            free_constants,
            step_limit,
        } => {
            let config = ValidatorConfig {
                step_limit,
                record_trace: trace,
            };
            handle_validate(&definition, depth, &candidate, config, matching(free_constants))
        }
        Command::Depth {
            definition,
            candidate,
            limit,
            free_constants,
        } => handle_depth(&definition, &candidate, limit, matching(free_constants)),
        Command::Table {
            definition,
            depth,
            free_constants,
        } => handle_table(&definition, depth, matching(free_constants)),
        Command::Draw {
            definition,
            depth,
            output,
            angle,
            distance,
            width,
            candidate,
            validate,
        } => {
            let mut def = load_definition(&definition)?;
            if let Some(angle) = angle {
                def.drawing.angle = angle;
            }
            if let Some(distance) = distance {
                def.drawing.distance = distance;
            }
            if let Some(width) = width {
                def.drawing.width = width;
            }
            handle_draw(&def, depth, candidate, validate, &output)
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

fn handle_generate(definition: &DefinitionArgs, depth: Option<u32>) -> LsysResult<Outcome> {
    let def = load_definition(definition)?;
    let grammar = def.grammar()?;
    let depth = depth.unwrap_or_else(|| def.depth_or_default());
    println!("{}", grammar.generate(depth));
    Ok(Outcome::Success)
}

fn handle_validate(
    definition: &DefinitionArgs,
    depth: Option<u32>,
    candidate: &CandidateArgs,
    config: ValidatorConfig,
    mode: ConstantMatching,
) -> LsysResult<Outcome> {
    let def = load_definition(definition)?;
    let grammar = def.grammar()?;
    let depth = depth.unwrap_or_else(|| def.depth_or_default());
    let candidate = read_candidate(candidate)?;

    let table = AutomatonBuilder::new(&grammar, depth)
        .constant_matching(mode)
        .build();
    let run = PdaValidator::with_config(&table, config).run(&candidate);

    let mut out = output::stdout();
    if let Some(trace) = &run.trace {
        output::print_trace(&mut out, trace)?;
    }
    output::print_verdict(&mut out, &run.verdict)?;

    match &run.verdict {
        Verdict::Accepted => Ok(Outcome::Success),
        Verdict::Rejected(reason) => {
            let well_formed = !matches!(reason, Rejection::InvalidSymbol { .. });
            if well_formed && mode == ConstantMatching::Anchored {
                let expected_len = grammar.generated_len(depth);
                let candidate_len = candidate.chars().count() as u64;
                if expected_len <= diff_limit(candidate_len) {
                    output::print_diff(&mut out, &grammar.generate(depth), &candidate)?;
                } else {
                    output::print_diff_skipped(&mut out, expected_len)?;
                }
            }
            Ok(Outcome::Rejected)
        }
    }
}

fn handle_depth(
    definition: &DefinitionArgs,
    candidate: &CandidateArgs,
    limit: u32,
    mode: ConstantMatching,
) -> LsysResult<Outcome> {
    let grammar = load_definition(definition)?.grammar()?;
    let candidate = read_candidate(candidate)?;

    let found = DepthSearch::new(&grammar)
        .constant_matching(mode)
        .find(&candidate, limit)?;
    match found {
        Some(depth) => {
            println!("{}", depth);
            Ok(Outcome::Success)
        }
        None => {
            println!("not derived within depth {}", limit);
            Ok(Outcome::Rejected)
        }
    }
}

fn handle_table(
    definition: &DefinitionArgs,
    depth: Option<u32>,
    mode: ConstantMatching,
) -> LsysResult<Outcome> {
    let def = load_definition(definition)?;
    let grammar = def.grammar()?;
    let depth = depth.unwrap_or_else(|| def.depth_or_default());
    let table = AutomatonBuilder::new(&grammar, depth)
        .constant_matching(mode)
        .build();
    output::print_table(&mut output::stdout(), &table)?;
    Ok(Outcome::Success)
}

fn handle_draw(
    def: &LsystemDefinition,
    depth: Option<u32>,
    candidate: Option<String>,
    validate: bool,
    path: &std::path::Path,
) -> LsysResult<Outcome> {
    let grammar = def.grammar()?;
    let depth = depth.unwrap_or_else(|| def.depth_or_default());

    let text = match candidate {
        Some(candidate) if validate => {
            let table = AutomatonBuilder::new(&grammar, depth).build();
            let verdict = PdaValidator::new(&table).validate(&candidate);
            if !verdict.is_accepted() {
                output::print_verdict(&mut output::stdout(), &verdict)?;
                return Ok(Outcome::Rejected);
            }
            candidate
        }
        Some(candidate) => candidate,
        None => grammar.generate(depth),
    };

    let drawing = Turtle::new(def.drawing.clone()).draw(&text)?;
    Svg(&drawing).write_to(path)?;
    println!(
        "wrote {} segments to {}",
        drawing.segments.len(),
        path.display()
    );
    Ok(Outcome::Success)
}

/// The expected side of a diff may be a few times longer than the candidate,
/// up to a fixed ceiling.
fn diff_limit(candidate_len: u64) -> u64 {
    candidate_len.saturating_mul(4).clamp(256, DIFF_SYMBOL_LIMIT)
}

// ============================================================================
// INPUT HELPERS
// ============================================================================

fn matching(free_constants: bool) -> ConstantMatching {
    if free_constants {
        ConstantMatching::Free
    } else {
        ConstantMatching::Anchored
    }
}

fn load_definition(args: &DefinitionArgs) -> LsysResult<LsystemDefinition> {
    match &args.file {
        Some(path) => LsystemDefinition::load(path),
        None => Ok(LsystemDefinition::from_parts(
            &args.axiom,
            &args.rules,
            &args.variables,
            &args.constants,
        )),
    }
}

/// The candidate from the flag, a file or stdin. Surrounding whitespace is
/// dropped from file and stdin input.
fn read_candidate(args: &CandidateArgs) -> LsysResult<String> {
    if let Some(candidate) = &args.candidate {
        return Ok(candidate.clone());
    }
    let text = match &args.candidate_file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    Ok(text.trim().to_string())
}
