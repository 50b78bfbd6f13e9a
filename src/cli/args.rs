//! Command-line arguments and subcommands for the `lsys` binary.
//!
//! Uses `clap` derive. Every subcommand takes the same grammar definition
//! flags through [`DefinitionArgs`].

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "lsys",
    version,
    about = "Generate, validate and draw L-system derivations."
)]
pub struct LsysArgs {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the string derived after a number of rewriting rounds.
    Generate {
        #[command(flatten)]
        definition: DefinitionArgs,
        /// Rewriting rounds; defaults to the definition's depth.
        #[arg(short, long)]
        depth: Option<u32>,
    },
    /// Check a candidate string against the automaton for a depth.
    Validate {
        #[command(flatten)]
        definition: DefinitionArgs,
        #[arg(short, long)]
        depth: Option<u32>,
        #[command(flatten)]
        candidate: CandidateArgs,
        /// Print every configuration the automaton visits.
        #[arg(long)]
        trace: bool,
        /// Match constants anywhere instead of at their derived position.
        #[arg(long)]
        free_constants: bool,
        /// Override the step cap.
        #[arg(long)]
        step_limit: Option<u64>,
    },
    /// Find the smallest depth at which a candidate is derived.
    Depth {
        #[command(flatten)]
        definition: DefinitionArgs,
        #[command(flatten)]
        candidate: CandidateArgs,
        /// Largest depth to try.
        #[arg(short, long, default_value_t = 8)]
        limit: u32,
        #[arg(long)]
        free_constants: bool,
    },
    /// Print the transition table built for a depth.
    Table {
        #[command(flatten)]
        definition: DefinitionArgs,
        #[arg(short, long)]
        depth: Option<u32>,
        #[arg(long)]
        free_constants: bool,
    },
    /// Draw a derivation as SVG.
    Draw {
        #[command(flatten)]
        definition: DefinitionArgs,
        #[arg(short, long)]
        depth: Option<u32>,
        /// Where to write the SVG document.
        #[arg(short, long)]
        output: PathBuf,
        /// Turn angle in degrees.
        #[arg(long)]
        angle: Option<f64>,
        /// Segment length.
        #[arg(long)]
        distance: Option<f64>,
        /// Stroke width.
        #[arg(long)]
        width: Option<f64>,
        /// Draw this string instead of the generated one.
        #[arg(long)]
        candidate: Option<String>,
        /// Refuse to draw a candidate the automaton rejects.
        #[arg(long, requires = "candidate")]
        validate: bool,
    },
}

/// Where the grammar comes from: a definition file or inline flags.
#[derive(Debug, Args)]
pub struct DefinitionArgs {
    /// YAML or JSON definition file.
    #[arg(short, long, conflicts_with_all = ["axiom", "rules", "variables", "constants"])]
    pub file: Option<PathBuf>,
    #[arg(long, default_value = "F")]
    pub axiom: String,
    /// Rules as `F:F[+F][-F],G:GG`.
    #[arg(long, default_value = "F:F[+F][-F]")]
    pub rules: String,
    /// Extra variables without rules.
    #[arg(long, default_value = "")]
    pub variables: String,
    #[arg(long, default_value = "")]
    pub constants: String,
}

#[derive(Debug, Args)]
pub struct CandidateArgs {
    /// The string to check; read from stdin when neither flag is given.
    #[arg(short, long)]
    pub candidate: Option<String>,
    #[arg(long, conflicts_with = "candidate")]
    pub candidate_file: Option<PathBuf>,
}
