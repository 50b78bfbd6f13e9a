//! L-system definition files.
//!
//! A definition bundles a grammar in textual form with the drawing parameters
//! the turtle needs. Files are YAML unless their extension is `.json`:
//!
//! ```yaml
//! axiom: F
//! rules: "F:F[+F][-F]"
//! constants: "+-[]"
//! depth: 4
//! drawing:
//!   angle: 25
//!   distance: 8
//! ```
//!
//! `rules` may also be a map from head to replacement. Symbols that head a rule
//! or are listed in `variables` are variables; every other symbol used by the
//! axiom or the rules is a constant.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{LsysError, LsysResult};
use crate::grammar::parser::{parse_rules, parse_symbols};
use crate::grammar::{Grammar, Symbol};

/// Rewriting rounds used when neither the caller nor the definition gives one.
pub const DEFAULT_DEPTH: u32 = 6;

/// A grammar plus drawing parameters, as stored in a definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LsystemDefinition {
    pub axiom: String,
    pub rules: RuleSet,
    #[serde(default)]
    pub variables: String,
    #[serde(default)]
    pub constants: String,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub drawing: DrawingSettings,
}

/// Rules either as a single `F:FF,G:F` string or as a head → replacement map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSet {
    Text(String),
    Map(BTreeMap<String, String>),
}

/// Turtle parameters. Angles are in degrees; a heading of 90 points up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrawingSettings {
    pub angle: f64,
    pub distance: f64,
    pub width: f64,
    pub heading: f64,
    pub color: String,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            angle: 60.0,
            distance: 10.0,
            width: 1.0,
            heading: 90.0,
            color: "black".to_string(),
        }
    }
}

impl LsystemDefinition {
    /// A definition from command-line style pieces, with default drawing settings.
    pub fn from_parts(axiom: &str, rules: &str, variables: &str, constants: &str) -> Self {
        Self {
            axiom: axiom.to_string(),
            rules: RuleSet::Text(rules.to_string()),
            variables: variables.to_string(),
            constants: constants.to_string(),
            depth: None,
            drawing: DrawingSettings::default(),
        }
    }

    pub fn from_yaml_str(text: &str) -> LsysResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> LsysResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a definition file, choosing JSON or YAML by extension.
    pub fn load(path: &Path) -> LsysResult<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        log::debug!("loading definition from {}", path.display());
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn to_yaml(&self) -> LsysResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The depth to use when the caller does not override it.
    pub fn depth_or_default(&self) -> u32 {
        self.depth.unwrap_or(DEFAULT_DEPTH)
    }

    /// Parses and classifies the textual grammar.
    pub fn grammar(&self) -> LsysResult<Grammar> {
        let axiom = parse_symbols("axiom", &self.axiom)?;
        let rules = self.rule_entries()?;
        let declared_variables = parse_symbols("variables", &self.variables)?;
        let declared_constants = parse_symbols("constants", &self.constants)?;

        let mut variables: BTreeSet<Symbol> = declared_variables.into_iter().collect();
        variables.extend(rules.iter().map(|(head, _)| *head));

        let mut constants: BTreeSet<Symbol> = declared_constants.into_iter().collect();
        let used = axiom.iter().chain(rules.iter().flat_map(|(_, body)| body.iter()));
        constants.extend(used.filter(|s| !variables.contains(s)).copied());

        let mut builder = Grammar::builder().axiom_symbols(axiom);
        for symbol in variables {
            builder = builder.variable(symbol);
        }
        for symbol in constants {
            builder = builder.constant(symbol);
        }
        for (head, body) in rules {
            builder = builder.rule_symbols(head, body);
        }
        builder.build()
    }

    fn rule_entries(&self) -> LsysResult<Vec<(Symbol, Vec<Symbol>)>> {
        match &self.rules {
            RuleSet::Text(text) => Ok(parse_rules(text)?
                .into_iter()
                .map(|entry| (entry.head, entry.body))
                .collect()),
            RuleSet::Map(map) => map
                .iter()
                .map(|(head, body)| {
                    let head = map_key_symbol(head)?;
                    Ok((head, parse_symbols("rules", body)?))
                })
                .collect(),
        }
    }
}

fn map_key_symbol(key: &str) -> LsysResult<Symbol> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(LsysError::Config {
            message: format!("rule head '{}' must be exactly one symbol", key),
        }),
    }
}
