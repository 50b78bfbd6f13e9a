//! Property-based tests for the derivation checker.
//!
//! Grammars are drawn over a fixed alphabet of three variables and four
//! constants, with random axioms and optional, possibly erasing, rules.
//! Properties about deeper derivations use grammars that always grow.

use lsys::automaton::{
    find_derivation_depth, validate, AutomatonBuilder, ConstantMatching, PdaValidator, Rejection,
    TransitionTable, Verdict,
};
use lsys::Grammar;
use proptest::prelude::*;
use proptest::sample::Index;

const VARIABLES: [char; 3] = ['A', 'B', 'F'];
const ALPHABET: [char; 7] = ['A', 'B', 'F', '+', '-', '[', ']'];

fn symbol_strategy() -> impl Strategy<Value = char> {
    prop::sample::select(ALPHABET.to_vec())
}

/// Random grammars; each variable may or may not have a rule.
fn grammar_strategy() -> impl Strategy<Value = Grammar> {
    (
        prop::collection::vec(symbol_strategy(), 0..4),
        prop::collection::vec(
            prop::option::of(prop::collection::vec(symbol_strategy(), 0..5)),
            VARIABLES.len(),
        ),
    )
        .prop_map(|(axiom, bodies)| {
            let mut builder = Grammar::builder()
                .variables("ABF")
                .constants("+-[]")
                .axiom_symbols(axiom);
            for (head, body) in VARIABLES.iter().zip(bodies) {
                if let Some(body) = body {
                    builder = builder.rule_symbols(*head, body);
                }
            }
            builder.build().expect("generated grammars are well-formed")
        })
}

/// Grammars whose derivations get longer every round: `F` sits in the axiom
/// and its rule keeps `F` while adding at least one constant.
fn growing_grammar_strategy() -> impl Strategy<Value = Grammar> {
    let constant = prop::sample::select(vec!['+', '-', '[', ']']);
    (
        prop::collection::vec(symbol_strategy(), 0..3),
        prop::collection::vec(symbol_strategy(), 0..3),
        prop::collection::vec(constant, 1..3),
        prop::collection::vec(
            prop::option::of(prop::collection::vec(symbol_strategy(), 0..5)),
            2,
        ),
    )
        .prop_map(|(before, after, added, bodies)| {
            let axiom: Vec<char> = before.into_iter().chain(['F']).chain(after).collect();
            let growth: Vec<char> = ['F'].into_iter().chain(added).collect();
            let mut builder = Grammar::builder()
                .variables("ABF")
                .constants("+-[]")
                .axiom_symbols(axiom)
                .rule_symbols('F', growth);
            for (head, body) in ['A', 'B'].into_iter().zip(bodies) {
                if let Some(body) = body {
                    builder = builder.rule_symbols(head, body);
                }
            }
            builder.build().expect("generated grammars are well-formed")
        })
}

fn replace_at(text: &str, position: usize, symbol: char) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| if i == position { symbol } else { c })
        .collect()
}

proptest! {
    #[test]
    fn generated_strings_are_accepted(grammar in grammar_strategy(), depth in 0u32..4) {
        let generated = grammar.generate(depth);
        for mode in [ConstantMatching::Anchored, ConstantMatching::Free] {
            let table = AutomatonBuilder::new(&grammar, depth).constant_matching(mode).build();
            prop_assert_eq!(validate(&table, &generated), Verdict::Accepted, "{:?}", mode);
        }
    }

    #[test]
    fn accepting_runs_stay_within_the_step_cap(grammar in grammar_strategy(), depth in 0u32..4) {
        let generated = grammar.generate(depth);
        let table = TransitionTable::build(&grammar, depth);
        let validator = PdaValidator::new(&table);
        let run = validator.run(&generated);
        prop_assert!(run.verdict.is_accepted());
        prop_assert_eq!(run.steps, validator.step_limit(generated.chars().count()));
    }

    #[test]
    fn foreign_symbol_is_rejected_by_name(
        grammar in grammar_strategy(),
        depth in 0u32..4,
        index in any::<Index>(),
    ) {
        let generated = grammar.generate(depth);
        prop_assume!(!generated.is_empty());
        let position = index.index(generated.chars().count());
        let mutated = replace_at(&generated, position, '#');

        let table = TransitionTable::build(&grammar, depth);
        prop_assert_eq!(
            validate(&table, &mutated),
            Verdict::Rejected(Rejection::InvalidSymbol { symbol: '#', position })
        );
    }

    #[test]
    fn anchored_tables_reject_any_other_string(
        grammar in grammar_strategy(),
        depth in 0u32..4,
        index in any::<Index>(),
        replacement in symbol_strategy(),
    ) {
        let generated = grammar.generate(depth);
        prop_assume!(!generated.is_empty());
        let position = index.index(generated.chars().count());
        let mutated = replace_at(&generated, position, replacement);
        prop_assume!(mutated != generated);

        let table = TransitionTable::build(&grammar, depth);
        prop_assert!(!validate(&table, &mutated).is_accepted());
    }

    #[test]
    fn deeper_derivations_are_rejected(grammar in growing_grammar_strategy(), depth in 0u32..3) {
        let deeper = grammar.generate(depth + 1);
        prop_assert!(deeper.len() > grammar.generate(depth).len());

        let table = TransitionTable::build(&grammar, depth);
        prop_assert!(!validate(&table, &deeper).is_accepted());
    }

    #[test]
    fn depth_search_finds_an_equivalent_depth(grammar in grammar_strategy(), depth in 0u32..4) {
        let generated = grammar.generate(depth);
        let found = find_derivation_depth(&grammar, &generated, 4).unwrap();
        let found = found.expect("the generating depth is within the limit");
        prop_assert!(found <= depth);
        prop_assert_eq!(grammar.generate(found), generated);
    }
}
