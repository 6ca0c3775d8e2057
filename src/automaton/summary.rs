use std::fmt::Display;

use super::Automaton;
use crate::{alphabet::Label, Show};

/// One row of the transition table in a [`Summary`]: a transition key together with all of its
/// targets, in the order in which they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSummary {
    /// Name of the source state.
    pub source: String,
    /// The consumed input.
    pub input: Label<char>,
    /// The popped stack symbol.
    pub pop: Label<String>,
    /// Pairs of reached state and pushed stack symbol.
    pub targets: Vec<(String, Label<String>)>,
}

impl TransitionSummary {
    /// Renders source and input the way they are written in a description, i.e. `(q0,a)`.
    pub fn key(&self) -> String {
        let input = self.input.symbol().map(char::to_string).unwrap_or_default();
        format!("({},{input})", self.source)
    }

    /// Renders the popped stack symbol, `ε` if the stack is not read.
    pub fn pop(&self) -> String {
        self.pop.show()
    }

    /// Renders the targets as a set, for pushdown automata each target is a pair of the reached
    /// state and the pushed symbol.
    pub fn targets(&self, pushdown: bool) -> String {
        let targets = self
            .targets
            .iter()
            .map(|(state, push)| {
                if pushdown {
                    format!("({state},{})", push.show())
                } else {
                    state.clone()
                }
            })
            .collect::<Vec<_>>();
        format!("{{{}}}", targets.join(","))
    }
}

/// A structured, owned view of an [`Automaton`]. Everything is listed in declaration order and
/// the transition table in insertion order, so two summaries of the same description are equal.
/// The [`Display`] implementation renders the transition table through `tabled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The input alphabet.
    pub alphabet: Vec<char>,
    /// The stack alphabet, `None` for finite automata.
    pub stack_alphabet: Option<Vec<String>>,
    /// Names of all states.
    pub states: Vec<String>,
    /// Name of the initial state.
    pub initial: String,
    /// Names of the accepting states.
    pub accepting: Vec<String>,
    /// The transition table.
    pub transitions: Vec<TransitionSummary>,
    /// Whether some transition has more than one target.
    pub nondeterministic: bool,
    /// The free-text description, if there is one.
    pub description: Option<String>,
}

impl Summary {
    pub(super) fn of(aut: &Automaton) -> Self {
        let state = |idx| aut.state_name(idx).unwrap_or("?").to_string();
        let stack = |label: Label<usize>| {
            label.map(|sym| aut.stack_symbol(sym).unwrap_or("?").to_string())
        };

        Self {
            alphabet: aut.alphabet().symbols().collect(),
            stack_alphabet: aut
                .stack_alphabet()
                .map(|stack| stack.symbols().map(str::to_string).collect()),
            states: aut.state_names().map(str::to_string).collect(),
            initial: state(aut.initial()),
            accepting: aut.accepting_states().map(state).collect(),
            transitions: aut
                .transition_table()
                .map(|(key, targets)| TransitionSummary {
                    source: state(key.source),
                    input: key.input,
                    pop: stack(key.pop),
                    targets: targets
                        .iter()
                        .map(|target| (state(target.state), stack(target.push)))
                        .collect(),
                })
                .collect(),
            nondeterministic: aut.is_nondeterministic(),
            description: aut.description().map(str::to_string),
        }
    }

    /// Returns true if the summarized automaton has a stack.
    pub fn is_pushdown(&self) -> bool {
        self.stack_alphabet.is_some()
    }

    /// Gives a short name for the kind of automaton, i.e. one of `DFA`, `NFA`, `DPDA` and `NPDA`.
    pub fn kind(&self) -> &'static str {
        match (self.is_pushdown(), self.nondeterministic) {
            (false, false) => "DFA",
            (false, true) => "NFA",
            (true, false) => "DPDA",
            (true, true) => "NPDA",
        }
    }

    /// Builds the transition table with one row per transition key. Pushdown automata get an
    /// extra column for the popped symbol and their targets are `(state,push)` pairs.
    pub fn transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        if self.is_pushdown() {
            builder.push_record(["Transition", "Pop", "Targets (state,push)"]);
            for transition in &self.transitions {
                builder.push_record([transition.key(), transition.pop(), transition.targets(true)]);
            }
        } else {
            builder.push_record(["Transition", "Targets"]);
            for transition in &self.transitions {
                builder.push_record([transition.key(), transition.targets(false)]);
            }
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "kind: {}", self.kind())?;
        writeln!(f, "alphabet: {}", char::show_collection(&self.alphabet))?;
        if let Some(stack) = &self.stack_alphabet {
            writeln!(f, "stack alphabet: {}", String::show_collection(stack))?;
        }
        writeln!(f, "states: {}", String::show_collection(&self.states))?;
        writeln!(f, "start: {}", self.initial)?;
        writeln!(f, "accepting: {}", String::show_collection(&self.accepting))?;
        if let Some(description) = &self.description {
            writeln!(f, "description: {description}")?;
        }
        write!(f, "{}", self.transition_table())
    }
}
