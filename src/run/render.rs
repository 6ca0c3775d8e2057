use super::{ExecutionPath, Step};
use crate::{alphabet::Label, automaton::Automaton, Show};

impl ExecutionPath {
    /// Describes the path with one line per move, numbered from 1. The first line is marked as the
    /// start and the last one carries the verdict. A move to state `none` is a dead end. Stack
    /// operations are only mentioned for pushdown automata. A path without moves is rendered as a
    /// single line numbered 0.
    ///
    /// ```
    /// use automata_check::prelude::*;
    ///
    /// let (dfa, _) = AutomatonBuilder::finite()
    ///     .with_alphabet(['a'])
    ///     .with_states(["q0", "q1"])
    ///     .with_initial("q0")
    ///     .with_accepting(["q1"])
    ///     .with_transitions([("q0", 'a', "q1")])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(
    ///     dfa.run("a").render(&dfa),
    ///     vec!["1: start state q0 input a moves to state q1 and is accepted"]
    /// );
    /// ```
    pub fn render(&self, automaton: &Automaton) -> Vec<String> {
        if self.steps.is_empty() {
            return vec![format!(
                "0: start state {} and is {}",
                state(automaton, self.initial),
                self.accepted.show()
            )];
        }

        let last = self.steps.len() - 1;
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let mut line = format!("{}: {}", i + 1, if i == 0 { "start " } else { "" });
                line.push_str(&describe(automaton, step));
                if i == last {
                    line.push_str(" and is ");
                    line.push_str(&self.accepted.show());
                }
                line
            })
            .collect()
    }
}

fn describe(automaton: &Automaton, step: &Step) -> String {
    let mut out = format!(
        "state {} input {}",
        state(automaton, step.source),
        step.input.show()
    );
    match step.target {
        None => out.push_str(" moves to state none"),
        Some(target) => {
            out.push_str(" moves to state ");
            out.push_str(&state(automaton, target));
            if automaton.is_pushdown() {
                out.push_str(" popping ");
                out.push_str(&stack_symbol(automaton, step.pop));
                out.push_str(" pushing ");
                out.push_str(&stack_symbol(automaton, step.push));
            }
        }
    }
    out
}

fn state(automaton: &Automaton, idx: usize) -> String {
    automaton.state_name(idx).unwrap_or("?").to_string()
}

fn stack_symbol(automaton: &Automaton, label: Label<usize>) -> String {
    label
        .map(|sym| automaton.stack_symbol(sym).unwrap_or("?"))
        .show()
}
