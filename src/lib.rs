//! Library for checking whether words are accepted by finite and pushdown automata.
//!
//! An automaton is described in a small line-oriented text format (see [`parse`]). Loading such a
//! description yields an immutable [`Automaton`], which consists of an input alphabet, a list of named
//! states with a designated initial state and a set of accepting states, a transition table and, for
//! pushdown automata, a stack alphabet. Whether the automaton has a stack is decided by the layout of
//! the description and is stored in the [`Memory`] of the automaton.
//!
//! Words are checked by an [`Engine`], which performs a depth-first search over configurations
//! consisting of the current state, the remaining input and the stack contents. The search explores
//! every applicable transition, so nondeterministic automata and epsilon transitions are handled
//! naturally. Besides the verdict, the engine records the path that led to it, which can then be turned
//! into human readable lines through [`ExecutionPath::render`].
//!
//! Since general pushdown automata may loop on epsilon transitions forever, the search is cut off by
//! two configurable bounds (see [`RunConfig`]). These make the search terminate, but they are
//! heuristics: a word that is only accepted through a branch exceeding the bounds is rejected.
//!
//! The [`Session`] type bundles a loaded automaton with an engine and offers the operations that a
//! command layer would expose: `load`, `test`, `last_path` and `describe`.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_check::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{CharAlphabet, Label, StackAlphabet},
        automaton::{
            Automaton, AutomatonBuilder, BuildWarning, Memory, StateIndex, Summary, Target,
            TransitionKey,
        },
        parse::{LoadError, LoadOptions, LoadWarning, Loaded, FormatError},
        run::{Engine, ExecutionPath, RunConfig, Step},
        session::Session,
        math, Show,
    };
}

/// Type aliases for the collections used throughout the crate.
pub mod math;

/// Input alphabets, stack alphabets and the [`Label`] type for possibly empty symbols.
pub mod alphabet;

/// Defines the automaton model, its builder and the summary view.
pub mod automaton;
pub use automaton::{Automaton, AutomatonBuilder, Memory};

/// Reading automata from their textual description.
pub mod parse;

/// The execution engine, which decides acceptance and records paths.
pub mod run;
pub use run::{Engine, ExecutionPath, RunConfig};

mod session;
pub use session::Session;

/// Helper trait which can be used to display symbols, states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`. For a symbol this is the symbol itself,
    /// for the empty label it is `ε`. This is mainly used for rendering paths and summaries.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be `(q0,q1,q2)`,
    /// which is also the way collections are written in a description.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!(
            "({})",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ",")
        )
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "accepted",
            false => "rejected",
        }
        .to_string()
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The DFA over `{0, 1}` that accepts words with an odd number of `1`s.
    pub fn odd_ones_dfa() -> Automaton {
        let (aut, warnings) = AutomatonBuilder::finite()
            .with_alphabet(['0', '1'])
            .with_states(["q0", "q1"])
            .with_initial("q0")
            .with_accepting(["q1"])
            .with_transitions([
                ("q0", '0', "q0"),
                ("q0", '1', "q1"),
                ("q1", '0', "q1"),
                ("q1", '1', "q0"),
            ])
            .build()
            .expect("the DFA is well formed");
        assert!(warnings.is_empty());
        aut
    }

    /// The PDA over `{a, b}` accepting `a^n b^n` for `n >= 1`.
    pub fn anbn_pda() -> Automaton {
        let (aut, warnings) = AutomatonBuilder::pushdown(["A"])
            .with_alphabet(['a', 'b'])
            .with_states(["p", "q", "f"])
            .with_initial("p")
            .with_accepting(["f"])
            .with_stack_transitions([
                ("p", Label::Symbol('a'), Label::Epsilon, Label::Symbol("A"), "p"),
                ("p", Label::Symbol('b'), Label::Symbol("A"), Label::Epsilon, "q"),
                ("q", Label::Symbol('b'), Label::Symbol("A"), Label::Epsilon, "q"),
                ("q", Label::Epsilon, Label::Epsilon, Label::Epsilon, "f"),
            ])
            .build()
            .expect("the PDA is well formed");
        assert!(warnings.is_empty());
        aut
    }

    #[test]
    fn show_collections() {
        assert_eq!(char::show_collection(&['a', 'b']), "(a,b)");
        assert_eq!(true.show(), "accepted");
        assert_eq!(Label::<char>::Epsilon.show(), "ε");
    }
}
