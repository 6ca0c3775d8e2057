use thiserror::Error;
use tracing::trace;

use super::{Automaton, Memory, StateIndex, Target, TransitionKey};
use crate::{
    alphabet::{CharAlphabet, Label, StackAlphabet, StackIndex},
    math::{Map, Set},
};

/// Reasons for which the builder refuses a single item. A refused item is simply left out,
/// the remaining automaton can still be built.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum BuildWarning {
    #[error("state `{0}` is not declared")]
    UnknownState(String),
    #[error("symbol `{0}` is not part of the alphabet")]
    UnknownSymbol(char),
    #[error("stack symbol `{0}` is not part of the stack alphabet")]
    UnknownStackSymbol(String),
    #[error("automaton has no stack, transition must not pop or push")]
    NoStack,
    #[error("transition is already present")]
    Duplicate,
}

/// Reasons for which no automaton can be built at all.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum BuildError {
    #[error("no initial state was given")]
    MissingInitial,
    #[error("initial state `{0}` is not declared")]
    UnknownInitial(String),
}

/// Tells how a transition that was accepted by the builder ended up in the table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Insertion {
    /// The transition key was not present before.
    New,
    /// The key was already present and the target was added to its set of targets, which
    /// makes the automaton nondeterministic.
    Chained,
}

/// Helper struct for the construction of an [`Automaton`]. Alphabet and states have to be declared
/// before transitions that refer to them are added, every transition is checked against the
/// declarations right away.
///
/// The `with_*` methods can be chained, items they refuse are collected and handed out together
/// with the automaton by [`AutomatonBuilder::build`]. The `add_*` methods report the outcome for
/// each single item instead, which is what the description parser uses.
///
/// # Example
///
/// We want to create a DFA with two states `q0` and `q1` over the alphabet `['0', '1']`, which
/// accepts exactly the words with an odd number of `1`s.
/// ```
/// use automata_check::prelude::*;
///
/// let (dfa, warnings) = AutomatonBuilder::finite()
///     .with_alphabet(['0', '1'])
///     .with_states(["q0", "q1"])
///     .with_initial("q0")
///     .with_accepting(["q1"])
///     .with_transitions([
///         ("q0", '0', "q0"),
///         ("q0", '1', "q1"),
///         ("q1", '0', "q1"),
///         ("q1", '1', "q0"),
///     ])
///     .build()
///     .unwrap();
/// assert!(warnings.is_empty());
/// assert_eq!(dfa.size(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    alphabet: CharAlphabet,
    states: Set<String>,
    initial: Option<String>,
    accepting: Set<StateIndex>,
    memory: Memory,
    transitions: Map<TransitionKey, Set<Target>>,
    nondeterministic: bool,
    description: Option<String>,
    warnings: Vec<BuildWarning>,
}

impl AutomatonBuilder {
    /// Creates a builder for an automaton with the given [`Memory`].
    pub fn new(memory: Memory) -> Self {
        Self {
            memory,
            ..Default::default()
        }
    }

    /// Creates a builder for a finite automaton.
    pub fn finite() -> Self {
        Self::new(Memory::Stackless)
    }

    /// Creates a builder for a pushdown automaton with the given stack symbols.
    pub fn pushdown<I, S>(stack_symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Memory::Pushdown(StackAlphabet::new(stack_symbols)))
    }

    /// Adds the given symbols to the input alphabet.
    pub fn with_alphabet<I: IntoIterator<Item = char>>(mut self, symbols: I) -> Self {
        self.alphabet = self.alphabet.symbols().chain(symbols).collect();
        self
    }

    /// Declares the given states, the order of declaration determines the [`StateIndex`].
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Sets the initial state. It is only checked when the automaton is built.
    pub fn with_initial<S: Into<String>>(mut self, initial: S) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for state in states {
            if let Err(warning) = self.add_accepting(state.as_ref()) {
                self.warnings.push(warning);
            }
        }
        self
    }

    /// Attaches a free-text description.
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds transitions that do not touch the stack, given as `(source, input, target)`.
    pub fn with_transitions<I, S, L>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (S, L, S)>,
        S: AsRef<str>,
        L: Into<Label<char>>,
    {
        for (source, input, target) in transitions {
            if let Err(warning) =
                self.add_transition(source.as_ref(), input.into(), target.as_ref())
            {
                self.warnings.push(warning);
            }
        }
        self
    }

    /// Adds transitions given as `(source, input, pop, push, target)`.
    pub fn with_stack_transitions<I, S, P>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (S, Label<char>, Label<P>, Label<P>, S)>,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        for (source, input, pop, push, target) in transitions {
            if let Err(warning) = self.add_stack_transition(
                source.as_ref(),
                input,
                pop.as_ref().map(|sym| sym.as_ref()),
                push.as_ref().map(|sym| sym.as_ref()),
                target.as_ref(),
            ) {
                self.warnings.push(warning);
            }
        }
        self
    }

    /// Marks the state `name` as accepting.
    pub fn add_accepting(&mut self, name: &str) -> Result<(), BuildWarning> {
        let state = self.resolve_state(name)?;
        self.accepting.insert(state);
        Ok(())
    }

    /// Adds a transition that does not touch the stack.
    pub fn add_transition(
        &mut self,
        source: &str,
        input: Label<char>,
        target: &str,
    ) -> Result<Insertion, BuildWarning> {
        self.add_stack_transition(source, input, Label::Epsilon, Label::Epsilon, target)
    }

    /// Adds a transition from `source` to `target` that consumes `input`, pops `pop` and pushes
    /// `push`. If a transition with the same source, input and pop exists already, the new target
    /// is chained to it.
    pub fn add_stack_transition(
        &mut self,
        source: &str,
        input: Label<char>,
        pop: Label<&str>,
        push: Label<&str>,
        target: &str,
    ) -> Result<Insertion, BuildWarning> {
        let source = self.resolve_state(source)?;
        let target = self.resolve_state(target)?;
        if let Label::Symbol(sym) = input {
            if !self.alphabet.contains(sym) {
                return Err(BuildWarning::UnknownSymbol(sym));
            }
        }
        let pop = pop.try_map(|sym| self.resolve_stack_symbol(sym))?;
        let push = push.try_map(|sym| self.resolve_stack_symbol(sym))?;

        let key = TransitionKey::with_pop(source, input, pop);
        let targets = self.transitions.entry(key).or_default();
        if !targets.insert(Target::with_push(target, push)) {
            return Err(BuildWarning::Duplicate);
        }
        trace!("added transition {key:?} -> {target} pushing {push:?}");

        if targets.len() > 1 {
            self.nondeterministic = true;
            Ok(Insertion::Chained)
        } else {
            Ok(Insertion::New)
        }
    }

    /// Returns true if a transition has been chained so far.
    pub fn is_nondeterministic(&self) -> bool {
        self.nondeterministic
    }

    /// Returns the warnings collected by the `with_*` methods so far.
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Consumes the builder and produces the [`Automaton`] together with all warnings that were
    /// collected by the `with_*` methods. Fails if the initial state is missing or undeclared.
    pub fn build(self) -> Result<(Automaton, Vec<BuildWarning>), BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitial)?;
        let initial = self
            .states
            .get_index_of(initial.as_str())
            .ok_or(BuildError::UnknownInitial(initial))?;

        let automaton = Automaton {
            alphabet: self.alphabet,
            states: self.states,
            initial,
            accepting: self.accepting,
            memory: self.memory,
            transitions: self.transitions,
            nondeterministic: self.nondeterministic,
            description: self.description,
        };
        Ok((automaton, self.warnings))
    }

    fn resolve_state(&self, name: &str) -> Result<StateIndex, BuildWarning> {
        self.states
            .get_index_of(name)
            .ok_or_else(|| BuildWarning::UnknownState(name.to_string()))
    }

    fn resolve_stack_symbol(&self, symbol: &str) -> Result<StackIndex, BuildWarning> {
        match &self.memory {
            Memory::Stackless => Err(BuildWarning::NoStack),
            Memory::Pushdown(stack) => stack
                .index_of(symbol)
                .ok_or_else(|| BuildWarning::UnknownStackSymbol(symbol.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_states() -> AutomatonBuilder {
        AutomatonBuilder::finite()
            .with_alphabet(['0', '1'])
            .with_states(["q0", "q1"])
            .with_initial("q0")
    }

    #[test]
    fn chaining_makes_nondeterministic() {
        let mut builder = two_states();
        assert_eq!(
            builder.add_transition("q0", Label::Symbol('0'), "q0"),
            Ok(Insertion::New)
        );
        assert!(!builder.is_nondeterministic());
        assert_eq!(
            builder.add_transition("q0", Label::Symbol('0'), "q1"),
            Ok(Insertion::Chained)
        );
        assert!(builder.is_nondeterministic());

        let (nfa, _) = builder.build().unwrap();
        assert!(nfa.is_nondeterministic());
        assert_eq!(nfa.transition_count(), 1);
        assert_eq!(
            nfa.transitions(0, Label::Symbol('0'), Label::Epsilon)
                .map(|targets| targets.len()),
            Some(2)
        );
    }

    #[test]
    fn refused_items() {
        let mut builder = two_states().with_accepting(["q1", "q7"]);
        assert_eq!(
            builder.warnings(),
            &[BuildWarning::UnknownState("q7".to_string())]
        );
        assert_eq!(
            builder.add_transition("q0", Label::Symbol('2'), "q1"),
            Err(BuildWarning::UnknownSymbol('2'))
        );
        assert_eq!(
            builder.add_transition("q0", Label::Symbol('1'), "q2"),
            Err(BuildWarning::UnknownState("q2".to_string()))
        );
        assert_eq!(
            builder.add_stack_transition(
                "q0",
                Label::Epsilon,
                Label::Symbol("A"),
                Label::Epsilon,
                "q1"
            ),
            Err(BuildWarning::NoStack)
        );
        assert_eq!(
            builder.add_transition("q0", Label::Epsilon, "q1"),
            Ok(Insertion::New)
        );
        assert_eq!(
            builder.add_transition("q0", Label::Epsilon, "q1"),
            Err(BuildWarning::Duplicate)
        );
        assert!(!builder.is_nondeterministic());

        let (aut, warnings) = builder.build().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(aut.accepting_states().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn unknown_stack_symbol() {
        let mut builder = AutomatonBuilder::pushdown(["A"])
            .with_alphabet(['a'])
            .with_states(["p"]);
        assert_eq!(
            builder.add_stack_transition(
                "p",
                Label::Symbol('a'),
                Label::Epsilon,
                Label::Symbol("B"),
                "p"
            ),
            Err(BuildWarning::UnknownStackSymbol("B".to_string()))
        );
    }

    #[test]
    fn initial_state_is_required() {
        assert_eq!(
            AutomatonBuilder::finite().with_states(["q0"]).build().err(),
            Some(BuildError::MissingInitial)
        );
        assert_eq!(
            AutomatonBuilder::finite()
                .with_states(["q0"])
                .with_initial("q9")
                .build()
                .err(),
            Some(BuildError::UnknownInitial("q9".to_string()))
        );
    }
}
