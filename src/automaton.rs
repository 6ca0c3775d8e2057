use crate::{
    alphabet::{CharAlphabet, Label, StackAlphabet, StackIndex},
    math::{Map, Set},
};

mod builder;
pub use builder::{AutomatonBuilder, BuildError, BuildWarning, Insertion};

mod summary;
pub use summary::{Summary, TransitionSummary};

/// Index of a state in an [`Automaton`]. States are numbered in the order in which they are declared.
pub type StateIndex = usize;

/// Determines whether an automaton has an auxiliary stack. Finite automata are [`Memory::Stackless`],
/// pushdown automata carry the alphabet of their stack symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Memory {
    /// The automaton has no stack, all transitions have empty stack labels.
    #[default]
    Stackless,
    /// The automaton has a stack over the given alphabet.
    Pushdown(StackAlphabet),
}

impl Memory {
    /// Returns the stack alphabet, if there is one.
    pub fn stack_alphabet(&self) -> Option<&StackAlphabet> {
        match self {
            Memory::Stackless => None,
            Memory::Pushdown(stack) => Some(stack),
        }
    }
}

/// Identifies a set of transitions: the state they leave, the input they consume and the symbol
/// they pop from the stack.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TransitionKey {
    /// The source state.
    pub source: StateIndex,
    /// The consumed input symbol, [`Label::Epsilon`] if no input is consumed.
    pub input: Label<char>,
    /// The symbol that has to be on top of the stack and is popped, [`Label::Epsilon`] if the
    /// stack is not read.
    pub pop: Label<StackIndex>,
}

impl TransitionKey {
    /// Creates a key for a transition that does not read the stack.
    pub fn new(source: StateIndex, input: Label<char>) -> Self {
        Self::with_pop(source, input, Label::Epsilon)
    }

    /// Creates a key for a transition that pops `pop` from the stack.
    pub fn with_pop(source: StateIndex, input: Label<char>, pop: Label<StackIndex>) -> Self {
        Self { source, input, pop }
    }
}

/// One possible outcome of a transition: the state that is reached together with the
/// symbol that is pushed onto the stack.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target {
    /// The reached state.
    pub state: StateIndex,
    /// The pushed symbol, [`Label::Epsilon`] if nothing is pushed.
    pub push: Label<StackIndex>,
}

impl Target {
    /// Creates a target that does not push anything.
    pub fn new(state: StateIndex) -> Self {
        Self::with_push(state, Label::Epsilon)
    }

    /// Creates a target that pushes `push` onto the stack.
    pub fn with_push(state: StateIndex, push: Label<StackIndex>) -> Self {
        Self { state, push }
    }
}

/// A finite or pushdown automaton over a [`CharAlphabet`].
///
/// States have names, but are addressed through their [`StateIndex`]. The transition table maps a
/// [`TransitionKey`] to the set of possible [`Target`]s, keys and targets are kept in the order in which
/// they were added. If any key has more than one target, the automaton is nondeterministic.
///
/// An automaton is created through an [`AutomatonBuilder`] (or by loading a description, see
/// [`crate::parse`]) and cannot be modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    alphabet: CharAlphabet,
    states: Set<String>,
    initial: StateIndex,
    accepting: Set<StateIndex>,
    memory: Memory,
    transitions: Map<TransitionKey, Set<Target>>,
    nondeterministic: bool,
    description: Option<String>,
}

impl Automaton {
    /// Returns the input alphabet.
    pub fn alphabet(&self) -> &CharAlphabet {
        &self.alphabet
    }

    /// Returns the [`Memory`] of the automaton.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns the stack alphabet if `self` is a pushdown automaton.
    pub fn stack_alphabet(&self) -> Option<&StackAlphabet> {
        self.memory.stack_alphabet()
    }

    /// Returns true if the automaton has a stack. This is decided when the automaton is built
    /// and does not depend on whether any transition actually uses the stack.
    pub fn is_pushdown(&self) -> bool {
        matches!(self.memory, Memory::Pushdown(_))
    }

    /// Returns true if some transition key has more than one target.
    pub fn is_nondeterministic(&self) -> bool {
        self.nondeterministic
    }

    /// Gives the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns the index of the initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Returns true if the state with the given index is accepting.
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(&state)
    }

    /// Returns the indices of all accepting states in declaration order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.accepting.iter().copied()
    }

    /// Returns the names of all states in declaration order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.states.iter().map(String::as_str)
    }

    /// Returns the name of the state with the given index.
    pub fn state_name(&self, state: StateIndex) -> Option<&str> {
        self.states.get_index(state).map(String::as_str)
    }

    /// Returns the index of the state with the given name.
    pub fn state_index(&self, name: &str) -> Option<StateIndex> {
        self.states.get_index_of(name)
    }

    /// Returns the name of the given stack symbol, if `self` has a stack that contains it.
    pub fn stack_symbol(&self, symbol: StackIndex) -> Option<&str> {
        self.stack_alphabet().and_then(|stack| stack.symbol(symbol))
    }

    /// Returns the free-text description that was attached to the automaton, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Checks whether some transition leaves `state` on `input` while popping `stack_top`.
    pub fn has_transition(
        &self,
        state: StateIndex,
        input: Label<char>,
        stack_top: Label<StackIndex>,
    ) -> bool {
        self.transitions
            .contains_key(&TransitionKey::with_pop(state, input, stack_top))
    }

    /// Returns the set of targets for the transition leaving `state` on `input` while popping
    /// `stack_top`, or `None` if no such transition exists.
    pub fn transitions(
        &self,
        state: StateIndex,
        input: Label<char>,
        stack_top: Label<StackIndex>,
    ) -> Option<&Set<Target>> {
        self.transitions
            .get(&TransitionKey::with_pop(state, input, stack_top))
    }

    /// Iterates over the transition table in insertion order. Each key appears exactly once,
    /// together with all of its targets.
    pub fn transition_table(&self) -> impl Iterator<Item = (&TransitionKey, &Set<Target>)> + '_ {
        self.transitions.iter()
    }

    /// Gives the number of distinct transition keys.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Computes the [`Summary`] of `self`.
    pub fn summary(&self) -> Summary {
        Summary::of(self)
    }
}
