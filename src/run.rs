use tracing::{debug, trace};

use crate::{
    alphabet::{Label, StackIndex},
    automaton::{Automaton, StateIndex},
    math::Set,
};

mod stacks;
use stacks::{StackId, Stacks};

mod trail;
use trail::Trail;

mod render;

/// A single move that was made during a run.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Step {
    /// The state in which the move starts.
    pub source: StateIndex,
    /// The consumed input, [`Label::Epsilon`] if the move consumes nothing. For a dead end, this is
    /// the symbol that could not be read. If the input was exhausted, it is the last symbol of the
    /// word, or [`Label::Epsilon`] for the empty word.
    pub input: Label<char>,
    /// The reached state, `None` if the run got stuck in `source`.
    pub target: Option<StateIndex>,
    /// The symbol popped from the stack.
    pub pop: Label<StackIndex>,
    /// The symbol pushed onto the stack.
    pub push: Label<StackIndex>,
}

impl Step {
    fn dead_end(source: StateIndex, input: Label<char>) -> Self {
        Self {
            source,
            input,
            target: None,
            pop: Label::Epsilon,
            push: Label::Epsilon,
        }
    }

    /// Returns true if the run got stuck with this step.
    pub fn is_dead_end(&self) -> bool {
        self.target.is_none()
    }
}

/// The path that led to the verdict of a run.
///
/// If the word is accepted, the path is that of the accepting branch. Otherwise it is the branch
/// that got furthest into the input, and among those the one with the most moves. If that branch
/// got stuck, its last step is a dead end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPath {
    initial: StateIndex,
    steps: Vec<Step>,
    accepted: bool,
}

impl ExecutionPath {
    /// The state in which the run started.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// The moves in the order in which they were made.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Gives the number of moves.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no move was made, which happens when the empty word is accepted right away.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the verdict of the run.
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// The state in which the path ends.
    pub fn reached(&self) -> StateIndex {
        self.steps
            .last()
            .map(|step| step.target.unwrap_or(step.source))
            .unwrap_or(self.initial)
    }
}

/// Bounds for the search performed by an [`Engine`].
///
/// Deciding whether a pushdown automaton accepts a word by exhaustive search does not necessarily
/// terminate, as epsilon transitions may push symbols forever. The bounds below cut such branches
/// off, which makes every run terminate. Both only look at moves that read no input, so a branch
/// that keeps reading is never cut off. This is an approximation: a branch that is cut off is
/// treated as rejecting, even if continuing it would have led to acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    loop_bound: usize,
    max_epsilon_run: Option<usize>,
    prune_revisits: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            loop_bound: 10,
            max_epsilon_run: Some(10_000),
            prune_revisits: true,
        }
    }
}

impl RunConfig {
    /// A branch is abandoned as soon as its last `bound` moves are the same epsilon move. Moves
    /// that read input make progress and never count as a loop. Values below 2 are treated as 2.
    pub fn with_loop_bound(mut self, bound: usize) -> Self {
        self.loop_bound = bound.max(2);
        self
    }

    /// A branch is abandoned as soon as it makes more than `max` epsilon moves in a row, `None`
    /// removes this bound. The loop bound only catches repetitions of a single move, this bound
    /// also catches longer cycles.
    pub fn with_max_epsilon_run(mut self, max: Option<usize>) -> Self {
        self.max_epsilon_run = max;
        self
    }

    /// If enabled, a configuration (state, position in the input, stack contents) is explored at
    /// most once per run. Cycles then end as soon as they close, instead of running into one of the
    /// bounds.
    pub fn with_revisit_pruning(mut self, prune: bool) -> Self {
        self.prune_revisits = prune;
        self
    }

    /// Returns the loop bound.
    pub fn loop_bound(&self) -> usize {
        self.loop_bound
    }

    /// Returns the maximal number of consecutive epsilon moves.
    pub fn max_epsilon_run(&self) -> Option<usize> {
        self.max_epsilon_run
    }

    /// Returns whether revisited configurations are pruned.
    pub fn prunes_revisits(&self) -> bool {
        self.prune_revisits
    }
}

/// Checks words against automata and keeps the path of the most recent check.
///
/// The engine does not hold on to an automaton, so the same engine can be used with different
/// automata. It is cheap to create, one engine per thread is the way to check words in parallel.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: RunConfig,
    last: Option<ExecutionPath>,
}

impl Engine {
    /// Creates an engine with the given [`RunConfig`].
    pub fn new(config: RunConfig) -> Self {
        Self { config, last: None }
    }

    /// Returns the [`RunConfig`] used by `self`.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Checks whether `automaton` accepts `word` and records the path that led to the verdict,
    /// replacing the path of any previous call.
    pub fn test(&mut self, automaton: &Automaton, word: &str) -> bool {
        self.last = None;
        let path = automaton.run_with(word, &self.config);
        let accepted = path.accepted();
        self.last = Some(path);
        accepted
    }

    /// Returns the path recorded by the most recent call to [`Engine::test`].
    pub fn last_path(&self) -> Option<&ExecutionPath> {
        self.last.as_ref()
    }
}

impl Automaton {
    /// Checks whether `self` accepts `word` with the default [`RunConfig`].
    pub fn accepts(&self, word: &str) -> bool {
        self.run(word).accepted()
    }

    /// Runs `word` with the default [`RunConfig`].
    pub fn run(&self, word: &str) -> ExecutionPath {
        self.run_with(word, &RunConfig::default())
    }

    /// Searches for an accepting branch of `word` in `self` and returns the resulting path.
    pub fn run_with(&self, word: &str, config: &RunConfig) -> ExecutionPath {
        Search::new(self, config, word).run()
    }
}

/// One node of the search: the current state, how much of the input has been read, the stack
/// contents and the moves that led here.
#[derive(Debug, Clone)]
struct Configuration {
    state: StateIndex,
    position: usize,
    stack: StackId,
    /// Number of epsilon moves since input was last read.
    idle: usize,
    path: Trail<Step>,
}

struct Search<'a> {
    automaton: &'a Automaton,
    config: &'a RunConfig,
    input: Vec<char>,
    stacks: Stacks,
    visited: Set<(StateIndex, usize, StackId)>,
    rejection: Option<(usize, Trail<Step>)>,
}

impl<'a> Search<'a> {
    fn new(automaton: &'a Automaton, config: &'a RunConfig, word: &str) -> Self {
        Self {
            automaton,
            config,
            input: word.chars().collect(),
            stacks: Stacks::default(),
            visited: Set::default(),
            rejection: None,
        }
    }

    fn run(mut self) -> ExecutionPath {
        let initial = self.automaton.initial();
        let mut worklist = vec![Configuration {
            state: initial,
            position: 0,
            stack: Stacks::EMPTY,
            idle: 0,
            path: Trail::default(),
        }];
        let mut explored = 0usize;

        while let Some(current) = worklist.pop() {
            if self.config.prune_revisits
                && !self
                    .visited
                    .insert((current.state, current.position, current.stack))
            {
                trace!(
                    "state {} at position {} was explored before with the same stack",
                    current.state,
                    current.position
                );
                self.reject(current.position, current.path);
                continue;
            }
            explored += 1;
            trace!(
                "exploring state {} at position {} with stack {}",
                current.state,
                current.position,
                current.stack
            );

            if self.is_accepting(&current) {
                debug!(
                    "accepted {:?} after exploring {explored} configurations with {} distinct stacks",
                    self.word(),
                    self.stacks.len()
                );
                return ExecutionPath {
                    initial,
                    steps: current.path.to_vec(),
                    accepted: true,
                };
            }

            let successors = self.successors(&current);
            if successors.is_empty() {
                // at the end of the input, the dead end is attributed to the last symbol
                let stuck = Step::dead_end(
                    current.state,
                    self.input
                        .get(current.position)
                        .or(self.input.last())
                        .copied()
                        .into(),
                );
                self.reject(current.position, current.path.push(stuck));
                continue;
            }

            // reversed, so that the first successor is explored first
            for next in successors.into_iter().rev() {
                if self.is_looping(&next.path) {
                    trace!("abandoning branch that repeats {:?}", next.path.peek());
                    self.reject(next.position, next.path);
                } else if self
                    .config
                    .max_epsilon_run
                    .is_some_and(|max| next.idle > max)
                {
                    trace!("abandoning branch after {} epsilon moves", next.idle);
                    self.reject(next.position, next.path);
                } else {
                    worklist.push(next);
                }
            }
        }

        debug!(
            "rejected {:?} after exploring {explored} configurations",
            self.word()
        );
        ExecutionPath {
            initial,
            steps: self
                .rejection
                .map(|(_, path)| path.to_vec())
                .unwrap_or_default(),
            accepted: false,
        }
    }

    fn word(&self) -> String {
        self.input.iter().collect()
    }

    fn is_accepting(&self, current: &Configuration) -> bool {
        current.position == self.input.len()
            && self.automaton.is_accepting(current.state)
            && (!self.automaton.is_pushdown() || current.stack == Stacks::EMPTY)
    }

    /// Returns true if the last `loop_bound` moves of `path` are all the same epsilon move.
    fn is_looping(&self, path: &Trail<Step>) -> bool {
        let bound = self.config.loop_bound;
        if path.len() < bound {
            return false;
        }
        let mut steps = path.iter();
        let Some(last) = steps.next() else {
            return false;
        };
        last.input.is_epsilon() && steps.take(bound - 1).all(|step| step == last)
    }

    /// Keeps `path` as the path of a rejection if it got further into the input than the paths
    /// seen so far, or equally far with more moves.
    fn reject(&mut self, position: usize, path: Trail<Step>) {
        let better = match &self.rejection {
            None => true,
            Some((best_position, best)) => {
                position > *best_position || (position == *best_position && path.len() > best.len())
            }
        };
        if better {
            self.rejection = Some((position, path));
        }
    }

    /// Computes all configurations reachable in one move, in the order in which they are explored:
    /// first those reading input and popping, then those reading input only, then epsilon moves that
    /// pop and finally epsilon moves that leave the stack alone.
    fn successors(&mut self, current: &Configuration) -> Vec<Configuration> {
        let mut out = Vec::new();
        let top = self.stacks.top(current.stack);
        if let Some(&sym) = self.input.get(current.position) {
            if let Some(top) = top {
                self.expand(current, Label::Symbol(sym), Label::Symbol(top), &mut out);
            }
            self.expand(current, Label::Symbol(sym), Label::Epsilon, &mut out);
        }
        if let Some(top) = top {
            self.expand(current, Label::Epsilon, Label::Symbol(top), &mut out);
        }
        self.expand(current, Label::Epsilon, Label::Epsilon, &mut out);
        out
    }

    fn expand(
        &mut self,
        current: &Configuration,
        input: Label<char>,
        pop: Label<StackIndex>,
        out: &mut Vec<Configuration>,
    ) {
        let automaton = self.automaton;
        let Some(targets) = automaton.transitions(current.state, input, pop) else {
            return;
        };
        let stack = match pop {
            Label::Epsilon => current.stack,
            Label::Symbol(_) => self.stacks.pop(current.stack),
        };
        let (position, idle) = match input {
            Label::Epsilon => (current.position, current.idle + 1),
            Label::Symbol(_) => (current.position + 1, 0),
        };

        for target in targets {
            let step = Step {
                source: current.state,
                input,
                target: Some(target.state),
                pop,
                push: target.push,
            };
            out.push(Configuration {
                state: target.state,
                position,
                stack: match target.push {
                    Label::Epsilon => stack,
                    Label::Symbol(sym) => self.stacks.push(stack, sym),
                },
                idle,
                path: current.path.push(step),
            });
        }
    }
}
