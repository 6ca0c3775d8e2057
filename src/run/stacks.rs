use crate::{alphabet::StackIndex, math::Set};

/// Identifies the contents of a stack within one [`Stacks`] arena. Equal contents always get the
/// same id, so comparing and hashing stacks is constant time.
pub(crate) type StackId = usize;

/// Interns stack contents. A stack is either empty or a symbol on top of another stack, each such
/// pair is stored once and its position in the set (shifted by one) is the id of the stack.
#[derive(Debug, Default)]
pub(crate) struct Stacks {
    nodes: Set<(StackId, StackIndex)>,
}

impl Stacks {
    pub const EMPTY: StackId = 0;

    /// Returns the id of the stack that results from pushing `symbol` onto `below`.
    pub fn push(&mut self, below: StackId, symbol: StackIndex) -> StackId {
        self.nodes.insert_full((below, symbol)).0 + 1
    }

    /// Returns the topmost symbol, `None` for the empty stack.
    pub fn top(&self, stack: StackId) -> Option<StackIndex> {
        self.node(stack).map(|(_, symbol)| symbol)
    }

    /// Returns the stack without its topmost symbol. Popping the empty stack gives the empty stack.
    pub fn pop(&self, stack: StackId) -> StackId {
        self.node(stack).map_or(Self::EMPTY, |(below, _)| below)
    }

    /// Gives the number of distinct non-empty stacks seen so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, stack: StackId) -> Option<(StackId, StackIndex)> {
        stack
            .checked_sub(1)
            .and_then(|idx| self.nodes.get_index(idx))
            .copied()
    }
}
