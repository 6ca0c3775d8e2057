use itertools::Itertools;

use crate::{math::Set, Show};

/// A label on a transition that is either a concrete symbol or empty. An empty input label means
/// that the transition consumes no input, an empty stack label means that the transition does not
/// touch the stack.
///
/// This is kept apart from the symbols themselves, so there is no ambiguity between "no symbol" and
/// a symbol that happens to be written as an empty string.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Label<S> {
    /// No symbol.
    Epsilon,
    /// The given symbol.
    Symbol(S),
}

impl<S> Label<S> {
    /// Returns true if `self` is [`Label::Epsilon`].
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Returns a reference to the symbol, if there is one.
    pub fn symbol(&self) -> Option<&S> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(s) => Some(s),
        }
    }

    /// Converts from `&Label<S>` to `Label<&S>`.
    pub fn as_ref(&self) -> Label<&S> {
        match self {
            Label::Epsilon => Label::Epsilon,
            Label::Symbol(s) => Label::Symbol(s),
        }
    }

    /// Applies `f` to the contained symbol.
    pub fn map<T, F: FnOnce(S) -> T>(self, f: F) -> Label<T> {
        match self {
            Label::Epsilon => Label::Epsilon,
            Label::Symbol(s) => Label::Symbol(f(s)),
        }
    }

    /// Applies the fallible `f` to the contained symbol, an empty label is always mapped successfully.
    pub fn try_map<T, E, F: FnOnce(S) -> Result<T, E>>(self, f: F) -> Result<Label<T>, E> {
        match self {
            Label::Epsilon => Ok(Label::Epsilon),
            Label::Symbol(s) => f(s).map(Label::Symbol),
        }
    }
}

impl<S> From<Option<S>> for Label<S> {
    fn from(value: Option<S>) -> Self {
        match value {
            None => Label::Epsilon,
            Some(s) => Label::Symbol(s),
        }
    }
}

impl From<char> for Label<char> {
    fn from(value: char) -> Self {
        Label::Symbol(value)
    }
}

impl<S: Show> Show for Label<S> {
    fn show(&self) -> String {
        match self {
            Label::Epsilon => "ε".to_string(),
            Label::Symbol(s) => s.show(),
        }
    }
}

/// Represents an input alphabet where a symbol is just a single `char`. The symbols are kept in the
/// order in which they were declared.
#[derive(Clone, Hash, PartialEq, Eq, Debug, Default)]
pub struct CharAlphabet(Vec<char>);

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] from the given symbols, duplicates are removed.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        symbols.into_iter().collect()
    }

    /// Returns true if `symbol` is part of the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.0.contains(&symbol)
    }

    /// Returns an iterator over the symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<char> for CharAlphabet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self(iter.into_iter().unique().collect())
    }
}

impl Show for CharAlphabet {
    fn show(&self) -> String {
        char::show_collection(&self.0)
    }
}

/// Index of a symbol in a [`StackAlphabet`].
pub type StackIndex = usize;

/// The alphabet of stack symbols of a pushdown automaton. Stack symbols are arbitrary non-empty
/// strings, which are addressed by their position in the alphabet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackAlphabet(Set<String>);

impl StackAlphabet {
    /// Creates a new [`StackAlphabet`] from the given symbols, duplicates are removed.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    /// Returns the index of the given symbol, if it belongs to the alphabet.
    pub fn index_of(&self, symbol: &str) -> Option<StackIndex> {
        self.0.get_index_of(symbol)
    }

    /// Returns the symbol with the given index.
    pub fn symbol(&self, index: StackIndex) -> Option<&str> {
        self.0.get_index(index).map(String::as_str)
    }

    /// Returns an iterator over the symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of stack symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }
}

impl Show for StackAlphabet {
    fn show(&self) -> String {
        String::show_collection(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_alphabet_keeps_declaration_order() {
        let alphabet = CharAlphabet::new(['b', 'a', 'b', 'c']);
        assert_eq!(alphabet.symbols().collect::<Vec<_>>(), vec!['b', 'a', 'c']);
        assert_eq!(alphabet.size(), 3);
        assert!(alphabet.contains('c'));
        assert!(!alphabet.contains('d'));
        assert_eq!(alphabet.show(), "(b,a,c)");
    }

    #[test]
    fn stack_alphabet_indices() {
        let stack = StackAlphabet::new(["Z0", "A", "Z0"]);
        assert_eq!(stack.size(), 2);
        assert_eq!(stack.index_of("A"), Some(1));
        assert_eq!(stack.symbol(0), Some("Z0"));
        assert_eq!(stack.index_of("B"), None);
        assert_eq!(stack.show(), "(Z0,A)");
    }

    #[test]
    fn labels() {
        let label: Label<char> = Some('a').into();
        assert_eq!(label, Label::Symbol('a'));
        assert!(Label::<char>::from(None).is_epsilon());
        assert_eq!(label.map(|c| c.to_ascii_uppercase()).show(), "A");
        assert_eq!(Label::<String>::Epsilon.show(), "ε");
    }
}
