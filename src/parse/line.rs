use thiserror::Error;

use crate::alphabet::Label;

/// Marker that starts a comment, everything after it on the same line is not content.
pub(super) const COMMENT: &str = "//";
/// Separates the left hand side of a transition from its destination.
pub(super) const ARROW: &str = "->";

/// Syntactic problems with a single transition line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum SyntaxError {
    #[error("missing `->`")]
    MissingArrow,
    #[error("missing destination state")]
    MissingTarget,
    #[error("expected `(source,input)` before `->`")]
    MalformedKey,
    #[error("expected `(pop,push)` after `:`")]
    MalformedStackPart,
    #[error("source state is empty")]
    EmptySource,
    #[error("input must be empty or a single character")]
    InputNotASymbol,
}

/// A line of a description with at least some content or a comment. Fully blank lines never
/// become a [`DescriptionLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct DescriptionLine<'a> {
    /// 1-based line number in the description.
    pub number: usize,
    pub content: &'a str,
    pub comment: Option<&'a str>,
}

impl<'a> DescriptionLine<'a> {
    /// Splits off the comment and trims both parts, returns `None` for blank lines.
    pub fn split(number: usize, raw: &'a str) -> Option<Self> {
        let (content, comment) = match raw.split_once(COMMENT) {
            Some((content, comment)) => (content.trim(), Some(comment.trim())),
            None => (raw.trim(), None),
        };
        if content.is_empty() && comment.is_none() {
            return None;
        }
        Some(Self {
            number,
            content,
            comment,
        })
    }
}

/// Splits a parenthesized, comma separated list such as `(q0, q1)` into its trimmed entries.
/// The parentheses are optional and empty entries are skipped.
pub(super) fn list(text: &str) -> impl Iterator<Item = &str> {
    unparenthesize(text)
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Removes one pair of surrounding parentheses, if present.
pub(super) fn unparenthesize(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text)
        .trim()
}

/// A transition as it is written, before any name is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RawTransition<'a> {
    pub source: &'a str,
    pub input: Label<char>,
    pub pop: Label<&'a str>,
    pub push: Label<&'a str>,
    pub target: &'a str,
}

impl<'a> RawTransition<'a> {
    /// Parses `(source,input)->target`, or `(source,input):(pop,push)->target` if `with_stack` is set.
    pub fn parse(text: &'a str, with_stack: bool) -> Result<Self, SyntaxError> {
        let (lhs, target) = text.split_once(ARROW).ok_or(SyntaxError::MissingArrow)?;
        let target = target.trim();
        if target.is_empty() {
            return Err(SyntaxError::MissingTarget);
        }

        let (key, stack) = if with_stack {
            let (key, stack) = lhs
                .split_once("):")
                .ok_or(SyntaxError::MalformedStackPart)?;
            let (pop, push) = pair(stack).ok_or(SyntaxError::MalformedStackPart)?;
            // the split consumed the closing parenthesis of the key
            (
                key.trim().strip_prefix('(').ok_or(SyntaxError::MalformedKey)?,
                (label(pop), label(push)),
            )
        } else {
            (
                lhs.trim()
                    .strip_prefix('(')
                    .and_then(|key| key.strip_suffix(')'))
                    .ok_or(SyntaxError::MalformedKey)?,
                (Label::Epsilon, Label::Epsilon),
            )
        };

        let (source, input) = key.split_once(',').ok_or(SyntaxError::MalformedKey)?;
        let source = source.trim();
        if source.is_empty() {
            return Err(SyntaxError::EmptySource);
        }
        let input = input.trim();
        let mut chars = input.chars();
        let input = match (chars.next(), chars.next()) {
            (None, _) => Label::Epsilon,
            (Some(sym), None) => Label::Symbol(sym),
            (Some(_), Some(_)) => return Err(SyntaxError::InputNotASymbol),
        };

        Ok(Self {
            source,
            input,
            pop: stack.0,
            push: stack.1,
            target,
        })
    }
}

fn pair(text: &str) -> Option<(&str, &str)> {
    let inner = text.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (left, right) = inner.split_once(',')?;
    Some((left.trim(), right.trim()))
}

fn label(text: &str) -> Label<&str> {
    if text.is_empty() {
        Label::Epsilon
    } else {
        Label::Symbol(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitting_lines() {
        assert_eq!(DescriptionLine::split(1, "   "), None);
        let line = DescriptionLine::split(2, " (q0,a)->q1 // loops ").unwrap();
        assert_eq!(line.content, "(q0,a)->q1");
        assert_eq!(line.comment, Some("loops"));
        let line = DescriptionLine::split(3, "// only a comment").unwrap();
        assert!(line.content.is_empty());
        assert_eq!(line.comment, Some("only a comment"));
    }

    #[test]
    fn lists() {
        assert_eq!(list("(q0, q1,q2)").collect::<Vec<_>>(), vec!["q0", "q1", "q2"]);
        assert_eq!(list("q0").collect::<Vec<_>>(), vec!["q0"]);
        assert_eq!(list("()").count(), 0);
        assert_eq!(unparenthesize(" (q0) "), "q0");
    }

    #[test]
    fn finite_transitions() {
        assert_eq!(
            RawTransition::parse("(q0,1)->q1", false),
            Ok(RawTransition {
                source: "q0",
                input: Label::Symbol('1'),
                pop: Label::Epsilon,
                push: Label::Epsilon,
                target: "q1"
            })
        );
        assert_eq!(
            RawTransition::parse("( q0 , ) -> q1", false).map(|t| t.input),
            Ok(Label::Epsilon)
        );
        assert_eq!(
            RawTransition::parse("(q0,1)q1", false),
            Err(SyntaxError::MissingArrow)
        );
        assert_eq!(
            RawTransition::parse("(q0,1)->", false),
            Err(SyntaxError::MissingTarget)
        );
        assert_eq!(
            RawTransition::parse("(,1)->q1", false),
            Err(SyntaxError::EmptySource)
        );
        assert_eq!(
            RawTransition::parse("(q0)->q1", false),
            Err(SyntaxError::MalformedKey)
        );
        assert_eq!(
            RawTransition::parse("(q0,10)->q1", false),
            Err(SyntaxError::InputNotASymbol)
        );
    }

    #[test]
    fn pushdown_transitions() {
        assert_eq!(
            RawTransition::parse("(p,a):(,A)->p", true),
            Ok(RawTransition {
                source: "p",
                input: Label::Symbol('a'),
                pop: Label::Epsilon,
                push: Label::Symbol("A"),
                target: "p"
            })
        );
        let t = RawTransition::parse("(q,):(Z0,)->f", true).unwrap();
        assert_eq!(t.input, Label::Epsilon);
        assert_eq!(t.pop, Label::Symbol("Z0"));
        assert_eq!(t.push, Label::Epsilon);
        assert_eq!(
            RawTransition::parse("(p,a)->p", true),
            Err(SyntaxError::MalformedStackPart)
        );
        assert_eq!(
            RawTransition::parse("(p,a):(A)->p", true),
            Err(SyntaxError::MalformedStackPart)
        );
    }
}
