//! Reads automata from their textual description.
//!
//! A description is line oriented. Blank lines are ignored and `//` starts a comment that runs
//! until the end of the line. The comment on the last non-blank line is kept as the free-text
//! description of the automaton. The remaining lines are, in order,
//! ```text
//! (sym1,sym2,...)          input alphabet, symbols are single characters
//! (stack1,stack2,...)      stack alphabet, only for pushdown automata
//! (state1,state2,...)      states
//! state                    initial state
//! (state1,...)             accepting states
//! transitions, one per line
//! ```
//! A transition of a finite automaton is written `(source,input)->target`, a transition of a
//! pushdown automaton `(source,input):(pop,push)->target`. Leaving the input, pop or push field
//! empty means that no input is consumed, nothing is popped or nothing is pushed respectively.
//!
//! Whether an automaton has a stack is decided by the position of the first line that contains a
//! `->`. If it is the fifth content line, the description is that of a finite automaton, if it is the
//! sixth, the description contains a stack alphabet and belongs to a pushdown automaton.
//!
//! Problems with single lines are reported as [`LoadWarning`]s and the offending line is skipped,
//! only problems with the overall structure lead to a [`FormatError`].
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    alphabet::StackAlphabet,
    automaton::{Automaton, AutomatonBuilder, BuildError, BuildWarning, Insertion, Memory},
};

mod line;
use line::{DescriptionLine, RawTransition, ARROW};
pub use line::SyntaxError;

/// Content line on which the first transition of a finite automaton is expected.
const FINITE_TRANSITIONS_START: usize = 4;
/// Content line on which the first transition of a pushdown automaton is expected.
const PUSHDOWN_TRANSITIONS_START: usize = 5;

/// Problems with the overall structure of a description, no automaton can be read from it.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum FormatError {
    #[error("description is empty")]
    Empty,
    #[error("description contains no transitions")]
    MissingTransitions,
    #[error("first transition on line {line} is content line {position}, expected content line 5 (finite automaton) or 6 (pushdown automaton)")]
    Layout { line: usize, position: usize },
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Errors that prevent an automaton from being loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The description could not be read.
    #[error("could not read `{}`: {source}", .path.display())]
    Unreadable {
        /// Path of the description.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The description is structurally malformed and no fallback is configured.
    #[error("could not load `{}`: {source}", .path.display())]
    Format {
        /// Path of the description.
        path: PathBuf,
        /// What is wrong with the description.
        #[source]
        source: FormatError,
    },
}

/// Problems with single lines of a description. The line in question is skipped.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum LoadWarning {
    #[error("line {line}: alphabet symbol `{symbol}` is not a single character, skipping it")]
    MalformedSymbol { line: usize, symbol: String },
    #[error("line {line}: {warning}, skipping it")]
    Header { line: usize, warning: BuildWarning },
    #[error("line {line}: malformed transition `{text}`: {error}")]
    MalformedTransition {
        line: usize,
        text: String,
        error: SyntaxError,
    },
    #[error("line {line}: skipping transition `{text}`: {warning}")]
    Transition {
        line: usize,
        text: String,
        warning: BuildWarning,
    },
    #[error("line {line}: transition `{text}` shares its key with an earlier one, the automaton is nondeterministic")]
    Nondeterministic { line: usize, text: String },
    #[error("{error}, loaded fallback `{}` instead", .fallback.display())]
    FellBack { error: FormatError, fallback: PathBuf },
}

/// An automaton together with the warnings that were produced while reading it.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// The automaton that was read.
    pub automaton: Automaton,
    /// All warnings, in the order in which they occurred.
    pub warnings: Vec<LoadWarning>,
}

/// Options for loading descriptions from files.
///
/// By default, a structurally malformed description fails to load. If a fallback is configured,
/// the fallback description is loaded instead and a [`LoadWarning::FellBack`] is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    fallback: Option<PathBuf>,
}

impl LoadOptions {
    /// Loads the description at `fallback` whenever a description turns out to be malformed.
    pub fn with_fallback<P: Into<PathBuf>>(mut self, fallback: P) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Returns the configured fallback, if any.
    pub fn fallback(&self) -> Option<&Path> {
        self.fallback.as_deref()
    }

    /// Reads and parses the description at `path`.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Loaded, LoadError> {
        let path = path.as_ref();
        debug!("loading automaton from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        match parse_description(&text) {
            Ok(loaded) => Ok(loaded),
            Err(error) => match &self.fallback {
                None => Err(LoadError::Format {
                    path: path.to_path_buf(),
                    source: error,
                }),
                Some(fallback) => {
                    warn!(
                        "{} is malformed ({error}), loading {} instead",
                        path.display(),
                        fallback.display()
                    );
                    let mut loaded = LoadOptions::default().load(fallback)?;
                    loaded.warnings.insert(
                        0,
                        LoadWarning::FellBack {
                            error,
                            fallback: fallback.clone(),
                        },
                    );
                    Ok(loaded)
                }
            },
        }
    }
}

/// Loads the description at `path` with the default [`LoadOptions`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Loaded, LoadError> {
    LoadOptions::default().load(path)
}

/// Parses a description that is given as a string. All warnings are also emitted through `tracing`.
pub fn parse_description(text: &str) -> Result<Loaded, FormatError> {
    let lines = text
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| DescriptionLine::split(idx + 1, raw))
        .collect::<Vec<_>>();
    let description = lines
        .last()
        .and_then(|line| line.comment)
        .filter(|comment| !comment.is_empty());
    let content = lines
        .into_iter()
        .filter(|line| !line.content.is_empty())
        .collect::<Vec<_>>();
    if content.is_empty() {
        return Err(FormatError::Empty);
    }

    let first_transition = content
        .iter()
        .position(|line| line.content.contains(ARROW))
        .ok_or(FormatError::MissingTransitions)?;
    let pushdown = match first_transition {
        FINITE_TRANSITIONS_START => false,
        PUSHDOWN_TRANSITIONS_START => true,
        position => {
            return Err(FormatError::Layout {
                line: content[position].number,
                position: position + 1,
            })
        }
    };
    trace!(
        "first transition on content line {}, reading a {} automaton",
        first_transition + 1,
        if pushdown { "pushdown" } else { "finite" }
    );

    let mut warnings = Vec::new();
    let (header, transitions) = content.split_at(first_transition);
    let (alphabet, rest) = header.split_first().ok_or(FormatError::Empty)?;
    let (memory, rest) = if pushdown {
        let (stack, rest) = rest.split_first().ok_or(FormatError::Empty)?;
        (Memory::Pushdown(StackAlphabet::new(line::list(stack.content))), rest)
    } else {
        (Memory::Stackless, rest)
    };
    let [states, initial, accepting] = rest else {
        return Err(FormatError::Empty);
    };

    let mut builder = AutomatonBuilder::new(memory)
        .with_alphabet(symbols(alphabet, &mut warnings))
        .with_states(line::list(states.content))
        .with_initial(line::unparenthesize(initial.content));
    if let Some(description) = description {
        builder = builder.with_description(description);
    }
    for state in line::list(accepting.content) {
        if let Err(warning) = builder.add_accepting(state) {
            warnings.push(LoadWarning::Header {
                line: accepting.number,
                warning,
            });
        }
    }

    for transition in transitions {
        let text = transition.content;
        let raw = match RawTransition::parse(text, pushdown) {
            Ok(raw) => raw,
            Err(error) => {
                warnings.push(LoadWarning::MalformedTransition {
                    line: transition.number,
                    text: text.to_string(),
                    error,
                });
                continue;
            }
        };
        match builder.add_stack_transition(raw.source, raw.input, raw.pop, raw.push, raw.target) {
            Ok(Insertion::New) => {}
            Ok(Insertion::Chained) => {
                if !warnings
                    .iter()
                    .any(|w| matches!(w, LoadWarning::Nondeterministic { .. }))
                {
                    warnings.push(LoadWarning::Nondeterministic {
                        line: transition.number,
                        text: text.to_string(),
                    });
                }
            }
            Err(warning) => warnings.push(LoadWarning::Transition {
                line: transition.number,
                text: text.to_string(),
                warning,
            }),
        }
    }

    let (automaton, _) = builder.build()?;
    for warning in &warnings {
        warn!("{warning}");
    }
    debug!(
        "read automaton with {} states and {} transition keys, {} warnings",
        automaton.size(),
        automaton.transition_count(),
        warnings.len()
    );
    Ok(Loaded {
        automaton,
        warnings,
    })
}

/// Reads the input alphabet, entries that are not a single character are skipped.
fn symbols(line: &DescriptionLine<'_>, warnings: &mut Vec<LoadWarning>) -> Vec<char> {
    line::list(line.content)
        .filter_map(|entry| {
            let mut chars = entry.chars();
            match (chars.next(), chars.next()) {
                (Some(sym), None) => Some(sym),
                _ => {
                    warnings.push(LoadWarning::MalformedSymbol {
                        line: line.number,
                        symbol: entry.to_string(),
                    });
                    None
                }
            }
        })
        .collect()
}

impl FromStr for Automaton {
    type Err = FormatError;

    /// Parses a description, warnings are only emitted through `tracing`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_description(s).map(|loaded| loaded.automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Label;

    const DFA: &str = r#"
        (0,1)
        (q0,q1)
        q0
        (q1)
        (q0,0)->q0
        (q0,1)->q1
        (q1,0)->q1
        (q1,1)->q0 // odd number of ones
    "#;

    const PDA: &str = r#"
        (a,b)
        (A)
        (p,q,f)
        p
        (f)

        // read a's, then match them with b's
        (p,a):(,A)->p
        (p,b):(A,)->q
        (q,b):(A,)->q
        (q,):(,)->f
    "#;

    #[test_log::test]
    fn reads_finite_automaton() {
        let Loaded {
            automaton,
            warnings,
        } = parse_description(DFA).unwrap();
        assert!(warnings.is_empty());
        assert!(!automaton.is_pushdown());
        assert!(!automaton.is_nondeterministic());
        assert_eq!(automaton.size(), 2);
        assert_eq!(automaton.transition_count(), 4);
        assert_eq!(automaton.state_name(automaton.initial()), Some("q0"));
        assert_eq!(automaton.description(), Some("odd number of ones"));
    }

    #[test_log::test]
    fn reads_pushdown_automaton() {
        let Loaded {
            automaton,
            warnings,
        } = parse_description(PDA).unwrap();
        assert!(warnings.is_empty());
        assert!(automaton.is_pushdown());
        assert_eq!(automaton.transition_count(), 4);
        assert_eq!(automaton.description(), None);
        let q = automaton.state_index("q").unwrap();
        assert!(automaton.has_transition(q, Label::Epsilon, Label::Epsilon));
    }

    #[test_log::test]
    fn comment_only_last_line_is_description() {
        let text = format!("{DFA}\n// parity of ones\n");
        let automaton: Automaton = text.parse().unwrap();
        assert_eq!(automaton.description(), Some("parity of ones"));
    }

    #[test_log::test]
    fn malformed_lines_are_skipped() {
        let text = r#"
            (0,1,xy)
            (q0,q1)
            q0
            (q1,q5)
            (q0,0)->q0
            (q0,1)q1
            (q0,1)->q9
            (q0,2)->q1
            (,1)->q1
            (q0,1)->q1
            (q1,1)->q1
            (q1,1)->q0
            (q1,1)->q0
            (q0,0)->q1
        "#;
        let Loaded {
            automaton,
            warnings,
        } = parse_description(text).unwrap();

        assert_eq!(
            warnings,
            vec![
                LoadWarning::MalformedSymbol {
                    line: 2,
                    symbol: "xy".to_string()
                },
                LoadWarning::Header {
                    line: 5,
                    warning: BuildWarning::UnknownState("q5".to_string())
                },
                LoadWarning::MalformedTransition {
                    line: 7,
                    text: "(q0,1)q1".to_string(),
                    error: SyntaxError::MissingArrow
                },
                LoadWarning::Transition {
                    line: 8,
                    text: "(q0,1)->q9".to_string(),
                    warning: BuildWarning::UnknownState("q9".to_string())
                },
                LoadWarning::Transition {
                    line: 9,
                    text: "(q0,2)->q1".to_string(),
                    warning: BuildWarning::UnknownSymbol('2')
                },
                LoadWarning::MalformedTransition {
                    line: 10,
                    text: "(,1)->q1".to_string(),
                    error: SyntaxError::EmptySource
                },
                LoadWarning::Nondeterministic {
                    line: 13,
                    text: "(q1,1)->q0".to_string()
                },
                LoadWarning::Transition {
                    line: 14,
                    text: "(q1,1)->q0".to_string(),
                    warning: BuildWarning::Duplicate
                },
            ]
        );
        assert!(automaton.is_nondeterministic());
        assert_eq!(automaton.alphabet().size(), 2);
        assert_eq!(automaton.transition_count(), 3);
        assert_eq!(automaton.accepting_states().count(), 1);
    }

    #[test]
    fn structural_errors() {
        assert_eq!(parse_description("\n  \n// nothing").err(), Some(FormatError::Empty));
        assert_eq!(
            parse_description("(a)\n(q)\nq\n(q)\n").err(),
            Some(FormatError::MissingTransitions)
        );
        assert_eq!(
            parse_description("(a)\nq\n(q)\n(q,a)->q\n").err(),
            Some(FormatError::Layout {
                line: 4,
                position: 4
            })
        );
        assert_eq!(
            parse_description("(a)\n(q)\nr\n(q)\n(q,a)->q\n").err(),
            Some(FormatError::Build(BuildError::UnknownInitial(
                "r".to_string()
            )))
        );
    }
}
