use std::path::Path;

use tracing::info;

use crate::{
    automaton::{Automaton, Summary},
    parse::{LoadError, LoadOptions, LoadWarning},
    run::{Engine, RunConfig},
};

/// Bundles a loaded [`Automaton`] with an [`Engine`], which is what a shell or another front end
/// works with. Words are tested one after the other and the path of the most recent test can be
/// retrieved as text.
///
/// ```no_run
/// use automata_check::Session;
///
/// let mut session = Session::load("anbn.pda").unwrap();
/// if !session.test("aab") {
///     for line in session.last_path() {
///         println!("{line}");
///     }
/// }
/// println!("{}", session.describe());
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    automaton: Automaton,
    engine: Engine,
    warnings: Vec<LoadWarning>,
}

impl Session {
    /// Loads the description at `path` with the default [`LoadOptions`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::load_with(path, &LoadOptions::default())
    }

    /// Loads the description at `path` with the given options.
    pub fn load_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, LoadError> {
        let loaded = options.load(path.as_ref())?;
        info!(
            "loaded {} from {} with {} warnings",
            loaded.automaton.summary().kind(),
            path.as_ref().display(),
            loaded.warnings.len()
        );
        Ok(Self {
            automaton: loaded.automaton,
            engine: Engine::default(),
            warnings: loaded.warnings,
        })
    }

    /// Creates a session for an automaton that was built in code.
    pub fn from_automaton(automaton: Automaton) -> Self {
        Self {
            automaton,
            engine: Engine::default(),
            warnings: vec![],
        }
    }

    /// Replaces the configuration of the engine, the recorded path is discarded.
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.engine = Engine::new(config);
        self
    }

    /// Tests whether the automaton accepts `word`.
    pub fn test(&mut self, word: &str) -> bool {
        self.engine.test(&self.automaton, word)
    }

    /// Renders the path of the most recent call to [`Session::test`], empty if nothing was tested yet.
    pub fn last_path(&self) -> Vec<String> {
        self.engine
            .last_path()
            .map(|path| path.render(&self.automaton))
            .unwrap_or_default()
    }

    /// Gives a structured summary of the automaton.
    pub fn describe(&self) -> Summary {
        self.automaton.summary()
    }

    /// The automaton of this session.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// The warnings that came up while loading the automaton.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }
}
