//! Session state and command execution.
//!
//! A [`Session`] owns the registry being edited, the selection cursor, the
//! loaded file name, and the RNG. [`Session::run_line`] executes one input
//! line step by step and stops at the first failing step; earlier steps keep
//! their effects.

use dicebag_foundation::{Error, Result};
use dicebag_storage::{Collection, Die, Registry, RollOutcome, Rollable, RollableKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::command::{self, Command, Shape};
use crate::config::Config;
use crate::render;
use crate::store::FileStore;

/// What a successful step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing to print.
    Done,
    /// Preformatted text (listings).
    Text(String),
    /// A detailed roll.
    Roll(RollOutcome),
    /// A quick roll's total.
    Total(i64),
    /// Stored file names.
    Files(Vec<String>),
    /// The help text.
    Help,
}

/// The step that stopped a line.
#[derive(Debug)]
pub struct Failure {
    /// The step as typed.
    pub step: String,
    /// Why it failed.
    pub error: Error,
    /// How many later steps were skipped.
    pub skipped: usize,
}

/// Everything one input line produced.
#[derive(Debug, Default)]
pub struct LineReport {
    /// Responses of the steps that succeeded, in order.
    pub responses: Vec<Response>,
    /// The failing step, if any.
    pub failure: Option<Failure>,
}

impl LineReport {
    /// Returns true if every step succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

/// Session state for an interactive or batch run.
pub struct Session {
    registry: Registry,
    store: FileStore,
    file: Option<String>,
    selected: Option<String>,
    rng: ChaCha8Rng,
    autosave: bool,
    running: bool,
    save_on_exit: bool,
}

impl Session {
    /// Creates a session with an empty registry and no loaded file.
    #[must_use]
    pub fn new(store: FileStore, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self {
            registry: Registry::new(),
            store,
            file: None,
            selected: None,
            rng,
            autosave: true,
            running: true,
            save_on_exit: true,
        }
    }

    /// Creates a session from configuration, opening the initial file if one
    /// is named.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial file name is invalid or its contents
    /// can't be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = FileStore::new(&config.store_dir, config.extension.as_str());
        let mut session = Self::new(store, config.seed);
        session.autosave = config.autosave;
        if let Some(name) = &config.initial_file {
            session.open(name)?;
        }
        Ok(session)
    }

    /// Returns the registry being edited.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the file store.
    #[must_use]
    pub const fn store(&self) -> &FileStore {
        &self.store
    }

    /// Returns the loaded file name.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Returns the selected entity name.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Returns false once `exit` has run.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Sets whether `exit` saves the loaded file.
    pub fn set_autosave(&mut self, autosave: bool) {
        self.autosave = autosave;
    }

    /// Keeps the session running after a failed shutdown.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Returns the prompt: `<file>[<selection>] >>> `.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "{}[{}] >>> ",
            self.file.as_deref().unwrap_or("[No File Loaded]"),
            self.selected.as_deref().unwrap_or("No Object Selected")
        )
    }

    /// Returns words worth offering for completion: keywords, entity names,
    /// and stored file names.
    #[must_use]
    pub fn completion_words(&self) -> Vec<String> {
        let mut words: Vec<String> = command::KEYWORDS.iter().map(ToString::to_string).collect();
        words.extend(self.registry.names().map(String::from));
        if let Ok(files) = self.store.list() {
            words.extend(files);
        }
        words.sort();
        words.dedup();
        words
    }

    /// Runs one input line.
    ///
    /// Steps run in order. The first failing step ends the line; the steps
    /// after it are not run and are counted in [`Failure::skipped`].
    pub fn run_line(&mut self, input: &str) -> LineReport {
        let mut report = LineReport::default();

        if let Err(error) = command::validate_line(input) {
            report.failure = Some(Failure {
                step: input.trim().to_string(),
                error,
                skipped: 0,
            });
            return report;
        }

        let steps = command::split(input);
        for (i, step) in steps.iter().enumerate() {
            match Command::parse(&step.args).and_then(|cmd| self.execute(cmd)) {
                Ok(response) => report.responses.push(response),
                Err(error) => {
                    debug!(step = %step.text, %error, "step failed");
                    report.failure = Some(Failure {
                        step: step.text.clone(),
                        error,
                        skipped: steps.len() - i - 1,
                    });
                    break;
                }
            }
        }
        report
    }

    /// Executes a single parsed command.
    ///
    /// # Errors
    ///
    /// Returns whatever error the command's operation produced.
    pub fn execute(&mut self, command: Command) -> Result<Response> {
        debug!(command = command.keyword(), "execute");
        match command {
            Command::Create {
                name,
                modifier,
                shape,
            } => {
                let object: Rollable = match shape {
                    Shape::Collection => Collection::new(name.as_str(), modifier).into(),
                    Shape::Numbered(count) => Die::numbered(name.as_str(), modifier, count)?.into(),
                    Shape::Faces(faces) => Die::new(name.as_str(), modifier, faces)?.into(),
                };
                self.registry.add(object)?;
                self.selected = Some(name);
                Ok(Response::Done)
            }
            Command::Delete => {
                let name = self.require_selection()?.to_string();
                self.registry.remove(&name)?;
                self.selected = None;
                Ok(Response::Done)
            }
            Command::Rename { name } => {
                let old = self.require_selection()?.to_string();
                self.registry.rename(&old, &name)?;
                self.selected = Some(name);
                Ok(Response::Done)
            }
            Command::Modifier { value } => {
                let name = self.require_selection()?.to_string();
                self.registry.set_modifier(&name, value)?;
                Ok(Response::Done)
            }
            Command::Add { arg } => {
                let name = self.require_selection()?.to_string();
                match self.registry.get(&name)?.kind() {
                    RollableKind::Die => self.registry.add_face(&name, parse_face(&arg)?)?,
                    RollableKind::Collection => self.registry.add_to_collection(&name, &arg)?,
                }
                Ok(Response::Done)
            }
            Command::Remove { arg } => {
                let name = self.require_selection()?.to_string();
                match self.registry.get(&name)?.kind() {
                    RollableKind::Die => self.registry.remove_face(&name, parse_face(&arg)?)?,
                    RollableKind::Collection => {
                        self.registry.remove_from_collection(&name, &arg)?;
                    }
                }
                Ok(Response::Done)
            }
            Command::Select { name } => {
                if let Some(name) = &name {
                    self.registry.get(name)?;
                }
                self.selected = name;
                Ok(Response::Done)
            }
            Command::List => {
                let text = match self.selected.as_deref() {
                    Some(name) => render::rollable(&self.registry, self.registry.get(name)?),
                    None => render::registry(&self.registry),
                };
                Ok(Response::Text(text))
            }
            Command::Roll { quick } => {
                let name = self.require_selection()?.to_string();
                let outcome = self.registry.roll(&name, &mut self.rng)?;
                if quick {
                    Ok(Response::Total(outcome.total()))
                } else {
                    Ok(Response::Roll(outcome))
                }
            }
            Command::FileLoad { name } => {
                FileStore::validate_name(&name)?;
                self.save_loaded()?;
                self.open(&name)?;
                Ok(Response::Done)
            }
            Command::FileSave { name } => {
                let name = match name {
                    Some(name) => name,
                    None => self.require_file()?.to_string(),
                };
                self.store.save(&name, &self.registry)?;
                self.file = Some(name);
                Ok(Response::Done)
            }
            Command::FileDelete { name } => {
                match name {
                    Some(name) => {
                        self.store.delete(&name)?;
                        if self.file.as_deref() == Some(name.as_str()) {
                            self.file = None;
                        }
                    }
                    None => {
                        let loaded = self.require_file()?.to_string();
                        if self.store.exists(&loaded) {
                            self.store.delete(&loaded)?;
                        }
                        self.file = None;
                    }
                }
                Ok(Response::Done)
            }
            Command::FileRename { old, new } => {
                match old {
                    Some(old) => {
                        self.store.rename(&old, &new)?;
                        if self.file.as_deref() == Some(old.as_str()) {
                            self.file = Some(new);
                        }
                    }
                    None => {
                        let loaded = self.require_file()?.to_string();
                        FileStore::validate_name(&new)?;
                        if self.store.exists(&loaded) {
                            self.store.rename(&loaded, &new)?;
                        } else if self.store.exists(&new) {
                            return Err(Error::duplicate_name(format!("file {new}")));
                        }
                        self.file = Some(new);
                    }
                }
                Ok(Response::Done)
            }
            Command::FileList => Ok(Response::Files(self.store.list()?)),
            Command::Help => Ok(Response::Help),
            Command::Exit { save } => {
                self.running = false;
                self.save_on_exit = save;
                Ok(Response::Done)
            }
        }
    }

    /// Saves the loaded file if the session exits with saving enabled.
    ///
    /// # Errors
    ///
    /// Returns the save error; the caller decides whether to stay running.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.autosave && self.save_on_exit {
            if let Some(file) = self.file.clone() {
                self.store.save(&file, &self.registry)?;
            }
        }
        Ok(())
    }

    // Loads `name` if it exists, otherwise starts an empty registry bound to it.
    fn open(&mut self, name: &str) -> Result<()> {
        FileStore::validate_name(name)?;
        self.registry = if self.store.exists(name) {
            self.store.load(name)?
        } else {
            warn!(name, "no saved file; starting empty");
            Registry::new()
        };
        self.file = Some(name.to_string());
        self.selected = None;
        Ok(())
    }

    fn save_loaded(&self) -> Result<()> {
        if let Some(file) = &self.file {
            self.store.save(file, &self.registry)?;
        }
        Ok(())
    }

    fn require_selection(&self) -> Result<&str> {
        self.selected
            .as_deref()
            .ok_or_else(|| Error::null_reference("no object selected"))
    }

    fn require_file(&self) -> Result<&str> {
        self.file
            .as_deref()
            .ok_or_else(|| Error::null_reference("no file loaded"))
    }
}

fn parse_face(token: &str) -> Result<i64> {
    token
        .parse::<i64>()
        .map_err(|_| Error::invalid_argument(format!("wrong parameter type: {token}")))
}
