//! Exploration Session
//!
//! Holds the explicit per-document context: at most one engine at a time.
//! Loading a document builds a complete new engine before swapping it in, so
//! a document that fails to load leaves the previous one active.
//!
//! @module explore/session

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::command::{Command, CommandQueue, Outcome};
use super::engine::ExplorationEngine;
use super::view::ViewSnapshot;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::graph::document::{load_document, parse_document, Document, DocumentFormat};
use crate::graph::model::{GraphModel, ModelStats};

/// One user's exploration context
pub struct Session {
    config: Config,
    engine: Option<ExplorationEngine>,
    source: Option<PathBuf>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            engine: None,
            source: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the active document, if it came from a file
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Result<&ExplorationEngine> {
        self.engine.as_ref().ok_or(Error::NoDocument)
    }

    pub fn engine_mut(&mut self) -> Result<&mut ExplorationEngine> {
        self.engine.as_mut().ok_or(Error::NoDocument)
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Load a document file, replacing the active one on success
    pub fn load_path(&mut self, path: &Path) -> Result<ModelStats> {
        let loaded = load_document(path).and_then(|doc| self.build(&doc));
        let stats = self.install(loaded)?;
        self.source = Some(path.to_path_buf());
        info!(path = %path.display(), "Loaded document");
        Ok(stats)
    }

    /// Load a document from text
    pub fn load_str(&mut self, content: &str, format: DocumentFormat) -> Result<ModelStats> {
        let loaded = parse_document(content, format).and_then(|doc| self.build(&doc));
        let stats = self.install(loaded)?;
        self.source = None;
        Ok(stats)
    }

    /// Load an already parsed document
    pub fn load_document(&mut self, doc: &Document) -> Result<ModelStats> {
        let loaded = self.build(doc);
        let stats = self.install(loaded)?;
        self.source = None;
        Ok(stats)
    }

    fn build(&self, doc: &Document) -> Result<ExplorationEngine> {
        let model = GraphModel::from_document(doc)?;
        ExplorationEngine::new(model, self.config.view.clone())
    }

    fn install(&mut self, loaded: Result<ExplorationEngine>) -> Result<ModelStats> {
        match loaded {
            Ok(engine) => {
                let stats = engine.model().stats();
                self.engine = Some(engine);
                Ok(stats)
            }
            Err(e) => {
                warn!(error = %e, kept_previous = self.engine.is_some(), "Document not loaded");
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Current view of the active document
    pub fn snapshot(&self) -> Result<ViewSnapshot> {
        Ok(self.engine()?.snapshot(&self.config.colors))
    }

    /// Apply one command
    pub fn dispatch(&mut self, command: &Command) -> Result<Outcome> {
        match command {
            Command::Load(path) => self.load_path(path).map(Outcome::Loaded),
            Command::Quit => Ok(Outcome::Quit),
            _ => self.engine_mut()?.apply(command),
        }
    }

    /// Drain `queue` one command at a time until it is empty or a `quit`.
    ///
    /// Failed commands are reported to `report` and do not stop the run.
    pub fn run_queue<F>(&mut self, queue: &mut CommandQueue, mut report: F)
    where
        F: FnMut(&Session, &Command, &Result<Outcome>),
    {
        while let Some(command) = queue.pop() {
            let result = self.dispatch(&command);
            report(self, &command, &result);
            if matches!(result, Ok(Outcome::Quit)) {
                break;
            }
        }
    }
}
