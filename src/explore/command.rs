//! Exploration Commands
//!
//! User interactions arrive as `Command` values and are consumed one at a
//! time from a `CommandQueue`. Each engine command maps to exactly one
//! engine operation, and therefore one diagram transaction.
//!
//! Text form, one command per line:
//!
//! ```text
//! toggle <node>      collapse <node>     expand <node>     fold <group>
//! remove <layer>     restore <layer>     highlight [<n>]   trace <node>
//! clear              reset               show              load <path>
//! quit
//! ```
//!
//! @module explore/command

use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use compact_str::CompactString;

use super::diagram::Diagram;
use super::engine::ExplorationEngine;
use crate::core::error::{Error, Result};
use crate::graph::model::ModelStats;
use crate::graph::types::Layer;

// =============================================================================
// COMMAND
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle(CompactString),
    Collapse(CompactString),
    Expand(CompactString),
    /// Fold or unfold a group's members
    Fold(CompactString),
    RemoveLayer(Layer),
    RestoreLayer(Layer),
    /// All recommended paths
    HighlightRecommended,
    /// One recommended path by index
    HighlightPath(usize),
    Trace(CompactString),
    ClearHighlights,
    Reset,
    Show,
    Load(PathBuf),
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let invalid = || Error::InvalidCommand {
            input: line.to_string(),
        };
        let key = || {
            if arg.is_empty() {
                Err(invalid())
            } else {
                Ok(CompactString::new(arg))
            }
        };
        let layer = || arg.parse::<Layer>().map_err(|_| invalid());

        let command = match verb.to_ascii_lowercase().as_str() {
            "toggle" | "t" => Command::Toggle(key()?),
            "collapse" => Command::Collapse(key()?),
            "expand" => Command::Expand(key()?),
            "fold" => Command::Fold(key()?),
            "remove" => Command::RemoveLayer(layer()?),
            "restore" => Command::RestoreLayer(layer()?),
            "highlight" | "hl" if arg.is_empty() => Command::HighlightRecommended,
            "highlight" | "hl" => Command::HighlightPath(arg.parse().map_err(|_| invalid())?),
            "trace" => Command::Trace(key()?),
            "clear" => Command::ClearHighlights,
            "reset" => Command::Reset,
            "show" | "view" => Command::Show,
            "load" | "open" => Command::Load(PathBuf::from(key()?.as_str())),
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(invalid()),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Toggle(key) => write!(f, "toggle {}", key),
            Command::Collapse(key) => write!(f, "collapse {}", key),
            Command::Expand(key) => write!(f, "expand {}", key),
            Command::Fold(key) => write!(f, "fold {}", key),
            Command::RemoveLayer(layer) => write!(f, "remove {}", layer),
            Command::RestoreLayer(layer) => write!(f, "restore {}", layer),
            Command::HighlightRecommended => f.write_str("highlight"),
            Command::HighlightPath(index) => write!(f, "highlight {}", index),
            Command::Trace(key) => write!(f, "trace {}", key),
            Command::ClearHighlights => f.write_str("clear"),
            Command::Reset => f.write_str("reset"),
            Command::Show => f.write_str("show"),
            Command::Load(path) => write!(f, "load {}", path.display()),
            Command::Quit => f.write_str("quit"),
        }
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of a successfully applied command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The engine state changed; carries a short status text
    Applied(String),
    /// A new document replaced the previous one
    Loaded(ModelStats),
    /// The caller should render the current view
    Show,
    Quit,
}

impl<D: Diagram> ExplorationEngine<D> {
    /// Apply one engine command
    pub fn apply(&mut self, command: &Command) -> Result<Outcome> {
        let status = match command {
            Command::Toggle(key) => {
                if self.toggle(key)? {
                    format!("expanded {}", key)
                } else {
                    format!("collapsed {}", key)
                }
            }
            Command::Collapse(key) => {
                self.collapse(key)?;
                format!("collapsed {}", key)
            }
            Command::Expand(key) => {
                self.expand(key)?;
                format!("expanded {}", key)
            }
            Command::Fold(key) => {
                if self.toggle_group(key)? {
                    format!("unfolded {}", key)
                } else {
                    format!("folded {}", key)
                }
            }
            Command::RemoveLayer(layer) => {
                self.remove_layer(*layer)?;
                format!("removed {} layer", layer)
            }
            Command::RestoreLayer(layer) => {
                self.restore_layer(*layer)?;
                format!("restored {} layer", layer)
            }
            Command::HighlightRecommended => {
                let marked = self.highlight_recommended()?;
                format!("highlighted {} of {} paths", marked, self.model.recommended_paths().len())
            }
            Command::HighlightPath(index) => {
                self.highlight_recommended_path(*index)?;
                format!("highlighted path {}", index)
            }
            Command::Trace(key) => {
                self.trace_from(key)?;
                format!("traced {}", key)
            }
            Command::ClearHighlights => {
                self.clear_highlights()?;
                "cleared highlights".to_string()
            }
            Command::Reset => {
                self.reset()?;
                "reset view".to_string()
            }
            Command::Show => return Ok(Outcome::Show),
            Command::Quit => return Ok(Outcome::Quit),
            Command::Load(_) => {
                return Err(Error::InvalidCommand {
                    input: command.to_string(),
                })
            }
        };
        Ok(Outcome::Applied(status))
    }
}

// =============================================================================
// QUEUE
// =============================================================================

/// FIFO of pending commands
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a script, one command per line; blank lines and `#` comments skipped
    pub fn parse_script(script: &str) -> Result<Self> {
        let mut queue = Self::new();
        for line in script.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            queue.push(line.parse()?);
        }
        Ok(queue)
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
