//! flowview - Interactive explorer for taint and data-flow graphs
//!
//! Loads a precomputed dependency document, folds field accesses out of the
//! flow graph, and drives a diagram through collapse/expand, layer removal
//! and restoration, and path highlighting.

pub mod cli;
pub mod core;
pub mod explore;
pub mod graph;
pub mod output;

pub use core::config::Config;
pub use core::error::{Error, Result};
pub use explore::{ExplorationEngine, Scene, Session};
pub use graph::GraphModel;
