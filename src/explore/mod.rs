//! flowview Explore - Interactive Exploration State
//!
//! Drives a rendering collaborator through collapse/expand, layer
//! removal/restoration, path highlighting and reset. State lives in the
//! diagram's per-part flags plus the engine's layer flags; each user
//! command becomes one diagram transaction.
//!
//! @module explore

pub mod collapse;
pub mod command;
pub mod diagram;
pub mod engine;
pub mod highlight;
pub mod layers;
pub mod scene;
pub mod session;
pub mod view;

pub use command::{Command, CommandQueue, Outcome};
pub use diagram::{Diagram, LinkId, PartData, PartFlags, Property};
pub use engine::{ExplorationEngine, LayerState};
pub use scene::{Mutation, Scene, Transaction};
pub use session::Session;
pub use view::{LinkView, PartView, ViewSnapshot};
