//! CLI command definitions and handlers

pub mod explore;
pub mod stats;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

const LONG_ABOUT: &str = r#"
Interactive explorer for precomputed taint and data-flow graphs.

A document lists packages, classes, methods and variables, how they nest,
and which variables flow into which. flowview loads it, folds field
accesses out of the flow graph, and lets you walk the result: expand and
collapse nodes, strip or restore whole layers, highlight recommended paths.

QUICK START:
    1. flowview stats flow.json          Check the document loads
    2. flowview paths flow.json          List recommended paths
    3. flowview explore flow.json        Explore interactively

EXPLORE COMMANDS (one per line, interactive or --script):
    toggle <node>       Expand a collapsed node, collapse an expanded one
    expand <node>       Show a node's direct successors
    collapse <node>     Fold away everything downstream of a node
    fold <group>        Fold or unfold a group's members
    remove <layer>      Dissolve package, class or method groups
    restore <layer>     Bring a removed layer back
    highlight [<n>]     Highlight all recommended paths, or path n
    trace <node>        Highlight what a node reaches
    clear               Clear highlights
    reset               Back to the source nodes only
    show                Print the current view
    load <file>         Replace the document
    quit                Leave

CONFIGURATION:
    $FLOWVIEW_HOME/config.toml, default ~/.config/flowview/config.toml
    Set FLOWVIEW_LOG=debug for operation logs on stderr.
"#;

/// Interactive explorer for taint and data-flow graphs
#[derive(Parser, Debug)]
#[command(name = "flowview")]
#[command(author, version)]
#[command(about = "Interactive explorer for taint and data-flow graphs")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explore a document interactively or run a command script
    #[command(visible_alias = "x")]
    Explore(explore::ExploreArgs),

    /// Show document statistics
    Stats(stats::StatsArgs),

    /// List recommended paths by name
    #[command(visible_alias = "p")]
    Paths(stats::PathsArgs),
}

/// Output flags shared by every command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FormatArgs {
    /// Output as JSON
    #[arg(long, conflicts_with = "dot")]
    pub json: bool,

    /// Output as DOT graph
    #[arg(long)]
    pub dot: bool,
}

impl FormatArgs {
    /// Determine the output format from args
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.dot {
            OutputFormat::Dot
        } else {
            OutputFormat::Plain
        }
    }
}
