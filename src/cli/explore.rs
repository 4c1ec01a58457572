//! Explore command implementation
//!
//! Loads a document into a session and feeds it commands, either from
//! `--script` / `-c` or line by line from stdin. Views and change logs go
//! to stdout in the selected format; status lines go to stderr.
//!
//! @module cli/explore

use std::io::{self, BufRead, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};
use tracing::{debug, info};

use super::FormatArgs;
use crate::core::config::{Config, InitialView};
use crate::core::error::Result as CoreResult;
use crate::explore::{Command, CommandQueue, Outcome, Session};
use crate::graph::types::Layer;
use crate::output::{create_formatter, ViewFormatter};

/// Arguments for the explore command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    flowview explore flow.json                      Interactive session
    flowview explore flow.yaml -c \"expand input\"    Run one command, print the view
    flowview explore flow.json --script walk.txt    Run a command script
    flowview explore flow.json -c highlight --dot   Highlighted view as DOT
    flowview explore flow.json --hide class         Start without class groups
    flowview explore flow.json --changes -c reset   Print what each command changed")]
pub struct ExploreArgs {
    /// Document to load (JSON or YAML)
    pub document: PathBuf,

    /// Run commands from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Run a single command (repeatable)
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Configuration file (default: $FLOWVIEW_HOME/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initial view after load
    #[arg(long, value_parser = ["roots", "sources"])]
    pub initial_view: Option<String>,

    /// Remove a layer right after load (repeatable)
    #[arg(long, value_name = "LAYER")]
    pub hide: Vec<Layer>,

    /// Print the changes each command made
    #[arg(long)]
    pub changes: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

impl ExploreArgs {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => Config::load().context("Failed to read config")?,
        };
        match self.initial_view.as_deref() {
            Some("sources") => config.view.initial_view = InitialView::Sources,
            Some("roots") => config.view.initial_view = InitialView::Roots,
            _ => {}
        }
        for layer in &self.hide {
            if !config.view.hidden_layers.contains(layer) {
                config.view.hidden_layers.push(*layer);
            }
        }
        Ok(config)
    }

    fn scripted(&self) -> bool {
        self.script.is_some() || !self.commands.is_empty()
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Run the explore command
pub fn run(args: ExploreArgs) -> Result<()> {
    let config = args.load_config()?;
    let formatter = create_formatter(args.format.output_format());

    let mut session = Session::new(config);
    let stats = session
        .load_path(&args.document)
        .map_err(|e| anyhow::anyhow!("{}: {}", e.status_message(), e))
        .with_context(|| format!("Failed to load {}", args.document.display()))?;
    info!(variables = stats.variables, edges = stats.edges, "Document ready");

    if args.scripted() {
        let mut queue = script_queue(&args)?;
        debug!(commands = queue.len(), "Running script");
        let mut quit = false;
        session.run_queue(&mut queue, |session, command, result| {
            quit |= matches!(result, Ok(Outcome::Quit));
            report(session, command, result, formatter.as_ref(), args.changes);
        });
        if !quit {
            print_view(&session, formatter.as_ref());
        }
        return Ok(());
    }

    interactive(&mut session, formatter.as_ref(), args.changes)
}

fn script_queue(args: &ExploreArgs) -> Result<CommandQueue> {
    let mut queue = match &args.script {
        Some(path) => read_script(path)?,
        None => CommandQueue::new(),
    };
    for line in &args.commands {
        let command = line
            .parse::<Command>()
            .map_err(|e| anyhow::anyhow!(e.status_message()))?;
        queue.push(command);
    }
    Ok(queue)
}

fn read_script(path: &Path) -> Result<CommandQueue> {
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    CommandQueue::parse_script(&script)
        .map_err(|e| anyhow::anyhow!(e.status_message()))
        .with_context(|| format!("Invalid script {}", path.display()))
}

/// Read commands until `quit` or end of input
///
/// A terminal gets a line-editing prompt; piped stdin is read line by line.
fn interactive(session: &mut Session, formatter: &dyn ViewFormatter, changes: bool) -> Result<()> {
    print_view(session, formatter);

    if !io::stdin().is_terminal() {
        return run_lines(session, io::stdin().lock(), formatter, changes);
    }

    let theme = ColorfulTheme::default();
    loop {
        let line = match Input::<String>::with_theme(&theme)
            .with_prompt("flowview")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e).context("Failed to read command"),
        };
        if !run_line(session, &line, formatter, changes) {
            break;
        }
    }
    Ok(())
}

/// Run every line of `input` as a command, stopping at `quit`
fn run_lines(
    session: &mut Session,
    input: impl BufRead,
    formatter: &dyn ViewFormatter,
    changes: bool,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read from stdin")?;
        if !run_line(session, &line, formatter, changes) {
            break;
        }
    }
    Ok(())
}

/// Parse and dispatch one typed line; false once the session should end
fn run_line(session: &mut Session, line: &str, formatter: &dyn ViewFormatter, changes: bool) -> bool {
    if line.trim().is_empty() {
        return true;
    }

    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e.status_message());
            return true;
        }
    };
    let result = session.dispatch(&command);
    report(session, &command, &result, formatter, changes);
    !matches!(result, Ok(Outcome::Quit))
}

fn report(
    session: &Session,
    command: &Command,
    result: &CoreResult<Outcome>,
    formatter: &dyn ViewFormatter,
    changes: bool,
) {
    match result {
        Ok(Outcome::Applied(status)) => {
            eprintln!("{}", status);
            if changes {
                if let Ok(engine) = session.engine() {
                    if let Some(tx) = engine.diagram().last_transaction() {
                        print!("{}", formatter.format_transaction(tx));
                    }
                }
            }
        }
        Ok(Outcome::Loaded(stats)) => {
            eprintln!(
                "loaded {} ({} variables, {} edges)",
                session
                    .source()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                stats.variables,
                stats.edges
            );
        }
        Ok(Outcome::Show) => print_view(session, formatter),
        Ok(Outcome::Quit) => {}
        Err(e) => {
            debug!(%command, error = %e, "Command failed");
            eprintln!("{}: {}", command, e.status_message());
        }
    }
}

fn print_view(session: &Session, formatter: &dyn ViewFormatter) {
    match session.snapshot() {
        Ok(view) => println!("{}", formatter.format_view(&view)),
        Err(e) => eprintln!("{}", e.status_message()),
    }
}
