//! Stats and paths commands
//!
//! @module cli/stats

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use super::FormatArgs;
use crate::graph::document::load_document;
use crate::graph::model::GraphModel;
use crate::output::{create_formatter, named_paths};

/// Arguments for the stats command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    flowview stats flow.json          Table sizes and edge counts
    flowview stats flow.yaml --json   JSON output for scripting")]
pub struct StatsArgs {
    /// Document to load (JSON or YAML)
    pub document: PathBuf,

    #[command(flatten)]
    pub format: FormatArgs,
}

/// Arguments for the paths command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    flowview paths flow.json          One path per line, fields removed
    flowview paths flow.json --dot    Paths as a DOT graph")]
pub struct PathsArgs {
    /// Document to load (JSON or YAML)
    pub document: PathBuf,

    #[command(flatten)]
    pub format: FormatArgs,
}

fn load_model(path: &Path) -> Result<GraphModel> {
    load_document(path)
        .and_then(|doc| GraphModel::from_document(&doc))
        .map_err(|e| anyhow::anyhow!("{}: {}", e.status_message(), e))
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// Run the stats command
pub fn run_stats(args: StatsArgs) -> Result<()> {
    let model = load_model(&args.document)?;
    let formatter = create_formatter(args.format.output_format());
    print!("{}", formatter.format_stats(&model.stats()));
    Ok(())
}

/// Run the paths command
pub fn run_paths(args: PathsArgs) -> Result<()> {
    let model = load_model(&args.document)?;
    let paths = named_paths(&model).context("Recommended path names a missing node")?;
    let formatter = create_formatter(args.format.output_format());
    print!("{}", formatter.format_paths(&paths));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::scenario_document;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_model_from_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");
        fs::write(&path, serde_yaml::to_string(&scenario_document()).unwrap()).unwrap();

        let model = load_model(&path).unwrap();
        assert_eq!(model.stats().fields, 1);
        assert_eq!(model.graph().edge_count(), 2);
    }

    #[test]
    fn test_load_model_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.json"));
    }
}
