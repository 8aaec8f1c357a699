//! # Widget Studio CLI
//!
//! Drives the studio engine from the command line.
//!
//! ## Usage
//!
//! ```bash
//! widget-studio replay script.json --output widget.json
//! widget-studio check widget.json
//! widget-studio inspect widget.json el-3
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ReplayScript` - Optional starting snapshot plus a list of actions
//! - `run_replay` / `run_check` / `run_inspect` - one function per subcommand

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use studio_core::{
    Action, CanvasSize, DocumentSnapshot, Editor, EditorConfig, ElementId, Outcome,
};

/// Command-line arguments for widget-studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "widget-studio")]
#[command(about = "Replay and validate Widget Studio documents")]
#[command(version)]
pub struct CliArgs {
    /// JSON file with editor settings; flags below override it
    #[arg(long, global = true, env = "STUDIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Grid spacing used for snapping
    #[arg(long, global = true, env = "STUDIO_GRID_SIZE")]
    pub grid_size: Option<f32>,

    /// Snap moves and resizes to the grid (`--snap-to-grid` or `--snap-to-grid=false`)
    #[arg(
        long,
        global = true,
        env = "STUDIO_SNAP_TO_GRID",
        value_name = "true|false",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub snap_to_grid: Option<bool>,

    /// Offset applied to pasted and duplicated elements
    #[arg(long, global = true, env = "STUDIO_PASTE_OFFSET")]
    pub paste_offset: Option<f32>,

    /// Canvas width in pixels
    #[arg(long, global = true, env = "STUDIO_CANVAS_WIDTH")]
    pub canvas_width: Option<f32>,

    /// Canvas height in pixels
    #[arg(long, global = true, env = "STUDIO_CANVAS_HEIGHT")]
    pub canvas_height: Option<f32>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Dispatch every action in a script and emit the resulting document
    Replay {
        /// Script file (JSON)
        script: PathBuf,

        /// Write the final snapshot here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print a one-line summary instead of the snapshot
        #[arg(long)]
        summary: bool,
    },
    /// Validate a stored document
    Check {
        /// Snapshot file (JSON)
        snapshot: PathBuf,
    },
    /// Print one element of a stored document
    Inspect {
        /// Snapshot file (JSON)
        snapshot: PathBuf,

        /// Element ID
        id: String,
    },
}

impl CliArgs {
    /// Resolve editor settings: defaults, then the config file, then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn editor_config(&self) -> Result<EditorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                EditorConfig::from_json(&json)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => EditorConfig::default(),
        };
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(snap) = self.snap_to_grid {
            config.snap_to_grid = snap;
        }
        if let Some(offset) = self.paste_offset {
            config.paste_offset = offset;
        }
        if let Some(width) = self.canvas_width {
            config.canvas_size.width = width;
        }
        if let Some(height) = self.canvas_height {
            config.canvas_size.height = height;
        }
        Ok(config)
    }
}

/// A replayable editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Document to start from; empty when absent.
    #[serde(default)]
    pub snapshot: Option<DocumentSnapshot>,
    /// Actions to dispatch, in order.
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Tally of what a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Actions dispatched.
    pub dispatched: usize,
    /// Actions that committed a history entry.
    pub committed: usize,
    /// Actions that had no effect.
    pub unchanged: usize,
    /// Elements in the final document.
    pub elements: usize,
}

impl std::fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} actions, {} committed, {} unchanged, {} elements",
            self.dispatched, self.committed, self.unchanged, self.elements
        )
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid {what} {}", path.display()))
}

/// Replay a script against a fresh editor.
///
/// # Errors
///
/// Returns an error if the starting snapshot is invalid.
pub fn replay(config: &EditorConfig, script: ReplayScript) -> Result<(DocumentSnapshot, ReplaySummary)> {
    let mut editor = Editor::new(config);
    if let Some(snapshot) = script.snapshot {
        editor
            .load_document(snapshot)
            .map_err(|e| anyhow::anyhow!("Starting snapshot rejected: {}", e))?;
    }

    let mut summary = ReplaySummary::default();
    for (step, action) in script.actions.into_iter().enumerate() {
        let name = action.name();
        let outcome = editor.dispatch(action);
        tracing::debug!("Step {}: {} -> {:?}", step, name, outcome);
        summary.dispatched += 1;
        match outcome {
            Outcome::Committed => summary.committed += 1,
            Outcome::Unchanged => summary.unchanged += 1,
            Outcome::Restored | Outcome::Transient => {}
        }
    }

    let document = editor.into_document();
    summary.elements = document.elements().len();
    Ok((document.snapshot(), summary))
}

/// Run the `replay` subcommand, returning what to print.
///
/// # Errors
///
/// Returns an error if the script cannot be read, replayed or written.
pub fn run_replay(
    config: &EditorConfig,
    script_path: &Path,
    output: Option<&Path>,
    summary_only: bool,
) -> Result<String> {
    let script: ReplayScript = read_json(script_path, "script")?;
    tracing::info!(
        "Replaying {} actions from {}",
        script.actions.len(),
        script_path.display()
    );
    let (snapshot, summary) = replay(config, script)?;
    tracing::info!("Replay finished: {}", summary);

    if summary_only {
        return Ok(summary.to_string());
    }
    let json = snapshot.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(format!("Wrote {} ({})", path.display(), summary))
        }
        None => Ok(json),
    }
}

/// Run the `check` subcommand.
///
/// # Errors
///
/// Returns an error if the snapshot is unreadable or structurally invalid.
pub fn run_check(snapshot_path: &Path) -> Result<String> {
    let snapshot: DocumentSnapshot = read_json(snapshot_path, "snapshot")?;
    snapshot
        .validate()
        .with_context(|| format!("{} is not a valid document", snapshot_path.display()))?;
    let CanvasSize { width, height } = snapshot.canvas_size;
    Ok(format!(
        "{}: ok ({} elements, canvas {}x{})",
        snapshot_path.display(),
        snapshot.elements.len(),
        width,
        height
    ))
}

/// Run the `inspect` subcommand.
///
/// # Errors
///
/// Returns an error if the snapshot is invalid or has no such element.
pub fn run_inspect(config: &EditorConfig, snapshot_path: &Path, id: &str) -> Result<String> {
    let snapshot: DocumentSnapshot = read_json(snapshot_path, "snapshot")?;
    let mut editor = Editor::new(config);
    editor.load_document(snapshot)?;
    let document = editor.document();
    let id = ElementId::from(id);
    let element = document.try_element(&id)?;
    let bounds = document.absolute_bounds(&id);
    let value = serde_json::json!({
        "element": element,
        "absolute_bounds": bounds.map(|r| [r.x, r.y, r.width, r.height]),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns whatever error the chosen subcommand produced.
pub fn run(args: &CliArgs) -> Result<String> {
    let config = args.editor_config()?;
    match &args.command {
        Command::Replay {
            script,
            output,
            summary,
        } => run_replay(&config, script, output.as_deref(), *summary),
        Command::Check { snapshot } => run_check(snapshot),
        Command::Inspect { snapshot, id } => run_inspect(&config, snapshot, id),
    }
}
