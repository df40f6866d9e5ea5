//! Subcommand handlers. Each one opens the board, applies a single intent
//! and renders the outcome.

pub mod assign;
pub mod completions;
pub mod draft;
pub mod drag;
pub mod import;
pub mod init;
pub mod order;
pub mod show;
pub mod tier;

use crate::output::{OutputMode, render_mode};
use draftboard_core::config::load_project_config;
use draftboard_core::store::BackingStore;
use draftboard_core::{Change, Column, ColumnStore, PlayerId};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// The board as every command sees it, over whichever store is configured.
pub type OpenBoard = ColumnStore<Box<dyn BackingStore>>;

/// Open the configured store and load the board.
pub fn open_board(project_root: &Path) -> anyhow::Result<OpenBoard> {
    let config = load_project_config(project_root)?;
    let store = config.open_store(project_root)?;
    Ok(ColumnStore::open(store, config.sync.stale_reloads)?)
}

/// Outcome of a single intent, as rendered to the user.
#[derive(Debug, Serialize)]
pub struct ChangeReport {
    pub action: &'static str,
    pub player: PlayerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub synced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<Column>,
    /// Column order after the change, top first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<PlayerId>,
}

impl ChangeReport {
    pub fn new(action: &'static str, player: PlayerId, change: Change, board: &OpenBoard) -> Self {
        let snapshot = board.board();
        let column = snapshot.locate(player).map(|(column, _)| column);
        let (synced, version, ignored) = match change {
            Change::Synced(outcome) => (true, outcome.version(), None),
            Change::Ignored(reason) => (false, None, Some(reason.to_string())),
        };
        Self {
            action,
            player,
            name: snapshot.player(player).map(|p| p.name.clone()),
            synced,
            version,
            ignored,
            column,
            order: column.map(|c| snapshot.ids(c)).unwrap_or_default(),
        }
    }

    fn position(&self) -> Option<usize> {
        self.order.iter().position(|id| *id == self.player).map(|i| i + 1)
    }
}

/// Render a [`ChangeReport`] in any output mode.
pub fn report_change(output: OutputMode, report: &ChangeReport) -> anyhow::Result<()> {
    render_mode(
        output,
        report,
        |r, w| {
            let status = if r.synced { "ok" } else { "ignored" };
            let detail = r
                .ignored
                .clone()
                .or_else(|| r.column.map(|c| c.to_string()))
                .unwrap_or_default();
            writeln!(w, "{}\t{}\t{status}\t{detail}", r.action, r.player)
        },
        |r, w| {
            let who = r
                .name
                .as_deref()
                .map_or_else(|| format!("#{}", r.player), |n| format!("{n} (#{})", r.player));
            match (&r.ignored, r.column, r.position()) {
                (Some(reason), _, _) => writeln!(w, "· {} ignored for {who}: {reason}", r.action),
                (None, Some(column), Some(pos)) => writeln!(
                    w,
                    "✓ {}: {who} is now #{pos} of {} {}",
                    r.action,
                    r.order.len(),
                    column.title()
                ),
                (None, _, _) => writeln!(w, "✓ {}: {who}", r.action),
            }
        },
    )
}
