//! `dboard draft` and `dboard undraft`: flip a player's drafted flag.

use super::{ChangeReport, open_board, report_change};
use crate::output::OutputMode;
use clap::Args;
use draftboard_core::PlayerId;
use std::path::Path;

#[derive(Args, Debug)]
pub struct DraftArgs {
    /// Player id (see `dboard show`).
    pub id: PlayerId,
}

/// Mark a player drafted (`drafted = true`) or available again.
pub fn run_draft(
    args: &DraftArgs,
    drafted: bool,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut board = open_board(project_root)?;
    let change = board.set_drafted(args.id, drafted)?;
    let action = if drafted { "draft" } else { "undraft" };
    report_change(output, &ChangeReport::new(action, args.id, change, &board))
}
