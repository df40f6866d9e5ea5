//! `dboard assign`: show a player under a different position column.

use super::{ChangeReport, open_board, report_change};
use crate::output::OutputMode;
use clap::Args;
use draftboard_core::{Column, PlayerId};
use std::path::Path;

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Player id to move.
    pub id: PlayerId,

    /// Target column (G, F or C). The player joins it at the bottom.
    pub column: Column,
}

pub fn run_assign(args: &AssignArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut board = open_board(project_root)?;
    let change = board.assign_column(args.id, args.column)?;
    report_change(output, &ChangeReport::new("assign column", args.id, change, &board))
}
