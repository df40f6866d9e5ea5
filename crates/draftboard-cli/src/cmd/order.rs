//! `dboard up`, `dboard down` and `dboard reorder`.

use super::{ChangeReport, open_board, report_change};
use crate::output::OutputMode;
use clap::Args;
use draftboard_core::{Change, Column, IgnoreReason, PlayerId};
use std::path::Path;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Player id to move one slot.
    pub id: PlayerId,
}

#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// Column to reorder (G, F or C).
    pub column: Column,

    /// Every player id of the column, top first.
    #[arg(required = true)]
    pub ids: Vec<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Swap a player with its neighbour in its own column.
pub fn run_move(
    args: &MoveArgs,
    direction: Direction,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut board = open_board(project_root)?;
    let change = match board.board().locate(args.id) {
        None => Change::Ignored(IgnoreReason::UnknownPlayer(args.id)),
        Some((column, _)) => match direction {
            Direction::Up => board.move_up(args.id, column)?,
            Direction::Down => board.move_down(args.id, column)?,
        },
    };
    let action = match direction {
        Direction::Up => "move up",
        Direction::Down => "move down",
    };
    report_change(output, &ChangeReport::new(action, args.id, change, &board))
}

/// Replace a column's order with the given permutation.
pub fn run_reorder(args: &ReorderArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut board = open_board(project_root)?;
    let change = board.reorder(args.column, args.ids.clone())?;
    let anchor = args.ids[0];
    report_change(output, &ChangeReport::new("reorder", anchor, change, &board))
}
