//! `dboard drag`: replay a pointer drag against a uniform row layout.
//!
//! Rows are `ROW_HEIGHT` tall and stacked from 0, so `--to-row n` releases
//! the pointer on the top edge of row `n` as the column is currently shown.
//! With `[A, B, C, D]`, dragging C to row 1 yields `[A, C, B, D]`.

use super::{ChangeReport, open_board, report_change};
use crate::output::OutputMode;
use clap::Args;
use draftboard_core::drag::{ColumnLayout, DragController, DropTarget};
use draftboard_core::{Change, Column, IgnoreReason, PlayerId};
use std::path::Path;
use tracing::debug;

const ROW_HEIGHT: f64 = 40.0;

#[derive(Args, Debug)]
pub struct DragArgs {
    /// Player id to pick up.
    pub id: PlayerId,

    /// Row (0-based) whose top edge the pointer is released on.
    #[arg(long, required_unless_present = "outside")]
    pub to_row: Option<u32>,

    /// Column the pointer is over at release. Defaults to the player's own.
    #[arg(long)]
    pub over: Option<Column>,

    /// Release outside every column, cancelling the drag.
    #[arg(long, conflicts_with_all = ["to_row", "over"])]
    pub outside: bool,
}

/// Pointer position for the top edge of `row`.
pub fn row_top(row: u32) -> f64 {
    f64::from(row) * ROW_HEIGHT
}

pub fn run_drag(args: &DragArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut board = open_board(project_root)?;

    let Some((origin, _)) = board.board().locate(args.id) else {
        let change = Change::Ignored(IgnoreReason::UnknownPlayer(args.id));
        return report_change(output, &ChangeReport::new("drag", args.id, change, &board));
    };

    let mut drag = DragController::default();
    drag.start(args.id, origin);

    let over = args.over.unwrap_or(origin);
    let layout = ColumnLayout::uniform(over, &board.board().ids(over), ROW_HEIGHT);
    let target = match args.to_row {
        Some(row) if !args.outside => {
            let pointer_y = row_top(row);
            let candidate = drag.hover(&layout, pointer_y);
            debug!(player = %args.id, %over, pointer_y, ?candidate, "drag hover");
            DropTarget::Column {
                layout: &layout,
                pointer_y,
            }
        }
        _ => DropTarget::Outside,
    };

    let change = board.finish_drag(&mut drag, target)?;
    report_change(output, &ChangeReport::new("drag", args.id, change, &board))
}
